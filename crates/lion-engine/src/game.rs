//! The match controller: turn order, move dispatch, win detection.
//!
//! One [`Match`] owns one side's view of a game. It validates incoming move
//! intents against the rule engine, gates them on the turn owner, and emits
//! [`MatchEvent`]s to its subscribers. Moves from the peer arrive in the
//! peer's frame and go through [`Match::apply_remote`], which mirrors them
//! first.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ai::PlannedMove;
use crate::board::Board;
use crate::error::{EngineError, EngineResult};
use crate::events::{EventBus, MatchEvent, Role};
use crate::moves::apply_move;
use crate::types::{CaptureRule, Kind, Owner, Square};

/// Lifecycle of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchStatus {
    WaitingForFirstPlayer,
    InProgress,
    Finished,
}

/// Why a match ended.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The winner captured the opposing Lion.
    LionCaptured,
    /// The winner's Lion held the opponent's back rank for a full turn.
    LionHeldFarRank,
    /// The loser had no legal move on their turn.
    NoLegalMoves,
}

/// Final result of a match, in the local frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameOutcome {
    pub winner: Owner,
    pub reason: EndReason,
}

/// One side's match state and event fan-out.
pub struct Match {
    board: Board,
    rule: CaptureRule,
    status: MatchStatus,
    first: Option<Owner>,
    current: Option<Owner>,
    outcome: Option<GameOutcome>,
    /// Bumped on reset; deferred adversary moves planned against an older
    /// epoch are discarded instead of applied to the fresh board.
    epoch: u64,
    /// Where locally originated events go besides the local UI.
    opponent_role: Role,
    bus: EventBus,
}

impl Match {
    /// A new match against the given opponent role, board at the starting
    /// position, waiting for the first-player decision.
    pub fn new(rule: CaptureRule, opponent_role: Role) -> Match {
        Match {
            board: Board::initial(),
            rule,
            status: MatchStatus::WaitingForFirstPlayer,
            first: None,
            current: None,
            outcome: None,
            epoch: 0,
            opponent_role,
            bus: EventBus::new(),
        }
    }

    pub fn subscribe(&mut self, role: Role) -> crossbeam_channel::Receiver<MatchEvent> {
        self.bus.subscribe(role)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn first(&self) -> Option<Owner> {
        self.first
    }

    /// Side to move. `Some` exactly while the match is in progress.
    pub fn current(&self) -> Option<Owner> {
        self.current
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Start the match with a coin flip for the first player and announce it
    /// to the local UI and the opponent.
    pub fn start(&mut self) -> EngineResult<Owner> {
        let first = if rand::rng().random_bool(0.5) {
            Owner::Mine
        } else {
            Owner::Enemy
        };
        self.start_with(first)?;
        Ok(first)
    }

    /// Start with a known first player (deciding side of a networked match,
    /// or a test).
    pub fn start_with(&mut self, first: Owner) -> EngineResult<()> {
        self.begin(first, &[Role::LocalUi, self.opponent_role])
    }

    fn begin(&mut self, first: Owner, targets: &[Role]) -> EngineResult<()> {
        if self.status != MatchStatus::WaitingForFirstPlayer {
            return Err(EngineError::AlreadyStarted);
        }
        self.status = MatchStatus::InProgress;
        self.first = Some(first);
        self.current = Some(first);
        self.bus.emit(targets, MatchEvent::Start { first });
        Ok(())
    }

    /// Submit a move from the local side and broadcast it to the opponent.
    pub fn submit_move(
        &mut self,
        mover: Owner,
        src: Square,
        dest: Square,
    ) -> EngineResult<MatchEvent> {
        self.submit(mover, src, dest, &[Role::LocalUi, self.opponent_role])
    }

    /// Apply an event received from the peer. The event is mirrored into the
    /// local frame before dispatch; resulting local events go to the local
    /// UI only, never back across the wire.
    pub fn apply_remote(&mut self, event: MatchEvent) -> EngineResult<()> {
        match event.mirrored() {
            MatchEvent::Start { first } => self.begin(first, &[Role::LocalUi]),
            MatchEvent::Move {
                src, dest, turn, ..
            } => {
                self.submit(turn, src, dest, &[Role::LocalUi])?;
                Ok(())
            }
            MatchEvent::End { winner, reason } => {
                self.finish(winner, reason, &[Role::LocalUi]);
                Ok(())
            }
        }
    }

    /// Apply a deferred adversary move. Returns `Ok(None)` when the move was
    /// planned before the last reset and is discarded.
    pub fn submit_planned(
        &mut self,
        planned: PlannedMove,
    ) -> EngineResult<Option<MatchEvent>> {
        if planned.epoch != self.epoch {
            return Ok(None);
        }
        // The adversary already mirrored the move into this frame.
        self.submit(Owner::Enemy, planned.src, planned.dest, &[Role::LocalUi])
            .map(Some)
    }

    /// Resolve a side having no legal move: the opponent wins. Never a
    /// crash, never a silent pass.
    pub fn declare_no_moves(&mut self, stuck: Owner) -> EngineResult<GameOutcome> {
        if self.status != MatchStatus::InProgress {
            return Err(EngineError::MatchNotStarted);
        }
        let outcome = GameOutcome {
            winner: stuck.opponent(),
            reason: EndReason::NoLegalMoves,
        };
        self.finish(
            outcome.winner,
            outcome.reason,
            &[Role::LocalUi, self.opponent_role],
        );
        Ok(outcome)
    }

    /// Abandon the current game and return to the pre-start state. Bumps the
    /// epoch so moves planned against the old board are discarded.
    pub fn reset(&mut self) {
        self.board = Board::initial();
        self.status = MatchStatus::WaitingForFirstPlayer;
        self.first = None;
        self.current = None;
        self.outcome = None;
        self.epoch += 1;
    }

    fn submit(
        &mut self,
        mover: Owner,
        src: Square,
        dest: Square,
        targets: &[Role],
    ) -> EngineResult<MatchEvent> {
        match self.status {
            MatchStatus::WaitingForFirstPlayer => return Err(EngineError::MatchNotStarted),
            MatchStatus::Finished => return Err(EngineError::MatchOver),
            MatchStatus::InProgress => {}
        }
        if self.current != Some(mover) {
            return Err(EngineError::NotYourTurn { mover });
        }
        let piece = self
            .board
            .piece_at(src)
            .ok_or(EngineError::InvalidSquare { square: src })?;
        if piece.owner != mover {
            return Err(EngineError::IllegalMove { from: src, to: dest });
        }

        let outcome = apply_move(&self.board, src, dest, self.rule)?;
        self.board = outcome.board;

        let event = MatchEvent::Move {
            src,
            dest,
            turn: mover,
            captured: outcome.captured,
            promoted: outcome.promoted,
        };
        self.bus.emit(targets, event);

        if outcome.captured.is_some_and(|p| p.kind == Kind::Lion) {
            self.finish(mover, EndReason::LionCaptured, targets);
            return Ok(event);
        }

        let next = mover.opponent();
        self.current = Some(next);

        // The far-rank rule: a Lion standing on the opponent's back rank
        // when its owner's turn comes around again has survived a full turn.
        if self.board.lion_holds_far_rank(next) {
            self.finish(next, EndReason::LionHeldFarRank, targets);
        }

        Ok(event)
    }

    fn finish(&mut self, winner: Owner, reason: EndReason, targets: &[Role]) {
        self.status = MatchStatus::Finished;
        self.current = None;
        self.outcome = Some(GameOutcome { winner, reason });
        self.bus.emit(targets, MatchEvent::End { winner, reason });
    }
}
