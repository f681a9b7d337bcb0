//! Room lifecycle and relay dispatch, driven end to end against fake
//! clients backed by plain channels.

use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use uuid::Uuid;

use backend::relay;
use backend::rooms::{Client, Registry, SharedRegistry};

fn registry() -> SharedRegistry {
    Arc::new(Mutex::new(Registry::new()))
}

fn connect(registry: &SharedRegistry) -> (Uuid, UnboundedReceiver<String>) {
    let id = Uuid::new_v4();
    let (tx, rx) = mpsc::unbounded_channel();
    registry.lock().unwrap().register(Client::new(id, tx));
    (id, rx)
}

fn drain(rx: &mut UnboundedReceiver<String>) -> Vec<Value> {
    let mut frames = Vec::new();
    while let Ok(text) = rx.try_recv() {
        frames.push(serde_json::from_str(&text).expect("server sends valid JSON"));
    }
    frames
}

fn find<'a>(frames: &'a [Value], action: &str) -> Option<&'a Value> {
    frames.iter().find(|frame| frame["action"] == action)
}

fn create_room(registry: &SharedRegistry, id: Uuid, rx: &mut UnboundedReceiver<String>) -> String {
    relay::dispatch(registry, id, r#"{"action":"CREATE_ROOM","data":{}}"#);
    let frames = drain(rx);
    let reply = find(&frames, "CREATE_ROOM").expect("create reply");
    assert_eq!(reply["success"], true);
    reply["roomId"].as_str().expect("room id").to_string()
}

fn join_room(registry: &SharedRegistry, id: Uuid, room_id: &str) {
    let frame = format!(r#"{{"action":"JOIN_ROOM","data":{{"roomId":"{room_id}"}}}}"#);
    relay::dispatch(registry, id, &frame);
}

#[test]
fn test_create_join_and_room_full() {
    let registry = registry();
    let (a, mut a_rx) = connect(&registry);
    let (b, mut b_rx) = connect(&registry);
    let (c, mut c_rx) = connect(&registry);

    let room_id = create_room(&registry, a, &mut a_rx);

    // Create is announced lobby-wide.
    let b_frames = drain(&mut b_rx);
    assert_eq!(find(&b_frames, "NEW_ROOM").expect("broadcast")["roomId"], room_id.as_str());

    join_room(&registry, b, &room_id);
    let b_frames = drain(&mut b_rx);
    let reply = find(&b_frames, "JOIN_ROOM").expect("join reply");
    assert_eq!(reply["success"], true);
    assert_eq!(reply["roomId"], room_id.as_str());

    // The master hears about the joiner, and everyone sees the member count
    // change.
    let a_frames = drain(&mut a_rx);
    assert_eq!(
        find(&a_frames, "MEMBER_JOINED").expect("master notified")["id"],
        b.to_string().as_str()
    );
    assert!(find(&a_frames, "PLUS_ROOM_MEMBER").is_some());

    // A third join must fail with a full-room error and change nothing.
    join_room(&registry, c, &room_id);
    let c_frames = drain(&mut c_rx);
    let reply = find(&c_frames, "JOIN_ROOM").expect("join reply");
    assert_eq!(reply["success"], false);
    assert_eq!(reply["err"], "full");

    relay::dispatch(&registry, c, r#"{"action":"FETCH_ROOM","data":{}}"#);
    let c_frames = drain(&mut c_rx);
    let listing = &find(&c_frames, "FETCH_ROOM").expect("fetch reply")["data"]["roomList"];
    assert_eq!(listing.as_array().expect("room list").len(), 1);
    assert_eq!(listing[0]["members"].as_array().expect("members").len(), 2);
    assert_eq!(listing[0]["status"], "play");
}

#[test]
fn test_join_missing_room_reports_no_room() {
    let registry = registry();
    let (a, mut a_rx) = connect(&registry);
    join_room(&registry, a, "nope");
    let frames = drain(&mut a_rx);
    let reply = find(&frames, "JOIN_ROOM").expect("join reply");
    assert_eq!(reply["success"], false);
    assert_eq!(reply["err"], "no room");
}

#[test]
fn test_create_while_in_a_room_is_rejected() {
    let registry = registry();
    let (a, mut a_rx) = connect(&registry);
    create_room(&registry, a, &mut a_rx);

    relay::dispatch(&registry, a, r#"{"action":"CREATE_ROOM","data":{}}"#);
    let frames = drain(&mut a_rx);
    let reply = find(&frames, "CREATE_ROOM").expect("create reply");
    assert_eq!(reply["success"], false);
    assert_eq!(reply["err"], "already in a room");
}

#[test]
fn test_leave_destroys_room_when_sole_member() {
    let registry = registry();
    let (a, mut a_rx) = connect(&registry);
    let room_id = create_room(&registry, a, &mut a_rx);

    relay::dispatch(&registry, a, r#"{"action":"LEAVE_ROOM","data":{}}"#);
    let frames = drain(&mut a_rx);
    let reply = find(&frames, "LEAVE_ROOM").expect("leave reply");
    assert_eq!(reply["success"], true);
    assert_eq!(reply["roomId"], room_id.as_str());
    assert!(find(&frames, "MINUS_ROOM_MEMBER").is_some());

    relay::dispatch(&registry, a, r#"{"action":"FETCH_ROOM","data":{}}"#);
    let frames = drain(&mut a_rx);
    let listing = &find(&frames, "FETCH_ROOM").expect("fetch reply")["data"]["roomList"];
    assert_eq!(listing.as_array().expect("room list").len(), 0, "room gone");
}

#[test]
fn test_leave_notifies_remaining_member_and_reopens_room() {
    let registry = registry();
    let (a, mut a_rx) = connect(&registry);
    let (b, mut b_rx) = connect(&registry);
    let room_id = create_room(&registry, a, &mut a_rx);
    join_room(&registry, b, &room_id);
    drain(&mut a_rx);
    drain(&mut b_rx);

    relay::dispatch(&registry, a, r#"{"action":"LEAVE_ROOM","data":{}}"#);
    let b_frames = drain(&mut b_rx);
    assert_eq!(
        find(&b_frames, "MEMBER_LEFT").expect("remaining member notified")["id"],
        a.to_string().as_str()
    );

    relay::dispatch(&registry, b, r#"{"action":"FETCH_ROOM","data":{}}"#);
    let b_frames = drain(&mut b_rx);
    let listing = &find(&b_frames, "FETCH_ROOM").expect("fetch reply")["data"]["roomList"];
    assert_eq!(listing[0]["status"], "wait", "room waits for a new opponent");
}

#[test]
fn test_disconnect_is_an_implicit_leave() {
    let registry = registry();
    let (a, mut a_rx) = connect(&registry);
    let (b, mut b_rx) = connect(&registry);
    let room_id = create_room(&registry, a, &mut a_rx);
    join_room(&registry, b, &room_id);
    drain(&mut b_rx);

    relay::disconnect(&registry, a);
    let b_frames = drain(&mut b_rx);
    assert!(find(&b_frames, "MEMBER_LEFT").is_some());
    assert!(find(&b_frames, "MINUS_ROOM_MEMBER").is_some());
}

#[test]
fn test_game_event_forwarded_to_peer_only() {
    let registry = registry();
    let (a, mut a_rx) = connect(&registry);
    let (b, mut b_rx) = connect(&registry);
    let (c, mut c_rx) = connect(&registry);
    let room_id = create_room(&registry, a, &mut a_rx);
    join_room(&registry, b, &room_id);
    drain(&mut a_rx);
    drain(&mut b_rx);
    drain(&mut c_rx);

    relay::dispatch(
        &registry,
        a,
        r#"{"action":"GAME_EVENT","data":{"payload":{"cmd":"move","data":{"src":4,"dest":7,"turn":"mine"}}}}"#,
    );

    let a_frames = drain(&mut a_rx);
    let reply = find(&a_frames, "GAME_EVENT").expect("sender gets a reply");
    assert_eq!(reply["success"], true);

    let b_frames = drain(&mut b_rx);
    let forwarded = find(&b_frames, "GAME_EVENT_RELAY").expect("peer gets the payload");
    assert_eq!(forwarded["payload"]["cmd"], "move");
    assert_eq!(forwarded["payload"]["data"]["src"], 4);

    assert!(drain(&mut c_rx).is_empty(), "outsiders see nothing");
}

#[test]
fn test_game_event_without_peer_is_an_error() {
    let registry = registry();
    let (a, mut a_rx) = connect(&registry);
    create_room(&registry, a, &mut a_rx);

    relay::dispatch(
        &registry,
        a,
        r#"{"action":"GAME_EVENT","data":{"payload":{"cmd":"start","data":{"first":"mine"}}}}"#,
    );
    let frames = drain(&mut a_rx);
    let reply = find(&frames, "GAME_EVENT").expect("reply");
    assert_eq!(reply["success"], false);
    assert_eq!(reply["err"], "no peer in room");
}

#[test]
fn test_malformed_frames_get_structured_errors() {
    let registry = registry();
    let (a, mut a_rx) = connect(&registry);

    relay::dispatch(&registry, a, "not json at all");
    let frames = drain(&mut a_rx);
    assert_eq!(frames[0]["success"], false);
    assert_eq!(frames[0]["err"], "invalid request");

    relay::dispatch(&registry, a, r#"{"action":"EXPLODE","data":{}}"#);
    let frames = drain(&mut a_rx);
    assert_eq!(frames[0]["action"], "EXPLODE");
    assert_eq!(frames[0]["err"], "invalid action");

    relay::dispatch(&registry, a, r#"{"action":"JOIN_ROOM","data":{}}"#);
    let frames = drain(&mut a_rx);
    assert_eq!(frames[0]["action"], "JOIN_ROOM");
    assert_eq!(frames[0]["err"], "invalid input data");

    // None of it created state.
    relay::dispatch(&registry, a, r#"{"action":"FETCH_ROOM","data":{}}"#);
    let frames = drain(&mut a_rx);
    let listing = &find(&frames, "FETCH_ROOM").expect("fetch reply")["data"]["roomList"];
    assert_eq!(listing.as_array().expect("room list").len(), 0);
}

#[test]
fn test_nicknames_show_up_in_the_lobby_listing() {
    let registry = registry();
    let (a, mut a_rx) = connect(&registry);
    let (b, mut b_rx) = connect(&registry);

    relay::dispatch(
        &registry,
        a,
        r#"{"action":"SET_NICK","data":{"nickname":"lion-tamer"}}"#,
    );
    let frames = drain(&mut a_rx);
    assert_eq!(find(&frames, "SET_NICK").expect("reply")["success"], true);

    let room_id = create_room(&registry, a, &mut a_rx);
    join_room(&registry, b, &room_id);
    drain(&mut b_rx);

    relay::dispatch(&registry, b, r#"{"action":"FETCH_ROOM","data":{}}"#);
    let frames = drain(&mut b_rx);
    let members = &find(&frames, "FETCH_ROOM").expect("fetch reply")["data"]["roomList"][0]["members"];
    assert_eq!(members[0], "lion-tamer");
    assert_eq!(members[1], Value::Null, "b never set a nickname");
}
