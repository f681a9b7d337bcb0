pub mod error;
pub mod relay;
pub mod rooms;
pub mod ws;
