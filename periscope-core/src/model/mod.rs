mod client;
mod connection;
mod signaling;

pub use client::{ClientInfo, Role};
pub use connection::ConnectionId;
pub use signaling::{Addressing, ClientMessage, ServerMessage};
