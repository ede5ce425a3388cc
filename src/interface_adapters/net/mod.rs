// Socket adapter: connects to the game server and drives a session over it.

pub mod client;

pub use client::{ConnectionStats, NetError, connect, run_connection};
