// Interface adapters: wire encodings, socket driver and local IO.

pub mod keyboard;
pub mod net;
pub mod protocol;
pub mod schema;
pub mod surface;
