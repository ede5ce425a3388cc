// Use cases layer: rendering and the connection state machine.

pub mod render;
pub mod session;

pub use render::{GRID_LINE_WIDTH, GridRenderer, Palette, RenderStats};
pub use session::{ConnectionState, FrameOutcome, InboundFrame, Session};
