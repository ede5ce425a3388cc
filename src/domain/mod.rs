// Domain layer: coordinates, world snapshots, input state and the ports the core relies on.

pub mod geometry;
pub mod input;
pub mod ports;
pub mod world;

pub use geometry::{Point, Scale, ScaleError, ScreenPoint, to_screen, to_world};
pub use input::{ActionPayload, Direction, InputState, KeyEvent};
pub use ports::{Color, Surface, WireCodec};
pub use world::{DecodeResult, Entity, EntityId, EntityRole, GameParams, WorldSnapshot};
