// Decoded world-state types. Rebuilt from scratch for every inbound frame.

use super::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u64);

/// Whether an entity belongs to this client or to someone else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntityRole {
    Player,
    #[default]
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    // Absent positions are kept absent; the renderer skips them.
    pub position: Option<Point>,
    pub role: EntityRole,
}

/// One complete description of the world decoded from a single frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorldSnapshot {
    pub entities: Vec<Entity>,
}

impl WorldSnapshot {
    pub fn positioned(&self) -> impl Iterator<Item = (&Entity, Point)> {
        self.entities
            .iter()
            .filter_map(|entity| entity.position.map(|pos| (entity, pos)))
    }
}

/// Session parameters announced by the server. Acknowledged, never rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameParams {
    pub width: u32,
    pub height: u32,
    pub tick_rate: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DecodeResult {
    Heartbeat(WorldSnapshot),
    GameParams(GameParams),
    Unrecognized,
}
