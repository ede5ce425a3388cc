use super::{CodecError, direction_for_code, key_code};
use crate::domain::{
    ActionPayload, DecodeResult, Entity, EntityId, EntityRole, GameParams, Point, WireCodec,
    WorldSnapshot,
};
use crate::interface_adapters::schema::table::{
    self as fb, Action, ActionArgs, GameParamsArgs, MessageRoot, MessageRootArgs, MessageType,
    Tank, TankArgs, Vec2, WorldState, WorldStateArgs,
};

use flatbuffers::{FlatBufferBuilder, WIPOffset};
use tracing::debug;

const BUILDER_CAPACITY: usize = 1024;

/// FlatBuffers `MessageRoot` / `Action` encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableCodec;

impl TableCodec {
    pub fn try_decode(&self, frame: &[u8]) -> Result<DecodeResult, CodecError> {
        // Verify before touching any accessor.
        let root = flatbuffers::root::<MessageRoot>(frame)?;
        match root.message_type() {
            MessageType::WorldState => root
                .message_as_world_state()
                .map(|world| DecodeResult::Heartbeat(snapshot_from_world(world)))
                .ok_or(CodecError::Empty),
            MessageType::GameParams => root
                .message_as_game_params()
                .map(|params| {
                    DecodeResult::GameParams(GameParams {
                        width: u32::from(params.width()),
                        height: u32::from(params.height()),
                        tick_rate: u32::from(params.tick_rate()),
                    })
                })
                .ok_or(CodecError::Empty),
            MessageType::None => Err(CodecError::Empty),
            MessageType::Unknown(tag) => Err(CodecError::UnknownType(tag)),
        }
    }

    /// Server-side encoding of a snapshot, used by fake servers and tests.
    /// The first `Player` entity becomes `player`; every other entity goes to `others`.
    pub fn encode_heartbeat(&self, snapshot: &WorldSnapshot) -> Vec<u8> {
        let mut fbb = FlatBufferBuilder::with_capacity(BUILDER_CAPACITY);

        let player_index = snapshot
            .entities
            .iter()
            .position(|entity| entity.role == EntityRole::Player);
        let player = player_index.map(|i| create_tank(&mut fbb, &snapshot.entities[i]));
        let others: Vec<WIPOffset<Tank>> = snapshot
            .entities
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != player_index)
            .map(|(_, entity)| create_tank(&mut fbb, entity))
            .collect();
        let others = fbb.create_vector(&others);

        let world = WorldState::create(
            &mut fbb,
            &WorldStateArgs {
                player,
                others: Some(others),
            },
        );
        let root = MessageRoot::create(
            &mut fbb,
            &MessageRootArgs {
                message_type: MessageType::WorldState,
                message: Some(world.as_union_value()),
            },
        );
        fbb.finish(root, None);
        fbb.finished_data().to_vec()
    }

    /// Values above `u16::MAX` saturate; the table stores shorts.
    pub fn encode_game_params(&self, params: &GameParams) -> Vec<u8> {
        let clamp = |v: u32| u16::try_from(v).unwrap_or(u16::MAX);
        let mut fbb = FlatBufferBuilder::with_capacity(BUILDER_CAPACITY);
        let params = fb::GameParams::create(
            &mut fbb,
            &GameParamsArgs {
                width: clamp(params.width),
                height: clamp(params.height),
                tick_rate: clamp(params.tick_rate),
            },
        );
        let root = MessageRoot::create(
            &mut fbb,
            &MessageRootArgs {
                message_type: MessageType::GameParams,
                message: Some(params.as_union_value()),
            },
        );
        fbb.finish(root, None);
        fbb.finished_data().to_vec()
    }

    /// Server-side view of an outbound action frame.
    pub fn decode_action(&self, frame: &[u8]) -> Result<ActionPayload, CodecError> {
        let action = flatbuffers::root::<Action>(frame)?;
        action
            .keys()
            .map(|keys| keys.iter().map(|code| direction_for_code(i32::from(code))).collect())
            .unwrap_or_else(|| Ok(ActionPayload::default()))
    }
}

fn create_tank<'bldr>(
    fbb: &mut FlatBufferBuilder<'bldr>,
    entity: &Entity,
) -> WIPOffset<Tank<'bldr>> {
    Tank::create(
        fbb,
        &TankArgs {
            pos: entity
                .position
                .map(|p| Vec2::new(p.x as f32, p.y as f32)),
            id: Some(entity.id.0),
        },
    )
}

// Tanks without an id are numbered by their place in the snapshot.
fn entity_from_tank(tank: Tank<'_>, role: EntityRole, index: usize) -> Entity {
    Entity {
        id: EntityId(tank.id().unwrap_or(index as u64)),
        position: tank
            .pos()
            .map(|pos| Point::new(f64::from(pos.x()), f64::from(pos.y()))),
        role,
    }
}

fn snapshot_from_world(world: WorldState<'_>) -> WorldSnapshot {
    // Own tank first, then everyone else in wire order.
    let player = world.player().map(|tank| (tank, EntityRole::Player));
    let others = world
        .others()
        .into_iter()
        .flat_map(|tanks| tanks.iter())
        .map(|tank| (tank, EntityRole::Other));

    WorldSnapshot {
        entities: player
            .into_iter()
            .chain(others)
            .enumerate()
            .map(|(index, (tank, role))| entity_from_tank(tank, role, index))
            .collect(),
    }
}

impl WireCodec for TableCodec {
    fn schema_name(&self) -> &'static str {
        "table"
    }

    fn decode(&self, frame: &[u8]) -> DecodeResult {
        match self.try_decode(frame) {
            Ok(result) => result,
            Err(e) => {
                debug!(bytes = frame.len(), error = %e, "unrecognized table frame");
                DecodeResult::Unrecognized
            }
        }
    }

    fn encode_action(&self, action: &ActionPayload) -> Vec<u8> {
        let codes: Vec<u8> = action
            .directions()
            .iter()
            .map(|direction| key_code(*direction))
            .collect();

        let mut fbb = FlatBufferBuilder::with_capacity(64);
        let keys = fbb.create_vector(&codes);
        let action = Action::create(&mut fbb, &ActionArgs { keys: Some(keys) });
        fbb.finish(action, None);
        fbb.finished_data().to_vec()
    }
}
