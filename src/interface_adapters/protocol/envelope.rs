use super::{CodecError, direction_for_code, key_code};
use crate::domain::{
    ActionPayload, DecodeResult, Entity, EntityId, EntityRole, GameParams, Point, WireCodec,
    WorldSnapshot,
};
use crate::interface_adapters::schema::envelope::{
    self as pb, Action, Heartbeat, ServerMessage, Tank, Vec2, World, server_message,
};

use prost::Message;
use tracing::debug;

/// Protobuf `ServerMessage` / `Action` encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeCodec;

impl EnvelopeCodec {
    pub fn try_decode(&self, frame: &[u8]) -> Result<DecodeResult, CodecError> {
        let msg = ServerMessage::decode(frame)?;
        match msg.message {
            Some(server_message::Message::Heartbeat(heartbeat)) => {
                Ok(DecodeResult::Heartbeat(snapshot_from_heartbeat(heartbeat)))
            }
            Some(server_message::Message::GameParams(params)) => {
                Ok(DecodeResult::GameParams(GameParams {
                    width: params.width,
                    height: params.height,
                    tick_rate: params.tick_rate,
                }))
            }
            None => Err(CodecError::Empty),
        }
    }

    /// Server-side encoding of a snapshot, used by fake servers and tests.
    pub fn encode_heartbeat(&self, snapshot: &WorldSnapshot) -> Vec<u8> {
        let tanks = snapshot
            .entities
            .iter()
            .map(|entity| Tank {
                id: entity.id.0,
                position: entity.position.map(|p| Vec2 {
                    x: p.x as f32,
                    y: p.y as f32,
                }),
            })
            .collect();
        ServerMessage {
            message: Some(server_message::Message::Heartbeat(Heartbeat {
                world: Some(World { tanks }),
            })),
        }
        .encode_to_vec()
    }

    pub fn encode_game_params(&self, params: &GameParams) -> Vec<u8> {
        ServerMessage {
            message: Some(server_message::Message::GameParams(pb::GameParams {
                width: params.width,
                height: params.height,
                tick_rate: params.tick_rate,
            })),
        }
        .encode_to_vec()
    }

    /// Server-side view of an outbound action frame.
    pub fn decode_action(&self, frame: &[u8]) -> Result<ActionPayload, CodecError> {
        let action = Action::decode(frame)?;
        action
            .actions
            .into_iter()
            .map(direction_for_code)
            .collect()
    }
}

fn snapshot_from_heartbeat(heartbeat: Heartbeat) -> WorldSnapshot {
    // A heartbeat without a world is an empty world, not a malformed frame.
    let tanks = heartbeat.world.map(|world| world.tanks).unwrap_or_default();
    WorldSnapshot {
        entities: tanks
            .into_iter()
            .map(|tank| Entity {
                id: EntityId(tank.id),
                position: tank
                    .position
                    .map(|pos| Point::new(f64::from(pos.x), f64::from(pos.y))),
                role: EntityRole::Other,
            })
            .collect(),
    }
}

impl WireCodec for EnvelopeCodec {
    fn schema_name(&self) -> &'static str {
        "envelope"
    }

    fn decode(&self, frame: &[u8]) -> DecodeResult {
        match self.try_decode(frame) {
            Ok(result) => result,
            Err(e) => {
                debug!(bytes = frame.len(), error = %e, "unrecognized envelope frame");
                DecodeResult::Unrecognized
            }
        }
    }

    fn encode_action(&self, action: &ActionPayload) -> Vec<u8> {
        Action {
            actions: action
                .directions()
                .iter()
                .map(|direction| i32::from(key_code(*direction)))
                .collect(),
        }
        .encode_to_vec()
    }
}
