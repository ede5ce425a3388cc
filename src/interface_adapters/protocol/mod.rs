// Wire codec strategies. One is picked per deployment; the rest of the client
// only sees `DecodeResult` and encoded action bytes.

mod envelope;
mod table;

pub use envelope::EnvelopeCodec;
pub use table::TableCodec;

use crate::domain::{Direction, WireCodec};
use std::{fmt, str::FromStr};

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("protobuf decode failed: {0}")]
    Envelope(#[from] prost::DecodeError),
    #[error("flatbuffer verification failed: {0}")]
    Table(#[from] flatbuffers::InvalidFlatbuffer),
    #[error("message carries no payload")]
    Empty,
    #[error("unknown message type {0}")]
    UnknownType(u8),
    #[error("unknown key code {0}")]
    UnknownKey(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WireSchema {
    #[default]
    Envelope,
    Table,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown wire schema `{0}` (expected `envelope` or `table`)")]
pub struct UnknownSchema(pub String);

impl FromStr for WireSchema {
    type Err = UnknownSchema;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "envelope" | "protobuf" => Ok(WireSchema::Envelope),
            "table" | "flatbuffers" => Ok(WireSchema::Table),
            _ => Err(UnknownSchema(s.to_string())),
        }
    }
}

impl fmt::Display for WireSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireSchema::Envelope => f.write_str("envelope"),
            WireSchema::Table => f.write_str("table"),
        }
    }
}

pub fn codec_for(schema: WireSchema) -> Box<dyn WireCodec> {
    match schema {
        WireSchema::Envelope => Box::new(EnvelopeCodec),
        WireSchema::Table => Box::new(TableCodec),
    }
}

// Both encodings share the same key numbering: 0 is unknown, then canonical order.
pub(crate) fn key_code(direction: Direction) -> u8 {
    match direction {
        Direction::Up => 1,
        Direction::Down => 2,
        Direction::Left => 3,
        Direction::Right => 4,
    }
}

pub(crate) fn direction_for_code(code: i32) -> Result<Direction, CodecError> {
    match code {
        1 => Ok(Direction::Up),
        2 => Ok(Direction::Down),
        3 => Ok(Direction::Left),
        4 => Ok(Direction::Right),
        other => Err(CodecError::UnknownKey(other)),
    }
}
