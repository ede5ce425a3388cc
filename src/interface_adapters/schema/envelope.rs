// Protobuf messages for the variant-tagged envelope encoding.
// Kept in sync by hand with schema/envelope.proto; there is no build step.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Vec2 {
    #[prost(float, tag = "1")]
    pub x: f32,
    #[prost(float, tag = "2")]
    pub y: f32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Tank {
    #[prost(message, optional, tag = "1")]
    pub position: ::core::option::Option<Vec2>,
    #[prost(uint64, tag = "2")]
    pub id: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct World {
    #[prost(message, repeated, tag = "1")]
    pub tanks: ::prost::alloc::vec::Vec<Tank>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Heartbeat {
    #[prost(message, optional, tag = "1")]
    pub world: ::core::option::Option<World>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GameParams {
    #[prost(uint32, tag = "1")]
    pub width: u32,
    #[prost(uint32, tag = "2")]
    pub height: u32,
    #[prost(uint32, tag = "3")]
    pub tick_rate: u32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ServerMessage {
    #[prost(oneof = "server_message::Message", tags = "1, 2")]
    pub message: ::core::option::Option<server_message::Message>,
}

pub mod server_message {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Message {
        #[prost(message, tag = "1")]
        Heartbeat(super::Heartbeat),
        #[prost(message, tag = "2")]
        GameParams(super::GameParams),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum KeyPress {
    Unknown = 0,
    Up = 1,
    Down = 2,
    Left = 3,
    Right = 4,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Action {
    #[prost(enumeration = "KeyPress", repeated, tag = "1")]
    pub actions: ::prost::alloc::vec::Vec<i32>,
}
