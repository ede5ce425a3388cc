// FlatBuffers accessors and builders for schema/world.fbs, in the shape flatc emits.
// Slot offsets follow field declaration order in the .fbs; the slot tests in
// protocol/table.rs build frames from raw offsets and pin them.

use flatbuffers::{
    FlatBufferBuilder, Follow, ForwardsUOffset, InvalidFlatbuffer, Push, Table,
    TableUnfinishedWIPOffset, UnionWIPOffset, VOffsetT, Vector, Verifiable, Verifier, WIPOffset,
};
use std::fmt;

/// Discriminant of the `Message` union as stored in `MessageRoot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    None,
    WorldState,
    GameParams,
    Unknown(u8),
}

impl MessageType {
    pub const fn from_tag(tag: u8) -> Self {
        match tag {
            0 => MessageType::None,
            1 => MessageType::WorldState,
            2 => MessageType::GameParams,
            other => MessageType::Unknown(other),
        }
    }

    pub const fn tag(self) -> u8 {
        match self {
            MessageType::None => 0,
            MessageType::WorldState => 1,
            MessageType::GameParams => 2,
            MessageType::Unknown(other) => other,
        }
    }
}

// ---------------------------------------------------------------------------
// Vec2

/// Inline struct: two little-endian `f32`s, 4-byte aligned.
#[repr(C, align(4))]
#[derive(Clone, Copy, PartialEq, Default)]
pub struct Vec2(pub [u8; 8]);

impl fmt::Debug for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vec2")
            .field("x", &self.x())
            .field("y", &self.y())
            .finish()
    }
}

impl<'a> Follow<'a> for Vec2 {
    type Inner = Vec2;
    #[inline]
    unsafe fn follow(buf: &'a [u8], loc: usize) -> Self::Inner {
        let mut bytes = [0u8; Vec2::SIZE];
        if let Some(src) = buf.get(loc..loc + Vec2::SIZE) {
            bytes.copy_from_slice(src);
        }
        Vec2(bytes)
    }
}

impl Push for Vec2 {
    type Output = Vec2;
    #[inline]
    unsafe fn push(&self, dst: &mut [u8], _written_len: usize) {
        dst.copy_from_slice(&self.0);
    }
}

impl Verifiable for Vec2 {
    #[inline]
    fn run_verifier(v: &mut Verifier, pos: usize) -> Result<(), InvalidFlatbuffer> {
        v.in_buffer::<Self>(pos)
    }
}

impl Vec2 {
    pub const SIZE: usize = 8;

    pub fn new(x: f32, y: f32) -> Self {
        let mut bytes = [0u8; Vec2::SIZE];
        bytes[..4].copy_from_slice(&x.to_le_bytes());
        bytes[4..].copy_from_slice(&y.to_le_bytes());
        Self(bytes)
    }

    pub fn x(&self) -> f32 {
        let [a, b, c, d, ..] = self.0;
        f32::from_le_bytes([a, b, c, d])
    }

    pub fn y(&self) -> f32 {
        let [.., a, b, c, d] = self.0;
        f32::from_le_bytes([a, b, c, d])
    }
}

// ---------------------------------------------------------------------------
// Tank

#[derive(Copy, Clone, PartialEq)]
pub struct Tank<'a> {
    pub _tab: Table<'a>,
}

impl<'a> Follow<'a> for Tank<'a> {
    type Inner = Tank<'a>;
    #[inline]
    unsafe fn follow(buf: &'a [u8], loc: usize) -> Self::Inner {
        Self {
            _tab: unsafe { Table::new(buf, loc) },
        }
    }
}

impl<'a> Tank<'a> {
    pub const VT_POS: VOffsetT = 4;
    pub const VT_ID: VOffsetT = 6;

    pub fn create<'bldr: 'args, 'args: 'mut_bldr, 'mut_bldr>(
        fbb: &'mut_bldr mut FlatBufferBuilder<'bldr>,
        args: &'args TankArgs,
    ) -> WIPOffset<Tank<'bldr>> {
        let start = fbb.start_table();
        if let Some(id) = args.id {
            fbb.push_slot_always::<u64>(Tank::VT_ID, id);
        }
        if let Some(pos) = args.pos {
            fbb.push_slot_always::<Vec2>(Tank::VT_POS, pos);
        }
        finish_table(fbb, start)
    }

    #[inline]
    pub fn pos(&self) -> Option<Vec2> {
        // Safety: verified table with an inline struct in this slot.
        unsafe { self._tab.get::<Vec2>(Tank::VT_POS, None) }
    }

    /// Absent on frames from servers that only send positions.
    #[inline]
    pub fn id(&self) -> Option<u64> {
        unsafe { self._tab.get::<u64>(Tank::VT_ID, None) }
    }
}

impl Verifiable for Tank<'_> {
    #[inline]
    fn run_verifier(v: &mut Verifier, pos: usize) -> Result<(), InvalidFlatbuffer> {
        v.visit_table(pos)?
            .visit_field::<Vec2>("pos", Self::VT_POS, false)?
            .visit_field::<u64>("id", Self::VT_ID, false)?
            .finish();
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TankArgs {
    pub pos: Option<Vec2>,
    pub id: Option<u64>,
}

// ---------------------------------------------------------------------------
// WorldState

#[derive(Copy, Clone, PartialEq)]
pub struct WorldState<'a> {
    pub _tab: Table<'a>,
}

impl<'a> Follow<'a> for WorldState<'a> {
    type Inner = WorldState<'a>;
    #[inline]
    unsafe fn follow(buf: &'a [u8], loc: usize) -> Self::Inner {
        Self {
            _tab: unsafe { Table::new(buf, loc) },
        }
    }
}

impl<'a> WorldState<'a> {
    pub const VT_PLAYER: VOffsetT = 4;
    pub const VT_OTHERS: VOffsetT = 6;

    pub fn create<'bldr: 'args, 'args: 'mut_bldr, 'mut_bldr>(
        fbb: &'mut_bldr mut FlatBufferBuilder<'bldr>,
        args: &'args WorldStateArgs<'args>,
    ) -> WIPOffset<WorldState<'bldr>> {
        let start = fbb.start_table();
        if let Some(others) = args.others {
            fbb.push_slot_always::<WIPOffset<_>>(WorldState::VT_OTHERS, others);
        }
        if let Some(player) = args.player {
            fbb.push_slot_always::<WIPOffset<_>>(WorldState::VT_PLAYER, player);
        }
        finish_table(fbb, start)
    }

    #[inline]
    pub fn player(&self) -> Option<Tank<'a>> {
        unsafe { self._tab.get::<ForwardsUOffset<Tank>>(WorldState::VT_PLAYER, None) }
    }

    #[inline]
    pub fn others(&self) -> Option<Vector<'a, ForwardsUOffset<Tank<'a>>>> {
        unsafe {
            self._tab
                .get::<ForwardsUOffset<Vector<'a, ForwardsUOffset<Tank>>>>(
                    WorldState::VT_OTHERS,
                    None,
                )
        }
    }
}

impl Verifiable for WorldState<'_> {
    #[inline]
    fn run_verifier(v: &mut Verifier, pos: usize) -> Result<(), InvalidFlatbuffer> {
        v.visit_table(pos)?
            .visit_field::<ForwardsUOffset<Tank>>("player", Self::VT_PLAYER, false)?
            .visit_field::<ForwardsUOffset<Vector<'_, ForwardsUOffset<Tank>>>>(
                "others",
                Self::VT_OTHERS,
                false,
            )?
            .finish();
        Ok(())
    }
}

#[derive(Default)]
pub struct WorldStateArgs<'a> {
    pub player: Option<WIPOffset<Tank<'a>>>,
    pub others: Option<WIPOffset<Vector<'a, ForwardsUOffset<Tank<'a>>>>>,
}

// ---------------------------------------------------------------------------
// GameParams

#[derive(Copy, Clone, PartialEq)]
pub struct GameParams<'a> {
    pub _tab: Table<'a>,
}

impl<'a> Follow<'a> for GameParams<'a> {
    type Inner = GameParams<'a>;
    #[inline]
    unsafe fn follow(buf: &'a [u8], loc: usize) -> Self::Inner {
        Self {
            _tab: unsafe { Table::new(buf, loc) },
        }
    }
}

impl<'a> GameParams<'a> {
    pub const VT_WIDTH: VOffsetT = 4;
    pub const VT_HEIGHT: VOffsetT = 6;
    pub const VT_TICK_RATE: VOffsetT = 8;

    pub fn create<'bldr: 'args, 'args: 'mut_bldr, 'mut_bldr>(
        fbb: &'mut_bldr mut FlatBufferBuilder<'bldr>,
        args: &'args GameParamsArgs,
    ) -> WIPOffset<GameParams<'bldr>> {
        let start = fbb.start_table();
        fbb.push_slot::<u16>(GameParams::VT_TICK_RATE, args.tick_rate, 0);
        fbb.push_slot::<u16>(GameParams::VT_HEIGHT, args.height, 0);
        fbb.push_slot::<u16>(GameParams::VT_WIDTH, args.width, 0);
        finish_table(fbb, start)
    }

    #[inline]
    pub fn width(&self) -> u16 {
        unsafe { self._tab.get::<u16>(GameParams::VT_WIDTH, Some(0)) }.unwrap_or(0)
    }

    #[inline]
    pub fn height(&self) -> u16 {
        unsafe { self._tab.get::<u16>(GameParams::VT_HEIGHT, Some(0)) }.unwrap_or(0)
    }

    #[inline]
    pub fn tick_rate(&self) -> u16 {
        unsafe { self._tab.get::<u16>(GameParams::VT_TICK_RATE, Some(0)) }.unwrap_or(0)
    }
}

impl Verifiable for GameParams<'_> {
    #[inline]
    fn run_verifier(v: &mut Verifier, pos: usize) -> Result<(), InvalidFlatbuffer> {
        v.visit_table(pos)?
            .visit_field::<u16>("width", Self::VT_WIDTH, false)?
            .visit_field::<u16>("height", Self::VT_HEIGHT, false)?
            .visit_field::<u16>("tick_rate", Self::VT_TICK_RATE, false)?
            .finish();
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GameParamsArgs {
    pub width: u16,
    pub height: u16,
    pub tick_rate: u16,
}

// ---------------------------------------------------------------------------
// MessageRoot

#[derive(Copy, Clone, PartialEq)]
pub struct MessageRoot<'a> {
    pub _tab: Table<'a>,
}

impl<'a> Follow<'a> for MessageRoot<'a> {
    type Inner = MessageRoot<'a>;
    #[inline]
    unsafe fn follow(buf: &'a [u8], loc: usize) -> Self::Inner {
        Self {
            _tab: unsafe { Table::new(buf, loc) },
        }
    }
}

impl<'a> MessageRoot<'a> {
    pub const VT_MESSAGE_TYPE: VOffsetT = 4;
    pub const VT_MESSAGE: VOffsetT = 6;

    pub fn create<'bldr: 'args, 'args: 'mut_bldr, 'mut_bldr>(
        fbb: &'mut_bldr mut FlatBufferBuilder<'bldr>,
        args: &'args MessageRootArgs,
    ) -> WIPOffset<MessageRoot<'bldr>> {
        let start = fbb.start_table();
        if let Some(message) = args.message {
            fbb.push_slot_always::<WIPOffset<_>>(MessageRoot::VT_MESSAGE, message);
        }
        fbb.push_slot::<u8>(MessageRoot::VT_MESSAGE_TYPE, args.message_type.tag(), 0);
        finish_table(fbb, start)
    }

    #[inline]
    pub fn message_type(&self) -> MessageType {
        let tag = unsafe { self._tab.get::<u8>(MessageRoot::VT_MESSAGE_TYPE, Some(0)) };
        MessageType::from_tag(tag.unwrap_or(0))
    }

    #[inline]
    pub fn message(&self) -> Option<Table<'a>> {
        unsafe {
            self._tab
                .get::<ForwardsUOffset<Table<'a>>>(MessageRoot::VT_MESSAGE, None)
        }
    }

    pub fn message_as_world_state(&self) -> Option<WorldState<'a>> {
        if self.message_type() == MessageType::WorldState {
            // The verifier already checked the union value against its tag.
            self.message().map(|table| WorldState { _tab: table })
        } else {
            None
        }
    }

    pub fn message_as_game_params(&self) -> Option<GameParams<'a>> {
        if self.message_type() == MessageType::GameParams {
            self.message().map(|table| GameParams { _tab: table })
        } else {
            None
        }
    }
}

impl Verifiable for MessageRoot<'_> {
    #[inline]
    fn run_verifier(v: &mut Verifier, pos: usize) -> Result<(), InvalidFlatbuffer> {
        v.visit_table(pos)?
            .visit_union::<u8, _>(
                "message_type",
                Self::VT_MESSAGE_TYPE,
                "message",
                Self::VT_MESSAGE,
                false,
                |key, v, pos| match MessageType::from_tag(key) {
                    MessageType::WorldState => v
                        .verify_union_variant::<ForwardsUOffset<WorldState>>(
                            "Message::WorldState",
                            pos,
                        ),
                    MessageType::GameParams => v
                        .verify_union_variant::<ForwardsUOffset<GameParams>>(
                            "Message::GameParams",
                            pos,
                        ),
                    // Unknown variants stay opaque; the caller reports them.
                    MessageType::None | MessageType::Unknown(_) => Ok(()),
                },
            )?
            .finish();
        Ok(())
    }
}

pub struct MessageRootArgs {
    pub message_type: MessageType,
    pub message: Option<WIPOffset<UnionWIPOffset>>,
}

impl Default for MessageRootArgs {
    fn default() -> Self {
        Self {
            message_type: MessageType::None,
            message: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Action

#[derive(Copy, Clone, PartialEq)]
pub struct Action<'a> {
    pub _tab: Table<'a>,
}

impl<'a> Follow<'a> for Action<'a> {
    type Inner = Action<'a>;
    #[inline]
    unsafe fn follow(buf: &'a [u8], loc: usize) -> Self::Inner {
        Self {
            _tab: unsafe { Table::new(buf, loc) },
        }
    }
}

impl<'a> Action<'a> {
    pub const VT_KEYS: VOffsetT = 4;

    pub fn create<'bldr: 'args, 'args: 'mut_bldr, 'mut_bldr>(
        fbb: &'mut_bldr mut FlatBufferBuilder<'bldr>,
        args: &'args ActionArgs<'args>,
    ) -> WIPOffset<Action<'bldr>> {
        let start = fbb.start_table();
        if let Some(keys) = args.keys {
            fbb.push_slot_always::<WIPOffset<_>>(Action::VT_KEYS, keys);
        }
        finish_table(fbb, start)
    }

    #[inline]
    pub fn keys(&self) -> Option<Vector<'a, u8>> {
        unsafe {
            self._tab
                .get::<ForwardsUOffset<Vector<'a, u8>>>(Action::VT_KEYS, None)
        }
    }
}

impl Verifiable for Action<'_> {
    #[inline]
    fn run_verifier(v: &mut Verifier, pos: usize) -> Result<(), InvalidFlatbuffer> {
        v.visit_table(pos)?
            .visit_field::<ForwardsUOffset<Vector<'_, u8>>>("keys", Self::VT_KEYS, false)?
            .finish();
        Ok(())
    }
}

#[derive(Default)]
pub struct ActionArgs<'a> {
    pub keys: Option<WIPOffset<Vector<'a, u8>>>,
}

fn finish_table<'bldr, T>(
    fbb: &mut FlatBufferBuilder<'bldr>,
    start: WIPOffset<TableUnfinishedWIPOffset>,
) -> WIPOffset<T> {
    let end = fbb.end_table(start);
    WIPOffset::new(end.value())
}
