// Connection Manager state machine. Performs no IO: the network driver feeds it
// transport events and writes whatever it hands back.

use crate::domain::{
    DecodeResult, Direction, GameParams, InputState, KeyEvent, Surface, WireCodec, WorldSnapshot,
};
use crate::use_cases::render::{GridRenderer, RenderStats};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundFrame<'a> {
    Binary(&'a [u8]),
    Text(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Rendered(RenderStats),
    ParamsAcknowledged(GameParams),
    /// Binary frame the codec did not recognize.
    Unrecognized,
    /// Text frame, or any frame outside `Open`.
    Ignored,
}

pub struct Session<S> {
    state: ConnectionState,
    codec: Box<dyn WireCodec>,
    renderer: GridRenderer<S>,
    input: InputState,
    greeting: String,
    last_params: Option<GameParams>,
    last_snapshot: Option<WorldSnapshot>,
}

impl<S: Surface> Session<S> {
    pub fn new(
        codec: Box<dyn WireCodec>,
        renderer: GridRenderer<S>,
        greeting: impl Into<String>,
    ) -> Self {
        Self {
            state: ConnectionState::Connecting,
            codec,
            renderer,
            input: InputState::new(),
            greeting: greeting.into(),
            last_params: None,
            last_snapshot: None,
        }
    }

    /// Transport reported open. Returns the greeting exactly once.
    pub fn open(&mut self) -> Option<String> {
        if self.state != ConnectionState::Connecting {
            return None;
        }
        self.state = ConnectionState::Open;
        info!(schema = self.codec.schema_name(), "session open");
        Some(self.greeting.clone())
    }

    pub fn handle_frame(&mut self, frame: InboundFrame<'_>) -> FrameOutcome {
        if self.state != ConnectionState::Open {
            return FrameOutcome::Ignored;
        }

        let bytes = match frame {
            InboundFrame::Binary(bytes) => bytes,
            InboundFrame::Text(text) => {
                debug!(len = text.len(), "text frame ignored");
                return FrameOutcome::Ignored;
            }
        };

        // Decoding completes before anything touches the surface, so a bad frame
        // leaves the previous render intact.
        match self.codec.decode(bytes) {
            DecodeResult::Heartbeat(snapshot) => {
                let stats = self.renderer.render(&snapshot);
                debug!(
                    entities = snapshot.entities.len(),
                    drawn = stats.drawn,
                    skipped = stats.skipped,
                    "snapshot rendered"
                );
                self.last_snapshot = Some(snapshot);
                FrameOutcome::Rendered(stats)
            }
            DecodeResult::GameParams(params) => {
                info!(
                    width = params.width,
                    height = params.height,
                    tick_rate = params.tick_rate,
                    "game params received"
                );
                self.last_params = Some(params);
                FrameOutcome::ParamsAcknowledged(params)
            }
            DecodeResult::Unrecognized => FrameOutcome::Unrecognized,
        }
    }

    /// Key events are accepted in any state; only `tick` is gated on `Open`.
    pub fn apply_key(&mut self, event: &KeyEvent) -> Option<Direction> {
        let direction = self.input.apply(event)?;
        debug!(?direction, pressed = event.pressed, "key");
        Some(direction)
    }

    pub fn set_key(&mut self, direction: Direction, held: bool) {
        self.input.set_key(direction, held);
    }

    /// Encoded action for this tick, or `None` when nothing should be sent.
    pub fn tick(&self) -> Option<Vec<u8>> {
        if self.state != ConnectionState::Open {
            return None;
        }
        let action = self.input.encode();
        if action.is_empty() {
            return None;
        }
        Some(self.codec.encode_action(&action))
    }

    pub fn close(&mut self) {
        if self.state != ConnectionState::Closed {
            info!(from = ?self.state, "session closed");
            self.state = ConnectionState::Closed;
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    pub fn schema_name(&self) -> &'static str {
        self.codec.schema_name()
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn renderer(&self) -> &GridRenderer<S> {
        &self.renderer
    }

    pub fn last_params(&self) -> Option<GameParams> {
        self.last_params
    }

    pub fn last_snapshot(&self) -> Option<&WorldSnapshot> {
        self.last_snapshot.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActionPayload, Entity, EntityId, EntityRole, Point, Scale};
    use crate::interface_adapters::surface::CommandSurface;

    const HEARTBEAT: u8 = 1;
    const PARAMS: u8 = 2;

    // Stub codec: first byte picks the message kind, payload is fixed.
    struct StubCodec;

    impl WireCodec for StubCodec {
        fn schema_name(&self) -> &'static str {
            "stub"
        }

        fn decode(&self, frame: &[u8]) -> DecodeResult {
            match frame.first() {
                Some(&HEARTBEAT) => DecodeResult::Heartbeat(WorldSnapshot {
                    entities: vec![
                        Entity {
                            id: EntityId(1),
                            position: Some(Point::new(2.0, 3.0)),
                            role: EntityRole::Other,
                        },
                        Entity {
                            id: EntityId(2),
                            position: None,
                            role: EntityRole::Other,
                        },
                    ],
                }),
                Some(&PARAMS) => DecodeResult::GameParams(GameParams {
                    width: 10,
                    height: 20,
                    tick_rate: 30,
                }),
                _ => DecodeResult::Unrecognized,
            }
        }

        fn encode_action(&self, action: &ActionPayload) -> Vec<u8> {
            action.directions().iter().map(|d| *d as u8).collect()
        }
    }

    fn session() -> Session<CommandSurface> {
        let renderer = GridRenderer::new(CommandSurface::new(200.0, 200.0), Scale::DEFAULT);
        Session::new(Box::new(StubCodec), renderer, "Hello Server!")
    }

    #[test]
    fn greeting_is_returned_once_on_open() {
        let mut s = session();
        assert_eq!(s.state(), ConnectionState::Connecting);
        assert_eq!(s.open().as_deref(), Some("Hello Server!"));
        assert_eq!(s.open(), None);
        assert!(s.is_open());
    }

    #[test]
    fn frames_before_open_and_after_close_are_ignored() {
        let mut s = session();
        assert_eq!(s.handle_frame(InboundFrame::Binary(&[HEARTBEAT])), FrameOutcome::Ignored);

        s.open();
        s.close();
        assert_eq!(s.handle_frame(InboundFrame::Binary(&[HEARTBEAT])), FrameOutcome::Ignored);
        assert!(s.renderer().surface().commands().is_empty());
        assert!(s.open().is_none());
    }

    #[test]
    fn heartbeat_renders_positioned_entities() {
        let mut s = session();
        s.open();

        let outcome = s.handle_frame(InboundFrame::Binary(&[HEARTBEAT]));

        let FrameOutcome::Rendered(stats) = outcome else {
            panic!("expected render, got {outcome:?}");
        };
        assert_eq!((stats.drawn, stats.skipped), (1, 1));
        assert_eq!(
            s.renderer().surface().fill_rects(),
            vec![(100.0, 150.0, 50.0, 50.0)]
        );
        assert_eq!(s.last_snapshot().map(|w| w.entities.len()), Some(2));
    }

    #[test]
    fn text_frames_do_not_touch_state() {
        let mut s = session();
        s.open();

        assert_eq!(s.handle_frame(InboundFrame::Text("ping")), FrameOutcome::Ignored);
        assert!(s.renderer().surface().commands().is_empty());
        assert!(s.last_snapshot().is_none());
    }

    #[test]
    fn game_params_are_recorded_without_rendering() {
        let mut s = session();
        s.open();

        let outcome = s.handle_frame(InboundFrame::Binary(&[PARAMS]));
        assert!(matches!(outcome, FrameOutcome::ParamsAcknowledged(_)));
        assert_eq!(s.last_params().map(|p| p.tick_rate), Some(30));
        assert!(s.renderer().surface().commands().is_empty());
    }

    #[test]
    fn unrecognized_frame_keeps_previous_render() {
        let mut s = session();
        s.open();
        s.handle_frame(InboundFrame::Binary(&[HEARTBEAT]));
        let before = s.renderer().surface().commands().to_vec();

        assert_eq!(s.handle_frame(InboundFrame::Binary(&[0xee])), FrameOutcome::Unrecognized);
        assert_eq!(s.renderer().surface().commands(), before.as_slice());
        assert!(s.last_snapshot().is_some());
    }

    #[test]
    fn tick_sends_only_when_open_and_keys_held() {
        let mut s = session();
        s.set_key(Direction::Up, true);
        assert_eq!(s.tick(), None);

        s.open();
        assert!(s.tick().is_some());

        s.set_key(Direction::Up, false);
        assert_eq!(s.tick(), None);

        s.apply_key(&KeyEvent::down("ArrowRight"));
        assert_eq!(s.tick(), Some(vec![Direction::Right as u8]));

        s.close();
        assert_eq!(s.tick(), None);
    }

    #[test]
    fn tick_does_not_clear_held_keys() {
        let mut s = session();
        s.open();
        s.apply_key(&KeyEvent::down("ArrowDown"));
        assert_eq!(s.tick(), s.tick());
        assert!(s.input().is_held(Direction::Down));
    }
}
