// Logical input directions, the held-key state and the per-tick action payload.

/// One of the four logical directions, decoupled from physical keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Encoding order for action payloads.
    pub const CANONICAL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Fixed physical-key table, using `KeyboardEvent.key` names.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Direction::Up),
            "ArrowDown" => Some(Direction::Down),
            "ArrowLeft" => Some(Direction::Left),
            "ArrowRight" => Some(Direction::Right),
            _ => None,
        }
    }

    fn slot(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

/// Raw key transition reported by the input collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub pressed: bool,
}

impl KeyEvent {
    pub fn down(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            pressed: true,
        }
    }

    pub fn up(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            pressed: false,
        }
    }
}

/// Currently held logical directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputState {
    held: [bool; 4],
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last write wins per direction.
    pub fn set_key(&mut self, direction: Direction, held: bool) {
        self.held[direction.slot()] = held;
    }

    /// Applies a physical key event. Returns the direction it mapped to, if any.
    pub fn apply(&mut self, event: &KeyEvent) -> Option<Direction> {
        let direction = Direction::from_key(&event.key)?;
        self.set_key(direction, event.pressed);
        Some(direction)
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        self.held[direction.slot()]
    }

    /// Samples the held directions in canonical order. Does not mutate the state.
    pub fn encode(&self) -> ActionPayload {
        ActionPayload {
            directions: Direction::CANONICAL
                .into_iter()
                .filter(|direction| self.is_held(*direction))
                .collect(),
        }
    }
}

/// Directions held at sampling time, in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActionPayload {
    directions: Vec<Direction>,
}

impl ActionPayload {
    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    /// Empty payloads are never put on the wire.
    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }
}

// Collecting normalizes to canonical order and drops duplicates.
impl FromIterator<Direction> for ActionPayload {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut held = InputState::new();
        for direction in iter {
            held.set_key(direction, true);
        }
        held.encode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_orders_directions_canonically() {
        let mut input = InputState::new();
        input.set_key(Direction::Right, true);
        input.set_key(Direction::Up, true);
        input.set_key(Direction::Left, true);

        assert_eq!(
            input.encode().directions(),
            &[Direction::Up, Direction::Left, Direction::Right]
        );
    }

    #[test]
    fn encode_of_idle_state_is_empty() {
        let input = InputState::new();
        assert!(input.encode().is_empty());
    }

    #[test]
    fn encode_does_not_consume_held_keys() {
        let mut input = InputState::new();
        input.set_key(Direction::Down, true);

        let first = input.encode();
        let second = input.encode();
        assert_eq!(first, second);
        assert!(input.is_held(Direction::Down));
    }

    #[test]
    fn set_key_is_idempotent_and_last_write_wins() {
        let mut input = InputState::new();
        input.set_key(Direction::Up, true);
        input.set_key(Direction::Up, true);
        assert_eq!(input.encode().directions(), &[Direction::Up]);

        input.set_key(Direction::Up, false);
        assert!(input.encode().is_empty());
    }

    #[test]
    fn apply_maps_arrow_keys_and_ignores_the_rest() {
        let mut input = InputState::new();
        assert_eq!(input.apply(&KeyEvent::down("ArrowLeft")), Some(Direction::Left));
        assert_eq!(input.apply(&KeyEvent::down("a")), None);
        assert_eq!(input.apply(&KeyEvent::down("Space")), None);
        assert_eq!(input.encode().directions(), &[Direction::Left]);

        input.apply(&KeyEvent::up("ArrowLeft"));
        assert!(input.encode().is_empty());
    }

    #[test]
    fn collecting_directions_normalizes_order() {
        let payload: ActionPayload = [Direction::Right, Direction::Up, Direction::Right]
            .into_iter()
            .collect();
        assert_eq!(payload.directions(), &[Direction::Up, Direction::Right]);
    }
}
