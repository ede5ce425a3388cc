use std::fmt;

use super::input::ActionPayload;
use super::world::DecodeResult;

/// Opaque RGB color used for strokes and fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

// Port for the 2D drawing surface the renderer paints onto.
// The surface owner decides its size; the renderer only queries it.
pub trait Surface {
    fn width(&self) -> f64;
    fn height(&self) -> f64;

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    fn set_line_width(&mut self, width: f64);
    fn set_stroke_style(&mut self, color: Color);
    fn set_fill_style(&mut self, color: Color);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn stroke(&mut self);
    fn close_path(&mut self);
}

// Port for a wire encoding. One implementation is chosen per session.
pub trait WireCodec: Send + Sync {
    fn schema_name(&self) -> &'static str;

    /// Never fails: anything that is not a known message is `Unrecognized`.
    fn decode(&self, frame: &[u8]) -> DecodeResult;

    fn encode_action(&self, action: &ActionPayload) -> Vec<u8>;
}
