// World-space and screen-space coordinates plus the mapping between them.

use std::fmt;

/// A position in world units, as decoded from a snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// A position in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ScaleError {
    #[error("scale factors must be finite and positive (got {sx} x {sy})")]
    NotPositive { sx: f64, sy: f64 },
    #[error("scale factors below {min} pixel per unit are not drawable (got {sx} x {sy})")]
    BelowPixel { sx: f64, sy: f64, min: f64 },
}

/// Pixels per world unit on each axis. Fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    sx: f64,
    sy: f64,
}

impl Scale {
    pub const DEFAULT: Scale = Scale { sx: 50.0, sy: 50.0 };
    /// Grid lines closer than one pixel apart are indistinguishable.
    pub const MIN_FACTOR: f64 = 1.0;

    pub fn new(sx: f64, sy: f64) -> Result<Self, ScaleError> {
        // Zero or NaN steps would never advance the grid walk.
        if !(sx.is_finite() && sy.is_finite() && sx > 0.0 && sy > 0.0) {
            return Err(ScaleError::NotPositive { sx, sy });
        }
        if sx < Self::MIN_FACTOR || sy < Self::MIN_FACTOR {
            return Err(ScaleError::BelowPixel {
                sx,
                sy,
                min: Self::MIN_FACTOR,
            });
        }
        Ok(Self { sx, sy })
    }

    pub fn uniform(factor: f64) -> Result<Self, ScaleError> {
        Self::new(factor, factor)
    }

    pub fn sx(&self) -> f64 {
        self.sx
    }

    pub fn sy(&self) -> f64 {
        self.sy
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Maps a world point onto the surface.
pub fn to_screen(point: Point, scale: Scale) -> ScreenPoint {
    ScreenPoint::new(point.x * scale.sx, point.y * scale.sy)
}

/// Maps a surface pixel back into world units.
pub fn to_world(point: ScreenPoint, scale: Scale) -> Point {
    Point::new(point.x / scale.sx, point.y / scale.sy)
}
