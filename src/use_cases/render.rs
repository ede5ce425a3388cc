// Grid renderer: clears the surface, draws the axis grid and one box per entity.

use crate::domain::{Color, EntityRole, Point, Scale, Surface, WorldSnapshot, to_screen};
use tracing::trace;

pub const GRID_LINE_WIDTH: f64 = 0.5;

/// Stroke and fill colors used by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub grid: Color,
    pub other: Color,
    pub own: Color,
}

impl Palette {
    pub fn fill_for(&self, role: EntityRole) -> Color {
        match role {
            EntityRole::Player => self.own,
            EntityRole::Other => self.other,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            grid: Color::rgb(0x8d, 0x8d, 0x91),
            other: Color::rgb(0x00, 0x00, 0x00),
            own: Color::rgb(0xd9, 0x48, 0x0f),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub drawn: usize,
    pub skipped: usize,
    pub vertical_lines: usize,
    pub horizontal_lines: usize,
}

/// Owns the drawing surface for the lifetime of a session.
pub struct GridRenderer<S> {
    surface: S,
    scale: Scale,
    palette: Palette,
}

impl<S: Surface> GridRenderer<S> {
    pub fn new(surface: S, scale: Scale) -> Self {
        Self {
            surface,
            scale,
            palette: Palette::default(),
        }
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn clear(&mut self) {
        let (width, height) = (self.surface.width(), self.surface.height());
        self.surface.clear_rect(0.0, 0.0, width, height);
    }

    /// Draws the full grid. Returns the number of (vertical, horizontal) lines.
    pub fn draw_axis(&mut self) -> (usize, usize) {
        let (width, height) = (self.surface.width(), self.surface.height());
        self.surface.set_line_width(GRID_LINE_WIDTH);
        self.surface.set_stroke_style(self.palette.grid);

        // Step by index rather than accumulating, so float drift never adds a line.
        let mut vertical = 0;
        loop {
            let x = vertical as f64 * self.scale.sx();
            if x >= width {
                break;
            }
            self.segment(x, 0.0, x, height);
            vertical += 1;
        }

        let mut horizontal = 0;
        loop {
            let y = horizontal as f64 * self.scale.sy();
            if y >= height {
                break;
            }
            self.segment(0.0, y, width, y);
            horizontal += 1;
        }

        (vertical, horizontal)
    }

    fn segment(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) {
        self.surface.begin_path();
        self.surface.move_to(x0, y0);
        self.surface.line_to(x1, y1);
        self.surface.stroke();
        self.surface.close_path();
    }

    /// Fills one scale-sized box with its top-left corner at the mapped point.
    pub fn draw_entity_box(&mut self, point: Point, color: Color) {
        let top_left = to_screen(point, self.scale);
        self.surface.set_fill_style(color);
        self.surface
            .fill_rect(top_left.x, top_left.y, self.scale.sx(), self.scale.sy());
    }

    /// clear, then grid, then one box per positioned entity in snapshot order.
    pub fn render(&mut self, snapshot: &WorldSnapshot) -> RenderStats {
        self.clear();
        let (vertical_lines, horizontal_lines) = self.draw_axis();

        let mut drawn = 0;
        for (entity, position) in snapshot.positioned() {
            trace!(id = entity.id.0, role = ?entity.role, "entity at {position}");
            self.draw_entity_box(position, self.palette.fill_for(entity.role));
            drawn += 1;
        }
        RenderStats {
            drawn,
            skipped: snapshot.entities.len() - drawn,
            vertical_lines,
            horizontal_lines,
        }
    }

    /// Empty grid, shown before the first snapshot arrives.
    pub fn reset(&mut self) -> RenderStats {
        self.clear();
        let (vertical_lines, horizontal_lines) = self.draw_axis();
        RenderStats {
            vertical_lines,
            horizontal_lines,
            ..RenderStats::default()
        }
    }
}
