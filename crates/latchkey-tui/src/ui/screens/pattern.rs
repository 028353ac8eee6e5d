//! Pattern canvas
//!
//! The grid lives in layout units (300x300 by default) while the terminal
//! reports the mouse in cells. [`CanvasGeometry`] converts between the two;
//! the ratatui canvas itself has its y axis pointing up, so drawing flips y.

use latchkey_core::{GridLayout, GridPoint, PatternEncoder, POINT_RADIUS};
use ratatui::prelude::*;
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine};
use ratatui::widgets::{Block, Borders};

use crate::ui::Theme;

/// Mapping between terminal cells and layout space for one drawn canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasGeometry {
    /// Cells covered by the canvas, excluding its border
    pub area: Rect,
    pub layout: GridLayout,
}

impl CanvasGeometry {
    pub fn new(area: Rect, layout: GridLayout) -> Self {
        Self { area, layout }
    }

    /// Layout-space point at the centre of cell (`column`, `row`)
    ///
    /// Returns `None` for cells outside the canvas.
    pub fn to_layout(&self, column: u16, row: u16) -> Option<GridPoint> {
        if self.area.width == 0
            || self.area.height == 0
            || column < self.area.x
            || row < self.area.y
            || column >= self.area.right()
            || row >= self.area.bottom()
        {
            return None;
        }

        let fx = (f32::from(column - self.area.x) + 0.5) / f32::from(self.area.width);
        let fy = (f32::from(row - self.area.y) + 0.5) / f32::from(self.area.height);
        Some(GridPoint::new(
            fx * self.layout.width as f32,
            fy * self.layout.height as f32,
        ))
    }
}

/// Draw the pattern canvas; returns the inner area used for hit mapping
pub fn draw(frame: &mut Frame, area: Rect, encoder: &PatternEncoder, theme: &Theme) -> Rect {
    let layout = encoder.grid().layout();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border());
    let inner = block.inner(area);

    let width = f64::from(layout.width);
    let height = f64::from(layout.height);

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| paint(ctx, encoder, height, theme));

    frame.render_widget(canvas, area);
    inner
}

fn paint(ctx: &mut Context<'_>, encoder: &PatternEncoder, height: f64, theme: &Theme) {
    let grid = encoder.grid();
    let flip = |p: GridPoint| (f64::from(p.x), height - f64::from(p.y));

    for (index, point) in grid.points().iter().enumerate() {
        let (x, y) = flip(*point);
        let color = if encoder.is_selected(index) {
            theme.point_selected
        } else {
            theme.point_idle
        };
        ctx.draw(&Circle {
            x,
            y,
            radius: f64::from(POINT_RADIUS),
            color,
        });
    }

    let path: Vec<(f64, f64)> = encoder
        .selected_points()
        .iter()
        .filter_map(|&index| grid.get(index))
        .map(flip)
        .collect();

    for segment in path.windows(2) {
        let ((x1, y1), (x2, y2)) = (segment[0], segment[1]);
        ctx.draw(&CanvasLine::new(x1, y1, x2, y2, theme.path));
    }

    if let (Some(&(x1, y1)), Some(touch)) = (path.last(), encoder.current_touch()) {
        let (x2, y2) = flip(touch);
        ctx.draw(&CanvasLine::new(x1, y1, x2, y2, theme.path));
    }
}
