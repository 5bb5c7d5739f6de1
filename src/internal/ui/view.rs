use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    symbols::Marker,
    widgets::{
        Block, Borders,
        canvas::{Canvas, Circle, Line},
    },
};

use super::surface::{Shape, TerminalSurface};
use crate::geometry::Point;
use crate::sketch::Surface;

/// Something the frame loop can paint into a terminal frame.
pub trait Paint {
    fn paint(&self, f: &mut Frame, area: Rect);
}

impl Paint for TerminalSurface {
    fn paint(&self, f: &mut Frame, area: Rect) {
        draw(self, f, area);
    }
}

/// Paints the surface's display list into `area`.
///
/// Braille cells give a 2x4 dot grid per character, so stroke weight is
/// not representable and is ignored. Ellipses are drawn as circles using
/// the mean of their two diameters.
pub fn draw(surface: &TerminalSurface, f: &mut Frame, area: Rect) {
    let width = f64::from(surface.width());
    let height = f64::from(surface.height());
    let background = surface.background_color();

    let title = format!(
        " {}x{} | frame {} ",
        surface.width(),
        surface.height(),
        surface.frame_count()
    );
    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .style(Style::default().bg(background)),
        )
        .background_color(background)
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            for shape in surface.shapes() {
                match shape {
                    Shape::Line { from, to, color, .. } => {
                        ctx.draw(&Line {
                            x1: f64::from(from.x),
                            y1: height - f64::from(from.y),
                            x2: f64::from(to.x),
                            y2: height - f64::from(to.y),
                            color: *color,
                        });
                    }
                    Shape::Ellipse {
                        center,
                        width: w,
                        height: h,
                        color,
                    } => {
                        ctx.draw(&Circle {
                            x: f64::from(center.x),
                            y: height - f64::from(center.y),
                            radius: f64::from(w + h) / 4.0,
                            color: *color,
                        });
                    }
                }
            }
        });

    f.render_widget(canvas, area);
}

/// Maps a terminal cell inside the bordered canvas at `area` to sketch
/// coordinates. Cells on or outside the border clamp to the nearest edge.
pub fn cell_to_sketch(area: Rect, column: u16, row: u16, width: u32, height: u32) -> Point {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    if inner.width == 0 || inner.height == 0 {
        return Point::default();
    }

    let col = column.clamp(inner.x, inner.right().saturating_sub(1)) - inner.x;
    let row = row.clamp(inner.y, inner.bottom().saturating_sub(1)) - inner.y;

    // Centre of the cell.
    let x = (f32::from(col) + 0.5) * width as f32 / f32::from(inner.width);
    let y = (f32::from(row) + 0.5) * height as f32 / f32::from(inner.height);
    Point::new(x, y)
}
