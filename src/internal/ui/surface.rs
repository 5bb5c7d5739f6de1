use ratatui::style::Color;

use crate::geometry::Point;
use crate::sketch::{DEFAULT_HEIGHT, DEFAULT_WIDTH, Surface};

/// One entry of a frame's display list, in sketch coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line {
        from: Point,
        to: Point,
        color: Color,
        weight: f32,
    },
    Ellipse {
        center: Point,
        width: f32,
        height: f32,
        color: Color,
    },
}

/// Surface backing the terminal host. Drawing calls build a display list
/// that [`super::view::draw`] paints onto a canvas.
#[derive(Debug)]
pub struct TerminalSurface {
    width: u32,
    height: u32,
    background: u8,
    stroke: (u8, u8),
    weight: f32,
    shapes: Vec<Shape>,
    mouse: (f32, f32),
    frame_count: u64,
    args: Vec<String>,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            background: 204,
            stroke: (0, 255),
            weight: 1.0,
            shapes: Vec::new(),
            mouse: (0.0, 0.0),
            frame_count: 0,
            args: Vec::new(),
        }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn background_color(&self) -> Color {
        gray(self.background)
    }

    /// Stroke colour blended over the current background.
    fn stroke_color(&self) -> Color {
        let (value, alpha) = self.stroke;
        let bg = f32::from(self.background);
        let blended = bg + (f32::from(value) - bg) * f32::from(alpha) / 255.0;
        gray(blended.round().clamp(0.0, 255.0) as u8)
    }
}

impl Default for TerminalSurface {
    fn default() -> Self {
        Self::new()
    }
}

fn gray(v: u8) -> Color {
    Color::Rgb(v, v, v)
}

impl Surface for TerminalSurface {
    fn size(&mut self, width: u32, height: u32) {
        tracing::debug!(width, height, "surface resized");
        self.width = width;
        self.height = height;
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    /// Clears the display list; everything drawn before is gone.
    fn background(&mut self, gray: u8) {
        self.background = gray;
        self.shapes.clear();
    }

    fn stroke(&mut self, gray: u8, alpha: u8) {
        self.stroke = (gray, alpha);
    }

    fn stroke_weight(&mut self, weight: f32) {
        self.weight = weight;
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.shapes.push(Shape::Line {
            from: Point::new(x1, y1),
            to: Point::new(x2, y2),
            color: self.stroke_color(),
            weight: self.weight,
        });
    }

    fn ellipse(&mut self, cx: f32, cy: f32, width: f32, height: f32) {
        self.shapes.push(Shape::Ellipse {
            center: Point::new(cx, cy),
            width,
            height,
            color: self.stroke_color(),
        });
    }

    fn mouse_x(&self) -> f32 {
        self.mouse.0
    }

    fn mouse_y(&self) -> f32 {
        self.mouse.1
    }

    fn set_pointer(&mut self, x: f32, y: f32) {
        self.mouse = (x, y);
    }

    fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn end_frame(&mut self) {
        self.frame_count += 1;
    }

    fn set_args(&mut self, args: Vec<String>) {
        self.args = args;
    }

    fn args(&self) -> &[String] {
        &self.args
    }
}
