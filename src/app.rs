use std::time::Duration;

use anyhow::Result;
use ratatui::Terminal;
use ratatui::backend::Backend;

use crate::config::{ArmConfig, SketchConfig};
use crate::geometry::{MatrixStack, Point, drag};
use crate::internal::ui::runner::{self, CrosstermEvents, EventSource};
use crate::internal::ui::surface::TerminalSurface;
use crate::internal::ui::view::Paint;
use crate::sketch::{self, MouseEvent, Sketch, Surface};
use crate::tui::Tui;

pub const WIDTH: u32 = 640;
pub const HEIGHT: u32 = 360;

/// A segmented arm whose head follows the pointer; every other joint is
/// dragged behind the one before it.
#[derive(Debug, Clone)]
pub struct App {
    joints: Vec<Point>,
    segment_length: f32,
    matrix: MatrixStack,
}

impl App {
    pub fn new() -> Self {
        Self::with_arm(ArmConfig::default())
    }

    pub fn with_arm(arm: ArmConfig) -> Self {
        Self {
            joints: vec![Point::default(); arm.segments],
            segment_length: arm.segment_length,
            matrix: MatrixStack::new(),
        }
    }

    pub fn joints(&self) -> &[Point] {
        &self.joints
    }

    pub fn segment_length(&self) -> f32 {
        self.segment_length
    }

    /// Drags joint `i` towards `(xin, yin)` and draws its segment.
    fn drag_segment(&mut self, surface: &mut dyn Surface, i: usize, xin: f32, yin: f32) {
        let (joint, angle) = drag(self.joints[i], Point::new(xin, yin), self.segment_length);
        self.joints[i] = joint;
        self.segment(surface, joint.x, joint.y, angle);
    }

    /// Draws one segment starting at `(x, y)` rotated by `angle`.
    pub fn segment(&mut self, surface: &mut dyn Surface, x: f32, y: f32, angle: f32) {
        self.matrix.push();
        self.matrix.translate(x, y);
        self.matrix.rotate(angle);
        let from = self.matrix.apply(Point::new(0.0, 0.0));
        let to = self.matrix.apply(Point::new(self.segment_length, 0.0));
        surface.line(from.x, from.y, to.x, to.y);
        self.matrix.pop();
    }

    /// Terminal entry point: runs the arm sketch on a terminal surface
    /// until the user quits. The caller owns terminal setup and teardown.
    pub async fn main(args: &[String], config: &SketchConfig, terminal: &mut Tui) -> Result<()> {
        let mut app = App::with_arm(config.arm);
        let mut surface = TerminalSurface::new();
        run_with(
            args,
            &mut app,
            &mut surface,
            terminal,
            &mut CrosstermEvents,
            config.frame_interval(),
        )
        .await
    }
}

/// Launches `sketch` on `surface` with `args`, then drives the frame loop
/// against `terminal` and `events` until a quit event.
pub async fn run_with<B, S>(
    args: &[String],
    sketch: &mut dyn Sketch,
    surface: &mut S,
    terminal: &mut Terminal<B>,
    events: &mut dyn EventSource,
    interval: Duration,
) -> Result<()>
where
    B: Backend,
    S: Surface + Paint,
{
    sketch::launch(args, sketch, surface)?;
    runner::run(sketch, surface, terminal, events, interval).await
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl Sketch for App {
    fn settings(&mut self, surface: &mut dyn Surface) {
        surface.size(WIDTH, HEIGHT);
    }

    #[tracing::instrument(skip_all)]
    fn setup(&mut self, surface: &mut dyn Surface) {
        surface.stroke_weight(9.0);
        surface.stroke(255, 100);
        self.joints.fill(Point::default());
        tracing::debug!(segments = self.joints.len(), "arm reset");
    }

    fn draw(&mut self, surface: &mut dyn Surface) {
        surface.background(0);
        if self.joints.is_empty() {
            return;
        }

        let (mx, my) = (surface.mouse_x(), surface.mouse_y());
        self.drag_segment(surface, 0, mx, my);
        for i in 1..self.joints.len() {
            let prev = self.joints[i - 1];
            self.drag_segment(surface, i, prev.x, prev.y);
        }
    }

    fn mouse_clicked(&mut self, event: MouseEvent) {
        tracing::debug!(x = event.x, y = event.y, "re-anchoring arm");
        self.joints.fill(Point::new(event.x, event.y));
    }
}
