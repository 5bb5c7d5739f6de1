use anyhow::{Result, bail};

/// Size a surface keeps when a sketch never calls `size()` from `settings()`.
pub const DEFAULT_WIDTH: u32 = 100;
pub const DEFAULT_HEIGHT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event in sketch coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    pub x: f32,
    pub y: f32,
    pub button: MouseButton,
}

impl MouseEvent {
    pub fn left(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            button: MouseButton::Left,
        }
    }
}

/// Everything a sketch can draw on, size, or query.
pub trait Surface {
    fn size(&mut self, width: u32, height: u32);
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn background(&mut self, gray: u8);
    fn stroke(&mut self, gray: u8, alpha: u8);
    fn stroke_weight(&mut self, weight: f32);
    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32);
    fn ellipse(&mut self, cx: f32, cy: f32, width: f32, height: f32);

    fn mouse_x(&self) -> f32;
    fn mouse_y(&self) -> f32;
    /// Called by the host when the pointer moves.
    fn set_pointer(&mut self, x: f32, y: f32);
    fn frame_count(&self) -> u64;
    /// Advance the frame counter; called by the runtime after each `draw`.
    fn end_frame(&mut self);

    fn set_args(&mut self, args: Vec<String>);
    fn args(&self) -> &[String];
}

/// Lifecycle hooks of a sketch.
pub trait Sketch {
    /// Runs once before the surface exists; the place to call `size()`.
    fn settings(&mut self, surface: &mut dyn Surface);
    fn setup(&mut self, surface: &mut dyn Surface);
    fn draw(&mut self, surface: &mut dyn Surface);
    fn mouse_clicked(&mut self, _event: MouseEvent) {}
}

/// Entry-point sequence: hand over the arguments, run `settings`, validate
/// the requested size and run `setup`. Frames are driven separately with
/// [`step`].
#[tracing::instrument(skip(sketch, surface))]
pub fn launch(args: &[String], sketch: &mut dyn Sketch, surface: &mut dyn Surface) -> Result<()> {
    surface.set_args(args.to_vec());

    sketch.settings(surface);
    let (width, height) = (surface.width(), surface.height());
    if width == 0 || height == 0 {
        bail!("sketch requested an empty surface ({width}x{height})");
    }
    tracing::info!(width, height, "settings complete");

    sketch.setup(surface);
    tracing::debug!("setup complete");
    Ok(())
}

/// Draw a single frame.
pub fn step(sketch: &mut dyn Sketch, surface: &mut dyn Surface) {
    sketch.draw(surface);
    surface.end_frame();
}
