//! Recording doubles for sketches and surfaces.
//!
//! A [`Spy`] wraps a real sketch and logs each lifecycle hook before
//! delegating to it. A [`RecordingSurface`] logs every sizing and drawing
//! call before forwarding it to the surface it wraps. Both write into a
//! shared [`CallLog`], which is then checked with [`CallLog::verify`].
//! [`ScriptedEvents`] feeds a fixed sequence of terminal events to the
//! frame loop.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Result, bail};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use strum_macros::IntoStaticStr;

use crate::internal::ui::runner::EventSource;
use crate::internal::ui::view::Paint;
use crate::sketch::{DEFAULT_HEIGHT, DEFAULT_WIDTH, MouseEvent, Sketch, Surface};

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Call {
    Settings,
    Setup,
    Draw,
    MouseClicked { x: f32, y: f32 },
    Size { width: u32, height: u32 },
    Background { gray: u8 },
    Stroke { gray: u8, alpha: u8 },
    StrokeWeight { weight: f32 },
    Line { x1: f32, y1: f32, x2: f32, y2: f32 },
    Ellipse { cx: f32, cy: f32, width: f32, height: f32 },
}

impl Call {
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name();
        match self {
            Call::Settings | Call::Setup | Call::Draw => write!(f, "{name}()"),
            Call::MouseClicked { x, y } => write!(f, "{name}({x}, {y})"),
            Call::Size { width, height } => write!(f, "{name}({width}, {height})"),
            Call::Background { gray } => write!(f, "{name}({gray})"),
            Call::Stroke { gray, alpha } => write!(f, "{name}({gray}, {alpha})"),
            Call::StrokeWeight { weight } => write!(f, "{name}({weight})"),
            Call::Line { x1, y1, x2, y2 } => write!(f, "{name}({x1}, {y1}, {x2}, {y2})"),
            Call::Ellipse {
                cx,
                cy,
                width,
                height,
            } => write!(f, "{name}({cx}, {cy}, {width}, {height})"),
        }
    }
}

/// Expected number of occurrences of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Times {
    Once,
    Exactly(usize),
    AtLeast(usize),
    Never,
}

impl Times {
    fn matches(&self, count: usize) -> bool {
        match *self {
            Times::Once => count == 1,
            Times::Exactly(n) => count == n,
            Times::AtLeast(n) => count >= n,
            Times::Never => count == 0,
        }
    }
}

impl fmt::Display for Times {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Times::Once => write!(f, "exactly once"),
            Times::Exactly(n) => write!(f, "exactly {n} time(s)"),
            Times::AtLeast(n) => write!(f, "at least {n} time(s)"),
            Times::Never => write!(f, "never"),
        }
    }
}

/// Ordered log of calls, cheap to clone and share between doubles.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Call>> {
        // A panicking test poisons the lock; the log itself is still usable.
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn record(&self, call: Call) {
        tracing::trace!(%call, "recorded");
        self.lock().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.lock().iter().filter(|c| *c == call).count()
    }

    pub fn count_name(&self, name: &str) -> usize {
        self.lock().iter().filter(|c| c.name() == name).count()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Checks that `call`, with exactly these arguments, was recorded the
    /// expected number of times.
    pub fn verify(&self, call: &Call, times: Times) -> Result<()> {
        let count = self.count(call);
        if !times.matches(count) {
            bail!(
                "expected `{call}` {times}, recorded {count} time(s)\nrecorded calls:\n{self}"
            );
        }
        Ok(())
    }

    /// Like [`CallLog::verify`] but matches any arguments.
    pub fn verify_name(&self, name: &str, times: Times) -> Result<()> {
        let count = self.count_name(name);
        if !times.matches(count) {
            bail!(
                "expected `{name}` {times}, recorded {count} time(s)\nrecorded calls:\n{self}"
            );
        }
        Ok(())
    }
}

impl fmt::Display for CallLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for call in self.lock().iter() {
            writeln!(f, "{call}")?;
        }
        Ok(())
    }
}

/// Wraps a sketch, logging each lifecycle hook before delegating.
#[derive(Debug)]
pub struct Spy<S> {
    inner: S,
    log: CallLog,
}

impl<S: Sketch> Spy<S> {
    pub fn new(inner: S) -> Self {
        Self::with_log(inner, CallLog::new())
    }

    pub fn with_log(inner: S, log: CallLog) -> Self {
        Self { inner, log }
    }

    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Sketch> Sketch for Spy<S> {
    fn settings(&mut self, surface: &mut dyn Surface) {
        self.log.record(Call::Settings);
        self.inner.settings(surface);
    }

    fn setup(&mut self, surface: &mut dyn Surface) {
        self.log.record(Call::Setup);
        self.inner.setup(surface);
    }

    fn draw(&mut self, surface: &mut dyn Surface) {
        self.log.record(Call::Draw);
        self.inner.draw(surface);
    }

    fn mouse_clicked(&mut self, event: MouseEvent) {
        self.log.record(Call::MouseClicked {
            x: event.x,
            y: event.y,
        });
        self.inner.mouse_clicked(event);
    }
}

/// Surface with no output at all. It only keeps the state sketches can
/// query: size, pointer, frame count and arguments.
#[derive(Debug)]
pub struct HeadlessSurface {
    width: u32,
    height: u32,
    mouse: (f32, f32),
    frame_count: u64,
    args: Vec<String>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            mouse: (0.0, 0.0),
            frame_count: 0,
            args: Vec::new(),
        }
    }
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for HeadlessSurface {
    fn size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn background(&mut self, _gray: u8) {}

    fn stroke(&mut self, _gray: u8, _alpha: u8) {}

    fn stroke_weight(&mut self, _weight: f32) {}

    fn line(&mut self, _x1: f32, _y1: f32, _x2: f32, _y2: f32) {}

    fn ellipse(&mut self, _cx: f32, _cy: f32, _width: f32, _height: f32) {}

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

/// Logs every sizing and drawing call, then forwards it to the wrapped
/// surface. Queries, pointer updates and frame bookkeeping are forwarded
/// without being logged.
#[derive(Debug)]
pub struct RecordingSurface<S = HeadlessSurface> {
    inner: S,
    log: CallLog,
}

impl RecordingSurface {
    pub fn new(log: CallLog) -> Self {
        Self::wrap(HeadlessSurface::new(), log)
    }

    pub fn with_pointer(mut self, x: f32, y: f32) -> Self {
        self.inner.set_pointer(x, y);
        self
    }
}

impl<S: Surface> RecordingSurface<S> {
    pub fn wrap(inner: S, log: CallLog) -> Self {
        Self { inner, log }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn log(&self) -> CallLog {
        self.log.clone()
    }
}

impl<S: Surface> Surface for RecordingSurface<S> {
    fn size(&mut self, width: u32, height: u32) {
        self.log.record(Call::Size { width, height });
        self.inner.size(width, height);
    }

    fn width(&self) -> u32 {
        self.inner.width()
    }

    fn height(&self) -> u32 {
        self.inner.height()
    }

    fn background(&mut self, gray: u8) {
        self.log.record(Call::Background { gray });
        self.inner.background(gray);
    }

    fn stroke(&mut self, gray: u8, alpha: u8) {
        self.log.record(Call::Stroke { gray, alpha });
        self.inner.stroke(gray, alpha);
    }

    fn stroke_weight(&mut self, weight: f32) {
        self.log.record(Call::StrokeWeight { weight });
        self.inner.stroke_weight(weight);
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.log.record(Call::Line { x1, y1, x2, y2 });
        self.inner.line(x1, y1, x2, y2);
    }

    fn ellipse(&mut self, cx: f32, cy: f32, width: f32, height: f32) {
        self.log.record(Call::Ellipse {
            cx,
            cy,
            width,
            height,
        });
        self.inner.ellipse(cx, cy, width, height);
    }

    fn mouse_x(&self) -> f32 {
        self.inner.mouse_x()
    }

    fn mouse_y(&self) -> f32 {
        self.inner.mouse_y()
    }

    fn set_pointer(&mut self, x: f32, y: f32) {
        self.inner.set_pointer(x, y);
    }

    fn frame_count(&self) -> u64 {
        self.inner.frame_count()
    }

    fn end_frame(&mut self) {
        self.inner.end_frame();
    }

    fn set_args(&mut self, args: Vec<String>) {
        self.inner.set_args(args);
    }

    fn args(&self) -> &[String] {
        self.inner.args()
    }
}

impl<S: Paint> Paint for RecordingSurface<S> {
    fn paint(&self, f: &mut Frame, area: Rect) {
        self.inner.paint(f, area);
    }
}

/// Replays terminal events frame by frame.
///
/// Each inner `Vec` is delivered during one frame. When the script runs
/// out, the source reports `Esc` so a driven loop always terminates.
#[derive(Debug, Default)]
pub struct ScriptedEvents {
    frames: VecDeque<VecDeque<Event>>,
    exhausted: bool,
}

impl ScriptedEvents {
    pub fn new(frames: Vec<Vec<Event>>) -> Self {
        Self {
            frames: frames.into_iter().map(VecDeque::from).collect(),
            exhausted: false,
        }
    }
}

impl EventSource for ScriptedEvents {
    fn poll_event(&mut self) -> Result<Option<Event>> {
        let Some(frame) = self.frames.front_mut() else {
            if self.exhausted {
                return Ok(None);
            }
            self.exhausted = true;
            return Ok(Some(Event::Key(KeyEvent::new(
                KeyCode::Esc,
                KeyModifiers::NONE,
            ))));
        };
        match frame.pop_front() {
            Some(event) => Ok(Some(event)),
            None => {
                // End of this frame's events.
                self.frames.pop_front();
                Ok(None)
            }
        }
    }
}
