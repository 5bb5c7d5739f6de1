use std::ops::ControlFlow;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton as TermButton, MouseEvent as TermMouse,
    MouseEventKind,
};
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::layout::Rect;

use super::view::{self, Paint};
use crate::sketch::{self, MouseButton, MouseEvent, Sketch, Surface};

/// Input mapped into sketch terms.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Pointer(f32, f32),
    Click(MouseEvent),
}

/// Non-blocking source of terminal events.
pub trait EventSource {
    /// Next pending event, or `None` when nothing is queued right now.
    fn poll_event(&mut self) -> Result<Option<Event>>;
}

/// Reads events from the real terminal.
#[derive(Debug, Default)]
pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn poll_event(&mut self) -> Result<Option<Event>> {
        if event::poll(Duration::from_millis(0))? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }
}

/// Drives `sketch` at one frame per `interval` until a quit action arrives.
/// Each tick draws a frame, paints it, then handles every pending event.
#[tracing::instrument(skip(sketch, surface, terminal, events))]
pub async fn run<B, S>(
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
    let mut ticker = tokio::time::interval(interval);
    let mut area = Rect::default();

    loop {
        ticker.tick().await;

        sketch::step(sketch, surface);
        terminal.draw(|f| {
            area = f.area();
            surface.paint(f, area);
        })?;

        while let Some(event) = events.poll_event()? {
            let Some(action) = map_event(event, area, surface.width(), surface.height()) else {
                continue;
            };
            if handle_action(sketch, surface, action).is_break() {
                tracing::info!(frames = surface.frame_count(), "quit requested");
                return Ok(());
            }
        }
    }
}

/// Applies one action. Breaks when the loop should stop.
pub fn handle_action<S: Surface + ?Sized>(
    sketch: &mut dyn Sketch,
    surface: &mut S,
    action: Action,
) -> ControlFlow<()> {
    match action {
        Action::Quit => return ControlFlow::Break(()),
        Action::Pointer(x, y) => surface.set_pointer(x, y),
        Action::Click(click) => {
            surface.set_pointer(click.x, click.y);
            sketch.mouse_clicked(click);
        }
    }
    ControlFlow::Continue(())
}

/// Translates a terminal event for a canvas occupying `area`.
pub fn map_event(event: Event, area: Rect, width: u32, height: u32) -> Option<Action> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => map_key(key),
        Event::Mouse(mouse) => map_mouse(mouse, area, width, height),
        _ => None,
    }
}

fn map_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

fn map_mouse(mouse: TermMouse, area: Rect, width: u32, height: u32) -> Option<Action> {
    let p = view::cell_to_sketch(area, mouse.column, mouse.row, width, height);
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(Action::Pointer(p.x, p.y)),
        // A click completes on release, whichever button was pressed; the
        // press itself is not a click.
        MouseEventKind::Up(button) => Some(Action::Click(MouseEvent {
            x: p.x,
            y: p.y,
            button: match button {
                TermButton::Left => MouseButton::Left,
                TermButton::Right => MouseButton::Right,
                TermButton::Middle => MouseButton::Middle,
            },
        })),
        _ => None,
    }
}
