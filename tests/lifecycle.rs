use std::time::Duration;

use crossterm::event::{Event, KeyModifiers, MouseButton, MouseEvent as TermMouse, MouseEventKind};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use tui_sketch::app::{self, App, HEIGHT, WIDTH};
use tui_sketch::config::ArmConfig;
use tui_sketch::geometry::Point;
use tui_sketch::internal::ui::surface::TerminalSurface;
use tui_sketch::sketch::{self, MouseEvent, Sketch, Surface};
use tui_sketch::testing::{Call, CallLog, RecordingSurface, ScriptedEvents, Spy, Times};

/// Builds a spied `App` and a recording surface that share one log.
fn spied_app() -> (Spy<App>, RecordingSurface, CallLog) {
    let log = CallLog::new();
    let spy = Spy::with_log(App::new(), log.clone());
    let surface = RecordingSurface::new(log.clone());
    (spy, surface, log)
}

fn test_terminal() -> Terminal<TestBackend> {
    Terminal::new(TestBackend::new(66, 38)).unwrap()
}

fn release(button: MouseButton, column: u16, row: u16) -> Event {
    Event::Mouse(TermMouse {
        kind: MouseEventKind::Up(button),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

fn size_640x360() -> Call {
    Call::Size {
        width: 640,
        height: 360,
    }
}

#[test]
fn setup() {
    let (mut spy, mut surface, log) = spied_app();
    sketch::launch(&[], &mut spy, &mut surface).unwrap();

    log.verify(&Call::Setup, Times::Once).unwrap();
    log.verify(&Call::StrokeWeight { weight: 9.0 }, Times::Once).unwrap();
    log.verify(
        &Call::Stroke {
            gray: 255,
            alpha: 100,
        },
        Times::Once,
    )
    .unwrap();
    assert!(spy.inner().joints().iter().all(|j| *j == Point::default()));
}

#[test]
fn draw() {
    let (mut spy, mut surface, log) = spied_app();
    sketch::launch(&[], &mut spy, &mut surface).unwrap();
    log.clear();

    surface.set_pointer(320.0, 180.0);
    sketch::step(&mut spy, &mut surface);

    let calls = log.calls();
    assert_eq!(calls[0], Call::Draw);
    assert_eq!(calls[1], Call::Background { gray: 0 });
    log.verify_name("line", Times::Exactly(ArmConfig::default().segments)).unwrap();
    assert_eq!(surface.frame_count(), 1);
}

#[test]
fn segment() {
    let log = CallLog::new();
    let mut surface = RecordingSurface::new(log.clone());
    let mut app = App::new();

    app.segment(&mut surface, 10.0, 20.0, 0.0);

    log.verify(
        &Call::Line {
            x1: 10.0,
            y1: 20.0,
            x2: 10.0 + app.segment_length(),
            y2: 20.0,
        },
        Times::Once,
    )
    .unwrap();
    assert_eq!(log.calls().len(), 1);
}

#[test]
fn mouse_clicked() {
    let (mut spy, mut surface, log) = spied_app();
    sketch::launch(&[], &mut spy, &mut surface).unwrap();

    spy.mouse_clicked(MouseEvent::left(200.0, 100.0));

    log.verify(&Call::MouseClicked { x: 200.0, y: 100.0 }, Times::Once).unwrap();
    let app = spy.into_inner();
    assert!(app.joints().iter().all(|j| *j == Point::new(200.0, 100.0)));
}

#[tokio::test]
async fn settings() {
    let mut spy = Spy::new(App::new());
    let log = spy.log();
    let mut surface = RecordingSurface::wrap(TerminalSurface::new(), log.clone());
    let mut terminal = test_terminal();
    let mut events = ScriptedEvents::new(vec![]);

    app::run_with(
        &[],
        &mut spy,
        &mut surface,
        &mut terminal,
        &mut events,
        Duration::from_millis(1),
    )
    .await
    .unwrap();

    log.verify(&Call::Settings, Times::Once).unwrap();
    log.verify(&size_640x360(), Times::Once).unwrap();
    assert_eq!((surface.width(), surface.height()), (WIDTH, HEIGHT));
}

#[tokio::test]
async fn main_runs_entry_sequence() {
    let mut spy = Spy::new(App::new());
    let log = spy.log();
    let mut surface = RecordingSurface::wrap(TerminalSurface::new(), log.clone());
    let mut terminal = test_terminal();
    let mut events = ScriptedEvents::new(vec![]);
    let args = vec!["--demo".to_string()];

    app::run_with(
        &args,
        &mut spy,
        &mut surface,
        &mut terminal,
        &mut events,
        Duration::from_millis(1),
    )
    .await
    .unwrap();

    let calls = log.calls();
    let pos = |call: &Call| calls.iter().position(|c| c == call).unwrap();
    assert!(pos(&Call::Settings) < pos(&size_640x360()));
    assert!(pos(&size_640x360()) < pos(&Call::Setup));
    assert!(pos(&Call::Setup) < pos(&Call::Draw));
    log.verify(&Call::Setup, Times::Once).unwrap();
    log.verify(&Call::Draw, Times::Once).unwrap();
    assert_eq!(surface.frame_count(), 1);
    assert_eq!(surface.args(), args.as_slice());
}

#[tokio::test]
async fn terminal_click_reaches_mouse_clicked() {
    let mut spy = Spy::new(App::new());
    let log = spy.log();
    let mut surface = RecordingSurface::wrap(TerminalSurface::new(), log.clone());
    let mut terminal = test_terminal();
    // Cell (1, 1) inside the bordered 66x38 canvas is sketch point (5, 5).
    let mut events = ScriptedEvents::new(vec![vec![release(MouseButton::Left, 1, 1)]]);

    app::run_with(
        &[],
        &mut spy,
        &mut surface,
        &mut terminal,
        &mut events,
        Duration::from_millis(1),
    )
    .await
    .unwrap();

    log.verify(&Call::MouseClicked { x: 5.0, y: 5.0 }, Times::Once).unwrap();
    log.verify(&Call::Draw, Times::Exactly(2)).unwrap();
    assert_eq!((surface.mouse_x(), surface.mouse_y()), (5.0, 5.0));
}

#[tokio::test]
async fn right_button_release_also_clicks() {
    let mut spy = Spy::new(App::new());
    let log = spy.log();
    let mut surface = RecordingSurface::wrap(TerminalSurface::new(), log.clone());
    let mut terminal = test_terminal();
    let mut events = ScriptedEvents::new(vec![vec![release(MouseButton::Right, 1, 1)]]);

    app::run_with(
        &[],
        &mut spy,
        &mut surface,
        &mut terminal,
        &mut events,
        Duration::from_millis(1),
    )
    .await
    .unwrap();

    log.verify_name("mouse_clicked", Times::Once).unwrap();
}

#[test]
fn launched_surface_has_sketch_size_and_arguments() {
    let (mut spy, mut surface, log) = spied_app();
    let args = vec!["--demo".to_string()];

    sketch::launch(&args, &mut spy, &mut surface).unwrap();

    log.verify_name("draw", Times::Never).unwrap();
    assert_eq!((surface.width(), surface.height()), (WIDTH, HEIGHT));
    assert_eq!(surface.args(), args.as_slice());
}

#[test]
fn size_with_swapped_arguments_is_not_accepted() {
    let (mut spy, mut surface, log) = spied_app();
    sketch::launch(&[], &mut spy, &mut surface).unwrap();

    let swapped = Call::Size {
        width: 360,
        height: 640,
    };
    log.verify(&swapped, Times::Never).unwrap();
}

struct SmallSketch;

impl Sketch for SmallSketch {
    fn settings(&mut self, surface: &mut dyn Surface) {
        surface.size(100, 100);
    }
    fn setup(&mut self, _surface: &mut dyn Surface) {}
    fn draw(&mut self, _surface: &mut dyn Surface) {}
}

#[test]
fn wrong_size_fails_verification() {
    let mut spy = Spy::new(SmallSketch);
    let mut surface = RecordingSurface::new(spy.log());

    sketch::launch(&[], &mut spy, &mut surface).unwrap();

    let log = spy.log();
    log.verify(&Call::Settings, Times::Once).unwrap();
    let err = log.verify(&size_640x360(), Times::Once).unwrap_err();
    assert!(err.to_string().contains("size(100, 100)"));
}

#[test]
fn repeated_launch_is_not_exactly_once() {
    let (mut spy, mut surface, log) = spied_app();
    sketch::launch(&[], &mut spy, &mut surface).unwrap();
    sketch::launch(&[], &mut spy, &mut surface).unwrap();

    assert!(log.verify(&Call::Settings, Times::Once).is_err());
    log.verify(&size_640x360(), Times::Exactly(2)).unwrap();
}

#[test]
fn launch_call_log() {
    let (mut spy, mut surface, log) = spied_app();
    sketch::launch(&[], &mut spy, &mut surface).unwrap();
    insta::assert_snapshot!(log.to_string());
}
