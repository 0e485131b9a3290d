#![forbid(unsafe_code)]

//! End-to-end launcher controller scenarios.
//!
//! Run:
//!   cargo test -p dock-runtime --test controller_scenarios

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use dock_core::{DockConfig, HideMode, Point, Quirk, Rect, SharedConfig, WindowId};
use dock_edge::{EdgeOutcome, Orientation, RawHit};
use dock_layout::SampledFrame;
use dock_model::{Icon, IconId, IconKind, MemoryFavoriteStore};
use dock_runtime::{
    BusSubscription, CollaboratorError, DockEvent, LauncherController, Renderer, WindowSource,
};
use web_time::Instant;

const MS_1: Duration = Duration::from_millis(1);
const MS_100: Duration = Duration::from_millis(100);
const MS_600: Duration = Duration::from_millis(600);
const SEC_1: Duration = Duration::from_secs(1);

// ============================================================================
// Fixtures
// ============================================================================

type Log = Rc<RefCell<Vec<String>>>;

#[derive(Default)]
struct FakeWindows {
    mapped: Vec<WindowId>,
    offline: bool,
    calls: Log,
}

impl WindowSource for FakeWindows {
    fn is_mapped(&self, window: WindowId) -> Result<bool, CollaboratorError> {
        if self.offline {
            return Err(CollaboratorError::WindowSource("offline".into()));
        }
        Ok(self.mapped.contains(&window))
    }

    fn visible_on_monitor(&self, _: WindowId, monitor: usize) -> Result<bool, CollaboratorError> {
        Ok(monitor == 0)
    }

    fn focus(&mut self, windows: &[WindowId]) -> Result<(), CollaboratorError> {
        self.calls.borrow_mut().push(format!("focus {windows:?}"));
        Ok(())
    }

    fn request_spread(&mut self, windows: &[WindowId]) -> Result<(), CollaboratorError> {
        self.calls.borrow_mut().push(format!("spread {windows:?}"));
        Ok(())
    }
}

struct FakeRenderer {
    fail: bool,
    frames: Rc<RefCell<Vec<(usize, usize)>>>,
}

impl Renderer for FakeRenderer {
    fn render(&mut self, monitor: usize, frame: &SampledFrame) -> Result<(), CollaboratorError> {
        self.frames.borrow_mut().push((monitor, frame.args.len()));
        if self.fail {
            return Err(CollaboratorError::Render {
                monitor,
                reason: "lost context".into(),
            });
        }
        Ok(())
    }
}

fn screen() -> Rect {
    Rect::from_size(1280.0, 800.0)
}

fn app(uri: &str) -> Icon {
    Icon::new(IconKind::Application).with_uri(uri).visible()
}

fn record(dock: &LauncherController) -> (Rc<RefCell<Vec<DockEvent>>>, BusSubscription) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let sub = dock
        .bus()
        .subscribe(move |event| sink.borrow_mut().push(event.clone()));
    (seen, sub)
}

fn dock_with(config: DockConfig) -> LauncherController {
    let mut dock = LauncherController::new(SharedConfig::new(config));
    dock.set_monitors(&[screen()], Instant::now());
    dock
}

fn center_of(dock: &LauncherController, id: IconId) -> Point {
    let arg = dock
        .launcher(0)
        .unwrap()
        .frame()
        .args
        .iter()
        .find(|a| a.icon == id)
        .cloned()
        .unwrap();
    arg.logical_center.xy()
}

fn click(dock: &mut LauncherController, point: Point, now: Instant) {
    dock.mouse_down(0, point, now);
    dock.mouse_up(0, point, now);
}

// ============================================================================
// Redraw
// ============================================================================

#[test]
fn first_tick_renders_then_goes_idle() {
    let t0 = Instant::now();
    let frames = Rc::new(RefCell::new(Vec::new()));
    let mut dock = LauncherController::new(SharedConfig::default()).with_renderer(Box::new(
        FakeRenderer {
            fail: false,
            frames: Rc::clone(&frames),
        },
    ));
    dock.set_monitors(&[screen()], t0);
    dock.add_icon(app("files"), t0);

    let report = dock.tick(t0);
    assert_eq!(report.frames, 1);
    assert_eq!(*frames.borrow(), vec![(0, 1)]);

    let report = dock.tick(t0 + SEC_1);
    assert_eq!(report.frames, 0);
    assert_eq!(report.next_deadline, None);
}

#[test]
fn render_errors_do_not_stop_the_tick() {
    let t0 = Instant::now();
    let frames = Rc::new(RefCell::new(Vec::new()));
    let mut dock = LauncherController::new(SharedConfig::default()).with_renderer(Box::new(
        FakeRenderer {
            fail: true,
            frames: Rc::clone(&frames),
        },
    ));
    dock.set_monitors(&[screen(), Rect::new(1280.0, 0.0, 1024.0, 768.0)], t0);
    let report = dock.tick(t0);
    assert_eq!(report.frames, 2);
    assert_eq!(frames.borrow().len(), 2);
    assert!(!dock.launcher(0).unwrap().redraw_pending());
}

// ============================================================================
// Activation
// ============================================================================

#[test]
fn click_without_windows_requests_launch() {
    let t0 = Instant::now();
    let mut dock = dock_with(DockConfig::default());
    let (seen, _sub) = record(&dock);
    let id = dock.add_icon(app("files"), t0);
    dock.tick(t0);

    let p = center_of(&dock, id);
    click(&mut dock, p, t0 + MS_100);

    let events = seen.borrow();
    assert!(events.contains(&DockEvent::MouseDown { icon: id, monitor: 0 }));
    assert!(events.contains(&DockEvent::MouseUp { icon: id, monitor: 0 }));
    assert!(events.contains(&DockEvent::MouseClick { icon: id, monitor: 0 }));
    assert!(events.contains(&DockEvent::LaunchRequest(id)));
    assert!(dock.icons().get(id).unwrap().quirk(Quirk::Starting, 0));
}

#[test]
fn click_on_running_icon_focuses_its_windows() {
    let t0 = Instant::now();
    let calls: Log = Rc::default();
    let mut dock = LauncherController::new(SharedConfig::default()).with_window_source(Box::new(
        FakeWindows {
            mapped: vec![7],
            offline: false,
            calls: Rc::clone(&calls),
        },
    ));
    dock.set_monitors(&[screen()], t0);
    let (seen, _sub) = record(&dock);
    let id = dock.add_icon(app("term"), t0);
    assert!(dock.set_windows(id, vec![7], t0));
    assert!(dock.icons().get(id).unwrap().quirk(Quirk::Running, 0));
    dock.tick(t0);

    let p = center_of(&dock, id);
    click(&mut dock, p, t0 + MS_100);

    assert_eq!(*calls.borrow(), vec!["focus [7]".to_string()]);
    assert!(!seen.borrow().contains(&DockEvent::LaunchRequest(id)));
}

#[test]
fn window_source_failure_skips_the_icon() {
    let t0 = Instant::now();
    let mut dock = LauncherController::new(SharedConfig::default()).with_window_source(Box::new(
        FakeWindows {
            offline: true,
            ..FakeWindows::default()
        },
    ));
    dock.set_monitors(&[screen()], t0);
    let id = dock.add_icon(app("term"), t0);
    assert!(dock.set_windows(id, vec![7], t0));
    dock.sync_windows(t0);
    assert!(!dock.icons().get(id).unwrap().quirk(Quirk::Running, 0));
}

#[test]
fn shortcut_and_key_nav_activate_icons() {
    let t0 = Instant::now();
    let mut dock = dock_with(DockConfig::default());
    let (seen, _sub) = record(&dock);
    let _first = dock.add_icon(app("a"), t0);
    let second = dock.add_icon(app("b"), t0);

    assert_eq!(dock.activate_shortcut(0, '2', t0), Some(second));
    assert_eq!(dock.activate_shortcut(0, '9', t0), None);

    assert!(dock.start_key_nav(0, t0));
    assert!(!dock.start_key_nav(0, t0));
    assert!(dock.key_nav_next(t0));
    assert_eq!(dock.end_key_nav(true, t0), Some(second));
    assert!(!dock.launcher(0).unwrap().key_nav_active());

    let launches = seen
        .borrow()
        .iter()
        .filter(|e| **e == DockEvent::LaunchRequest(second))
        .count();
    assert_eq!(launches, 2);
}

// ============================================================================
// Reveal
// ============================================================================

#[test]
fn edge_push_reveals_and_leave_hides_after_delay() {
    let mut config = DockConfig::default();
    config.hide_mode = HideMode::Autohide;
    config.edge.resistance = false;
    let hide_delay = config.animation.hide_delay();
    let mut dock = dock_with(config);
    let (seen, _sub) = record(&dock);
    assert!(!dock.launcher(0).unwrap().is_revealed());

    let t0 = Instant::now();
    assert!(dock.handle_barrier_hit(0, Orientation::Vertical, RawHit::new(0.0, 120.0, 400.0, 1), t0));
    let report = dock.tick(t0 + MS_100);
    assert!(matches!(
        report.edge_outcomes.as_slice(),
        [EdgeOutcome::Overcome { monitor: 0, .. }]
    ));
    assert!(dock.launcher(0).unwrap().is_revealed());
    assert!(seen.borrow().contains(&DockEvent::Revealed { monitor: 0 }));

    let t1 = t0 + SEC_1;
    dock.mouse_enter(0, t1);
    dock.mouse_leave(0, t1 + MS_100);
    dock.tick(t1 + MS_100 + hide_delay - MS_1);
    assert!(dock.launcher(0).unwrap().is_revealed());
    dock.tick(t1 + MS_100 + hide_delay);
    assert!(!dock.launcher(0).unwrap().is_revealed());
    assert!(seen.borrow().contains(&DockEvent::Hidden { monitor: 0 }));
}

#[test]
fn config_reload_applies_hide_mode() {
    let t0 = Instant::now();
    let mut dock = dock_with(DockConfig::default());
    let (seen, _sub) = record(&dock);
    assert!(dock.launcher(0).unwrap().is_revealed());

    let mut next = DockConfig::default();
    next.hide_mode = HideMode::Autohide;
    dock.config().store(next);
    dock.tick(t0 + MS_100);
    assert!(!dock.launcher(0).unwrap().is_revealed());
    assert!(seen.borrow().contains(&DockEvent::Hidden { monitor: 0 }));

    dock.set_external_reveal(0, true, t0 + SEC_1);
    assert!(dock.launcher(0).unwrap().is_revealed());
}

// ============================================================================
// Membership
// ============================================================================

#[test]
fn removal_waits_out_the_grace_period() {
    let t0 = Instant::now();
    let mut dock = dock_with(DockConfig::default());
    let (seen, _sub) = record(&dock);
    let id = dock.add_icon(app("files"), t0);
    let grace = dock.icons().removal_grace();

    assert!(dock.remove_icon(id, t0));
    let report = dock.tick(t0 + grace - MS_1);
    assert!(report.erased.is_empty());
    assert!(dock.icons().contains(id));

    let report = dock.tick(t0 + grace);
    assert_eq!(report.erased, vec![id]);
    assert!(!dock.icons().contains(id));
    assert!(seen.borrow().contains(&DockEvent::IconRemoved(id)));
}

#[test]
fn restore_inside_grace_keeps_the_icon() {
    let t0 = Instant::now();
    let mut dock = dock_with(DockConfig::default());
    let id = dock.add_icon(app("files"), t0);
    dock.remove_icon(id, t0);
    assert!(dock.restore_icon(id, t0 + MS_100));
    let report = dock.tick(t0 + SEC_1 * 5);
    assert!(report.erased.is_empty());
    assert!(dock.icons().get(id).unwrap().is_visible());
    assert!(!dock.restore_icon(id, t0 + SEC_1 * 5));
}

#[test]
fn favorites_order_new_icons() {
    let t0 = Instant::now();
    let mut dock = LauncherController::new(SharedConfig::default())
        .with_favorites(Box::new(MemoryFavoriteStore::with_favorites(["b", "a"])));
    dock.set_monitors(&[screen()], t0);
    let a = dock.add_icon(app("a"), t0);
    let b = dock.add_icon(app("b"), t0);
    let loose = dock.add_icon(app("c"), t0);
    assert_eq!(dock.icons().ids(), &[b, a, loose]);
    assert!(dock.icons().get(a).unwrap().is_sticky());
    assert!(!dock.icons().get(loose).unwrap().is_sticky());
}

#[test]
fn new_icon_keeps_user_order() {
    let t0 = Instant::now();
    let mut dock = LauncherController::new(SharedConfig::default())
        .with_favorites(Box::new(MemoryFavoriteStore::with_favorites(["a", "b"])));
    dock.set_monitors(&[screen()], t0);
    let a = dock.add_icon(app("a"), t0);
    let b = dock.add_icon(app("b"), t0);
    let x = dock.add_icon(app("x"), t0);
    assert!(dock.icons_mut().reorder_before(x, a, false, t0));
    assert_eq!(dock.icons().ids(), &[x, a, b]);

    let y = dock.add_icon(app("y"), t0);
    assert_eq!(dock.icons().ids(), &[x, a, b, y]);
}

#[test]
fn events_reach_icon_subscribers_only_for_their_icon() {
    let t0 = Instant::now();
    let mut dock = dock_with(DockConfig::default());
    let a = dock.add_icon(app("a"), t0);
    let b = dock.add_icon(app("b"), t0);
    dock.tick(t0);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _sub = dock
        .bus()
        .subscribe_icon(b, move |event| sink.borrow_mut().push(event.clone()));
    let p = center_of(&dock, a);
    click(&mut dock, p, t0 + MS_100);
    assert!(seen.borrow().is_empty());
    let p = center_of(&dock, b);
    click(&mut dock, p, t0 + MS_600);
    assert!(seen.borrow().contains(&DockEvent::LaunchRequest(b)));
}
