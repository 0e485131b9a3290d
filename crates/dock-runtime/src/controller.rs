#![forbid(unsafe_code)]

//! The launcher controller.
//!
//! [`LauncherController`] is the single owner of dock state: the icon
//! collection, one [`Launcher`] per monitor, the edge barrier controller and
//! the host collaborators. Every entry point takes the current instant; no
//! method reads a clock.
//!
//! # Tick
//!
//! The host calls [`tick`](LauncherController::tick) whenever
//! [`next_deadline`](LauncherController::next_deadline) passes, or after
//! feeding input. One tick runs, in order:
//!
//! 1. configuration reload (when the shared generation moved);
//! 2. removal grace timers;
//! 3. edge barrier smoothing, decay and re-arm;
//! 4. drag start delays and hide delays;
//! 5. external favorites changes;
//! 6. model events onto the bus;
//! 7. sampling and rendering for every launcher whose redraw is due.
//!
//! # Example
//!
//! ```
//! use dock_core::{Rect, SharedConfig};
//! use dock_model::{Icon, IconKind};
//! use dock_runtime::LauncherController;
//! use web_time::Instant;
//!
//! let now = Instant::now();
//! let mut dock = LauncherController::new(SharedConfig::default());
//! dock.set_monitors(&[Rect::from_size(1280.0, 800.0)], now);
//! dock.add_icon(Icon::new(IconKind::Application).with_uri("files.desktop").visible(), now);
//! let report = dock.tick(now);
//! assert_eq!(report.frames, 1);
//! ```

use dock_core::{Point, Quirk, Rect, SharedConfig, WindowId};
use dock_edge::{
    BarrierBackend, BarrierEvent, BarrierResult, EdgeBarrierController, EdgeOutcome, EdgeTuning,
    NullBackend, Orientation, PointerBarrier, RawHit, SubscriberId,
};
use dock_layout::{DragEvent, hit_test, shortcut_assignments};
use dock_model::{
    FavoriteStore, FavoritesSync, Icon, IconCollection, IconId, MemoryFavoriteStore,
};
use web_time::Instant;

use crate::collaborators::{
    CollaboratorError, NullRenderer, NullWindowSource, Renderer, WindowSource,
};
use crate::event_bus::{DockEvent, EventBus};
use crate::hide::{RevealChange, RevealReasons};
use crate::launcher::Launcher;

/// What one [`LauncherController::tick`] did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Frames rendered across all launchers.
    pub frames: usize,
    /// Icons erased after their removal grace.
    pub erased: Vec<IconId>,
    pub edge_outcomes: Vec<EdgeOutcome>,
    pub next_deadline: Option<Instant>,
}

pub struct LauncherController {
    config: SharedConfig,
    generation: u64,
    icons: IconCollection,
    launchers: Vec<Launcher>,
    edges: EdgeBarrierController,
    bus: EventBus,
    favorites: Box<dyn FavoriteStore>,
    windows: Box<dyn WindowSource>,
    renderer: Box<dyn Renderer>,
}

impl std::fmt::Debug for LauncherController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LauncherController")
            .field("generation", &self.generation)
            .field("icons", &self.icons.len())
            .field("launchers", &self.launchers)
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}

impl LauncherController {
    /// Controller with in-memory favorites and null collaborators.
    pub fn new(config: SharedConfig) -> Self {
        let snapshot = config.load();
        let generation = config.generation();
        Self {
            icons: IconCollection::new().with_removal_grace(snapshot.model.removal_grace()),
            launchers: Vec::new(),
            edges: EdgeBarrierController::new(
                EdgeTuning::from_config(&snapshot.edge),
                Box::new(NullBackend),
            ),
            bus: EventBus::new(),
            favorites: Box::new(MemoryFavoriteStore::new()),
            windows: Box::new(NullWindowSource),
            renderer: Box::new(NullRenderer),
            config,
            generation,
        }
    }

    /// Use real barriers. Call before [`set_monitors`](Self::set_monitors).
    #[must_use]
    pub fn with_barrier_backend(mut self, backend: Box<dyn BarrierBackend>) -> Self {
        self.edges = EdgeBarrierController::new(*self.edges.tuning(), backend);
        self
    }

    #[must_use]
    pub fn with_favorites(mut self, store: Box<dyn FavoriteStore>) -> Self {
        self.favorites = store;
        FavoritesSync::reset_priorities(&mut self.icons, self.favorites.as_ref());
        self
    }

    #[must_use]
    pub fn with_window_source(mut self, windows: Box<dyn WindowSource>) -> Self {
        self.windows = windows;
        self
    }

    #[must_use]
    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[inline]
    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    #[inline]
    pub fn icons(&self) -> &IconCollection {
        &self.icons
    }

    /// Direct access to the collection. Resulting model events reach the
    /// bus on the next tick.
    #[inline]
    pub fn icons_mut(&mut self) -> &mut IconCollection {
        &mut self.icons
    }

    #[inline]
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    #[inline]
    pub fn launchers(&self) -> &[Launcher] {
        &self.launchers
    }

    pub fn launcher(&self, monitor: usize) -> Option<&Launcher> {
        self.launchers.get(monitor)
    }

    #[inline]
    pub fn edges(&self) -> &EdgeBarrierController {
        &self.edges
    }

    pub fn favorites(&self) -> &dyn FavoriteStore {
        self.favorites.as_ref()
    }

    /// Earliest instant at which [`tick`](Self::tick) has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        let launcher_deadlines = self.launchers.iter().flat_map(|l| {
            [
                l.drag.next_deadline(),
                l.reveal.next_deadline(),
                l.redraw.next_deadline(),
            ]
        });
        [self.icons.next_deadline(), self.edges.next_deadline()]
            .into_iter()
            .chain(launcher_deadlines)
            .flatten()
            .min()
    }

    // -----------------------------------------------------------------------
    // Monitors
    // -----------------------------------------------------------------------

    /// Replace the monitor layout: one launcher per monitor, each subscribed
    /// to its left edge.
    pub fn set_monitors(&mut self, monitors: &[Rect], now: Instant) {
        self.edges.set_monitors(monitors);
        self.icons.set_monitor_count(monitors.len());
        if self.launchers.len() > monitors.len() {
            for mut launcher in self.launchers.drain(monitors.len()..) {
                launcher.drag.cancel(&mut self.icons, now);
            }
        }
        let config = self.config.load();
        for (index, rect) in monitors.iter().enumerate() {
            if let Some(launcher) = self.launchers.get_mut(index) {
                launcher.set_geometry(*rect, &config);
            } else {
                let mut launcher = Launcher::new(index, *rect, &config);
                launcher.subscription = self.edges.subscribe(index, Orientation::Vertical);
                self.launchers.push(launcher);
            }
        }
        self.request_redraw_all(now);
        tracing::info!(target: "dock.runtime", monitors = monitors.len(), "monitor layout applied");
    }

    // -----------------------------------------------------------------------
    // Icons
    // -----------------------------------------------------------------------

    /// Insert and show an icon.
    ///
    /// A floating icon lands after the last floating icon, or next to its
    /// neighbouring favorites when its URI is one. Existing icons keep their
    /// slots.
    pub fn add_icon(&mut self, icon: Icon, now: Instant) -> IconId {
        let id = self.icons.insert(icon);
        FavoritesSync::place_new(&mut self.icons, self.favorites.as_ref(), id, now);
        self.request_redraw_all(now);
        id
    }

    /// Fade an icon out and erase it after the removal grace.
    pub fn remove_icon(&mut self, id: IconId, now: Instant) -> bool {
        if !self.icons.mark_for_removal(id, now) {
            return false;
        }
        self.cancel_drag_of(id, now);
        self.icons.set_quirk(id, Quirk::Visible, false, None, now);
        self.request_redraw_all(now);
        true
    }

    /// Bring back an icon that is still inside its removal grace.
    pub fn restore_icon(&mut self, id: IconId, now: Instant) -> bool {
        if !self.icons.get(id).is_some_and(Icon::is_removed) {
            return false;
        }
        self.icons.add_icon(id);
        self.icons.set_quirk(id, Quirk::Visible, true, None, now);
        self.request_redraw_all(now);
        true
    }

    /// Set a quirk and schedule a redraw.
    pub fn set_quirk(
        &mut self,
        id: IconId,
        quirk: Quirk,
        value: bool,
        monitor: Option<usize>,
        now: Instant,
    ) -> bool {
        let changed = self.icons.set_quirk(id, quirk, value, monitor, now);
        if changed {
            self.request_redraw_all(now);
        }
        changed
    }

    /// Replace an icon's windows and refresh its running state.
    pub fn set_windows(&mut self, id: IconId, windows: Vec<WindowId>, now: Instant) -> bool {
        let Some(icon) = self.icons.get_mut(id) else {
            return false;
        };
        icon.set_windows(windows);
        self.sync_icon_windows(id, now);
        true
    }

    /// Refresh RUNNING for every icon from the window source.
    pub fn sync_windows(&mut self, now: Instant) {
        let ids = self.icons.ids().to_vec();
        for id in ids {
            self.sync_icon_windows(id, now);
        }
    }

    fn sync_icon_windows(&mut self, id: IconId, now: Instant) {
        let Some(icon) = self.icons.get(id) else {
            return;
        };
        let windows = icon.windows().to_vec();
        let mut running = Vec::with_capacity(self.launchers.len());
        for monitor in 0..self.launchers.len() {
            match self.running_on(&windows, monitor) {
                Ok(state) => running.push(state),
                Err(err) => {
                    tracing::warn!(
                        target: "dock.runtime",
                        icon = %id,
                        error = %err,
                        "window state unavailable, icon skipped"
                    );
                    return;
                }
            }
        }
        let mut changed = false;
        for (monitor, state) in running.into_iter().enumerate() {
            changed |= self
                .icons
                .set_quirk(id, Quirk::Running, state, Some(monitor), now);
        }
        if changed {
            self.cancel_drag_of(id, now);
            self.request_redraw_all(now);
        }
    }

    fn running_on(&self, windows: &[WindowId], monitor: usize) -> Result<bool, CollaboratorError> {
        for window in windows {
            if self.windows.is_mapped(*window)? && self.windows.visible_on_monitor(*window, monitor)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Focus (or spread) the icon's windows, or request a launch.
    pub fn activate_icon(&mut self, id: IconId, monitor: usize, now: Instant) -> bool {
        let Some(icon) = self.icons.get(id) else {
            return false;
        };
        let windows = icon.windows().to_vec();
        let running = icon.quirk(Quirk::Running, monitor);
        let active = icon.quirk(Quirk::Active, monitor);
        if running && !windows.is_empty() {
            let result = if active {
                self.windows.request_spread(&windows)
            } else {
                self.windows.focus(&windows)
            };
            if let Err(err) = result {
                tracing::warn!(target: "dock.runtime", icon = %id, error = %err, "activation failed");
            }
        } else {
            self.icons.set_quirk(id, Quirk::Starting, true, None, now);
            tracing::debug!(target: "dock.runtime", icon = %id, "launch requested");
            self.bus.publish(&DockEvent::LaunchRequest(id));
        }
        self.request_redraw_all(now);
        true
    }

    // -----------------------------------------------------------------------
    // Edges and reveal
    // -----------------------------------------------------------------------

    /// Feed a raw barrier hit. Processed on the next tick after smoothing.
    pub fn handle_barrier_hit(
        &mut self,
        monitor: usize,
        orientation: Orientation,
        hit: RawHit,
        now: Instant,
    ) -> bool {
        self.edges.handle_hit(monitor, orientation, hit, now)
    }

    /// Host-driven reveal (for example a held modifier key).
    pub fn set_external_reveal(&mut self, monitor: usize, revealed: bool, now: Instant) {
        self.set_reveal_reason(monitor, RevealReasons::EXTERNAL, revealed, now);
    }

    fn dispatch_edges(&mut self, now: Instant) -> Vec<EdgeOutcome> {
        let launchers = &self.launchers;
        let mut verdict = |id: SubscriberId, _: &PointerBarrier, event: &BarrierEvent| {
            launchers
                .iter()
                .find(|l| l.subscription.is_some_and(|s| s.id == id))
                .map_or(BarrierResult::Ignored, |l| l.barrier_verdict(event))
        };
        let outcomes = self.edges.tick(now, &mut verdict);
        for outcome in &outcomes {
            if let EdgeOutcome::Overcome { monitor, .. } = *outcome {
                self.set_reveal_reason(monitor, RevealReasons::EDGE, true, now);
            }
            self.bus.publish(&DockEvent::Barrier(*outcome));
        }
        outcomes
    }

    fn set_reveal_reason(&mut self, monitor: usize, reason: RevealReasons, on: bool, now: Instant) {
        let Some(launcher) = self.launchers.get_mut(monitor) else {
            return;
        };
        let change = launcher.reveal.set_reason(reason, on, now);
        if let Some(change) = change {
            launcher.redraw.request(now);
            self.publish_reveal(monitor, change);
        }
    }

    fn publish_reveal(&self, monitor: usize, change: RevealChange) {
        tracing::debug!(target: "dock.runtime", monitor, ?change, "launcher visibility changed");
        let event = match change {
            RevealChange::Revealed => DockEvent::Revealed { monitor },
            RevealChange::Hidden => DockEvent::Hidden { monitor },
        };
        self.bus.publish(&event);
    }

    // -----------------------------------------------------------------------
    // Pointer input
    // -----------------------------------------------------------------------

    pub fn mouse_enter(&mut self, monitor: usize, now: Instant) {
        let Some(launcher) = self.launchers.get_mut(monitor) else {
            return;
        };
        if launcher.hovered {
            return;
        }
        launcher.hovered = true;
        launcher.times.hover_enter = Some(now);
        launcher.redraw.request(now);
        self.set_reveal_reason(monitor, RevealReasons::HOVER, true, now);
    }

    pub fn mouse_leave(&mut self, monitor: usize, now: Instant) {
        let Some(launcher) = self.launchers.get_mut(monitor) else {
            return;
        };
        if !launcher.hovered {
            return;
        }
        launcher.hovered = false;
        launcher.times.hover_leave = Some(now);
        launcher.redraw.request(now);
        if let Some(icon) = launcher.hovered_icon.take() {
            self.bus.publish(&DockEvent::MouseLeave { icon, monitor });
        }
        self.set_reveal_reason(monitor, RevealReasons::HOVER, false, now);
        self.set_reveal_reason(monitor, RevealReasons::EDGE, false, now);
    }

    pub fn mouse_down(&mut self, monitor: usize, point: Point, now: Instant) {
        let Some(launcher) = self.launchers.get_mut(monitor) else {
            return;
        };
        let hit = hit_test(&launcher.frame.args, point, launcher.sampler.config().icon_size);
        launcher.drag.mouse_down(&self.icons, hit, point, now);
        if let Some(icon) = hit {
            self.bus.publish(&DockEvent::MouseDown { icon, monitor });
        }
    }

    pub fn mouse_move(&mut self, monitor: usize, point: Point, now: Instant) {
        let Some(launcher) = self.launchers.get_mut(monitor) else {
            return;
        };
        let events = launcher
            .drag
            .mouse_move(&mut self.icons, &launcher.frame.args, point, now);
        let hit = if launcher.drag.is_dragging_icon() {
            None
        } else {
            hit_test(&launcher.frame.args, point, launcher.sampler.config().icon_size)
        };
        let previous = std::mem::replace(&mut launcher.hovered_icon, hit);
        if previous != hit {
            launcher.redraw.request(now);
            if let Some(icon) = previous {
                self.bus.publish(&DockEvent::MouseLeave { icon, monitor });
            }
            if let Some(icon) = hit {
                self.bus.publish(&DockEvent::MouseEnter { icon, monitor });
            }
        }
        self.handle_drag_events(monitor, events, now);
    }

    pub fn mouse_up(&mut self, monitor: usize, point: Point, now: Instant) {
        let Some(launcher) = self.launchers.get_mut(monitor) else {
            return;
        };
        let hit = hit_test(&launcher.frame.args, point, launcher.sampler.config().icon_size);
        let events = launcher
            .drag
            .mouse_up(&mut self.icons, &launcher.frame.args, point, now);
        if let Some(icon) = hit {
            self.bus.publish(&DockEvent::MouseUp { icon, monitor });
        }
        self.handle_drag_events(monitor, events, now);
    }

    /// Escape: abort every drag in progress.
    pub fn cancel_drag(&mut self, now: Instant) {
        for monitor in 0..self.launchers.len() {
            let event = self.launchers[monitor].drag.cancel(&mut self.icons, now);
            self.handle_drag_events(monitor, event.into_iter().collect(), now);
        }
    }

    fn cancel_drag_of(&mut self, id: IconId, now: Instant) {
        for monitor in 0..self.launchers.len() {
            if self.launchers[monitor].drag.dragged_icon() != Some(id) {
                continue;
            }
            let event = self.launchers[monitor].drag.cancel(&mut self.icons, now);
            self.handle_drag_events(monitor, event.into_iter().collect(), now);
        }
    }

    fn handle_drag_events(&mut self, monitor: usize, events: Vec<DragEvent>, now: Instant) {
        if events.is_empty() {
            return;
        }
        for event in events {
            match event {
                DragEvent::Started(_) => {
                    self.set_reveal_reason(monitor, RevealReasons::DRAG, true, now);
                }
                DragEvent::SaveOrder(_) => {
                    FavoritesSync::save_order(&self.icons, self.favorites.as_mut());
                    self.set_reveal_reason(monitor, RevealReasons::DRAG, false, now);
                }
                DragEvent::Dropped(_) | DragEvent::Cancelled(_) => {
                    self.set_reveal_reason(monitor, RevealReasons::DRAG, false, now);
                }
                DragEvent::RemoveRequest(icon) => {
                    self.set_reveal_reason(monitor, RevealReasons::DRAG, false, now);
                    self.request_removal(icon, now);
                }
                DragEvent::Clicked(icon) => {
                    self.bus.publish(&DockEvent::MouseClick { icon, monitor });
                    self.activate_icon(icon, monitor, now);
                }
                DragEvent::ThresholdCrossed { .. }
                | DragEvent::Reordered { .. }
                | DragEvent::SurfaceScrolled(_) => {}
            }
        }
        if let Some(launcher) = self.launchers.get_mut(monitor) {
            launcher.redraw.request(now);
        }
    }

    /// Unpin an icon dropped on the trash; erase it too if nothing runs.
    fn request_removal(&mut self, id: IconId, now: Instant) {
        self.bus.publish(&DockEvent::RemoveRequest(id));
        let Some(icon) = self.icons.get(id) else {
            return;
        };
        let uri = icon.uri().map(str::to_owned);
        let running = (0..self.launchers.len()).any(|m| icon.quirk(Quirk::Running, m));
        if icon.is_sticky() {
            self.icons.set_sticky(id, false);
            if let Some(uri) = uri {
                self.favorites.remove_favorite(&uri);
            }
        }
        if !running {
            self.remove_icon(id, now);
        }
    }

    // -----------------------------------------------------------------------
    // Keyboard
    // -----------------------------------------------------------------------

    /// Enter keyboard navigation on `monitor`, selecting the first icon.
    pub fn start_key_nav(&mut self, monitor: usize, now: Instant) -> bool {
        if monitor >= self.launchers.len() || self.launchers.iter().any(|l| l.key_nav) {
            return false;
        }
        let launcher = &mut self.launchers[monitor];
        launcher.key_nav = true;
        launcher.redraw.request(now);
        self.icons.set_selection(0);
        self.set_reveal_reason(monitor, RevealReasons::KEY_NAV, true, now);
        true
    }

    pub fn key_nav_next(&mut self, now: Instant) -> bool {
        self.step_key_nav(true, now)
    }

    pub fn key_nav_previous(&mut self, now: Instant) -> bool {
        self.step_key_nav(false, now)
    }

    fn step_key_nav(&mut self, forward: bool, now: Instant) -> bool {
        let Some(monitor) = self.launchers.iter().position(|l| l.key_nav) else {
            return false;
        };
        let moved = if forward {
            self.icons.select_next()
        } else {
            self.icons.select_previous()
        };
        self.launchers[monitor].redraw.request(now);
        moved
    }

    /// Leave keyboard navigation, optionally activating the selection.
    pub fn end_key_nav(&mut self, activate: bool, now: Instant) -> Option<IconId> {
        let monitor = self.launchers.iter().position(|l| l.key_nav)?;
        let launcher = &mut self.launchers[monitor];
        launcher.key_nav = false;
        launcher.redraw.request(now);
        self.set_reveal_reason(monitor, RevealReasons::KEY_NAV, false, now);
        let selected = self.icons.selected().filter(|_| activate)?;
        self.activate_icon(selected, monitor, now);
        Some(selected)
    }

    /// Show or hide the digit labels; showing them also reveals the launcher.
    pub fn show_shortcuts(&mut self, monitor: usize, shown: bool, now: Instant) {
        let Some(launcher) = self.launchers.get_mut(monitor) else {
            return;
        };
        if launcher.shortcuts_shown == shown {
            return;
        }
        launcher.shortcuts_shown = shown;
        launcher.redraw.request(now);
        self.set_reveal_reason(monitor, RevealReasons::EXTERNAL, shown, now);
    }

    /// Activate the icon labelled `key` (`'1'`–`'9'`, `'0'`).
    pub fn activate_shortcut(&mut self, monitor: usize, key: char, now: Instant) -> Option<IconId> {
        let id = shortcut_assignments(&self.icons)
            .into_iter()
            .find(|(_, label)| *label == key)
            .map(|(id, _)| id)?;
        self.activate_icon(id, monitor, now);
        Some(id)
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    pub fn tick(&mut self, now: Instant) -> TickReport {
        self.reload_config(now);

        let erased = self.icons.process_timers(now);
        for id in &erased {
            for launcher in &mut self.launchers {
                launcher.drag.forget(*id);
                if launcher.hovered_icon == Some(*id) {
                    launcher.hovered_icon = None;
                }
            }
        }

        let edge_outcomes = self.dispatch_edges(now);

        for monitor in 0..self.launchers.len() {
            let events = self.launchers[monitor].drag.tick(&self.icons, now);
            self.handle_drag_events(monitor, events, now);
            let launcher = &mut self.launchers[monitor];
            if let Some(change) = launcher.reveal.tick(now) {
                launcher.redraw.request(now);
                self.publish_reveal(monitor, change);
            }
        }

        if FavoritesSync::sync(&mut self.icons, self.favorites.as_mut(), now) {
            self.request_redraw_all(now);
        }
        self.flush_model_events(now);

        let frames = self.render_due(now);
        TickReport {
            frames,
            erased,
            edge_outcomes,
            next_deadline: self.next_deadline(),
        }
    }

    fn reload_config(&mut self, now: Instant) {
        let generation = self.config.generation();
        if generation == self.generation {
            return;
        }
        self.generation = generation;
        let config = self.config.load();
        self.edges.set_tuning(EdgeTuning::from_config(&config.edge));
        self.icons.set_removal_grace(config.model.removal_grace());
        for monitor in 0..self.launchers.len() {
            let launcher = &mut self.launchers[monitor];
            let change = launcher.apply_config(&config, now);
            launcher.redraw.request(now);
            if let Some(change) = change {
                self.publish_reveal(monitor, change);
            }
        }
        tracing::debug!(target: "dock.runtime", generation, "configuration applied");
    }

    fn flush_model_events(&mut self, now: Instant) {
        let events = self.icons.take_events();
        if events.is_empty() {
            return;
        }
        self.request_redraw_all(now);
        for event in events {
            self.bus.publish(&DockEvent::from(event));
        }
    }

    fn render_due(&mut self, now: Instant) -> usize {
        let mut frames = 0;
        for launcher in &mut self.launchers {
            if !launcher.redraw.is_due(now) {
                continue;
            }
            let animating = launcher.sample(&mut self.icons, now);
            if let Err(err) = self.renderer.render(launcher.monitor(), &launcher.frame) {
                tracing::warn!(
                    target: "dock.runtime",
                    monitor = launcher.monitor(),
                    error = %err,
                    "frame dropped"
                );
            }
            launcher.redraw.on_frame(now, animating);
            frames += 1;
        }
        frames
    }

    fn request_redraw_all(&mut self, now: Instant) {
        for launcher in &mut self.launchers {
            launcher.redraw.request(now);
        }
    }
}
