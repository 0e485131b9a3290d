#![forbid(unsafe_code)]

//! One launcher strip on one monitor.
//!
//! A [`Launcher`] owns the per-monitor state: its sampler, drag controller,
//! reveal state, redraw scheduler and the last sampled frame (used for hit
//! testing). The shared icon collection lives in the controller and is
//! passed in.

use dock_core::{DockConfig, HideMode, Rect};
use dock_edge::{BarrierEvent, BarrierResult, Subscription};
use dock_layout::timing::clamp;
use dock_layout::{
    DragController, DragPhase, DragSettings, FrameParams, LauncherTimes, LayoutSampler,
    SampledFrame, SamplerConfig,
};
use dock_model::{IconCollection, IconId};
use web_time::Instant;

use crate::hide::{RevealChange, RevealReasons, RevealState};
use crate::redraw::RedrawScheduler;

#[derive(Debug)]
pub struct Launcher {
    monitor: usize,
    geometry: Rect,
    area: Rect,
    pub(crate) sampler: LayoutSampler,
    pub(crate) drag: DragController,
    pub(crate) reveal: RevealState,
    pub(crate) redraw: RedrawScheduler,
    pub(crate) hovered: bool,
    pub(crate) hovered_icon: Option<IconId>,
    pub(crate) times: LauncherTimes,
    pub(crate) key_nav: bool,
    pub(crate) shortcuts_shown: bool,
    pub(crate) frame: SampledFrame,
    pub(crate) subscription: Option<Subscription>,
}

impl Launcher {
    pub fn new(monitor: usize, geometry: Rect, config: &DockConfig) -> Self {
        let area = strip_area(geometry, config);
        let mut drag = DragController::new(DragSettings::from_config(config));
        drag.set_area(area);
        Self {
            monitor,
            geometry,
            area,
            sampler: LayoutSampler::from_config(config),
            drag,
            reveal: RevealState::new(config.hide_mode, config.animation.hide_delay()),
            redraw: RedrawScheduler::new(config.animation.frame_interval()),
            hovered: false,
            hovered_icon: None,
            times: LauncherTimes::default(),
            key_nav: false,
            shortcuts_shown: false,
            frame: SampledFrame::default(),
            subscription: None,
        }
    }

    #[inline]
    pub fn monitor(&self) -> usize {
        self.monitor
    }

    /// Monitor rectangle.
    #[inline]
    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    /// Strip area in screen coordinates.
    #[inline]
    pub fn area(&self) -> Rect {
        self.area
    }

    #[inline]
    pub fn is_revealed(&self) -> bool {
        self.reveal.is_revealed()
    }

    #[inline]
    pub fn reveal_reasons(&self) -> RevealReasons {
        self.reveal.reasons()
    }

    #[inline]
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    #[inline]
    pub fn hovered_icon(&self) -> Option<IconId> {
        self.hovered_icon
    }

    #[inline]
    pub fn key_nav_active(&self) -> bool {
        self.key_nav
    }

    #[inline]
    pub fn shortcuts_shown(&self) -> bool {
        self.shortcuts_shown
    }

    #[inline]
    pub fn drag_phase(&self) -> DragPhase {
        self.drag.phase()
    }

    /// Last frame drawn.
    #[inline]
    pub fn frame(&self) -> &SampledFrame {
        &self.frame
    }

    #[inline]
    pub fn frames_drawn(&self) -> u64 {
        self.redraw.frames()
    }

    #[inline]
    pub fn redraw_pending(&self) -> bool {
        self.redraw.is_pending()
    }

    pub(crate) fn set_geometry(&mut self, geometry: Rect, config: &DockConfig) {
        self.geometry = geometry;
        self.area = strip_area(geometry, config);
        self.drag.set_area(self.area);
    }

    pub(crate) fn apply_config(&mut self, config: &DockConfig, now: Instant) -> Option<RevealChange> {
        self.set_geometry(self.geometry, config);
        self.sampler.set_config(SamplerConfig::from_config(config));
        self.drag.set_settings(DragSettings::from_config(config));
        self.redraw.set_interval(config.animation.frame_interval());
        self.reveal.set_hide_delay(config.animation.hide_delay());
        self.reveal.set_mode(config.hide_mode, now)
    }

    pub(crate) fn frame_params(&self, now: Instant) -> FrameParams {
        let mut params = FrameParams::new(self.monitor, self.area);
        params.hovered = self.hovered;
        params.hide_progress = self.reveal.hide_progress(now);
        params.times = LauncherTimes {
            drag_end: self.drag.drag_end_at(),
            autohide_toggle: self.reveal.toggled_at(),
            drag_threshold: self.drag.threshold_changed_at(),
            ..self.times
        };
        params.surface_offset = self.drag.surface_offset();
        params.drag = self.drag.drag_frame();
        params.key_nav = self.key_nav;
        params.shortcuts_shown = self.shortcuts_shown;
        params
    }

    /// Sample a new frame and keep it for hit testing. Returns whether the
    /// launcher is still animating.
    pub(crate) fn sample(&mut self, icons: &mut IconCollection, now: Instant) -> bool {
        let params = self.frame_params(now);
        self.frame = self.sampler.sample(icons, &params, now);
        let offset = self.drag.surface_offset();
        let clamped = clamp(offset, self.frame.scroll_min, 0.0);
        if clamped != offset {
            self.drag.set_surface_offset(clamped);
        }
        self.sampler.animation_in_progress(icons, &params, now)
    }

    /// Subscriber verdict for an edge push on this launcher's monitor.
    pub(crate) fn barrier_verdict(&self, event: &BarrierEvent) -> BarrierResult {
        if self.reveal.mode() == HideMode::Never {
            return BarrierResult::NeedsRelease;
        }
        if self.reveal.is_revealed() {
            return BarrierResult::AlreadyHandled;
        }
        if event.y < self.area.y || event.y > self.area.bottom() {
            return BarrierResult::Ignored;
        }
        BarrierResult::Handled
    }
}

/// The strip hugs the monitor's left edge for its full height.
fn strip_area(geometry: Rect, config: &DockConfig) -> Rect {
    Rect::new(
        geometry.x,
        geometry.y,
        config.layout.launcher_width.min(geometry.width),
        geometry.height,
    )
}
