#![forbid(unsafe_code)]

//! Drag and reorder controller.
//!
//! Turns pointer input over the launcher strip into icon drags, surface
//! scrolls and clicks, reordering the collection as the pointer moves.
//!
//! # State Machine
//!
//! ```text
//!             down on icon / strip
//!   Idle ───────────────────────────► Pending
//!    ▲                                  │ motion past dead-zone:
//!    │                                  │   mostly vertical   → DraggingSurface
//!    │                                  │   mostly horizontal → DraggingIcon
//!    │                                  │ start delay expires → DraggingIcon
//!    └──── up / cancel ◄────────────────┘
//! ```
//!
//! Only floating, draggable icons can be dragged. Everything else can still
//! be clicked or used to scroll the strip.
//!
//! # Invariants
//!
//! 1. Click and drag never both fire for one press.
//! 2. [`DragController::cancel`] is idempotent: the second call is a no-op.
//! 3. Cancelling or dropping on trash puts the icon back next to the
//!    neighbour it had when the drag started, not at its old index.
//! 4. Hit tests run against the previous frame's render arguments, so they
//!    are one frame stale.

use std::time::Duration;

use dock_core::{DockConfig, Point, Quirk, Rect};
use dock_model::{Icon, IconCollection, IconId, IconKind, IconPosition};
use web_time::Instant;

use crate::render_arg::{RenderArg, hit_test};
use crate::sampler::DragFrame;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Drag thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSettings {
    /// Hold time after which a press becomes an icon drag (default: 250ms).
    pub start_delay: Duration,
    /// Pointer travel before a press turns into a drag (default: 15px).
    pub deadzone: f32,
    /// Travel from the last insertion point before reordering past an icon
    /// (default: 24px).
    pub reorder_threshold: f32,
    pub icon_size: f32,
}

impl Default for DragSettings {
    fn default() -> Self {
        Self::from_config(&DockConfig::default())
    }
}

impl DragSettings {
    pub fn from_config(config: &DockConfig) -> Self {
        Self {
            start_delay: config.drag.start_delay(),
            deadzone: config.drag.deadzone,
            reorder_threshold: config.drag.reorder_threshold,
            icon_size: config.layout.icon_size,
        }
    }
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Pending,
    DraggingIcon,
    DraggingSurface,
}

/// Floating stand-in drawn at the pointer while an icon is dragged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragProxy {
    pub icon: IconId,
    pub position: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    Started(IconId),
    /// The pointer crossed the drag-out threshold.
    ThresholdCrossed { icon: IconId, beyond: bool },
    Reordered { icon: IconId, other: IconId },
    SurfaceScrolled(f32),
    /// Dropped at a new index; favorites order should be saved.
    SaveOrder(IconId),
    /// Dropped where it started.
    Dropped(IconId),
    /// Dropped on trash.
    RemoveRequest(IconId),
    Cancelled(IconId),
    Clicked(IconId),
}

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct Press {
    icon: Option<IconId>,
    origin: Point,
    at: Instant,
    draggable: bool,
}

#[derive(Debug, Clone, Copy)]
struct IconDrag {
    icon: IconId,
    restore: Option<(IconId, bool)>,
    start_index: Option<usize>,
    last_insert: Point,
    beyond: bool,
}

#[derive(Debug, Clone, Copy)]
struct SurfaceDrag {
    origin_y: f32,
    base: f32,
}

/// Pointer-driven drag state for one launcher.
#[derive(Debug, Clone)]
pub struct DragController {
    settings: DragSettings,
    area: Rect,
    press: Option<Press>,
    icon_drag: Option<IconDrag>,
    surface: Option<SurfaceDrag>,
    proxy: Option<DragProxy>,
    surface_offset: f32,
    threshold_changed_at: Option<Instant>,
    drag_end_at: Option<Instant>,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(DragSettings::default())
    }
}

impl DragController {
    #[must_use]
    pub fn new(settings: DragSettings) -> Self {
        Self {
            settings,
            area: Rect::default(),
            press: None,
            icon_drag: None,
            surface: None,
            proxy: None,
            surface_offset: 0.0,
            threshold_changed_at: None,
            drag_end_at: None,
        }
    }

    #[inline]
    pub fn settings(&self) -> &DragSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: DragSettings) {
        self.settings = settings;
    }

    /// Launcher strip; dragging past its right edge crosses the threshold.
    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }

    pub fn phase(&self) -> DragPhase {
        if self.icon_drag.is_some() {
            DragPhase::DraggingIcon
        } else if self.surface.is_some() {
            DragPhase::DraggingSurface
        } else if self.press.is_some() {
            DragPhase::Pending
        } else {
            DragPhase::Idle
        }
    }

    #[inline]
    pub fn is_dragging_icon(&self) -> bool {
        self.icon_drag.is_some()
    }

    pub fn dragged_icon(&self) -> Option<IconId> {
        self.icon_drag.map(|d| d.icon)
    }

    #[inline]
    pub fn proxy(&self) -> Option<DragProxy> {
        self.proxy
    }

    /// What the sampler needs to know about the current drag.
    pub fn drag_frame(&self) -> Option<DragFrame> {
        self.icon_drag.map(|d| DragFrame {
            icon: d.icon,
            beyond_threshold: d.beyond,
        })
    }

    #[inline]
    pub fn threshold_changed_at(&self) -> Option<Instant> {
        self.threshold_changed_at
    }

    #[inline]
    pub fn drag_end_at(&self) -> Option<Instant> {
        self.drag_end_at
    }

    #[inline]
    pub fn surface_offset(&self) -> f32 {
        self.surface_offset
    }

    /// Clamp or reset the accumulated scroll (e.g. on pointer leave).
    pub fn set_surface_offset(&mut self, offset: f32) {
        self.surface_offset = offset;
    }

    /// When the pending press turns into an icon drag on its own.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.press
            .filter(|p| p.draggable)
            .map(|p| p.at + self.settings.start_delay)
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Button pressed over `hit` (the icon under the pointer, if any).
    pub fn mouse_down(&mut self, icons: &IconCollection, hit: Option<IconId>, point: Point, now: Instant) {
        if self.icon_drag.is_some() || self.surface.is_some() {
            return;
        }
        let draggable = hit
            .and_then(|id| icons.get(id))
            .is_some_and(|icon| {
                icon.capabilities().draggable && icon.position() == IconPosition::Floating
            });
        self.press = Some(Press {
            icon: hit,
            origin: point,
            at: now,
            draggable,
        });
    }

    /// Pointer moved. `args` is the previous frame's sample.
    pub fn mouse_move(
        &mut self,
        icons: &mut IconCollection,
        args: &[RenderArg],
        point: Point,
        now: Instant,
    ) -> Vec<DragEvent> {
        let mut out = Vec::new();
        if self.icon_drag.is_some() {
            self.move_icon(icons, args, point, now, &mut out);
        } else if let Some(surface) = self.surface {
            self.surface_offset = surface.base + (point.y - surface.origin_y);
            out.push(DragEvent::SurfaceScrolled(self.surface_offset));
        } else if let Some(press) = self.press {
            let dx = point.x - press.origin.x;
            let dy = point.y - press.origin.y;
            if dx.hypot(dy) <= self.settings.deadzone {
                return out;
            }
            self.press = None;
            if dy.abs() > dx.abs() {
                self.surface = Some(SurfaceDrag {
                    origin_y: press.origin.y,
                    base: self.surface_offset,
                });
                self.surface_offset += dy;
                tracing::trace!(target: "dock.drag", "surface drag started");
                out.push(DragEvent::SurfaceScrolled(self.surface_offset));
            } else if let (true, Some(icon)) = (press.draggable, press.icon) {
                self.start_icon(icons, icon, press.origin, &mut out);
                self.move_icon(icons, args, point, now, &mut out);
            }
        }
        out
    }

    /// Button released. `args` is the previous frame's sample.
    pub fn mouse_up(
        &mut self,
        icons: &mut IconCollection,
        args: &[RenderArg],
        point: Point,
        now: Instant,
    ) -> Vec<DragEvent> {
        let mut out = Vec::new();
        if let Some(drag) = self.icon_drag.take() {
            self.proxy = None;
            self.drag_end_at = Some(now);
            let target = hit_test(args, point, self.settings.icon_size)
                .filter(|id| icons.get(*id).map(Icon::kind) == Some(IconKind::Trash));
            if let Some(trash) = target {
                Self::restore(icons, &drag, now);
                if let Some(icon) = icons.get_mut(trash) {
                    icon.set_quirk(Quirk::PulseOnce, true, None, now);
                    icon.restamp_quirk(Quirk::PulseOnce, None, now);
                }
                tracing::debug!(target: "dock.drag", icon = %drag.icon, "dropped on trash");
                out.push(DragEvent::RemoveRequest(drag.icon));
            } else if icons.index_of(drag.icon) != drag.start_index {
                tracing::debug!(target: "dock.drag", icon = %drag.icon, "dropped at new index");
                out.push(DragEvent::SaveOrder(drag.icon));
            } else {
                out.push(DragEvent::Dropped(drag.icon));
            }
        } else if self.surface.take().is_some() {
            tracing::trace!(target: "dock.drag", offset = self.surface_offset, "surface drag ended");
        } else if let Some(press) = self.press.take()
            && let Some(icon) = press.icon
        {
            out.push(DragEvent::Clicked(icon));
        }
        self.press = None;
        out
    }

    /// Fire the start-delay timer.
    pub fn tick(&mut self, icons: &IconCollection, now: Instant) -> Vec<DragEvent> {
        let mut out = Vec::new();
        let Some(press) = self.press else {
            return out;
        };
        if let (true, Some(icon)) = (press.draggable, press.icon)
            && now.saturating_duration_since(press.at) >= self.settings.start_delay
        {
            self.press = None;
            self.start_icon(icons, icon, press.origin, &mut out);
        }
        out
    }

    /// Abort the current interaction (Escape, window mapped or unmapped,
    /// external signal).
    pub fn cancel(&mut self, icons: &mut IconCollection, now: Instant) -> Option<DragEvent> {
        self.press = None;
        self.surface = None;
        let drag = self.icon_drag.take()?;
        self.proxy = None;
        self.drag_end_at = Some(now);
        Self::restore(icons, &drag, now);
        tracing::debug!(target: "dock.drag", icon = %drag.icon, "drag cancelled");
        Some(DragEvent::Cancelled(drag.icon))
    }

    /// Drop any reference to `icon` without touching the collection.
    pub fn forget(&mut self, icon: IconId) {
        if self.icon_drag.is_some_and(|d| d.icon == icon) {
            self.icon_drag = None;
            self.proxy = None;
        }
        if self.press.is_some_and(|p| p.icon == Some(icon)) {
            self.press = None;
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn start_icon(&mut self, icons: &IconCollection, icon: IconId, at: Point, out: &mut Vec<DragEvent>) {
        if !icons.contains(icon) {
            return;
        }
        self.icon_drag = Some(IconDrag {
            icon,
            restore: icons.closest_icon(icon),
            start_index: icons.index_of(icon),
            last_insert: at,
            beyond: false,
        });
        self.proxy = Some(DragProxy { icon, position: at });
        tracing::debug!(target: "dock.drag", icon = %icon, "icon drag started");
        out.push(DragEvent::Started(icon));
    }

    fn move_icon(
        &mut self,
        icons: &mut IconCollection,
        args: &[RenderArg],
        point: Point,
        now: Instant,
        out: &mut Vec<DragEvent>,
    ) {
        let Some(mut drag) = self.icon_drag else {
            return;
        };
        if let Some(proxy) = self.proxy.as_mut() {
            proxy.position = point;
        }

        let beyond = point.x > self.area.right();
        if beyond != drag.beyond {
            drag.beyond = beyond;
            self.threshold_changed_at = Some(now);
            out.push(DragEvent::ThresholdCrossed {
                icon: drag.icon,
                beyond,
            });
        }

        let before = icons.index_of(drag.icon);
        let hovered = hit_test(args, point, self.settings.icon_size).filter(|id| *id != drag.icon);
        let position = icons.get(drag.icon).map(Icon::position);
        match hovered {
            Some(other) if icons.get(other).map(Icon::position) == position => {
                if point.distance(drag.last_insert) >= self.settings.reorder_threshold {
                    icons.reorder_smart(drag.icon, other, true, now);
                } else {
                    icons.reorder_before(drag.icon, other, true, now);
                }
                if icons.index_of(drag.icon) != before {
                    drag.last_insert = point;
                    out.push(DragEvent::Reordered {
                        icon: drag.icon,
                        other,
                    });
                }
            }
            None if beyond => {
                let last = icons
                    .main()
                    .rev()
                    .find(|icon| {
                        icon.id() != drag.icon
                            && icon.position() == IconPosition::Floating
                            && icon.is_visible()
                    })
                    .map(Icon::id);
                if let Some(last) = last {
                    icons.reorder_after(drag.icon, last);
                    if icons.index_of(drag.icon) != before {
                        out.push(DragEvent::Reordered {
                            icon: drag.icon,
                            other: last,
                        });
                    }
                }
            }
            _ => {}
        }
        self.icon_drag = Some(drag);
    }

    fn restore(icons: &mut IconCollection, drag: &IconDrag, now: Instant) {
        match drag.restore {
            Some((neighbor, true)) => {
                icons.reorder_after(drag.icon, neighbor);
            }
            Some((neighbor, false)) => {
                icons.reorder_before(drag.icon, neighbor, true, now);
            }
            None => {}
        }
    }
}
