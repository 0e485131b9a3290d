#![forbid(unsafe_code)]

//! Layout and animation sampler.
//!
//! [`LayoutSampler::sample`] turns the collection plus a timestamp into one
//! [`RenderArg`] per icon for one monitor. The layout runs top to bottom
//! along a vertical strip:
//!
//! ```text
//!   spacing
//!   ┌────┐  main icons, each reserving (icon + spacing) · visibility
//!   └────┘
//!   ....    folding threshold: icons below it tilt back and shrink
//!   ┌────┐
//!   └────┘  shelf icons, pushed down to the bottom edge
//! ```
//!
//! # Side effects
//!
//! Sampling is read-only except for two things, both applied after every
//! argument has been computed:
//!
//! 1. each icon's logical centre for the monitor is cached on the icon;
//! 2. finished one-shot quirks are dropped: STARTING once its blink budget is
//!    spent without the icon running (or as soon as RUNNING is also set), and
//!    PULSE_ONCE once its pulses are done.
//!
//! # Invariants
//!
//! 1. Visibility progress stays in `[0, 1]`; an icon at 0 reserves no space.
//! 2. When the content fits, nothing folds.
//! 3. The dragged icon is always `skip`; its former slot shrinks with the
//!    drag-out threshold progress.

use ahash::AHashMap;
use dock_core::{
    AutohideAnimation, BacklightMode, DockConfig, HideMode, LaunchAnimation, Point3, Quirk, Rect,
    UrgentAnimation,
};
use dock_model::{Icon, IconCollection, IconId};
use web_time::Instant;

use crate::render_arg::RenderArg;
use crate::timing::{
    BACKLIGHT_STRENGTH, LONG, MAX_STARTING_BLINKS, MAX_WIGGLE, MEDIUM, PULSE_BLINK_LAMBDA, SHORT,
    SHORTER, STARTING_BLINK_LAMBDA, URGENT_BLINKS, VANISH_DEPTH, WIGGLE_CYCLES, clamp, clamp01,
    ease_in, ease_in_out, ease_out, pulse, pulse_once_window, quirk_window, ratio, since, starting_window, urgent_window, wiggle,
};

/// Sampler tunables, lifted from [`DockConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerConfig {
    pub icon_size: f32,
    pub spacing: f32,
    pub fold_march_correction: f32,
    pub folded_constant: f32,
    pub folded_angle: f32,
    pub folded_z_distance: f32,
    pub hide_mode: HideMode,
    pub autohide: AutohideAnimation,
    pub urgent: UrgentAnimation,
    pub backlight: BacklightMode,
    pub launch: LaunchAnimation,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self::from_config(&DockConfig::default())
    }
}

impl SamplerConfig {
    pub fn from_config(config: &DockConfig) -> Self {
        Self {
            icon_size: config.layout.icon_size,
            spacing: config.layout.spacing,
            fold_march_correction: config.layout.fold_march_correction,
            folded_constant: config.layout.folded_constant,
            folded_angle: config.layout.folded_angle,
            folded_z_distance: config.layout.folded_z_distance,
            hide_mode: config.hide_mode,
            autohide: config.animation.autohide,
            urgent: config.animation.urgent,
            backlight: config.animation.backlight,
            launch: config.animation.launch,
        }
    }
}

/// Launcher-level animation stamps.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LauncherTimes {
    pub hover_enter: Option<Instant>,
    pub hover_leave: Option<Instant>,
    pub drag_end: Option<Instant>,
    pub autohide_toggle: Option<Instant>,
    /// Last time the dragged icon crossed the drag-out threshold.
    pub drag_threshold: Option<Instant>,
}

/// The icon being dragged, as the sampler sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragFrame {
    pub icon: IconId,
    /// Pointer is past the drag-out threshold.
    pub beyond_threshold: bool,
}

/// Per-frame inputs owned by the launcher.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameParams {
    pub monitor: usize,
    /// Launcher strip in screen coordinates.
    pub area: Rect,
    pub hovered: bool,
    /// `0` fully shown, `1` fully hidden.
    pub hide_progress: f32,
    pub times: LauncherTimes,
    /// Accumulated surface drag; negative scrolls content up.
    pub surface_offset: f32,
    pub drag: Option<DragFrame>,
    pub key_nav: bool,
    pub shortcuts_shown: bool,
}

impl FrameParams {
    pub fn new(monitor: usize, area: Rect) -> Self {
        Self {
            monitor,
            area,
            hovered: false,
            hide_progress: 0.0,
            times: LauncherTimes::default(),
            surface_offset: 0.0,
            drag: None,
            key_nav: false,
            shortcuts_shown: false,
        }
    }
}

/// Result of one sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampledFrame {
    /// Full order: main then shelf.
    pub args: Vec<RenderArg>,
    pub launcher_alpha: f32,
    pub autohide_offset: f32,
    /// Lowest allowed surface offset (`<= 0`).
    pub scroll_min: f32,
    pub folding_threshold: f32,
    /// Space all icons would need unfolded.
    pub content_height: f32,
}

/// Values shared by every icon in one sample.
struct Shared {
    monitor: usize,
    folded_size: f32,
    folded_spacing: f32,
    folded_z: f32,
    neg_rads: f32,
    threshold: f32,
    autohide_offset: f32,
    drag: Option<DragFrame>,
    drag_size: f32,
    selected: Option<IconId>,
    key_nav: bool,
}

/// Stateful only in remembering the last hide progress per monitor.
#[derive(Debug, Clone, Default)]
pub struct LayoutSampler {
    config: SamplerConfig,
    last_hide: AHashMap<usize, f32>,
}

/// Visibility progress of `icon` on `monitor`: ramps up over [`SHORT`] after
/// VISIBLE turns on and down after it turns off.
pub fn icon_visible_progress(icon: &Icon, monitor: usize, now: Instant) -> f32 {
    quirk_progress(icon, Quirk::Visible, monitor, now, SHORT)
}

/// Progress towards the quirk's current value.
fn quirk_progress(
    icon: &Icon,
    quirk: Quirk,
    monitor: usize,
    now: Instant,
    window: std::time::Duration,
) -> f32 {
    let r = ratio(icon.quirks().elapsed(quirk, monitor, now), window);
    if icon.quirk(quirk, monitor) { r } else { 1.0 - r }
}

/// Raw progress since the quirk last flipped.
fn quirk_ratio(
    icon: &Icon,
    quirk: Quirk,
    monitor: usize,
    now: Instant,
    window: std::time::Duration,
) -> f32 {
    ratio(icon.quirks().elapsed(quirk, monitor, now), window)
}

/// Digit labels for the first ten shortcut-capable visible icons: `1`–`9`
/// then `0`.
pub fn shortcut_assignments(icons: &IconCollection) -> Vec<(IconId, char)> {
    const LABELS: [char; 10] = ['1', '2', '3', '4', '5', '6', '7', '8', '9', '0'];
    icons
        .iter()
        .filter(|icon| icon.capabilities().shows_shortcut && icon.is_visible())
        .zip(LABELS)
        .map(|(icon, label)| (icon.id(), label))
        .collect()
}

impl LayoutSampler {
    pub fn new(config: SamplerConfig) -> Self {
        Self {
            config,
            last_hide: AHashMap::new(),
        }
    }

    pub fn from_config(config: &DockConfig) -> Self {
        Self::new(SamplerConfig::from_config(config))
    }

    #[inline]
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SamplerConfig) {
        self.config = config;
    }

    /// Hover unfold progress for the launcher.
    pub fn hover_progress(&self, frame: &FrameParams, now: Instant) -> f32 {
        if frame.hovered {
            ratio(since(now, frame.times.hover_enter), MEDIUM)
        } else {
            1.0 - ratio(since(now, frame.times.hover_leave), MEDIUM)
        }
    }

    /// Size multiplier of the dragged icon's slot.
    fn drag_size(frame: &FrameParams, now: Instant) -> f32 {
        match frame.drag {
            Some(drag) => {
                let r = ratio(since(now, frame.times.drag_threshold), SHORT);
                if drag.beyond_threshold { 1.0 - r } else { r }
            }
            None => 1.0,
        }
    }

    /// Compute render arguments for every icon on `frame.monitor`.
    pub fn sample(
        &mut self,
        icons: &mut IconCollection,
        frame: &FrameParams,
        now: Instant,
    ) -> SampledFrame {
        let cfg = &self.config;
        let monitor = frame.monitor;
        let area = frame.area;
        let height = area.height;
        let icon_size = cfg.icon_size;
        let spacing = cfg.spacing;

        let hover = self.hover_progress(frame, now);
        let folded_constant = cfg.folded_constant;
        let unfold_scale = folded_constant + (1.0 - folded_constant) * hover;
        let drag_size = Self::drag_size(frame, now);

        // Pass one: space required and folding threshold.
        let mut sum = spacing;
        let mut threshold = height - icon_size / 2.5;
        for icon in icons.iter() {
            let mut visibility = icon_visible_progress(icon, monitor, now);
            if frame.drag.is_some_and(|d| d.icon == icon.id()) {
                visibility *= drag_size;
            }
            let h = (icon_size + spacing) * visibility;
            sum += h;
            let unfold = quirk_progress(icon, Quirk::Unfolded, monitor, now, SHORT);
            let overflow = clamp(sum - height, 0.0, h * cfg.fold_march_correction);
            threshold -= overflow * (folded_constant + (1.0 - folded_constant) * unfold);
        }
        if sum - spacing <= height {
            threshold = height;
        }

        let scroll_min = (height - sum).min(0.0);
        let offset = clamp(frame.surface_offset, scroll_min, 0.0) * hover;
        threshold += area.y + offset;

        let mut launcher_alpha = 1.0;
        let mut autohide_offset = 0.0;
        if cfg.hide_mode != HideMode::Never {
            // Fades start slow, slides ease at both ends.
            let fade = ease_in(frame.hide_progress);
            let slide = ease_in_out(frame.hide_progress);
            match cfg.autohide {
                AutohideAnimation::FadeOnly => launcher_alpha = 1.0 - fade,
                AutohideAnimation::SlideOnly => autohide_offset -= area.width * slide,
                AutohideAnimation::FadeAndSlide => {
                    launcher_alpha = 1.0 - 0.5 * fade;
                    autohide_offset -= area.width * slide;
                }
            }
        }

        let shared = Shared {
            monitor,
            folded_size: icon_size * unfold_scale,
            folded_spacing: spacing * unfold_scale,
            folded_z: cfg.folded_z_distance * (1.0 - hover),
            neg_rads: -cfg.folded_angle * (1.0 - hover),
            threshold,
            autohide_offset,
            drag: frame.drag,
            drag_size,
            selected: frame.key_nav.then(|| icons.selected()).flatten(),
            key_nav: frame.key_nav,
        };

        let labels: AHashMap<IconId, char> = if frame.shortcuts_shown {
            shortcut_assignments(icons).into_iter().collect()
        } else {
            AHashMap::new()
        };

        let mut cursor = Point3::new(area.x + area.width / 2.0, area.y + spacing + offset, 0.0);
        let mut args = Vec::with_capacity(icons.len());
        let mut resets: Vec<(IconId, Quirk)> = Vec::new();

        for icon in icons.main() {
            args.push(self.fill(icon, &shared, &mut cursor, now, &mut resets));
        }

        let mut shelf_sum: f32 = icons
            .shelf()
            .map(|icon| (icon_size + spacing) * icon_visible_progress(icon, monitor, now))
            .sum();
        if shelf_sum > 0.0 {
            shelf_sum += spacing;
        }
        let shelf_delta = (area.y + height - shelf_sum + spacing - cursor.y).max(0.0);
        cursor.y += shelf_delta;

        for icon in icons.shelf() {
            args.push(self.fill(icon, &shared, &mut cursor, now, &mut resets));
        }

        for arg in &mut args {
            arg.shortcut_label = labels.get(&arg.icon).copied();
        }

        // Phase two: write back.
        for arg in &args {
            if let Some(icon) = icons.get_mut(arg.icon) {
                icon.set_center(monitor, arg.logical_center);
            }
        }
        for (id, quirk) in resets {
            if let Some(icon) = icons.get_mut(id) {
                icon.expire_quirk(quirk, Some(monitor), now);
                tracing::trace!(target: "dock.layout", icon = %id, %quirk, monitor, "one-shot quirk expired");
            }
        }

        self.last_hide.insert(monitor, frame.hide_progress);
        tracing::trace!(
            target: "dock.layout",
            monitor,
            icons = args.len(),
            content = sum,
            threshold,
            "sampled"
        );

        SampledFrame {
            args,
            launcher_alpha,
            autohide_offset,
            scroll_min,
            folding_threshold: threshold,
            content_height: sum,
        }
    }

    fn fill(
        &self,
        icon: &Icon,
        shared: &Shared,
        cursor: &mut Point3,
        now: Instant,
        resets: &mut Vec<(IconId, Quirk)>,
    ) -> RenderArg {
        let cfg = &self.config;
        let monitor = shared.monitor;
        let icon_size = cfg.icon_size;
        let mut arg = RenderArg::new(icon.id());
        self.setup(icon, shared, now, &mut arg, resets);

        let mut size_mod = icon_visible_progress(icon, monitor, now);
        let mut z = 0.0;
        if size_mod < 1.0 {
            arg.alpha *= size_mod;
            z = VANISH_DEPTH * (1.0 - size_mod);
        }
        if shared.drag.is_some_and(|d| d.icon == icon.id()) {
            size_mod *= shared.drag_size;
            arg.skip = true;
        }
        if size_mod <= 0.0 {
            arg.skip = true;
            arg.logical_center = Point3::new(cursor.x, cursor.y, 0.0);
            arg.render_center = arg.logical_center;
            return arg;
        }

        let present = quirk_progress(icon, Quirk::Presented, monitor, now, MEDIUM);
        let top = cursor.y;
        let fold = clamp01((top + icon_size - shared.threshold) / icon_size) * (1.0 - present);
        let half = shared.folded_size / 2.0 + (icon_size / 2.0 - shared.folded_size / 2.0) * (1.0 - fold);
        let hide_offset = shared.autohide_offset * (1.0 - present * icon.present_urgency());

        z += shared.folded_z * fold;
        arg.rotation.x = shared.neg_rads * fold;
        arg.half_extent = half * size_mod;

        let center_y = top + half * size_mod;
        let glide = if icon.quirk(Quirk::CenterSaved, monitor) {
            let p = ease_out(quirk_ratio(icon, Quirk::CenterSaved, monitor, now, MEDIUM));
            (icon.saved_center(monitor).y - center_y) * (1.0 - p)
        } else {
            0.0
        };

        arg.logical_center = Point3::new(cursor.x.round(), center_y.round(), 0.0);
        arg.render_center = Point3::new(
            (cursor.x + hide_offset).round(),
            (center_y + glide).round(),
            z,
        );

        let bottom = top + 2.0 * half * size_mod;
        let overlap = clamp01((bottom + cfg.spacing * size_mod - shared.threshold) / icon_size);
        let gap = (cfg.spacing * (1.0 - overlap) + shared.folded_spacing * overlap) * size_mod;
        cursor.y = bottom + gap;

        arg
    }

    /// Everything that does not depend on position.
    fn setup(
        &self,
        icon: &Icon,
        shared: &Shared,
        now: Instant,
        arg: &mut RenderArg,
        resets: &mut Vec<(IconId, Quirk)>,
    ) {
        let cfg = &self.config;
        let monitor = shared.monitor;

        let desat = 1.0 - quirk_progress(icon, Quirk::Desat, monitor, now, SHORTER);
        arg.alpha = 0.2 + 0.8 * desat;
        arg.saturation = desat;

        let dim = quirk_progress(icon, Quirk::DropDim, monitor, now, MEDIUM);
        let dim_value = 0.2 + 0.8 * (1.0 - dim);
        if dim_value < 1.0 {
            arg.alpha *= dim_value;
        }

        let bias = quirk_ratio(icon, Quirk::Progress, monitor, now, MEDIUM);
        arg.progress_bias = if icon.quirk(Quirk::Progress, monitor) {
            -1.0 + bias
        } else {
            bias
        };
        arg.progress = icon.progress();

        arg.running_arrow = icon.quirk(Quirk::Running, monitor);
        arg.active_arrow = icon.quirk(Quirk::Active, monitor);
        arg.shimmer_progress = quirk_ratio(icon, Quirk::Shimmer, monitor, now, LONG);
        arg.system_item = icon.capabilities().system_item;
        arg.keyboard_nav_hl = shared.key_nav && shared.selected == Some(icon.id());

        let urgent = icon.quirk(Quirk::Urgent, monitor);
        let urgent_progress = quirk_progress(icon, Quirk::Urgent, monitor, now, urgent_window());
        arg.glow_intensity = if urgent {
            clamp01(urgent_progress * 3.0)
        } else {
            clamp01(urgent_progress * 3.0 - 2.0)
        };
        if urgent && urgent_progress < 1.0 && cfg.urgent == UrgentAnimation::Wiggle {
            arg.rotation.z = wiggle(urgent_progress, WIGGLE_CYCLES, MAX_WIGGLE);
        }

        arg.backlight_intensity = self.backlight(icon, monitor, now, urgent, urgent_progress, resets);

        let prelight = quirk_progress(icon, Quirk::DropPrelight, monitor, now, SHORT);
        if prelight > 0.0 {
            arg.backlight_intensity = arg
                .backlight_intensity
                .max(prelight * BACKLIGHT_STRENGTH);
        }
    }

    fn backlight(
        &self,
        icon: &Icon,
        monitor: usize,
        now: Instant,
        urgent: bool,
        urgent_progress: f32,
        resets: &mut Vec<(IconId, Quirk)>,
    ) -> f32 {
        let cfg = &self.config;
        let running = quirk_progress(icon, Quirk::Running, monitor, now, SHORT);
        let mut result = match cfg.backlight {
            BacklightMode::AlwaysOn => 1.0,
            BacklightMode::NormalToggle => running,
            BacklightMode::AlwaysOff => 0.0,
            BacklightMode::EdgeToggle => 1.0 - running,
        };

        if icon.quirk(Quirk::Starting, monitor) {
            let progress = quirk_ratio(icon, Quirk::Starting, monitor, now, starting_window());
            let is_running = icon.quirk(Quirk::Running, monitor);
            match cfg.launch {
                LaunchAnimation::None => {}
                LaunchAnimation::Blink => {
                    let cycles = MAX_STARTING_BLINKS * STARTING_BLINK_LAMBDA;
                    if !is_running {
                        result = pulse(progress, cycles);
                    }
                }
                LaunchAnimation::Pulse => {
                    let value = pulse(progress, MAX_STARTING_BLINKS);
                    result += (1.0 - result) * (1.0 - value);
                }
            }
            if progress >= 1.0 || is_running {
                resets.push((icon.id(), Quirk::Starting));
            }
        }

        if icon.quirk(Quirk::PulseOnce, monitor) {
            let progress = quirk_ratio(icon, Quirk::PulseOnce, monitor, now, pulse_once_window());
            let value = pulse(progress, PULSE_BLINK_LAMBDA);
            if result > 0.5 {
                result *= value;
            } else {
                result = result.max(1.0 - value);
            }
            if progress >= 1.0 {
                resets.push((icon.id(), Quirk::PulseOnce));
            }
        }

        if urgent && urgent_progress < 1.0 && cfg.urgent == UrgentAnimation::Pulse {
            let urgent_pulse = pulse(urgent_progress, URGENT_BLINKS);
            result *= 0.2 + 0.8 * urgent_pulse;
        }

        clamp01(result) * BACKLIGHT_STRENGTH
    }

    /// Whether another frame would differ from the last one.
    pub fn animation_in_progress(
        &self,
        icons: &IconCollection,
        frame: &FrameParams,
        now: Instant,
    ) -> bool {
        let monitor = frame.monitor;
        let times = frame.times;
        let launcher_busy = since(now, times.hover_enter) < MEDIUM
            || since(now, times.hover_leave) < MEDIUM
            || since(now, times.drag_end) < LONG
            || since(now, times.autohide_toggle) < SHORT
            || since(now, times.drag_threshold) < SHORT;
        if launcher_busy {
            return true;
        }
        if self.last_hide.get(&monitor) != Some(&frame.hide_progress) {
            return true;
        }
        icons.iter().any(|icon| {
            Quirk::ALL
                .iter()
                .any(|q| icon.quirks().elapsed(*q, monitor, now) < quirk_window(*q))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dock_model::{IconKind, IconPosition};
    use std::time::Duration;

    const MS_50: Duration = Duration::from_millis(50);
    const SEC_1: Duration = Duration::from_secs(1);

    fn app(priority: i32) -> Icon {
        Icon::new(IconKind::Application)
            .with_priority(priority)
            .visible()
    }

    fn strip(height: f32) -> FrameParams {
        FrameParams::new(0, Rect::new(0.0, 0.0, 64.0, height))
    }

    fn populated(n: usize) -> (IconCollection, Vec<IconId>) {
        let mut icons = IconCollection::new();
        let ids = (0..n).map(|i| icons.push(app(i as i32))).collect();
        (icons, ids)
    }

    #[test]
    fn icons_stack_from_the_top() {
        let (mut icons, ids) = populated(3);
        let mut sampler = LayoutSampler::default();
        let out = sampler.sample(&mut icons, &strip(800.0), Instant::now());
        assert_eq!(out.args.len(), 3);
        assert_eq!(out.args[0].icon, ids[0]);
        assert_eq!(out.args[0].logical_center.y, 30.0);
        assert_eq!(out.args[1].logical_center.y, 84.0);
        assert_eq!(out.args[0].logical_center.x, 32.0);
        assert_eq!(icons.get(ids[1]).unwrap().center(0).y, 84.0);
    }

    #[test]
    fn content_that_fits_never_folds() {
        let (mut icons, _) = populated(5);
        let mut sampler = LayoutSampler::default();
        let out = sampler.sample(&mut icons, &strip(800.0), Instant::now());
        assert_eq!(out.folding_threshold, 800.0);
        assert_eq!(out.scroll_min, 0.0);
        assert!(out.args.iter().all(|a| a.rotation.x == 0.0));
    }

    #[test]
    fn overflow_folds_the_tail() {
        let (mut icons, _) = populated(30);
        let mut sampler = LayoutSampler::default();
        let out = sampler.sample(&mut icons, &strip(600.0), Instant::now());
        assert!(out.folding_threshold < 600.0);
        assert!(out.scroll_min < 0.0);
        assert_eq!(out.args[0].rotation.x, 0.0);
        let last = out.args.last().unwrap();
        assert!(last.rotation.x < 0.0);
        assert!(last.half_extent < 24.0);
        assert!(last.logical_center.y <= 600.0);
    }

    #[test]
    fn full_hover_unfolds() {
        let (mut icons, _) = populated(30);
        let mut sampler = LayoutSampler::default();
        let t0 = Instant::now();
        let mut frame = strip(600.0);
        frame.hovered = true;
        frame.times.hover_enter = Some(t0);
        let out = sampler.sample(&mut icons, &frame, t0 + SEC_1);
        assert!(out.args.iter().all(|a| a.rotation.x == 0.0));
        assert!(out.args.iter().all(|a| (a.half_extent - 24.0).abs() < 1e-3));
    }

    #[test]
    fn shelf_sits_at_the_bottom() {
        let (mut icons, _) = populated(2);
        let trash = icons.push(Icon::new(IconKind::Trash).visible());
        let mut sampler = LayoutSampler::default();
        let out = sampler.sample(&mut icons, &strip(800.0), Instant::now());
        let arg = out.args.iter().find(|a| a.icon == trash).unwrap();
        assert_eq!(arg.logical_center.y, 770.0);
        assert_eq!(icons.get(trash).unwrap().position(), IconPosition::End);
    }

    #[test]
    fn dragged_icon_is_skipped_and_collapses() {
        let (mut icons, ids) = populated(2);
        let mut sampler = LayoutSampler::default();
        let mut frame = strip(800.0);
        frame.drag = Some(DragFrame {
            icon: ids[0],
            beyond_threshold: true,
        });
        let out = sampler.sample(&mut icons, &frame, Instant::now());
        assert!(out.args[0].skip);
        assert_eq!(out.args[1].logical_center.y, 30.0);

        frame.drag = Some(DragFrame {
            icon: ids[0],
            beyond_threshold: false,
        });
        let out = sampler.sample(&mut icons, &frame, Instant::now());
        assert!(out.args[0].skip);
        assert_eq!(out.args[1].logical_center.y, 84.0);
    }

    #[test]
    fn visibility_ramps_over_short() {
        let mut icon = Icon::new(IconKind::Application);
        let t0 = Instant::now();
        icon.set_quirk(Quirk::Visible, true, None, t0);
        let half = icon_visible_progress(&icon, 0, t0 + SHORT / 2);
        assert!(half > 0.0 && half < 1.0);
        assert_eq!(icon_visible_progress(&icon, 0, t0 + SHORT), 1.0);
        icon.set_quirk(Quirk::Visible, false, None, t0 + SEC_1);
        assert_eq!(icon_visible_progress(&icon, 0, t0 + SEC_1), 1.0);
        assert_eq!(icon_visible_progress(&icon, 0, t0 + SEC_1 + SHORT), 0.0);
    }

    #[test]
    fn hidden_icon_reserves_nothing() {
        let mut icons = IconCollection::new();
        let hidden = icons.push(Icon::new(IconKind::Application).with_priority(0));
        let shown = icons.push(app(1));
        let mut sampler = LayoutSampler::default();
        let out = sampler.sample(&mut icons, &strip(800.0), Instant::now());
        assert!(out.args.iter().find(|a| a.icon == hidden).unwrap().skip);
        let arg = out.args.iter().find(|a| a.icon == shown).unwrap();
        assert_eq!(arg.logical_center.y, 30.0);
    }

    #[test]
    fn starting_expires_after_budget() {
        let (mut icons, ids) = populated(1);
        let t0 = Instant::now();
        icons.set_quirk(ids[0], Quirk::Starting, true, None, t0);
        let mut sampler = LayoutSampler::default();
        sampler.sample(&mut icons, &strip(800.0), t0 + MS_50);
        assert!(icons.get(ids[0]).unwrap().quirk(Quirk::Starting, 0));
        sampler.sample(&mut icons, &strip(800.0), t0 + starting_window());
        let icon = icons.get(ids[0]).unwrap();
        assert!(!icon.quirk(Quirk::Starting, 0));
        assert_eq!(icon.quirks().flipped_at(Quirk::Starting, 0), None);
    }

    #[test]
    fn starting_drops_once_running() {
        let (mut icons, ids) = populated(1);
        let t0 = Instant::now();
        icons.set_quirk(ids[0], Quirk::Starting, true, None, t0);
        icons.set_quirk(ids[0], Quirk::Running, true, None, t0);
        let mut sampler = LayoutSampler::default();
        sampler.sample(&mut icons, &strip(800.0), t0 + MS_50);
        assert!(!icons.get(ids[0]).unwrap().quirk(Quirk::Starting, 0));
    }

    #[test]
    fn pulse_once_expires() {
        let mut icons = IconCollection::new();
        let trash = icons.push(Icon::new(IconKind::Trash).visible());
        let t0 = Instant::now();
        icons.set_quirk(trash, Quirk::PulseOnce, true, None, t0);
        let mut sampler = LayoutSampler::default();
        let mid = sampler.sample(&mut icons, &strip(800.0), t0 + pulse_once_window() / 4);
        assert!(mid.args[0].backlight_intensity > 0.0);
        sampler.sample(&mut icons, &strip(800.0), t0 + pulse_once_window());
        assert!(!icons.get(trash).unwrap().quirk(Quirk::PulseOnce, 0));
    }

    #[test]
    fn autohide_fades_and_slides() {
        let (mut icons, _) = populated(1);
        let config = DockConfig {
            hide_mode: HideMode::Autohide,
            ..DockConfig::default()
        };
        let mut sampler = LayoutSampler::from_config(&config);
        let mut frame = strip(800.0);
        frame.hide_progress = 1.0;
        let out = sampler.sample(&mut icons, &frame, Instant::now());
        assert_eq!(out.launcher_alpha, 0.5);
        assert_eq!(out.autohide_offset, -64.0);
        assert_eq!(out.args[0].render_center.x, -32.0);
        assert_eq!(out.args[0].logical_center.x, 32.0);

        frame.hide_progress = 0.25;
        let out = sampler.sample(&mut icons, &frame, Instant::now());
        assert_eq!(out.launcher_alpha, 0.968_75);
        assert_eq!(out.autohide_offset, -8.0);
    }

    #[test]
    fn saved_center_glides() {
        let (mut icons, ids) = populated(1);
        let t0 = Instant::now();
        let icon = icons.get_mut(ids[0]).unwrap();
        icon.set_center(0, Point3::new(32.0, 500.0, 0.0));
        icon.save_center(t0);
        let mut sampler = LayoutSampler::default();
        let start = sampler.sample(&mut icons, &strip(800.0), t0);
        assert_eq!(start.args[0].render_center.y, 500.0);
        let mid = sampler.sample(&mut icons, &strip(800.0), t0 + MEDIUM / 2);
        let y = mid.args[0].render_center.y;
        assert!(y > 100.0 && y < 200.0, "glide should ease out, got {y}");
        let end = sampler.sample(&mut icons, &strip(800.0), t0 + MEDIUM);
        assert_eq!(end.args[0].render_center.y, 30.0);
    }

    #[test]
    fn urgent_wiggles() {
        let (mut icons, ids) = populated(1);
        let t0 = Instant::now();
        icons.set_quirk(ids[0], Quirk::Urgent, true, None, t0);
        let mut sampler = LayoutSampler::default();
        let out = sampler.sample(&mut icons, &strip(800.0), t0 + Duration::from_micros(87_500));
        assert!(out.args[0].rotation.z > 0.29);
        assert!(out.args[0].glow_intensity > 0.0);
    }

    #[test]
    fn desat_dims_alpha() {
        let (mut icons, ids) = populated(1);
        let t0 = Instant::now();
        icons.set_quirk(ids[0], Quirk::Desat, true, None, t0);
        let mut sampler = LayoutSampler::default();
        let out = sampler.sample(&mut icons, &strip(800.0), t0 + SEC_1);
        assert!((out.args[0].alpha - 0.2).abs() < 1e-6);
        assert_eq!(out.args[0].saturation, 0.0);
    }

    #[test]
    fn backlight_follows_mode() {
        let (mut icons, ids) = populated(1);
        let t0 = Instant::now();
        icons.set_quirk(ids[0], Quirk::Running, true, None, t0);
        let mut sampler = LayoutSampler::default();
        let out = sampler.sample(&mut icons, &strip(800.0), t0 + SEC_1);
        assert!((out.args[0].backlight_intensity - BACKLIGHT_STRENGTH).abs() < 1e-6);
        assert!(out.args[0].running_arrow);

        let mut config = SamplerConfig::default();
        config.backlight = BacklightMode::AlwaysOff;
        sampler.set_config(config);
        let out = sampler.sample(&mut icons, &strip(800.0), t0 + SEC_1);
        assert_eq!(out.args[0].backlight_intensity, 0.0);
    }

    #[test]
    fn shortcut_labels_cover_first_ten() {
        let (mut icons, ids) = populated(12);
        let mut sampler = LayoutSampler::default();
        let mut frame = strip(1000.0);
        frame.shortcuts_shown = true;
        let out = sampler.sample(&mut icons, &frame, Instant::now());
        assert_eq!(out.args[0].shortcut_label, Some('1'));
        assert_eq!(out.args[9].shortcut_label, Some('0'));
        assert_eq!(out.args[10].shortcut_label, None);
        assert_eq!(shortcut_assignments(&icons)[8], (ids[8], '9'));
    }

    #[test]
    fn keyboard_highlight_follows_selection() {
        let (mut icons, _) = populated(3);
        icons.select_next();
        let mut sampler = LayoutSampler::default();
        let mut frame = strip(800.0);
        frame.key_nav = true;
        let out = sampler.sample(&mut icons, &frame, Instant::now());
        let lit: Vec<bool> = out.args.iter().map(|a| a.keyboard_nav_hl).collect();
        assert_eq!(lit, vec![false, true, false]);
    }

    #[test]
    fn animation_in_progress_tracks_windows() {
        let (mut icons, ids) = populated(2);
        let t0 = Instant::now();
        let frame = strip(800.0);
        let mut sampler = LayoutSampler::default();
        assert!(sampler.animation_in_progress(&icons, &frame, t0));
        sampler.sample(&mut icons, &frame, t0);
        assert!(!sampler.animation_in_progress(&icons, &frame, t0));

        icons.set_quirk(ids[1], Quirk::Active, true, None, t0);
        assert!(sampler.animation_in_progress(&icons, &frame, t0 + MS_50));
        assert!(!sampler.animation_in_progress(&icons, &frame, t0 + SEC_1));

        let mut hiding = frame.clone();
        hiding.hide_progress = 0.4;
        assert!(sampler.animation_in_progress(&icons, &hiding, t0 + SEC_1));

        let mut hovering = frame;
        hovering.times.hover_enter = Some(t0 + SEC_1);
        assert!(sampler.animation_in_progress(&icons, &hovering, t0 + SEC_1 + MS_50));
    }
}
