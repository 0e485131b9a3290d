#![forbid(unsafe_code)]

//! Animation durations, cycle counts and curve shapes.
//!
//! Every animated value in the sampler is a function of "time since a quirk
//! flipped" pushed through one of the shapes below.
//!
//! | Curve | Shape |
//! |-------|-------|
//! | [`ratio`] | linear ramp `0 → 1` over a window |
//! | [`pulse`] | `0.5 + 0.5·cos(2π·cycles·p)`, starts and ends at 1 |
//! | [`wiggle`] | `amplitude·sin(2π·cycles·p)`, starts and ends at 0 |
//! | [`ease_in`], [`ease_out`], [`ease_in_out`] | quadratic easing |
//!
//! # Invariants
//!
//! 1. [`ratio`] always returns a value in `[0, 1]`; a zero window is already
//!    complete.
//! 2. A missing timestamp counts as infinitely long ago ([`Duration::MAX`]).

use std::f32::consts::PI;
use std::time::Duration;

use dock_core::Quirk;
use web_time::Instant;

pub const SHORT: Duration = Duration::from_millis(125);
pub const SHORTER: Duration = Duration::from_millis(100);
pub const MEDIUM: Duration = Duration::from_millis(200);
pub const LONG: Duration = Duration::from_millis(350);

/// Pulses of the urgent animation.
pub const URGENT_BLINKS: u32 = 3;
/// Swings of the urgent wiggle.
pub const WIGGLE_CYCLES: u32 = 6;
/// Upper bound on launch blinks before STARTING is dropped.
pub const MAX_STARTING_BLINKS: u32 = 5;
pub const STARTING_BLINK_LAMBDA: u32 = 3;
pub const PULSE_BLINK_LAMBDA: u32 = 2;
/// Peak wiggle rotation in radians.
pub const MAX_WIGGLE: f32 = 0.3;
/// Backlight intensity of a fully lit tile.
pub const BACKLIGHT_STRENGTH: f32 = 0.9;
/// Render depth of an icon at zero visibility.
pub const VANISH_DEPTH: f32 = 300.0;

#[inline]
pub fn ease_in(t: f32) -> f32 {
    let t = clamp01(t);
    t * t
}

#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = clamp01(t);
    1.0 - (1.0 - t) * (1.0 - t)
}

#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = clamp01(t);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - 2.0 * (1.0 - t) * (1.0 - t)
    }
}

/// Clamp to `[0, 1]`, mapping NaN to 0.
#[inline]
pub fn clamp01(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Non-panicking clamp: `lo` wins when the bounds cross.
#[inline]
pub fn clamp(v: f32, lo: f32, hi: f32) -> f32 {
    v.min(hi).max(lo)
}

/// Time since `then`, or [`Duration::MAX`] if it never happened.
#[inline]
pub fn since(now: Instant, then: Option<Instant>) -> Duration {
    then.map_or(Duration::MAX, |t| now.saturating_duration_since(t))
}

/// Linear progress of `elapsed` through `window`.
pub fn ratio(elapsed: Duration, window: Duration) -> f32 {
    if window.is_zero() || elapsed >= window {
        return 1.0;
    }
    clamp01(elapsed.as_secs_f32() / window.as_secs_f32())
}

/// Cosine pulse. `1` at both ends, `cycles` dips to `0` in between.
#[inline]
pub fn pulse(progress: f32, cycles: u32) -> f32 {
    0.5 + (PI * 2.0 * cycles as f32 * progress).cos() * 0.5
}

/// Sine wiggle with the given peak.
#[inline]
pub fn wiggle(progress: f32, cycles: u32, amplitude: f32) -> f32 {
    (PI * 2.0 * cycles as f32 * progress).sin() * amplitude
}

/// Window over which the urgent animation runs.
pub const fn urgent_window() -> Duration {
    Duration::from_millis(LONG.as_millis() as u64 * URGENT_BLINKS as u64 * 2)
}

/// Window over which the launch animation runs.
pub const fn starting_window() -> Duration {
    Duration::from_millis(
        LONG.as_millis() as u64 * (MAX_STARTING_BLINKS * STARTING_BLINK_LAMBDA) as u64 * 2,
    )
}

/// Window over which a single attention pulse runs.
pub const fn pulse_once_window() -> Duration {
    Duration::from_millis(LONG.as_millis() as u64 * PULSE_BLINK_LAMBDA as u64 * 2)
}

/// How long after a flip a quirk still animates.
pub const fn quirk_window(quirk: Quirk) -> Duration {
    match quirk {
        Quirk::Visible | Quirk::Active | Quirk::Running | Quirk::Unfolded => SHORT,
        Quirk::DropPrelight => SHORT,
        Quirk::Desat => SHORTER,
        Quirk::Presented | Quirk::CenterSaved | Quirk::DropDim | Quirk::Progress => MEDIUM,
        Quirk::Shimmer => LONG,
        Quirk::Urgent => urgent_window(),
        Quirk::Starting => starting_window(),
        Quirk::PulseOnce => pulse_once_window(),
    }
}
