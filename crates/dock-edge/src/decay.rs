#![forbid(unsafe_code)]

//! Linear-decay pressure accumulator.
//!
//! Stimuli add to the value; time subtracts `rate_of_decay * seconds`. The
//! value never drops below zero, so a user who pushes, pauses, and pushes
//! again only keeps whatever pressure survived the pause.
//!
//! # Invariants
//!
//! 1. `value() >= 0.0` after every operation.
//! 2. Between stimuli, `value()` is non-increasing.
//! 3. Non-finite or negative inputs are clamped, never stored.

use std::time::Duration;

/// Scalar that grows on stimulus and decays linearly with time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DecayAccumulator {
    value: f32,
    rate_of_decay: f32,
}

impl DecayAccumulator {
    /// Create an empty accumulator losing `rate_of_decay` units per second.
    #[must_use]
    pub fn new(rate_of_decay: f32) -> Self {
        Self {
            value: 0.0,
            rate_of_decay: sanitize(rate_of_decay),
        }
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[inline]
    pub fn rate_of_decay(&self) -> f32 {
        self.rate_of_decay
    }

    pub fn set_rate_of_decay(&mut self, rate: f32) {
        self.rate_of_decay = sanitize(rate);
    }

    /// Add a stimulus. Negative contributions are ignored.
    pub fn add(&mut self, contribution: f32) {
        self.value += sanitize(contribution);
    }

    /// Apply `elapsed` worth of decay.
    pub fn tick(&mut self, elapsed: Duration) {
        let lost = self.rate_of_decay * elapsed.as_secs_f32();
        self.value = (self.value - lost).max(0.0);
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value <= 0.0
    }
}

fn sanitize(v: f32) -> f32 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decays_linearly_and_floors_at_zero() {
        let mut acc = DecayAccumulator::new(1000.0);
        acc.add(500.0);
        acc.tick(Duration::from_millis(100));
        assert!((acc.value() - 400.0).abs() < 1e-3);
        acc.tick(Duration::from_secs(5));
        assert_eq!(acc.value(), 0.0);
        assert!(acc.is_empty());
    }

    #[test]
    fn zero_rate_keeps_value() {
        let mut acc = DecayAccumulator::new(0.0);
        acc.add(300.0);
        acc.tick(Duration::from_secs(60));
        assert_eq!(acc.value(), 300.0);
    }

    #[test]
    fn bad_inputs_are_clamped() {
        let mut acc = DecayAccumulator::new(f32::NAN);
        assert_eq!(acc.rate_of_decay(), 0.0);
        acc.add(-50.0);
        acc.add(f32::INFINITY);
        assert_eq!(acc.value(), 0.0);
        acc.set_rate_of_decay(-3.0);
        assert_eq!(acc.rate_of_decay(), 0.0);
    }

    #[test]
    fn reset_clears() {
        let mut acc = DecayAccumulator::new(10.0);
        acc.add(42.0);
        acc.reset();
        assert!(acc.is_empty());
    }
}
