#![forbid(unsafe_code)]

//! Normalized progress tweens.
//!
//! A [`Tween`] advances a raw value from 0.0 to 1.0 over a duration measured
//! in logical delta units (one unit is roughly one 60 Hz frame), optionally
//! reverses back to 0.0 over a second duration, and then reports completion
//! idempotently until [`reset`](Tween::reset). Output passes through a
//! shaping function and is clamped to [0.0, 1.0] on both sides, so any
//! sequence of non-negative deltas keeps the value in range.
//!
//! Time is accumulated as elapsed delta rather than as a running value, so
//! completion lands exactly on the tick where the accumulated delta reaches
//! the scaled duration. Overshoot past the forward endpoint is forwarded
//! into the reverse phase.

// ---------------------------------------------------------------------------
// Shaping functions
// ---------------------------------------------------------------------------

/// Shaping function signature: maps raw progress in [0, 1] to output in [0, 1].
pub type ShapeFn = fn(f32) -> f32;

/// Identity shaping (constant velocity).
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic shaping (slow start). Used by the arrival highlight.
#[inline]
pub fn square(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Inverted shaping: output runs 1 → 0 as progress runs 0 → 1.
///
/// Used for arcs that deplete while their timer advances.
#[inline]
pub fn inverse(t: f32) -> f32 {
    1.0 - t.clamp(0.0, 1.0)
}

/// Quadratic ease-out (fast start, slow end). Used for repositioning moves.
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

// ---------------------------------------------------------------------------
// Tween
// ---------------------------------------------------------------------------

/// Smallest usable duration; zero or negative durations clamp to this.
const MIN_DURATION: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Reverse,
}

/// A normalized 0–1 progress timer with an optional reverse phase.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    elapsed: f32,
    duration: f32,
    reverse_duration: Option<f32>,
    direction: Direction,
    shape: ShapeFn,
    done: bool,
}

impl Tween {
    /// Create a forward tween over `duration` delta units with linear shaping.
    #[must_use]
    pub fn new(duration: f32) -> Self {
        Self {
            elapsed: 0.0,
            duration: duration.max(MIN_DURATION),
            reverse_duration: None,
            direction: Direction::Forward,
            shape: linear,
            done: false,
        }
    }

    /// Add a reverse phase: on reaching 1.0 the tween runs back to 0.0 over
    /// `duration`, and only then reports completion.
    #[must_use]
    pub fn with_reverse(mut self, duration: f32) -> Self {
        self.reverse_duration = Some(duration.max(MIN_DURATION));
        self
    }

    /// Set the shaping function.
    #[must_use]
    pub fn shape(mut self, shape: ShapeFn) -> Self {
        self.shape = shape;
        self
    }

    /// Multiply every configured duration by `time_scale`.
    ///
    /// This is the uniform speed multiplier: 2.0 makes the tween take twice
    /// as many delta units end to end.
    #[must_use]
    pub fn scaled(mut self, time_scale: f32) -> Self {
        let scale = time_scale.max(MIN_DURATION);
        self.duration *= scale;
        if let Some(rev) = self.reverse_duration.as_mut() {
            *rev *= scale;
        }
        self
    }

    /// Advance by `delta` units. Negative deltas are treated as zero.
    pub fn tick(&mut self, delta: f32) {
        if self.done {
            return;
        }
        self.elapsed += delta.max(0.0);
        match self.direction {
            Direction::Forward => {
                if self.elapsed >= self.duration {
                    match self.reverse_duration {
                        Some(rev) => {
                            // Flip and carry the overshoot into the reverse leg.
                            self.elapsed -= self.duration;
                            self.direction = Direction::Reverse;
                            if self.elapsed >= rev {
                                self.elapsed = rev;
                                self.done = true;
                            }
                        }
                        None => {
                            self.elapsed = self.duration;
                            self.done = true;
                        }
                    }
                }
            }
            Direction::Reverse => {
                let rev = self.reverse_duration.unwrap_or(self.duration);
                if self.elapsed >= rev {
                    self.elapsed = rev;
                    self.done = true;
                }
            }
        }
    }

    /// Raw progress before shaping, in [0.0, 1.0]. Runs 0 → 1 forward and
    /// 1 → 0 through the reverse phase.
    #[must_use]
    pub fn raw(&self) -> f32 {
        match self.direction {
            Direction::Forward => (self.elapsed / self.duration).clamp(0.0, 1.0),
            Direction::Reverse => {
                let rev = self.reverse_duration.unwrap_or(self.duration);
                (1.0 - self.elapsed / rev).clamp(0.0, 1.0)
            }
        }
    }

    /// Shaped output, clamped to [0.0, 1.0].
    #[must_use]
    pub fn value(&self) -> f32 {
        (self.shape)(self.raw()).clamp(0.0, 1.0)
    }

    /// Whether the tween has finished its final phase.
    ///
    /// Stays true on every later tick until [`reset`](Self::reset).
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.done
    }

    /// Delta units left in the current phase.
    #[must_use]
    pub fn remaining(&self) -> f32 {
        let limit = match self.direction {
            Direction::Forward => self.duration,
            Direction::Reverse => self.reverse_duration.unwrap_or(self.duration),
        };
        (limit - self.elapsed).max(0.0)
    }

    /// Rewind to the initial state.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.direction = Direction::Forward;
        self.done = false;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shaping_endpoints() {
        assert!((linear(0.0) - 0.0).abs() < f32::EPSILON);
        assert!((linear(1.0) - 1.0).abs() < f32::EPSILON);
        assert!((square(1.0) - 1.0).abs() < f32::EPSILON);
        assert!((inverse(0.0) - 1.0).abs() < f32::EPSILON);
        assert!((inverse(1.0) - 0.0).abs() < f32::EPSILON);
        assert!((ease_out(1.0) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn shaping_clamps_input() {
        assert!((linear(-2.0) - 0.0).abs() < f32::EPSILON);
        assert!((linear(3.0) - 1.0).abs() < f32::EPSILON);
        assert!((square(-1.0) - 0.0).abs() < f32::EPSILON);
        assert!((inverse(5.0) - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn starts_at_zero() {
        let tween = Tween::new(10.0);
        assert!((tween.value() - 0.0).abs() < f32::EPSILON);
        assert!(!tween.is_complete());
    }

    #[test]
    fn completes_exactly_at_duration() {
        let mut tween = Tween::new(10.0);
        for _ in 0..9 {
            tween.tick(1.0);
            assert!(!tween.is_complete());
        }
        tween.tick(1.0);
        assert!(tween.is_complete());
        assert!((tween.value() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn completion_is_idempotent() {
        let mut tween = Tween::new(5.0);
        tween.tick(20.0);
        assert!(tween.is_complete());
        tween.tick(1.0);
        tween.tick(100.0);
        assert!(tween.is_complete());
        assert!((tween.value() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn midpoint_value() {
        let mut tween = Tween::new(10.0);
        tween.tick(5.0);
        assert!((tween.value() - 0.5).abs() < 0.01);
    }

    #[test]
    fn square_shaping_applied() {
        let mut tween = Tween::new(10.0).shape(square);
        tween.tick(5.0);
        assert!((tween.value() - 0.25).abs() < 0.01);
        assert!((tween.raw() - 0.5).abs() < 0.01);
    }

    #[test]
    fn inverse_shaping_depletes() {
        let mut tween = Tween::new(10.0).shape(inverse);
        assert!((tween.value() - 1.0).abs() < f32::EPSILON);
        tween.tick(10.0);
        assert!(tween.is_complete());
        assert!((tween.value() - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn reverse_phase_not_complete_at_peak() {
        let mut tween = Tween::new(10.0).with_reverse(10.0);
        tween.tick(10.0);
        assert!(!tween.is_complete(), "peak must not report completion");
        assert!((tween.raw() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn reverse_phase_completes_at_zero() {
        let mut tween = Tween::new(10.0).with_reverse(10.0);
        tween.tick(10.0);
        tween.tick(5.0);
        assert!((tween.raw() - 0.5).abs() < 0.01);
        assert!(!tween.is_complete());
        tween.tick(5.0);
        assert!(tween.is_complete());
        assert!((tween.raw() - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn overshoot_carries_into_reverse() {
        let mut tween = Tween::new(10.0).with_reverse(10.0);
        tween.tick(15.0);
        // 5 units into the reverse leg.
        assert!((tween.raw() - 0.5).abs() < 0.01);
    }

    #[test]
    fn asymmetric_reverse_duration() {
        let mut tween = Tween::new(10.0).with_reverse(20.0);
        tween.tick(10.0);
        tween.tick(10.0);
        assert!(!tween.is_complete());
        assert!((tween.raw() - 0.5).abs() < 0.01);
        tween.tick(10.0);
        assert!(tween.is_complete());
    }

    #[test]
    fn scaled_stretches_duration() {
        let mut tween = Tween::new(10.0).scaled(2.0);
        tween.tick(10.0);
        assert!(!tween.is_complete());
        assert!((tween.value() - 0.5).abs() < 0.01);
        tween.tick(10.0);
        assert!(tween.is_complete());
    }

    #[test]
    fn negative_delta_is_noop() {
        let mut tween = Tween::new(10.0);
        tween.tick(5.0);
        let before = tween.value();
        tween.tick(-100.0);
        assert!((tween.value() - before).abs() < f32::EPSILON);
    }

    #[test]
    fn zero_duration_clamped() {
        let mut tween = Tween::new(0.0);
        tween.tick(0.001);
        assert!(tween.is_complete());
    }

    #[test]
    fn reset_rewinds() {
        let mut tween = Tween::new(10.0).with_reverse(10.0);
        tween.tick(25.0);
        tween.reset();
        assert!(!tween.is_complete());
        assert!((tween.raw() - 0.0).abs() < f32::EPSILON);
        tween.tick(10.0);
        assert!(!tween.is_complete(), "reverse phase survives reset");
    }

    #[test]
    fn remaining_counts_down() {
        let mut tween = Tween::new(10.0);
        assert!((tween.remaining() - 10.0).abs() < f32::EPSILON);
        tween.tick(4.0);
        assert!((tween.remaining() - 6.0).abs() < 0.001);
        tween.tick(100.0);
        assert!((tween.remaining() - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn many_small_ticks_stay_bounded() {
        let mut tween = Tween::new(7.0).with_reverse(3.0).shape(square);
        for _ in 0..10_000 {
            tween.tick(0.01);
            let v = tween.value();
            assert!((0.0..=1.0).contains(&v), "value out of range: {v}");
        }
        assert!(tween.is_complete());
    }
}
