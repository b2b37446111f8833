//! Time-driven interpolation: easing curves, fixed-duration tweens, and springs.
//!
//! Nothing here owns a clock. Every animated value is advanced explicitly with
//! the frame's delta time, so the same code runs under the real render loop and
//! under a synthetic fixed-step clock in tests.
//!
//! - [`Easing`] maps linear progress to a curved progress value.
//! - [`Tween`] interpolates between two values over a fixed duration, with an
//!   optional start delay.
//! - [`Spring`] chases a target with a damped spring; re-targeting keeps the
//!   current value and velocity, so a reversed animation redirects smoothly.

use std::collections::VecDeque;

use glam::Vec3;
use serde::Deserialize;

/// Easing functions for tweens.
///
/// The `Power*` names follow the common animation-library convention where
/// `Power2` is a cubic curve and `Power3` a quartic one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant speed throughout.
    #[default]
    Linear,
    /// Start slow, accelerate.
    EaseIn,
    /// Start fast, decelerate.
    EaseOut,
    /// Start slow, speed up, then slow down.
    EaseInOut,
    /// Cubic deceleration.
    Power2Out,
    /// Cubic acceleration then deceleration.
    Power2InOut,
    /// Quartic acceleration then deceleration.
    Power3InOut,
    /// Overshoots the target slightly before settling.
    BackOut,
}

impl Easing {
    /// Apply the easing function to a linear progress value (0.0 to 1.0).
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => in_out(t, 2),
            Easing::Power2Out => 1.0 - (1.0 - t).powi(3),
            Easing::Power2InOut => in_out(t, 3),
            Easing::Power3InOut => in_out(t, 4),
            Easing::BackOut => {
                const OVERSHOOT: f32 = 2.0;
                let u = t - 1.0;
                1.0 + (OVERSHOOT + 1.0) * u.powi(3) + OVERSHOOT * u.powi(2)
            }
        }
    }
}

fn in_out(t: f32, degree: i32) -> f32 {
    let scale = 2f32.powi(degree - 1);
    if t < 0.5 {
        scale * t.powi(degree)
    } else {
        1.0 - (-2.0 * t + 2.0).powi(degree) / 2.0
    }
}

/// Values that can be linearly interpolated.
pub trait Lerp: Copy {
    fn lerp(self, to: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Vec3 {
    fn lerp(self, to: Self, t: f32) -> Self {
        Vec3::lerp(self, to, t)
    }
}

/// A fixed-duration interpolation from one value to another.
///
/// # Example
///
/// ```
/// use deskfolio::{Easing, Tween};
///
/// let mut fade = Tween::new(0.0_f32, 1.0, 2.0).easing(Easing::Linear);
/// assert_eq!(fade.advance(1.0), 0.5);
/// assert_eq!(fade.advance(5.0), 1.0);
/// assert!(fade.is_finished());
/// ```
#[derive(Clone, Debug)]
pub struct Tween<T: Lerp> {
    from: T,
    to: T,
    duration: f32,
    delay: f32,
    easing: Easing,
    elapsed: f32,
}

impl<T: Lerp> Tween<T> {
    /// Create a linear tween over `duration` seconds.
    pub fn new(from: T, to: T, duration: f32) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            delay: 0.0,
            easing: Easing::Linear,
            elapsed: 0.0,
        }
    }

    /// Set the easing curve.
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Hold at `from` for `delay` seconds before starting.
    pub fn delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    /// Advance by `dt` seconds and return the new value.
    pub fn advance(&mut self, dt: f32) -> T {
        self.elapsed += dt.max(0.0);
        self.value()
    }

    /// Current interpolated value.
    pub fn value(&self) -> T {
        self.from.lerp(self.to, self.easing.apply(self.progress()))
    }

    /// Linear progress in `[0, 1]`, ignoring easing.
    pub fn progress(&self) -> f32 {
        let active = self.elapsed - self.delay;
        if active < 0.0 {
            0.0
        } else if self.duration <= f32::EPSILON {
            1.0
        } else {
            (active / self.duration).min(1.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.delay + self.duration
    }

    /// Seconds left until the tween reaches its target.
    pub fn remaining(&self) -> f32 {
        (self.delay + self.duration - self.elapsed).max(0.0)
    }

    pub fn target(&self) -> T {
        self.to
    }

    /// Delay plus duration.
    pub fn total_duration(&self) -> f32 {
        self.delay + self.duration
    }
}

/// One segment of a [`Track`].
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Leg<T> {
    pub to: T,
    pub duration: f32,
    #[serde(default)]
    pub easing: Easing,
}

impl<T> Leg<T> {
    pub fn new(to: T, duration: f32, easing: Easing) -> Self {
        Self {
            to,
            duration,
            easing,
        }
    }
}

/// A sequence of tweens played back to back on one value.
///
/// Each leg starts from wherever the previous one ended, and time left over
/// when a leg finishes mid-frame carries into the next leg. A zero-duration
/// leg is a snap.
///
/// ```
/// use deskfolio::{Easing, Leg, Track};
///
/// let mut track = Track::new(0.0_f32, vec![
///     Leg::new(10.0, 0.0, Easing::Linear),
///     Leg::new(20.0, 1.0, Easing::Linear),
/// ]);
/// assert_eq!(track.advance(0.5), 15.0);
/// assert_eq!(track.advance(0.5), 20.0);
/// assert!(track.is_finished());
/// ```
#[derive(Clone, Debug)]
pub struct Track<T: Lerp> {
    value: T,
    delay: f32,
    active: Option<Tween<T>>,
    pending: VecDeque<Leg<T>>,
    completed_legs: usize,
}

impl<T: Lerp> Track<T> {
    pub fn new(from: T, legs: Vec<Leg<T>>) -> Self {
        Self {
            value: from,
            delay: 0.0,
            active: None,
            pending: legs.into(),
            completed_legs: 0,
        }
    }

    /// Hold the current value for `delay` seconds before the first leg.
    pub fn delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    /// Advance by `dt` seconds and return the new value.
    pub fn advance(&mut self, dt: f32) -> T {
        let mut dt = dt.max(0.0);
        if self.delay > 0.0 {
            let waited = dt.min(self.delay);
            self.delay -= waited;
            dt -= waited;
            if self.delay > 0.0 {
                return self.value;
            }
        }

        loop {
            if self.active.is_none() {
                let Some(leg) = self.pending.pop_front() else {
                    break;
                };
                self.active = Some(Tween::new(self.value, leg.to, leg.duration).easing(leg.easing));
            }
            let Some(tween) = self.active.as_mut() else {
                break;
            };

            let remaining = tween.remaining();
            if dt >= remaining {
                dt -= remaining;
                self.value = tween.target();
                self.active = None;
                self.completed_legs += 1;
            } else {
                self.value = tween.advance(dt);
                break;
            }
        }
        self.value
    }

    pub fn value(&self) -> T {
        self.value
    }

    pub fn is_finished(&self) -> bool {
        self.delay <= 0.0 && self.active.is_none() && self.pending.is_empty()
    }

    pub fn completed_legs(&self) -> usize {
        self.completed_legs
    }
}

/// Largest integration step; longer frames are subdivided.
const MAX_SPRING_STEP: f32 = 1.0 / 240.0;

/// A damped spring chasing a scalar target.
///
/// The spring is parameterised by stiffness (tension) and damping (friction)
/// with unit mass. Changing the target never resets the current value or the
/// velocity.
#[derive(Clone, Debug)]
pub struct Spring {
    pub current: f32,
    pub target: f32,
    pub velocity: f32,
    pub stiffness: f32,
    pub damping: f32,
    /// Distance and speed below which the spring counts as settled.
    pub rest_threshold: f32,
}

impl Spring {
    /// A spring at rest at `value`.
    pub fn new(value: f32, stiffness: f32, damping: f32) -> Self {
        Self {
            current: value,
            target: value,
            velocity: 0.0,
            stiffness,
            damping,
            rest_threshold: 1e-3,
        }
    }

    /// A spring whose damping is exactly critical for its stiffness, so it
    /// approaches the target as fast as possible without overshoot.
    pub fn critically_damped(value: f32, stiffness: f32) -> Self {
        Self::new(value, stiffness, 2.0 * stiffness.max(0.0).sqrt())
    }

    /// Redirect the spring toward a new target.
    pub fn retarget(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump straight to `value` and stop.
    pub fn snap(&mut self, value: f32) {
        self.current = value;
        self.target = value;
        self.velocity = 0.0;
    }

    /// Integrate the spring forward by `dt` seconds.
    pub fn step(&mut self, dt: f32) -> f32 {
        let mut remaining = dt.max(0.0);
        while remaining > 0.0 {
            let h = remaining.min(MAX_SPRING_STEP);
            let accel =
                -self.stiffness * (self.current - self.target) - self.damping * self.velocity;
            self.velocity += accel * h;
            self.current += self.velocity * h;
            remaining -= h;
        }
        if self.is_settled() {
            self.current = self.target;
            self.velocity = 0.0;
        }
        self.current
    }

    pub fn is_settled(&self) -> bool {
        (self.current - self.target).abs() < self.rest_threshold
            && self.velocity.abs() < self.rest_threshold
    }
}
