//! Scroll-driven wind.
//!
//! The wind vector eases towards a target over a fixed duration. Progress is
//! sampled from the caller's monotonic clock, so there are no timers.

use bevy::math::Vec3;

/// Maps a scroll delta to the wind strength it produces.
///
/// ```
/// use scroll_cloth::cloth::wind::scroll_wind_target;
///
/// assert_eq!(scroll_wind_target(20.0, 15.0, 0.15), 15.0 * 0.15);
/// ```
pub fn scroll_wind_target(velocity: f32, max_velocity: f32, scale: f32) -> f32 {
    velocity.clamp(-max_velocity, max_velocity) * scale
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Tween {
    from: Vec3,
    to: Vec3,
    start: f64,
    duration: f64,
}

impl Tween {
    fn sample(&self, now: f64) -> (Vec3, bool) {
        if self.duration <= 0.0 {
            return (self.to, true);
        }
        let t = ((now - self.start) / self.duration).clamp(0.0, 1.0);
        (self.from.lerp(self.to, ease_out(t) as f32), t >= 1.0)
    }
}

// Quadratic ease-out
fn ease_out(t: f64) -> f64 {
    1.0 - (1.0 - t) * (1.0 - t)
}

#[derive(Debug, Clone, Default)]
pub struct Wind {
    current: Vec3,
    tween: Option<Tween>,
}

impl Wind {
    pub fn current(&self) -> Vec3 {
        self.current
    }

    /// Where the wind is heading, or the current value when it is not moving.
    pub fn target(&self) -> Vec3 {
        self.tween.map_or(self.current, |tween| tween.to)
    }

    pub fn is_easing(&self) -> bool {
        self.tween.is_some()
    }

    /// Starts easing from the current value to `target`. Replaces any
    /// easing already in progress.
    pub fn ease_to(&mut self, target: Vec3, now: f64, duration: f64) {
        self.tween = Some(Tween {
            from: self.current,
            to: target,
            start: now,
            duration,
        });
    }

    /// Sets the wind immediately, cancelling any easing.
    pub fn set(&mut self, value: Vec3) {
        self.current = value;
        self.tween = None;
    }

    pub fn reset(&mut self) {
        self.set(Vec3::ZERO);
    }

    /// Samples the easing at `now` and returns the resulting wind.
    pub fn advance(&mut self, now: f64) -> Vec3 {
        if let Some(tween) = self.tween {
            let (value, done) = tween.sample(now);
            self.current = value;
            if done {
                self.tween = None;
            }
        }
        self.current
    }
}
