//! Per-frame stepping of the banner and the idle/active lifecycle.
//!
//! The caller owns the clock and the frame loop. While a cloth is `Active`
//! it expects `tick` once per frame and answers whether it wants another.

use bevy::log::{debug, info, warn};
use bevy::math::Vec3;

use super::constraint::ConstraintSet;
use super::error::ClothError;
use super::params::ClothParams;
use super::particle::ParticleGrid;
use super::vertex::VertexSink;
use super::wind::{scroll_wind_target, Wind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimMode {
    /// No physics, the last uploaded pose stays on screen.
    Idle,
    /// Physics runs every tick.
    Active,
}

/// Answer to the tick provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Continue,
    Halt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Advanced,
    /// The state diverged and was rebuilt from rest.
    Exploded,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Settle {
    /// Wind follows the scroll, waiting for scrolling to stop.
    Scrolling { last_scroll: f64 },
    /// Wind is fading out, stability is checked once it has had time to.
    Calming { since: f64 },
    /// Stability was not reached yet, check again at `next_check`.
    Polling { next_check: f64 },
}

pub struct ClothSim {
    params: ClothParams,
    grid: ParticleGrid,
    constraints: ConstraintSet,
    wind: Wind,
    mode: SimMode,
    settle: Option<Settle>,
    stable_streak: u32,
    last_scroll_y: Option<f32>,
}

impl ClothSim {
    pub fn new(params: ClothParams) -> Result<ClothSim, ClothError> {
        params.validate()?;
        let (grid, constraints) = build(&params);

        Ok(ClothSim {
            params,
            grid,
            constraints,
            wind: Wind::default(),
            mode: SimMode::Idle,
            settle: None,
            stable_streak: 0,
            last_scroll_y: None,
        })
    }

    pub fn params(&self) -> &ClothParams {
        &self.params
    }

    pub fn grid(&self) -> &ParticleGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut ParticleGrid {
        &mut self.grid
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    pub fn mode(&self) -> SimMode {
        self.mode
    }

    pub fn wind(&self) -> Vec3 {
        self.wind.current()
    }

    /// Line segments of every constraint, for debug drawing.
    pub fn links(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        let particles = self.grid.particles();
        self.constraints
            .iter()
            .map(move |c| (particles[c.a].position, particles[c.b].position))
    }

    /// Feeds a scroll sample and returns the derived scroll velocity.
    pub fn on_scroll(&mut self, scroll_y: f32, now: f64) -> f32 {
        let velocity = self.last_scroll_y.map_or(0.0, |last| scroll_y - last);
        self.last_scroll_y = Some(scroll_y);

        if velocity.abs() > self.params.scroll_threshold {
            self.activate(now);

            let strength = scroll_wind_target(
                velocity,
                self.params.max_scroll_velocity,
                self.params.wind_scale,
            );
            self.wind
                .ease_to(Vec3::new(0.0, strength, 0.0), now, self.params.wind_rise_secs);
        } else if self.mode == SimMode::Active {
            self.settle = Some(Settle::Scrolling { last_scroll: now });
        }

        velocity
    }

    /// Switches to `Active` and restarts the "scrolling stopped" clock.
    pub fn activate(&mut self, now: f64) {
        if self.mode == SimMode::Idle {
            debug!("cloth activated at {:.3}s", now);
        }
        self.mode = SimMode::Active;
        self.settle = Some(Settle::Scrolling { last_scroll: now });
        self.stable_streak = 0;
    }

    /// Sets the wind immediately, skipping any easing.
    pub fn set_wind(&mut self, wind: Vec3) {
        self.wind.set(wind);
    }

    /// Adds a force to one particle for the next step only.
    pub fn apply_force(&mut self, index: usize, force: Vec3) {
        self.grid.particle_mut(index).apply_force(force);
    }

    /// One animation frame. Idle cloths do nothing and ask to halt.
    pub fn tick<S: VertexSink>(&mut self, now: f64, sink: &mut S) -> Tick {
        if self.mode == SimMode::Idle {
            return Tick::Halt;
        }

        self.wind.advance(now);

        if self.simulate(sink) == StepOutcome::Exploded {
            return Tick::Halt;
        }

        self.update_settle(now)
    }

    /// One physics step of `time_step` seconds.
    pub fn simulate<S: VertexSink>(&mut self, sink: &mut S) -> StepOutcome {
        let params = self.params;
        let dt = params.time_step;
        let drag = params.drag();
        let wind = self.wind.current();

        // A pose that is already torn would be dragged back under the limit
        // by relaxation, so check before stepping too.
        if self.rebuild_if_diverged(sink) {
            return StepOutcome::Exploded;
        }

        for particle in self.grid.particles_mut() {
            if particle.pinned {
                continue;
            }

            // Gravity
            particle.apply_force(params.gravity);

            // The scroll-driven wind pushes the banner out of its plane
            particle.apply_force(Vec3::new(0.0, 0.0, wind.y));

            // Pull back towards z = 0
            particle.apply_force(Vec3::new(
                0.0,
                0.0,
                -params.flatten_strength * particle.position.z,
            ));

            particle.integrate(dt, drag, params.max_displacement);
        }

        self.constraints
            .relax(self.grid.particles_mut(), params.relax_iterations);

        if self.rebuild_if_diverged(sink) {
            return StepOutcome::Exploded;
        }

        sink.upload(self.grid.particles());
        StepOutcome::Advanced
    }

    fn rebuild_if_diverged<S: VertexSink>(&mut self, sink: &mut S) -> bool {
        let limit = self.params.explosion_limit;
        let index = match self.grid.particles().iter().position(|p| p.has_diverged(limit)) {
            Some(index) => index,
            None => return false,
        };

        warn!(
            "cloth diverged at particle {} ({:?}), rebuilding from rest",
            index,
            self.grid.particle(index).position
        );
        self.reset(sink);
        true
    }

    /// True when no free particle moved more than the stability thresholds
    /// during the last step.
    pub fn is_stable(&self) -> bool {
        self.grid
            .particles()
            .iter()
            .filter(|p| !p.pinned)
            .all(|p| {
                let velocity = p.velocity();
                velocity.length() <= self.params.stable_velocity
                    && velocity.z.abs() <= self.params.stable_z_velocity
            })
    }

    /// Discards all motion and rebuilds the cloth at rest. Idempotent.
    pub fn reset<S: VertexSink>(&mut self, sink: &mut S) {
        let (grid, constraints) = build(&self.params);
        self.grid = grid;
        self.constraints = constraints;
        self.wind.reset();
        self.halt();
        sink.upload(self.grid.particles());
    }

    /// Rebuilds the cloth for new world-space dimensions.
    pub fn resize<S: VertexSink>(
        &mut self,
        width: f32,
        height: f32,
        sink: &mut S,
    ) -> Result<(), ClothError> {
        let params = self.params.with_size(width, height);
        params.validate()?;
        self.params = params;
        self.reset(sink);
        Ok(())
    }

    /// Rebuilds the cloth with different parameters.
    pub fn reconfigure<S: VertexSink>(
        &mut self,
        params: ClothParams,
        sink: &mut S,
    ) -> Result<(), ClothError> {
        params.validate()?;
        self.params = params;
        self.reset(sink);
        Ok(())
    }

    /// Stops the tick loop and drops any pending stability checks.
    pub fn teardown(&mut self) {
        self.halt();
        self.wind.reset();
        self.last_scroll_y = None;
    }

    fn halt(&mut self) {
        self.mode = SimMode::Idle;
        self.settle = None;
        self.stable_streak = 0;
    }

    fn update_settle(&mut self, now: f64) -> Tick {
        let params = self.params;

        let check_due = match self.settle {
            Some(Settle::Scrolling { last_scroll }) => {
                if now - last_scroll >= params.scroll_idle_secs {
                    self.wind.ease_to(Vec3::ZERO, now, params.wind_fall_secs);
                    self.settle = Some(Settle::Calming { since: now });
                }
                false
            }
            Some(Settle::Calming { since }) => now - since >= params.settle_delay_secs,
            Some(Settle::Polling { next_check }) => now >= next_check,
            None => false,
        };

        if !check_due {
            return Tick::Continue;
        }

        if self.is_stable() {
            self.stable_streak += 1;
        } else {
            self.stable_streak = 0;
        }

        if self.stable_streak >= params.stable_checks_required {
            info!("cloth settled at {:.3}s", now);
            self.halt();
            return Tick::Halt;
        }

        self.settle = Some(Settle::Polling {
            next_check: now + params.recheck_secs,
        });
        Tick::Continue
    }
}

fn build(params: &ClothParams) -> (ParticleGrid, ConstraintSet) {
    let grid = ParticleGrid::build(
        params.cloth_width,
        params.cloth_height,
        params.segments_w,
        params.segments_h,
        params.mass,
    );
    let constraints = ConstraintSet::build(&grid, params.rest_distance());
    (grid, constraints)
}
