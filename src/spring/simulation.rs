use glam::Vec3;
use log::debug;

use super::particle::{Particle, Spring};
use crate::error::SimError;

/// Integration scheme for particle state updates.
///
/// A per-instance field, selected at configuration time; there is no shared
/// mode flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Integrator {
    /// Explicit Euler: position advances on the pre-update velocity.
    Euler,
    /// Semi-implicit Euler: velocity first, then position. The default, and
    /// the most stable of the three for stiff springs at moderate dt.
    #[default]
    Symplectic,
    /// Velocity Verlet, using the stored previous-step acceleration.
    Verlet,
}

/// Frame dt above this is clamped before sub-stepping.
const MAX_FRAME_DT: f32 = 1.0 / 60.0;

/// A mass-spring-damper system over an arena of particles and springs.
///
/// Slots are created up front and configured individually; stepping with an
/// unconfigured slot is an initialization error rather than a NaN factory.
#[derive(Debug, Clone)]
pub struct Simulation {
    particles: Vec<Particle>,
    springs: Vec<Spring>,
    pub gravity: Vec3,
    pub gravity_enabled: bool,
    pub ground_y: f32,
    pub ground_ks: f32,
    pub ground_kd: f32,
    pub integrator: Integrator,
    /// Fixed sub-step size used by [`advance`](Self::advance).
    pub time_step: f32,
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            particles: Vec::new(),
            springs: Vec::new(),
            gravity: Vec3::new(0.0, -9.8, 0.0),
            gravity_enabled: true,
            ground_y: 0.0,
            ground_ks: 1000.0,
            ground_kd: 10.0,
            integrator: Integrator::default(),
            time_step: 1.0 / 1000.0,
        }
    }
}

impl Simulation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves `count` unconfigured particle slots.
    pub fn create_particles(&mut self, count: usize) {
        self.particles
            .extend(std::iter::repeat(Particle::default()).take(count));
    }

    /// Reserves `count` unconfigured spring slots.
    pub fn create_springs(&mut self, count: usize) {
        self.springs
            .extend(std::iter::repeat(Spring::default()).take(count));
    }

    /// Configures the particle slot at `index`.
    pub fn set_particle(
        &mut self,
        index: usize,
        position: Vec3,
        mass: f32,
        velocity: Vec3,
    ) -> Result<(), SimError> {
        let count = self.particles.len();
        let slot = self
            .particles
            .get_mut(index)
            .ok_or(SimError::ParticleIndexOutOfRange { index, count })?;
        *slot = Particle::new(position, mass, velocity);
        Ok(())
    }

    /// Configures the spring slot at `index` to link particles `a` and `b`.
    /// A `rest_length <= 0` sentinel auto-computes the rest length from the
    /// current particle distance, so both endpoints must already be
    /// configured.
    pub fn set_spring(
        &mut self,
        index: usize,
        a: usize,
        b: usize,
        ks: f32,
        kd: f32,
        rest_length: f32,
    ) -> Result<(), SimError> {
        let count = self.particles.len();
        for endpoint in [a, b] {
            let particle = self
                .particles
                .get(endpoint)
                .ok_or(SimError::ParticleIndexOutOfRange {
                    index: endpoint,
                    count,
                })?;
            if !particle.valid && rest_length <= 0.0 {
                return Err(SimError::ParticleNotConfigured(endpoint));
            }
        }
        let rest_length = if rest_length > 0.0 {
            rest_length
        } else {
            self.particles[a].position.distance(self.particles[b].position)
        };
        let spring_count = self.springs.len();
        let slot = self
            .springs
            .get_mut(index)
            .ok_or(SimError::SpringIndexOutOfRange {
                index,
                count: spring_count,
            })?;
        *slot = Spring {
            a,
            b,
            ks,
            kd,
            rest_length,
            valid: true,
        };
        Ok(())
    }

    /// Appends a configured particle, returning its index.
    pub fn add_particle(&mut self, position: Vec3, mass: f32, velocity: Vec3) -> usize {
        self.particles.push(Particle::new(position, mass, velocity));
        self.particles.len() - 1
    }

    /// Appends a configured spring, returning its index. Same rest-length
    /// sentinel as [`set_spring`](Self::set_spring).
    pub fn add_spring(
        &mut self,
        a: usize,
        b: usize,
        ks: f32,
        kd: f32,
        rest_length: f32,
    ) -> Result<usize, SimError> {
        self.create_springs(1);
        let index = self.springs.len() - 1;
        self.set_spring(index, a, b, ks, kd, rest_length)?;
        Ok(index)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn set_ground(&mut self, ks: f32, kd: f32) {
        self.ground_ks = ks;
        self.ground_kd = kd;
    }

    pub fn set_integrator(&mut self, integrator: Integrator, time_step: f32) {
        self.integrator = integrator;
        self.time_step = time_step;
    }

    pub fn toggle_gravity(&mut self) -> bool {
        self.gravity_enabled = !self.gravity_enabled;
        debug!("spring gravity enabled: {}", self.gravity_enabled);
        self.gravity_enabled
    }

    /// Sets the injected external force on one particle.
    pub fn set_external_force(&mut self, index: usize, force: Vec3) -> Result<(), SimError> {
        let count = self.particles.len();
        let particle = self
            .particles
            .get_mut(index)
            .ok_or(SimError::ParticleIndexOutOfRange { index, count })?;
        particle.external_force = force;
        Ok(())
    }

    /// Runs a single fixed step: force accumulation then integration.
    pub fn step(&mut self) -> Result<(), SimError> {
        self.accumulate_forces()?;
        self.integrate();
        Ok(())
    }

    /// Advances the simulation by a frame's `dt`, clamped to 1/60 s, in
    /// fixed `time_step` sub-steps. Stability is set by `time_step`, not by
    /// the caller's frame rate.
    pub fn advance(&mut self, dt: f32) -> Result<(), SimError> {
        let dt = dt.min(MAX_FRAME_DT).max(0.0);
        let steps = ((dt / self.time_step).ceil() as usize).max(1);
        for _ in 0..steps {
            self.step()?;
        }
        Ok(())
    }

    fn accumulate_forces(&mut self) -> Result<(), SimError> {
        for particle in &mut self.particles {
            if !particle.valid {
                continue;
            }
            particle.force = particle.external_force;
            if self.gravity_enabled {
                particle.force += self.gravity * particle.mass;
            }
            // Penalty-spring ground contact: soft, penetration-based, damped
            // only while approaching.
            if particle.position.y < self.ground_y {
                let depth = self.ground_y - particle.position.y;
                particle.force.y += depth * self.ground_ks;
                if particle.velocity.y < 0.0 {
                    particle.force.y += -particle.velocity.y * self.ground_kd;
                }
            }
        }

        for (index, spring) in self.springs.iter().enumerate() {
            if !spring.valid {
                return Err(SimError::SpringNotConfigured(index));
            }
            let (a, b) = (spring.a, spring.b);
            let pa = self.particles[a];
            let pb = self.particles[b];
            // Disabled endpoints contribute no force (pinned slots).
            if !pa.valid || !pb.valid {
                continue;
            }
            let delta = pb.position - pa.position;
            let length = delta.length();
            if length == 0.0 {
                // Coincident endpoints have no defined direction.
                continue;
            }
            let dir = delta / length;
            let rel_vel = pb.velocity - pa.velocity;
            let magnitude = spring.ks * (length - spring.rest_length) + spring.kd * rel_vel.dot(dir);
            let force = dir * magnitude;
            self.particles[a].force += force;
            self.particles[b].force -= force;
        }
        Ok(())
    }

    fn integrate(&mut self) {
        let dt = self.time_step;
        for particle in &mut self.particles {
            if !particle.valid {
                continue;
            }
            particle.prev_position = particle.position;
            let new_acc = particle.force / particle.mass;
            match self.integrator {
                Integrator::Euler => {
                    particle.acceleration = new_acc;
                    particle.position += particle.velocity * dt;
                    particle.velocity += particle.acceleration * dt;
                }
                Integrator::Symplectic => {
                    particle.acceleration = new_acc;
                    particle.velocity += particle.acceleration * dt;
                    particle.position += particle.velocity * dt;
                }
                Integrator::Verlet => {
                    // Velocity first from the averaged accelerations, then
                    // position from the updated velocity. Position-first with
                    // the stale velocity pumps energy into stiff springs.
                    let prev_acc = particle.prev_acceleration;
                    particle.velocity += (prev_acc + new_acc) * (0.5 * dt);
                    particle.position += particle.velocity * dt + prev_acc * (0.5 * dt * dt);
                    particle.acceleration = new_acc;
                    particle.prev_acceleration = new_acc;
                }
            }
        }
    }
}
