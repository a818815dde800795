use glam::Vec3;

use super::simulation::Simulation;
use crate::error::SimError;

/// A suspension chain whose first particle is pinned to an externally
/// commanded anchor position.
///
/// The anchor is repositioned between steps (typically from a path sample)
/// and its force, acceleration and velocity are zeroed after every advance,
/// so spring forces never drag it while the rest of the chain swings freely.
#[derive(Debug, Clone)]
pub struct ChainRig {
    sim: Simulation,
    anchor_position: Vec3,
    rest_state: Vec<(Vec3, Vec3)>,
    tail: usize,
}

impl ChainRig {
    /// Wraps a configured simulation, pinning particle 0 at its current
    /// position. The tail defaults to the last particle.
    pub fn new(sim: Simulation) -> Self {
        let anchor_position = sim
            .particles()
            .first()
            .map(|p| p.position)
            .unwrap_or(Vec3::ZERO);
        let rest_state: Vec<(Vec3, Vec3)> = sim
            .particles()
            .iter()
            .map(|p| (p.position, p.velocity))
            .collect();
        let tail = rest_state.len().saturating_sub(1);
        Self {
            sim,
            anchor_position,
            rest_state,
            tail,
        }
    }

    /// Builds the default claw suspension: a three-particle vertical chain
    /// hanging from the anchor, with three splayed tip particles strung from
    /// the chain's foot by stiff springs.
    pub fn claw(top: Vec3) -> Self {
        let mut sim = Simulation::new();
        sim.ground_ks = 5000.0;
        sim.ground_kd = 10.0;

        for i in 0..3 {
            sim.add_particle(top - Vec3::new(0.0, 0.5 * i as f32, 0.0), 1.0, Vec3::ZERO);
        }
        let tips = [
            Vec3::new(1.5, -2.0, 0.0),
            Vec3::new(-0.75, -2.0, 1.3),
            Vec3::new(-0.75, -2.0, -1.3),
        ];
        for tip in tips {
            sim.add_particle(top + tip, 1.0, Vec3::ZERO);
        }

        // Chain links, then the stiffer tip strings.
        for i in 0..2 {
            sim.add_spring(i, i + 1, 500.0, 10.0, 0.5)
                .expect("chain particles configured above");
        }
        for tip in 3..6 {
            sim.add_spring(2, tip, 5000.0, 10.0, 2.5)
                .expect("tip particles configured above");
        }

        // The grabber mounts on the chain foot; the tips swing free.
        let mut rig = Self::new(sim);
        rig.tail = 2;
        rig
    }

    /// Repositions the pinned anchor; takes effect on the next update.
    pub fn set_anchor(&mut self, position: Vec3) {
        self.anchor_position = position;
    }

    pub fn anchor(&self) -> Vec3 {
        self.anchor_position
    }

    /// Advances the underlying simulation by `dt` and re-pins the anchor.
    pub fn update(&mut self, dt: f32) -> Result<(), SimError> {
        if let Some(p) = self.sim.particles_mut().first_mut() {
            p.position = self.anchor_position;
        }
        self.sim.advance(dt)?;
        if let Some(p) = self.sim.particles_mut().first_mut() {
            p.position = self.anchor_position;
            p.velocity = Vec3::ZERO;
            p.acceleration = Vec3::ZERO;
            p.external_force = Vec3::ZERO;
        }
        Ok(())
    }

    /// World position of the tail particle, usable as an IK base or target.
    pub fn tail_position(&self) -> Vec3 {
        self.sim
            .particles()
            .get(self.tail)
            .map(|p| p.position)
            .unwrap_or(self.anchor_position)
    }

    pub fn tail_index(&self) -> usize {
        self.tail
    }

    /// Selects which particle counts as the tail; out-of-range indices are
    /// ignored.
    pub fn set_tail_index(&mut self, index: usize) {
        if index < self.sim.particle_count() {
            self.tail = index;
        }
    }

    /// Particle positions in order, for mesh syncing.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.sim.particles().iter().map(|p| p.position)
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.sim
    }

    /// Restores every particle to its captured rest position and velocity.
    pub fn reset(&mut self) {
        for (particle, (position, velocity)) in
            self.sim.particles_mut().iter_mut().zip(&self.rest_state)
        {
            particle.position = *position;
            particle.prev_position = *position;
            particle.velocity = *velocity;
            particle.acceleration = Vec3::ZERO;
            particle.prev_acceleration = Vec3::ZERO;
        }
    }
}
