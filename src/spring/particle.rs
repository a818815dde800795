use glam::Vec3;

/// A point mass in the spring simulation.
///
/// `valid` doubles as the configured/enabled flag: invalid particles are
/// excluded from force accumulation and integration, which also makes the
/// flag usable to pin or disable a particle without removing it.
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub position: Vec3,
    pub prev_position: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,
    /// Acceleration from the previous step, consumed by Verlet integration.
    pub prev_acceleration: Vec3,
    pub force: Vec3,
    pub external_force: Vec3,
    pub mass: f32,
    pub valid: bool,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            prev_position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            prev_acceleration: Vec3::ZERO,
            force: Vec3::ZERO,
            external_force: Vec3::ZERO,
            mass: 1.0,
            valid: false,
        }
    }
}

impl Particle {
    pub fn new(position: Vec3, mass: f32, velocity: Vec3) -> Self {
        Self {
            position,
            prev_position: position,
            velocity,
            mass,
            valid: true,
            ..Self::default()
        }
    }
}

/// A damped spring linking two particles by arena index.
///
/// Springs never own their endpoints; they reference slots in the owning
/// [`Simulation`](super::Simulation)'s particle arena. Slots are stable:
/// particles are disabled via `valid`, never removed.
#[derive(Debug, Clone, Copy)]
pub struct Spring {
    pub a: usize,
    pub b: usize,
    /// Stiffness.
    pub ks: f32,
    /// Damping.
    pub kd: f32,
    pub rest_length: f32,
    pub valid: bool,
}

impl Default for Spring {
    fn default() -> Self {
        Self {
            a: 0,
            b: 0,
            ks: 1.0,
            kd: 0.1,
            rest_length: 1.0,
            valid: false,
        }
    }
}
