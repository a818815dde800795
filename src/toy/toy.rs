use glam::Vec3;

/// A free toy object: a rigid sphere with linear velocity and mass, fully
/// decoupled from any renderable representation. Renderables keep a handle to
/// their toy and sync transforms after each step.
#[derive(Debug, Clone)]
pub struct Toy {
    pub name: String,
    pub position: Vec3,
    pub velocity: Vec3,
    pub radius: f32,
    pub mass: f32,
    /// Parked toys skip physics entirely until released or grabbed.
    pub immobile: bool,
    pub grabbed: bool,
}

impl Toy {
    pub fn new(name: impl Into<String>, position: Vec3, radius: f32, mass: f32) -> Self {
        Self {
            name: name.into(),
            position,
            velocity: Vec3::ZERO,
            radius,
            mass,
            immobile: false,
            grabbed: false,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn immobile(mut self) -> Self {
        self.immobile = true;
        self
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// True when the toy takes part in the physics pass this tick.
    pub fn is_active(&self) -> bool {
        !self.immobile || self.grabbed
    }
}
