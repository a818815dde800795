//! Mass-spring-damper simulator module
//!
//! Particles and springs in an index-based arena, three selectable
//! integration schemes, penalty-spring ground contact, and fixed sub-stepping
//! so stability does not depend on the frame rate. `ChainRig` wraps a
//! simulation into an anchor-pinned suspension chain driven by an external
//! position.

mod particle;
mod rig;
mod simulation;

pub use particle::{Particle, Spring};
pub use rig::ChainRig;
pub use simulation::{Integrator, Simulation};
