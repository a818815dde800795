//! # claw-sim
//!
//! Headless simulation core for a 3D claw machine: the physics and animation
//! layer with no rendering attached.
//!
//! ## Features
//! - Mass-spring-damper suspension chain with selectable integrators
//!   (Euler, semi-implicit Euler, velocity Verlet) and fixed sub-stepping
//! - Rigid-sphere toy engine: pairwise contacts, play-area containment,
//!   swept-sphere continuous collision for fast movers, and a one-way
//!   collection volume that emits collect/reset events
//! - Hermite and Catmull-Rom curve evaluation with arc-length tables for
//!   uniform-speed path traversal
//! - Heuristic per-joint IK solver for posing the articulated grabber
//! - `ClawMachine` orchestrator wiring path, chain, grabber and toys into a
//!   single per-frame update
//!
//! ## Example
//! ```rust,ignore
//! use claw_sim::{Aabb, ChainRig, ClawMachine, HermitePath, Toy, ToyWorld};
//! use glam::Vec3;
//!
//! let mut path = HermitePath::new();
//! path.add_segment(
//!     Vec3::new(-3.0, 6.0, 0.0),
//!     Vec3::new(3.0, 6.0, 0.0),
//!     Vec3::new(6.0, 0.0, 0.0),
//!     Vec3::new(6.0, 0.0, 0.0),
//! );
//!
//! let rig = ChainRig::claw(path.point_at(0.0));
//! let mut world = ToyWorld::new(
//!     Aabb::new(Vec3::new(-4.0, 0.0, -4.0), Vec3::new(4.0, 8.0, 4.0)),
//!     Aabb::new(Vec3::new(2.0, 0.0, 2.0), Vec3::new(3.5, 1.5, 3.5)),
//! );
//! world.add_toy(Toy::new("bear", Vec3::new(0.0, 1.0, 0.0), 0.4, 1.0));
//!
//! let mut machine = ClawMachine::new(path, rig, world);
//! machine.move_claw();
//! for event in machine.update(1.0 / 60.0).unwrap() {
//!     println!("{event:?}");
//! }
//! ```

pub mod error;
pub mod ik;
pub mod machine;
pub mod math;
pub mod spline;
pub mod spring;
pub mod toy;

pub use error::SimError;
pub use ik::{IkSolver, Joint, JointChain, JointChainBuilder, JointLimits, RotationAxis, SolveResult};
pub use machine::ClawMachine;
pub use math::Transform;
pub use spline::{HermitePath, HermiteSegment, Spline};
pub use spring::{ChainRig, Integrator, Particle, Simulation, Spring};
pub use toy::{Aabb, Toy, ToyEvent, ToyWorld, ToyWorldConfig};
