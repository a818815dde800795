//! Toy physics module
//!
//! Free rigid-sphere toys inside the machine: per-toy integration with
//! swept-sphere continuous collision for fast movers, play-area AABB and
//! pairwise sphere collision resolution, and the one-way collection volume
//! that removes settled toys from play.

mod aabb;
mod toy;
mod world;

pub use aabb::Aabb;
pub use toy::Toy;
pub use world::{ToyEvent, ToyWorld, ToyWorldConfig};
