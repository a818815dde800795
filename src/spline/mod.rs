//! Parametric curve module
//!
//! Cubic Hermite segments, multi-segment paths with arc-length-weighted
//! parameterization, and a point+tangent spline with a precomputed arc-length
//! table for near-constant-speed traversal.

mod hermite;
mod path;
mod spline;

pub use hermite::{hermite_basis, hermite_basis_derivative, HermiteSegment};
pub use path::HermitePath;
pub use spline::{catmull_rom_tangents, Spline};
