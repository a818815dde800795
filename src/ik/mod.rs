//! Inverse kinematics module
//!
//! Single-axis revolute joint chains with angle limits, posed by an
//! iterative damped heuristic solver.

mod chain;
mod joint;
mod solver;

pub use chain::{JointChain, JointChainBuilder};
pub use joint::{Joint, JointLimits, RotationAxis};
pub use solver::{IkSolver, SolveResult};
