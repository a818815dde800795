use thiserror::Error;

/// Errors surfaced by simulator configuration and stepping.
///
/// Only incomplete setup is an error: numerical-instability guards and
/// degenerate geometry are recovered in place so the simulation keeps running
/// every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("particle slot {0} was never configured")]
    ParticleNotConfigured(usize),

    #[error("spring slot {0} was never configured")]
    SpringNotConfigured(usize),

    #[error("particle index {index} out of range ({count} particles)")]
    ParticleIndexOutOfRange { index: usize, count: usize },

    #[error("spring index {index} out of range ({count} springs)")]
    SpringIndexOutOfRange { index: usize, count: usize },
}
