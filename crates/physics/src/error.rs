use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("expected {expected} joint values, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("joint command {index} is not finite")]
    NonFiniteCommand { index: usize },
    #[error("invalid timestep {0}")]
    InvalidTimestep(f32),
    #[error("frame skip must be at least 1")]
    InvalidFrameSkip,
}
