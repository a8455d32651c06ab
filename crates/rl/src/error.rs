use physics::PhysicsError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvError {
    #[error("environment must be reset before stepping")]
    NeedsReset,
    #[error("environment has been closed")]
    Closed,
    #[error("action has {got} values, expected {expected}")]
    InvalidAction { expected: usize, got: usize },
    #[error("physics error: {0}")]
    Physics(#[from] PhysicsError),
}
