use thiserror::Error;

/// Configuration problems that keep an errand scenario from starting.
///
/// These are fatal to constructing the coordinator but never panic: the
/// caller logs the error and leaves the scenario inert.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("no destination slots configured")]
    NoDestinations,
    #[error("move_speed must be positive (got {0})")]
    NonPositiveMoveSpeed(f32),
    #[error("second_interaction_timeout must be positive (got {0})")]
    NonPositiveTimeout(f32),
    #[error("arrival_epsilon must be positive (got {0})")]
    NonPositiveEpsilon(f32),
}
