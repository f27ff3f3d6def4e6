use thiserror::Error;

/// Error type for invalid operations.
///
/// The numeric accessors of the model never produce these; degenerate
/// parameter sets show up as infinities or NaN instead.
#[derive(Error, Debug)]
pub enum AutotrophError {
    #[error("Invalid value for parameter `{name}`: {value} ({reason})")]
    InvalidParameter {
        name: String,
        value: f64,
        reason: String,
    },
    #[error("Unknown parameter `{0}`")]
    UnknownParameter(String),
    #[error("Grid sweep axes must be different parameters, got `{0}` twice")]
    DuplicateSweepParameter(String),
    #[error("Unknown output quantity `{0}`")]
    UnknownQuantity(String),
    #[error("Mass-balance system is singular; no unique steady state exists")]
    SingularSystem,
    #[error("Could not parse parameter configuration: {0}")]
    Config(#[from] toml::de::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience type for `Result<T, AutotrophError>`.
pub type AutotrophResult<T> = Result<T, AutotrophError>;
