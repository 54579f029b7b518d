//! Error types for Neon Particles.

use thiserror::Error;

/// Top-level error type for Neon operations.
#[derive(Debug, Error)]
pub enum NeonError {
    /// Particle pool errors
    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Particle pool errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// A pool must hold at least one particle
    #[error("pool capacity must be greater than zero")]
    ZeroCapacity,
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The configuration text could not be parsed
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// A field holds a value the simulation cannot run with
    #[error("Invalid value for `{field}`: {reason}")]
    Invalid {
        /// Offending field name
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

/// Result type alias for Neon operations.
pub type NeonResult<T> = Result<T, NeonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_error_converts() {
        let err: NeonError = PoolError::ZeroCapacity.into();
        assert!(matches!(err, NeonError::Pool(PoolError::ZeroCapacity)));
        assert_eq!(
            err.to_string(),
            "Pool error: pool capacity must be greater than zero"
        );
    }

    #[test]
    fn test_invalid_field_message() {
        let err = ConfigError::Invalid {
            field: "capacity",
            reason: "must be positive".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for `capacity`: must be positive"
        );
    }
}
