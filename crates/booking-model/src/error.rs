use thiserror::Error;

/// Errors raised when building or validating model values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid year range: {start} is after {end}")]
    InvertedYearRange { start: i32, end: i32 },

    #[error("year range {start}-{end} is outside the observed years {min}-{max}")]
    YearsOutOfBounds {
        start: i32,
        end: i32,
        min: i32,
        max: i32,
    },

    #[error("invalid option {name}: {message}")]
    InvalidOption { name: &'static str, message: String },
}

impl ModelError {
    pub(crate) fn option(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            name,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
