//! Error types for rope construction, input and audio playback

use std::fmt;

/// Errors raised by the rope simulation
#[derive(Debug, Clone, PartialEq)]
pub enum RopeError {
    /// A coordinate or parameter was NaN or infinite
    NonFinite { name: &'static str },
    /// Rest length must be positive and finite
    InvalidLength,
    /// Canvas width and height must be positive and finite
    InvalidBounds { width: f32, height: f32 },
    /// Timestep must be finite and non-negative
    InvalidTimestep(f32),
    /// A physics parameter is outside its allowed range
    InvalidParameter { name: &'static str, value: f32 },
}

impl fmt::Display for RopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RopeError::NonFinite { name } => write!(f, "{} is not a finite number", name),
            RopeError::InvalidLength => write!(f, "rope length must be positive and finite"),
            RopeError::InvalidBounds { width, height } => {
                write!(f, "canvas bounds {}x{} must be positive and finite", width, height)
            }
            RopeError::InvalidTimestep(dt) => {
                write!(f, "timestep {} must be finite and non-negative", dt)
            }
            RopeError::InvalidParameter { name, value } => {
                write!(f, "parameter {} has invalid value {}", name, value)
            }
        }
    }
}

impl std::error::Error for RopeError {}

/// Errors raised while playing an impact sound
#[derive(Debug, Clone, PartialEq)]
pub enum AudioError {
    /// No audio backend could be created
    Unavailable,
    /// The backend refused to schedule the sound
    Playback(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::Unavailable => write!(f, "audio is unavailable"),
            AudioError::Playback(reason) => write!(f, "could not play audio: {}", reason),
        }
    }
}

impl std::error::Error for AudioError {}

/// Check that a value is finite, naming it in the error
pub(crate) fn ensure_finite(value: f32, name: &'static str) -> Result<f32, RopeError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(RopeError::NonFinite { name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_parameter() {
        let err = RopeError::NonFinite { name: "x1" };
        assert_eq!(err.to_string(), "x1 is not a finite number");

        let err = RopeError::InvalidParameter { name: "stiffness", value: -1.0 };
        assert!(err.to_string().contains("stiffness"));
    }

    #[test]
    fn test_ensure_finite() {
        assert_eq!(ensure_finite(3.5, "x"), Ok(3.5));
        assert_eq!(
            ensure_finite(f32::NAN, "y"),
            Err(RopeError::NonFinite { name: "y" })
        );
        assert!(ensure_finite(f32::INFINITY, "len").is_err());
    }
}
