//! Error types for ass-fx core operations
//!
//! Provides the `FxError` enum shared by the script model, the karaoke
//! annotation parser, layout and the measurement boundary. Per-event
//! failures are marked recoverable so batch callers can skip the event
//! and keep going.

use core::fmt;
use thiserror::Error;

/// Main error type for ass-fx operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FxError {
    /// Karaoke annotation could not be parsed
    #[error("Invalid karaoke marker '{marker}': {reason}")]
    Annotation {
        /// Offending marker block as written in the event text
        marker: String,
        /// Why the marker was rejected
        reason: String,
    },

    /// Time format parsing errors
    #[error("Invalid time {0}")]
    InvalidTime(String),

    /// Numeric value parsing errors
    #[error("Invalid numeric value {0}")]
    InvalidNumeric(String),

    /// Alignment code outside the 1-9 numpad range
    #[error("Invalid alignment code {0}, expected 1-9")]
    InvalidAlignment(i64),

    /// Neither the referenced style nor the fallback style exists
    #[error("Style '{requested}' not found and no '{fallback}' style is registered")]
    MissingStyle {
        /// Style name referenced by the event
        requested: String,
        /// Fallback style name that was tried
        fallback: String,
    },

    /// Text measurement failed (unknown font, unreadable face data)
    #[error("Measurement failed: {0}")]
    Measure(String),

    /// Script text parsing errors
    #[error("Parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number in the script text
        line: usize,
        /// Description of the problem
        message: String,
    },

    /// File I/O errors
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FxError {
    /// Create annotation error for a marker block
    pub fn annotation<T: fmt::Display>(marker: T, reason: &str) -> Self {
        Self::Annotation {
            marker: marker.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create time error from invalid format
    pub fn invalid_time<T: fmt::Display>(time: T, reason: &str) -> Self {
        Self::InvalidTime(format!("'{time}': {reason}"))
    }

    /// Create numeric error from parsing failure
    pub fn invalid_numeric<T: fmt::Display>(value: T, reason: &str) -> Self {
        Self::InvalidNumeric(format!("'{value}': {reason}"))
    }

    /// Create measurement error
    pub fn measure<T: fmt::Display>(message: T) -> Self {
        Self::Measure(message.to_string())
    }

    /// Create parse error at a script line
    pub fn parse<T: fmt::Display>(line: usize, message: T) -> Self {
        Self::Parse {
            line,
            message: message.to_string(),
        }
    }

    /// Check if error only affects a single event
    ///
    /// Recoverable errors skip the offending event in a batch; the rest
    /// abort the batch.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Annotation { .. } | Self::InvalidTime(_) | Self::InvalidNumeric(_)
        )
    }

    /// Get suggested action for this error
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Annotation { .. } => Some("Use markers like '{\\k25}' with centisecond durations"),
            Self::InvalidTime(_) => Some("Use format like '0:01:30.50' for times"),
            Self::InvalidAlignment(_) => Some("Use numpad alignment codes 1-9"),
            Self::MissingStyle { .. } => Some("Define a 'Default' style in [V4+ Styles]"),
            Self::Measure(_) => Some("Install the font or pass its directory to the measurer"),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FxError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
