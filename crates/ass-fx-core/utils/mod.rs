//! Utility functions shared by the script model, parser and decomposers
//!
//! Contains ASS time conversion, numeric field parsing and the whitespace
//! helpers that keep layout-only spacing out of syllable text.
//!
//! # Example
//!
//! ```rust
//! use ass_fx_core::utils::{format_ass_time, parse_ass_time};
//!
//! let cs = parse_ass_time("0:01:30.50")?;
//! assert_eq!(cs, 9050);
//! assert_eq!(format_ass_time(cs), "0:01:30.50");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod errors;

pub use errors::FxError;

use core::fmt;
use unicode_segmentation::UnicodeSegmentation;

/// Parse ASS time format (H:MM:SS.CC) to centiseconds
///
/// Accepts one or two fractional digits. Hours are unbounded; minutes and
/// seconds must be below 60.
///
/// # Errors
///
/// Returns [`FxError::InvalidTime`] if the time format is invalid.
pub fn parse_ass_time(time_str: &str) -> Result<u32, FxError> {
    let time_str = time_str.trim();
    let parts: Vec<&str> = time_str.split(':').collect();
    if parts.len() != 3 {
        return Err(FxError::invalid_time(time_str, "expected H:MM:SS.CC"));
    }

    let hours: u32 = parts[0]
        .parse()
        .map_err(|_| FxError::invalid_time(time_str, "invalid hours"))?;
    let minutes: u32 = parts[1]
        .parse()
        .map_err(|_| FxError::invalid_time(time_str, "invalid minutes"))?;

    let (seconds_part, frac_part) = match parts[2].split_once('.') {
        Some((secs, frac)) => (secs, Some(frac)),
        None => (parts[2], None),
    };
    let seconds: u32 = seconds_part
        .parse()
        .map_err(|_| FxError::invalid_time(time_str, "invalid seconds"))?;

    let centiseconds = match frac_part {
        None => 0,
        Some(frac) => {
            let value: u32 = frac
                .parse()
                .map_err(|_| FxError::invalid_time(time_str, "invalid centiseconds"))?;
            match frac.len() {
                1 => value * 10,
                2 => value,
                _ => return Err(FxError::invalid_time(time_str, "too many decimal places")),
            }
        }
    };

    if minutes >= 60 {
        return Err(FxError::invalid_time(time_str, "minutes must be < 60"));
    }
    if seconds >= 60 {
        return Err(FxError::invalid_time(time_str, "seconds must be < 60"));
    }

    hours
        .checked_mul(360_000)
        .and_then(|cs| cs.checked_add(minutes * 6_000 + seconds * 100 + centiseconds))
        .ok_or_else(|| FxError::invalid_time(time_str, "hours out of range"))
}

/// Format centiseconds back to ASS time format
#[must_use]
pub fn format_ass_time(centiseconds: u32) -> String {
    let hours = centiseconds / 360_000;
    let remainder = centiseconds % 360_000;
    let minutes = remainder / 6000;
    let remainder = remainder % 6000;
    let seconds = remainder / 100;
    let cs = remainder % 100;

    format!("{hours}:{minutes:02}:{seconds:02}.{cs:02}")
}

/// Parse numeric value from ASS field with validation
///
/// # Errors
///
/// Returns [`FxError::InvalidNumeric`] if the field cannot be parsed.
pub fn parse_numeric<T>(value_str: &str) -> Result<T, FxError>
where
    T: core::str::FromStr,
    T::Err: fmt::Display,
{
    value_str
        .trim()
        .parse()
        .map_err(|e: T::Err| FxError::invalid_numeric(value_str, &e.to_string()))
}

/// Text with its surrounding ASCII spaces counted and removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimmedText<'a> {
    /// Text without leading and trailing spaces
    pub text: &'a str,
    /// Number of spaces removed from the front
    pub leading: usize,
    /// Number of spaces removed from the back
    pub trailing: usize,
}

impl TrimmedText<'_> {
    /// True when nothing visible is left after trimming
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

/// Trim U+0020 spaces and count what was removed on each side
///
/// Only the ASCII space is trimmed: the cursor advances by the width of
/// `" "` per counted space, so any other whitespace (ideographic space,
/// tabs) stays in the text and is measured with it. Space-only input
/// reports every space as leading.
#[must_use]
pub fn trim_space_count(text: &str) -> TrimmedText<'_> {
    let start = text.trim_start_matches(' ');
    let leading = text.len() - start.len();
    let trimmed = start.trim_end_matches(' ');
    let trailing = start.len() - trimmed.len();

    TrimmedText {
        text: trimmed,
        leading,
        trailing,
    }
}

/// Split text into user-perceived characters
#[must_use]
pub fn graphemes(text: &str) -> Vec<&str> {
    text.graphemes(true).collect()
}

/// Count user-perceived characters
#[must_use]
pub fn grapheme_count(text: &str) -> usize {
    text.graphemes(true).count()
}
