//! Display timestamps in ASS `H:MM:SS.CC` form

use crate::{
    utils::{format_ass_time, parse_ass_time, FxError},
    Result,
};
use core::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Event timestamp stored in centiseconds
///
/// Decomposition works in milliseconds; conversion back rounds to the
/// nearest centisecond.
///
/// # Examples
///
/// ```rust
/// use ass_fx_core::script::Timestamp;
///
/// let ts: Timestamp = "0:00:01.50".parse()?;
/// assert_eq!(ts.as_millis(), 1500);
/// assert_eq!(Timestamp::from_millis(1504).to_string(), "0:00:01.50");
/// assert_eq!(Timestamp::from_millis(1505).to_string(), "0:00:01.51");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Timestamp(u32);

impl Timestamp {
    /// Zero timestamp
    pub const ZERO: Self = Self(0);

    /// Create from centiseconds
    #[must_use]
    pub const fn from_centis(centis: u32) -> Self {
        Self(centis)
    }

    /// Create from milliseconds, rounding to the nearest centisecond
    ///
    /// Negative input clamps to zero.
    #[must_use]
    pub fn from_millis(millis: i64) -> Self {
        if millis <= 0 {
            return Self::ZERO;
        }
        let centis = (millis + 5) / 10;
        Self(u32::try_from(centis).unwrap_or(u32::MAX))
    }

    /// Value in centiseconds
    #[must_use]
    pub const fn as_centis(self) -> u32 {
        self.0
    }

    /// Value in milliseconds
    #[must_use]
    pub fn as_millis(self) -> i64 {
        i64::from(self.0) * 10
    }
}

impl FromStr for Timestamp {
    type Err = FxError;

    fn from_str(s: &str) -> Result<Self> {
        parse_ass_time(s).map(Self)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_ass_time(self.0))
    }
}
