//! Numpad alignment decoded into horizontal and vertical components
//!
//! ASS alignment codes follow the numeric keypad: 1-3 bottom row,
//! 4-6 middle row, 7-9 top row, each row ordered left, center, right.
//! The code is decoded once when a style is read and looked up by pair
//! afterwards.

use crate::utils::FxError;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Horizontal component of an alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HAlign {
    /// Anchored at the left edge
    Left,
    /// Anchored at the horizontal center
    Center,
    /// Anchored at the right edge
    Right,
}

/// Vertical component of an alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VAlign {
    /// Anchored at the top edge
    Top,
    /// Anchored at the vertical middle
    Middle,
    /// Anchored at the bottom edge
    Bottom,
}

/// One of the nine anchor points
///
/// # Examples
///
/// ```rust
/// use ass_fx_core::layout::{Alignment, HAlign, VAlign};
///
/// let align = Alignment::from_code(2)?;
/// assert_eq!(align.horizontal, HAlign::Center);
/// assert_eq!(align.vertical, VAlign::Bottom);
/// assert_eq!(align.code(), 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Alignment {
    /// Left, center or right
    pub horizontal: HAlign,
    /// Top, middle or bottom
    pub vertical: VAlign,
}

/// Lookup table indexed by `code - 1`
const NUMPAD: [Alignment; 9] = [
    Alignment::new(HAlign::Left, VAlign::Bottom),
    Alignment::new(HAlign::Center, VAlign::Bottom),
    Alignment::new(HAlign::Right, VAlign::Bottom),
    Alignment::new(HAlign::Left, VAlign::Middle),
    Alignment::new(HAlign::Center, VAlign::Middle),
    Alignment::new(HAlign::Right, VAlign::Middle),
    Alignment::new(HAlign::Left, VAlign::Top),
    Alignment::new(HAlign::Center, VAlign::Top),
    Alignment::new(HAlign::Right, VAlign::Top),
];

impl Alignment {
    /// Bottom left (1)
    pub const BOTTOM_LEFT: Self = NUMPAD[0];
    /// Bottom center (2), the ASS default
    pub const BOTTOM_CENTER: Self = NUMPAD[1];
    /// Bottom right (3)
    pub const BOTTOM_RIGHT: Self = NUMPAD[2];
    /// Middle left (4)
    pub const MIDDLE_LEFT: Self = NUMPAD[3];
    /// Middle center (5)
    pub const MIDDLE_CENTER: Self = NUMPAD[4];
    /// Middle right (6)
    pub const MIDDLE_RIGHT: Self = NUMPAD[5];
    /// Top left (7)
    pub const TOP_LEFT: Self = NUMPAD[6];
    /// Top center (8)
    pub const TOP_CENTER: Self = NUMPAD[7];
    /// Top right (9)
    pub const TOP_RIGHT: Self = NUMPAD[8];

    /// Build an alignment from its two components
    #[must_use]
    pub const fn new(horizontal: HAlign, vertical: VAlign) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Decode a numpad alignment code
    ///
    /// # Errors
    ///
    /// Returns [`FxError::InvalidAlignment`] for codes outside 1-9.
    pub fn from_code(code: i64) -> Result<Self, FxError> {
        match code {
            1..=9 => Ok(NUMPAD[(code - 1) as usize]),
            _ => Err(FxError::InvalidAlignment(code)),
        }
    }

    /// Decode a legacy SSA v4 alignment value
    ///
    /// SSA uses 1/2/3 for left/center/right, plus 4 for "toptitle" and
    /// 8 for "midtitle".
    #[must_use]
    pub fn from_ssa_legacy(value: u8) -> Option<Self> {
        let horizontal = match value & 3 {
            1 => HAlign::Left,
            2 => HAlign::Center,
            3 => HAlign::Right,
            _ => return None,
        };
        let vertical = match value & 12 {
            0 => VAlign::Bottom,
            4 => VAlign::Top,
            8 => VAlign::Middle,
            _ => return None,
        };
        Some(Self::new(horizontal, vertical))
    }

    /// Numpad code for this alignment
    #[must_use]
    pub const fn code(self) -> u8 {
        let column = match self.horizontal {
            HAlign::Left => 1,
            HAlign::Center => 2,
            HAlign::Right => 3,
        };
        let row = match self.vertical {
            VAlign::Bottom => 0,
            VAlign::Middle => 3,
            VAlign::Top => 6,
        };
        row + column
    }

    /// True for the middle row (4, 5, 6), which stacks syllables vertically
    #[must_use]
    pub const fn is_middle_row(self) -> bool {
        matches!(self.vertical, VAlign::Middle)
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Self::BOTTOM_CENTER
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
