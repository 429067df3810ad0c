//! Line layout: measured extent and the nine anchor coordinates
//!
//! Places a line of plain text on the script canvas the way VSFilter and
//! libass do for unpositioned events: the style's margins and alignment
//! decide the top-left corner of the text box, and every other anchor is
//! derived from that box.
//!
//! # Example
//!
//! ```rust
//! use ass_fx_core::layout::{resolve_line, Resolution};
//! use ass_fx_core::measure::FixedAdvanceMeasurer;
//! use ass_fx_core::script::Style;
//!
//! let style = Style::new("Default");
//! let measurer = FixedAdvanceMeasurer::new(0.5);
//! let layout = resolve_line("Hello", &style, Resolution::new(1280, 720), &measurer)?;
//! assert_eq!(layout.active.x, 640.0 - layout.width / 2.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod alignment;
pub mod anchors;

pub use alignment::{Alignment, HAlign, VAlign};
pub use anchors::{Anchors, Point};

use crate::{
    measure::{FontSpec, TextExtent, TextMeasurer},
    script::Style,
    utils::FxError,
    Result,
};
use core::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Script canvas size in pixels (`PlayResX` x `PlayResY`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Resolution {
    /// Canvas width
    pub width: u32,
    /// Canvas height
    pub height: u32,
}

impl Resolution {
    /// Fallback canvas when neither the script nor the caller sets one
    pub const FALLBACK: Self = Self::new(1280, 720);

    /// Create a resolution
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width as a float for layout math
    #[must_use]
    pub fn width_f64(self) -> f64 {
        f64::from(self.width)
    }

    /// Height as a float for layout math
    #[must_use]
    pub fn height_f64(self) -> f64 {
        f64::from(self.height)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = FxError;

    /// Parse `WIDTHxHEIGHT`, e.g. `1920x1080`
    fn from_str(s: &str) -> Result<Self> {
        let (width, height) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| FxError::Config(format!("resolution '{s}' must look like 1280x720")))?;
        let width: u32 = crate::utils::parse_numeric(width)?;
        let height: u32 = crate::utils::parse_numeric(height)?;
        if width == 0 || height == 0 {
            return Err(FxError::Config(format!("resolution '{s}' must be non-zero")));
        }
        Ok(Self::new(width, height))
    }
}

/// Geometry of one unpositioned line
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LineLayout {
    /// Measured width after horizontal scaling
    pub width: f64,
    /// Measured height after vertical scaling
    pub height: f64,
    /// Box origin under each alignment rule (margins and canvas only)
    pub placement: Anchors,
    /// Placement coordinate selected by the style's alignment
    pub active: Point,
    /// Edges of the box placed at the active anchor
    pub bounds: Anchors,
    /// Alignment point of the placed box, usable with `\an` + `\pos`
    pub pos: Point,
}

/// Measure text with the style's font and apply its scale percentages
///
/// # Errors
///
/// Propagates measurement failures.
pub fn measure_scaled<M: TextMeasurer + ?Sized>(
    measurer: &M,
    font: &FontSpec,
    style: &Style,
    text: &str,
) -> Result<TextExtent> {
    let extent = measurer.measure(font, text)?;
    Ok(TextExtent {
        width: extent.width * style.scale_x / 100.0,
        height: extent.height * style.scale_y / 100.0,
    })
}

/// Horizontal and vertical placement coordinates for a box of this size
#[must_use]
pub fn placement_grid(style: &Style, resolution: Resolution, width: f64, height: f64) -> Anchors {
    let canvas_w = resolution.width_f64();
    let canvas_h = resolution.height_f64();
    let margin_v = f64::from(style.margin_v);

    Anchors {
        left: f64::from(style.margin_l),
        center: canvas_w / 2.0 - width / 2.0,
        right: canvas_w - f64::from(style.margin_r) - width,
        top: margin_v,
        middle: canvas_h / 2.0 - height / 2.0,
        bottom: canvas_h - margin_v - height,
    }
}

/// Resolve the layout of a line's plain text
///
/// # Errors
///
/// Returns [`FxError::Measure`] when the measurer cannot handle the font.
pub fn resolve_line<M: TextMeasurer + ?Sized>(
    text: &str,
    style: &Style,
    resolution: Resolution,
    measurer: &M,
) -> Result<LineLayout> {
    let font = FontSpec::from_style(style);
    let extent = measure_scaled(measurer, &font, style, text)?;

    let placement = placement_grid(style, resolution, extent.width, extent.height);
    let active = placement.point(style.alignment);
    let bounds = Anchors::from_box(active.x, active.y, extent.width, extent.height);

    Ok(LineLayout {
        width: extent.width,
        height: extent.height,
        placement,
        active,
        bounds,
        pos: bounds.point(style.alignment),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::FixedAdvanceMeasurer;

    fn style_with(alignment: Alignment) -> Style {
        Style {
            fontsize: 40.0,
            alignment,
            margin_l: 10,
            margin_r: 20,
            margin_v: 30,
            ..Style::new("Test")
        }
    }

    #[test]
    fn bottom_center_active_anchor() {
        // 10 glyphs at 0.25 * 40px = 100px wide
        let measurer = FixedAdvanceMeasurer::new(0.25);
        let style = style_with(Alignment::BOTTOM_CENTER);
        let layout = resolve_line("abcdefghij", &style, Resolution::new(1280, 720), &measurer)
            .unwrap();

        assert_eq!(layout.width, 100.0);
        assert_eq!(layout.active.x, 590.0);
        assert_eq!(layout.active.y, 720.0 - 30.0 - 40.0);
        assert_eq!(layout.pos, Point::new(640.0, 690.0));
    }

    #[test]
    fn placement_rules_per_axis() {
        let measurer = FixedAdvanceMeasurer::new(0.25);
        let style = style_with(Alignment::TOP_RIGHT);
        let layout = resolve_line("abcdefghij", &style, Resolution::new(1280, 720), &measurer)
            .unwrap();

        assert_eq!(layout.placement.left, 10.0);
        assert_eq!(layout.placement.right, 1280.0 - 20.0 - 100.0);
        assert_eq!(layout.placement.top, 30.0);
        assert_eq!(layout.placement.middle, 360.0 - 20.0);
        assert_eq!(layout.active, Point::new(1160.0, 30.0));
        assert_eq!(layout.bounds.right, 1260.0);
        assert_eq!(layout.pos, Point::new(1260.0, 30.0));
    }

    #[test]
    fn scale_applies_to_both_axes() {
        let measurer = FixedAdvanceMeasurer::new(0.25);
        let style = Style {
            scale_x: 200.0,
            scale_y: 50.0,
            ..style_with(Alignment::MIDDLE_LEFT)
        };
        let layout = resolve_line("abcd", &style, Resolution::new(640, 480), &measurer).unwrap();
        assert_eq!(layout.width, 80.0);
        assert_eq!(layout.height, 20.0);
        assert_eq!(layout.active, Point::new(10.0, 230.0));
    }

    #[test]
    fn resolution_parsing() {
        assert_eq!("1920x1080".parse::<Resolution>().unwrap(), Resolution::new(1920, 1080));
        assert_eq!(" 640X480 ".parse::<Resolution>().unwrap(), Resolution::new(640, 480));
        assert!("1920".parse::<Resolution>().is_err());
        assert!("0x720".parse::<Resolution>().is_err());
        assert_eq!(Resolution::FALLBACK.to_string(), "1280x720");
    }
}
