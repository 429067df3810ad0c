//! Typed style definitions from the `[V4+ Styles]` section

use crate::{
    layout::Alignment,
    utils::{parse_numeric, FxError},
    Result,
};
use core::fmt::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Standard V4+ style field order
pub const V4_PLUS_STYLE_FORMAT: [&str; 23] = [
    "Name",
    "Fontname",
    "Fontsize",
    "PrimaryColour",
    "SecondaryColour",
    "OutlineColour",
    "BackColour",
    "Bold",
    "Italic",
    "Underline",
    "StrikeOut",
    "ScaleX",
    "ScaleY",
    "Spacing",
    "Angle",
    "BorderStyle",
    "Outline",
    "Shadow",
    "Alignment",
    "MarginL",
    "MarginR",
    "MarginV",
    "Encoding",
];

/// Resolved style
///
/// Numeric fields are parsed once when the script is read; colours stay in
/// their `&HAABBGGRR` text form since layout never looks at them.
///
/// # Examples
///
/// ```rust
/// use ass_fx_core::script::Style;
///
/// let style = Style {
///     fontname: "Noto Sans".into(),
///     fontsize: 48.0,
///     ..Style::new("Karaoke")
/// };
/// assert!(style.to_ass_string().starts_with("Style: Karaoke,Noto Sans,48,"));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Style {
    /// Style name (unique within a script)
    pub name: String,
    /// Font family name
    pub fontname: String,
    /// Font size in script pixels
    pub fontsize: f64,
    /// Primary fill colour
    pub primary_colour: String,
    /// Secondary colour, swept by karaoke
    pub secondary_colour: String,
    /// Outline colour
    pub outline_colour: String,
    /// Shadow/background colour
    pub back_colour: String,
    /// Bold flag
    pub bold: bool,
    /// Italic flag
    pub italic: bool,
    /// Underline flag
    pub underline: bool,
    /// Strikeout flag
    pub strikeout: bool,
    /// Horizontal scale percentage
    pub scale_x: f64,
    /// Vertical scale percentage
    pub scale_y: f64,
    /// Extra spacing in pixels
    pub spacing: f64,
    /// Rotation in degrees
    pub angle: f64,
    /// 1 = outline and shadow, 3 = opaque box
    pub border_style: u8,
    /// Outline width in pixels
    pub outline: f64,
    /// Shadow depth in pixels
    pub shadow: f64,
    /// Numpad alignment
    pub alignment: Alignment,
    /// Left margin in pixels
    pub margin_l: i32,
    /// Right margin in pixels
    pub margin_r: i32,
    /// Vertical margin in pixels
    pub margin_v: i32,
    /// Font encoding identifier
    pub encoding: i32,
}

impl Style {
    /// Create a style with generator defaults
    ///
    /// Arial 35, white fill, blue karaoke colour, 2px outline,
    /// bottom-center, margins 10/20/10.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fontname: "Arial".to_string(),
            fontsize: 35.0,
            primary_colour: "&H00FFFFFF".to_string(),
            secondary_colour: "&H000000FF".to_string(),
            outline_colour: "&H00000000".to_string(),
            back_colour: "&H00000000".to_string(),
            bold: false,
            italic: false,
            underline: false,
            strikeout: false,
            scale_x: 100.0,
            scale_y: 100.0,
            spacing: 0.0,
            angle: 0.0,
            border_style: 1,
            outline: 2.0,
            shadow: 0.0,
            alignment: Alignment::BOTTOM_CENTER,
            margin_l: 10,
            margin_r: 20,
            margin_v: 10,
            encoding: 1,
        }
    }

    /// Build a style from a `Style:` line's values under a `Format:` mapping
    ///
    /// Fields missing from the format keep their [`Style::new`] defaults.
    /// `legacy` selects SSA v4 alignment values instead of numpad codes.
    ///
    /// # Errors
    ///
    /// Returns [`FxError::Parse`] for malformed numeric fields and
    /// [`FxError::InvalidAlignment`] for alignment codes outside 1-9.
    pub fn from_fields<S: AsRef<str>>(
        format: &[S],
        values: &[&str],
        line: usize,
        legacy: bool,
    ) -> Result<Self> {
        let mut style = Self::new("");

        for (field, raw) in format.iter().zip(values) {
            let value = raw.trim();
            match field.as_ref().trim() {
                "Name" => style.name = value.to_string(),
                "Fontname" => style.fontname = value.to_string(),
                "Fontsize" => style.fontsize = field_number(value, line, "Fontsize")?,
                "PrimaryColour" => style.primary_colour = value.to_string(),
                "SecondaryColour" => style.secondary_colour = value.to_string(),
                "OutlineColour" | "TertiaryColour" => style.outline_colour = value.to_string(),
                "BackColour" => style.back_colour = value.to_string(),
                "Bold" => style.bold = field_flag(value, line, "Bold")?,
                "Italic" => style.italic = field_flag(value, line, "Italic")?,
                "Underline" => style.underline = field_flag(value, line, "Underline")?,
                "StrikeOut" | "Strikeout" => {
                    style.strikeout = field_flag(value, line, "StrikeOut")?;
                }
                "ScaleX" => style.scale_x = field_number(value, line, "ScaleX")?,
                "ScaleY" => style.scale_y = field_number(value, line, "ScaleY")?,
                "Spacing" => style.spacing = field_number(value, line, "Spacing")?,
                "Angle" => style.angle = field_number(value, line, "Angle")?,
                "BorderStyle" => style.border_style = field_number(value, line, "BorderStyle")?,
                "Outline" => style.outline = field_number(value, line, "Outline")?,
                "Shadow" => style.shadow = field_number(value, line, "Shadow")?,
                "Alignment" => {
                    let code: i64 = field_number(value, line, "Alignment")?;
                    style.alignment = if legacy {
                        u8::try_from(code)
                            .ok()
                            .and_then(Alignment::from_ssa_legacy)
                            .ok_or(FxError::InvalidAlignment(code))?
                    } else {
                        Alignment::from_code(code)?
                    };
                }
                "MarginL" => style.margin_l = field_number(value, line, "MarginL")?,
                "MarginR" => style.margin_r = field_number(value, line, "MarginR")?,
                "MarginV" => style.margin_v = field_number(value, line, "MarginV")?,
                "Encoding" => style.encoding = field_number(value, line, "Encoding")?,
                _ => {}
            }
        }

        if style.name.is_empty() {
            return Err(FxError::parse(line, "style has no name"));
        }
        Ok(style)
    }

    /// Convert style to a V4+ `Style:` line
    #[must_use]
    pub fn to_ass_string(&self) -> String {
        format!(
            "Style: {},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            self.name,
            self.fontname,
            self.fontsize,
            self.primary_colour,
            self.secondary_colour,
            self.outline_colour,
            self.back_colour,
            ass_flag(self.bold),
            ass_flag(self.italic),
            ass_flag(self.underline),
            ass_flag(self.strikeout),
            self.scale_x,
            self.scale_y,
            self.spacing,
            self.angle,
            self.border_style,
            self.outline,
            self.shadow,
            self.alignment.code(),
            self.margin_l,
            self.margin_r,
            self.margin_v,
            self.encoding
        )
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::new("Default")
    }
}

fn field_number<T>(value: &str, line: usize, field: &str) -> Result<T>
where
    T: core::str::FromStr,
    T::Err: Display,
{
    parse_numeric(value).map_err(|err| FxError::parse(line, format!("{field}: {err}")))
}

/// ASS booleans are `-1`/`0`, but any non-zero value (or a font weight)
/// means "on"
fn field_flag(value: &str, line: usize, field: &str) -> Result<bool> {
    field_number::<i32>(value, line, field).map(|v| v != 0)
}

const fn ass_flag(value: bool) -> i8 {
    if value {
        -1
    } else {
        0
    }
}
