//! Dialogue and comment events from the `[Events]` section

use super::Timestamp;
use crate::{
    utils::{parse_numeric, FxError},
    Result,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Standard V4+ event field order
pub const V4_PLUS_EVENT_FORMAT: [&str; 10] = [
    "Layer", "Start", "End", "Style", "Name", "MarginL", "MarginR", "MarginV", "Effect", "Text",
];

/// A timed subtitle line
///
/// `text` holds the event text as written, override blocks included.
/// `tags` is an extra override prefix used by generated events and is
/// written as `{tags}text`.
///
/// # Examples
///
/// ```rust
/// use ass_fx_core::script::Dialogue;
///
/// let mut line = Dialogue::new("karaoke");
/// line.tags = "\\fad(100,100)".into();
/// assert_eq!(
///     line.to_ass_string(),
///     "Dialogue: 0,0:00:00.00,0:00:05.00,Default,,0,0,0,,{\\fad(100,100)}karaoke"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dialogue {
    /// Layer for drawing order (higher layers drawn on top)
    pub layer: i32,
    /// Start time
    pub start: Timestamp,
    /// End time
    pub end: Timestamp,
    /// Style name reference
    pub style: String,
    /// Character name or speaker
    pub actor: String,
    /// Left margin override (0 uses the style)
    pub margin_l: i32,
    /// Right margin override (0 uses the style)
    pub margin_r: i32,
    /// Vertical margin override (0 uses the style)
    pub margin_v: i32,
    /// Effect field
    pub effect: String,
    /// Event text
    pub text: String,
    /// Override tags written in front of the text
    pub tags: String,
    /// Commented out (`Comment:` instead of `Dialogue:`)
    pub comment: bool,
}

impl Dialogue {
    /// Five second `Default` line starting at zero
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            layer: 0,
            start: Timestamp::ZERO,
            end: Timestamp::from_centis(500),
            style: "Default".to_string(),
            actor: String::new(),
            margin_l: 0,
            margin_r: 0,
            margin_v: 0,
            effect: String::new(),
            text: text.into(),
            tags: String::new(),
            comment: false,
        }
    }

    /// Build an event from a `Dialogue:`/`Comment:` line's values
    ///
    /// `values` must already be split with the text field kept whole.
    ///
    /// # Errors
    ///
    /// Returns [`FxError::Parse`] for malformed layer, margin or time fields.
    pub fn from_fields<S: AsRef<str>>(
        format: &[S],
        values: &[&str],
        line: usize,
        comment: bool,
    ) -> Result<Self> {
        let mut event = Self::new("");
        event.comment = comment;

        for (field, raw) in format.iter().zip(values) {
            let field = field.as_ref().trim();
            if field == "Text" {
                event.text = raw.trim().to_string();
                continue;
            }
            let value = raw.trim();
            match field {
                "Layer" => event.layer = field_int(value, line, field)?,
                "Start" => event.start = field_time(value, line, field)?,
                "End" => event.end = field_time(value, line, field)?,
                "Style" => event.style = value.to_string(),
                "Name" | "Actor" => event.actor = value.to_string(),
                "MarginL" => event.margin_l = field_int(value, line, field)?,
                "MarginR" => event.margin_r = field_int(value, line, field)?,
                "MarginV" => event.margin_v = field_int(value, line, field)?,
                "Effect" => event.effect = value.to_string(),
                _ => {}
            }
        }

        Ok(event)
    }

    /// Text as written to the script, with the tag prefix applied
    #[must_use]
    pub fn full_text(&self) -> String {
        if self.tags.is_empty() {
            self.text.clone()
        } else {
            format!("{{{}}}{}", self.tags, self.text)
        }
    }

    /// Event duration in milliseconds (zero when end precedes start)
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        (self.end.as_millis() - self.start.as_millis()).max(0)
    }

    /// Convert event to a V4+ `Dialogue:` or `Comment:` line
    #[must_use]
    pub fn to_ass_string(&self) -> String {
        let kind = if self.comment { "Comment" } else { "Dialogue" };
        format!(
            "{kind}: {},{},{},{},{},{},{},{},{},{}",
            self.layer,
            self.start,
            self.end,
            self.style,
            self.actor,
            self.margin_l,
            self.margin_r,
            self.margin_v,
            self.effect,
            self.full_text()
        )
    }
}

fn field_int(value: &str, line: usize, field: &str) -> Result<i32> {
    if value.is_empty() {
        return Ok(0);
    }
    parse_numeric(value).map_err(|err| FxError::parse(line, format!("{field}: {err}")))
}

fn field_time(value: &str, line: usize, field: &str) -> Result<Timestamp> {
    value
        .parse()
        .map_err(|err| FxError::parse(line, format!("{field}: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(line: &str) -> Vec<&str> {
        line.splitn(V4_PLUS_EVENT_FORMAT.len(), ',').collect()
    }

    #[test]
    fn text_keeps_commas() {
        let event = Dialogue::from_fields(
            &V4_PLUS_EVENT_FORMAT,
            &values("1,0:00:01.00,0:00:03.50,Karaoke,Mio,0,0,0,,{\\k20}Hel{\\k30}lo, world"),
            9,
            false,
        )
        .unwrap();

        assert_eq!(event.layer, 1);
        assert_eq!(event.start.as_millis(), 1000);
        assert_eq!(event.end.as_millis(), 3500);
        assert_eq!(event.style, "Karaoke");
        assert_eq!(event.actor, "Mio");
        assert_eq!(event.text, "{\\k20}Hel{\\k30}lo, world");
        assert_eq!(event.duration_ms(), 2500);
    }

    #[test]
    fn bad_time_reports_line() {
        let err = Dialogue::from_fields(
            &V4_PLUS_EVENT_FORMAT,
            &values("0,soon,0:00:03.50,Default,,0,0,0,,x"),
            5,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, FxError::Parse { line: 5, .. }));
    }

    #[test]
    fn comment_lines_write_as_comment() {
        let mut event = Dialogue::new("### Original Karaoke ###");
        event.comment = true;
        assert!(event.to_ass_string().starts_with("Comment: 0,"));
    }

    #[test]
    fn negative_span_has_zero_duration() {
        let event = Dialogue {
            start: Timestamp::from_centis(300),
            end: Timestamp::from_centis(100),
            ..Dialogue::new("x")
        };
        assert_eq!(event.duration_ms(), 0);
    }
}
