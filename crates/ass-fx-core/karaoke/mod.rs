//! Karaoke annotation parser
//!
//! Splits event text at `\k`, `\kf`/`\K` and `\ko` duration markers into
//! syllable descriptors. Text after a marker up to the next marker belongs
//! to that syllable; text before the first marker belongs to none.
//! Non-karaoke override blocks are removed from syllable text, and a
//! `\-name` tag (or `\k20-name`) records an inline effect name for the
//! syllables started in that block.
//!
//! # Example
//!
//! ```rust
//! use ass_fx_core::karaoke::{parse_syllables, KaraokeMode};
//!
//! let syllables = parse_syllables("{\\k20}Hel{\\kf30\\-glow}lo")?;
//! assert_eq!(syllables.len(), 2);
//! assert_eq!(syllables[0].text, "Hel");
//! assert_eq!(syllables[1].mode, KaraokeMode::Fill);
//! assert_eq!(syllables[1].inline, "glow");
//! assert_eq!(syllables[1].duration_ms(), 300);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::{utils::FxError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One tag inside an override block, without its leading backslash
static KARAOKE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<mode>kf|ko|kt|k|K)(?P<duration>[^-]*)(?:-(?P<inline>.*))?$")
        .expect("karaoke tag pattern is valid")
});

/// Rendering hint carried by a duration marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum KaraokeMode {
    /// `\k`: instant highlight
    #[default]
    Plain,
    /// `\kf` or `\K`: left-to-right fill
    Fill,
    /// `\ko`: outline highlight
    Outline,
}

impl KaraokeMode {
    /// Tag name as written in a marker
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Plain => "k",
            Self::Fill => "kf",
            Self::Outline => "ko",
        }
    }
}

/// One syllable as annotated in the event text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SyllableDescriptor {
    /// Marker kind
    pub mode: KaraokeMode,
    /// Duration in centiseconds
    pub duration_cs: u32,
    /// Inline effect name, empty when absent
    pub inline: String,
    /// Syllable text with override blocks removed, whitespace kept
    pub text: String,
}

impl SyllableDescriptor {
    /// Duration in milliseconds
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        i64::from(self.duration_cs) * 10
    }
}

enum Tag<'a> {
    Marker {
        mode: KaraokeMode,
        duration_cs: u32,
        inline: Option<&'a str>,
    },
    Inline(&'a str),
    Other,
}

fn classify<'a>(tag: &'a str, block: &str) -> Result<Tag<'a>> {
    if let Some(name) = tag.strip_prefix('-') {
        return Ok(Tag::Inline(name.trim()));
    }
    let Some(caps) = KARAOKE_TAG.captures(tag) else {
        return Ok(Tag::Other);
    };

    let mode = match &caps["mode"] {
        "k" => KaraokeMode::Plain,
        "kf" | "K" => KaraokeMode::Fill,
        "ko" => KaraokeMode::Outline,
        _ => return Ok(Tag::Other),
    };

    let duration = caps["duration"].trim();
    if duration.is_empty() {
        return Err(FxError::annotation(block, "missing duration"));
    }
    let duration_cs = duration
        .parse::<u32>()
        .map_err(|_| FxError::annotation(block, "duration is not a non-negative integer"))?;

    Ok(Tag::Marker {
        mode,
        duration_cs,
        inline: caps.name("inline").map(|m| m.as_str().trim()),
    })
}

/// Parse the karaoke syllables of an event's text
///
/// A text with no markers yields an empty list.
///
/// # Errors
///
/// Returns [`FxError::Annotation`] when a marker has a missing or
/// non-numeric duration.
pub fn parse_syllables(text: &str) -> Result<Vec<SyllableDescriptor>> {
    let mut syllables: Vec<SyllableDescriptor> = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let Some(open) = rest.find('{') else {
            push_text(&mut syllables, rest);
            break;
        };
        push_text(&mut syllables, &rest[..open]);

        let Some(close) = rest[open..].find('}').map(|i| open + i) else {
            // Unclosed block is plain text
            push_text(&mut syllables, &rest[open..]);
            break;
        };

        let block = &rest[open..=close];
        let first_new = syllables.len();
        let mut block_inline = None;

        for tag in rest[open + 1..close].split('\\').map(str::trim) {
            if tag.is_empty() {
                continue;
            }
            match classify(tag, block)? {
                Tag::Marker {
                    mode,
                    duration_cs,
                    inline,
                } => syllables.push(SyllableDescriptor {
                    mode,
                    duration_cs,
                    inline: inline.unwrap_or_default().to_string(),
                    text: String::new(),
                }),
                Tag::Inline(name) => block_inline = Some(name),
                Tag::Other => {}
            }
        }

        if let Some(name) = block_inline {
            for syllable in &mut syllables[first_new..] {
                if syllable.inline.is_empty() {
                    syllable.inline = name.to_string();
                }
            }
        }

        rest = &rest[close + 1..];
    }

    Ok(syllables)
}

fn push_text(syllables: &mut [SyllableDescriptor], text: &str) {
    if let Some(current) = syllables.last_mut() {
        current.text.push_str(text);
    }
}

/// True when the text carries at least one duration marker
#[must_use]
pub fn has_karaoke(text: &str) -> bool {
    parse_syllables(text).is_ok_and(|syllables| !syllables.is_empty())
}

/// Plain text of an event: override blocks removed, outer ASCII spaces
/// trimmed
///
/// An unclosed `{` is kept as literal text.
#[must_use]
pub fn strip_override_blocks(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        match rest[open..].find('}') {
            Some(close) => rest = &rest[open + close + 1..],
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);

    out.trim_matches(' ').to_string()
}
