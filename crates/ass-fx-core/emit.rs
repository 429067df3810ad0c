//! Re-emission of views as new events
//!
//! Any view can become a fresh [`Dialogue`] carrying the source event's
//! layer, style name, actor, effect and comment flag, its own timing
//! window and a caller-supplied override tag string.
//!
//! # Example
//!
//! ```rust
//! use ass_fx_core::{
//!     decompose::Decomposer, emit::Emit, measure::FixedAdvanceMeasurer,
//!     script::{Dialogue, Style}, Resolution,
//! };
//! use std::sync::Arc;
//!
//! let measurer = FixedAdvanceMeasurer::default();
//! let result = Decomposer::new(&measurer, Resolution::new(1280, 720))
//!     .decompose(&Dialogue::new("{\\k20}Hel{\\k30}lo"), Arc::new(Style::default()))?;
//!
//! let event = result.syllables[0].emit("{\\fad(0,100)}");
//! assert_eq!(event.text, "Hel");
//! assert_eq!(event.tags, "\\fad(0,100)");
//! assert_eq!(event.end.to_string(), "0:00:00.20");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::{
    decompose::{CharacterView, EventMeta, LineView, SyllableView, TimeSpan},
    script::{Dialogue, Timestamp},
};

/// Views that can be written back as events
pub trait Emit {
    /// Source event metadata
    fn meta(&self) -> &EventMeta;

    /// Timing window in milliseconds
    fn time(&self) -> TimeSpan;

    /// Rendered text
    fn text(&self) -> &str;

    /// New event with the view's text behind `tags`
    fn emit(&self, tags: &str) -> Dialogue {
        build(self.meta(), self.time(), self.text(), tags)
    }

    /// New event with only `tags` and no text, for positional markers
    fn emit_marker(&self, tags: &str) -> Dialogue {
        build(self.meta(), self.time(), "", tags)
    }
}

/// Tag string without one surrounding brace pair
#[must_use]
pub fn normalize_tags(tags: &str) -> &str {
    let tags = tags.trim();
    tags.strip_prefix('{')
        .and_then(|inner| inner.strip_suffix('}'))
        .unwrap_or(tags)
}

fn build(meta: &EventMeta, time: TimeSpan, text: &str, tags: &str) -> Dialogue {
    Dialogue {
        layer: meta.layer,
        start: Timestamp::from_millis(time.start),
        end: Timestamp::from_millis(time.end),
        style: meta.style_name.clone(),
        actor: meta.actor.clone(),
        effect: meta.effect.clone(),
        text: text.to_string(),
        tags: normalize_tags(tags).to_string(),
        comment: meta.comment,
        ..Dialogue::new("")
    }
}

macro_rules! impl_emit {
    ($($view:ty),+) => {
        $(impl Emit for $view {
            fn meta(&self) -> &EventMeta {
                &self.meta
            }

            fn time(&self) -> TimeSpan {
                self.time
            }

            fn text(&self) -> &str {
                &self.text
            }
        })+
    };
}

impl_emit!(LineView, SyllableView, CharacterView);
