//! Owned ASS script model: script info, project garbage, styles and events
//!
//! This is the structured form the decomposers read from and the writer
//! serializes. Styles are shared as `Arc<Style>` so every view produced
//! from an event can point at the same resolved style.
//!
//! # Example
//!
//! ```rust
//! use ass_fx_core::script::Script;
//!
//! let script = Script::parse(
//!     "[Script Info]\nPlayResX: 640\nPlayResY: 480\n\n\
//!      [V4+ Styles]\nFormat: Name, Fontname, Fontsize\nStyle: Default,Arial,30\n\n\
//!      [Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n\
//!      Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,{\\k50}ka{\\k50}ra",
//! )?;
//! assert_eq!(script.resolution().map(|r| r.width), Some(640));
//! assert_eq!(script.dialogues().count(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod event;
mod reader;
mod style;
mod timestamp;
mod writer;

pub use event::{Dialogue, V4_PLUS_EVENT_FORMAT};
pub use style::{Style, V4_PLUS_STYLE_FORMAT};
pub use timestamp::Timestamp;

use crate::{layout::Resolution, utils::FxError, Result};
use std::{path::Path, sync::Arc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// `[Script Info]` key/value pairs in file order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScriptInfo {
    /// Key-value pairs
    pub fields: Vec<(String, String)>,
}

impl ScriptInfo {
    /// Get field value by key (case-sensitive)
    #[must_use]
    pub fn get_field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a field, replacing an existing value in place
    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Script title, defaulting to `<untitled>`
    #[must_use]
    pub fn title(&self) -> &str {
        self.get_field("Title").unwrap_or("<untitled>")
    }

    /// Original script author
    #[must_use]
    pub fn original_script(&self) -> Option<&str> {
        self.get_field("Original Script")
    }

    /// Translation credit
    #[must_use]
    pub fn translation(&self) -> Option<&str> {
        self.get_field("Translation")
    }

    /// Timing credit
    #[must_use]
    pub fn timing(&self) -> Option<&str> {
        self.get_field("Timing")
    }

    /// Play resolution when both `PlayResX` and `PlayResY` are valid and
    /// non-zero
    #[must_use]
    pub fn play_resolution(&self) -> Option<Resolution> {
        let width: u32 = self.get_field("PlayResX")?.trim().parse().ok()?;
        let height: u32 = self.get_field("PlayResY")?.trim().parse().ok()?;
        (width > 0 && height > 0).then(|| Resolution::new(width, height))
    }
}

/// `[Aegisub Project Garbage]` key/value pairs in file order
///
/// Editor state such as the loaded video and audio. Carried through
/// untouched so generated scripts reopen with the same media.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProjectGarbage {
    /// Key-value pairs
    pub fields: Vec<(String, String)>,
}

impl ProjectGarbage {
    /// Get field value by key (case-sensitive)
    #[must_use]
    pub fn get_field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a field, replacing an existing value in place
    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    /// No fields recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `Video File`
    #[must_use]
    pub fn video_file(&self) -> Option<&str> {
        self.get_field("Video File")
    }

    /// `Audio File`
    #[must_use]
    pub fn audio_file(&self) -> Option<&str> {
        self.get_field("Audio File")
    }

    /// `Video AR Value`
    #[must_use]
    pub fn video_aspect_ratio(&self) -> Option<f64> {
        self.get_field("Video AR Value")?.trim().parse().ok()
    }

    /// `Video Zoom Percent`
    #[must_use]
    pub fn video_zoom(&self) -> Option<f64> {
        self.get_field("Video Zoom Percent")?.trim().parse().ok()
    }

    /// `Video Position`, the frame the editor was parked on
    #[must_use]
    pub fn video_position(&self) -> Option<u64> {
        self.get_field("Video Position")?.trim().parse().ok()
    }
}

/// A complete script
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Script {
    /// `[Script Info]` section
    pub info: ScriptInfo,
    /// `[Aegisub Project Garbage]` section
    #[cfg_attr(feature = "serde", serde(default))]
    pub project: ProjectGarbage,
    /// Styles in definition order
    pub styles: Vec<Arc<Style>>,
    /// Events in file order, comments included
    pub events: Vec<Dialogue>,
}

impl Script {
    /// Empty script
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse a script file
    ///
    /// # Errors
    ///
    /// Returns [`FxError::Io`] when the file cannot be read, or any error
    /// from [`Script::parse`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|err| FxError::Io(format!("{}: {err}", path.display())))?;
        Self::parse(&source)
    }

    /// Script canvas from `PlayResX`/`PlayResY`
    #[must_use]
    pub fn resolution(&self) -> Option<Resolution> {
        self.info.play_resolution()
    }

    /// Set `PlayResX`/`PlayResY`
    pub fn set_resolution(&mut self, resolution: Resolution) {
        self.info.set_field("PlayResX", resolution.width.to_string());
        self.info.set_field("PlayResY", resolution.height.to_string());
    }

    /// Style registered under `name`
    #[must_use]
    pub fn style(&self, name: &str) -> Option<&Arc<Style>> {
        self.styles.iter().find(|style| style.name == name)
    }

    /// Style for an event reference, falling back to `fallback`
    ///
    /// # Errors
    ///
    /// Returns [`FxError::MissingStyle`] when neither style exists.
    pub fn resolve_style(&self, name: &str, fallback: &str) -> Result<Arc<Style>> {
        if let Some(style) = self.style(name) {
            return Ok(Arc::clone(style));
        }
        let style = self.style(fallback).ok_or_else(|| FxError::MissingStyle {
            requested: name.to_string(),
            fallback: fallback.to_string(),
        })?;
        log::debug!("style '{name}' not found, using '{fallback}'");
        Ok(Arc::clone(style))
    }

    /// Register a style unless one with the same name exists
    ///
    /// Returns `true` when the style was added.
    pub fn add_style(&mut self, style: impl Into<Arc<Style>>) -> bool {
        let style = style.into();
        if self.style(&style.name).is_some() {
            return false;
        }
        self.styles.push(style);
        true
    }

    /// Append an event
    pub fn add_event(&mut self, event: Dialogue) {
        self.events.push(event);
    }

    /// Events that are not commented out
    pub fn dialogues(&self) -> impl Iterator<Item = &Dialogue> {
        self.events.iter().filter(|event| !event.comment)
    }

    /// Commented-out events
    pub fn comments(&self) -> impl Iterator<Item = &Dialogue> {
        self.events.iter().filter(|event| event.comment)
    }
}
