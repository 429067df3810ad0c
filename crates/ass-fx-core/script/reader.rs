//! Line-oriented script reader
//!
//! Handles `[Script Info]`, `[Aegisub Project Garbage]`, `[V4+ Styles]`,
//! legacy `[V4 Styles]` and `[Events]`. Other sections (fonts, graphics)
//! are skipped. `Format:` lines remap field order; without one the standard
//! V4+ order is assumed.

use super::{Dialogue, Script, Style, V4_PLUS_EVENT_FORMAT, V4_PLUS_STYLE_FORMAT};
use crate::Result;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Info,
    Project,
    Styles { legacy: bool },
    Events,
    Other,
}

impl Section {
    fn from_header(header: &str) -> Self {
        match header.trim().to_ascii_lowercase().as_str() {
            "script info" => Self::Info,
            "aegisub project garbage" => Self::Project,
            "v4+ styles" => Self::Styles { legacy: false },
            "v4 styles" => Self::Styles { legacy: true },
            "events" => Self::Events,
            _ => Self::Other,
        }
    }
}

struct Reader {
    script: Script,
    section: Option<Section>,
    style_format: Vec<String>,
    event_format: Vec<String>,
}

impl Reader {
    fn new() -> Self {
        Self {
            script: Script::new(),
            section: None,
            style_format: default_format(&V4_PLUS_STYLE_FORMAT),
            event_format: default_format(&V4_PLUS_EVENT_FORMAT),
        }
    }

    fn line(&mut self, number: usize, raw: &str) -> Result<()> {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with("!:") {
            return Ok(());
        }

        if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            self.section = Some(Section::from_header(header));
            return Ok(());
        }

        let Some((key, value)) = line.split_once(':') else {
            return Ok(());
        };
        let key = key.trim();
        let value = value.trim_start();

        match self.section {
            Some(Section::Info) => self.script.info.set_field(key, value.trim_end()),
            Some(Section::Project) => self.script.project.set_field(key, value.trim_end()),
            Some(Section::Styles { legacy }) => match key {
                "Format" => self.style_format = parse_format(value),
                "Style" => {
                    let values = split_fields(value, self.style_format.len());
                    let style = Style::from_fields(&self.style_format, &values, number, legacy)?;
                    if !self.script.add_style(Arc::new(style)) {
                        log::warn!("line {number}: duplicate style ignored");
                    }
                }
                _ => {}
            },
            Some(Section::Events) => match key {
                "Format" => self.event_format = parse_format(value),
                "Dialogue" | "Comment" => {
                    let values = split_fields(value, self.event_format.len());
                    let event = Dialogue::from_fields(
                        &self.event_format,
                        &values,
                        number,
                        key == "Comment",
                    )?;
                    self.script.add_event(event);
                }
                _ => {}
            },
            Some(Section::Other) | None => {}
        }
        Ok(())
    }
}

fn default_format(fields: &[&str]) -> Vec<String> {
    fields.iter().map(ToString::to_string).collect()
}

fn parse_format(value: &str) -> Vec<String> {
    value.split(',').map(|field| field.trim().to_string()).collect()
}

/// Split into at most `count` fields so the last one (event text) keeps
/// its commas
fn split_fields(value: &str, count: usize) -> Vec<&str> {
    value.splitn(count.max(1), ',').collect()
}

impl Script {
    /// Parse script text
    ///
    /// # Errors
    ///
    /// Returns [`FxError::Parse`](crate::FxError::Parse) with the 1-based
    /// line number for malformed numeric or time fields, and
    /// [`FxError::InvalidAlignment`](crate::FxError::InvalidAlignment) for
    /// style alignments outside the numpad range.
    pub fn parse(source: &str) -> Result<Self> {
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);
        let mut reader = Reader::new();
        for (index, line) in source.lines().enumerate() {
            reader.line(index + 1, line)?;
        }

        log::debug!(
            "parsed script '{}': {} styles, {} events",
            reader.script.info.title(),
            reader.script.styles.len(),
            reader.script.events.len()
        );
        Ok(reader.script)
    }
}
