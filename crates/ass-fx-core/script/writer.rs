//! Script serialization in standard V4+ layout

use super::{Script, V4_PLUS_EVENT_FORMAT, V4_PLUS_STYLE_FORMAT};
use crate::{layout::Resolution, utils::FxError, Result};
use core::fmt::{self, Write};
use std::path::Path;

/// Script Info keys the writer emits itself
const MANAGED_KEYS: [&str; 5] = [
    "ScriptType",
    "PlayResX",
    "PlayResY",
    "WrapStyle",
    "ScaledBorderAndShadow",
];

impl Script {
    /// Convert the script to ASS text
    ///
    /// Always writes `ScriptType: v4.00+`. `PlayResX`/`PlayResY` fall back
    /// to 1280x720, `WrapStyle` to 2 and `ScaledBorderAndShadow` to `yes`
    /// when the script does not set them. `[Aegisub Project Garbage]`
    /// follows the script info when the script carries any.
    #[must_use]
    pub fn to_ass_string(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        self.write_ass(&mut out).ok();
        out
    }

    fn write_ass(&self, out: &mut impl Write) -> fmt::Result {
        let resolution = self.resolution().unwrap_or(Resolution::FALLBACK);
        out.write_str("[Script Info]\n; Script generated by ass-fx\nScriptType: v4.00+\n")?;
        for (key, value) in &self.info.fields {
            if !MANAGED_KEYS.contains(&key.as_str()) {
                writeln!(out, "{key}: {value}")?;
            }
        }
        writeln!(out, "PlayResX: {}", resolution.width)?;
        writeln!(out, "PlayResY: {}", resolution.height)?;
        writeln!(
            out,
            "WrapStyle: {}",
            self.info.get_field("WrapStyle").unwrap_or("2")
        )?;
        writeln!(
            out,
            "ScaledBorderAndShadow: {}",
            self.info.get_field("ScaledBorderAndShadow").unwrap_or("yes")
        )?;

        if !self.project.is_empty() {
            out.write_str("\n[Aegisub Project Garbage]\n")?;
            for (key, value) in &self.project.fields {
                writeln!(out, "{key}: {value}")?;
            }
        }

        out.write_str("\n[V4+ Styles]\n")?;
        writeln!(out, "Format: {}", V4_PLUS_STYLE_FORMAT.join(", "))?;
        for style in &self.styles {
            writeln!(out, "{}", style.to_ass_string())?;
        }

        out.write_str("\n[Events]\n")?;
        writeln!(out, "Format: {}", V4_PLUS_EVENT_FORMAT.join(", "))?;
        for event in &self.events {
            writeln!(out, "{}", event.to_ass_string())?;
        }
        Ok(())
    }

    /// Write the script to a file
    ///
    /// # Errors
    ///
    /// Returns [`FxError::Io`] when the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_ass_string())
            .map_err(|err| FxError::Io(format!("{}: {err}", path.display())))?;
        log::info!("wrote {} events to {}", self.events.len(), path.display());
        Ok(())
    }
}
