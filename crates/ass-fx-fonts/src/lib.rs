//! Font-backed measurement for ass-fx
//!
//! [`FontdbMeasurer`] resolves a style's font through a [`fontdb`]
//! database and shapes text with rustybuzz, so syllable and character
//! widths follow the real glyph advances (kerning and ligatures
//! included). Heights follow the VSFilter convention of using the font
//! size as the line height.
//!
//! # Example
//!
//! ```rust,no_run
//! use ass_fx_core::measure::{CachedMeasurer, FontSpec, TextMeasurer};
//! use ass_fx_fonts::FontdbMeasurer;
//!
//! let measurer = CachedMeasurer::new(
//!     FontdbMeasurer::new()
//!         .with_fonts_dir("fonts")
//!         .with_fallback("DejaVu Sans"),
//! );
//! let extent = measurer.measure(&FontSpec::new("Arial", 48.0), "karaoke")?;
//! println!("{}x{}", extent.width, extent.height);
//! # Ok::<(), ass_fx_core::FxError>(())
//! ```

#![deny(unsafe_code)]

use ahash::AHashMap;
use ass_fx_core::{
    measure::{FontSpec, TextExtent, TextMeasurer},
    FxError, Result,
};
use core::fmt;
use fontdb::{Database, Family, Query, Stretch, Style, Weight, ID};
use parking_lot::RwLock;
use rustybuzz::UnicodeBuffer;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FaceKey {
    family: String,
    bold: bool,
    italic: bool,
}

/// Measures text with real font faces
pub struct FontdbMeasurer {
    database: Database,
    fallback: Option<String>,
    faces: RwLock<AHashMap<FaceKey, ID>>,
}

impl FontdbMeasurer {
    /// Measurer over the system's installed fonts
    #[must_use]
    pub fn new() -> Self {
        let mut measurer = Self::empty();
        measurer.database.load_system_fonts();
        log::debug!("loaded {} system font faces", measurer.database.len());
        measurer
    }

    /// Measurer with no fonts loaded
    #[must_use]
    pub fn empty() -> Self {
        Self {
            database: Database::new(),
            fallback: None,
            faces: RwLock::new(AHashMap::new()),
        }
    }

    /// Also load every font file under `dir`
    #[must_use]
    pub fn with_fonts_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.load_fonts_dir(dir);
        self
    }

    /// Family tried when a style's own family is not installed
    #[must_use]
    pub fn with_fallback(mut self, family: impl Into<String>) -> Self {
        self.fallback = Some(family.into());
        self.faces.get_mut().clear();
        self
    }

    /// Load every font file under `dir`
    pub fn load_fonts_dir(&mut self, dir: impl AsRef<Path>) {
        let dir = dir.as_ref();
        let before = self.database.len();
        self.database.load_fonts_dir(dir);
        log::debug!(
            "loaded {} font faces from {}",
            self.database.len() - before,
            dir.display()
        );
        self.faces.get_mut().clear();
    }

    /// Load a single font file
    ///
    /// # Errors
    ///
    /// Returns [`FxError::Io`] when the file cannot be read.
    pub fn load_font_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.database
            .load_font_file(path)
            .map_err(|err| FxError::Io(format!("{}: {err}", path.display())))?;
        self.faces.get_mut().clear();
        Ok(())
    }

    /// Load font data held in memory, e.g. fonts embedded in a script
    pub fn load_font_data(&mut self, data: Vec<u8>) {
        self.database.load_font_data(data);
        self.faces.get_mut().clear();
    }

    /// Number of loaded font faces
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.database.len()
    }

    /// The underlying font database
    #[must_use]
    pub const fn database(&self) -> &Database {
        &self.database
    }

    fn face_id(&self, font: &FontSpec) -> Result<ID> {
        let key = FaceKey {
            family: font.family.clone(),
            bold: font.bold,
            italic: font.italic,
        };
        if let Some(id) = self.faces.read().get(&key) {
            return Ok(*id);
        }

        let id = query(&self.database, &font.family, font.bold, font.italic)
            .or_else(|| {
                let fallback = self.fallback.as_deref()?;
                let id = query(&self.database, fallback, font.bold, font.italic)?;
                log::warn!("font '{}' not found, using '{fallback}'", font.family);
                Some(id)
            })
            .ok_or_else(|| FxError::measure(format!("unknown font family '{}'", font.family)))?;

        self.faces.write().insert(key, id);
        Ok(id)
    }
}

impl Default for FontdbMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FontdbMeasurer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontdbMeasurer")
            .field("faces", &self.database.len())
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

impl TextMeasurer for FontdbMeasurer {
    fn measure(&self, font: &FontSpec, text: &str) -> Result<TextExtent> {
        let id = self.face_id(font)?;
        if text.is_empty() {
            return Ok(TextExtent {
                width: 0.0,
                height: font.size,
            });
        }

        let width = self
            .database
            .with_face_data(id, |data, index| shaped_width(data, index, text, font.size))
            .ok_or_else(|| {
                FxError::measure(format!("font data for '{}' is unavailable", font.family))
            })??;

        Ok(TextExtent {
            width,
            height: font.size,
        })
    }
}

fn query(database: &Database, family: &str, bold: bool, italic: bool) -> Option<ID> {
    database.query(&Query {
        families: &[Family::Name(family)],
        weight: if bold { Weight::BOLD } else { Weight::NORMAL },
        stretch: Stretch::Normal,
        style: if italic { Style::Italic } else { Style::Normal },
    })
}

/// Sum of shaped horizontal advances scaled to `size`
fn shaped_width(data: &[u8], index: u32, text: &str, size: f64) -> Result<f64> {
    let units_per_em = ttf_parser::Face::parse(data, index)
        .map_err(|err| FxError::measure(format!("unreadable font face: {err}")))?
        .units_per_em();
    let face = rustybuzz::Face::from_slice(data, index)
        .ok_or_else(|| FxError::measure("unreadable font face"))?;

    let mut buffer = UnicodeBuffer::new();
    buffer.push_str(text);
    let output = rustybuzz::shape(&face, &[], buffer);

    let advance: i64 = output
        .glyph_positions()
        .iter()
        .map(|position| i64::from(position.x_advance))
        .sum();
    Ok(advance as f64 * size / f64::from(units_per_em))
}
