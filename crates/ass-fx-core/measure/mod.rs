//! Text measurement boundary
//!
//! Layout never rasterizes anything: it asks a [`TextMeasurer`] for the
//! pixel extent of a string in a given font. Implementations range from
//! the deterministic [`FixedAdvanceMeasurer`] used in tests to the
//! font-backed measurer in the `ass-fx-fonts` crate. [`CachedMeasurer`]
//! memoizes any of them, since single characters and common syllables
//! recur heavily within and across lines.

use crate::{script::Style, utils::FxError, Result};
use ahash::AHashMap;
use parking_lot::Mutex;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Font selection handed to a measurer
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FontSpec {
    /// Font family name as written in the style
    pub family: String,
    /// Font size in script pixels
    pub size: f64,
    /// Bold weight requested
    pub bold: bool,
    /// Italic slant requested
    pub italic: bool,
}

impl FontSpec {
    /// Create a regular-weight, upright font spec
    #[must_use]
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
            bold: false,
            italic: false,
        }
    }

    /// Font spec described by a style
    #[must_use]
    pub fn from_style(style: &Style) -> Self {
        Self {
            family: style.fontname.clone(),
            size: style.fontsize,
            bold: style.bold,
            italic: style.italic,
        }
    }
}

/// Rendered extent of a string in script pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TextExtent {
    /// Advance width
    pub width: f64,
    /// Line height
    pub height: f64,
}

/// Measures text for layout
///
/// Implementations must be deterministic: the same font and text always
/// yield the same extent. Measurement failures are fatal for a batch.
pub trait TextMeasurer: Send + Sync {
    /// Measure `text` rendered with `font`
    ///
    /// # Errors
    ///
    /// Returns [`FxError::Measure`] when the font cannot be resolved or
    /// its data cannot be read.
    fn measure(&self, font: &FontSpec, text: &str) -> Result<TextExtent>;
}

impl<M: TextMeasurer + ?Sized> TextMeasurer for &M {
    fn measure(&self, font: &FontSpec, text: &str) -> Result<TextExtent> {
        (**self).measure(font, text)
    }
}

impl<M: TextMeasurer + ?Sized> TextMeasurer for Box<M> {
    fn measure(&self, font: &FontSpec, text: &str) -> Result<TextExtent> {
        (**self).measure(font, text)
    }
}

impl<M: TextMeasurer + ?Sized> TextMeasurer for Arc<M> {
    fn measure(&self, font: &FontSpec, text: &str) -> Result<TextExtent> {
        (**self).measure(font, text)
    }
}

/// Monospace-style measurer: every grapheme advances `size * ratio`
///
/// Height is the font size. Optionally restricted to a set of known
/// families so unknown-font handling can be exercised without real fonts.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedAdvanceMeasurer {
    ratio: f64,
    families: Option<Vec<String>>,
}

impl FixedAdvanceMeasurer {
    /// Measurer accepting any family
    #[must_use]
    pub const fn new(ratio: f64) -> Self {
        Self {
            ratio,
            families: None,
        }
    }

    /// Only accept the listed families (case-insensitive)
    #[must_use]
    pub fn with_families<I, S>(mut self, families: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.families = Some(families.into_iter().map(Into::into).collect());
        self
    }

    /// Advance of a single grapheme as a fraction of the font size
    #[must_use]
    pub const fn ratio(&self) -> f64 {
        self.ratio
    }
}

impl Default for FixedAdvanceMeasurer {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl TextMeasurer for FixedAdvanceMeasurer {
    fn measure(&self, font: &FontSpec, text: &str) -> Result<TextExtent> {
        if let Some(families) = &self.families {
            if !families
                .iter()
                .any(|family| family.eq_ignore_ascii_case(&font.family))
            {
                return Err(FxError::measure(format!(
                    "unknown font family '{}'",
                    font.family
                )));
            }
        }

        let count = crate::utils::grapheme_count(text) as f64;
        Ok(TextExtent {
            width: count * font.size * self.ratio,
            height: font.size,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    family: String,
    size_bits: u64,
    bold: bool,
    italic: bool,
    text: String,
}

impl CacheKey {
    fn new(font: &FontSpec, text: &str) -> Self {
        Self {
            family: font.family.clone(),
            size_bits: font.size.to_bits(),
            bold: font.bold,
            italic: font.italic,
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct CacheState {
    entries: AHashMap<CacheKey, TextExtent>,
    hits: u64,
    misses: u64,
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Lookups served from the cache
    pub hits: u64,
    /// Lookups forwarded to the inner measurer
    pub misses: u64,
    /// Distinct (font, text) pairs stored
    pub entries: usize,
}

/// Memoizing wrapper keyed by (font, text)
///
/// Safe to share between threads; failures are not cached.
#[derive(Debug)]
pub struct CachedMeasurer<M> {
    inner: M,
    state: Mutex<CacheState>,
}

impl<M: TextMeasurer> CachedMeasurer<M> {
    /// Wrap a measurer with an empty cache
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// The wrapped measurer
    pub const fn inner(&self) -> &M {
        &self.inner
    }

    /// Current hit/miss counters
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            hits: state.hits,
            misses: state.misses,
            entries: state.entries.len(),
        }
    }

    /// Drop every cached extent and reset the counters
    pub fn clear(&self) {
        *self.state.lock() = CacheState::default();
    }
}

impl<M: TextMeasurer> TextMeasurer for CachedMeasurer<M> {
    fn measure(&self, font: &FontSpec, text: &str) -> Result<TextExtent> {
        let key = CacheKey::new(font, text);
        {
            let mut state = self.state.lock();
            if let Some(extent) = state.entries.get(&key).copied() {
                state.hits += 1;
                return Ok(extent);
            }
            state.misses += 1;
        }

        log::trace!(
            "measure miss: '{}' {}px '{}'",
            font.family,
            font.size,
            text
        );
        let extent = self.inner.measure(font, text)?;
        self.state.lock().entries.insert(key, extent);
        Ok(extent)
    }
}
