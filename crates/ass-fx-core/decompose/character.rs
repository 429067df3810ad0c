//! Character decomposition within one syllable

use super::{
    line::{EventMeta, TimeSpan},
    syllable::SyllableView,
};
use crate::{
    layout::{measure_scaled, Anchors, Point},
    measure::{FontSpec, TextMeasurer},
    script::Style,
    utils::graphemes,
    Result,
};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One grapheme of a syllable
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CharacterView {
    /// Source event metadata
    pub meta: Arc<EventMeta>,
    /// Resolved style
    pub style: Arc<Style>,
    /// Index of the parent syllable view
    pub syllable_index: usize,
    /// Position within the parent syllable
    pub index: usize,
    /// Character timing
    pub time: TimeSpan,
    /// Parent syllable timing
    pub syllable_time: TimeSpan,
    /// The grapheme
    pub text: String,
    /// Parent syllable's inline effect name
    pub inline: String,
    /// Scaled width
    pub width: f64,
    /// Parent syllable's height
    pub height: f64,
    /// Edges of the character box
    pub bounds: Anchors,
    /// Alignment point of the character box
    pub pos: Point,
}

impl CharacterView {
    /// Copy with a different timing window
    #[must_use]
    pub fn with_timing(&self, start: i64, end: i64) -> Self {
        Self {
            time: TimeSpan::new(start, end),
            ..self.clone()
        }
    }

    /// Copy emitted on a different layer
    #[must_use]
    pub fn with_layer(&self, layer: i32) -> Self {
        Self {
            meta: Arc::new(EventMeta {
                layer,
                ..(*self.meta).clone()
            }),
            ..self.clone()
        }
    }
}

/// Split a syllable's duration evenly over its graphemes
///
/// Every character but the last gets `duration / count` (integer
/// division); the last ends exactly at the syllable's end.
pub(crate) fn decompose_characters<M: TextMeasurer + ?Sized>(
    measurer: &M,
    font: &FontSpec,
    syllable: &SyllableView,
) -> Result<Vec<CharacterView>> {
    let units = graphemes(&syllable.text);
    let count = units.len();
    let step = if count <= 1 {
        syllable.time.duration
    } else {
        syllable.time.duration / i64::try_from(count).unwrap_or(i64::MAX)
    };
    let horizontal = syllable.style.alignment.horizontal;

    let mut left = syllable.bounds.left;
    let mut start = syllable.time.start;
    let mut views = Vec::with_capacity(count);

    for (index, unit) in units.into_iter().enumerate() {
        let width = measure_scaled(measurer, font, &syllable.style, unit)?.width;
        let end = if index + 1 == count {
            syllable.time.end
        } else {
            start + step
        };
        let bounds = syllable.bounds.with_horizontal(left, width);

        views.push(CharacterView {
            meta: Arc::clone(&syllable.meta),
            style: Arc::clone(&syllable.style),
            syllable_index: syllable.index,
            index,
            time: TimeSpan::new(start, end),
            syllable_time: syllable.time,
            text: unit.to_string(),
            inline: syllable.inline.clone(),
            width,
            height: syllable.height,
            bounds,
            pos: Point::new(bounds.x(horizontal), syllable.pos.y),
        });

        left += width;
        start = end;
    }

    Ok(views)
}
