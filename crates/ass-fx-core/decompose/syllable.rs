//! Syllable decomposition
//!
//! Walks the syllable descriptors of a line with a time cursor and a
//! position cursor. Horizontal flow advances `x` along the line's band;
//! vertical flow stacks one syllable per row around the canvas middle.

use super::{
    line::{EventMeta, TimeSpan},
    LineContext,
};
use crate::{
    karaoke::{KaraokeMode, SyllableDescriptor},
    layout::{measure_scaled, Anchors, HAlign, Point},
    measure::{TextExtent, TextMeasurer},
    script::Style,
    utils::{trim_space_count, TrimmedText},
    Result,
};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One non-empty syllable
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SyllableView {
    /// Source event metadata
    pub meta: Arc<EventMeta>,
    /// Resolved style
    pub style: Arc<Style>,
    /// Position among the line's emitted syllables
    pub index: usize,
    /// Syllable timing
    pub time: TimeSpan,
    /// Text without surrounding whitespace
    pub text: String,
    /// Marker kind
    pub mode: KaraokeMode,
    /// Inline effect name, empty when absent
    pub inline: String,
    /// Scaled width
    pub width: f64,
    /// Scaled height
    pub height: f64,
    /// Edges of the syllable box
    pub bounds: Anchors,
    /// Alignment point of the syllable box
    pub pos: Point,
}

impl SyllableView {
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

struct Measured<'d> {
    descriptor: &'d SyllableDescriptor,
    trimmed: TrimmedText<'d>,
    extent: Option<TextExtent>,
}

#[derive(Debug, Clone, Copy)]
enum Flow {
    Horizontal { space_width: f64 },
    Vertical { max_width: f64 },
}

/// Fold state carried from one syllable to the next
#[derive(Debug, Clone, Copy)]
struct Cursor {
    time: i64,
    x: f64,
    y: f64,
}

impl Cursor {
    fn step<M: TextMeasurer + ?Sized>(
        self,
        ctx: &LineContext<'_, M>,
        flow: Flow,
        syllable: &Measured<'_>,
        is_last: bool,
        index: usize,
    ) -> (Self, Option<SyllableView>) {
        let line = ctx.line;
        let start = self.time;
        let time = start + syllable.descriptor.duration_ms();
        let end = if is_last { line.time.end } else { time };

        let (x, y, bounds) = match (flow, syllable.extent) {
            (Flow::Horizontal { space_width }, extent) => {
                let left = self.x + syllable.trimmed.leading as f64 * space_width;
                let width = extent.map_or(0.0, |e| e.width);
                let next_x = left + width + syllable.trimmed.trailing as f64 * space_width;
                (next_x, self.y, line.bounds.with_horizontal(left, width))
            }
            (Flow::Vertical { .. }, None) => (self.x, self.y, line.bounds),
            (Flow::Vertical { max_width }, Some(extent)) => {
                let left = match line.style.alignment.horizontal {
                    HAlign::Left => line.bounds.left + (max_width - extent.width) / 2.0,
                    HAlign::Center => ctx.resolution.width_f64() / 2.0 - extent.width / 2.0,
                    HAlign::Right => {
                        line.bounds.right - extent.width - (max_width - extent.width) / 2.0
                    }
                };
                let bounds = Anchors::from_box(left, self.y, extent.width, extent.height);
                (self.x, self.y + extent.height, bounds)
            }
        };

        let view = syllable.extent.map(|extent| SyllableView {
            meta: Arc::clone(&line.meta),
            style: Arc::clone(&line.style),
            index,
            time: TimeSpan::new(start, end),
            text: syllable.trimmed.text.to_string(),
            mode: syllable.descriptor.mode,
            inline: syllable.descriptor.inline.clone(),
            width: extent.width,
            height: extent.height,
            bounds,
            pos: bounds.point(line.style.alignment),
        });

        (Self { time, x, y }, view)
    }
}

/// Emit one view per non-blank syllable
///
/// Blank syllables still advance the time cursor and, in horizontal flow,
/// the position cursor by their whitespace. The last emitted syllable ends
/// exactly at the line's end.
pub(crate) fn decompose_syllables<M: TextMeasurer + ?Sized>(
    ctx: &LineContext<'_, M>,
    descriptors: &[SyllableDescriptor],
) -> Result<Vec<SyllableView>> {
    let line = ctx.line;
    let measured = descriptors
        .iter()
        .map(|descriptor| {
            let trimmed = trim_space_count(&descriptor.text);
            let extent = if trimmed.is_blank() {
                None
            } else {
                Some(measure_scaled(ctx.measurer, &ctx.font, &line.style, trimmed.text)?)
            };
            Ok(Measured {
                descriptor,
                trimmed,
                extent,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let Some(last_visible) = measured.iter().rposition(|m| m.extent.is_some()) else {
        return Ok(Vec::new());
    };

    let visible = measured.iter().filter_map(|m| m.extent);
    let (flow, start_x, start_y) = if ctx.vertical {
        let max_width = visible.clone().map(|e| e.width).fold(0.0, f64::max);
        let total_height: f64 = visible.map(|e| e.height).sum();
        let top =
            ctx.resolution.height_f64() / 2.0 - total_height / 2.0 + line.style.spacing;
        (Flow::Vertical { max_width }, line.bounds.left, top)
    } else {
        let space_width = measure_scaled(ctx.measurer, &ctx.font, &line.style, " ")?.width;
        // Spaces ahead of the first visible syllable fall outside the
        // trimmed line box
        let outside: usize = measured[..=last_visible]
            .iter()
            .take_while(|m| m.extent.is_none())
            .map(|m| m.trimmed.leading + m.trimmed.trailing)
            .sum::<usize>()
            + measured
                .iter()
                .find(|m| m.extent.is_some())
                .map_or(0, |m| m.trimmed.leading);
        let start_x = line.bounds.left - outside as f64 * space_width;
        (Flow::Horizontal { space_width }, start_x, line.bounds.top)
    };

    let mut cursor = Cursor {
        time: line.time.start,
        x: start_x,
        y: start_y,
    };
    let mut views = Vec::with_capacity(last_visible + 1);
    for (position, syllable) in measured.iter().enumerate() {
        let (next, view) = cursor.step(ctx, flow, syllable, position == last_visible, views.len());
        cursor = next;
        views.extend(view);
    }

    Ok(views)
}
