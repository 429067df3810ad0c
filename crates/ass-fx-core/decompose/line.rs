//! Line-level view and the metadata every view carries

use crate::{
    layout::{Anchors, LineLayout, Point},
    script::{Dialogue, Style},
};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Absolute timing window in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeSpan {
    /// Start time
    pub start: i64,
    /// End time
    pub end: i64,
    /// `end - start`
    pub duration: i64,
    /// `start + duration / 2`
    pub mid: i64,
}

impl TimeSpan {
    /// Window from `start` to `end`
    #[must_use]
    pub const fn new(start: i64, end: i64) -> Self {
        let duration = end - start;
        Self {
            start,
            end,
            duration,
            mid: start + duration / 2,
        }
    }
}

/// Source event fields copied onto re-emitted events
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EventMeta {
    /// Layer
    pub layer: i32,
    /// Style name as referenced by the event
    pub style_name: String,
    /// Actor
    pub actor: String,
    /// Effect field
    pub effect: String,
    /// Comment flag
    pub comment: bool,
}

impl EventMeta {
    /// Metadata of a source event
    #[must_use]
    pub fn from_event(event: &Dialogue) -> Self {
        Self {
            layer: event.layer,
            style_name: event.style.clone(),
            actor: event.actor.clone(),
            effect: event.effect.clone(),
            comment: event.comment,
        }
    }
}

/// One decomposed event
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LineView {
    /// Source event metadata
    pub meta: Arc<EventMeta>,
    /// Resolved style
    pub style: Arc<Style>,
    /// Event timing
    pub time: TimeSpan,
    /// Text with override blocks removed
    pub text: String,
    /// Emitted syllable views
    pub syllable_count: usize,
    /// Emitted character views
    pub char_count: usize,
    /// Scaled width
    pub width: f64,
    /// Scaled height
    pub height: f64,
    /// Box origin under every alignment rule
    pub placement: Anchors,
    /// Placement selected by the style's alignment
    pub active: Point,
    /// Edges of the placed box
    pub bounds: Anchors,
    /// Alignment point of the placed box
    pub pos: Point,
}

impl LineView {
    pub(crate) fn new(
        meta: Arc<EventMeta>,
        style: Arc<Style>,
        time: TimeSpan,
        text: String,
        layout: LineLayout,
    ) -> Self {
        Self {
            meta,
            style,
            time,
            text,
            syllable_count: 0,
            char_count: 0,
            width: layout.width,
            height: layout.height,
            placement: layout.placement,
            active: layout.active,
            bounds: layout.bounds,
            pos: layout.pos,
        }
    }

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
