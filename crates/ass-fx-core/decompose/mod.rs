//! Line, syllable and character decomposition
//!
//! A [`Decomposer`] turns one event plus its resolved style into a
//! [`Decomposition`]: the line view, one view per non-blank syllable and
//! one view per grapheme of those syllables. Views are snapshots; nothing
//! is cached between calls, so decomposing twice gives identical output.
//!
//! [`decompose_all`] runs a whole script, skipping events whose karaoke
//! annotation is malformed.
//!
//! # Example
//!
//! ```rust
//! use ass_fx_core::{
//!     decompose::Decomposer, measure::FixedAdvanceMeasurer, script::{Dialogue, Style},
//!     Resolution,
//! };
//! use std::sync::Arc;
//!
//! let measurer = FixedAdvanceMeasurer::new(0.5);
//! let decomposer = Decomposer::new(&measurer, Resolution::new(1280, 720));
//! let event = Dialogue::new("{\\k20}Hel{\\k30}lo");
//! let result = decomposer.decompose(&event, Arc::new(Style::default()))?;
//!
//! assert_eq!(result.line.text, "Hello");
//! assert_eq!(result.syllables[0].time.end, 200);
//! assert_eq!(result.syllables[1].time.end, 5000);
//! assert_eq!(result.characters.len(), 5);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod character;
mod line;
mod syllable;

pub use character::CharacterView;
pub use line::{EventMeta, LineView, TimeSpan};
pub use syllable::SyllableView;

use crate::{
    config::{FlowPolicy, FxConfig},
    karaoke::{parse_syllables, strip_override_blocks},
    layout::{resolve_line, Resolution},
    measure::{FontSpec, TextMeasurer},
    script::{Dialogue, Script, Style},
    utils::FxError,
    Result,
};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-line state shared by the syllable and character passes
pub(crate) struct LineContext<'a, M: ?Sized> {
    pub(crate) measurer: &'a M,
    pub(crate) font: FontSpec,
    pub(crate) resolution: Resolution,
    pub(crate) vertical: bool,
    pub(crate) line: &'a LineView,
}

/// All views of one event
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Decomposition {
    /// The whole line
    pub line: LineView,
    /// Non-blank syllables in order
    pub syllables: Vec<SyllableView>,
    /// Characters of every syllable in order
    pub characters: Vec<CharacterView>,
}

impl Decomposition {
    /// Characters belonging to one syllable view
    pub fn characters_of(&self, syllable_index: usize) -> impl Iterator<Item = &CharacterView> {
        self.characters
            .iter()
            .filter(move |c| c.syllable_index == syllable_index)
    }
}

/// Decomposes events against one canvas with one measurer
#[derive(Debug)]
pub struct Decomposer<'a, M: ?Sized> {
    measurer: &'a M,
    resolution: Resolution,
    flow: FlowPolicy,
}

impl<M: ?Sized> Clone for Decomposer<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: ?Sized> Copy for Decomposer<'_, M> {}

impl<'a, M: TextMeasurer + ?Sized> Decomposer<'a, M> {
    /// Decomposer with alignment-driven flow
    pub const fn new(measurer: &'a M, resolution: Resolution) -> Self {
        Self {
            measurer,
            resolution,
            flow: FlowPolicy::ByAlignment,
        }
    }

    /// Decomposer configured for a script
    pub fn for_script(measurer: &'a M, script: &Script, config: &FxConfig) -> Self {
        Self::new(measurer, config.resolve_resolution(script)).with_flow(config.flow)
    }

    /// Set the flow policy
    #[must_use]
    pub fn with_flow(mut self, flow: FlowPolicy) -> Self {
        self.flow = flow;
        self
    }

    /// Canvas used for layout
    pub const fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Decompose one event
    ///
    /// # Errors
    ///
    /// Returns [`FxError::Annotation`] for malformed karaoke markers and
    /// [`FxError::Measure`] when the style's font cannot be measured.
    pub fn decompose(&self, event: &Dialogue, style: Arc<Style>) -> Result<Decomposition> {
        let descriptors = parse_syllables(&event.text)?;
        let text = strip_override_blocks(&event.text);
        let layout = resolve_line(&text, &style, self.resolution, self.measurer)?;

        let time = TimeSpan::new(event.start.as_millis(), event.end.as_millis());
        let mut line = LineView::new(
            Arc::new(EventMeta::from_event(event)),
            style,
            time,
            text,
            layout,
        );

        let ctx = LineContext {
            measurer: self.measurer,
            font: FontSpec::from_style(&line.style),
            resolution: self.resolution,
            vertical: self.flow == FlowPolicy::ByAlignment && line.style.alignment.is_middle_row(),
            line: &line,
        };
        let syllables = syllable::decompose_syllables(&ctx, &descriptors)?;
        let mut characters = Vec::new();
        for syllable in &syllables {
            characters.extend(character::decompose_characters(
                ctx.measurer,
                &ctx.font,
                syllable,
            )?);
        }

        line.syllable_count = syllables.len();
        line.char_count = characters.len();
        log::debug!(
            "decomposed '{}' [{}, {}): {} syllables, {} characters",
            line.text,
            line.time.start,
            line.time.end,
            line.syllable_count,
            line.char_count
        );

        Ok(Decomposition {
            line,
            syllables,
            characters,
        })
    }

    /// Split a syllable view into characters
    ///
    /// Useful after [`SyllableView::with_timing`]: the characters share the
    /// new window the same way they share the original one.
    ///
    /// # Errors
    ///
    /// Returns [`FxError::Measure`] when the style's font cannot be
    /// measured.
    pub fn characters(&self, syllable: &SyllableView) -> Result<Vec<CharacterView>> {
        character::decompose_characters(
            self.measurer,
            &FontSpec::from_style(&syllable.style),
            syllable,
        )
    }
}

/// An event left out of a batch
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedEvent {
    /// Index into the script's events
    pub event_index: usize,
    /// Why it was skipped
    pub error: FxError,
}

/// Result of decomposing a whole script
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchOutcome {
    /// Decomposed events in script order
    pub decompositions: Vec<Decomposition>,
    /// Events skipped for recoverable errors
    pub skipped: Vec<SkippedEvent>,
}

/// Decompose every non-comment event of a script
///
/// Style references are checked for all events before any layout runs.
/// Events with malformed annotations are skipped and recorded; any other
/// error aborts the batch. With the `parallel` feature events are
/// decomposed on the rayon pool, still returned in script order.
///
/// # Errors
///
/// Returns [`FxError::MissingStyle`] when an event's style and the
/// fallback are both missing, and [`FxError::Measure`] for measurement
/// failures.
pub fn decompose_all<M: TextMeasurer + ?Sized>(
    script: &Script,
    measurer: &M,
    config: &FxConfig,
) -> Result<BatchOutcome> {
    let decomposer = Decomposer::for_script(measurer, script, config);

    let jobs = script
        .events
        .iter()
        .enumerate()
        .filter(|(_, event)| !event.comment)
        .map(|(index, event)| {
            let style = script.resolve_style(&event.style, &config.default_style)?;
            Ok((index, event, style))
        })
        .collect::<Result<Vec<_>>>()?;

    #[cfg(feature = "parallel")]
    let results: Vec<(usize, Result<Decomposition>)> = {
        use rayon::prelude::*;
        jobs.into_par_iter()
            .map(|(index, event, style)| (index, decomposer.decompose(event, style)))
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let results: Vec<(usize, Result<Decomposition>)> = jobs
        .into_iter()
        .map(|(index, event, style)| (index, decomposer.decompose(event, style)))
        .collect();

    let mut outcome = BatchOutcome::default();
    for (event_index, result) in results {
        match result {
            Ok(decomposition) => outcome.decompositions.push(decomposition),
            Err(error) if error.is_recoverable() => {
                log::warn!("skipping event {event_index}: {error}");
                outcome.skipped.push(SkippedEvent { event_index, error });
            }
            Err(error) => return Err(error),
        }
    }

    Ok(outcome)
}
