//! Effect session: input script in, generated script out
//!
//! The output starts as a copy of the input's script info, project
//! garbage and styles. By
//! default it also keeps every input event as a comment between two
//! banner comments, so the timed source stays next to the effect lines.

use crate::{
    config::FxConfig,
    decompose::{decompose_all, BatchOutcome, Decomposer},
    measure::TextMeasurer,
    script::{Dialogue, Script, Style},
    Result,
};
use std::{path::Path, sync::Arc};

/// Drives an effect over one script
///
/// # Examples
///
/// ```rust
/// use ass_fx_core::{emit::Emit, measure::FixedAdvanceMeasurer, script::Script, FxConfig, FxSession};
///
/// let input = Script::parse(
///     "[V4+ Styles]\nStyle: Default,Arial,30,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,2,0,2,10,20,10,1\n\
///      [Events]\nDialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,{\\k50}ka{\\k50}ra",
/// )?;
/// let mut session = FxSession::new(input, FixedAdvanceMeasurer::default(), FxConfig::default());
///
/// for line in session.lines()?.decompositions {
///     for syllable in &line.syllables {
///         session.add(syllable.emit("\\fad(50,50)"));
///     }
/// }
/// let output = session.into_script();
/// assert_eq!(output.dialogues().count(), 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct FxSession<M> {
    input: Script,
    output: Script,
    measurer: M,
    config: FxConfig,
}

impl<M: TextMeasurer> FxSession<M> {
    /// Start a session over `input`
    pub fn new(input: Script, measurer: M, config: FxConfig) -> Self {
        let mut output = Script {
            info: input.info.clone(),
            project: input.project.clone(),
            styles: input.styles.clone(),
            events: Vec::new(),
        };
        output.set_resolution(config.resolve_resolution(&input));

        if config.keep_original {
            output.add_event(banner(&config.original_banner));
            output.events.extend(input.events.iter().map(|event| Dialogue {
                comment: true,
                ..event.clone()
            }));
            output.add_event(banner(&config.effect_banner));
        }

        Self {
            input,
            output,
            measurer,
            config,
        }
    }

    /// The script being read
    pub const fn input(&self) -> &Script {
        &self.input
    }

    /// The script being built
    pub const fn output(&self) -> &Script {
        &self.output
    }

    /// Session configuration
    pub const fn config(&self) -> &FxConfig {
        &self.config
    }

    /// Decomposer for single events of the input
    pub fn decomposer(&self) -> Decomposer<'_, M> {
        Decomposer::for_script(&self.measurer, &self.input, &self.config)
    }

    /// Decompose every non-comment input event
    ///
    /// # Errors
    ///
    /// Same as [`decompose_all`].
    pub fn lines(&self) -> Result<BatchOutcome> {
        decompose_all(&self.input, &self.measurer, &self.config)
    }

    /// Append a generated event; events with neither text nor tags are
    /// dropped
    pub fn add(&mut self, event: Dialogue) {
        if event.text.is_empty() && event.tags.is_empty() {
            log::debug!("dropping empty event at {}", event.start);
            return;
        }
        self.output.add_event(event);
    }

    /// Register an extra output style; returns `false` if the name exists
    pub fn add_style(&mut self, style: Style) -> bool {
        self.output.add_style(style)
    }

    /// Finish the session
    ///
    /// Styles referenced by output events but never registered are added
    /// as copies of the fallback style under the referenced name.
    #[must_use]
    pub fn into_script(self) -> Script {
        let Self {
            mut output, config, ..
        } = self;

        let Some(fallback) = output.style(&config.default_style).cloned() else {
            return output;
        };
        let missing: Vec<String> = output
            .dialogues()
            .filter(|event| output.style(&event.style).is_none())
            .map(|event| event.style.clone())
            .collect();
        for name in missing {
            if output.add_style(Arc::new(Style {
                name,
                ..(*fallback).clone()
            })) {
                log::debug!("registered fallback copy for a missing output style");
            }
        }
        output
    }

    /// Finish the session and write the output script
    ///
    /// # Errors
    ///
    /// Returns [`FxError::Io`](crate::FxError::Io) when the file cannot be
    /// written.
    pub fn save(self, path: impl AsRef<Path>) -> Result<()> {
        self.into_script().save(path)
    }
}

fn banner(text: &str) -> Dialogue {
    Dialogue {
        comment: true,
        ..Dialogue::new(text)
    }
}
