//! Decomposition and session configuration

use crate::{layout::Resolution, script::Script};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How syllables of a line are laid out relative to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FlowPolicy {
    /// Middle-row alignments (4, 5, 6) stack syllables in rows, the others
    /// flow left to right
    #[default]
    ByAlignment,
    /// Always flow left to right on the line's band
    Horizontal,
}

/// Settings shared by the decomposer and the effect session
///
/// # Examples
///
/// ```rust
/// use ass_fx_core::{FlowPolicy, FxConfig, Resolution};
///
/// let config = FxConfig::default()
///     .with_resolution(Resolution::new(1920, 1080))
///     .with_flow(FlowPolicy::Horizontal)
///     .with_keep_original(false);
/// assert_eq!(config.default_style, "Default");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FxConfig {
    /// Canvas override; the script's `PlayResX`/`PlayResY` otherwise
    pub resolution: Option<Resolution>,
    /// Style used when an event names one the script lacks
    pub default_style: String,
    /// Syllable flow selection
    pub flow: FlowPolicy,
    /// Copy input events into the output as comments
    pub keep_original: bool,
    /// Comment placed before the copied input events
    pub original_banner: String,
    /// Comment placed before the generated events
    pub effect_banner: String,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            resolution: None,
            default_style: "Default".to_string(),
            flow: FlowPolicy::ByAlignment,
            keep_original: true,
            original_banner: "### Original Karaoke ###".to_string(),
            effect_banner: "### Karaoke Effect ###".to_string(),
        }
    }
}

impl FxConfig {
    /// Override the canvas resolution
    #[must_use]
    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = Some(resolution);
        self
    }

    /// Set the fallback style name
    #[must_use]
    pub fn with_default_style(mut self, name: impl Into<String>) -> Self {
        self.default_style = name.into();
        self
    }

    /// Set the flow policy
    #[must_use]
    pub fn with_flow(mut self, flow: FlowPolicy) -> Self {
        self.flow = flow;
        self
    }

    /// Keep or drop the commented copy of the input events
    #[must_use]
    pub fn with_keep_original(mut self, keep: bool) -> Self {
        self.keep_original = keep;
        self
    }

    /// Set both comment banners
    #[must_use]
    pub fn with_banners(mut self, original: impl Into<String>, effect: impl Into<String>) -> Self {
        self.original_banner = original.into();
        self.effect_banner = effect.into();
        self
    }

    /// Canvas for a script: override, then `PlayResX`/`PlayResY`, then
    /// 1280x720
    #[must_use]
    pub fn resolve_resolution(&self, script: &Script) -> Resolution {
        if let Some(resolution) = self.resolution {
            return resolution;
        }
        script.resolution().unwrap_or_else(|| {
            log::warn!(
                "script has no PlayResX/PlayResY, assuming {}",
                Resolution::FALLBACK
            );
            Resolution::FALLBACK
        })
    }
}
