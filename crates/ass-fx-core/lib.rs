//! # ass-fx core
//!
//! Karaoke decomposition for ASS (Advanced `SubStation` Alpha) subtitle
//! effects. Splits a `\k`-timed event into per-syllable and per-character
//! views with absolute timing and pixel positions, then re-emits any view
//! as a new event carrying the effect tags you attach.
//!
//! ## Features
//!
//! - **Drift-free timing**: the last syllable ends on the line's end, the
//!   last character on its syllable's end
//! - **Nine-point layout**: numpad alignment decoded once, VSFilter-style
//!   margins and scaling
//! - **Pluggable measurement**: [`measure::TextMeasurer`] trait, with a
//!   thread-safe cache
//! - **Batch friendly**: malformed karaoke skips one event, not the script;
//!   optional rayon parallelism
//!
//! ## Quick Start
//!
//! ```rust
//! use ass_fx_core::{emit::Emit, measure::FixedAdvanceMeasurer, FxConfig, FxSession, Script};
//!
//! let script = Script::parse(r#"
//! [Script Info]
//! PlayResX: 1280
//! PlayResY: 720
//!
//! [V4+ Styles]
//! Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
//! Style: Default,Arial,40,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,2,0,2,10,20,30,1
//!
//! [Events]
//! Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
//! Dialogue: 0,0:00:01.00,0:00:01.50,Default,,0,0,0,,{\k20}Hel{\k30}lo
//! "#)?;
//!
//! let mut session = FxSession::new(script, FixedAdvanceMeasurer::default(), FxConfig::default());
//! for line in session.lines()?.decompositions {
//!     for syllable in &line.syllables {
//!         let tags = format!("\\an5\\pos({},{})", syllable.bounds.center, syllable.bounds.middle);
//!         session.add(syllable.emit(&tags));
//!     }
//! }
//! let output = session.into_script();
//! assert!(output.to_ass_string().contains("{\\an5\\pos("));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod decompose;
pub mod emit;
pub mod karaoke;
pub mod layout;
pub mod measure;
pub mod script;
pub mod session;
pub mod utils;

pub use config::{FlowPolicy, FxConfig};
pub use decompose::{
    decompose_all, BatchOutcome, CharacterView, Decomposer, Decomposition, LineView,
    SyllableView,
};
pub use layout::{Alignment, Resolution};
pub use script::{Dialogue, Script, Style, Timestamp};
pub use session::FxSession;
pub use utils::FxError;

/// Result alias used throughout the crate
pub type Result<T> = core::result::Result<T, FxError>;

/// Crate version for runtime compatibility checks
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
