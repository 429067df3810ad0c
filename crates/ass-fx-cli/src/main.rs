//! `ass-fx`: split karaoke subtitles into per-syllable and per-character
//! events, or inspect how a script decomposes.

use anyhow::{bail, Context, Result};
use ass_fx_core::{
    emit::Emit,
    layout::Point,
    measure::{CachedMeasurer, FixedAdvanceMeasurer, TextMeasurer},
    BatchOutcome, FlowPolicy, FxConfig, FxError, FxSession, Resolution, Script,
};
use ass_fx_fonts::FontdbMeasurer;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

/// Karaoke decomposition for ASS subtitles
#[derive(Parser, Debug)]
#[command(name = "ass-fx", version, about)]
#[command(long_about = "Splits \\k-timed ASS karaoke lines into syllables and characters \
with absolute timing and positions.

EXAMPLES:
    ass-fx inspect song.ass                      # Show syllable timing and layout
    ass-fx inspect --json song.ass               # Same, as JSON
    ass-fx split song.ass -o fx.ass --by char    # One event per character
    ass-fx split song.ass -o fx.ass --pos --tags '\\fad(100,100)'")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    layout: LayoutArgs,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print how every karaoke line decomposes
    Inspect {
        /// Input ASS script
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Re-emit every line, syllable or character as its own event
    Split {
        /// Input ASS script
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output ASS script
        #[arg(short, long, value_name = "OUTPUT")]
        output: PathBuf,

        /// Unit each generated event covers
        #[arg(long, value_enum, default_value_t = Unit::Syllable)]
        by: Unit,

        /// Override tags placed on every generated event
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        tags: String,

        /// Prefix each event with \an<alignment>\pos(x,y)
        #[arg(long)]
        pos: bool,

        /// Do not keep the input lines as comments in the output
        #[arg(long)]
        no_original: bool,
    },
}

#[derive(Args, Debug)]
struct LayoutArgs {
    /// Extra directory of fonts to measure with
    #[arg(long, value_name = "DIR", global = true)]
    fonts_dir: Option<PathBuf>,

    /// Family used when a style's font is not installed
    #[arg(long, value_name = "FAMILY", global = true)]
    fallback_font: Option<String>,

    /// Measure every glyph as RATIO x font size instead of using fonts
    #[arg(long, value_name = "RATIO", global = true)]
    fixed_advance: Option<f64>,

    /// Canvas size, overriding PlayResX/PlayResY
    #[arg(long, value_name = "WxH", global = true)]
    resolution: Option<Resolution>,

    /// Lay out syllables left to right even for middle alignments
    #[arg(long, global = true)]
    horizontal_only: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Unit {
    Line,
    Syllable,
    Char,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            if let Some(hint) = hint(&err) {
                eprintln!("hint: {hint}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Suggestion attached to the first library error in the chain
fn hint(err: &anyhow::Error) -> Option<&'static str> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<FxError>())
        .and_then(FxError::suggestion)
}

fn run(cli: Cli) -> Result<()> {
    let measurer = build_measurer(&cli.layout)?;
    let mut config = FxConfig::default();
    if let Some(resolution) = cli.layout.resolution {
        config = config.with_resolution(resolution);
    }
    if cli.layout.horizontal_only {
        config = config.with_flow(FlowPolicy::Horizontal);
    }

    match cli.command {
        Command::Inspect { input, json } => {
            let script = read_script(&input)?;
            let session = FxSession::new(script, measurer, config);
            let outcome = session.lines().context("Failed to decompose script")?;
            let mut stdout = io::stdout().lock();
            if json {
                print_json(&mut stdout, &outcome)?;
            } else {
                print_text(&mut stdout, &outcome)?;
            }
        }
        Command::Split {
            input,
            output,
            by,
            tags,
            pos,
            no_original,
        } => {
            let script = read_script(&input)?;
            let config = config.with_keep_original(!no_original);
            let mut session = FxSession::new(script, measurer, config);
            let outcome = session.lines().context("Failed to decompose script")?;

            let mut generated = 0usize;
            for line in &outcome.decompositions {
                let events: Vec<_> = match by {
                    Unit::Line => vec![line.line.emit(&unit_tags(&tags, pos, &line.line))],
                    Unit::Syllable => line
                        .syllables
                        .iter()
                        .map(|s| s.emit(&unit_tags(&tags, pos, s)))
                        .collect(),
                    Unit::Char => line
                        .characters
                        .iter()
                        .map(|c| c.emit(&unit_tags(&tags, pos, c)))
                        .collect(),
                };
                generated += events.len();
                for event in events {
                    session.add(event);
                }
            }

            session
                .save(&output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            log::info!(
                "wrote {generated} events to {} ({} lines skipped)",
                output.display(),
                outcome.skipped.len()
            );
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn build_measurer(args: &LayoutArgs) -> Result<CachedMeasurer<Box<dyn TextMeasurer>>> {
    let measurer: Box<dyn TextMeasurer> = if let Some(ratio) = args.fixed_advance {
        if !(ratio.is_finite() && ratio > 0.0) {
            bail!("--fixed-advance must be a positive number, got {ratio}");
        }
        Box::new(FixedAdvanceMeasurer::new(ratio))
    } else {
        let mut fonts = FontdbMeasurer::new();
        if let Some(dir) = &args.fonts_dir {
            fonts.load_fonts_dir(dir);
        }
        if let Some(family) = &args.fallback_font {
            fonts = fonts.with_fallback(family.clone());
        }
        if fonts.face_count() == 0 {
            bail!("no fonts found; pass --fonts-dir or --fixed-advance");
        }
        Box::new(fonts)
    };
    Ok(CachedMeasurer::new(measurer))
}

fn read_script(path: &Path) -> Result<Script> {
    Script::from_file(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// A view with an alignment point
trait Placed: Emit {
    fn anchor(&self) -> (u8, Point);
}

macro_rules! impl_placed {
    ($($view:ty),+) => {
        $(impl Placed for $view {
            fn anchor(&self) -> (u8, Point) {
                (self.style.alignment.code(), self.pos)
            }
        })+
    };
}

impl_placed!(
    ass_fx_core::LineView,
    ass_fx_core::SyllableView,
    ass_fx_core::CharacterView
);

fn unit_tags(tags: &str, pos: bool, view: &impl Placed) -> String {
    let tags = ass_fx_core::emit::normalize_tags(tags);
    if !pos {
        return tags.to_string();
    }
    let (code, point) = view.anchor();
    format!(
        "\\an{code}\\pos({},{}){tags}",
        coordinate(point.x),
        coordinate(point.y)
    )
}

/// Pixel coordinate rounded to two decimals
fn coordinate(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn print_json(out: &mut impl Write, outcome: &BatchOutcome) -> Result<()> {
    let skipped: Vec<_> = outcome
        .skipped
        .iter()
        .map(|s| {
            serde_json::json!({
                "event_index": s.event_index,
                "error": s.error.to_string(),
                "hint": s.error.suggestion(),
            })
        })
        .collect();
    let document = serde_json::json!({
        "lines": outcome.decompositions,
        "skipped": skipped,
    });
    serde_json::to_writer_pretty(&mut *out, &document).context("Failed to encode JSON")?;
    writeln!(out)?;
    Ok(())
}

fn print_text(out: &mut impl Write, outcome: &BatchOutcome) -> Result<()> {
    for line in &outcome.decompositions {
        let view = &line.line;
        writeln!(
            out,
            "[{} - {}] {:?} style={} an{} size={}x{} pos=({}, {})",
            view.time.start,
            view.time.end,
            view.text,
            view.style.name,
            view.style.alignment.code(),
            coordinate(view.width),
            coordinate(view.height),
            coordinate(view.pos.x),
            coordinate(view.pos.y),
        )?;
        for syllable in &line.syllables {
            writeln!(
                out,
                "  #{:<3} [{} - {}] \\{}{:?} x={}..{} y={}..{}",
                syllable.index,
                syllable.time.start,
                syllable.time.end,
                syllable.mode.tag(),
                syllable.text,
                coordinate(syllable.bounds.left),
                coordinate(syllable.bounds.right),
                coordinate(syllable.bounds.top),
                coordinate(syllable.bounds.bottom),
            )?;
        }
    }
    for skipped in &outcome.skipped {
        writeln!(out, "skipped event {}: {}", skipped.event_index, skipped.error)?;
        if let Some(hint) = skipped.error.suggestion() {
            writeln!(out, "  hint: {hint}")?;
        }
    }
    Ok(())
}
