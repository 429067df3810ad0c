//! Benchmarks for karaoke decomposition
//!
//! Generates synthetic karaoke scripts programmatically and measures
//! parsing, single-event decomposition and whole-script batches with and
//! without a measurement cache.

use ass_fx_core::{
    decompose_all,
    karaoke::parse_syllables,
    measure::{CachedMeasurer, FixedAdvanceMeasurer},
    Decomposer, FxConfig, Resolution, Script,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::fmt::Write;

const SYLLABLES: [&str; 8] = ["ka", "ra", "o", "ke ", "no ", "u", "ta", "ga "];

/// Karaoke text with `count` syllables of 25 centiseconds
fn karaoke_line(count: usize) -> String {
    let mut text = String::new();
    for i in 0..count {
        let _ = write!(text, "{{\\k25}}{}", SYLLABLES[i % SYLLABLES.len()]);
    }
    text
}

/// Script with `events` karaoke lines of `syllables` syllables each
fn karaoke_script(events: usize, syllables: usize) -> String {
    let mut script = String::from(
        "[Script Info]\nTitle: Benchmark\nPlayResX: 1920\nPlayResY: 1080\n\n[V4+ Styles]\n\
         Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding\n\
         Style: Default,Arial,48,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,2,0,8,20,20,40,1\n\
         Style: Side,Arial,36,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,2,0,4,20,20,40,1\n\n\
         [Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n",
    );
    let text = karaoke_line(syllables);
    for i in 0..events {
        let start = i * 5;
        let style = if i % 4 == 0 { "Side" } else { "Default" };
        let _ = writeln!(
            script,
            "Dialogue: 0,0:{:02}:{:02}.00,0:{:02}:{:02}.00,{style},,0,0,0,,{text}",
            start / 60 % 60,
            start % 60,
            (start + 5) / 60 % 60,
            (start + 5) % 60,
        );
    }
    script
}

fn bench_parse_syllables(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_syllables");
    for count in [4, 16, 64] {
        let text = karaoke_line(count);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &text, |b, text| {
            b.iter(|| parse_syllables(black_box(text)));
        });
    }
    group.finish();
}

fn bench_single_event(c: &mut Criterion) {
    let script = Script::parse(&karaoke_script(4, 16)).expect("benchmark script should parse");
    let measurer = FixedAdvanceMeasurer::default();
    let decomposer = Decomposer::new(&measurer, Resolution::new(1920, 1080));

    let mut group = c.benchmark_group("decompose_event");
    for (label, index) in [("vertical", 0), ("horizontal", 1)] {
        let event = &script.events[index];
        let style = script
            .resolve_style(&event.style, "Default")
            .expect("benchmark style exists");
        group.bench_function(label, |b| {
            b.iter(|| decomposer.decompose(black_box(event), style.clone()));
        });
    }
    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompose_all");
    let config = FxConfig::default();
    for events in [10, 100, 500] {
        let script =
            Script::parse(&karaoke_script(events, 12)).expect("benchmark script should parse");
        group.throughput(Throughput::Elements(events as u64));

        group.bench_with_input(BenchmarkId::new("uncached", events), &script, |b, script| {
            let measurer = FixedAdvanceMeasurer::default();
            b.iter(|| decompose_all(black_box(script), &measurer, &config));
        });
        group.bench_with_input(BenchmarkId::new("cached", events), &script, |b, script| {
            let measurer = CachedMeasurer::new(FixedAdvanceMeasurer::default());
            b.iter(|| decompose_all(black_box(script), &measurer, &config));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse_syllables, bench_single_event, bench_batch);
criterion_main!(benches);
