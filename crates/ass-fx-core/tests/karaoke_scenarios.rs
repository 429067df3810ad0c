//! End-to-end karaoke decomposition scenarios
//!
//! Each test parses a small script, decomposes it and checks the timing
//! and placement a karaoke effect would rely on.

use ass_fx_core::{
    decompose_all, emit::Emit, karaoke::parse_syllables, measure::FixedAdvanceMeasurer, Alignment,
    Decomposer, FxConfig, FxError, Resolution, Script, Style,
};
use std::sync::Arc;

const HEADER: &str = "[Script Info]
PlayResX: 1280
PlayResY: 720

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
Style: Default,Arial,40,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,2,0,2,10,20,30,1

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
";

fn script_with(events: &[&str]) -> Script {
    let mut text = HEADER.to_string();
    for event in events {
        text.push_str(event);
        text.push('\n');
    }
    Script::parse(&text).expect("test script should parse")
}

fn spans<'a>(items: impl Iterator<Item = (&'a str, i64, i64)>) -> Vec<(String, i64, i64)> {
    items.map(|(t, s, e)| (t.to_string(), s, e)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn syllables_tile_the_line() {
        let script = script_with(&["Dialogue: 0,0:00:00.00,0:00:00.50,Default,,0,0,0,,{\\k20}Hel{\\k30}lo"]);
        let outcome = decompose_all(&script, &FixedAdvanceMeasurer::default(), &FxConfig::default())
            .expect("batch should succeed");

        assert_eq!(outcome.decompositions.len(), 1);
        let line = &outcome.decompositions[0];
        assert_eq!(line.line.text, "Hello");
        assert_eq!(line.line.syllable_count, 2);
        assert_eq!(line.line.char_count, 5);
        assert_eq!(
            spans(line.syllables.iter().map(|s| (s.text.as_str(), s.time.start, s.time.end))),
            vec![("Hel".to_string(), 0, 200), ("lo".to_string(), 200, 500)]
        );
    }

    #[test]
    fn characters_split_evenly() {
        let script = script_with(&["Dialogue: 0,0:00:00.00,0:00:00.30,Default,,0,0,0,,{\\k30}cat"]);
        let outcome = decompose_all(&script, &FixedAdvanceMeasurer::default(), &FxConfig::default())
            .expect("batch should succeed");

        let line = &outcome.decompositions[0];
        assert_eq!(
            spans(line.characters.iter().map(|c| (c.text.as_str(), c.time.start, c.time.end))),
            vec![
                ("c".to_string(), 0, 100),
                ("a".to_string(), 100, 200),
                ("t".to_string(), 200, 300),
            ]
        );
        assert!(line.characters.iter().all(|c| c.syllable_time == line.syllables[0].time));
    }

    #[test]
    fn last_character_absorbs_remainder() {
        let measurer = FixedAdvanceMeasurer::default();
        let script = script_with(&["Dialogue: 0,0:00:00.00,0:00:03.00,Default,,0,0,0,,{\\k300}hi"]);
        let style = script.resolve_style("Default", "Default").expect("style exists");
        let decomposer = Decomposer::new(&measurer, Resolution::new(1280, 720));
        let line = decomposer
            .decompose(&script.events[0], style)
            .expect("decomposition should succeed");

        let retimed = line.syllables[0].with_timing(0, 301);
        let characters = decomposer.characters(&retimed).expect("characters should measure");
        assert_eq!(
            spans(characters.iter().map(|c| (c.text.as_str(), c.time.start, c.time.end))),
            vec![("h".to_string(), 0, 150), ("i".to_string(), 150, 301)]
        );
    }

    #[test]
    fn bottom_center_line_is_centered() {
        // ten glyphs at 0.25 * 40px
        let measurer = FixedAdvanceMeasurer::new(0.25);
        let script = script_with(&["Dialogue: 0,0:00:00.00,0:00:01.00,Default,,0,0,0,,{\\k100}abcdefghij"]);
        let outcome = decompose_all(&script, &measurer, &FxConfig::default())
            .expect("batch should succeed");

        let line = &outcome.decompositions[0].line;
        assert_eq!(line.width, 100.0);
        assert_eq!(line.active.x, 590.0);
        assert_eq!(line.bounds.left, 590.0);
        assert_eq!(line.bounds.right, 690.0);
        assert_eq!(line.bounds.bottom, 690.0);
        assert_eq!(line.style.alignment, Alignment::BOTTOM_CENTER);
    }

    #[test]
    fn malformed_marker_skips_only_its_event() {
        let descriptors = parse_syllables("{\\k20}Hel{\\k30}lo").expect("valid markers");
        let parsed: Vec<_> = descriptors
            .iter()
            .map(|d| (d.text.as_str(), d.duration_ms()))
            .collect();
        assert_eq!(parsed, vec![("Hel", 200), ("lo", 300)]);

        let script = script_with(&[
            "Dialogue: 0,0:00:00.00,0:00:00.50,Default,,0,0,0,,{\\k20}Hel{\\k30}lo",
            "Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,{\\kXY}broken",
            "Dialogue: 0,0:00:02.00,0:00:02.40,Default,,0,0,0,,{\\k40}ok",
        ]);
        let outcome = decompose_all(&script, &FixedAdvanceMeasurer::default(), &FxConfig::default())
            .expect("malformed markers are recoverable");

        let texts: Vec<_> = outcome
            .decompositions
            .iter()
            .map(|d| d.line.text.as_str())
            .collect();
        assert_eq!(texts, vec!["Hello", "ok"]);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].event_index, 1);
        assert!(matches!(outcome.skipped[0].error, FxError::Annotation { .. }));
    }

    #[test]
    fn comment_events_are_not_decomposed() {
        let script = script_with(&[
            "Comment: 0,0:00:00.00,0:00:00.50,Default,,0,0,0,,{\\k50}skip",
            "Dialogue: 0,0:00:00.00,0:00:00.50,Default,,0,0,0,,{\\k50}keep",
        ]);
        let outcome = decompose_all(&script, &FixedAdvanceMeasurer::default(), &FxConfig::default())
            .expect("batch should succeed");
        assert_eq!(outcome.decompositions.len(), 1);
        assert_eq!(outcome.decompositions[0].line.text, "keep");
    }

    #[test]
    fn emitted_syllables_round_to_centiseconds() {
        let script = script_with(&["Dialogue: 1,0:00:10.00,0:00:10.50,Default,Mio,0,0,0,,{\\k20}Hel{\\k30}lo"]);
        let outcome = decompose_all(&script, &FixedAdvanceMeasurer::default(), &FxConfig::default())
            .expect("batch should succeed");

        let lines: Vec<_> = outcome.decompositions[0]
            .syllables
            .iter()
            .map(|s| s.emit("{\\an5}").to_ass_string())
            .collect();
        assert_eq!(
            lines,
            vec![
                "Dialogue: 1,0:00:10.00,0:00:10.20,Default,Mio,0,0,0,,{\\an5}Hel",
                "Dialogue: 1,0:00:10.20,0:00:10.50,Default,Mio,0,0,0,,{\\an5}lo",
            ]
        );
    }

    #[test]
    fn unreferenced_fallback_style_is_used() {
        let script = script_with(&["Dialogue: 0,0:00:00.00,0:00:00.50,Karaoke,,0,0,0,,{\\k50}la"]);
        let outcome = decompose_all(&script, &FixedAdvanceMeasurer::default(), &FxConfig::default())
            .expect("fallback style resolves");
        let line = &outcome.decompositions[0].line;
        assert_eq!(line.style.name, "Default");
        assert_eq!(line.meta.style_name, "Karaoke");
        assert_eq!(line.emit("").style, "Karaoke");
    }

    #[test]
    fn views_are_snapshots() {
        let measurer = FixedAdvanceMeasurer::default();
        let decomposer = Decomposer::new(&measurer, Resolution::FALLBACK);
        let script = script_with(&["Dialogue: 0,0:00:00.00,0:00:00.50,Default,,0,0,0,,{\\k20}Hel{\\k30}lo"]);
        let style: Arc<Style> = script.resolve_style("Default", "Default").expect("style exists");

        let first = decomposer
            .decompose(&script.events[0], Arc::clone(&style))
            .expect("decomposition should succeed");
        let moved = first.syllables[1].with_layer(4).with_timing(1000, 2000);
        let second = decomposer
            .decompose(&script.events[0], style)
            .expect("decomposition should succeed");

        assert_eq!(first, second);
        assert_eq!(moved.meta.layer, 4);
        assert_eq!(moved.time.duration, 1000);
        assert_eq!(moved.time.mid, 1500);
        assert_eq!(second.syllables[1].meta.layer, 0);
    }

    fn syllable_spans(script: &Script) -> Vec<(String, i64, i64)> {
        let outcome = decompose_all(script, &FixedAdvanceMeasurer::default(), &FxConfig::default())
            .expect("batch should succeed");
        spans(
            outcome.decompositions[0]
                .syllables
                .iter()
                .map(|s| (s.text.as_str(), s.time.start, s.time.end)),
        )
    }

    #[test]
    fn trailing_blank_marker_extends_last_syllable() {
        let script = script_with(&["Dialogue: 0,0:00:00.00,0:00:01.00,Default,,0,0,0,,{\\k20}a{\\k30}"]);
        assert_eq!(syllable_spans(&script), vec![("a".to_string(), 0, 1000)]);
    }

    #[test]
    fn leading_empty_syllable_delays_first() {
        let script = script_with(&["Dialogue: 0,0:00:00.00,0:00:00.50,Default,,0,0,0,,{\\k20}{\\k30}ab"]);
        assert_eq!(syllable_spans(&script), vec![("ab".to_string(), 200, 500)]);

        let outcome = decompose_all(&script, &FixedAdvanceMeasurer::default(), &FxConfig::default())
            .expect("batch should succeed");
        let line = &outcome.decompositions[0];
        assert_eq!(
            spans(line.characters.iter().map(|c| (c.text.as_str(), c.time.start, c.time.end))),
            vec![("a".to_string(), 200, 350), ("b".to_string(), 350, 500)]
        );
    }

    #[test]
    fn interior_empty_syllable_leaves_gap() {
        let script = script_with(&["Dialogue: 0,0:00:00.00,0:00:01.00,Default,,0,0,0,,{\\k20}ka{\\k30}{\\k50}ra"]);
        assert_eq!(
            syllable_spans(&script),
            vec![("ka".to_string(), 0, 200), ("ra".to_string(), 500, 1000)]
        );
    }

    #[test]
    fn space_only_syllable_leaves_gap_and_cursor() {
        let script = script_with(&["Dialogue: 0,0:00:00.00,0:00:01.00,Default,,0,0,0,,{\\k20}ka{\\k30} {\\k50}ra"]);
        let outcome = decompose_all(&script, &FixedAdvanceMeasurer::default(), &FxConfig::default())
            .expect("batch should succeed");
        let line = &outcome.decompositions[0];

        assert_eq!(line.line.text, "ka ra");
        assert_eq!(line.syllables[1].time.start, 500);
        // 40px font at half advance: the space is 20px
        assert_eq!(line.syllables[1].bounds.left, line.syllables[0].bounds.right + 20.0);
        assert_eq!(line.syllables[1].bounds.right, line.line.bounds.right);
    }
}
