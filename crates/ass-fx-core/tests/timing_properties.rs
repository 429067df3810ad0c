//! Property-based tests for decomposition timing and flow
//!
//! Uses proptest to check that syllables and characters tile their parent
//! windows without drift, whatever the marker durations and line length.

use ass_fx_core::{
    measure::FixedAdvanceMeasurer, script::Dialogue, Alignment, Decomposer, Resolution, Style,
    Timestamp,
};
use proptest::prelude::*;
use std::sync::Arc;

/// Syllables as (centisecond duration, text) with visible text only
fn arb_syllables() -> impl Strategy<Value = Vec<(u32, String)>> {
    prop::collection::vec((0..200u32, "[a-zA-Z]{1,6}"), 1..8)
}

/// Syllables that may be empty, space-only or space-padded
fn arb_padded_syllables() -> impl Strategy<Value = Vec<(u32, String)>> {
    prop::collection::vec((0..200u32, " ?[a-zA-Z]{0,6} ?"), 1..8)
}

fn karaoke_text(syllables: &[(u32, String)]) -> String {
    syllables
        .iter()
        .map(|(cs, text)| format!("{{\\k{cs}}}{text}"))
        .collect()
}

fn event(syllables: &[(u32, String)], start_cs: u32, slack_cs: u32) -> Dialogue {
    let total: u32 = syllables.iter().map(|(cs, _)| cs).sum();
    Dialogue {
        start: Timestamp::from_centis(start_cs),
        end: Timestamp::from_centis(start_cs + total + slack_cs),
        ..Dialogue::new(karaoke_text(syllables))
    }
}

fn style(alignment: Alignment) -> Arc<Style> {
    Arc::new(Style {
        fontsize: 24.0,
        alignment,
        ..Style::default()
    })
}

proptest! {
    #[test]
    fn syllables_tile_line_window(
        syllables in arb_syllables(),
        start_cs in 0..100_000u32,
        slack_cs in 0..300u32,
    ) {
        let measurer = FixedAdvanceMeasurer::default();
        let event = event(&syllables, start_cs, slack_cs);
        let result = Decomposer::new(&measurer, Resolution::FALLBACK)
            .decompose(&event, style(Alignment::BOTTOM_CENTER))
            .unwrap();

        prop_assert_eq!(result.syllables.len(), syllables.len());
        prop_assert_eq!(result.syllables[0].time.start, result.line.time.start);
        prop_assert_eq!(result.syllables.last().unwrap().time.end, result.line.time.end);

        let total: i64 = result.syllables.iter().map(|s| s.time.duration).sum();
        prop_assert_eq!(total, result.line.time.duration);

        for pair in result.syllables.windows(2) {
            prop_assert_eq!(pair[0].time.end, pair[1].time.start);
        }
        let joined: String = result.syllables.iter().map(|s| s.text.as_str()).collect();
        prop_assert_eq!(joined, result.line.text.clone());
        for (view, (cs, _)) in result.syllables.iter().zip(&syllables).take(syllables.len() - 1) {
            prop_assert_eq!(view.time.duration, i64::from(*cs) * 10);
        }
    }

    #[test]
    fn characters_tile_syllable_window(
        syllables in arb_syllables(),
        slack_cs in 0..300u32,
    ) {
        let measurer = FixedAdvanceMeasurer::default();
        let result = Decomposer::new(&measurer, Resolution::FALLBACK)
            .decompose(&event(&syllables, 0, slack_cs), style(Alignment::BOTTOM_CENTER))
            .unwrap();

        let total_chars: usize = syllables.iter().map(|(_, t)| t.len()).sum();
        prop_assert_eq!(result.characters.len(), total_chars);
        prop_assert_eq!(result.line.char_count, total_chars);

        for syllable in &result.syllables {
            let chars: Vec<_> = result.characters_of(syllable.index).collect();
            prop_assert_eq!(chars.len(), syllable.text.len());
            prop_assert_eq!(chars[0].time.start, syllable.time.start);
            prop_assert_eq!(chars.last().unwrap().time.end, syllable.time.end);

            let sum: i64 = chars.iter().map(|c| c.time.duration).sum();
            prop_assert_eq!(sum, syllable.time.duration);
            for pair in chars.windows(2) {
                prop_assert_eq!(pair[0].time.end, pair[1].time.start);
            }

            let joined: String = chars.iter().map(|c| c.text.as_str()).collect();
            prop_assert_eq!(joined, syllable.text.clone());
        }
    }

    #[test]
    fn horizontal_cursor_moves_right(syllables in arb_syllables()) {
        let measurer = FixedAdvanceMeasurer::default();
        let result = Decomposer::new(&measurer, Resolution::FALLBACK)
            .decompose(&event(&syllables, 0, 0), style(Alignment::TOP_LEFT))
            .unwrap();

        for pair in result.syllables.windows(2) {
            prop_assert!(pair[0].bounds.right <= pair[1].bounds.left);
        }
        for pair in result.characters.windows(2) {
            prop_assert!(pair[0].bounds.left < pair[1].bounds.left);
        }
        let last = result.syllables.last().unwrap();
        prop_assert!((last.bounds.right - result.line.bounds.right).abs() < 1e-9);
    }

    #[test]
    fn vertical_stack_moves_down(syllables in arb_syllables()) {
        let measurer = FixedAdvanceMeasurer::default();
        let result = Decomposer::new(&measurer, Resolution::FALLBACK)
            .decompose(&event(&syllables, 0, 0), style(Alignment::MIDDLE_CENTER))
            .unwrap();

        for pair in result.syllables.windows(2) {
            prop_assert!((pair[0].bounds.bottom - pair[1].bounds.top).abs() < 1e-9);
        }
    }

    #[test]
    fn decomposition_is_idempotent(syllables in arb_padded_syllables(), start_cs in 0..10_000u32) {
        let measurer = FixedAdvanceMeasurer::default();
        let decomposer = Decomposer::new(&measurer, Resolution::FALLBACK);
        let event = event(&syllables, start_cs, 7);
        let first = decomposer.decompose(&event, style(Alignment::BOTTOM_RIGHT)).unwrap();
        let second = decomposer.decompose(&event, style(Alignment::BOTTOM_RIGHT)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn blank_syllables_keep_cursor_offsets(
        syllables in arb_padded_syllables(),
        start_cs in 0..100_000u32,
        slack_cs in 0..300u32,
    ) {
        let measurer = FixedAdvanceMeasurer::default();
        let event = event(&syllables, start_cs, slack_cs);
        let result = Decomposer::new(&measurer, Resolution::FALLBACK)
            .decompose(&event, style(Alignment::BOTTOM_CENTER))
            .unwrap();

        let offsets: Vec<i64> = syllables
            .iter()
            .scan(result.line.time.start, |cursor, (cs, _)| {
                let start = *cursor;
                *cursor += i64::from(*cs) * 10;
                Some(start)
            })
            .collect();
        let visible: Vec<usize> = syllables
            .iter()
            .enumerate()
            .filter(|(_, (_, text))| !text.trim().is_empty())
            .map(|(index, _)| index)
            .collect();

        prop_assert_eq!(result.syllables.len(), visible.len());
        if visible.is_empty() {
            prop_assert!(result.characters.is_empty());
            return Ok(());
        }

        let last = visible.len() - 1;
        for (position, (view, &index)) in result.syllables.iter().zip(&visible).enumerate() {
            prop_assert_eq!(view.time.start, offsets[index]);
            prop_assert_eq!(view.text.as_str(), syllables[index].1.trim());
            if position == last {
                prop_assert_eq!(view.time.end, result.line.time.end);
            } else {
                prop_assert_eq!(view.time.end, offsets[index + 1]);
            }
        }
        for pair in result.syllables.windows(2) {
            prop_assert!(pair[0].time.end <= pair[1].time.start);
            prop_assert!(pair[0].bounds.right <= pair[1].bounds.left);
        }

        let joined: String = result.syllables.iter().map(|s| s.text.as_str()).collect();
        prop_assert_eq!(joined, result.line.text.replace(' ', ""));
        let right = result.syllables[last].bounds.right;
        prop_assert!((right - result.line.bounds.right).abs() < 1e-9);
        prop_assert!((result.syllables[0].bounds.left - result.line.bounds.left).abs() < 1e-9);

        for syllable in &result.syllables {
            let chars: Vec<_> = result.characters_of(syllable.index).collect();
            prop_assert_eq!(chars[0].time.start, syllable.time.start);
            prop_assert_eq!(chars.last().unwrap().time.end, syllable.time.end);
            let sum: i64 = chars.iter().map(|c| c.time.duration).sum();
            prop_assert_eq!(sum, syllable.time.duration);
        }
    }
}
