//! Property-based tests for the frame differ.
//!
//! These tests use proptest to verify:
//! - Diffing a frame against itself emits nothing
//! - The differ keeps no state between calls
//! - Output only contains printable text and the expected control bytes
//! - Full redraws always cover every frame attribute
//! - A blanked row costs exactly one erase-to-end-of-line

#![cfg(test)]

use proptest::prelude::*;

use super::{Cell, CellAttrs, Color, Display, Frame, Rendition};
use crate::config::DisplayConfig;
use crate::constants::{CLEAR_SCREEN, ERASE_TO_EOL, OSC_TITLE_START};

// =============================================================================
// Arbitrary Generators
// =============================================================================

fn arb_color() -> impl Strategy<Value = Color> {
    prop_oneof![
        Just(Color::Default),
        (0u8..=255).prop_map(Color::Indexed),
        (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Color::Rgb(r, g, b)),
    ]
}

prop_compose! {
    fn arb_rendition()(
        fg in arb_color(),
        bg in prop_oneof![3 => Just(Color::Default), 1 => arb_color()],
        bold in any::<bool>(),
        underline in any::<bool>(),
    ) -> Rendition {
        Rendition::new(fg, bg, CellAttrs { bold, underline, ..Default::default() })
    }
}

fn arb_cell() -> impl Strategy<Value = Cell> {
    prop_oneof![
        2 => Just(Cell::default()),
        1 => arb_rendition().prop_map(Cell::blank),
        4 => (prop::char::range('a', 'e'), arb_rendition())
            .prop_map(|(ch, rendition)| Cell::new(ch).with_rendition(rendition)),
    ]
}

prop_compose! {
    fn arb_frame()(cols in 1u16..12, rows in 1u16..8)(
        cells in prop::collection::vec(arb_cell(), usize::from(cols) * usize::from(rows)),
        wraps in prop::collection::vec(any::<bool>(), usize::from(rows)),
        cursor_row in 0..rows,
        cursor_col in 0..cols,
        visible in any::<bool>(),
        rendition in arb_rendition(),
        reverse_video in any::<bool>(),
        title in "[a-z ]{0,8}",
        bell_count in 0u64..3,
        cols in Just(cols),
        rows in Just(rows),
    ) -> Frame {
        let mut frame = Frame::new(cols, rows);
        for (i, cell) in cells.into_iter().enumerate() {
            frame.set(i as u16 % cols, i as u16 / cols, cell);
        }
        for (row, wrap) in wraps.into_iter().enumerate() {
            frame.row_mut(row as u16).wrap = wrap;
        }
        frame.cursor.row = cursor_row;
        frame.cursor.col = cursor_col;
        frame.cursor.visible = visible;
        frame.rendition = rendition;
        frame.reverse_video = reverse_video;
        frame.title = title;
        frame.bell_count = bell_count;
        frame
    }
}

/// A pair of frames sharing geometry, the second a light edit of the first.
fn arb_frame_pair() -> impl Strategy<Value = (Frame, Frame)> {
    arb_frame().prop_flat_map(|last| {
        let cols = last.cols();
        let rows = last.rows();
        let edits = prop::collection::vec((0..cols, 0..rows, arb_cell()), 0..6);
        (Just(last), edits).prop_map(|(last, edits)| {
            let mut frame = last.clone();
            for (col, row, cell) in edits {
                frame.set(col, row, cell);
            }
            (last, frame)
        })
    })
}

fn is_allowed_byte(byte: u8) -> bool {
    byte >= 0x20 || matches!(byte, 0x07 | b'\n' | 0x1b)
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn identical_frames_emit_nothing(frame in arb_frame()) {
        let display = Display::default();
        prop_assert!(display.new_frame(true, &frame, &frame).is_empty());
    }

    #[test]
    fn transition_does_not_depend_on_earlier_calls((last, frame) in arb_frame_pair()) {
        let display = Display::default();
        let first = display.new_frame(true, &last, &frame);
        let _ = display.new_frame(false, &frame, &last);
        prop_assert_eq!(display.new_frame(true, &last, &frame), first);
    }

    #[test]
    fn output_bytes_are_printable_or_control(
        (last, frame) in arb_frame_pair(),
        initialized in any::<bool>(),
        has_ech in any::<bool>(),
    ) {
        let display = Display::new(DisplayConfig::new().with_ech(has_ech));
        let output = display.new_frame(initialized, &last, &frame);
        prop_assert!(output.iter().copied().all(is_allowed_byte));
        prop_assert!(String::from_utf8(output).is_ok());
    }

    #[test]
    fn full_redraw_sets_every_attribute(last in arb_frame(), frame in arb_frame()) {
        let display = Display::default();
        let output = String::from_utf8(display.new_frame(false, &last, &frame)).unwrap();

        let title = format!("{OSC_TITLE_START}{}\x1b\\", frame.title);
        prop_assert!(output.contains(&title));
        prop_assert!(output.contains(CLEAR_SCREEN));
        prop_assert!(output.ends_with(&frame.rendition.sgr()));

        let cursor = format!("\x1b[{};{}H", frame.cursor.row + 1, frame.cursor.col + 1);
        prop_assert!(output.contains(&cursor));
    }

    #[test]
    fn blanked_row_costs_one_erase(
        cols in 2u16..12,
        rows in 1u16..6,
        blanked in 0u16..6,
    ) {
        let blanked = blanked % rows;

        // Every row starts with a distinct glyph, so no scroll can match.
        let mut last = Frame::new(cols, rows);
        for row in 0..rows {
            let key = char::from(b'A' + row as u8);
            for col in 0..cols {
                last.set(col, row, Cell::new(if col == 0 { key } else { 'x' }));
            }
        }
        last.cursor.visible = false;

        let mut frame = last.clone();
        frame.row_mut(blanked).reset(Rendition::default());

        let output = String::from_utf8(Display::default().new_frame(true, &last, &frame)).unwrap();
        prop_assert_eq!(output.matches(ERASE_TO_EOL).count(), 1);
        prop_assert!(!output.contains('x'));
    }
}
