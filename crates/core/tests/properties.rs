// TtyCon - Serial Console Firmware
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

mod common;

use common::Terminal;
use proptest::prelude::*;
use ttycon_core::{LineEditor, RingBuffer};

const SLOTS: usize = 32;
const RUB_OUT: &[u8] = b"\x08 \x08";

/// Printable bytes and spaces, never an editing control code.
fn text() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop_oneof![Just(b' '), 0x21u8..0x7f], 0..SLOTS - 2)
}

fn typed<const N: usize>(editor: &LineEditor<N>) -> Vec<u8> {
    editor.buffer().iter().collect()
}

proptest! {
    #[test]
    fn test_ring_is_fifo(
        offset in 0usize..SLOTS,
        bytes in prop::collection::vec(any::<u8>(), 0..SLOTS),
    ) {
        let mut ring = RingBuffer::<SLOTS>::new();
        // Start from an arbitrary cursor position.
        for _ in 0..offset {
            ring.push(0).unwrap();
            ring.pop().unwrap();
        }

        for &b in &bytes {
            ring.push(b).unwrap();
        }
        prop_assert_eq!(ring.len(), bytes.len());

        let popped: Vec<u8> = std::iter::from_fn(|| ring.pop()).collect();
        prop_assert_eq!(popped, bytes);
        prop_assert!(ring.is_empty());
    }

    #[test]
    fn test_erase_char_removes_exactly_one(line in text()) {
        let mut editor = LineEditor::<SLOTS>::new();
        let mut term = Terminal::default();
        for &b in &line {
            editor.feed(b, &mut term).unwrap();
        }
        term.screen.clear();

        editor.feed(0x08, &mut term).unwrap();
        if line.is_empty() {
            prop_assert_eq!(editor.buffer().len(), 0);
            prop_assert_eq!(term.screen, vec![0x07u8]);
        } else {
            prop_assert_eq!(editor.buffer().len(), line.len() - 1);
            prop_assert_eq!(term.screen, RUB_OUT.to_vec());
        }
    }

    #[test]
    fn test_erase_word_stops_at_whitespace(line in text()) {
        let mut editor = LineEditor::<SLOTS>::new();
        let mut term = Terminal::default();
        for &b in &line {
            editor.feed(b, &mut term).unwrap();
        }
        term.screen.clear();

        editor.feed(0x17, &mut term).unwrap();

        let kept = match line.iter().rposition(|&b| b == b' ') {
            Some(space) => space + 1,
            None => 0,
        };
        prop_assert_eq!(typed(&editor), line[..kept].to_vec());
        prop_assert_eq!(term.screen, RUB_OUT.repeat(line.len() - kept));
    }

    #[test]
    fn test_erase_line_backs_up_every_byte(line in text()) {
        let mut editor = LineEditor::<SLOTS>::new();
        let mut term = Terminal::default();
        for &b in &line {
            editor.feed(b, &mut term).unwrap();
        }
        term.screen.clear();

        editor.feed(0x15, &mut term).unwrap();
        prop_assert!(editor.buffer().is_empty());
        prop_assert_eq!(term.screen, RUB_OUT.repeat(line.len()));
    }

    #[test]
    fn test_echo_matches_buffer(keys in prop::collection::vec(
        prop_oneof![0x20u8..0x7f, Just(0x08), Just(0x7f), Just(0x15), Just(0x17)],
        0..64,
    )) {
        // Replaying the screen output on a dumb terminal must reproduce the
        // buffered text.
        let mut editor = LineEditor::<SLOTS>::new();
        let mut term = Terminal::default();
        for &b in &keys {
            editor.feed(b, &mut term).unwrap();
        }

        let mut shown: Vec<u8> = Vec::new();
        let mut screen = term.screen.as_slice();
        while let Some((&b, rest)) = screen.split_first() {
            if rest.starts_with(&RUB_OUT[1..]) && b == 0x08 {
                shown.pop();
                screen = &rest[2..];
                continue;
            }
            if b != 0x07 {
                shown.push(b);
            }
            screen = rest;
        }
        prop_assert_eq!(shown, typed(&editor));
        prop_assert!(editor.buffer().len() <= SLOTS - 2);
    }
}
