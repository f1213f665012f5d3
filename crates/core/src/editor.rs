// TtyCon - Serial Console Firmware
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Interactive line editor.
//!
//! Raw bytes arrive one at a time from the transport and are applied to the
//! line buffer with terminal feedback:
//!
//! | input          | effect                                         |
//! |----------------|------------------------------------------------|
//! | `CR`           | append `LF`, echo `CR LF`, line complete       |
//! | `BS` / `DEL`   | erase one character (bell if the line is empty)|
//! | Ctrl-W         | erase back to the previous whitespace          |
//! | Ctrl-U         | erase the whole line                           |
//! | anything else  | append and echo (bell if the line is full)     |
//!
//! Editing mistakes are only ever reported to the operator with a bell; the
//! only error returned to callers is a transport failure.

use crate::config::ascii::{BEL, BS, CR, DEL, ETB, LF, NAK};
use crate::ring::RingBuffer;
use crate::transport::ByteTransport;
#[cfg(feature = "tracing")]
use tracing::trace;

/// Terminal sequence that visually erases the character left of the cursor.
const RUB_OUT: [u8; 3] = [BS, b' ', BS];

/// Result of feeding one byte to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    Pending,
    LineComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Submit,
    EraseChar,
    EraseWord,
    EraseLine,
    Insert(u8),
}

impl Key {
    fn classify(byte: u8) -> Self {
        match byte {
            CR => Key::Submit,
            BS | DEL => Key::EraseChar,
            ETB => Key::EraseWord,
            NAK => Key::EraseLine,
            other => Key::Insert(other),
        }
    }
}

/// C `isspace` in the "C" locale, which unlike
/// [`u8::is_ascii_whitespace`] includes vertical tab.
fn is_space(byte: u8) -> bool {
    byte.is_ascii_whitespace() || byte == 0x0b
}

/// Line editor over an `N`-slot ring buffer.
///
/// A completed line stays in the buffer until a consumer has drained all of
/// it; only then does [`LineEditor::fill_line`] start accepting a new one.
#[derive(Debug, Clone, Default)]
pub struct LineEditor<const N: usize> {
    buf: RingBuffer<N>,
}

impl<const N: usize> LineEditor<N> {
    pub const fn new() -> Self {
        Self {
            buf: RingBuffer::new(),
        }
    }

    pub fn buffer(&self) -> &RingBuffer<N> {
        &self.buf
    }

    /// True once every byte of the previous line has been consumed.
    pub fn is_drained(&self) -> bool {
        self.buf.is_empty()
    }

    /// Block on the transport until a full line has been typed.
    ///
    /// Returns immediately, without touching the transport, while a previous
    /// line is still buffered.
    pub fn fill_line<T>(&mut self, io: &mut T) -> Result<(), T::Error>
    where
        T: ByteTransport + ?Sized,
    {
        if !self.is_drained() {
            #[cfg(feature = "tracing")]
            trace!(pending = self.buf.len(), "line still buffered, not reading");
            return Ok(());
        }
        loop {
            let byte = io.recv_blocking()?;
            if self.feed(byte, io)? == Feed::LineComplete {
                return Ok(());
            }
        }
    }

    /// Apply a single input byte to the line under construction.
    ///
    /// `fill_line` is this in a loop; hosts with their own input pump can call
    /// it directly, as long as they only start a new line once
    /// [`is_drained`](Self::is_drained) holds.
    pub fn feed<T>(&mut self, byte: u8, io: &mut T) -> Result<Feed, T::Error>
    where
        T: ByteTransport + ?Sized,
    {
        match Key::classify(byte) {
            Key::Submit => {
                // Inserts stop one slot short, so the terminator always fits.
                if self.buf.push(LF).is_err() {
                    return self.bell(io).map(|()| Feed::Pending);
                }
                io.send_all(&[CR, LF])?;
                #[cfg(feature = "tracing")]
                trace!(len = self.buf.len(), "line complete");
                return Ok(Feed::LineComplete);
            }
            Key::EraseChar => {
                if self.buf.is_empty() {
                    self.bell(io)?;
                } else {
                    self.back_up(io)?;
                }
            }
            Key::EraseWord => {
                while let Some(last) = self.buf.last() {
                    if is_space(last) {
                        break;
                    }
                    self.back_up(io)?;
                }
            }
            Key::EraseLine => {
                while !self.buf.is_empty() {
                    self.back_up(io)?;
                }
            }
            Key::Insert(byte) => {
                if self.buf.len() >= N - 2 {
                    self.bell(io)?;
                } else if self.buf.push(byte).is_ok() {
                    io.send_blocking(byte)?;
                }
            }
        }
        Ok(Feed::Pending)
    }

    /// Copy up to `dest.len()` buffered bytes out, oldest first.
    pub fn drain_into(&mut self, dest: &mut [u8]) -> usize {
        let mut copied = 0;
        for slot in dest.iter_mut() {
            match self.buf.pop() {
                Some(byte) => {
                    *slot = byte;
                    copied += 1;
                }
                None => break,
            }
        }
        copied
    }

    fn back_up<T>(&mut self, io: &mut T) -> Result<(), T::Error>
    where
        T: ByteTransport + ?Sized,
    {
        if self.buf.erase_last().is_some() {
            io.send_all(&RUB_OUT)?;
        }
        Ok(())
    }

    fn bell<T>(&self, io: &mut T) -> Result<(), T::Error>
    where
        T: ByteTransport + ?Sized,
    {
        #[cfg(feature = "tracing")]
        trace!(len = self.buf.len(), "bell");
        io.send_blocking(BEL)
    }
}

#[cfg(test)]
mod tests {
    use super::{Feed, LineEditor};
    use crate::testlib::Wire;

    fn typed<const N: usize>(editor: &LineEditor<N>) -> Vec<u8> {
        editor.buffer().iter().collect()
    }

    fn feed_all<const N: usize>(editor: &mut LineEditor<N>, wire: &mut Wire, input: &[u8]) {
        for &b in input {
            editor.feed(b, wire).unwrap();
        }
    }

    #[test]
    fn test_insert_echoes_verbatim() {
        let mut editor = LineEditor::<16>::new();
        let mut wire = Wire::default();
        feed_all(&mut editor, &mut wire, b"hi there");
        assert_eq!(typed(&editor), b"hi there");
        assert_eq!(wire.sent, b"hi there");
    }

    #[test]
    fn test_erase_char_on_empty_rings_bell() {
        let mut editor = LineEditor::<16>::new();
        let mut wire = Wire::default();
        editor.feed(0x08, &mut wire).unwrap();
        editor.feed(0x7f, &mut wire).unwrap();
        assert!(editor.buffer().is_empty());
        assert_eq!(wire.sent, [0x07u8, 0x07]);
    }

    #[test]
    fn test_erase_char_backs_up_once() {
        let mut editor = LineEditor::<16>::new();
        let mut wire = Wire::default();
        feed_all(&mut editor, &mut wire, b"ab");
        wire.take_sent();

        editor.feed(0x7f, &mut wire).unwrap();
        assert_eq!(typed(&editor), b"a");
        assert_eq!(wire.sent, b"\x08 \x08");
    }

    #[test]
    fn test_erase_word_keeps_separator() {
        let mut editor = LineEditor::<16>::new();
        let mut wire = Wire::default();
        feed_all(&mut editor, &mut wire, b"foo bar");
        wire.take_sent();

        editor.feed(0x17, &mut wire).unwrap();
        assert_eq!(typed(&editor), b"foo ");
        assert_eq!(wire.sent, b"\x08 \x08".repeat(3));
    }

    #[test]
    fn test_erase_word_after_whitespace_is_noop() {
        let mut editor = LineEditor::<16>::new();
        let mut wire = Wire::default();
        feed_all(&mut editor, &mut wire, b"foo ");
        wire.take_sent();

        editor.feed(0x17, &mut wire).unwrap();
        assert_eq!(typed(&editor), b"foo ");
        assert!(wire.sent.is_empty());

        // Vertical tab counts as whitespace too.
        feed_all(&mut editor, &mut wire, b"x\x0b");
        wire.take_sent();
        editor.feed(0x17, &mut wire).unwrap();
        assert_eq!(typed(&editor), b"foo x\x0b");
    }

    #[test]
    fn test_erase_word_single_word_empties_line() {
        let mut editor = LineEditor::<16>::new();
        let mut wire = Wire::default();
        feed_all(&mut editor, &mut wire, b"word\x17");
        assert!(editor.buffer().is_empty());
    }

    #[test]
    fn test_erase_line_backs_up_every_char() {
        let mut editor = LineEditor::<16>::new();
        let mut wire = Wire::default();
        feed_all(&mut editor, &mut wire, b"a b\tc");
        wire.take_sent();

        editor.feed(0x15, &mut wire).unwrap();
        assert!(editor.buffer().is_empty());
        assert_eq!(wire.sent, b"\x08 \x08".repeat(5));

        // On an empty line it does nothing at all, not even a bell.
        wire.take_sent();
        editor.feed(0x15, &mut wire).unwrap();
        assert!(wire.sent.is_empty());
    }

    #[test]
    fn test_insert_stops_one_short_of_capacity() {
        // 8 slots: 7 usable, 6 for text, 1 kept for the terminator.
        let mut editor = LineEditor::<8>::new();
        let mut wire = Wire::default();
        feed_all(&mut editor, &mut wire, b"abcdef");
        assert_eq!(editor.buffer().len(), 6);
        wire.take_sent();

        editor.feed(b'g', &mut wire).unwrap();
        assert_eq!(editor.buffer().len(), 6);
        assert_eq!(wire.sent, [0x07u8]);

        wire.take_sent();
        assert_eq!(editor.feed(b'\r', &mut wire).unwrap(), Feed::LineComplete);
        assert_eq!(typed(&editor), b"abcdef\n");
        assert!(editor.buffer().is_full());
        assert_eq!(wire.sent, b"\r\n");
    }

    #[test]
    fn test_fill_line_reads_until_carriage_return() {
        let mut editor = LineEditor::<16>::new();
        let mut wire = Wire::new(b"hi\rnext");
        editor.fill_line(&mut wire).unwrap();

        assert_eq!(typed(&editor), b"hi\n");
        assert_eq!(wire.sent, b"hi\r\n");
        assert_eq!(wire.reads, 3);
    }

    #[test]
    fn test_fill_line_is_noop_while_line_pending() {
        let mut editor = LineEditor::<16>::new();
        let mut wire = Wire::new(b"hi\rmore\r");
        editor.fill_line(&mut wire).unwrap();
        let reads = wire.reads;
        let sent = wire.sent.len();

        editor.fill_line(&mut wire).unwrap();
        assert_eq!(wire.reads, reads);
        assert_eq!(wire.sent.len(), sent);
        assert_eq!(typed(&editor), b"hi\n");
    }

    #[test]
    fn test_fill_line_propagates_transport_error() {
        let mut editor = LineEditor::<16>::new();
        let mut wire = Wire::new(b"ab");
        assert!(editor.fill_line(&mut wire).is_err());
        // What was typed before the link died stays in the buffer.
        assert_eq!(typed(&editor), b"ab");
    }

    #[test]
    fn test_drain_into_partial() {
        let mut editor = LineEditor::<16>::new();
        let mut wire = Wire::new(b"abc\r");
        editor.fill_line(&mut wire).unwrap();

        let mut dest = [0u8; 2];
        assert_eq!(editor.drain_into(&mut dest), 2);
        assert_eq!(&dest, b"ab");
        assert!(!editor.is_drained());

        let mut rest = [0u8; 8];
        assert_eq!(editor.drain_into(&mut rest), 2);
        assert_eq!(&rest[..2], b"c\n");
        assert!(editor.is_drained());
        assert_eq!(editor.drain_into(&mut rest), 0);
    }
}
