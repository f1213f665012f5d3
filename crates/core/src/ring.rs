// TtyCon - Serial Console Firmware
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

/// Returned by [`RingBuffer::push`] when every usable slot is occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("ring buffer full, byte {0:#04x} dropped")]
pub struct BufferFull(pub u8);

/// Fixed-capacity circular byte store with independent read and write cursors.
///
/// One of the `N` slots is always left free so that `start == end` means
/// empty, which caps occupancy at `N - 1`. Both cursors are kept modulo `N`.
#[derive(Debug, Clone)]
pub struct RingBuffer<const N: usize> {
    buf: [u8; N],
    /// Oldest unread byte.
    start: usize,
    /// Next write position.
    end: usize,
}

impl<const N: usize> RingBuffer<N> {
    const SLOTS_OK: () = assert!(N >= 2, "ring buffer needs at least two slots");

    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::SLOTS_OK;
        Self {
            buf: [0; N],
            start: 0,
            end: 0,
        }
    }

    const fn inc(n: usize) -> usize {
        (n + 1) % N
    }

    const fn dec(n: usize) -> usize {
        (n + N - 1) % N
    }

    /// Number of buffered bytes, `(end - start) mod N`.
    pub const fn len(&self) -> usize {
        (self.end + N - self.start) % N
    }

    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub const fn is_full(&self) -> bool {
        self.len() == N - 1
    }

    /// Usable slots.
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Append `byte` at the write cursor.
    pub fn push(&mut self, byte: u8) -> Result<(), BufferFull> {
        if self.is_full() {
            return Err(BufferFull(byte));
        }
        self.buf[self.end] = byte;
        self.end = Self::inc(self.end);
        Ok(())
    }

    /// Remove and return the oldest byte.
    pub fn pop(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        let byte = self.buf[self.start];
        self.start = Self::inc(self.start);
        Some(byte)
    }

    /// Drop the most recently pushed byte, returning it.
    pub fn erase_last(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        self.end = Self::dec(self.end);
        Some(self.buf[self.end])
    }

    /// Most recently pushed byte.
    pub fn last(&self) -> Option<u8> {
        if self.is_empty() {
            None
        } else {
            Some(self.buf[Self::dec(self.end)])
        }
    }

    /// Buffered bytes, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.len()).map(move |i| self.buf[(self.start + i) % N])
    }
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
