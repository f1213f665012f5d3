// TtyCon - Serial Console Firmware
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::config::ascii::{CR, LF, NUL};
use crate::editor::LineEditor;
use crate::transport::ByteTransport;
use core::fmt;
#[cfg(feature = "tracing")]
use tracing::debug;

/// The three standard streams. All of them share the one console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum StreamId {
    Stdin = 0,
    Stdout = 1,
    Stderr = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unsupported stream identifier {0}")]
pub struct UnsupportedStream(pub i32);

impl TryFrom<i32> for StreamId {
    type Error = UnsupportedStream;

    fn try_from(fd: i32) -> Result<Self, Self::Error> {
        match fd {
            0 => Ok(StreamId::Stdin),
            1 => Ok(StreamId::Stdout),
            2 => Ok(StreamId::Stderr),
            other => Err(UnsupportedStream(other)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StreamError<E> {
    #[error(transparent)]
    UnsupportedStream(#[from] UnsupportedStream),
    #[error("console transport failed")]
    Transport(#[source] E),
}

impl<E> StreamError<E> {
    /// The negative return value a libc `_read`/`_write` hook reports.
    pub const SENTINEL: isize = -1;

    pub fn raw_os_code(&self) -> isize {
        Self::SENTINEL
    }
}

/// Byte-stream `read`/`write` on top of a line editor and a blocking
/// transport.
///
/// Writes go straight to the transport with `LF` expanded to `LF CR`. Reads
/// first make sure a full line is buffered, then hand out as much of it as
/// fits; the rest stays for the next read.
#[derive(Debug)]
pub struct StreamAdapter<T, const N: usize> {
    io: T,
    editor: LineEditor<N>,
}

impl<T: ByteTransport, const N: usize> StreamAdapter<T, N> {
    pub const fn new(io: T) -> Self {
        Self {
            io,
            editor: LineEditor::new(),
        }
    }

    /// Send up to `bytes.len()` bytes, stopping early at a NUL.
    ///
    /// Returns the number of source bytes consumed, which does not count the
    /// carriage returns added after each newline.
    pub fn write(&mut self, fd: i32, bytes: &[u8]) -> Result<usize, StreamError<T::Error>> {
        let stream = self.check(fd)?;
        self.write_stream(stream, bytes)
    }

    pub fn write_stream(
        &mut self,
        _stream: StreamId,
        bytes: &[u8],
    ) -> Result<usize, StreamError<T::Error>> {
        let mut written = 0;
        for &byte in bytes.iter().take_while(|&&b| b != NUL) {
            self.io.send_blocking(byte).map_err(StreamError::Transport)?;
            if byte == LF {
                self.io.send_blocking(CR).map_err(StreamError::Transport)?;
            }
            written += 1;
        }
        Ok(written)
    }

    /// Read up to `dest.len()` bytes of the current line, blocking until one
    /// has been typed if nothing is buffered.
    pub fn read(&mut self, fd: i32, dest: &mut [u8]) -> Result<usize, StreamError<T::Error>> {
        let stream = self.check(fd)?;
        self.read_stream(stream, dest)
    }

    pub fn read_stream(
        &mut self,
        _stream: StreamId,
        dest: &mut [u8],
    ) -> Result<usize, StreamError<T::Error>> {
        self.editor
            .fill_line(&mut self.io)
            .map_err(StreamError::Transport)?;
        Ok(self.editor.drain_into(dest))
    }

    /// Read until a newline has been copied or `dest` is full.
    pub fn read_line(&mut self, fd: i32, dest: &mut [u8]) -> Result<usize, StreamError<T::Error>> {
        let stream = self.check(fd)?;
        let mut filled = 0;
        while filled < dest.len() {
            filled += self.read_stream(stream, &mut dest[filled..])?;
            if dest[..filled].last() == Some(&LF) {
                break;
            }
        }
        Ok(filled)
    }

    pub fn editor(&self) -> &LineEditor<N> {
        &self.editor
    }

    pub fn transport(&self) -> &T {
        &self.io
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.io
    }

    pub fn into_parts(self) -> (T, LineEditor<N>) {
        (self.io, self.editor)
    }

    fn check(&self, fd: i32) -> Result<StreamId, UnsupportedStream> {
        let stream = StreamId::try_from(fd);
        #[cfg(feature = "tracing")]
        if let Err(e) = &stream {
            debug!("{}", e);
        }
        stream
    }
}

/// Formatted output goes to stdout, e.g. `writeln!(console, "...")`.
impl<T: ByteTransport, const N: usize> fmt::Write for StreamAdapter<T, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_stream(StreamId::Stdout, s.as_bytes())
            .map(|_| ())
            .map_err(|_| fmt::Error)
    }
}
