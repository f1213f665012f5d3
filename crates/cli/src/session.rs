// TtyCon - Serial Console Firmware
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::script::SessionAssertion;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::{self, ErrorKind};
use ttycon_core::config::LINE_BUFFER_CAPACITY;
use ttycon_core::transport::IoTransport;
use ttycon_core::{Console, StreamError, StreamId};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionEnd {
    /// Every requested read was served.
    ReadsComplete,
    /// The keystrokes ran out while a read was waiting for a line.
    InputExhausted,
}

#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub reads: Vec<Vec<u8>>,
    pub echo: Vec<u8>,
    pub buffered_after: Vec<u8>,
    pub end: SessionEnd,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AssertionResult {
    pub assertion: SessionAssertion,
    pub passed: bool,
}

type ScriptConsole<'a> = Console<IoTransport<&'a [u8], Vec<u8>>>;

/// Feed `input` through a console and issue reads against it.
///
/// With no `read_sizes`, whole lines are read until the input runs out.
pub fn run_session(input: &[u8], read_sizes: &[usize]) -> Result<SessionOutcome> {
    let mut console: ScriptConsole<'_> = Console::new(IoTransport::new(input, Vec::new()));
    let mut reads = Vec::new();
    let mut end = SessionEnd::ReadsComplete;

    let mut sizes = read_sizes.iter().copied().map(Some);
    loop {
        let size = if read_sizes.is_empty() {
            None
        } else {
            match sizes.next() {
                Some(size) => size,
                None => break,
            }
        };
        match read_once(&mut console, size) {
            Ok(data) => {
                tracing::debug!(len = data.len(), "read");
                reads.push(data);
            }
            Err(StreamError::Transport(e)) if e.kind() == ErrorKind::UnexpectedEof => {
                end = SessionEnd::InputExhausted;
                break;
            }
            Err(e) => return Err(e).context("console read failed"),
        }
    }

    let (io, editor) = console.into_parts();
    let (_, echo) = io.into_inner();
    Ok(SessionOutcome {
        reads,
        echo,
        buffered_after: editor.buffer().iter().collect(),
        end,
    })
}

fn read_once(
    console: &mut ScriptConsole<'_>,
    size: Option<usize>,
) -> Result<Vec<u8>, StreamError<io::Error>> {
    let fd = StreamId::Stdin as i32;
    let mut dest = vec![0u8; size.unwrap_or(LINE_BUFFER_CAPACITY)];
    let n = match size {
        Some(_) => console.read(fd, &mut dest)?,
        None => console.read_line(fd, &mut dest)?,
    };
    dest.truncate(n);
    Ok(dest)
}

pub fn evaluate(assertion: &SessionAssertion, outcome: &SessionOutcome) -> bool {
    match assertion {
        SessionAssertion::EchoEquals(expected) => outcome.echo == expected.as_bytes(),
        SessionAssertion::EchoContains(needle) => {
            let needle = needle.as_bytes();
            needle.is_empty() || outcome.echo.windows(needle.len()).any(|w| w == needle)
        }
        SessionAssertion::ReadsEqual(expected) => {
            outcome.reads.len() == expected.len()
                && outcome
                    .reads
                    .iter()
                    .zip(expected)
                    .all(|(got, want)| got.as_slice() == want.as_bytes())
        }
        SessionAssertion::BufferedAfter(expected) => {
            outcome.buffered_after == expected.as_bytes()
        }
    }
}
