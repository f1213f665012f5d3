// TtyCon - Serial Console Firmware
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::ByteTransport;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("scripted input exhausted")]
pub struct Exhausted;

/// Scripted transport: hands out queued input bytes and records everything
/// sent back.
#[derive(Debug, Default)]
pub struct Wire {
    input: VecDeque<u8>,
    pub sent: Vec<u8>,
    pub reads: usize,
}

impl Wire {
    pub fn new(input: &[u8]) -> Self {
        Self {
            input: input.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn queue(&mut self, input: &[u8]) {
        self.input.extend(input.iter().copied());
    }

    pub fn take_sent(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.sent)
    }
}

impl ByteTransport for Wire {
    type Error = Exhausted;

    fn send_blocking(&mut self, byte: u8) -> Result<(), Exhausted> {
        self.sent.push(byte);
        Ok(())
    }

    fn recv_blocking(&mut self) -> Result<u8, Exhausted> {
        self.reads += 1;
        self.input.pop_front().ok_or(Exhausted)
    }
}
