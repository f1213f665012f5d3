// TtyCon - Serial Console Firmware
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use std::collections::VecDeque;
use ttycon_core::ByteTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hangup;

/// Loopback terminal: queued keystrokes in, everything echoed recorded.
#[derive(Debug, Default)]
pub struct Terminal {
    keys: VecDeque<u8>,
    pub screen: Vec<u8>,
    pub recv_calls: usize,
}

impl Terminal {
    pub fn typing(keys: &[u8]) -> Self {
        Self {
            keys: keys.iter().copied().collect(),
            ..Self::default()
        }
    }

    #[allow(dead_code)]
    pub fn type_more(&mut self, keys: &[u8]) {
        self.keys.extend(keys.iter().copied());
    }
}

impl ByteTransport for Terminal {
    type Error = Hangup;

    fn send_blocking(&mut self, byte: u8) -> Result<(), Hangup> {
        self.screen.push(byte);
        Ok(())
    }

    fn recv_blocking(&mut self) -> Result<u8, Hangup> {
        self.recv_calls += 1;
        self.keys.pop_front().ok_or(Hangup)
    }
}

#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::TRACE)
        .with_test_writer()
        .try_init();
}
