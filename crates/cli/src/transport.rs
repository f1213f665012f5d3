// TtyCon - Serial Console Firmware
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use ttycon_core::ByteTransport;

/// Input filter for terminals in cooked mode, which submit lines with `LF`
/// where a serial terminal would send `CR`.
#[derive(Debug)]
pub struct CookedInput<T> {
    inner: T,
    lf_as_cr: bool,
}

impl<T> CookedInput<T> {
    pub fn new(inner: T, lf_as_cr: bool) -> Self {
        Self { inner, lf_as_cr }
    }
}

impl<T: ByteTransport> ByteTransport for CookedInput<T> {
    type Error = T::Error;

    fn send_blocking(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.inner.send_blocking(byte)
    }

    fn recv_blocking(&mut self) -> Result<u8, Self::Error> {
        match self.inner.recv_blocking()? {
            b'\n' if self.lf_as_cr => Ok(b'\r'),
            byte => Ok(byte),
        }
    }

    fn send_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.inner.send_all(bytes)
    }
}
