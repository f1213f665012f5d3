// TtyCon - Serial Console Firmware
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

/// Blocking single-byte serial link.
///
/// Both calls block the caller until the hardware is ready; there is no
/// timeout. Transports that cannot fail use [`core::convert::Infallible`].
pub trait ByteTransport {
    type Error;

    fn send_blocking(&mut self, byte: u8) -> Result<(), Self::Error>;

    fn recv_blocking(&mut self) -> Result<u8, Self::Error>;

    fn send_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        for &b in bytes {
            self.send_blocking(b)?;
        }
        Ok(())
    }
}

impl<T: ByteTransport + ?Sized> ByteTransport for &mut T {
    type Error = T::Error;

    fn send_blocking(&mut self, byte: u8) -> Result<(), Self::Error> {
        (**self).send_blocking(byte)
    }

    fn recv_blocking(&mut self) -> Result<u8, Self::Error> {
        (**self).recv_blocking()
    }

    fn send_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).send_all(bytes)
    }
}

#[cfg(feature = "std")]
pub use self::io::IoTransport;

#[cfg(feature = "std")]
mod io {
    use super::ByteTransport;
    use std::io::{self, Read, Write};

    /// Host transport over a reader/writer pair, e.g. stdin/stdout or an
    /// in-memory script and a `Vec<u8>` capture.
    ///
    /// End of input surfaces as [`io::ErrorKind::UnexpectedEof`].
    #[derive(Debug)]
    pub struct IoTransport<R, W> {
        reader: R,
        writer: W,
    }

    impl<R: Read, W: Write> IoTransport<R, W> {
        pub fn new(reader: R, writer: W) -> Self {
            Self { reader, writer }
        }

        pub fn writer(&self) -> &W {
            &self.writer
        }

        pub fn into_inner(self) -> (R, W) {
            (self.reader, self.writer)
        }
    }

    impl<R: Read, W: Write> ByteTransport for IoTransport<R, W> {
        type Error = io::Error;

        fn send_blocking(&mut self, byte: u8) -> io::Result<()> {
            self.writer.write_all(&[byte])?;
            self.writer.flush()
        }

        fn recv_blocking(&mut self) -> io::Result<u8> {
            let mut byte = [0u8; 1];
            self.reader.read_exact(&mut byte)?;
            Ok(byte[0])
        }

        fn send_all(&mut self, bytes: &[u8]) -> io::Result<()> {
            self.writer.write_all(bytes)?;
            self.writer.flush()
        }
    }

}
