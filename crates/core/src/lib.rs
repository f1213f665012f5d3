// TtyCon - Serial Console Firmware
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Serial console core: a fixed-size line buffer, an interactive line editor
//! driven one byte at a time, and a stream adapter exposing both through the
//! usual `read`/`write` contract on top of a blocking byte transport.
//!
//! The crate is `no_std`; the `std` feature adds host transports over
//! `std::io`.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod config;
pub mod editor;
pub mod heartbeat;
pub mod ring;
pub mod stream;
pub mod tick;
pub mod transport;

#[cfg(test)]
pub(crate) mod testlib;

pub use editor::{Feed, LineEditor};
pub use heartbeat::{Heartbeat, Indicator};
pub use ring::{BufferFull, RingBuffer};
pub use stream::{StreamAdapter, StreamError, StreamId, UnsupportedStream};
pub use tick::Ticks;
pub use transport::ByteTransport;

/// Console with the board's default line buffer size.
pub type Console<T> = StreamAdapter<T, { config::LINE_BUFFER_CAPACITY }>;
