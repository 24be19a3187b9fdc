// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A pure [Rust](https://www.rust-lang.org) client for the
//! [Omron FINS](https://en.wikipedia.org/wiki/Factory_Interface_Network_Service)
//! protocol based on [tokio](https://tokio.rs).
//!
//! FINS addresses programmable logic controllers over Ethernet. This
//! library speaks the command frame format over both UDP (one datagram
//! per frame) and TCP (length-prefixed frames on a stream), and exposes
//! typed read/write operations on controller memory areas.
//!
//! ## Features
//!
//! - `tcp` (default): async FINS/TCP client
//! - `udp` (default): async FINS/UDP client
//! - `sync`: blocking wrappers around the async clients
//!
//! ## Example
//!
//! ```no_run
//! # #[cfg(feature = "udp")]
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use tokio_fins::prelude::*;
//!
//! let socket_addr = "192.168.250.1:9600".parse()?;
//! let mut ctx = udp::connect(socket_addr).await?;
//! let words = ctx.read_words(MemoryArea::DataMemory, 100, 2).await?;
//! println!("DM100..DM101: {words:?}");
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

pub use bytes;

pub mod client;
pub mod codec;
pub mod prelude;

mod error;
mod frame;
mod node;

#[cfg(any(feature = "tcp", feature = "udp"))]
mod service;

pub use crate::error::{Error, Result};
pub use crate::frame::{
    Address, Bit, BitIndex, CommandCode, EndCode, Header, MainCode, MemoryAddress, MemoryArea,
    Quantity, Request, RequestFrame, Response, ServiceId, Word,
};
pub use crate::node::{NodeAddress, NodeId};

/// Default FINS port number.
pub const DEFAULT_PORT: u16 = 9600;

/// Default deadline for a single request/response exchange.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
