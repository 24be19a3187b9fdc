// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Synchronous FINS context access
//!
//! Blocking wrappers around the asynchronous [`Context`](super::Context),
//! driven by a dedicated current-thread runtime.

#[cfg(feature = "tcp")]
pub mod tcp;

#[cfg(feature = "udp")]
pub mod udp;

use crate::{
    bytes::Bytes,
    error::Result,
    frame::{Address, Bit, BitIndex, MemoryArea, Quantity, Request, Response, Word},
};

use super::{Context as AsyncContext, Reader as AsyncReader, Writer as AsyncWriter};

/// A transport independent synchronous reader trait.
pub trait Reader {
    fn read_words(&mut self, area: MemoryArea, addr: Address, cnt: Quantity) -> Result<Vec<Word>>;
    fn read_bits(
        &mut self,
        area: MemoryArea,
        addr: Address,
        bit: BitIndex,
        cnt: Quantity,
    ) -> Result<Vec<Bit>>;
    fn read_cpu_status(&mut self) -> Result<Bytes>;
}

/// A transport independent synchronous writer trait.
pub trait Writer {
    fn write_words(&mut self, area: MemoryArea, addr: Address, words: &[Word]) -> Result<()>;
    fn write_bits(
        &mut self,
        area: MemoryArea,
        addr: Address,
        bit: BitIndex,
        bits: &[Bit],
    ) -> Result<()>;
}

pub(crate) fn new_runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// A synchronous FINS client context.
pub struct Context {
    runtime: tokio::runtime::Runtime,
    async_ctx: AsyncContext,
}

impl Context {
    /// Invokes a raw FINS command, blocking until the exchange completes.
    pub fn call(&mut self, request: Request<'_>) -> Result<Response> {
        self.runtime.block_on(self.async_ctx.call(request))
    }

    /// Disconnects the client and releases the socket.
    pub fn disconnect(&mut self) -> Result<()> {
        self.runtime.block_on(self.async_ctx.disconnect())
    }
}

impl Reader for Context {
    fn read_words(&mut self, area: MemoryArea, addr: Address, cnt: Quantity) -> Result<Vec<Word>> {
        self.runtime
            .block_on(self.async_ctx.read_words(area, addr, cnt))
    }

    fn read_bits(
        &mut self,
        area: MemoryArea,
        addr: Address,
        bit: BitIndex,
        cnt: Quantity,
    ) -> Result<Vec<Bit>> {
        self.runtime
            .block_on(self.async_ctx.read_bits(area, addr, bit, cnt))
    }

    fn read_cpu_status(&mut self) -> Result<Bytes> {
        self.runtime.block_on(self.async_ctx.read_cpu_status())
    }
}

impl Writer for Context {
    fn write_words(&mut self, area: MemoryArea, addr: Address, words: &[Word]) -> Result<()> {
        self.runtime
            .block_on(self.async_ctx.write_words(area, addr, words))
    }

    fn write_bits(
        &mut self,
        area: MemoryArea,
        addr: Address,
        bit: BitIndex,
        bits: &[Bit],
    ) -> Result<()> {
        self.runtime
            .block_on(self.async_ctx.write_bits(area, addr, bit, bits))
    }
}
