// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! FINS clients

use std::{borrow::Cow, fmt::Debug, io, time::Duration};

use async_trait::async_trait;

use crate::{
    bytes::Bytes,
    codec,
    error::{Error, Result},
    frame::{Address, Bit, BitIndex, MemoryArea, Quantity, Request, Response, Word},
    node::NodeAddress,
};

#[cfg(feature = "tcp")]
pub mod tcp;

#[cfg(feature = "udp")]
pub mod udp;

#[cfg(feature = "sync")]
pub mod sync;

/// Session configuration shared by both transports.
#[derive(Debug, Clone)]
pub struct Options {
    /// Local node stamped into the source fields of every request header.
    pub source: NodeAddress,
    /// Remote node stamped into the destination fields of every request
    /// header.
    pub destination: NodeAddress,
    /// Deadline for each request/response exchange.
    pub timeout: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            source: NodeAddress::default(),
            destination: NodeAddress::default(),
            timeout: crate::DEFAULT_TIMEOUT,
        }
    }
}

/// Transport independent asynchronous client trait
#[async_trait]
pub trait Client: Send + Debug {
    /// Invokes a FINS command.
    async fn call(&mut self, request: Request<'_>) -> Result<Response>;

    /// Disconnects the client.
    ///
    /// Releases the underlying socket. Dropping the client without
    /// explicitly disconnecting it beforehand also frees all resources.
    async fn disconnect(&mut self) -> io::Result<()>;
}

/// Asynchronous FINS reader
#[async_trait]
pub trait Reader {
    /// Read consecutive words from a memory area.
    async fn read_words(
        &mut self,
        area: MemoryArea,
        addr: Address,
        cnt: Quantity,
    ) -> Result<Vec<Word>>;

    /// Read consecutive bits starting at a word offset and bit index.
    async fn read_bits(
        &mut self,
        area: MemoryArea,
        addr: Address,
        bit: BitIndex,
        cnt: Quantity,
    ) -> Result<Vec<Bit>>;

    /// Read the CPU unit status.
    ///
    /// The returned bytes are the raw status payload; their layout depends
    /// on the controller model.
    async fn read_cpu_status(&mut self) -> Result<Bytes>;
}

/// Asynchronous FINS writer
#[async_trait]
pub trait Writer {
    /// Write consecutive words to a memory area.
    async fn write_words(&mut self, area: MemoryArea, addr: Address, words: &[Word]) -> Result<()>;

    /// Write consecutive bits starting at a word offset and bit index.
    async fn write_bits(
        &mut self,
        area: MemoryArea,
        addr: Address,
        bit: BitIndex,
        bits: &[Bit],
    ) -> Result<()>;
}

/// Asynchronous FINS client context
///
/// The transport is fixed at construction time. After [`disconnect`]
/// the context is unbound and every further call fails with
/// [`Error::NotConnected`] before any I/O is attempted.
///
/// [`disconnect`]: Context::disconnect
#[derive(Debug)]
pub struct Context {
    client: Option<Box<dyn Client>>,
}

impl Context {
    pub(crate) fn new(client: Box<dyn Client>) -> Self {
        Self {
            client: Some(client),
        }
    }

    fn bound_client(&mut self) -> Result<&mut Box<dyn Client>> {
        self.client.as_mut().ok_or(Error::NotConnected)
    }

    /// Invokes a raw FINS command on the bound transport.
    pub async fn call(&mut self, request: Request<'_>) -> Result<Response> {
        self.bound_client()?.call(request).await
    }

    /// Disconnects the client and releases the socket.
    ///
    /// Idempotent; disconnecting an already unbound context is a no-op.
    pub async fn disconnect(&mut self) -> Result<()> {
        let Some(mut client) = self.client.take() else {
            return Ok(());
        };
        client.disconnect().await.map_err(Error::Io)
    }

    /// Issues a request and enforces the end code success invariant.
    ///
    /// Callers never see partially decoded data from a failed response.
    async fn call_checked(&mut self, request: Request<'_>) -> Result<Response> {
        let response = self.call(request).await?;
        if !response.end_code.is_normal() {
            return Err(Error::Fault(response.end_code));
        }
        Ok(response)
    }
}

impl From<Box<dyn Client>> for Context {
    fn from(client: Box<dyn Client>) -> Self {
        Self::new(client)
    }
}

#[async_trait]
impl Reader for Context {
    async fn read_words(
        &mut self,
        area: MemoryArea,
        addr: Address,
        cnt: Quantity,
    ) -> Result<Vec<Word>> {
        let response = self
            .call_checked(Request::ReadWords(area, addr, cnt))
            .await?;
        codec::decode_words(&response.payload, cnt.into())
    }

    async fn read_bits(
        &mut self,
        area: MemoryArea,
        addr: Address,
        bit: BitIndex,
        cnt: Quantity,
    ) -> Result<Vec<Bit>> {
        let response = self
            .call_checked(Request::ReadBits(area, addr, bit, cnt))
            .await?;
        codec::decode_bits(&response.payload, cnt.into())
    }

    async fn read_cpu_status(&mut self) -> Result<Bytes> {
        let response = self.call_checked(Request::ReadCpuStatus).await?;
        Ok(response.payload)
    }
}

#[async_trait]
impl Writer for Context {
    async fn write_words(&mut self, area: MemoryArea, addr: Address, words: &[Word]) -> Result<()> {
        self.call_checked(Request::WriteWords(area, addr, Cow::Borrowed(words)))
            .await?;
        Ok(())
    }

    async fn write_bits(
        &mut self,
        area: MemoryArea,
        addr: Address,
        bit: BitIndex,
        bits: &[Bit],
    ) -> Result<()> {
        self.call_checked(Request::WriteBits(area, addr, bit, Cow::Borrowed(bits)))
            .await?;
        Ok(())
    }
}
