// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! FINS/TCP client connections

use std::{fmt, net::SocketAddr};

use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::TcpStream,
};

use crate::{
    error::{Error, Result},
    service,
};

use super::{Context, Options};

/// Establish a connection to a controller listening on FINS/TCP.
pub async fn connect(socket_addr: SocketAddr) -> Result<Context> {
    connect_with(socket_addr, Options::default()).await
}

/// Establish a connection with explicit session options.
pub async fn connect_with(socket_addr: SocketAddr, options: Options) -> Result<Context> {
    let transport = TcpStream::connect(socket_addr)
        .await
        .map_err(Error::Connect)?;
    log::debug!("Connected to {socket_addr}");
    Ok(attach_with(transport, options))
}

/// Attach a new client context to a transport, e.g. a stream that is
/// already connected.
pub fn attach<T>(transport: T) -> Context
where
    T: AsyncRead + AsyncWrite + fmt::Debug + Send + Unpin + 'static,
{
    attach_with(transport, Options::default())
}

/// Attach a new client context to a transport with explicit session
/// options.
pub fn attach_with<T>(transport: T, options: Options) -> Context
where
    T: AsyncRead + AsyncWrite + fmt::Debug + Send + Unpin + 'static,
{
    let client = service::tcp::Client::new(transport, &options);
    Context::new(Box::new(client))
}
