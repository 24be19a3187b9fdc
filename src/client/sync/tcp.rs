// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Synchronous FINS/TCP client connections

use std::net::SocketAddr;

use crate::{client::Options, error::Result};

use super::{new_runtime, Context};

/// Establish a blocking connection to a controller listening on FINS/TCP.
pub fn connect(socket_addr: SocketAddr) -> Result<Context> {
    connect_with(socket_addr, Options::default())
}

/// Establish a blocking connection with explicit session options.
pub fn connect_with(socket_addr: SocketAddr, options: Options) -> Result<Context> {
    let runtime = new_runtime()?;
    let async_ctx = runtime.block_on(crate::client::tcp::connect_with(socket_addr, options))?;
    Ok(Context { runtime, async_ctx })
}
