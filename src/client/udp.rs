// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! FINS/UDP client connections

use std::net::SocketAddr;

use crate::{error::Result, service};

use super::{Context, Options};

/// Bind a UDP session targeting the given controller address.
///
/// UDP performs no handshake; this fails only if the socket cannot be
/// bound or the address cannot be targeted.
pub async fn connect(socket_addr: SocketAddr) -> Result<Context> {
    connect_with(socket_addr, Options::default()).await
}

/// Bind a UDP session with explicit session options.
pub async fn connect_with(socket_addr: SocketAddr, options: Options) -> Result<Context> {
    let client = service::udp::Client::connect(socket_addr, &options).await?;
    Ok(Context::new(Box::new(client)))
}
