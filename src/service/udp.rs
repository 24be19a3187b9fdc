// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{io, net::SocketAddr, time::Duration};

use tokio::net::UdpSocket;

use crate::{
    bytes::BytesMut,
    client::Options,
    codec,
    error::{Error, Result},
    frame::{Header, Request, RequestFrame, Response},
    node::NodeAddress,
    service::{verify_response, ServiceIdCounter},
};

/// Largest datagram a controller is expected to send.
const MAX_DATAGRAM_LEN: usize = 2048;

/// FINS/UDP client
///
/// UDP is connectionless; "connecting" only binds the remote address to the
/// socket. A dropped request or response surfaces as a timeout since the
/// protocol offers no delivery guarantee and this client does not retry.
#[derive(Debug)]
pub(crate) struct Client {
    socket: UdpSocket,
    destination: NodeAddress,
    source: NodeAddress,
    service_id: ServiceIdCounter,
    timeout: Duration,
}

impl Client {
    pub(crate) async fn connect(socket_addr: SocketAddr, options: &Options) -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0").await.map_err(Error::Connect)?;
        socket.connect(socket_addr).await.map_err(Error::Connect)?;
        log::debug!("Bound UDP session for {socket_addr}");
        Ok(Self {
            socket,
            destination: options.destination,
            source: options.source,
            service_id: ServiceIdCounter::new(),
            timeout: options.timeout,
        })
    }

    fn next_header(&self) -> Header {
        Header::command(self.destination, self.source, self.service_id.next())
    }

    pub(crate) async fn call(&mut self, request: Request<'_>) -> Result<Response> {
        log::debug!("Call {request:?}");
        let header = self.next_header();
        let frame = RequestFrame { header, request };

        // One datagram carries exactly one frame; no length prefix.
        let mut buf = BytesMut::new();
        codec::encode_request(&frame, &mut buf);
        self.socket.send(&buf).await?;

        let mut response_buf = [0u8; MAX_DATAGRAM_LEN];
        let len = tokio::time::timeout(self.timeout, self.socket.recv(&mut response_buf))
            .await
            .map_err(|_| Error::Timeout(self.timeout))??;
        let response = codec::decode_response(&response_buf[..len])?;

        verify_response(header.service_id, &response)?;
        Ok(response)
    }

    #[allow(clippy::unused_async)]
    pub(crate) async fn disconnect(&mut self) -> io::Result<()> {
        // Dropping the socket releases it; nothing to shut down on UDP.
        Ok(())
    }
}

#[async_trait::async_trait]
impl crate::client::Client for Client {
    async fn call(&mut self, request: Request<'_>) -> Result<Response> {
        Client::call(self, request).await
    }

    async fn disconnect(&mut self) -> io::Result<()> {
        Client::disconnect(self).await
    }
}
