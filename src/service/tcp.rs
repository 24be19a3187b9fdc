// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{fmt, io, time::Duration};

use futures_util::{SinkExt as _, StreamExt as _};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt as _};
use tokio_util::codec::Framed;

use crate::{
    client::Options,
    codec::tcp::ClientCodec,
    error::{Error, Result},
    frame::{Header, Request, RequestFrame, Response},
    node::NodeAddress,
    service::{verify_response, ServiceIdCounter},
};

/// FINS/TCP client
#[derive(Debug)]
pub(crate) struct Client<T> {
    framed: Framed<T, ClientCodec>,
    destination: NodeAddress,
    source: NodeAddress,
    service_id: ServiceIdCounter,
    timeout: Duration,
}

impl<T> Client<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    pub(crate) fn new(transport: T, options: &Options) -> Self {
        Self {
            framed: Framed::new(transport, ClientCodec),
            destination: options.destination,
            source: options.source,
            service_id: ServiceIdCounter::new(),
            timeout: options.timeout,
        }
    }

    fn next_header(&self) -> Header {
        Header::command(self.destination, self.source, self.service_id.next())
    }

    pub(crate) async fn call(&mut self, request: Request<'_>) -> Result<Response> {
        log::debug!("Call {request:?}");
        let header = self.next_header();
        let frame = RequestFrame { header, request };

        // Stale bytes from a previously timed-out exchange must not be
        // mistaken for this response.
        self.framed.read_buffer_mut().clear();

        self.framed.send(frame).await?;
        let response = tokio::time::timeout(self.timeout, self.framed.next())
            .await
            .map_err(|_| Error::Timeout(self.timeout))?
            .ok_or(Error::ConnectionClosed)??;

        verify_response(header.service_id, &response)?;
        Ok(response)
    }

    pub(crate) async fn disconnect(&mut self) -> io::Result<()> {
        self.framed.get_mut().shutdown().await
    }
}

#[async_trait::async_trait]
impl<T> crate::client::Client for Client<T>
where
    T: fmt::Debug + AsyncRead + AsyncWrite + Send + Unpin,
{
    async fn call(&mut self, request: Request<'_>) -> Result<Response> {
        Client::call(self, request).await
    }

    async fn disconnect(&mut self) -> io::Result<()> {
        Client::disconnect(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_stamped_from_session_configuration() {
        let options = Options {
            destination: NodeAddress::cpu(10),
            source: NodeAddress::cpu(1),
            ..Options::default()
        };
        let (transport, _peer) = tokio::io::duplex(64);
        let client = Client::new(transport, &options);

        let first = client.next_header();
        let second = client.next_header();
        assert_eq!(first.destination, NodeAddress::cpu(10));
        assert_eq!(first.source, NodeAddress::cpu(1));
        assert_eq!(first.service_id, 1);
        assert_eq!(second.service_id, 2);
    }
}
