// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! FINS/UDP client tests against a stub controller.

#![cfg(feature = "udp")]

mod support;

use std::time::Duration;

use tokio::net::UdpSocket;

use tokio_fins::{client::Options, prelude::*, Error};

use crate::support::response_body;

#[tokio::test]
async fn read_words_round_trip() -> anyhow::Result<()> {
    let socket = UdpSocket::bind("127.0.0.1:0").await?;
    let socket_addr = socket.local_addr()?;

    let server = tokio::spawn(async move {
        let mut buf = [0u8; 2048];
        let (len, peer) = socket.recv_from(&mut buf).await.unwrap();
        let request = &buf[..len];
        // First request of the session carries service id 1 and the
        // default node addresses on both sides.
        assert_eq!(
            request,
            [
                0x80, 0x00, 0x02, // ICF, RSV, GCT
                0x00, 0x01, 0x00, // destination 0.1.0
                0x00, 0x01, 0x00, // source 0.1.0
                0x01, // service id
                0x01, 0x01, // memory area read
                0x02, 0x00, 0x64, 0x00, 0x00, 0x02, // DM100, 2 words
            ]
        );
        let response = response_body(request, [0x00, 0x00], &[0x00, 0x0A, 0x00, 0x14]);
        socket.send_to(&response, peer).await.unwrap();
    });

    let mut ctx = udp::connect(socket_addr).await?;
    let words = ctx.read_words(MemoryArea::DataMemory, 100, 2).await?;
    assert_eq!(words, [10, 20]);
    ctx.disconnect().await?;

    server.await?;
    Ok(())
}

#[tokio::test]
async fn write_bits_round_trip() -> anyhow::Result<()> {
    let socket = UdpSocket::bind("127.0.0.1:0").await?;
    let socket_addr = socket.local_addr()?;

    let server = tokio::spawn(async move {
        let mut buf = [0u8; 2048];
        let (len, peer) = socket.recv_from(&mut buf).await.unwrap();
        let request = &buf[..len];
        assert_eq!(&request[10..12], &[0x01, 0x02]);
        // W10.05, two bits: set then clear.
        assert_eq!(
            &request[12..],
            &[0x31, 0x00, 0x0A, 0x05, 0x00, 0x02, 0x01, 0x00]
        );
        let response = response_body(request, [0x00, 0x00], &[]);
        socket.send_to(&response, peer).await.unwrap();
    });

    let mut ctx = udp::connect(socket_addr).await?;
    ctx.write_bits(MemoryArea::Work, 10, 5, &[true, false])
        .await?;

    server.await?;
    Ok(())
}

#[tokio::test]
async fn times_out_when_the_datagram_is_lost() -> anyhow::Result<()> {
    let socket = UdpSocket::bind("127.0.0.1:0").await?;
    let socket_addr = socket.local_addr()?;

    tokio::spawn(async move {
        let mut buf = [0u8; 2048];
        // Swallow the request without answering.
        let _ = socket.recv_from(&mut buf).await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
    });

    let options = Options {
        timeout: Duration::from_millis(50),
        ..Options::default()
    };
    let mut ctx = udp::connect_with(socket_addr, options).await?;
    let start = std::time::Instant::now();
    let err = ctx
        .read_words(MemoryArea::DataMemory, 0, 1)
        .await
        .unwrap_err();
    let elapsed = start.elapsed();
    assert!(matches!(err, Error::Timeout(_)));
    // The deadline must fire close to the configured 50ms.
    assert!(elapsed < Duration::from_millis(200), "took {elapsed:?}");

    Ok(())
}

#[tokio::test]
async fn mismatched_service_id_is_rejected() -> anyhow::Result<()> {
    let socket = UdpSocket::bind("127.0.0.1:0").await?;
    let socket_addr = socket.local_addr()?;

    tokio::spawn(async move {
        let mut buf = [0u8; 2048];
        let (len, peer) = socket.recv_from(&mut buf).await.unwrap();
        let mut request = buf[..len].to_vec();
        // Corrupt the service id before echoing it back.
        request[9] = request[9].wrapping_add(1);
        let response = response_body(&request, [0x00, 0x00], &[0x00, 0x00]);
        socket.send_to(&response, peer).await.unwrap();
    });

    let mut ctx = udp::connect(socket_addr).await?;
    let err = ctx
        .read_words(MemoryArea::DataMemory, 0, 1)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::ServiceIdMismatch {
            sent: 1,
            received: 2
        }
    ));

    Ok(())
}
