// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! FINS/TCP client tests against a stub controller.

#![cfg(feature = "tcp")]

mod support;

use std::time::Duration;

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

use tokio_fins::{client::Options, prelude::*, Error};

use crate::support::response_body;

/// Reads one length-prefixed frame from the stream.
async fn read_frame(stream: &mut TcpStream) -> Vec<u8> {
    let mut prefix = [0u8; 4];
    stream.read_exact(&mut prefix).await.unwrap();
    let len = u32::from_be_bytes(prefix) as usize;
    let mut body = vec![0u8; len];
    stream.read_exact(&mut body).await.unwrap();
    body
}

/// Writes one length-prefixed frame to the stream.
async fn write_frame(stream: &mut TcpStream, body: &[u8]) {
    let prefix = u32::try_from(body.len()).unwrap().to_be_bytes();
    stream.write_all(&prefix).await.unwrap();
    stream.write_all(body).await.unwrap();
}

#[tokio::test]
async fn read_words_round_trip() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let socket_addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_frame(&mut stream).await;
        // Memory area read of DM100..DM101.
        assert_eq!(&request[10..12], &[0x01, 0x01]);
        assert_eq!(&request[12..], &[0x02, 0x00, 0x64, 0x00, 0x00, 0x02]);
        let response = response_body(&request, [0x00, 0x00], &[0x00, 0x0A, 0x00, 0x14]);
        write_frame(&mut stream, &response).await;
    });

    let mut ctx = tcp::connect(socket_addr).await?;
    let words = ctx.read_words(MemoryArea::DataMemory, 100, 2).await?;
    assert_eq!(words, [10, 20]);
    ctx.disconnect().await?;

    server.await?;
    Ok(())
}

#[tokio::test]
async fn reassembles_split_response() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let socket_addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_frame(&mut stream).await;
        let body = response_body(&request, [0x00, 0x00], &[0x12, 0x34]);
        let prefix = u32::try_from(body.len()).unwrap().to_be_bytes();

        // Deliver the frame in dribs to exercise reassembly.
        stream.write_all(&prefix[..2]).await.unwrap();
        stream.flush().await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        stream.write_all(&prefix[2..]).await.unwrap();
        stream.write_all(&body[..5]).await.unwrap();
        stream.flush().await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        stream.write_all(&body[5..]).await.unwrap();
        stream.flush().await.unwrap();
    });

    let mut ctx = tcp::connect(socket_addr).await?;
    let words = ctx.read_words(MemoryArea::Cio, 0, 1).await?;
    assert_eq!(words, [0x1234]);

    server.await?;
    Ok(())
}

#[tokio::test]
async fn fault_end_code_is_an_error() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let socket_addr = listener.local_addr()?;

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_frame(&mut stream).await;
        // Local node error, sub code 0x01.
        let response = response_body(&request, [0x01, 0x01], &[]);
        write_frame(&mut stream, &response).await;
    });

    let mut ctx = tcp::connect(socket_addr).await?;
    let err = ctx
        .read_words(MemoryArea::DataMemory, 0, 1)
        .await
        .unwrap_err();
    match err {
        Error::Fault(end_code) => {
            assert!(!end_code.is_normal());
            assert_eq!(end_code.main.value(), 0x01);
            assert_eq!(end_code.sub, 0x01);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn times_out_when_no_response_arrives() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let socket_addr = listener.local_addr()?;

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let _request = read_frame(&mut stream).await;
        // Never answer; keep the connection open until the client gives up.
        tokio::time::sleep(Duration::from_secs(10)).await;
    });

    let options = Options {
        timeout: Duration::from_millis(50),
        ..Options::default()
    };
    let mut ctx = tcp::connect_with(socket_addr, options).await?;
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
async fn closed_connection_is_reported() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let socket_addr = listener.local_addr()?;

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let _request = read_frame(&mut stream).await;
        // Drop the stream without answering.
    });

    let mut ctx = tcp::connect(socket_addr).await?;
    let err = ctx
        .read_words(MemoryArea::DataMemory, 0, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ConnectionClosed));

    Ok(())
}

#[tokio::test]
async fn consecutive_calls_bump_the_service_id() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let socket_addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut service_ids = Vec::new();
        for _ in 0..3 {
            let request = read_frame(&mut stream).await;
            service_ids.push(request[9]);
            let response = response_body(&request, [0x00, 0x00], &[0x00, 0x00]);
            write_frame(&mut stream, &response).await;
        }
        service_ids
    });

    let mut ctx = tcp::connect(socket_addr).await?;
    for _ in 0..3 {
        ctx.read_words(MemoryArea::DataMemory, 0, 1).await?;
    }
    ctx.disconnect().await?;

    let service_ids = server.await?;
    assert_eq!(service_ids, [1, 2, 3]);
    Ok(())
}
