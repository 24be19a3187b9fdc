// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Asynchronous FINS/TCP client example

#[cfg(feature = "tcp")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use tokio_fins::prelude::*;

    env_logger::init();

    let socket_addr = "192.168.250.1:9600".parse()?;

    let mut ctx = tcp::connect(socket_addr).await?;

    println!("Reading DM100..DM101");
    let words = ctx.read_words(MemoryArea::DataMemory, 100, 2).await?;
    println!("DM100..DM101: {words:?}");

    println!("Writing DM200");
    ctx.write_words(MemoryArea::DataMemory, 200, &[0x1234]).await?;

    println!("Reading CIO 0.00..0.03");
    let bits = ctx.read_bits(MemoryArea::Cio, 0, 0, 4).await?;
    println!("CIO 0.00..0.03: {bits:?}");

    println!("Reading CPU unit status");
    let status = ctx.read_cpu_status().await?;
    println!("CPU unit status: {status:02X?}");

    println!("Disconnecting");
    ctx.disconnect().await?;

    Ok(())
}

#[cfg(not(feature = "tcp"))]
fn main() {
    println!("feature `tcp` is required to run this example");
    std::process::exit(1);
}
