// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Asynchronous FINS/UDP client example

#[cfg(feature = "udp")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::time::Duration;

    use tokio_fins::prelude::*;

    env_logger::init();

    let socket_addr = "192.168.250.1:9600".parse()?;

    let options = Options {
        destination: NodeAddress::cpu(0x01),
        timeout: Duration::from_secs(2),
        ..Options::default()
    };
    let mut ctx = udp::connect_with(socket_addr, options).await?;

    println!("Reading DM100..DM104");
    let words = ctx.read_words(MemoryArea::DataMemory, 100, 5).await?;
    println!("DM100..DM104: {words:?}");

    println!("Setting W0.05");
    ctx.write_bits(MemoryArea::Work, 0, 5, &[true]).await?;

    ctx.disconnect().await?;

    Ok(())
}

#[cfg(not(feature = "udp"))]
fn main() {
    println!("feature `udp` is required to run this example");
    std::process::exit(1);
}
