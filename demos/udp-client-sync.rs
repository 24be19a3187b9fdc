// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Synchronous FINS/UDP client example

#[cfg(all(feature = "udp", feature = "sync"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use tokio_fins::prelude::*;

    env_logger::init();

    let socket_addr = "192.168.250.1:9600".parse()?;

    let mut ctx = sync::udp::connect(socket_addr)?;
    let words = ctx.read_words(MemoryArea::DataMemory, 0, 8)?;
    println!("DM0..DM7: {words:?}");

    Ok(())
}

#[cfg(not(all(feature = "udp", feature = "sync")))]
fn main() {
    println!("features `udp` and `sync` are required to run this example");
    std::process::exit(1);
}
