// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Helpers for building stub controller responses.

/// Builds a response frame body answering the given request frame body.
///
/// Mirrors what a controller does: the source and destination nodes are
/// swapped, the service id and command code are echoed back, the end code
/// and payload follow. The TCP length prefix is not included.
pub fn response_body(request: &[u8], end: [u8; 2], payload: &[u8]) -> Vec<u8> {
    assert!(request.len() >= 12, "request frame too short");
    let mut body = Vec::with_capacity(14 + payload.len());
    body.push(0xC0); // ICF: response, response required
    body.push(0x00); // RSV
    body.push(0x02); // GCT
    body.extend_from_slice(&request[6..9]); // destination = requesting node
    body.extend_from_slice(&request[3..6]); // source = responding node
    body.push(request[9]); // echoed service id
    body.extend_from_slice(&request[10..12]); // echoed command code
    body.extend_from_slice(&end);
    body.extend_from_slice(payload);
    body
}
