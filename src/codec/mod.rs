// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Byte-level frame encoding and decoding.
//!
//! Everything in this module is a pure function of its input bytes; all I/O
//! and framing specific to a transport lives in [`crate::service`]. All
//! multi-byte integers are big-endian as required on the wire.

use byteorder::{BigEndian, ByteOrder as _};

use crate::{
    bytes::{BufMut as _, Bytes, BytesMut},
    error::{Error, Result},
    frame::{
        CommandCode, EndCode, Header, MemoryAddress, Request, RequestFrame, Response, Word,
        HEADER_LEN, MIN_RESPONSE_LEN,
    },
    node::NodeAddress,
};

#[cfg(feature = "tcp")]
pub(crate) mod tcp;

#[allow(clippy::cast_possible_truncation)]
fn u16_len(len: usize) -> u16 {
    // This type conversion should always be safe, because either
    // the caller is responsible to pass a valid usize or the
    // possible values are limited by the protocol.
    debug_assert!(len <= u16::MAX.into());
    len as u16
}

/// Appends the 10 header bytes in wire order.
pub fn encode_header(header: &Header, buf: &mut BytesMut) {
    buf.put_u8(header.icf);
    buf.put_u8(header.reserved);
    buf.put_u8(header.gateway_count);
    buf.put_u8(header.destination.network);
    buf.put_u8(header.destination.node);
    buf.put_u8(header.destination.unit);
    buf.put_u8(header.source.network);
    buf.put_u8(header.source.node);
    buf.put_u8(header.source.unit);
    buf.put_u8(header.service_id);
}

/// Decodes the 10-byte header at the start of `buf`.
pub fn decode_header(buf: &[u8]) -> Result<Header> {
    if buf.len() < HEADER_LEN {
        return Err(Error::TruncatedFrame {
            expected: HEADER_LEN,
            actual: buf.len(),
        });
    }
    Ok(Header {
        icf: buf[0],
        reserved: buf[1],
        gateway_count: buf[2],
        destination: NodeAddress::new(buf[3], buf[4], buf[5]),
        source: NodeAddress::new(buf[6], buf[7], buf[8]),
        service_id: buf[9],
    })
}

fn put_memory_address(address: MemoryAddress, buf: &mut BytesMut) {
    buf.put_u8(address.area.value());
    buf.put_u16(address.offset);
    buf.put_u8(address.bit);
}

fn encode_request_payload(request: &Request<'_>, buf: &mut BytesMut) {
    use Request::*;

    match request {
        ReadWords(area, offset, quantity) => {
            put_memory_address(MemoryAddress::word(*area, *offset), buf);
            buf.put_u16(*quantity);
        }
        WriteWords(area, offset, words) => {
            put_memory_address(MemoryAddress::word(*area, *offset), buf);
            buf.put_u16(u16_len(words.len()));
            for word in words.as_ref() {
                buf.put_u16(*word);
            }
        }
        ReadBits(area, offset, bit, quantity) => {
            put_memory_address(MemoryAddress::bit(*area, *offset, *bit), buf);
            buf.put_u16(*quantity);
        }
        WriteBits(area, offset, bit, bits) => {
            put_memory_address(MemoryAddress::bit(*area, *offset, *bit), buf);
            buf.put_u16(u16_len(bits.len()));
            for bit in bits.as_ref() {
                buf.put_u8(if *bit { 0x01 } else { 0x00 });
            }
        }
        ReadCpuStatus => {}
        Custom(_, payload) => {
            buf.put_slice(payload);
        }
    }
}

/// Encodes a complete request frame: header, command, sub-command, payload.
pub fn encode_request(frame: &RequestFrame<'_>, buf: &mut BytesMut) {
    encode_header(&frame.header, buf);
    let (command, sub_command) = frame.request.command_code().value();
    buf.put_u8(command);
    buf.put_u8(sub_command);
    encode_request_payload(&frame.request, buf);
}

/// Decodes the header, command code and payload bytes of a request frame.
pub fn decode_request(buf: &[u8]) -> Result<(Header, CommandCode, &[u8])> {
    if buf.len() < HEADER_LEN + 2 {
        return Err(Error::TruncatedFrame {
            expected: HEADER_LEN + 2,
            actual: buf.len(),
        });
    }
    let header = decode_header(buf)?;
    let command = CommandCode::new(buf[HEADER_LEN], buf[HEADER_LEN + 1]);
    Ok((header, command, &buf[HEADER_LEN + 2..]))
}

/// Decodes a response frame.
///
/// The frame must contain at least the header, the echoed command code and
/// the two end code bytes; everything beyond is the payload.
pub fn decode_response(buf: &[u8]) -> Result<Response> {
    if buf.len() < MIN_RESPONSE_LEN {
        return Err(Error::TruncatedFrame {
            expected: MIN_RESPONSE_LEN,
            actual: buf.len(),
        });
    }
    let header = decode_header(buf)?;
    let command = CommandCode::new(buf[HEADER_LEN], buf[HEADER_LEN + 1]);
    let end_code = EndCode::new(buf[HEADER_LEN + 2], buf[HEADER_LEN + 3]);
    let payload = Bytes::copy_from_slice(&buf[MIN_RESPONSE_LEN..]);
    Ok(Response {
        header,
        command,
        end_code,
        payload,
    })
}

/// Encodes a response frame, the exact inverse of [`decode_response`].
///
/// Clients never send responses; this exists for tests and stub peers.
pub fn encode_response(response: &Response, buf: &mut BytesMut) {
    encode_header(&response.header, buf);
    let (command, sub_command) = response.command.value();
    buf.put_u8(command);
    buf.put_u8(sub_command);
    buf.put_u8(response.end_code.main.value());
    buf.put_u8(response.end_code.sub);
    buf.put_slice(&response.payload);
}

/// Decodes `count` big-endian words from a response payload.
pub fn decode_words(payload: &[u8], count: usize) -> Result<Vec<Word>> {
    let expected = count * 2;
    if payload.len() < expected {
        return Err(Error::TruncatedPayload {
            expected,
            actual: payload.len(),
        });
    }
    Ok((0..count)
        .map(|i| BigEndian::read_u16(&payload[i * 2..]))
        .collect())
}

/// Decodes `count` bits from a response payload, one byte per bit.
pub fn decode_bits(payload: &[u8], count: usize) -> Result<Vec<bool>> {
    if payload.len() < count {
        return Err(Error::TruncatedPayload {
            expected: count,
            actual: payload.len(),
        });
    }
    Ok(payload[..count].iter().map(|b| *b != 0x00).collect())
}
