// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! FINS/TCP stream framing.
//!
//! Each frame is preceded by a 4-byte big-endian length prefix counting the
//! frame bytes, excluding the prefix itself.

use byteorder::{BigEndian, ByteOrder as _};
use tokio_util::codec::{Decoder, Encoder};

use crate::{
    bytes::{Buf as _, BufMut as _, BytesMut},
    codec,
    error::Error,
    frame::{RequestFrame, Response},
};

/// Size of the length prefix on a TCP stream.
const LENGTH_PREFIX_LEN: usize = 4;

/// Largest acceptable frame body. FINS frames stay within ~2 KiB of
/// payload plus the header; anything announcing more is a corrupt or
/// hostile peer and must not drive the buffer allocation.
const MAX_FRAME_LEN: usize = 4096;

/// FINS/TCP client codec.
///
/// Stateless; reassembly of partially delivered frames is handled by the
/// read buffer of the surrounding [`Framed`](tokio_util::codec::Framed).
#[derive(Debug, Default)]
pub(crate) struct ClientCodec;

impl Decoder for ClientCodec {
    type Item = Response;
    type Error = Error;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Response>, Error> {
        if buf.len() < LENGTH_PREFIX_LEN {
            return Ok(None);
        }
        let len = BigEndian::read_u32(&buf[..LENGTH_PREFIX_LEN]) as usize;
        if len > MAX_FRAME_LEN {
            return Err(Error::OversizedFrame {
                actual: len,
                max: MAX_FRAME_LEN,
            });
        }
        if buf.len() < LENGTH_PREFIX_LEN + len {
            buf.reserve(LENGTH_PREFIX_LEN + len - buf.len());
            return Ok(None);
        }
        buf.advance(LENGTH_PREFIX_LEN);
        let body = buf.split_to(len);
        codec::decode_response(&body).map(Some)
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Response>, Error> {
        match self.decode(buf)? {
            Some(response) => Ok(Some(response)),
            // The remote end closed mid-frame.
            None if !buf.is_empty() => Err(Error::ConnectionClosed),
            None => Ok(None),
        }
    }
}

impl<'a> Encoder<RequestFrame<'a>> for ClientCodec {
    type Error = Error;

    fn encode(&mut self, frame: RequestFrame<'a>, buf: &mut BytesMut) -> Result<(), Error> {
        let mut body = BytesMut::new();
        codec::encode_request(&frame, &mut body);
        buf.reserve(LENGTH_PREFIX_LEN + body.len());
        buf.put_u32(body.len() as u32);
        buf.put_slice(&body);
        Ok(())
    }
}
