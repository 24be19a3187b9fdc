// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types.

use std::{io, time::Duration};

use thiserror::Error;

use crate::frame::EndCode;

/// Result type for all FINS operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for FINS operations.
///
/// Every failure mode is a distinct variant so that callers can match on the
/// kind of failure without inspecting message text.
#[derive(Debug, Error)]
pub enum Error {
    /// Received frame bytes are too short to contain the required fields.
    #[error("truncated frame: expected at least {expected} bytes, got {actual}")]
    TruncatedFrame {
        /// Minimum number of bytes required.
        expected: usize,
        /// Number of bytes actually received.
        actual: usize,
    },

    /// A response payload is too short for the requested item count.
    #[error("truncated payload: expected at least {expected} bytes, got {actual}")]
    TruncatedPayload {
        /// Minimum number of bytes required.
        expected: usize,
        /// Number of bytes actually received.
        actual: usize,
    },

    /// A received length prefix exceeds the largest frame the protocol
    /// allows, so the stream cannot be trusted.
    #[error("oversized frame: length prefix {actual} exceeds limit {max}")]
    OversizedFrame {
        /// Frame length announced by the prefix.
        actual: usize,
        /// Largest acceptable frame length.
        max: usize,
    },

    /// Transport reachability could not be established.
    #[error("connect failed: {0}")]
    Connect(#[source] io::Error),

    /// No response was received within the session timeout.
    ///
    /// The session stays usable; the socket is not torn down.
    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// The stream ended before a complete response was received.
    #[error("connection closed by the remote node")]
    ConnectionClosed,

    /// The operation was attempted on a context without a bound transport.
    #[error("client is not connected")]
    NotConnected,

    /// The response was decoded but its end code signals a failure.
    ///
    /// The controller processed the request and rejected it; this is a
    /// protocol-level failure, not a transport failure.
    #[error("controller fault: {0}")]
    Fault(EndCode),

    /// The response carries a service id that differs from the request.
    #[error("service id mismatch: sent 0x{sent:02X}, received 0x{received:02X}")]
    ServiceIdMismatch {
        /// Service id stamped into the request header.
        sent: u8,
        /// Service id echoed by the response.
        received: u8,
    },

    /// Any other transport I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),
}
