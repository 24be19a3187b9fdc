// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport implementations performing the one-shot request/response
//! exchange.

#[cfg(feature = "tcp")]
pub(crate) mod tcp;

#[cfg(feature = "udp")]
pub(crate) mod udp;

use std::sync::{Mutex, PoisonError};

use crate::frame::ServiceId;

#[cfg(any(feature = "tcp", feature = "udp"))]
use crate::{
    error::{Error, Result},
    frame::Response,
};

/// Hands out service ids for one session.
///
/// Stamping must be atomic with respect to concurrent calls so that two
/// in-flight requests never share an id in overlapping windows. The lock is
/// held only for the increment, never across network I/O.
#[derive(Debug)]
pub(crate) struct ServiceIdCounter(Mutex<ServiceId>);

impl ServiceIdCounter {
    pub(crate) const fn new() -> Self {
        Self(Mutex::new(0))
    }

    /// The next service id, incrementing modulo 256.
    pub(crate) fn next(&self) -> ServiceId {
        let mut sid = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        *sid = sid.wrapping_add(1);
        *sid
    }
}

/// Check that the response echoes the service id stamped into the request.
#[cfg(any(feature = "tcp", feature = "udp"))]
pub(crate) fn verify_response(sent: ServiceId, response: &Response) -> Result<()> {
    let received = response.header.service_id;
    if received != sent {
        return Err(Error::ServiceIdMismatch { sent, received });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, sync::Arc, thread};

    use super::*;

    #[test]
    fn service_ids_increment_from_one() {
        let counter = ServiceIdCounter::new();
        assert_eq!(counter.next(), 1);
        assert_eq!(counter.next(), 2);
        assert_eq!(counter.next(), 3);
    }

    #[test]
    fn service_ids_wrap_modulo_256() {
        let counter = ServiceIdCounter::new();
        for _ in 0..255 {
            counter.next();
        }
        assert_eq!(counter.next(), 0);
        assert_eq!(counter.next(), 1);
    }

    #[test]
    fn concurrent_stamping_yields_no_duplicates_and_no_gaps() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 25;

        let counter = Arc::new(ServiceIdCounter::new());
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    (0..PER_THREAD).map(|_| counter.next()).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.extend(handle.join().unwrap());
        }

        let unique: HashSet<ServiceId> = ids.iter().copied().collect();
        assert_eq!(unique.len(), THREADS * PER_THREAD);
        let expected: HashSet<ServiceId> = (1..=(THREADS * PER_THREAD) as u8).collect();
        assert_eq!(unique, expected);
    }

    #[cfg(any(feature = "tcp", feature = "udp"))]
    #[test]
    fn response_service_id_is_verified() {
        use crate::{
            bytes::Bytes,
            frame::{CommandCode, EndCode, Header},
            node::NodeAddress,
        };

        let response = Response {
            header: Header {
                icf: 0xC0,
                ..Header::command(NodeAddress::cpu(1), NodeAddress::cpu(1), 0x2A)
            },
            command: CommandCode::MemoryAreaRead,
            end_code: EndCode::new(0x00, 0x00),
            payload: Bytes::new(),
        };

        assert!(verify_response(0x2A, &response).is_ok());
        assert!(matches!(
            verify_response(0x2B, &response),
            Err(Error::ServiceIdMismatch {
                sent: 0x2B,
                received: 0x2A
            })
        ));
    }
}
