//! Port availability checks.

use crate::error::{Error, Result};
use std::net::TcpListener;
use tracing::debug;

/// Outcome of port negotiation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortChoice {
    /// Port the caller asked for
    pub requested: u16,
    /// Port that will actually be used
    pub port: u16,
}

impl PortChoice {
    /// Whether a different port had to be picked
    pub fn substituted(&self) -> bool {
        self.requested != self.port
    }
}

/// Whether something is already listening on `host:port`
pub fn is_port_in_use(host: &str, port: u16) -> bool {
    // Binding succeeds only when the port is free; the listener is dropped immediately
    TcpListener::bind((host, port)).is_err()
}

/// First free port at or above `start`
pub fn find_available_port(host: &str, start: u16) -> Result<u16> {
    (start..=u16::MAX)
        .find(|&port| !is_port_in_use(host, port))
        .ok_or_else(|| Error::no_available_port(host, start))
}

/// Use `preferred` if free, otherwise the first free port above it
pub fn negotiate_port(host: &str, preferred: u16) -> Result<PortChoice> {
    if !is_port_in_use(host, preferred) {
        return Ok(PortChoice {
            requested: preferred,
            port: preferred,
        });
    }

    debug!("Port {} on {} is in use, searching upward", preferred, host);
    let start = preferred
        .checked_add(1)
        .ok_or_else(|| Error::no_available_port(host, preferred))?;
    let port = find_available_port(host, start)?;

    Ok(PortChoice {
        requested: preferred,
        port,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: &str = "127.0.0.1";

    fn occupied_port() -> (TcpListener, u16) {
        let listener = TcpListener::bind((HOST, 0)).unwrap();
        let port = listener.local_addr().unwrap().port();
        (listener, port)
    }

    #[test]
    fn test_bound_port_is_in_use() {
        let (_listener, port) = occupied_port();
        assert!(is_port_in_use(HOST, port));
    }

    #[test]
    fn test_free_port_is_kept() {
        let (listener, port) = occupied_port();
        drop(listener);
        let choice = negotiate_port(HOST, port).unwrap();
        assert_eq!(choice.port, port);
        assert!(!choice.substituted());
    }

    #[test]
    fn test_busy_port_is_substituted_with_higher_one() {
        let (_listener, port) = occupied_port();
        if port == u16::MAX {
            return;
        }
        let choice = negotiate_port(HOST, port).unwrap();
        assert_eq!(choice.requested, port);
        assert!(choice.port > port);
        assert!(choice.substituted());
    }

    #[test]
    fn test_find_available_port_skips_busy_port() {
        let (_listener, port) = occupied_port();
        if port == u16::MAX {
            return;
        }
        let found = find_available_port(HOST, port).unwrap();
        assert_ne!(found, port);
        assert!(found > port);
    }
}
