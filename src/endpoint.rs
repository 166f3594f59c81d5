//! Agent address.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Default SNMP agent port.
pub const DEFAULT_PORT: u16 = 161;

/// Address of a remote SNMP agent: hostname or IPv4 literal plus UDP port.
///
/// Validated on construction and immutable afterwards. Name resolution is
/// deferred to the transport, so an `Endpoint` may name a host that does not
/// resolve.
///
/// # Examples
///
/// ```
/// use snmpv1_manager::Endpoint;
///
/// let agent: Endpoint = "demo.example.net".parse().unwrap();
/// assert_eq!(agent.port(), 161);
/// assert_eq!(agent.to_string(), "demo.example.net:161");
///
/// assert!(Endpoint::new("10.0.0.1", 0).is_err());
/// assert!("".parse::<Endpoint>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    host: Box<str>,
    port: u16,
}

impl Endpoint {
    /// Create an endpoint, rejecting an empty or malformed host and port 0.
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self> {
        let host = host.into();

        if host.is_empty() {
            return Err(Error::validation("endpoint host is empty"));
        }
        if let Some(c) = host
            .chars()
            .find(|c| c.is_whitespace() || matches!(c, ':' | '/'))
        {
            return Err(Error::validation(format!(
                "endpoint host {:?} contains {:?}",
                host, c
            )));
        }
        if port == 0 {
            return Err(Error::validation("endpoint port must be in 1..=65535"));
        }

        Ok(Self {
            host: host.into_boxed_str(),
            port,
        })
    }

    /// Hostname or IPv4 literal.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// UDP port.
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl FromStr for Endpoint {
    type Err = Box<Error>;

    /// Parse `host` or `host:port`; the port defaults to 161.
    fn from_str(s: &str) -> Result<Self> {
        match s.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|_| {
                    Error::validation(format!("invalid port {:?} in endpoint {:?}", port, s))
                })?;
                Self::new(host, port)
            }
            None => Self::new(s, DEFAULT_PORT),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_host_and_port() {
        let ep: Endpoint = "127.0.0.1:1161".parse().unwrap();
        assert_eq!(ep.host(), "127.0.0.1");
        assert_eq!(ep.port(), 1161);
    }

    #[test]
    fn port_defaults_to_161() {
        let ep: Endpoint = "localhost".parse().unwrap();
        assert_eq!(ep.port(), DEFAULT_PORT);
    }

    #[test]
    fn rejects_malformed_input() {
        for input in ["", ":161", "host:", "host:0", "host:70000", "a b:161", "a/b", "::1"] {
            let err = input.parse::<Endpoint>().unwrap_err();
            assert!(
                matches!(*err, Error::Validation(_)),
                "{:?} should be rejected",
                input
            );
        }
    }

    #[test]
    fn display_roundtrips() {
        let ep = Endpoint::new("agent.local", 10161).unwrap();
        assert_eq!(ep.to_string().parse::<Endpoint>().unwrap(), ep);
    }
}
