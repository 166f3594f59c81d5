//! Manager configuration and builder.

use std::time::Duration;

use bytes::Bytes;

use crate::codec::{BerCodec, Codec};
use crate::error::{Error, Result};
use crate::executor::{Executor, Manager};
use crate::transport::{Connector, UdpConnector};

/// Default request timeout (5 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default community string.
pub const DEFAULT_COMMUNITY: &[u8] = b"public";

/// Manager configuration.
///
/// Most users should use [`ManagerBuilder`] rather than constructing this directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Community string (default: "public")
    pub community: Bytes,
    /// Time to wait for the matching response of one exchange (default: 5 seconds)
    pub timeout: Duration,
    /// Extra attempts after a timed-out exchange (default: 0)
    pub retries: u32,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            community: Bytes::from_static(DEFAULT_COMMUNITY),
            timeout: DEFAULT_TIMEOUT,
            retries: 0,
        }
    }
}

/// Builder for [`Manager`] and other executors.
///
/// # Example
///
/// ```rust
/// use snmpv1_manager::Manager;
/// use std::time::Duration;
///
/// let manager = Manager::builder()
///     .community("private")
///     .timeout(Duration::from_secs(2))
///     .retries(1)
///     .build()
///     .unwrap();
/// assert_eq!(manager.config().retries, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManagerBuilder {
    config: ManagerConfig,
}

impl ManagerBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the community string (default: "public").
    pub fn community(mut self, community: impl AsRef<[u8]>) -> Self {
        self.config.community = Bytes::copy_from_slice(community.as_ref());
        self
    }

    /// Set the per-exchange timeout (default: 5 seconds).
    ///
    /// The whole wait for a matching response shares this deadline; stray
    /// datagrams do not extend it.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set how many times a timed-out exchange is retried (default: 0).
    ///
    /// Only timeouts are retried. Agent rejections and other failures are
    /// reported on the first attempt.
    pub fn retries(mut self, retries: u32) -> Self {
        self.config.retries = retries;
        self
    }

    /// Validate and return the configuration.
    pub fn into_config(self) -> Result<ManagerConfig> {
        if self.config.timeout.is_zero() {
            return Err(Error::validation("timeout must be greater than zero"));
        }
        Ok(self.config)
    }

    /// Build a UDP manager with the BER codec.
    pub fn build(self) -> Result<Manager> {
        self.build_with(UdpConnector, BerCodec)
    }

    /// Build an executor over a custom connector and codec.
    pub fn build_with<C: Connector, K: Codec>(
        self,
        connector: C,
        codec: K,
    ) -> Result<Executor<C, K>> {
        Ok(Executor::new(self.into_config()?, connector, codec))
    }
}
