//! Endpoint — the `(host, port)` pair identifying a broker instance.

use serde::{Deserialize, Serialize};

/// Default broker host: the development loopback alias used when no host
/// has been configured or persisted.
pub const DEFAULT_HOST: &str = "localhost";

/// Default MQTT broker port.
pub const DEFAULT_PORT: u16 = 1883;

/// A broker address. An empty host means "use the default".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    /// Create an endpoint from explicit parts.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Normalise an empty host to [`DEFAULT_HOST`].
    #[must_use]
    pub fn or_default(self) -> Self {
        if self.host.is_empty() {
            Self {
                host: DEFAULT_HOST.to_string(),
                port: self.port,
            }
        } else {
            self
        }
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
