//! MQTT adapter configuration.

use serde::Deserialize;

use homelink_domain::endpoint::Endpoint;

/// Configuration for the broker connection.
///
/// There is deliberately no `client_id` field: a fresh identity is
/// generated per connection attempt to avoid broker-side session
/// collisions.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// Broker hostname or IP address.
    pub host: String,
    /// Broker port.
    pub port: u16,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
}

impl MqttConfig {
    /// The configured endpoint as a domain value.
    #[must_use]
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.host.clone(), self.port).or_default()
    }
}

impl Default for MqttConfig {
    fn default() -> Self {
        let endpoint = Endpoint::default();
        Self {
            host: endpoint.host,
            port: endpoint.port,
            keep_alive_secs: 30,
        }
    }
}
