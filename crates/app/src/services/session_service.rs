//! Session service — the gate between the stored login flag and the
//! broker connection.

use std::time::Duration;

use tracing::{info, warn};

use homelink_domain::endpoint::Endpoint;
use homelink_domain::error::{ConnectError, HomelinkError};

use crate::ports::{HubConnection, PreferenceStore, keys};

/// Bound applied to the connect attempt during login and startup
/// resumption.
pub const LOGIN_TIMEOUT: Duration = Duration::from_secs(5);

/// The fixed credential pair. The real credential check is an external
/// concern; this stands in for it as the hardcoded gate the connect hangs
/// off.
const USERNAME: &str = "admin";
const PASSWORD: &str = "admin";

/// Session-level failures, keeping the credential and transport outcomes
/// distinguishable for user messaging.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The supplied credentials did not match the fixed pair.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The connect attempt failed; timeout stays distinct from rejection.
    #[error("connect failed")]
    Connect(#[from] ConnectError),

    /// Reading or writing session state failed.
    #[error("session store error")]
    Store(#[from] HomelinkError),
}

/// Application service owning login state and startup resumption.
pub struct SessionService<S, C> {
    store: S,
    connection: C,
}

impl<S, C> SessionService<S, C>
where
    S: PreferenceStore,
    C: HubConnection + Clone + Send + Sync + 'static,
{
    /// Create a new service over the given store and connection.
    pub fn new(store: S, connection: C) -> Self {
        Self { store, connection }
    }

    /// Read the persisted login flag; an absent key means logged out.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the store.
    pub async fn is_logged_in(&self) -> Result<bool, HomelinkError> {
        Ok(self.store.get_bool(keys::LOGGED_IN).await?.unwrap_or(false))
    }

    /// Check credentials and, on a match, connect with the login timeout.
    ///
    /// The login flag and endpoint are persisted only after the attempt
    /// reaches `Connected`.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidCredentials`] on a credential mismatch (no
    /// connect is attempted), [`SessionError::Connect`] when the attempt
    /// times out or is rejected, or [`SessionError::Store`] when
    /// persisting session state fails.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), SessionError> {
        if username != USERNAME || password != PASSWORD {
            return Err(SessionError::InvalidCredentials);
        }
        let endpoint = self.resolve_endpoint().await?;
        self.connection.connect(endpoint.clone(), LOGIN_TIMEOUT).await?;

        self.store.set_bool(keys::LOGGED_IN, true).await?;
        self.store.set_string(keys::MQTT_HOST, &endpoint.host).await?;
        self.store
            .set_int(keys::MQTT_PORT, i64::from(endpoint.port))
            .await?;
        info!(endpoint = %endpoint, "session established");
        Ok(())
    }

    /// Clear the login flag and tear the connection down.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the store; the disconnect
    /// itself cannot fail.
    pub async fn logout(&self) -> Result<(), HomelinkError> {
        self.store.set_bool(keys::LOGGED_IN, false).await?;
        self.connection.disconnect();
        Ok(())
    }

    /// Startup gate: read the login flag once and, when set, spawn the
    /// reconnect in the background.
    ///
    /// Returns the flag immediately — the initial screen decision never
    /// blocks on the connection outcome, which is observed through the
    /// `connected` signal instead.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the store.
    pub async fn resume(&self) -> Result<bool, HomelinkError> {
        let logged_in = self.is_logged_in().await?;
        if !logged_in {
            return Ok(false);
        }

        let endpoint = self.resolve_endpoint().await.unwrap_or_default();
        let connection = self.connection.clone();
        tokio::spawn(async move {
            match connection.connect(endpoint.clone(), LOGIN_TIMEOUT).await {
                Ok(()) => info!(endpoint = %endpoint, "session resumed"),
                Err(err) => warn!(endpoint = %endpoint, error = %err, "session resume connect failed"),
            }
        });
        Ok(true)
    }

    /// Endpoint resolution chain: persisted endpoint, then the manager's
    /// last-known endpoint, then the hardcoded default.
    async fn resolve_endpoint(&self) -> Result<Endpoint, HomelinkError> {
        let host = self.store.get_string(keys::MQTT_HOST).await?;
        let port = self
            .store
            .get_int(keys::MQTT_PORT)
            .await?
            .and_then(|p| u16::try_from(p).ok());

        if let Some(host) = host {
            let port = port.unwrap_or(homelink_domain::endpoint::DEFAULT_PORT);
            return Ok(Endpoint::new(host, port).or_default());
        }
        if let Some(last) = self.connection.last_endpoint() {
            return Ok(last);
        }
        Ok(Endpoint::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeConnection, InMemoryStore};

    fn make_service(
        connection: FakeConnection,
    ) -> SessionService<InMemoryStore, FakeConnection> {
        SessionService::new(InMemoryStore::default(), connection)
    }

    #[tokio::test]
    async fn should_report_logged_out_when_store_is_empty() {
        let svc = make_service(FakeConnection::new());
        assert!(!svc.is_logged_in().await.unwrap());
    }

    #[tokio::test]
    async fn should_reject_wrong_credentials_without_connecting() {
        let connection = FakeConnection::new();
        let svc = make_service(connection.clone());

        let result = svc.login("admin", "nope").await;

        assert!(matches!(result, Err(SessionError::InvalidCredentials)));
        assert!(connection.connect_requests().is_empty());
        assert_eq!(svc.store.bool(keys::LOGGED_IN), None);
    }

    #[tokio::test]
    async fn should_set_flag_and_persist_endpoint_after_successful_login() {
        let connection = FakeConnection::new();
        let svc = make_service(connection.clone());
        svc.store.put_string(keys::MQTT_HOST, "10.0.2.2");
        svc.store.put_int(keys::MQTT_PORT, 1884);

        svc.login("admin", "admin").await.unwrap();

        assert!(connection.connected());
        assert_eq!(svc.store.bool(keys::LOGGED_IN), Some(true));
        assert_eq!(
            connection.connect_requests(),
            [Endpoint::new("10.0.2.2", 1884)]
        );
    }

    #[tokio::test]
    async fn should_not_set_flag_when_connect_is_rejected() {
        let connection = FakeConnection::new();
        connection.refuse_next(ConnectError::Rejected {
            reason: "connection refused".to_string(),
        });
        let svc = make_service(connection.clone());

        let result = svc.login("admin", "admin").await;

        assert!(matches!(
            result,
            Err(SessionError::Connect(ConnectError::Rejected { .. }))
        ));
        assert_eq!(svc.store.bool(keys::LOGGED_IN), None);
    }

    #[tokio::test]
    async fn should_surface_timeout_distinctly_on_login() {
        let connection = FakeConnection::new();
        connection.refuse_next(ConnectError::Timeout);
        let svc = make_service(connection);

        let result = svc.login("admin", "admin").await;

        assert!(matches!(
            result,
            Err(SessionError::Connect(ConnectError::Timeout))
        ));
    }

    #[tokio::test]
    async fn should_clear_flag_and_disconnect_on_logout() {
        let connection = FakeConnection::connected_fake();
        let svc = make_service(connection.clone());
        svc.store.put_bool(keys::LOGGED_IN, true);

        svc.logout().await.unwrap();

        assert_eq!(svc.store.bool(keys::LOGGED_IN), Some(false));
        assert!(!connection.connected());
    }

    #[tokio::test]
    async fn should_not_spawn_connect_when_resume_finds_no_session() {
        let connection = FakeConnection::new();
        let svc = make_service(connection.clone());

        let resumed = svc.resume().await.unwrap();

        assert!(!resumed);
        tokio::task::yield_now().await;
        assert!(connection.connect_requests().is_empty());
    }

    #[tokio::test]
    async fn should_reconnect_in_background_when_resuming_session() {
        let connection = FakeConnection::new();
        let svc = make_service(connection.clone());
        svc.store.put_bool(keys::LOGGED_IN, true);
        svc.store.put_string(keys::MQTT_HOST, "broker.local");

        let resumed = svc.resume().await.unwrap();
        assert!(resumed);

        let mut rx = connection.subscribe_connected();
        tokio::time::timeout(Duration::from_secs(1), rx.wait_for(|c| *c))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            connection.connect_requests(),
            [Endpoint::new("broker.local", 1883)]
        );
    }

    #[tokio::test]
    async fn should_fall_back_to_manager_endpoint_then_default() {
        let connection = FakeConnection::new();
        let svc = make_service(connection.clone());

        // No store value, no manager memory: hardcoded default.
        let endpoint = svc.resolve_endpoint().await.unwrap();
        assert_eq!(endpoint, Endpoint::default());

        // Manager memory takes precedence over the default.
        connection
            .connect(Endpoint::new("10.0.2.2", 1883), LOGIN_TIMEOUT)
            .await
            .unwrap();
        let endpoint = svc.resolve_endpoint().await.unwrap();
        assert_eq!(endpoint, Endpoint::new("10.0.2.2", 1883));

        // A persisted host beats both.
        svc.store.put_string(keys::MQTT_HOST, "hub.lan");
        let endpoint = svc.resolve_endpoint().await.unwrap();
        assert_eq!(endpoint, Endpoint::new("hub.lan", 1883));
    }

    #[tokio::test]
    async fn should_normalise_empty_persisted_host_to_default() {
        let svc = make_service(FakeConnection::new());
        svc.store.put_string(keys::MQTT_HOST, "");

        let endpoint = svc.resolve_endpoint().await.unwrap();

        assert_eq!(endpoint.host, "localhost");
    }
}
