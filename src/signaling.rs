//! Real-time signaling connection.
//!
//! Thin configuration layer over the Socket.IO client: forces the websocket
//! transport, optionally accepts self-signed certificates, identifies the
//! user through the `username` query parameter and logs lifecycle events.
//! The connection state machine (and any reconnection) belongs to the
//! library; the returned handle is owned by the caller.

use crate::config::Config;
use crate::errors::{AppError, ResultExt};
use futures_util::FutureExt;
use rust_socketio::asynchronous::{Client, ClientBuilder};
use rust_socketio::{Event, Payload, TransportType};
use url::Url;

/// Settings of the signaling connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalingConfig {
    pub url: String,
    pub namespace: String,
    pub accept_invalid_certs: bool,
}

impl From<&Config> for SignalingConfig {
    fn from(config: &Config) -> Self {
        Self {
            url: config.signaling_url.clone(),
            namespace: config.signaling_namespace.clone(),
            accept_invalid_certs: config.signaling_accept_invalid_certs,
        }
    }
}

impl Default for SignalingConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// Builds the connection URL carrying the user name.
pub fn signaling_url(base_url: &str, username: &str) -> Result<Url, AppError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::BadRequest(
            "Username is required for signaling".to_string(),
        ));
    }

    let mut url = Url::parse(base_url)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::ConfigError(format!(
            "Unsupported signaling scheme: {}",
            url.scheme()
        )));
    }

    url.query_pairs_mut().append_pair("username", username);
    Ok(url)
}

fn tls_connector(accept_invalid_certs: bool) -> Result<native_tls::TlsConnector, AppError> {
    let connector = native_tls::TlsConnector::builder()
        .danger_accept_invalid_certs(accept_invalid_certs)
        .danger_accept_invalid_hostnames(accept_invalid_certs)
        .build()?;
    Ok(connector)
}

/// Live signaling connection of one user.
pub struct SignalingConnection {
    client: Client,
    username: String,
}

impl SignalingConnection {
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Underlying Socket.IO client, for registering application events.
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub async fn emit(&self, event: &str, data: serde_json::Value) -> Result<(), AppError> {
        self.client
            .emit(event, data)
            .await
            .with_context(|| format!("Failed to emit '{}'", event))
    }

    pub async fn disconnect(self) -> Result<(), AppError> {
        tracing::info!("Closing signaling connection for {}", self.username);
        self.client
            .disconnect()
            .await
            .context("Failed to close signaling connection")
    }
}

/// Opens a signaling connection for `username`.
///
/// Connect, connection error and disconnect events are logged. A failed
/// handshake is logged as `connect_error` and returned; errors after the
/// handshake are only logged.
pub async fn connect(
    username: &str,
    config: &SignalingConfig,
) -> Result<SignalingConnection, AppError> {
    let url = signaling_url(&config.url, username)?;
    let username = username.trim().to_string();
    tracing::info!(
        "Connecting {} to signaling server {}{}",
        username,
        config.url,
        config.namespace
    );

    let on_connect_user = username.clone();
    let on_error_user = username.clone();
    let on_close_user = username.clone();

    let result = ClientBuilder::new(url.as_str())
        .namespace(config.namespace.clone())
        .transport_type(TransportType::Websocket)
        .tls_config(tls_connector(config.accept_invalid_certs)?)
        .on(Event::Connect, move |_payload: Payload, _socket: Client| {
            let user = on_connect_user.clone();
            async move {
                tracing::info!("✓ Signaling connected: {}", user);
            }
            .boxed()
        })
        .on(Event::Error, move |payload: Payload, _socket: Client| {
            let user = on_error_user.clone();
            async move {
                tracing::error!("Signaling connect_error for {}: {:?}", user, payload);
            }
            .boxed()
        })
        .on(Event::Close, move |payload: Payload, _socket: Client| {
            let user = on_close_user.clone();
            async move {
                tracing::warn!("Signaling disconnected for {}: {:?}", user, payload);
            }
            .boxed()
        })
        .connect()
        .await;

    match result {
        Ok(client) => Ok(SignalingConnection { client, username }),
        Err(e) => {
            tracing::error!("Signaling connect_error for {}: {}", username, e);
            Err(AppError::from(e))
        }
    }
}
