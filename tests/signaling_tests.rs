/// Tests for the signaling connector that need a tokio runtime
use rust_contratos_core::errors::AppError;
use rust_contratos_core::signaling::{connect, SignalingConfig};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

struct CapturedWriter(Arc<Mutex<Vec<u8>>>);

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CapturedWriter(Arc::clone(&self.0))
    }
}

impl CapturedLogs {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("lock logs")).into_owned()
    }
}

impl io::Write for CapturedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "lock poisoned"))?;
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Nothing listens on the discard port
fn unreachable_config() -> SignalingConfig {
    SignalingConfig {
        url: "http://127.0.0.1:9".to_string(),
        namespace: "/".to_string(),
        accept_invalid_certs: true,
    }
}

#[tokio::test]
async fn test_connect_requires_username() {
    let result = connect("   ", &SignalingConfig::default()).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn test_connect_rejects_invalid_url() {
    let config = SignalingConfig {
        url: "sinalizacao sem esquema".to_string(),
        ..SignalingConfig::default()
    };
    let result = connect("maria", &config).await;
    assert!(matches!(result, Err(AppError::ConfigError(_))));
}

#[tokio::test]
async fn test_unreachable_server_reports_error() {
    let result = tokio::time::timeout(
        Duration::from_secs(10),
        connect("maria", &unreachable_config()),
    )
    .await;

    assert!(
        matches!(result, Ok(Err(AppError::SignalingError(_)))),
        "expected a signaling error before the timeout"
    );
}

#[tokio::test]
async fn test_unreachable_server_logs_connect_error() {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_max_level(Level::DEBUG)
        .finish();
    // Current-thread runtime: the connect future is polled on this thread
    let _guard = tracing::subscriber::set_default(subscriber);

    let result = tokio::time::timeout(
        Duration::from_secs(10),
        connect("maria", &unreachable_config()),
    )
    .await;
    assert!(matches!(result, Ok(Err(_))));

    let text = logs.text();
    assert!(text.contains("Connecting maria"), "logs: {}", text);
    assert!(text.contains("connect_error for maria"), "logs: {}", text);
}
