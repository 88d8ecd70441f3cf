use serde::Deserialize;

/// Signaling server used when `SIGNALING_URL` is not set.
pub const DEFAULT_SIGNALING_URL: &str = "https://sinalizacao.contratos.app.br:3333";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub signaling_url: String,
    pub signaling_namespace: String,
    pub signaling_accept_invalid_certs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            signaling_url: DEFAULT_SIGNALING_URL.to_string(),
            signaling_namespace: "/".to_string(),
            signaling_accept_invalid_certs: true,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let config = Self {
            signaling_url: std::env::var("SIGNALING_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|url| {
                    if !url.starts_with("http://") && !url.starts_with("https://") {
                        anyhow::bail!("SIGNALING_URL must start with http:// or https://");
                    }
                    Ok(url)
                })
                .transpose()?
                .unwrap_or(defaults.signaling_url),
            signaling_namespace: std::env::var("SIGNALING_NAMESPACE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|ns| {
                    if !ns.starts_with('/') {
                        anyhow::bail!("SIGNALING_NAMESPACE must start with /");
                    }
                    Ok(ns)
                })
                .transpose()?
                .unwrap_or(defaults.signaling_namespace),
            signaling_accept_invalid_certs: match std::env::var("SIGNALING_ACCEPT_INVALID_CERTS") {
                Ok(value) => parse_flag(&value).ok_or_else(|| {
                    anyhow::anyhow!("SIGNALING_ACCEPT_INVALID_CERTS must be true or false")
                })?,
                Err(_) => defaults.signaling_accept_invalid_certs,
            },
        };

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Signaling URL: {}", config.signaling_url);
        tracing::debug!("Signaling namespace: {}", config.signaling_namespace);
        if config.signaling_accept_invalid_certs {
            tracing::warn!("Signaling TLS certificate verification is disabled");
        }

        Ok(config)
    }
}

/// Parses `true/false`, `1/0`, `yes/no` (case-insensitive).
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
