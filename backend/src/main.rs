//! Backend entry-point: wires session, routing, and media configuration.

use std::env;
use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use backend::server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    let key = match std::fs::read(&key_path) {
        // Key::derive_from panics below 64 bytes, so check first.
        Ok(bytes) if bytes.len() >= 64 => Key::derive_from(&bytes),
        Ok(bytes) => {
            return Err(std::io::Error::other(format!(
                "session key at {key_path} is too short: {} bytes, need at least 64",
                bytes.len()
            )));
        }
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Key::generate()
            } else {
                return Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )));
            }
        }
    };

    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);

    let bind_addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".into())
        .parse()
        .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR: {e}")))?;

    let mut config = ServerConfig::new(key, cookie_secure, SameSite::Lax, bind_addr);
    if let Ok(raw) = env::var("MEDIA_ENDPOINT") {
        let endpoint = Url::parse(&raw)
            .map_err(|e| std::io::Error::other(format!("invalid MEDIA_ENDPOINT: {e}")))?;
        config = config.with_media_endpoint(endpoint);
    }

    create_server(config)?.await
}
