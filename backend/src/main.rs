//! Backend entry point: configuration from the environment, tracing
//! setup, and server start.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use actix_web::web;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::server::{ServerConfig, create_server};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SECRET_PATH: &str = "/var/run/secrets/token_secret";

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

    let bind_addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.into())
        .parse()
        .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR: {e}")))?;

    let secret = load_token_secret()?;
    let mut config = ServerConfig::new(bind_addr, secret);

    if let Ok(raw) = env::var("TOKEN_TTL_SECS") {
        let secs: u64 = raw
            .parse()
            .map_err(|e| std::io::Error::other(format!("invalid TOKEN_TTL_SECS: {e}")))?;
        config = config.with_token_ttl(Duration::from_secs(secs));
    }
    if let Ok(dir) = env::var("DATA_DIR") {
        config = config.with_data_dir(dir);
    }
    let open_reads = env::var("OPEN_READS").ok().as_deref() == Some("1");
    config = config.with_open_reads(open_reads);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}

/// Read the token signing secret from disk.
///
/// Debug builds (or `TOKEN_ALLOW_EPHEMERAL=1`) fall back to a random
/// secret so local runs need no provisioning; release builds refuse to
/// start without one, since an ephemeral secret invalidates every
/// token on restart.
fn load_token_secret() -> std::io::Result<Vec<u8>> {
    let secret_path =
        env::var("TOKEN_SECRET_FILE").unwrap_or_else(|_| DEFAULT_SECRET_PATH.into());
    match std::fs::read(&secret_path) {
        Ok(bytes) => Ok(bytes),
        Err(e) => {
            let allow_dev = env::var("TOKEN_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %secret_path, error = %e, "using ephemeral token secret (dev only)");
                Ok(uuid::Uuid::new_v4().as_bytes().to_vec())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read token secret at {secret_path}: {e}"
                )))
            }
        }
    }
}
