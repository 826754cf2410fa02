use std::env;
use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8081";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Process settings, read once at startup. The per-request timeout has no
/// per-call override surface.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub request_timeout: Duration,
}

impl Settings {
    pub fn from_env() -> Result<Self, String> {
        let bind_addr = env::var("LOADFIRE_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .map_err(|err| format!("Invalid LOADFIRE_ADDR `{bind_addr}`: {err}"))?;

        let timeout_secs = match env::var("LOADFIRE_TIMEOUT_SECS") {
            Ok(value) => value
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    format!("Invalid LOADFIRE_TIMEOUT_SECS `{value}`: expected a positive integer")
                })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            bind_addr,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
