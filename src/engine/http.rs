use std::time::Duration;

use reqwest::Client;

/// Builds the process-wide outbound client: one connection pool shared by
/// every launcher and every inbound call, carrying the fixed per-request
/// timeout. Safe for concurrent use by contract.
pub fn build_client(timeout: Duration) -> Result<Client, String> {
    Client::builder()
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|err| format!("Failed to build HTTP client: {err}"))
}

pub fn classify_transport_error(err: &reqwest::Error) -> &'static str {
    if err.is_timeout() {
        return "timed out";
    }

    let message = err.to_string().to_ascii_lowercase();
    if message.contains("dns") || message.contains("failed to lookup address") {
        return "dns error";
    }
    if message.contains("tls") || message.contains("ssl") || message.contains("certificate") {
        return "tls error";
    }
    if err.is_connect() {
        return "connect error";
    }

    "network error"
}
