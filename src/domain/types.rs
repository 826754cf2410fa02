use serde::Serialize;

// ─── Fan-Out Report Types ─────────────────────────────────────────────────────

/// Result of one fired request. Exactly one outcome exists per launched
/// request, whether it succeeded, never connected, or died mid-read.
#[derive(Debug, Clone, Serialize)]
pub struct FireOutcome {
    pub url: String,
    pub status_code: u16,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FireOutcome {
    pub fn success(url: impl Into<String>, status_code: u16, body: String) -> Self {
        Self {
            url: url.into(),
            status_code,
            body,
            error: None,
        }
    }

    /// A failed request keeps whatever was learned before the failure:
    /// `status_code` stays 0 unless response headers already arrived.
    pub fn failure(url: impl Into<String>, status_code: u16, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status_code,
            body: String::new(),
            error: Some(error.into()),
        }
    }
}

/// Aggregate of one fan-out run: wall-clock duration from gate-open to the
/// last collected outcome, plus every outcome in completion order.
#[derive(Debug, Clone, Serialize)]
pub struct FireReport {
    pub duration: String,
    pub results: Vec<FireOutcome>,
}
