use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method};
use tokio::sync::{broadcast, mpsc};

use crate::domain::{FireOutcome, FireReport};
use crate::engine::http::classify_transport_error;

// ─── Request Template ─────────────────────────────────────────────────────────

/// One inbound call distilled into the immutable shape every launcher fires.
///
/// Headers are copied out of the inbound request, never aliased to it. The
/// body is one shared buffer: each launcher clones the `Bytes` handle and gets
/// an independent cursor over the same allocation, so no launcher can starve
/// another by consuming a stream.
#[derive(Debug, Clone)]
pub struct FireTemplate {
    method: Method,
    url: String,
    headers: HeaderMap,
    body: Bytes,
}

impl FireTemplate {
    pub fn new(method: Method, url: impl Into<String>, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            url: url.into(),
            headers,
            body,
        }
    }
}

// ─── Launcher ─────────────────────────────────────────────────────────────────

/// Performs one HTTP round trip and emits exactly one outcome.
///
/// The gate is awaited only after the outbound request has been built: a
/// launcher that cannot construct its request reports immediately and never
/// consumes a gate release. No stage retries; every failure is terminal for
/// this launcher and isolated from its siblings.
async fn launch_one(
    client: Client,
    template: Arc<FireTemplate>,
    mut gate: broadcast::Receiver<()>,
    outcomes: mpsc::Sender<FireOutcome>,
) {
    let request = match client
        .request(template.method.clone(), template.url.as_str())
        .headers(template.headers.clone())
        .body(template.body.clone())
        .build()
    {
        Ok(request) => request,
        Err(err) => {
            let outcome =
                FireOutcome::failure(&template.url, 0, format!("Failed to build request: {err}"));
            let _ = outcomes.send(outcome).await;
            return;
        }
    };

    // Suspend until the coordinator opens the gate. A closed channel counts as
    // released; the launcher must fire either way.
    let _ = gate.recv().await;

    let response = match client.execute(request).await {
        Ok(response) => response,
        Err(err) => {
            let reason = format!("Request failed ({}): {err}", classify_transport_error(&err));
            let _ = outcomes
                .send(FireOutcome::failure(&template.url, 0, reason))
                .await;
            return;
        }
    };

    let status_code = response.status().as_u16();
    match response.bytes().await {
        Ok(bytes) => {
            let body = String::from_utf8_lossy(&bytes).to_string();
            let _ = outcomes
                .send(FireOutcome::success(&template.url, status_code, body))
                .await;
        }
        Err(err) => {
            let reason = format!("Failed to read response body: {err}");
            let _ = outcomes
                .send(FireOutcome::failure(&template.url, status_code, reason))
                .await;
        }
    }
}

// ─── Fan-Out Coordinator ──────────────────────────────────────────────────────

/// Fires `count` concurrent copies of the template and aggregates every
/// outcome into one report.
///
/// All launchers are spawned first, then released together through a one-shot
/// broadcast, so none fires before gate-open and none trails behind the spawn
/// loop. The outcome channel is sized to `count`: a launcher can never block
/// reporting, and draining after the join is exhaustive because every sender
/// is gone by then. The reported duration runs from gate-open to the end of
/// the drain, not from launcher construction.
pub async fn fire(
    client: &Client,
    template: FireTemplate,
    count: usize,
) -> Result<FireReport, String> {
    let count = count.max(1);
    let template = Arc::new(template);
    let (outcome_tx, mut outcome_rx) = mpsc::channel(count);
    let (gate_tx, _) = broadcast::channel(1);

    let mut handles = Vec::with_capacity(count);
    for _ in 0..count {
        handles.push(tokio::spawn(launch_one(
            client.clone(),
            template.clone(),
            gate_tx.subscribe(),
            outcome_tx.clone(),
        )));
    }
    drop(outcome_tx);

    let started = Instant::now();
    // Every receiver was subscribed before this send, so no launcher can miss
    // the release. Launchers that already failed construction have dropped
    // their receiver, which is fine.
    let _ = gate_tx.send(());

    for handle in handles {
        handle
            .await
            .map_err(|err| format!("Launcher task crashed: {err}"))?;
    }

    let mut results = Vec::with_capacity(count);
    while let Some(outcome) = outcome_rx.recv().await {
        results.push(outcome);
    }

    let duration = started.elapsed();

    Ok(FireReport {
        duration: format_duration(duration),
        results,
    })
}

fn format_duration(duration: Duration) -> String {
    if duration >= Duration::from_secs(1) {
        format!("{:.3}s", duration.as_secs_f64())
    } else {
        format!("{:.3}ms", duration.as_secs_f64() * 1000.0)
    }
}
