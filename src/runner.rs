//! Batch runner: sequential polling over a voucher list
//!
//! Strictly one in-flight request: each voucher's full fetch/parse/delay cycle
//! completes before the next begins. A single voucher's failure never aborts
//! the batch; it is recorded and the run continues. Retrying happens inside
//! the transport client only — an error surfacing here is final for that
//! voucher.

use crate::client::TrackingClient;
use crate::config::PacingConfig;
use crate::parser::parse_tracking_response;
use crate::types::{RunResult, RunTotals, Voucher};

/// Poll every voucher exactly once and accumulate the outcome
///
/// Vouchers are processed in input order. After every attempt, success or
/// failure, the configured inter-request delay is applied (skipped when zero).
pub async fn run_batch(
    client: &TrackingClient,
    vouchers: &[Voucher],
    pacing: &PacingConfig,
) -> RunResult {
    let total = vouchers.len();
    let mut events = Vec::new();
    let mut failed = Vec::new();

    for (idx, voucher) in vouchers.iter().enumerate() {
        tracing::info!(
            voucher = %voucher,
            processed = idx + 1,
            total = total,
            "Processing voucher"
        );

        match track_one(client, voucher).await {
            Ok(voucher_events) => {
                tracing::debug!(
                    voucher = %voucher,
                    events = voucher_events.len(),
                    "Voucher processed"
                );
                events.extend(voucher_events);
            }
            Err(e) => {
                tracing::error!(voucher = %voucher, error = %e, "Failed voucher");
                failed.push(voucher.clone());
            }
        }

        if !pacing.delay_between_requests.is_zero() {
            tokio::time::sleep(pacing.delay_between_requests).await;
        }
    }

    let totals = RunTotals {
        vouchers: total,
        events: events.len(),
        failed: failed.len(),
    };
    RunResult {
        events,
        failed,
        totals,
    }
}

async fn track_one(
    client: &TrackingClient,
    voucher: &Voucher,
) -> crate::error::Result<Vec<crate::types::TrackingEvent>> {
    let bytes = client.fetch(voucher).await?;
    parse_tracking_response(&bytes, voucher)
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, EndpointConfig, RetryConfig};
    use std::time::Duration;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> Config {
        Config {
            endpoint: EndpointConfig {
                track_url: format!("{}/track.php", server.uri()),
                request_timeout: Duration::from_secs(5),
            },
            retry: RetryConfig {
                max_attempts: 1,
                initial_delay: Duration::from_millis(5),
                max_delay: Duration::from_millis(20),
                backoff_multiplier: 2.0,
                jitter: false,
            },
            ..Default::default()
        }
    }

    fn no_delay() -> PacingConfig {
        PacingConfig {
            delay_between_requests: Duration::ZERO,
        }
    }

    fn payload_for(voucher: &str, statuses: &[&str]) -> String {
        let records: Vec<String> = statuses
            .iter()
            .map(|s| format!(r#"{{"status":"{s}","date":"14/01/2025","time":"10:00","place":"ATH"}}"#))
            .collect();
        format!(
            r#"{{"status":1,"result":{{"{}":{{"result":[{}]}}}}}}"#,
            voucher,
            records.join(",")
        )
    }

    #[tokio::test]
    async fn test_batch_accumulates_events_in_input_order() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/track.php"))
            .and(body_string_contains("number=AA1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(payload_for("AA1", &["Picked up", "In Transit"])),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/track.php"))
            .and(body_string_contains("number=BB2"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(payload_for("BB2", &["Delivered"])),
            )
            .mount(&server)
            .await;

        let client = TrackingClient::new(&config_for(&server)).unwrap();
        let vouchers = [Voucher::new("AA1"), Voucher::new("BB2")];
        let result = run_batch(&client, &vouchers, &no_delay()).await;

        assert!(result.is_success());
        assert_eq!(result.totals.vouchers, 2);
        assert_eq!(result.totals.events, 3);
        assert_eq!(result.events[0].voucher, vouchers[0]);
        assert_eq!(result.events[2].voucher, vouchers[1]);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_abort_batch() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/track.php"))
            .and(body_string_contains("number=BAD"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/track.php"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(payload_for("GOOD", &["Delivered"])),
            )
            .mount(&server)
            .await;

        let client = TrackingClient::new(&config_for(&server)).unwrap();
        let vouchers = [Voucher::new("BAD"), Voucher::new("GOOD")];
        let result = run_batch(&client, &vouchers, &no_delay()).await;

        assert!(!result.is_success());
        assert_eq!(result.failed, vec![Voucher::new("BAD")]);
        assert_eq!(result.totals.failed, 1);
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].voucher, Voucher::new("GOOD"));
    }

    #[tokio::test]
    async fn test_malformed_body_counts_as_failed_voucher() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/track.php"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let client = TrackingClient::new(&config_for(&server)).unwrap();
        let vouchers = [Voucher::new("AA1")];
        let result = run_batch(&client, &vouchers, &no_delay()).await;

        assert_eq!(result.failed, vec![Voucher::new("AA1")]);
        assert!(result.events.is_empty());
    }

    #[tokio::test]
    async fn test_empty_payload_is_success_with_zero_events() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/track.php"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":0}"#))
            .mount(&server)
            .await;

        let client = TrackingClient::new(&config_for(&server)).unwrap();
        let vouchers = [Voucher::new("AA1")];
        let result = run_batch(&client, &vouchers, &no_delay()).await;

        assert!(result.is_success());
        assert!(result.events.is_empty());
        assert_eq!(result.totals.vouchers, 1);
    }
}
