//! End-to-end batch run against a mocked courier endpoint.
//!
//! Covers the full pipeline: voucher loading (inline + file with overlap),
//! transport retry, per-voucher failure isolation, summarization, and report
//! writing.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use elta_tracker::{
    Config, EndpointConfig, InputConfig, OutputConfig, PacingConfig, RetryConfig, run_tracking,
};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn base_config(server: &MockServer, dir: &TempDir) -> Config {
    Config {
        endpoint: EndpointConfig {
            track_url: format!("{}/track.php", server.uri()),
            request_timeout: Duration::from_secs(5),
        },
        retry: RetryConfig {
            max_attempts: 2,
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(50),
            backoff_multiplier: 2.0,
            jitter: false,
        },
        pacing: PacingConfig {
            delay_between_requests: Duration::ZERO,
        },
        input: InputConfig::default(),
        output: OutputConfig {
            output_file: dir.path().join("out/tracking_results.csv"),
            summary_markdown: Some(dir.path().join("out/tracking_summary.md")),
        },
    }
}

fn payload(voucher: &str, records: &str) -> String {
    format!(r#"{{"status":1,"result":{{"{voucher}":{{"result":[{records}]}}}}}}"#)
}

async fn mount_voucher(server: &MockServer, voucher: &str, body: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/track.php"))
        .and(body_string_contains(format!("number={voucher}")))
        .respond_with(body)
        .mount(server)
        .await;
}

#[tokio::test]
async fn full_run_with_mixed_outcomes() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    // DELIVERED: two events, latest wins by day-first date
    mount_voucher(
        &server,
        "DELIVERED1",
        ResponseTemplate::new(200).set_body_string(payload(
            "DELIVERED1",
            r#"{"status":"In Transit","date":"14/01/2025","time":"10:00","place":"Athens"},
               {"status":"Delivered","date":"15/01/2025","time":"12:00","place":"Piraeus"}"#,
        )),
    )
    .await;
    // TRANSIT1: single event
    mount_voucher(
        &server,
        "TRANSIT1",
        ResponseTemplate::new(200).set_body_string(payload(
            "TRANSIT1",
            r#"{"status":"In Transit","date":"15/01/2025","time":"11:30","place":"Patras"}"#,
        )),
    )
    .await;
    // FLAKY1: first attempt 502, then success (transport retry absorbs it)
    Mock::given(method("POST"))
        .and(path("/track.php"))
        .and(body_string_contains("number=FLAKY1"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_voucher(
        &server,
        "FLAKY1",
        ResponseTemplate::new(200).set_body_string(payload(
            "FLAKY1",
            r#"{"status":"Delivered","date":"15/01/2025","time":"09:00","place":"Volos"}"#,
        )),
    )
    .await;
    // BROKEN1: hard 404 on every attempt
    mount_voucher(&server, "BROKEN1", ResponseTemplate::new(404)).await;
    // EMPTY1: endpoint says "no data"
    mount_voucher(
        &server,
        "EMPTY1",
        ResponseTemplate::new(200).set_body_string(r#"{"status":0}"#),
    )
    .await;

    // Overlapping sources: DELIVERED1 appears inline and in the file
    let voucher_file = dir.path().join("vouchers.txt");
    std::fs::write(&voucher_file, "DELIVERED1\nBROKEN1\nEMPTY1\n").unwrap();

    let mut config = base_config(&server, &dir);
    config.input = InputConfig {
        input_file: Some(voucher_file),
        input_column: "Voucher".to_string(),
        inline_vouchers: Some("DELIVERED1,TRANSIT1,FLAKY1".to_string()),
    };

    let report = run_tracking(&config).await.unwrap();

    // De-duplication: 5 distinct vouchers attempted, first-seen order
    assert_eq!(report.result.totals.vouchers, 5);
    // Only the hard failure lands in the failed set
    assert_eq!(report.result.failed.len(), 1);
    assert_eq!(report.result.failed[0].as_str(), "BROKEN1");
    assert_eq!(report.exit_code(), 1);

    // 2 + 1 + 1 events; EMPTY1 contributes none and is not a failure
    assert_eq!(report.result.totals.events, 4);

    // Latest table: one row per voucher with events, voucher ascending
    let latest: Vec<(&str, &str)> = report
        .summary
        .latest
        .iter()
        .map(|row| (row.voucher.as_str(), row.status.as_str()))
        .collect();
    assert_eq!(
        latest,
        vec![
            ("DELIVERED1", "Delivered"),
            ("FLAKY1", "Delivered"),
            ("TRANSIT1", "In Transit"),
        ]
    );

    // Counts over latest rows only
    assert_eq!(report.summary.counts[0].status, "Delivered");
    assert_eq!(report.summary.counts[0].vouchers, 2);
    assert_eq!(report.summary.counts[1].status, "In Transit");
    assert_eq!(report.summary.counts[1].vouchers, 1);

    // Reports on disk
    let events_csv =
        std::fs::read_to_string(dir.path().join("out/tracking_results.csv")).unwrap();
    assert_eq!(events_csv.lines().count(), 5); // header + 4 events
    let latest_csv =
        std::fs::read_to_string(dir.path().join("out/tracking_results_latest_status.csv"))
            .unwrap();
    assert!(latest_csv.contains("DELIVERED1,Delivered,15/01/2025,12:00,Piraeus"));
    let md = std::fs::read_to_string(dir.path().join("out/tracking_summary.md")).unwrap();
    assert!(md.contains("- Failed list: BROKEN1"));
    assert!(md.contains("| In Transit | 1 |"));
}

#[tokio::test]
async fn all_vouchers_succeed_exits_zero() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_voucher(
        &server,
        "OK1",
        ResponseTemplate::new(200).set_body_string(payload(
            "OK1",
            r#"{"status":"Delivered","date":"15/01/2025","time":"12:00","place":"Athens"}"#,
        )),
    )
    .await;

    let mut config = base_config(&server, &dir);
    config.input.inline_vouchers = Some("OK1".to_string());

    let report = run_tracking(&config).await.unwrap();
    assert_eq!(report.exit_code(), 0);
    assert!(report.result.is_success());
}

#[tokio::test]
async fn empty_voucher_list_writes_nothing() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let config = base_config(&server, &dir);
    let report = run_tracking(&config).await.unwrap();

    assert_eq!(report.exit_code(), 0);
    assert!(!dir.path().join("out/tracking_results.csv").exists());
}
