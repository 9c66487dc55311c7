//! Configuration types for elta-tracker

use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Courier endpoint configuration
///
/// Groups settings for the remote tracking endpoint itself.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Tracking endpoint URL (default: the ELTA Courier track.php endpoint)
    #[serde(default = "default_track_url")]
    pub track_url: String,

    /// Per-request timeout (default: 20 seconds)
    ///
    /// Applies to each individual HTTP request, not to the run as a whole.
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            track_url: default_track_url(),
            request_timeout: default_request_timeout(),
        }
    }
}

/// Retry configuration for transient transport failures
///
/// Retrying lives entirely in the transport client; the batch runner treats a
/// surfaced error as final for that voucher.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (default: 3)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial delay before first retry (default: 0.8 seconds)
    #[serde(default = "default_initial_delay", with = "duration_serde")]
    pub initial_delay: Duration,

    /// Maximum delay between retries (default: 60 seconds)
    #[serde(default = "default_max_delay", with = "duration_serde")]
    pub max_delay: Duration,

    /// Multiplier for exponential backoff (default: 2.0)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to delays (default: false)
    #[serde(default)]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: false,
        }
    }
}

/// Request pacing configuration
///
/// The inter-request delay is a politeness mechanism toward the courier
/// endpoint, not a correctness requirement. Zero disables pacing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Delay after every voucher attempt, success or failure (default: 0.5 seconds)
    #[serde(default = "default_request_delay", with = "duration_serde")]
    pub delay_between_requests: Duration,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            delay_between_requests: default_request_delay(),
        }
    }
}

/// Voucher input configuration
///
/// Vouchers can come from an inline comma-separated list, a file, or both.
/// The merged list is de-duplicated keeping first-seen order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InputConfig {
    /// Optional voucher file (.csv with a named column, or .txt with one voucher per line)
    #[serde(default)]
    pub input_file: Option<PathBuf>,

    /// Column name holding voucher IDs in a .csv input file (default: "Voucher")
    #[serde(default = "default_input_column")]
    pub input_column: String,

    /// Inline comma-separated voucher numbers
    #[serde(default)]
    pub inline_vouchers: Option<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            input_file: None,
            input_column: default_input_column(),
            inline_vouchers: None,
        }
    }
}

/// Report output configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Events CSV path; latest-status and status-counts CSVs are written as
    /// `<stem>_latest_status.csv` / `<stem>_status_counts.csv` siblings
    /// (default: "output/tracking_results.csv")
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,

    /// Markdown digest path (None disables the digest,
    /// default: "output/tracking_summary.md")
    #[serde(default = "default_summary_markdown")]
    pub summary_markdown: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_file: default_output_file(),
            summary_markdown: default_summary_markdown(),
        }
    }
}

/// Main configuration for a tracking run
///
/// Fields are organized into logical sub-configs:
/// - [`endpoint`](EndpointConfig) — endpoint URL and per-request timeout
/// - [`retry`](RetryConfig) — transport retry/backoff behavior
/// - [`pacing`](PacingConfig) — inter-request delay
/// - [`input`](InputConfig) — voucher sources
/// - [`output`](OutputConfig) — report destinations
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Endpoint URL and request timeout
    #[serde(default)]
    pub endpoint: EndpointConfig,

    /// Transport retry behavior
    #[serde(default)]
    pub retry: RetryConfig,

    /// Inter-request pacing
    #[serde(default)]
    pub pacing: PacingConfig,

    /// Voucher input sources
    #[serde(default)]
    pub input: InputConfig,

    /// Report destinations
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_track_url() -> String {
    "https://www.elta-courier.gr/track.php".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(20)
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay() -> Duration {
    Duration::from_millis(800)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(60)
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_request_delay() -> Duration {
    Duration::from_millis(500)
}

fn default_input_column() -> String {
    "Voucher".to_string()
}

fn default_output_file() -> PathBuf {
    PathBuf::from("output/tracking_results.csv")
}

fn default_summary_markdown() -> Option<PathBuf> {
    Some(PathBuf::from("output/tracking_summary.md"))
}

// Duration serialization helper (fractional seconds, so sub-second delays survive)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        // Negative and non-finite values must surface as a serde error, not a panic
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(
            config.endpoint.track_url,
            "https://www.elta-courier.gr/track.php"
        );
        assert_eq!(config.endpoint.request_timeout, Duration::from_secs(20));
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.pacing.delay_between_requests, Duration::from_millis(500));
        assert_eq!(config.input.input_column, "Voucher");
        assert!(config.output.summary_markdown.is_some());
    }

    #[test]
    fn test_config_deserializes_from_empty_json() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.retry.max_attempts, 3);
        assert!(!config.retry.jitter);
    }

    #[test]
    fn test_duration_roundtrip_preserves_subsecond_delays() {
        let config = Config {
            pacing: PacingConfig {
                delay_between_requests: Duration::from_millis(250),
            },
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(
            back.pacing.delay_between_requests,
            Duration::from_millis(250)
        );
    }

    #[test]
    fn test_invalid_duration_values_are_errors_not_panics() {
        for body in [
            r#"{"pacing":{"delay_between_requests":-1.0}}"#,
            r#"{"retry":{"initial_delay":-0.5}}"#,
        ] {
            let result = serde_json::from_str::<Config>(body);
            assert!(result.is_err(), "expected error for {body}");
        }
    }
}
