//! CLI for elta-tracker
//!
//! Thin shell over [`elta_tracker::run_tracking`]: argument parsing, logging
//! setup, and exit-code mapping. Exit code 0 means every voucher tracked
//! successfully, 1 means at least one voucher failed, 2 means the run itself
//! aborted (bad configuration or report write failure).

use clap::Parser;
use elta_tracker::{
    Config, EndpointConfig, InputConfig, OutputConfig, PacingConfig, RetryConfig, run_tracking,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Track ELTA Courier vouchers and export status events
#[derive(Debug, Parser)]
#[command(name = "elta-tracker", version)]
struct Args {
    /// Input file (.csv or .txt)
    #[arg(long)]
    input_file: Option<PathBuf>,

    /// Column name for voucher IDs in a .csv input file
    #[arg(long, default_value = "Voucher")]
    input_column: String,

    /// Comma-separated voucher numbers
    #[arg(long)]
    vouchers: Option<String>,

    /// Events output file (.csv); summary tables are written as siblings
    #[arg(long, default_value = "output/tracking_results.csv")]
    output_file: PathBuf,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 20)]
    timeout: u64,

    /// Retry attempts for transient failures
    #[arg(long, default_value_t = 3)]
    retries: u32,

    /// Initial retry backoff in seconds (doubles per attempt)
    #[arg(long, default_value_t = 0.8)]
    backoff_factor: f64,

    /// Delay between requests in seconds
    #[arg(long, default_value_t = 0.5)]
    delay_seconds: f64,

    /// Markdown summary path; use 'none' to disable
    #[arg(long, default_value = "output/tracking_summary.md")]
    summary_markdown: String,

    /// Logging level (overridden by RUST_LOG when set)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn into_config(self) -> Config {
        let summary_arg = self.summary_markdown.trim();
        let summary_markdown = match summary_arg.to_ascii_lowercase().as_str() {
            "" | "none" | "null" => None,
            _ => Some(PathBuf::from(summary_arg)),
        };

        Config {
            endpoint: EndpointConfig {
                request_timeout: Duration::from_secs(self.timeout),
                ..Default::default()
            },
            retry: RetryConfig {
                max_attempts: self.retries,
                initial_delay: Duration::from_secs_f64(self.backoff_factor),
                ..Default::default()
            },
            pacing: PacingConfig {
                delay_between_requests: Duration::from_secs_f64(self.delay_seconds),
            },
            input: InputConfig {
                input_file: self.input_file,
                input_column: self.input_column,
                inline_vouchers: self.vouchers,
            },
            output: OutputConfig {
                output_file: self.output_file,
                summary_markdown,
            },
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = args.into_config();
    match run_tracking(&config).await {
        Ok(report) => std::process::exit(report.exit_code()),
        Err(e) => {
            tracing::error!(error = %e, "Run aborted");
            std::process::exit(2);
        }
    }
}
