//! Headless status poller.
//!
//! Runs one poll session against a live authority, as the push or
//! registration page would, and prints the session report as JSON.
//!
//! # Architecture Overview
//!
//! ```text
//!   --identifier / --redirect-seconds           status endpoint
//!                │                                    ▲
//!                ▼                                    │ GET ?id=… (no-store)
//!         ┌─────────────┐   resolve   ┌──────────────────────┐
//!         │ StaticPage  │────────────▶│      PollCycle       │
//!         └─────────────┘             │ query/interpret/retry│
//!                ▲                    └──────────┬───────────┘
//!                │ countdown                     │ terminal
//!         ┌─────────────┐   deadline  ┌──────────▼───────────┐
//!         │  Countdown  │             │     PollSession      │──▶ submit | navigate
//!         └─────────────┘  ┌─────────▶│ settle once, cancel  │
//!                          │          └──────────────────────┘
//!                  ┌───────┴──────┐
//!                  │DeadlineGuard │
//!                  └──────────────┘
//! ```
//!
//! Exit status: 0 when the operation succeeded, 1 on the failure path,
//! 130 when interrupted.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use status_poller::config::validation::validate_config;
use status_poller::config::{load_config, ConfigError, FlowVariant, PollerConfig};
use status_poller::observability::init_logging;
use status_poller::page::{RecordingActions, StaticPage};
use status_poller::{Cancellation, HttpStatusClient, PollSession};

#[derive(Parser)]
#[command(name = "status-poller")]
#[command(about = "Wait for a pending push or registration to reach a terminal status", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Page variant preset (push-login, push-key, registration).
    #[arg(short, long, conflicts_with = "config")]
    flow: Option<FlowVariant>,

    /// Origin of the authority, e.g. https://sso.example.org.
    #[arg(short, long)]
    base_url: Option<String>,

    /// Correlation identifier rendered into the page.
    #[arg(short, long)]
    identifier: Option<String>,

    /// Value of the page's redirect-seconds attribute.
    #[arg(long)]
    redirect_seconds: Option<String>,

    /// Delay between attempts in milliseconds.
    #[arg(long)]
    retry_delay_ms: Option<u64>,

    /// Give up after this many consecutive transport failures.
    #[arg(long)]
    max_consecutive_failures: Option<u32>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    /// Emit JSON log lines.
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn resolve_config(&self) -> Result<PollerConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => PollerConfig::for_flow(self.flow.unwrap_or_default()),
        };

        if let Some(base_url) = &self.base_url {
            config.endpoint.base_url = base_url.clone();
        }
        if let Some(delay) = self.retry_delay_ms {
            config.retry.delay_ms = delay;
        }
        if let Some(max) = self.max_consecutive_failures {
            config.retry.max_consecutive_failures = Some(max);
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
        if self.json_logs {
            config.observability.json_logs = true;
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }

    fn page(&self, config: &PollerConfig) -> StaticPage {
        let mut page = StaticPage::new();
        if let Some(identifier) = &self.identifier {
            page = page.with_input(&config.page.identifier_field, identifier);
        }
        if let Some(seconds) = &self.redirect_seconds {
            page = page.with_attribute(
                &config.page.countdown_container,
                &config.page.redirect_seconds_attribute,
                seconds,
            );
        }
        page
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    init_logging(&config.observability);

    tracing::info!(
        flow = config.flow.as_str(),
        base_url = %config.endpoint.base_url,
        path = %config.endpoint.path,
        "Configuration loaded"
    );
    if cli.identifier.is_none() {
        tracing::warn!(
            field = %config.page.identifier_field,
            "No identifier given; the session will wait for the deadline"
        );
    }

    let page = cli.page(&config);
    let client = HttpStatusClient::new(config.endpoint.clone())?;
    let actions = RecordingActions::new();
    let session = PollSession::new(&config, &page, &client, &actions);

    let cancel = Cancellation::new();
    let run = session.run_with(&cancel);
    tokio::pin!(run);

    let report = tokio::select! {
        report = &mut run => report,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, cancelling session");
            cancel.trigger();
            run.await
        }
    };

    println!("{}", serde_json::to_string_pretty(&report)?);

    let code = match &report.conclusion {
        Some(conclusion) if conclusion.is_success() => ExitCode::SUCCESS,
        Some(_) => ExitCode::from(1),
        None => ExitCode::from(130),
    };
    Ok(code)
}
