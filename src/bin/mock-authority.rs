//! Scripted stand-in for the authority's status endpoints.
//!
//! Every identifier walks the script on its own; once the end is reached the
//! last status keeps being returned.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use clap::Parser;
use dashmap::DashMap;
use serde_json::json;
use tower_http::trace::TraceLayer;

use status_poller::config::ObservabilityConfig;
use status_poller::observability::init_logging;

const ID_PARAMS: [&str; 3] = ["pushId", "keyId", "requestId"];

#[derive(Parser)]
#[command(name = "mock-authority")]
#[command(about = "Serve scripted push and registration statuses", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Statuses returned to each identifier, in order.
    #[arg(short, long, value_delimiter = ',', default_value = "PENDING,PENDING,APPROVED")]
    script: Vec<String>,

    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Clone)]
struct AuthorityState {
    script: Arc<Vec<String>>,
    progress: Arc<DashMap<String, usize>>,
}

impl AuthorityState {
    fn next_status(&self, identifier: &str) -> String {
        let mut step = self.progress.entry(identifier.to_string()).or_insert(0);
        let index = (*step).min(self.script.len().saturating_sub(1));
        *step += 1;
        self.script
            .get(index)
            .cloned()
            .unwrap_or_else(|| "PENDING".to_string())
    }
}

async fn check(
    State(state): State<AuthorityState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let Some(identifier) = ID_PARAMS.iter().find_map(|p| params.get(*p)) else {
        return (StatusCode::BAD_REQUEST, "missing identifier parameter").into_response();
    };

    let status = state.next_status(identifier);
    tracing::info!(identifier = %identifier, status = %status, "Status check");
    Json(json!({ "status": status })).into_response()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&ObservabilityConfig {
        log_level: cli.log_level.clone(),
        ..ObservabilityConfig::default()
    });

    let state = AuthorityState {
        script: Arc::new(cli.script),
        progress: Arc::new(DashMap::new()),
    };

    let app = Router::new()
        .route("/cas/inalogy/check", get(check))
        .route("/cas/inalogy/check/login", get(check))
        .route("/cas/inalogy/check/registration", get(check))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(cli.bind).await?;
    tracing::info!(address = %listener.local_addr()?, "Mock authority listening");
    axum::serve(listener, app).await?;
    Ok(())
}
