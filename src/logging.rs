//! # Structured Logging Module
//!
//! Environment-aware structured logging for the request workflow, plus helpers
//! that emit request lifecycle operations with a consistent field layout.

use crate::config::{LoggingConfig, UpstacConfig};
use chrono::Utc;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging for the configured environment.
///
/// Safe to call more than once; only the first call installs a subscriber, and an
/// already-installed global subscriber is left in place.
pub fn init_structured_logging(config: &UpstacConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = config.environment.as_str();
        let filter = resolve_filter(environment, &config.logging);
        let config = &config.logging;

        let console = if config.json {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .json()
                .with_filter(EnvFilter::new(filter.clone()))
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_filter(EnvFilter::new(filter.clone()))
                .boxed()
        };

        if tracing_subscriber::registry().with(console).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized");
        }

        tracing::info!(
            environment = %environment,
            filter = %filter,
            json = config.json,
            "Structured logging initialized"
        );
    });
}

/// An explicit `logging.filter` wins over the environment's default level.
fn resolve_filter(environment: &str, config: &LoggingConfig) -> String {
    config
        .filter
        .clone()
        .unwrap_or_else(|| get_log_level(environment).to_string())
}

fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

/// Log a request lifecycle operation.
pub fn log_request_operation(
    operation: &str,
    request_id: Option<i64>,
    actor: Option<&str>,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        request_id = request_id,
        actor = actor,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "REQUEST_OPERATION"
    );
}

/// Log error with full context
pub fn log_error(component: &str, operation: &str, error: &str, context: Option<&str>) {
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        context = context,
        timestamp = %Utc::now().to_rfc3339(),
        "ERROR"
    );
}
