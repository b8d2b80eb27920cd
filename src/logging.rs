//! # Structured Logging Module
//!
//! Environment-aware structured logging for multi-stack runs. Console output is
//! human readable by default; set `MULTI_STACK_LOG_FORMAT=json` for one JSON
//! object per event. `RUST_LOG` overrides the environment's default level.

use chrono::Utc;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let log_level = get_log_level(&environment);
        let json_output = use_json_format();

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

        let console_layer = (!json_output).then(|| {
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_ansi(true)
        });
        let json_layer = json_output.then(|| {
            fmt::layer()
                .json()
                .with_target(true)
                .with_current_span(false)
        });

        // Use try_init to avoid panic if global subscriber already set
        if tracing_subscriber::registry()
            .with(filter)
            .with(console_layer)
            .with(json_layer)
            .try_init()
            .is_err()
        {
            tracing::debug!("Global tracing subscriber already initialized - keeping it");
        }

        tracing::debug!(
            environment = %environment,
            json = json_output,
            "Structured logging initialized"
        );
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("MULTI_STACK_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "test" => "debug",
        "development" => "info",
        "production" => "warn",
        _ => "info",
    }
}

fn use_json_format() -> bool {
    std::env::var("MULTI_STACK_LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Log pipeline operations with a consistent field layout
#[macro_export]
macro_rules! log_pipeline {
    // Full form with stack
    ($level:ident, $operation:expr, stack: $stack:expr, $($key:ident: $value:expr),* $(,)?) => {
        tracing::$level!(
            operation = %$operation,
            stack = %$stack,
            $($key = ?$value,)*
            timestamp = %chrono::Utc::now().to_rfc3339(),
            "PIPELINE_{} (stack: {})", $operation, $stack
        );
    };
    // Simple form - just operation
    ($level:ident, $operation:expr $(,)?) => {
        tracing::$level!(
            operation = %$operation,
            timestamp = %chrono::Utc::now().to_rfc3339(),
            "PIPELINE_{}", $operation
        );
    };
    // Generic form with additional fields
    ($level:ident, $operation:expr, $($key:ident: $value:expr),+ $(,)?) => {
        tracing::$level!(
            operation = %$operation,
            $($key = ?$value,)*
            timestamp = %chrono::Utc::now().to_rfc3339(),
            "PIPELINE_{}", $operation
        );
    };
}

/// Log structured data for stack operations
pub fn log_stack_operation(
    operation: &str,
    stack: &str,
    location: &str,
    region: Option<&str>,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        stack = %stack,
        location = %location,
        region = region,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "STACK_OPERATION"
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
