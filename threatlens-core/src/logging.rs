//! Unified logging system
//!
//! Provides structured logging with configurable format and output.

use serde::{Deserialize, Serialize};
use std::io;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Whether to include file and line information
    pub include_location: bool,
    /// Whether to include span close events for timing
    pub span_timing: bool,
    /// Custom filter directives
    pub filter_directives: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            include_location: true,
            span_timing: true,
            filter_directives: vec![
                "threatlens_core=debug".to_string(),
                "threatlens_llm=debug".to_string(),
                "threatlens_report=debug".to_string(),
                "threatlens_assessment=debug".to_string(),
            ],
        }
    }
}

/// Initialize the logging system
pub fn init_logging(
    config: &LoggingConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    // Add custom filter directives
    for directive in &config.filter_directives {
        filter = filter.add_directive(directive.parse()?);
    }

    let registry = tracing_subscriber::registry().with(filter);

    let span_events = if config.span_timing {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    match config.format {
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_span_events(span_events)
                .with_file(config.include_location)
                .with_line_number(config.include_location)
                .with_writer(io::stdout);
            registry.with(fmt_layer).init();
        }
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .pretty()
                .with_span_events(span_events)
                .with_file(config.include_location)
                .with_line_number(config.include_location)
                .with_writer(io::stdout);
            registry.with(fmt_layer).init();
        }
        LogFormat::Compact => {
            let fmt_layer = fmt::layer()
                .compact()
                .with_span_events(span_events)
                .with_file(config.include_location)
                .with_line_number(config.include_location)
                .with_writer(io::stdout);
            registry.with(fmt_layer).init();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Sets the global subscriber, so this must stay the only test in this
    // binary that calls init_logging.
    #[test]
    fn test_init_logging_with_json_format() {
        let config = LoggingConfig {
            format: LogFormat::Json,
            ..Default::default()
        };
        assert!(init_logging(&config).is_ok());
    }
}
