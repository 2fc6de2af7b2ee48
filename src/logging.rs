// Logging setup

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::Dispatch;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

const LOG_LEVEL_ENV: &str = "LAUNCH_CATALOG_LOG_LEVEL";
const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogConfig {
    /// `None` resolves from the environment, then from the build profile.
    pub level: Option<String>,
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: None,
            json: false,
        }
    }
}

pub fn normalize_level(level: &str) -> Option<&'static str> {
    let lowered = level.trim().to_ascii_lowercase();
    LEVELS.iter().copied().find(|candidate| *candidate == lowered)
}

pub fn resolve_log_level(config: &LogConfig) -> String {
    if let Some(level) = config.level.as_deref().and_then(normalize_level) {
        return level.to_string();
    }
    if let Some(level) = std::env::var(LOG_LEVEL_ENV)
        .ok()
        .as_deref()
        .and_then(normalize_level)
    {
        return level.to_string();
    }

    if cfg!(debug_assertions) {
        "debug".to_string()
    } else {
        "info".to_string()
    }
}

/// Builds a subscriber without installing it; the caller decides where it applies.
pub fn build_dispatch(config: &LogConfig) -> Dispatch {
    build(config, std::io::stderr, true)
}

/// Same subscriber writing plain text to `writer`.
pub fn build_dispatch_with_writer<W>(config: &LogConfig, writer: W) -> Dispatch
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    build(config, writer, false)
}

fn build<W>(config: &LogConfig, writer: W, ansi: bool) -> Dispatch
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::new(resolve_log_level(config));
    let registry = tracing_subscriber::registry().with(filter);

    if config.json {
        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_ansi(false)
            .with_writer(writer)
            .with_current_span(false)
            .with_span_list(false);
        Dispatch::new(registry.with(layer))
    } else {
        let layer = tracing_subscriber::fmt::layer()
            .compact()
            .with_ansi(ansi)
            .with_writer(writer)
            .with_target(true);
        Dispatch::new(registry.with(layer))
    }
}

/// Installs the dispatch as the process default. Returns it so it can also be injected.
pub fn init(config: &LogConfig) -> anyhow::Result<Dispatch> {
    let dispatch = build_dispatch(config);
    tracing::dispatcher::set_global_default(dispatch.clone())
        .context("log subscriber already installed")?;
    Ok(dispatch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::LogCapture;

    #[test]
    fn explicit_level_wins() {
        let config = LogConfig {
            level: Some("WARN".into()),
            json: false,
        };
        assert_eq!(resolve_log_level(&config), "warn");
    }

    #[test]
    fn unknown_level_is_rejected() {
        assert_eq!(normalize_level("verbose"), None);
        assert_eq!(normalize_level(" error "), Some("error"));
    }

    #[test]
    fn dispatch_scopes_events() {
        let capture = LogCapture::default();
        let config = LogConfig {
            level: Some("trace".into()),
            json: true,
        };
        let dispatch = build_dispatch_with_writer(&config, capture.clone());
        tracing::dispatcher::with_default(&dispatch, || {
            tracing::info!(event = "scoped_event", component = "catalog");
        });
        tracing::info!(event = "unscoped_event", component = "catalog");

        let output = capture.contents();
        assert!(output.contains(r#""event":"scoped_event""#), "{output}");
        assert!(output.contains(r#""component":"catalog""#), "{output}");
        assert!(!output.contains("unscoped_event"), "{output}");
    }

    #[test]
    fn level_filters_captured_events() {
        let capture = LogCapture::default();
        let config = LogConfig {
            level: Some("warn".into()),
            json: false,
        };
        let dispatch = build_dispatch_with_writer(&config, capture.clone());
        tracing::dispatcher::with_default(&dispatch, || {
            tracing::debug!(event = "quiet", component = "catalog");
            tracing::warn!(event = "loud", component = "catalog");
        });

        let output = capture.contents();
        assert!(output.contains(r#"event="loud""#), "{output}");
        assert!(!output.contains("quiet"), "{output}");
    }
}
