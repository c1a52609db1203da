//! Logging and optional OpenTelemetry setup.

use ritra_core::LoggingConfig;
use ritra_error::{ConfigError, RitraResult};
use std::env;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Subscriber settings.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Service name for telemetry attribution
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Filter used when `RUST_LOG` is unset (e.g., "info", "ritra_pipeline=debug")
    pub log_level: String,
    /// Emit JSON records
    pub json_logs: bool,
}

impl ObservabilityConfig {
    /// Defaults for `service_name`.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }

    /// Settings from the `logging` configuration section.
    pub fn from_logging(logging: &LoggingConfig) -> Self {
        Self::new("ritra")
            .with_log_level(logging.level.clone())
            .with_json_logs(logging.json)
    }

    /// Set the log level.
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable JSON-formatted logs.
    pub fn with_json_logs(mut self, enabled: bool) -> Self {
        self.json_logs = enabled;
        self
    }

    /// Raise the level to `debug`.
    pub fn with_verbose(self, verbose: bool) -> Self {
        if verbose { self.with_log_level("debug") } else { self }
    }

    /// Filter honouring `RUST_LOG` first.
    fn env_filter(&self) -> RitraResult<EnvFilter> {
        if env::var_os("RUST_LOG").is_some() {
            if let Ok(filter) = EnvFilter::try_from_default_env() {
                return Ok(filter);
            }
        }
        EnvFilter::try_new(&self.log_level).map_err(|e| {
            ConfigError::new(format!("invalid log filter {:?}: {}", self.log_level, e)).into()
        })
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"))
    }
}

/// Installs the global subscriber.
///
/// With the `observability` feature an OpenTelemetry layer exporting spans to
/// stdout is added.
///
/// # Errors
///
/// Returns a configuration error for an invalid filter or if a global
/// subscriber is already set.
pub fn init_observability(config: &ObservabilityConfig) -> RitraResult<()> {
    let env_filter = config.env_filter()?;

    let fmt_layer = if config.json_logs {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_level(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_level(true)
            .boxed()
    };

    let registry = tracing_subscriber::registry().with(env_filter).with(fmt_layer);

    #[cfg(feature = "observability")]
    let registry = registry.with(otel::layer(config));

    registry
        .try_init()
        .map_err(|e| ConfigError::new(format!("failed to install subscriber: {}", e)).into())
}

#[cfg(feature = "observability")]
mod otel {
    use super::ObservabilityConfig;
    use opentelemetry::{KeyValue, global, trace::TracerProvider};
    use opentelemetry_sdk::{Resource, trace::SdkTracerProvider};
    use opentelemetry_stdout::SpanExporter;
    use tracing_subscriber::registry::LookupSpan;

    pub(super) fn layer<S>(config: &ObservabilityConfig) -> impl tracing_subscriber::Layer<S>
    where
        S: tracing::Subscriber + for<'span> LookupSpan<'span>,
    {
        let resource = Resource::builder()
            .with_service_name(config.service_name.clone())
            .with_attributes(vec![KeyValue::new(
                "service.version",
                config.service_version.clone(),
            )])
            .build();

        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(SpanExporter::default())
            .with_resource(resource)
            .build();
        global::set_tracer_provider(provider.clone());

        let tracer = provider.tracer(config.service_name.clone());
        tracing_opentelemetry::layer().with_tracer(tracer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_logging_and_verbose() {
        let logging = LoggingConfig {
            level: "warn".to_string(),
            json: true,
        };
        let config = ObservabilityConfig::from_logging(&logging);
        assert_eq!(config.log_level, "warn");
        assert!(config.json_logs);
        assert_eq!(config.service_name, "ritra");

        assert_eq!(config.clone().with_verbose(false).log_level, "warn");
        assert_eq!(config.with_verbose(true).log_level, "debug");
    }

    #[test]
    fn test_invalid_filter_is_a_config_error() {
        let config = ObservabilityConfig::new("ritra").with_log_level("ritra=[unclosed");
        if env::var_os("RUST_LOG").is_none() {
            assert!(config.env_filter().is_err());
        }
    }
}
