//! Log formatting and optional OTLP trace export.
//!
//! Spans are exported only when `OTEL_EXPORTER_OTLP_ENDPOINT` is set; otherwise
//! logs go to stderr alone.

use anyhow::{Context, Result, anyhow};
use base64::{Engine, engine::general_purpose};
use once_cell::sync::OnceCell;
use opentelemetry::{
    KeyValue, global, propagation::TextMapCompositePropagator, trace::TracerProvider as _,
};
use opentelemetry_otlp::{Compression, WithExportConfig, WithTonicConfig};
use opentelemetry_sdk::{
    Resource,
    propagation::{BaggagePropagator, TraceContextPropagator},
    trace::SdkTracerProvider,
};
use std::{collections::BTreeMap, env::var, time::Duration};
use tonic::{
    metadata::{Ascii, Binary, MetadataKey, MetadataMap, MetadataValue},
    transport::ClientTlsConfig,
};
use tracing::{Level, debug};
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt};
use ulid::Ulid;

const DEFAULT_OTLP_ENDPOINT: &str = "http://localhost:4317";
const EXPORT_TIMEOUT: Duration = Duration::from_secs(3);

static TRACER_PROVIDER: OnceCell<SdkTracerProvider> = OnceCell::new();

/// Exporter settings read from the standard `OTEL_*` variables.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OtlpSettings {
    endpoint: String,
    headers: BTreeMap<String, String>,
    instance_id: String,
}

impl OtlpSettings {
    fn from_env() -> Self {
        if let Ok(protocol) = var("OTEL_EXPORTER_OTLP_PROTOCOL") {
            if protocol != "grpc" {
                debug!("OTEL_EXPORTER_OTLP_PROTOCOL='{protocol}' ignored, exporting over gRPC");
            }
        }

        Self {
            endpoint: normalize_endpoint(
                &var("OTEL_EXPORTER_OTLP_ENDPOINT")
                    .unwrap_or_else(|_| DEFAULT_OTLP_ENDPOINT.to_string()),
            ),
            headers: var("OTEL_EXPORTER_OTLP_HEADERS")
                .map(|raw| parse_headers(&raw))
                .unwrap_or_default(),
            instance_id: var("OTEL_SERVICE_INSTANCE_ID")
                .unwrap_or_else(|_| Ulid::new().to_string()),
        }
    }

    /// Host to verify when the endpoint is `https`.
    fn tls_domain(&self) -> Option<&str> {
        self.endpoint
            .strip_prefix("https://")
            .and_then(|rest| rest.split('/').next())
            .and_then(|authority| authority.split(':').next())
            .filter(|host| !host.is_empty())
    }
}

/// Parse `key=value,key=value`; pairs without `=` are dropped.
fn parse_headers(raw: &str) -> BTreeMap<String, String> {
    raw.split(',')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            let key = key.trim();
            (!key.is_empty()).then(|| (key.to_string(), value.trim().to_string()))
        })
        .collect()
}

// Keys ending in `-bin` carry base64 values and become binary metadata.
fn to_metadata(headers: &BTreeMap<String, String>) -> Result<MetadataMap> {
    let mut metadata = MetadataMap::with_capacity(headers.len());

    for (key, value) in headers {
        let key = key.to_ascii_lowercase();

        if key.ends_with("-bin") {
            let bytes = general_purpose::STANDARD
                .decode(value.as_bytes())
                .map_err(|e| anyhow!("failed to base64-decode value for key {key}: {e}"))?;
            let name = MetadataKey::<Binary>::from_bytes(key.as_bytes())
                .map_err(|e| anyhow!("invalid binary metadata key {key}: {e}"))?;
            metadata.insert_bin(name, MetadataValue::from_bytes(&bytes));
        } else {
            let name = MetadataKey::<Ascii>::from_bytes(key.as_bytes())
                .map_err(|e| anyhow!("invalid metadata key {key}: {e}"))?;
            let value: MetadataValue<Ascii> = value
                .parse()
                .map_err(|e| anyhow!("invalid metadata value for key {key}: {e}"))?;
            metadata.insert(name, value);
        }
    }

    Ok(metadata)
}

fn normalize_endpoint(endpoint: &str) -> String {
    let endpoint = endpoint.trim();
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("https://{}", endpoint.trim_end_matches('/'))
    }
}

fn init_provider(settings: &OtlpSettings) -> Result<SdkTracerProvider> {
    let mut builder = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(settings.endpoint.as_str())
        .with_compression(Compression::Gzip)
        .with_timeout(EXPORT_TIMEOUT);

    if let Some(domain) = settings.tls_domain() {
        builder = builder.with_tls_config(
            ClientTlsConfig::new()
                .domain_name(domain.to_string())
                .with_native_roots(),
        );
    }

    if !settings.headers.is_empty() {
        builder = builder.with_metadata(to_metadata(&settings.headers)?);
    }

    let exporter = builder.build().context("Failed to build OTLP span exporter")?;

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(
            Resource::builder_empty()
                .with_attributes([
                    KeyValue::new("service.name", env!("CARGO_PKG_NAME")),
                    KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
                    KeyValue::new("service.instance.id", settings.instance_id.clone()),
                ])
                .build(),
        )
        .build();

    global::set_tracer_provider(provider.clone());
    global::set_text_map_propagator(TextMapCompositePropagator::new(vec![
        Box::new(TraceContextPropagator::new()),
        Box::new(BaggagePropagator::new()),
    ]));

    Ok(provider)
}

/// Install the global subscriber. `None` means `ERROR`; `RUST_LOG` still applies.
///
/// # Errors
/// Returns an error if the exporter or the subscriber cannot be installed.
pub fn init(verbosity_level: Option<Level>) -> Result<()> {
    let fmt_layer = fmt::layer()
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_target(false)
        .pretty();

    let filter = EnvFilter::builder()
        .with_default_directive(verbosity_level.unwrap_or(Level::ERROR).into())
        .from_env_lossy()
        .add_directive("hyper=error".parse()?)
        .add_directive("tokio=error".parse()?)
        .add_directive("opentelemetry_sdk=warn".parse()?);

    if var("OTEL_EXPORTER_OTLP_ENDPOINT").is_ok() {
        let provider = init_provider(&OtlpSettings::from_env())?;
        let otel_layer =
            tracing_opentelemetry::layer().with_tracer(provider.tracer(env!("CARGO_PKG_NAME")));
        let _ = TRACER_PROVIDER.set(provider);

        let subscriber = Registry::default()
            .with(fmt_layer)
            .with(otel_layer)
            .with(filter);
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = Registry::default().with(fmt_layer).with(filter);
        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(())
}

/// Flush pending spans. No-op when export was never enabled.
pub fn shutdown_tracer() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        debug!("shutting down tracer provider");
        if let Err(err) = provider.shutdown() {
            debug!("tracer provider shutdown failed: {err}");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn settings(endpoint: &str) -> OtlpSettings {
        OtlpSettings {
            endpoint: normalize_endpoint(endpoint),
            headers: BTreeMap::new(),
            instance_id: "test".to_string(),
        }
    }

    #[test]
    fn parse_headers_skips_malformed_pairs() {
        let headers = parse_headers("authorization = Bearer x ,malformed,x-team=core,=nokey");
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("authorization").map(String::as_str), Some("Bearer x"));
        assert_eq!(headers.get("x-team").map(String::as_str), Some("core"));
        assert!(parse_headers("").is_empty());
    }

    #[test]
    fn metadata_accepts_ascii_and_binary() {
        let headers = parse_headers("authorization=Bearer t,trace-bin=YmluYXJ5IGRhdGE=");
        assert_eq!(to_metadata(&headers).unwrap().len(), 2);
    }

    #[test]
    fn metadata_rejects_bad_base64() {
        let headers = parse_headers("trace-bin=not-base64!!!");
        let err = to_metadata(&headers).unwrap_err().to_string();
        assert!(err.contains("failed to base64-decode"), "{err}");
    }

    #[test]
    fn endpoint_defaults_to_https() {
        assert_eq!(normalize_endpoint("http://localhost:4317"), "http://localhost:4317");
        assert_eq!(normalize_endpoint("collector.test:4317/"), "https://collector.test:4317");
    }

    #[test]
    fn tls_domain_only_for_https() {
        assert_eq!(settings("collector.test:4317").tls_domain(), Some("collector.test"));
        assert_eq!(settings("https://otel.test/v1/traces").tls_domain(), Some("otel.test"));
        assert_eq!(settings("http://localhost:4317").tls_domain(), None);
    }

    #[test]
    fn settings_read_env() {
        temp_env::with_vars(
            [
                ("OTEL_EXPORTER_OTLP_ENDPOINT", Some("otel.test:4317")),
                ("OTEL_EXPORTER_OTLP_HEADERS", Some("x-team=core")),
                ("OTEL_SERVICE_INSTANCE_ID", Some("pod-1")),
                ("OTEL_EXPORTER_OTLP_PROTOCOL", None),
            ],
            || {
                let settings = OtlpSettings::from_env();
                assert_eq!(settings.endpoint, "https://otel.test:4317");
                assert_eq!(settings.instance_id, "pod-1");
                assert_eq!(settings.headers.len(), 1);
            },
        );
    }

    #[test]
    fn shutdown_without_provider_is_noop() {
        shutdown_tracer();
    }
}
