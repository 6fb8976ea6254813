//! Subscriber setup for the `olivia` binary.
//!
//! Human-readable events go to stderr, leaving stdout to the chat
//! transcript. `--otel` adds a layer exporting spans to stdout through
//! OpenTelemetry.
//!
//! # Usage
//!
//! ```no_run
//! // `warn` unless RUST_LOG says otherwise, no span export
//! olivia_observe::tracing_setup::init_tracing("warn", false).unwrap();
//! ```

use std::sync::OnceLock;

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const TRACER_NAME: &str = "olivia";

/// Provider installed by `init_tracing`, kept for the flush on exit.
static SPAN_EXPORT: OnceLock<SdkTracerProvider> = OnceLock::new();

/// `RUST_LOG` when set and valid, else `default_filter`.
pub fn build_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Install the global subscriber.
///
/// Fails if a global subscriber is already set.
pub fn init_tracing(default_filter: &str, enable_otel: bool) -> Result<(), Box<dyn std::error::Error>> {
    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE);

    let span_export = enable_otel.then(|| {
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build();
        let tracer = provider.tracer(TRACER_NAME);
        let _ = SPAN_EXPORT.set(provider.clone());
        opentelemetry::global::set_tracer_provider(provider);
        tracing_opentelemetry::layer().with_tracer(tracer)
    });

    tracing_subscriber::registry()
        .with(build_filter(default_filter))
        .with(console)
        .with(span_export)
        .try_init()?;

    Ok(())
}

/// Flush exported spans. Does nothing unless `--otel` was given.
pub fn shutdown_tracing() {
    let Some(provider) = SPAN_EXPORT.get() else {
        return;
    };
    if let Err(e) = provider.shutdown() {
        eprintln!("span export shutdown failed: {e}");
    }
}
