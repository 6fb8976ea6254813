//! Observability setup for Olivia: tracing subscriber and optional
//! OpenTelemetry export.

pub mod tracing_setup;
