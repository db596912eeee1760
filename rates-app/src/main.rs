//! # Rates Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Build the upstream provider adapters
//! - Create the rate service
//! - Start the HTTP server

mod config;

use std::time::Duration;

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rates_hex::{
    Aggregator, RateService,
    inbound::{HttpServer, RateLimiterState},
};
use rates_providers::build_providers;

fn init_tracer() -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // Use gRPC exporter with batch processing (non-blocking)
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("rates-service"), provider))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Export spans only when a collector is configured
    let (telemetry, otel_provider) = if std::env::var_os("OTEL_EXPORTER_OTLP_ENDPOINT").is_some()
    {
        let (otel_tracer, otel_provider) = init_tracer()?;
        (
            Some(tracing_opentelemetry::layer().with_tracer(otel_tracer)),
            Some(otel_provider),
        )
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,rates_app=debug,rates_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    // Load configuration
    let config = config::Config::from_env()?;

    let providers = build_providers(&config.providers);
    let aggregator = Aggregator::new(providers)?;

    tracing::info!(
        port = config.port,
        timeout_ms = config.timeout.as_millis() as u64,
        rate_limit = config.rate_limit_per_minute,
        trust_forwarded_for = config.trust_forwarded_for,
        providers = ?aggregator.provider_names(),
        "Starting rates server"
    );

    let service = RateService::new(aggregator).with_timeout(config.timeout);

    // Create and run the HTTP server
    let rate_limiter =
        RateLimiterState::new(config.rate_limit_per_minute, Duration::from_secs(60))
            .trust_forwarded_for(config.trust_forwarded_for);
    let server = HttpServer::with_rate_limiter(service, rate_limiter);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Ensure traces are flushed before exit
    if let Some(provider) = otel_provider {
        let _ = provider.shutdown();
    }
    Ok(())
}
