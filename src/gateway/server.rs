use super::auth::StaticSessionVerifier;
use super::handlers::{
    handle_focused, handle_generate, handle_ghost_write, handle_health, handle_resolve,
};
use super::transcribe::handle_transcribe;
use super::{AppState, MAX_UPLOAD_BODY_BYTES};

use crate::audit::create_audit_sink;
use crate::config::{Config, GatewayConfig};
use crate::scribe::ScribeService;
use crate::transcription::{TranscriptionService, create_transcriber};
use anyhow::{Context, Result};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Method, StatusCode, header},
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Returns true when the bind address is not a loopback address.
fn is_public_bind(host: &str) -> bool {
    !matches!(
        host,
        "127.0.0.1" | "localhost" | "::1" | "[::1]" | "0:0:0:0:0:0:0:1"
    )
}

/// Run the HTTP gateway using axum with proper HTTP/1.1 compliance.
pub async fn run_gateway(host: &str, port: u16, config: Arc<Config>) -> Result<()> {
    if is_public_bind(host) {
        tracing::warn!(host, "gateway bound to a non-loopback address; terminate TLS in front of it");
    }

    let listener = bind_listener(host, port).await?;
    run_gateway_with_listener(host, listener, config).await
}

/// `[::1]` → `::1`; anything else unchanged.
fn unbracket(host: &str) -> &str {
    host.strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host)
}

/// Bind `host:port`. Hostnames are resolved; IPv6 literals may be bracketed.
async fn bind_listener(host: &str, port: u16) -> Result<tokio::net::TcpListener> {
    tokio::net::TcpListener::bind((unbracket(host), port))
        .await
        .with_context(|| format!("bind gateway socket {host}:{port}"))
}

/// Wire the services named in `config` into handler state.
pub fn build_state(config: &Config) -> Result<AppState> {
    let audit = create_audit_sink(&config.audit);
    let scribe = ScribeService::from_config(config, Arc::clone(&audit))
        .context("create scribe service")?;
    let transcription =
        TranscriptionService::new(create_transcriber(&config.transcription), audit);
    Ok(AppState {
        scribe: Arc::new(scribe),
        transcription: Arc::new(transcription),
        sessions: Arc::new(StaticSessionVerifier::from_config(&config.auth)),
    })
}

/// Run the HTTP gateway from a pre-bound listener.
pub async fn run_gateway_with_listener(
    host: &str,
    listener: tokio::net::TcpListener,
    config: Arc<Config>,
) -> Result<()> {
    let actual_port = listener
        .local_addr()
        .context("get gateway listener local address")?
        .port();
    let display_addr = format!("{host}:{actual_port}");

    let state = build_state(&config)?;
    if config.auth.sessions.is_empty() {
        tracing::warn!("no sessions configured; every authenticated route will return 401");
    }
    print_gateway_banner(&display_addr, &state);

    let app = build_app(state, &config.gateway);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("serve HTTP gateway")?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    tracing::info!("gateway shutting down");
}

fn print_gateway_banner(display_addr: &str, state: &AppState) {
    println!("Gateway listening on {display_addr}");
    println!("  GET  /health");
    println!("  POST /scribe/generate");
    println!("  POST /scribe/focused");
    println!("  POST /scribe/ghost-write");
    println!("  POST /scribe/resolve-suggestion");
    if state.transcription.is_configured() {
        println!("  POST /ai/transcribe");
    } else {
        println!("  POST /ai/transcribe (disabled: no whisper_url)");
    }
    println!("  Model provider: {}", state.scribe.provider_name());
}

/// Router with limits, timeout and CORS applied. Serve it with
/// `into_make_service_with_connect_info::<SocketAddr>()` so audit events get the peer IP.
pub fn build_app(state: AppState, config: &GatewayConfig) -> Router {
    let scribe_routes = Router::new()
        .route("/scribe/generate", post(handle_generate))
        .route("/scribe/focused", post(handle_focused))
        .route("/scribe/ghost-write", post(handle_ghost_write))
        .route("/scribe/resolve-suggestion", post(handle_resolve))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes));

    let upload_routes = Router::new()
        .route("/ai/transcribe", post(handle_transcribe))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY_BYTES));

    let mut app = Router::new()
        .route("/health", get(handle_health))
        .merge(scribe_routes)
        .merge(upload_routes)
        .with_state(state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ));

    if !config.allowed_origins.is_empty() {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        app = app.layer(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::AUTHORIZATION,
                    HeaderName::from_static(super::auth::PATIENT_HEADER),
                ])
                .allow_credentials(true),
        );
    }

    app
}
