//! Axum-based HTTP gateway for browser and mobile front-ends.
//!
//! - `GET  /health`: liveness probe
//! - `POST /api/braille`: transcode text, no network
//! - `POST /api/translate`: translate, transcode and link to sign language
//!
//! Speech and haptics stay on the client: the gateway never speaks or
//! vibrates. Request bodies are capped at 64KB and requests time out after
//! 30s.

use crate::braille;
use crate::capability::{NoopHaptics, SilentSpeechOutput};
use crate::config::Config;
use crate::language::LanguageCode;
use crate::pipeline::{SessionSettings, TranslationPipeline};
use crate::translate::{HttpTranslator, TranslateError, Translator};
use anyhow::{Context, Result};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Maximum request body size (64KB).
pub const MAX_BODY_SIZE: usize = 65_536;
/// Request timeout (30s).
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<TranslationPipeline>,
    /// Languages used when a request omits them.
    pub defaults: SessionSettings,
}

// ── Request / response bodies ────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct BrailleBody {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BrailleReply {
    pub braille: String,
}

#[derive(Debug, Deserialize)]
pub struct TranslateBody {
    pub text: String,
    #[serde(rename = "sourceLang")]
    pub source_lang: Option<String>,
    #[serde(rename = "targetLang")]
    pub target_lang: Option<String>,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}

// ── Server ───────────────────────────────────────────────────────

/// Whether binding `host` would expose the gateway beyond this machine.
pub fn is_public_bind(host: &str) -> bool {
    let host = host.trim().trim_start_matches('[').trim_end_matches(']');
    if host.eq_ignore_ascii_case("localhost") {
        return false;
    }
    match host.parse::<IpAddr>() {
        Ok(ip) => !ip.is_loopback(),
        Err(_) => true,
    }
}

/// Bind `host:port`, resolving names such as `localhost` and accepting
/// bracketed IPv6 literals.
pub async fn bind_listener(host: &str, port: u16) -> Result<TcpListener> {
    let host = host.trim().trim_start_matches('[').trim_end_matches(']');
    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {host}:{port}"))?;
    Ok(listener)
}

/// Build the router with middleware. Split out so tests and embedders can
/// mount it without binding a socket.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    Router::new()
        .route("/health", get(handle_health))
        .route("/api/braille", post(handle_braille))
        .route("/api/translate", post(handle_translate))
        .with_state(state)
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        ))
}

/// Run the HTTP gateway until Ctrl-C.
pub async fn run_gateway(host: &str, port: u16, config: Config) -> Result<()> {
    if is_public_bind(host) && !config.gateway.allow_public_bind {
        anyhow::bail!(
            "Refusing to bind to {host}: the gateway would be reachable from other machines.\n\
             Use --host 127.0.0.1 (default) or set [gateway] allow_public_bind = true in config.toml."
        );
    }

    let listener = bind_listener(host, port).await?;
    let local = listener.local_addr()?;

    let translator: Arc<dyn Translator> = Arc::new(HttpTranslator::from_config(&config.translation)?);
    let pipeline = TranslationPipeline::from_config(
        &config,
        translator,
        Arc::new(SilentSpeechOutput),
        Arc::new(NoopHaptics),
    );
    let state = AppState {
        pipeline: Arc::new(pipeline),
        defaults: SessionSettings::from_config(&config),
    };

    tracing::info!(
        addr = %local,
        upstream = %config.translation.endpoint,
        "Gateway listening"
    );
    println!("LingoTouch gateway listening on http://{local}");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}

// ══════════════════════════════════════════════════════════════════════════════
// AXUM HANDLERS
// ══════════════════════════════════════════════════════════════════════════════

/// GET /health
async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// POST /api/braille. Total over any text; only a rejected body fails.
async fn handle_braille(body: Result<Json<BrailleBody>, JsonRejection>) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return error_response(rejection.status(), rejection.body_text()),
    };
    Json(BrailleReply {
        braille: braille::transcode(&body.text),
    })
    .into_response()
}

/// POST /api/translate
async fn handle_translate(
    State(state): State<AppState>,
    body: Result<Json<TranslateBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return error_response(rejection.status(), rejection.body_text()),
    };

    let mut settings = state.defaults;
    if let Some(code) = body.source_lang.as_deref() {
        match code.parse::<LanguageCode>() {
            Ok(lang) => settings = settings.with_source(lang),
            Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
        }
    }
    if let Some(code) = body.target_lang.as_deref() {
        match code.parse::<LanguageCode>() {
            Ok(lang) => settings = settings.with_target(lang),
            Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
        }
    }

    match state.pipeline.translate_only(&body.text, &settings).await {
        Ok(outcome) => Json(outcome).into_response(),
        Err(TranslateError::EmptyInput) => {
            error_response(StatusCode::BAD_REQUEST, TranslateError::EmptyInput.to_string())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Upstream translation failed");
            error_response(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}
