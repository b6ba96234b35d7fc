//! HTTP surface of the quote relay.

use crate::app::App;
use crate::error::ProviderErrorKind;
use crate::models::{
    ErrorResponse, GenerateRequest, HealthResponse, IllustratedQuoteResponse, QuoteResponse,
    SERVICE_NAME,
};
use crate::Error;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;
use uuid::Uuid;

pub struct ServerState {
    pub app: App,
    /// Include upstream error text in failure bodies.
    pub expose_error_details: bool,
}

pub type SharedState = Arc<ServerState>;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    details: Option<String>,
}

impl ApiError {
    /// Map a generation failure to a status and user-facing message.
    /// `fallback` is used for failures with no more specific bucket.
    pub fn from_generation(err: &Error, fallback: &str, expose_details: bool) -> Self {
        let (status, message, detail) = match err {
            Error::EmptyQuote => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Generated quote is empty",
                "The API returned an empty response".to_string(),
            ),
            other => {
                let (status, message) = match other.provider_kind() {
                    ProviderErrorKind::Auth => (
                        StatusCode::UNAUTHORIZED,
                        "Invalid API key. Please check your GEMINI_API_KEY.",
                    ),
                    ProviderErrorKind::Quota => (
                        StatusCode::TOO_MANY_REQUESTS,
                        "API quota exceeded. Please try again later.",
                    ),
                    ProviderErrorKind::RateLimited => (
                        StatusCode::TOO_MANY_REQUESTS,
                        "Too many requests. Please wait a moment and try again.",
                    ),
                    ProviderErrorKind::Other => (StatusCode::INTERNAL_SERVER_ERROR, fallback),
                };
                (status, message, other.to_string())
            }
        };

        Self {
            status,
            message: message.to_string(),
            details: expose_details.then_some(detail),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let payload = ErrorResponse {
            error: self.message,
            details: self.details,
        };
        (self.status, Json(payload)).into_response()
    }
}

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/generate", post(generate))
        .route("/generate-with-image", post(generate_with_image))
        .route("/health", get(health))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        // Outermost, so CORS preflights are logged too.
        .layer(middleware::from_fn(access_log))
}

/// Serve until the listener fails or a termination signal arrives.
pub async fn serve(listener: TcpListener, state: SharedState) -> std::io::Result<()> {
    let router = build_router(state);

    tokio::select! {
        result = axum::serve(listener, router).into_future() => result,
        signal_name = shutdown_signal() => {
            info!("{} received, shutting down", signal_name);
            Ok(())
        }
    }
}

pub async fn bind(addr: SocketAddr) -> std::io::Result<TcpListener> {
    info!(%addr, "Binding HTTP listener");
    TcpListener::bind(addr).await
}

async fn shutdown_signal() -> &'static str {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        if let Ok(mut stream) = signal(SignalKind::terminate()) {
            let _ = stream.recv().await;
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = terminate => "SIGTERM",
    }
}

async fn access_log(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let response = next.run(request).await;

    info!(
        %request_id,
        %method,
        %path,
        status = response.status().as_u16(),
        duration_ms = started.elapsed().as_millis() as u64,
        "request completed"
    );
    response
}

// A missing or malformed body is treated as an empty request.
async fn generate(
    State(state): State<SharedState>,
    body: Option<Json<GenerateRequest>>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let category = body.map(|Json(req)| req.category()).unwrap_or_default();

    let quote = state.app.generate_quote(category).await.map_err(|e| {
        ApiError::from_generation(&e, "Failed to generate quote", state.expose_error_details)
    })?;

    Ok(Json(QuoteResponse { quote }))
}

async fn generate_with_image(
    State(state): State<SharedState>,
    body: Option<Json<GenerateRequest>>,
) -> Result<Json<IllustratedQuoteResponse>, ApiError> {
    let category = body.map(|Json(req)| req.category()).unwrap_or_default();

    let illustrated = state
        .app
        .generate_quote_with_image(category)
        .await
        .map_err(|e| {
            ApiError::from_generation(
                &e,
                "Failed to generate quote with image",
                state.expose_error_details,
            )
        })?;

    Ok(Json(IllustratedQuoteResponse {
        quote: illustrated.quote,
        image_url: illustrated.image_url,
        category: illustrated.category,
    }))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
