//! HTTP surface of the marketplace backend.
//!
//! Exposes the recommendation assistant together with the provider catalog,
//! booking requests and the services catalog. Every failure is rendered as
//! `{ "error": ..., "details": ... }` and all origins are allowed.

mod handlers;

use crate::config::ServerSettings;
use crate::core::assistant::Assistant;
use crate::core::bookings::BookingLedger;
use crate::core::catalog::ProviderCatalog;
use crate::core::services::ServiceCatalog;
use crate::domain::ports::Requestor;
use crate::utils::error::{AssistantError, Result};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// State shared by all handlers; bookings and services are the only mutable parts.
pub struct AppState<R: Requestor> {
    assistant: Arc<Assistant<R>>,
    catalog: Arc<ProviderCatalog>,
    bookings: Arc<RwLock<BookingLedger>>,
    services: Arc<RwLock<ServiceCatalog>>,
}

impl<R: Requestor> AppState<R> {
    pub fn new(assistant: Assistant<R>, catalog: ProviderCatalog) -> Self {
        Self {
            assistant: Arc::new(assistant),
            catalog: Arc::new(catalog),
            bookings: Arc::new(RwLock::new(BookingLedger::new())),
            services: Arc::new(RwLock::new(ServiceCatalog::new())),
        }
    }
}

impl<R: Requestor> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            assistant: Arc::clone(&self.assistant),
            catalog: Arc::clone(&self.catalog),
            bookings: Arc::clone(&self.bookings),
            services: Arc::clone(&self.services),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: String,
}

pub(crate) fn error_response(label: &str, err: &AssistantError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        tracing::error!("❌ {}: {}", label, err);
    } else {
        tracing::debug!("{}: {}", label, err);
    }

    (
        status,
        Json(ErrorResponse {
            error: label.to_string(),
            details: err.to_string(),
        }),
    )
        .into_response()
}

impl IntoResponse for AssistantError {
    fn into_response(self) -> Response {
        error_response(&self.user_friendly_message(), &self)
    }
}

pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}

pub fn router<R: Requestor + 'static>(state: AppState<R>) -> Router {
    Router::new()
        .route(
            "/gemini-ai-assistant",
            post(handlers::recommend::<R>).options(handlers::preflight),
        )
        .route("/health", get(handlers::health))
        .route("/providers", get(handlers::list_providers::<R>))
        .route("/providers/categories", get(handlers::list_categories::<R>))
        .route(
            "/bookings",
            get(handlers::list_bookings::<R>).post(handlers::create_booking::<R>),
        )
        .route("/bookings/summary", get(handlers::booking_summary::<R>))
        .route("/bookings/:id/accept", post(handlers::accept_booking::<R>))
        .route("/bookings/:id/reject", post(handlers::reject_booking::<R>))
        .route(
            "/services",
            get(handlers::list_services::<R>).post(handlers::add_service::<R>),
        )
        .route("/services/:id", delete(handlers::remove_service::<R>))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve<R: Requestor + 'static>(
    settings: &ServerSettings,
    state: AppState<R>,
) -> Result<()> {
    let listener = TcpListener::bind(settings.socket_addr()).await?;
    tracing::info!("🚀 Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state)).await?;
    Ok(())
}
