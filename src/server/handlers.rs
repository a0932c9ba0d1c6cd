use super::{error_response, AppState};
use crate::core::catalog::ProviderQuery;
use crate::domain::model::{
    BookingAction, BookingRequest, BookingStatus, BookingSummary, NewBookingRequest,
    NewService, Provider, RecommendationRequest, Service,
};
use crate::domain::ports::Requestor;
use crate::utils::error::{AssistantError, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

const RECOMMENDATION_FAILED: &str = "Failed to generate recommendations";

fn malformed(rejection: JsonRejection) -> AssistantError {
    AssistantError::MalformedRequestError {
        message: rejection.body_text(),
    }
}

pub(super) async fn recommend<R: Requestor>(
    State(state): State<AppState<R>>,
    payload: std::result::Result<Json<RecommendationRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return error_response(RECOMMENDATION_FAILED, &malformed(rejection)),
    };

    match state.assistant.recommend(&request).await {
        Ok(resolution) => Json(resolution.into_body()).into_response(),
        Err(e) => error_response(RECOMMENDATION_FAILED, &e),
    }
}

/// Bare OPTIONS without CORS request headers still gets an empty 200.
pub(super) async fn preflight() -> StatusCode {
    StatusCode::OK
}

#[derive(Serialize)]
pub(super) struct Health {
    status: &'static str,
    version: &'static str,
}

pub(super) async fn health() -> Json<Health> {
    Json(Health {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub(super) async fn list_providers<R: Requestor>(
    State(state): State<AppState<R>>,
    Query(query): Query<ProviderQuery>,
) -> Json<Vec<Provider>> {
    Json(state.catalog.filter(&query).into_iter().cloned().collect())
}

pub(super) async fn list_categories<R: Requestor>(
    State(state): State<AppState<R>>,
) -> Json<Vec<String>> {
    Json(state.catalog.categories())
}

#[derive(Deserialize)]
pub(super) struct BookingQuery {
    status: Option<String>,
}

pub(super) async fn list_bookings<R: Requestor>(
    State(state): State<AppState<R>>,
    Query(query): Query<BookingQuery>,
) -> Result<Json<Vec<BookingRequest>>> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<BookingStatus>)
        .transpose()
        .map_err(|message| AssistantError::ValidationError { message })?;

    Ok(Json(state.bookings.read().await.list(status)))
}

pub(super) async fn create_booking<R: Requestor>(
    State(state): State<AppState<R>>,
    payload: std::result::Result<Json<NewBookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookingRequest>)> {
    let Json(new) = payload.map_err(malformed)?;
    let created = state.bookings.write().await.create(new)?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(super) async fn booking_summary<R: Requestor>(
    State(state): State<AppState<R>>,
) -> Json<BookingSummary> {
    Json(state.bookings.read().await.summary())
}

pub(super) async fn accept_booking<R: Requestor>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Json<BookingRequest>> {
    let updated = state
        .bookings
        .write()
        .await
        .respond(&id, BookingAction::Accept)?;
    Ok(Json(updated))
}

pub(super) async fn reject_booking<R: Requestor>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Json<BookingRequest>> {
    let updated = state
        .bookings
        .write()
        .await
        .respond(&id, BookingAction::Reject)?;
    Ok(Json(updated))
}

pub(super) async fn list_services<R: Requestor>(
    State(state): State<AppState<R>>,
) -> Json<Vec<Service>> {
    Json(state.services.read().await.list().to_vec())
}

pub(super) async fn add_service<R: Requestor>(
    State(state): State<AppState<R>>,
    payload: std::result::Result<Json<NewService>, JsonRejection>,
) -> Result<(StatusCode, Json<Service>)> {
    let Json(new) = payload.map_err(malformed)?;
    let service = state.services.write().await.add(new)?;
    Ok((StatusCode::CREATED, Json(service)))
}

pub(super) async fn remove_service<R: Requestor>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Json<Service>> {
    let removed = state.services.write().await.remove(&id)?;
    Ok(Json(removed))
}
