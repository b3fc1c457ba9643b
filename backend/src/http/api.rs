use allocator::{Room, RoomNumber};
use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::http::AppState;
use crate::inventory::model::Booking;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/rooms", get(rooms))
        .route("/available-rooms", get(available_rooms))
        .route("/bookings", get(bookings))
        .route("/book", post(book))
        .route("/random-occupancy", post(random_occupancy))
        .route("/reset", post(reset))
}

#[derive(Debug)]
pub enum ApiError {
    App(AppError),
    Invalid(String),
}

impl ApiError {
    fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::Invalid(msg.into())
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError::App(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::App(err) => {
                let status = match &err {
                    AppError::Allocation(alloc) if alloc.is_client_error() => {
                        StatusCode::BAD_REQUEST
                    }
                    AppError::BookingConflict { .. } => StatusCode::CONFLICT,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                if status.is_server_error() {
                    tracing::error!(target: "http", error = %err, "request failed");
                }
                (status, err.code(), err.to_string())
            }
            ApiError::Invalid(msg) => (StatusCode::BAD_REQUEST, "invalid_request", msg),
        };
        let body = serde_json::json!({ "code": code, "message": message });
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookRequest {
    num_rooms: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BookResponse {
    success: bool,
    booking: Booking,
    selected_rooms: Vec<Room>,
    total_travel_time: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OccupancyResponse {
    success: bool,
    message: String,
    rooms_booked: Vec<RoomNumber>,
}

#[derive(Debug, Serialize)]
struct ResetResponse {
    success: bool,
    message: String,
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

async fn rooms(State(state): State<AppState>) -> Result<Json<Vec<Room>>, ApiError> {
    Ok(Json(state.bookings.rooms().await?))
}

async fn available_rooms(State(state): State<AppState>) -> Result<Json<Vec<Room>>, ApiError> {
    Ok(Json(state.bookings.available_rooms().await?))
}

async fn bookings(State(state): State<AppState>) -> Result<Json<Vec<Booking>>, ApiError> {
    Ok(Json(state.bookings.bookings().await?))
}

async fn book(
    State(state): State<AppState>,
    payload: Result<Json<BookRequest>, JsonRejection>,
) -> Result<Json<BookResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let outcome = state.bookings.book(req.num_rooms).await?;
    let total_travel_time = outcome.booking.total_travel_time;

    Ok(Json(BookResponse {
        success: true,
        booking: outcome.booking,
        selected_rooms: outcome.rooms,
        total_travel_time,
    }))
}

async fn random_occupancy(
    State(state): State<AppState>,
) -> Result<Json<OccupancyResponse>, ApiError> {
    let occupied = state.bookings.randomize_occupancy().await?;

    Ok(Json(OccupancyResponse {
        success: true,
        message: format!("Marked {} rooms as booked", occupied.len()),
        rooms_booked: occupied,
    }))
}

async fn reset(State(state): State<AppState>) -> Result<Json<ResetResponse>, ApiError> {
    state.bookings.reset().await?;

    Ok(Json(ResetResponse {
        success: true,
        message: "All bookings reset successfully".to_string(),
    }))
}
