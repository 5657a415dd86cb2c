// 🌐 HTTP adapter - confirmation page + back-office read API (axum)

use crate::db::{get_all_guests, get_guest, Guest, SqliteGuestStore};
use crate::error::RsvpError;
use crate::handler::{confirm_rsvp, RsvpRequest};
use crate::links::{RsvpLinks, RSVP_PATH};
use crate::presenter::{render_html, View};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SqliteGuestStore>,
    pub base_url: String,
}

impl AppState {
    pub fn new(store: SqliteGuestStore, base_url: impl Into<String>) -> Self {
        Self {
            store: Arc::new(store),
            base_url: base_url.into(),
        }
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

// ============================================================================
// Confirmation page
// ============================================================================

/// GET /rsvp?guestId=..&status=.. - apply the link and render the result page
async fn confirm_handler(
    State(state): State<AppState>,
    query: Result<Query<RsvpRequest>, QueryRejection>,
) -> Response {
    let outcome = match query {
        Ok(Query(request)) => confirm_rsvp(state.store.as_ref(), &request),
        Err(rejection) => {
            warn!(error = %rejection, "malformed rsvp query");
            Err(RsvpError::Unexpected(rejection.body_text()))
        }
    };

    let status = match &outcome {
        Ok(_) => StatusCode::OK,
        Err(err) => StatusCode::from_u16(err.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
    };

    (status, Html(render_html(&View::from_outcome(&outcome)))).into_response()
}

/// OPTIONS /rsvp - empty preflight answer
async fn preflight() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "*"),
        ],
    )
}

// ============================================================================
// Back-office API
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/guests - All guests with their RSVP status
async fn list_guests(State(state): State<AppState>) -> Response {
    match state.store.with_conn(get_all_guests) {
        Ok(guests) => (StatusCode::OK, Json(ApiResponse::ok(guests))).into_response(),
        Err(e) => {
            error!(error = %e, "listing guests failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Vec<Guest>>::err(e.to_string())),
            )
                .into_response()
        }
    }
}

/// GET /api/guests/:id - One guest
async fn show_guest(State(state): State<AppState>, Path(guest_id): Path<String>) -> Response {
    match state.store.with_conn(|conn| get_guest(conn, &guest_id)) {
        Ok(Some(guest)) => (StatusCode::OK, Json(ApiResponse::ok(guest))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<Guest>::err(format!("no guest with id {}", guest_id))),
        )
            .into_response(),
        Err(e) => {
            error!(guest_id = %guest_id, error = %e, "loading guest failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Guest>::err(e.to_string())),
            )
                .into_response()
        }
    }
}

/// GET /api/guests/:id/links - Attend/decline links for the invitation email
async fn guest_links(State(state): State<AppState>, Path(guest_id): Path<String>) -> Response {
    match state.store.with_conn(|conn| get_guest(conn, &guest_id)) {
        Ok(Some(guest)) => (
            StatusCode::OK,
            Json(ApiResponse::ok(RsvpLinks::build(&state.base_url, &guest.id))),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<RsvpLinks>::err(format!("no guest with id {}", guest_id))),
        )
            .into_response(),
        Err(e) => {
            error!(guest_id = %guest_id, error = %e, "loading guest failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<RsvpLinks>::err(e.to_string())),
            )
                .into_response()
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/guests", get(list_guests))
        .route("/guests/:id", get(show_guest))
        .route("/guests/:id/links", get(guest_links))
        .with_state(state.clone())
        .layer(CorsLayer::permissive());

    // The CORS layer answers every OPTIONS itself, so it only wraps GET here
    // and the explicit preflight handler keeps its 204
    let rsvp = get(confirm_handler)
        .layer(CorsLayer::permissive())
        .options(preflight);

    Router::new()
        .route(RSVP_PATH, rsvp)
        .with_state(state)
        .nest("/api", api_routes)
}
