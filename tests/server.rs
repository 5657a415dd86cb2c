#![cfg(feature = "server")]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use rsvp_confirm::{
    get_guest, insert_guests, router, AppState, Guest, RsvpStatus, SqliteGuestStore,
};
use tower::ServiceExt;

fn app_with_guest(id: &str) -> (Router, AppState) {
    let store = SqliteGuestStore::in_memory().unwrap();
    store
        .with_conn(|conn| {
            let mut guest = Guest::new("Ada Lovelace", "ada@example.com", "Spring Gala");
            guest.id = id.to_string();
            insert_guests(conn, &[guest])
        })
        .unwrap();

    let state = AppState::new(store, "https://events.example.com");
    (router(state.clone()), state)
}

fn status_of(state: &AppState, id: &str) -> RsvpStatus {
    state
        .store
        .with_conn(|conn| get_guest(conn, id))
        .unwrap()
        .unwrap()
        .rsvp_status
}

async fn get(app: Router, uri: &str) -> (StatusCode, header::HeaderMap, String) {
    let response = app
        .oneshot(
            Request::builder()
                .uri(uri)
                .header(header::ORIGIN, "https://mail.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

fn assert_html_with_cors(headers: &header::HeaderMap) {
    let content_type = headers.get(header::CONTENT_TYPE).unwrap().to_str().unwrap();
    assert!(content_type.starts_with("text/html"), "got {}", content_type);
    assert!(headers.contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[tokio::test]
async fn test_attending_link_confirms_guest() {
    let (app, state) = app_with_guest("g1");

    let (status, headers, body) = get(app, "/rsvp?guestId=g1&status=attending").await;

    assert_eq!(status, StatusCode::OK);
    assert_html_with_cors(&headers);
    assert!(body.contains("RSVP: attending"));
    assert_eq!(status_of(&state, "g1"), RsvpStatus::Attending);
}

#[tokio::test]
async fn test_declined_link_confirms_guest() {
    let (app, state) = app_with_guest("g1");

    let (status, _, body) = get(app, "/rsvp?guestId=g1&status=declined").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("RSVP: declined"));
    assert_eq!(status_of(&state, "g1"), RsvpStatus::Declined);
}

#[tokio::test]
async fn test_invalid_status_is_bad_request_without_write() {
    let (app, state) = app_with_guest("g1");

    let (status, headers, body) = get(app, "/rsvp?guestId=g1&status=maybe").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_html_with_cors(&headers);
    assert!(body.contains("contact the event organizer"));
    assert_eq!(status_of(&state, "g1"), RsvpStatus::Pending);
}

#[tokio::test]
async fn test_missing_guest_id_is_bad_request() {
    let (app, state) = app_with_guest("g1");

    let (status, _, body) = get(app, "/rsvp?status=attending").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("incomplete"));
    assert_eq!(status_of(&state, "g1"), RsvpStatus::Pending);
}

#[tokio::test]
async fn test_unknown_guest_is_server_error() {
    let (app, _) = app_with_guest("g1");

    let (status, headers, body) = get(app, "/rsvp?guestId=does-not-exist&status=attending").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_html_with_cors(&headers);
    assert!(body.contains("We couldn't record your RSVP"));
}

#[tokio::test]
async fn test_malformed_query_renders_unexpected_error_page() {
    let (app, state) = app_with_guest("g1");

    let (status, headers, body) =
        get(app.clone(), "/rsvp?guestId=g1&guestId=g2&status=attending").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_html_with_cors(&headers);
    assert!(body.contains("Something went wrong while processing your RSVP."));
    assert!(body.contains("contact the event organizer"));
    assert_eq!(status_of(&state, "g1"), RsvpStatus::Pending);

    let (status, _, _) = get(app, "/rsvp?guestId=%FF&status=attending").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(status_of(&state, "g1"), RsvpStatus::Pending);
}

#[tokio::test]
async fn test_empty_or_padded_status_is_bad_request() {
    let (app, state) = app_with_guest("g1");

    let (empty, _, _) = get(app.clone(), "/rsvp?guestId=g1&status=").await;
    let (padded, _, _) = get(app, "/rsvp?guestId=g1&status=attending%20").await;

    assert_eq!(empty, StatusCode::BAD_REQUEST);
    assert_eq!(padded, StatusCode::BAD_REQUEST);
    assert_eq!(status_of(&state, "g1"), RsvpStatus::Pending);
}

#[tokio::test]
async fn test_replaying_opposite_link_last_write_wins() {
    let (app, state) = app_with_guest("g1");

    let (first, _, _) = get(app.clone(), "/rsvp?guestId=g1&status=attending").await;
    let (again, _, _) = get(app.clone(), "/rsvp?guestId=g1&status=attending").await;
    assert_eq!(first, StatusCode::OK);
    assert_eq!(again, StatusCode::OK);
    assert_eq!(status_of(&state, "g1"), RsvpStatus::Attending);

    let (flipped, _, _) = get(app, "/rsvp?guestId=g1&status=declined").await;
    assert_eq!(flipped, StatusCode::OK);
    assert_eq!(status_of(&state, "g1"), RsvpStatus::Declined);
}

#[tokio::test]
async fn test_options_answers_no_content() {
    let (app, _) = app_with_guest("g1");

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/rsvp")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn test_guest_api() {
    let (app, _) = app_with_guest("g1");

    let (status, _, body) = get(app.clone(), "/api/guests/g1").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["rsvp_status"], "pending");

    let (status, _, _) = get(app.clone(), "/api/guests/nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, body) = get(app, "/api/guests").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_guest_links_api() {
    let (app, _) = app_with_guest("g1");

    let (status, _, body) = get(app, "/api/guests/g1/links").await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        json["data"]["attend"],
        "https://events.example.com/rsvp?guestId=g1&status=attending"
    );
    assert_eq!(
        json["data"]["decline"],
        "https://events.example.com/rsvp?guestId=g1&status=declined"
    );
}

#[tokio::test]
async fn test_health() {
    let (app, _) = app_with_guest("g1");

    let (status, _, body) = get(app, "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"success\":true"));
}
