mod common;

use axum::extract::Form;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use common::{user_json, MockApi};
use hotel_desk::admin;
use hotel_desk::frontdesk;
use hotel_desk::intent::DeskError;
use hotel_desk::session::{StateStore, Theme};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
struct TokenForm {
    username: String,
    password: String,
    grant_type: String,
}

async fn token(Form(form): Form<TokenForm>) -> (StatusCode, Json<Value>) {
    if form.grant_type != "password" {
        return (StatusCode::BAD_REQUEST, Json(json!({ "detail": "unsupported grant" })));
    }
    let access_token = match (form.username.as_str(), form.password.as_str()) {
        ("admin", "admin123") => "admin-token",
        ("clerk", "clerk123") => "clerk-token",
        _ => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "detail": "Incorrect username or password" })),
            )
        }
    };
    (
        StatusCode::OK,
        Json(json!({ "access_token": access_token, "token_type": "bearer" })),
    )
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

async fn me(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    match bearer(&headers) {
        Some("admin-token") => (StatusCode::OK, Json(user_json(1, "admin", "ADMIN"))),
        Some("clerk-token") => (StatusCode::OK, Json(user_json(2, "clerk", "REGULAR"))),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Could not validate credentials" })),
        ),
    }
}

async fn rooms() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "detail": "Token expired" })),
    )
}

async fn users() -> Json<Value> {
    Json(json!([user_json(1, "admin", "ADMIN"), user_json(2, "clerk", "REGULAR")]))
}

async fn mock_api() -> MockApi {
    let router = Router::new()
        .route("/auth/token", post(token))
        .route("/users/me", get(me))
        .route("/users/", get(users))
        .route("/rooms/", get(rooms));
    MockApi::spawn(router).await
}

#[tokio::test]
async fn login_persists_token_and_loads_user() {
    let api = mock_api().await;
    let (mut session, store) = api.session(None);

    let user = session.login(" admin ", "admin123").await.expect("login succeeds");
    assert_eq!(user.username, "admin");
    assert!(session.is_authenticated());
    assert_eq!(session.user().map(|user| user.id), Some(1));

    let persisted = store.load().expect("state readable");
    assert_eq!(persisted.auth_token.as_deref(), Some("admin-token"));
    assert_eq!(persisted.theme, Theme::Dark);
}

#[tokio::test]
async fn bad_credentials_leave_the_session_signed_out() {
    let api = mock_api().await;
    let (mut session, store) = api.session(None);

    let err = session
        .login("admin", "wrong")
        .await
        .expect_err("login rejected");
    assert_eq!(err.to_string(), "Incorrect username or password");
    assert!(!session.is_authenticated());
    assert_eq!(store.load().expect("state").auth_token, None);

    let err = session.login("", "").await.expect_err("empty form");
    assert_eq!(err.to_string(), "Please enter username and password");
    assert_eq!(api.log.count_matching("/auth/token"), 1);
}

#[tokio::test]
async fn restore_drops_a_stale_token() {
    let api = mock_api().await;
    let (mut session, store) = api.session(Some("expired"));

    let err = session.restore().await.expect_err("stale token rejected");
    assert!(matches!(err, DeskError::AuthRequired(_)));
    assert!(!session.is_authenticated());
    assert_eq!(store.load().expect("state").auth_token, None);

    let (mut session, _store) = api.session(Some("clerk-token"));
    let user = session.restore().await.expect("valid token restores");
    assert_eq!(user.username, "clerk");
}

#[tokio::test]
async fn unauthorized_response_signs_the_session_out() {
    let api = mock_api().await;
    let (mut session, store) = api.session(Some("admin-token"));

    let err = frontdesk::list_rooms(&mut session)
        .await
        .expect_err("rooms rejected");
    assert!(err.is_auth_failure());
    assert_eq!(err.to_string(), "Token expired");
    assert!(!session.is_authenticated());
    assert_eq!(store.load().expect("state").auth_token, None);

    let err = frontdesk::list_rooms(&mut session)
        .await
        .expect_err("signed out");
    assert_eq!(err.to_string(), "Not authenticated");
    assert_eq!(api.log.count_matching("/rooms/"), 1);
}

#[tokio::test]
async fn admin_views_require_an_admin() {
    let api = mock_api().await;

    let (mut session, _store) = api.session(Some("clerk-token"));
    let err = admin::list_users(&mut session)
        .await
        .expect_err("regular user refused");
    assert_eq!(err.to_string(), "Admin access required");
    assert!(!session.is_authenticated());
    assert!(!api.log.contains("GET /users/"));

    let (mut session, _store) = api.session(Some("admin-token"));
    let outcome = admin::list_users(&mut session).await.expect("admin lists users");
    assert_eq!(outcome.data.stats.total, 2);
    assert_eq!(outcome.data.stats.admins, 1);
    assert!(api.log.contains("GET /users/"));
}

#[tokio::test]
async fn theme_toggle_is_persisted() {
    let api = mock_api().await;
    let (mut session, store) = api.session(None);

    assert_eq!(session.toggle_theme(), Theme::Light);
    assert_eq!(store.load().expect("state").theme, Theme::Light);
    assert_eq!(session.toggle_theme(), Theme::Dark);
}
