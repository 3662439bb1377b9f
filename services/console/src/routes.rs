use crate::infra::{deserialize_optional_date, AppState};
use axum::extract::{Path, Query};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{Local, NaiveDate};
use hotel_desk::api::schema::{HousekeepingTask, TaskFilter, User};
use hotel_desk::error::AppError;
use hotel_desk::housekeeping::{NewTaskForm, TaskAction, TaskRow};
use hotel_desk::intent::{DeskError, Outcome, StatusMessage, ValidationError};
use hotel_desk::reports::{ExportFormat, LoadedReport, ReportKind};
use hotel_desk::session::Theme;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

pub(crate) fn router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/session", get(session_endpoint))
        .route("/api/v1/session/login", post(login_endpoint))
        .route("/api/v1/session/logout", post(logout_endpoint))
        .route("/api/v1/session/theme", post(theme_endpoint))
        .route("/api/v1/reports/:kind", get(report_endpoint))
        .route("/api/v1/reports/:kind/:format", get(report_export_endpoint))
        .route(
            "/api/v1/housekeeping/tasks",
            get(list_tasks_endpoint).post(create_task_endpoint),
        )
        .route(
            "/api/v1/housekeeping/tasks/:id/:action",
            post(task_action_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[derive(Debug, Serialize)]
pub(crate) struct SessionView {
    pub(crate) authenticated: bool,
    pub(crate) user: Option<User>,
    pub(crate) theme: Theme,
}

pub(crate) async fn session_endpoint(Extension(state): Extension<AppState>) -> Json<SessionView> {
    let desk = state.desk.lock().await;
    Json(SessionView {
        authenticated: desk.session.is_authenticated(),
        user: desk.session.user().cloned(),
        theme: desk.session.theme(),
    })
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    #[serde(default)]
    pub(crate) username: String,
    #[serde(default)]
    pub(crate) password: String,
}

pub(crate) async fn login_endpoint(
    Extension(state): Extension<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Outcome<User>>, AppError> {
    let mut desk = state.desk.lock().await;
    let user = desk
        .session
        .login(&request.username, &request.password)
        .await?;
    let status = StatusMessage::info(format!("Signed in as {}", user.username));
    Ok(Json(Outcome::new(user, status)))
}

pub(crate) async fn logout_endpoint(Extension(state): Extension<AppState>) -> StatusCode {
    let mut desk = state.desk.lock().await;
    desk.session.logout();
    StatusCode::NO_CONTENT
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ThemeRequest {
    #[serde(default)]
    pub(crate) theme: Option<Theme>,
}

/// Sets the theme, or toggles it when none is given.
pub(crate) async fn theme_endpoint(
    Extension(state): Extension<AppState>,
    Json(request): Json<ThemeRequest>,
) -> Json<serde_json::Value> {
    let mut desk = state.desk.lock().await;
    let theme = match request.theme {
        Some(theme) => desk.session.set_theme(theme),
        None => desk.session.toggle_theme(),
    };
    Json(json!({ "theme": theme }))
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReportQuery {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) end_date: Option<NaiveDate>,
}

async fn load_report(
    state: &AppState,
    kind: &str,
    query: ReportQuery,
) -> Result<LoadedReport, AppError> {
    let kind: ReportKind = kind.parse().map_err(DeskError::from)?;
    let mut guard = state.desk.lock().await;
    let desk = &mut *guard;
    let outcome = desk
        .reports
        .fetch(&mut desk.session, kind, query.start_date, query.end_date)
        .await?;
    Ok(outcome.data)
}

pub(crate) async fn report_endpoint(
    Extension(state): Extension<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<LoadedReport>, AppError> {
    load_report(&state, &kind, query).await.map(Json)
}

fn export_format(name: &str) -> Result<ExportFormat, ValidationError> {
    match name {
        "csv" => Ok(ExportFormat::Csv),
        "html" => Ok(ExportFormat::Html),
        other => Err(ValidationError::Invalid {
            field: "format",
            reason: format!("unknown export format '{other}'"),
        }),
    }
}

/// The report as a downloadable CSV file or printable HTML page.
pub(crate) async fn report_export_endpoint(
    Extension(state): Extension<AppState>,
    Path((kind, format)): Path<(String, String)>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let format = export_format(&format).map_err(DeskError::from)?;
    let report = load_report(&state, &kind, query).await?;
    let today = Local::now().date_naive();
    let body = format.render(&report.payload, today)?;
    let file_name = format.file_name(report.payload.kind(), today);
    info!(file = %file_name, "report exported");
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    ))
}

pub(crate) async fn list_tasks_endpoint(
    Extension(state): Extension<AppState>,
    Query(filter): Query<TaskFilter>,
) -> Result<Json<Outcome<Vec<TaskRow>>>, AppError> {
    let mut guard = state.desk.lock().await;
    let desk = &mut *guard;
    let outcome = desk
        .housekeeping
        .load_tasks(&mut desk.session, filter)
        .await?;
    Ok(Json(outcome))
}

pub(crate) async fn create_task_endpoint(
    Extension(state): Extension<AppState>,
    Json(form): Json<NewTaskForm>,
) -> Result<(StatusCode, Json<Outcome<HousekeepingTask>>), AppError> {
    let mut guard = state.desk.lock().await;
    let desk = &mut *guard;
    let outcome = desk.housekeeping.create(&mut desk.session, &form).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// Optional body of a task action; which fields matter depends on the action.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ActionBody {
    #[serde(default)]
    pub(crate) user_id: Option<i64>,
    #[serde(default)]
    pub(crate) notes: Option<String>,
    #[serde(default)]
    pub(crate) actual_duration_minutes: Option<i64>,
}

pub(crate) fn task_action(name: &str, body: ActionBody) -> Result<TaskAction, ValidationError> {
    match name {
        "assign" => body
            .user_id
            .map(|user_id| TaskAction::Assign { user_id })
            .ok_or(ValidationError::Incomplete("Please select a staff member")),
        "start" => Ok(TaskAction::Start),
        "complete" => Ok(TaskAction::Complete {
            notes: body.notes,
            actual_duration_minutes: body.actual_duration_minutes,
        }),
        "verify" => Ok(TaskAction::Verify { notes: body.notes }),
        other => Err(ValidationError::Invalid {
            field: "action",
            reason: format!("unknown task action '{other}'"),
        }),
    }
}

pub(crate) async fn task_action_endpoint(
    Extension(state): Extension<AppState>,
    Path((task_id, name)): Path<(i64, String)>,
    body: Option<Json<ActionBody>>,
) -> Result<Json<Outcome<HousekeepingTask>>, AppError> {
    let body = body.map(|Json(body)| body).unwrap_or_default();
    let action = task_action(&name, body).map_err(DeskError::from)?;
    let mut guard = state.desk.lock().await;
    let desk = &mut *guard;
    let outcome = desk
        .housekeeping
        .apply(&mut desk.session, task_id, action)
        .await?;
    Ok(Json(outcome))
}
