#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use hotel_desk::api::ApiClient;
use hotel_desk::session::{MemoryStateStore, PersistedState, Session, Theme};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Every request the mock API received, as `METHOD /path`.
#[derive(Debug, Clone, Default)]
pub struct RequestLog(Arc<Mutex<Vec<String>>>);

impl RequestLog {
    pub fn entries(&self) -> Vec<String> {
        self.0.lock().expect("request log poisoned").clone()
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.entries().iter().any(|seen| seen == entry)
    }

    pub fn count_matching(&self, needle: &str) -> usize {
        self.entries()
            .iter()
            .filter(|seen| seen.contains(needle))
            .count()
    }
}

async fn record(State(log): State<RequestLog>, request: Request, next: Next) -> Response {
    let entry = format!("{} {}", request.method(), request.uri().path());
    log.0.lock().expect("request log poisoned").push(entry);
    next.run(request).await
}

pub struct MockApi {
    pub base_url: String,
    pub log: RequestLog,
}

impl MockApi {
    pub async fn spawn(router: Router) -> Self {
        let log = RequestLog::default();
        let app = router.layer(middleware::from_fn_with_state(log.clone(), record));
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock api");
        let addr = listener.local_addr().expect("mock api address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock api stopped");
        });
        Self {
            base_url: format!("http://{addr}"),
            log,
        }
    }

    /// Session already holding `token`, backed by an in-memory store.
    pub fn session(&self, token: Option<&str>) -> (Session, Arc<MemoryStateStore>) {
        let store = Arc::new(MemoryStateStore::with_state(PersistedState {
            auth_token: token.map(str::to_string),
            theme: Theme::Dark,
        }));
        let session = Session::new(ApiClient::new(&self.base_url), store.clone());
        (session, store)
    }
}

pub fn user_json(id: i64, username: &str, level: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "permission_level": level,
        "is_active": true
    })
}

pub fn task_json(id: i64, status: &str, assigned_to: Option<i64>) -> Value {
    json!({
        "id": id,
        "room_id": 100 + id,
        "room_number": format!("{}", 100 + id),
        "task_type": "cleaning",
        "priority": "normal",
        "status": status,
        "assigned_to": assigned_to,
        "assigned_to_username": assigned_to.map(|id| format!("staff{id}")),
        "scheduled_date": "2024-05-01",
        "scheduled_time": "09:00",
        "estimated_duration_minutes": 30
    })
}
