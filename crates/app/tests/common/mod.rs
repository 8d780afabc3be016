//! In-process fake of the to-do API used by the end-to-end tests.
//!
//! Routes mirror the real service: tasks live in memory, ids are UUIDs and
//! malformed payloads are rejected with 422.

#![allow(clippy::unwrap_used, dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;
use uuid::Uuid;

const CATEGORIES: [&str; 5] = ["Work", "Personal", "Shopping", "Health", "Other"];

/// A stored task, serialized the way the API returns it.
#[derive(Debug, Clone, Serialize)]
pub struct StoredTask {
    pub id: String,
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub category: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct CreateBody {
    title: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    due_date: Option<DateTime<Utc>>,
    category: String,
}

#[derive(Debug, Deserialize)]
struct UpdateBody {
    title: Option<String>,
    description: Option<String>,
    due_date: Option<DateTime<Utc>>,
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    status: Option<String>,
    category: Option<String>,
}

#[derive(Default)]
struct ApiState {
    tasks: Mutex<Vec<StoredTask>>,
    accept_any_category: bool,
    store_rejected: bool,
}

impl ApiState {
    fn category_allowed(&self, category: &str) -> bool {
        self.accept_any_category || CATEGORIES.contains(&category)
    }
}

/// Handle on a running fake server.
pub struct FakeTodoApi {
    addr: SocketAddr,
    state: Arc<ApiState>,
}

impl FakeTodoApi {
    /// Starts a server that validates like the real API.
    pub async fn start() -> Self {
        Self::spawn(ApiState::default()).await
    }

    /// Starts a server that wrongly accepts unknown categories.
    pub async fn start_lenient() -> Self {
        Self::spawn(ApiState {
            accept_any_category: true,
            ..ApiState::default()
        })
        .await
    }

    /// Starts a server that rejects unknown categories with 422 but stores
    /// the task anyway.
    pub async fn start_leaky() -> Self {
        Self::spawn(ApiState {
            store_rejected: true,
            ..ApiState::default()
        })
        .await
    }

    async fn spawn(state: ApiState) -> Self {
        let state = Arc::new(state);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(Arc::clone(&state));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self { addr, state }
    }

    /// Base URL of the running server.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Inserts a task directly, bypassing the API.
    pub fn seed(&self, title: &str, category: &str) {
        let task = new_task(title.to_string(), String::new(), None, category.to_string());
        self.state.tasks.lock().unwrap().push(task);
    }

    /// Snapshot of the stored tasks.
    pub fn tasks(&self) -> Vec<StoredTask> {
        self.state.tasks.lock().unwrap().clone()
    }
}

fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/api/tasks/{id}/toggle", patch(toggle_task))
        .with_state(state)
}

fn new_task(
    title: String,
    description: String,
    due_date: Option<DateTime<Utc>>,
    category: String,
) -> StoredTask {
    StoredTask {
        id: Uuid::new_v4().to_string(),
        title,
        description,
        due_date,
        category,
        completed: false,
        created_at: Utc::now(),
    }
}

fn unprocessable(detail: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "detail": detail })),
    )
        .into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "detail": "Task not found" })),
    )
        .into_response()
}

async fn root() -> impl IntoResponse {
    Json(json!({ "message": "To-Do App API" }))
}

async fn list_tasks(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ListQuery>,
) -> Response {
    let tasks = state.tasks.lock().unwrap();
    let filtered: Vec<StoredTask> = tasks
        .iter()
        .filter(|task| match query.status.as_deref() {
            Some("active") => !task.completed,
            Some("completed") => task.completed,
            _ => true,
        })
        .filter(|task| {
            query
                .category
                .as_deref()
                .is_none_or(|category| task.category == category)
        })
        .cloned()
        .collect();
    Json(filtered).into_response()
}

async fn create_task(State(state): State<Arc<ApiState>>, Json(body): Json<CreateBody>) -> Response {
    let Some(title) = body.title.filter(|title| !title.is_empty()) else {
        return unprocessable("title is required");
    };
    if !state.category_allowed(&body.category) {
        if state.store_rejected {
            let task = new_task(title, body.description, body.due_date, body.category);
            state.tasks.lock().unwrap().push(task);
        }
        return unprocessable("invalid category");
    }

    let task = new_task(title, body.description, body.due_date, body.category);
    state.tasks.lock().unwrap().push(task.clone());
    (StatusCode::CREATED, Json(task)).into_response()
}

async fn get_task(State(state): State<Arc<ApiState>>, Path(id): Path<String>) -> Response {
    let tasks = state.tasks.lock().unwrap();
    tasks
        .iter()
        .find(|task| task.id == id)
        .map_or_else(not_found, |task| Json(task.clone()).into_response())
}

async fn update_task(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateBody>,
) -> Response {
    if let Some(category) = &body.category
        && !state.category_allowed(category)
    {
        return unprocessable("invalid category");
    }

    let mut tasks = state.tasks.lock().unwrap();
    let Some(task) = tasks.iter_mut().find(|task| task.id == id) else {
        return not_found();
    };
    if let Some(title) = body.title {
        task.title = title;
    }
    if let Some(description) = body.description {
        task.description = description;
    }
    if body.due_date.is_some() {
        task.due_date = body.due_date;
    }
    if let Some(category) = body.category {
        task.category = category;
    }
    Json(task.clone()).into_response()
}

async fn toggle_task(State(state): State<Arc<ApiState>>, Path(id): Path<String>) -> Response {
    let mut tasks = state.tasks.lock().unwrap();
    let Some(task) = tasks.iter_mut().find(|task| task.id == id) else {
        return not_found();
    };
    task.completed = !task.completed;
    Json(task.clone()).into_response()
}

async fn delete_task(State(state): State<Arc<ApiState>>, Path(id): Path<String>) -> Response {
    let mut tasks = state.tasks.lock().unwrap();
    let before = tasks.len();
    tasks.retain(|task| task.id != id);
    if tasks.len() == before {
        return not_found();
    }
    StatusCode::NO_CONTENT.into_response()
}
