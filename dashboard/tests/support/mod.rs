#![allow(dead_code)]

use axum::{
    extract::{Multipart, Path, State},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use dashboard::admin::Interaction;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

/// Backend state plus a log of every request it saw
#[derive(Default)]
pub struct Backend {
    pub cameras: Vec<Value>,
    pub models: Vec<Value>,
    pub requests: Vec<(Method, String)>,
    pub bodies: Vec<Value>,
    pub multipart_fields: Vec<(String, Option<String>)>,
    /// When set, every write answers with this status and JSON body
    pub reject_writes: Option<(StatusCode, Value)>,
    /// When set, every read answers 500
    pub fail_reads: bool,
    /// When set, feeds answer 200 with `success: false` and change nothing
    pub decline_feeds: bool,
    next_id: i64,
}

#[derive(Clone)]
pub struct FakeBackend {
    pub state: Arc<Mutex<Backend>>,
    pub base_url: String,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(Backend {
            next_id: 100,
            ..Backend::default()
        }));

        let app = Router::new()
            .route("/api/cameras/all", get(all_cameras))
            .route("/api/cameras", post(create_camera))
            .route("/api/cameras/:key", get(cameras_by_model).delete(delete_camera))
            .route("/api/cameras/:key/feed", post(feed_camera))
            .route("/api/camera/:id", get(camera_by_id))
            .route("/api/models", get(list_models).post(create_model))
            .route("/api/models/:id", delete(delete_model))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            state,
            base_url: format!("http://{}", addr),
        }
    }

    pub fn add_model(&self, id: i64, name: &str, image_path: Option<&str>) {
        self.state.lock().unwrap().models.push(json!({
            "id": id,
            "name": name,
            "description": format!("{} camera", name),
            "image_path": image_path,
            "created_at": "2024-01-10T09:30:00",
        }));
    }

    pub fn add_camera(&self, id: i64, model: &str, storage: f64, incidents: u64, status: &str) {
        self.state.lock().unwrap().cameras.push(camera_json(
            id,
            model,
            &format!("SN-{}", id),
            storage,
            incidents,
            status,
        ));
    }

    pub fn requests(&self) -> Vec<(Method, String)> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|(m, p)| *m == method && p == path)
            .count()
    }

    pub fn count_method(&self, method: Method) -> usize {
        self.requests().iter().filter(|(m, _)| *m == method).count()
    }

    pub fn clear_log(&self) {
        self.state.lock().unwrap().requests.clear();
    }

    pub fn reject_writes(&self, status: StatusCode, body: Value) {
        self.state.lock().unwrap().reject_writes = Some((status, body));
    }

    pub fn fail_reads(&self, fail: bool) {
        self.state.lock().unwrap().fail_reads = fail;
    }

    pub fn decline_feeds(&self) {
        self.state.lock().unwrap().decline_feeds = true;
    }

    pub fn last_body(&self) -> Option<Value> {
        self.state.lock().unwrap().bodies.last().cloned()
    }
}

pub fn camera_json(
    id: i64,
    model: &str,
    serial: &str,
    storage: f64,
    incidents: u64,
    status: &str,
) -> Value {
    json!({
        "id": id,
        "model": model,
        "serial_number": serial,
        "installation_date": "2024-03-01T00:00:00",
        "location": {"x": id as f64 * 10.0, "y": 5.0},
        "image_storage_gb": storage,
        "incidents_captured": incidents,
        "status": status,
    })
}

type Shared = State<Arc<Mutex<Backend>>>;

fn record(state: &Arc<Mutex<Backend>>, method: Method, uri: &Uri) {
    state
        .lock()
        .unwrap()
        .requests
        .push((method, uri.path().to_string()));
}

fn read_failure(state: &Arc<Mutex<Backend>>) -> Option<Response> {
    if state.lock().unwrap().fail_reads {
        return Some((StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response());
    }
    None
}

fn write_rejection(state: &Arc<Mutex<Backend>>) -> Option<Response> {
    let rejection = state.lock().unwrap().reject_writes.clone();
    rejection.map(|(status, body)| (status, Json(body)).into_response())
}

async fn all_cameras(State(state): Shared, uri: Uri) -> Response {
    record(&state, Method::GET, &uri);
    if let Some(failure) = read_failure(&state) {
        return failure;
    }
    let cameras = state.lock().unwrap().cameras.clone();
    Json(cameras).into_response()
}

async fn cameras_by_model(State(state): Shared, Path(model): Path<String>, uri: Uri) -> Response {
    record(&state, Method::GET, &uri);
    if let Some(failure) = read_failure(&state) {
        return failure;
    }
    let cameras: Vec<Value> = state
        .lock()
        .unwrap()
        .cameras
        .iter()
        .filter(|c| c["model"] == model.as_str())
        .cloned()
        .collect();
    Json(cameras).into_response()
}

async fn camera_by_id(State(state): Shared, Path(id): Path<i64>, uri: Uri) -> Response {
    record(&state, Method::GET, &uri);
    let camera = state
        .lock()
        .unwrap()
        .cameras
        .iter()
        .find(|c| c["id"] == id)
        .cloned();
    match camera {
        Some(camera) => Json(camera).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn list_models(State(state): Shared, uri: Uri) -> Response {
    record(&state, Method::GET, &uri);
    if let Some(failure) = read_failure(&state) {
        return failure;
    }
    let models = state.lock().unwrap().models.clone();
    Json(models).into_response()
}

async fn create_camera(State(state): Shared, uri: Uri, Json(body): Json<Value>) -> Response {
    record(&state, Method::POST, &uri);
    if let Some(rejection) = write_rejection(&state) {
        return rejection;
    }

    let mut backend = state.lock().unwrap();
    backend.bodies.push(body.clone());
    backend.next_id += 1;
    let id = backend.next_id;
    let model = body["model"].as_str().unwrap_or_default().to_string();
    let serial = body["serial_number"].as_str().unwrap_or_default().to_string();
    let storage: f64 = body["image_storage"].as_str().unwrap_or("0").parse().unwrap_or(0.0);
    let incidents: u64 = body["incidents_captured"]
        .as_str()
        .unwrap_or("0")
        .parse()
        .unwrap_or(0);
    backend
        .cameras
        .push(camera_json(id, &model, &serial, storage, incidents, "active"));

    Json(json!({"id": id, "model": model, "serial_number": serial})).into_response()
}

async fn create_model(State(state): Shared, uri: Uri, mut multipart: Multipart) -> Response {
    record(&state, Method::POST, &uri);

    let mut fields = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.unwrap_or_default();
        let value = match file_name {
            Some(file_name) => Some(file_name),
            None => Some(String::from_utf8_lossy(&bytes).into_owned()),
        };
        fields.push((name, value));
    }
    state.lock().unwrap().multipart_fields = fields.clone();

    if let Some(rejection) = write_rejection(&state) {
        return rejection;
    }
    if !fields.iter().any(|(name, _)| name == "image") {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "Image is required"}))).into_response();
    }

    let field = |key: &str| {
        fields
            .iter()
            .find(|(name, _)| name == key)
            .and_then(|(_, v)| v.clone())
            .unwrap_or_default()
    };
    let name = field("name");
    let serial = field("serial_number");

    let mut backend = state.lock().unwrap();
    backend.next_id += 1;
    let model_id = backend.next_id;
    backend.models.push(json!({
        "id": model_id,
        "name": name,
        "description": field("description"),
        "image_path": format!("{}.jpg", name),
    }));
    backend.next_id += 1;
    let camera_id = backend.next_id;
    backend
        .cameras
        .push(camera_json(camera_id, &name, &serial, 0.0, 0, "active"));

    Json(json!({
        "id": model_id,
        "name": name,
        "description": field("description"),
        "image_path": format!("{}.jpg", name),
    }))
    .into_response()
}

async fn feed_camera(
    State(state): Shared,
    Path(id): Path<i64>,
    uri: Uri,
    Json(body): Json<Value>,
) -> Response {
    record(&state, Method::POST, &uri);
    if let Some(rejection) = write_rejection(&state) {
        return rejection;
    }

    let mut backend = state.lock().unwrap();
    backend.bodies.push(body.clone());
    if backend.decline_feeds {
        return Json(json!({"success": false, "new_gb": 0.0, "new_ocorr": 0})).into_response();
    }
    let gb = body.get("gb").and_then(Value::as_f64).unwrap_or(0.0);
    let incidents = body.get("ocorr").and_then(Value::as_u64).unwrap_or(0);

    let Some(camera) = backend.cameras.iter_mut().find(|c| c["id"] == id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let new_gb = camera["image_storage_gb"].as_f64().unwrap_or(0.0) + gb;
    let new_incidents = camera["incidents_captured"].as_u64().unwrap_or(0) + incidents;
    camera["image_storage_gb"] = json!(new_gb);
    camera["incidents_captured"] = json!(new_incidents);

    Json(json!({"success": true, "new_gb": new_gb, "new_ocorr": new_incidents})).into_response()
}

async fn delete_camera(State(state): Shared, Path(id): Path<i64>, uri: Uri) -> Response {
    record(&state, Method::DELETE, &uri);
    if let Some(rejection) = write_rejection(&state) {
        return rejection;
    }
    let mut backend = state.lock().unwrap();
    let before = backend.cameras.len();
    backend.cameras.retain(|c| c["id"] != id);
    if backend.cameras.len() == before {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(json!({"success": true})).into_response()
}

async fn delete_model(State(state): Shared, Path(id): Path<i64>, uri: Uri) -> Response {
    record(&state, Method::DELETE, &uri);
    if let Some(rejection) = write_rejection(&state) {
        return rejection;
    }
    let mut backend = state.lock().unwrap();
    let Some(position) = backend.models.iter().position(|m| m["id"] == id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let model = backend.models.remove(position);
    backend.cameras.retain(|c| c["model"] != model["name"]);
    Json(json!({"success": true})).into_response()
}

/// Interaction that replays canned answers and records alerts
#[derive(Default)]
pub struct Scripted {
    pub confirms: VecDeque<bool>,
    pub answers: VecDeque<Option<String>>,
    pub alerts: Vec<String>,
    pub questions: Vec<String>,
}

impl Scripted {
    pub fn confirming(answer: bool) -> Self {
        Self {
            confirms: VecDeque::from([answer]),
            ..Self::default()
        }
    }

    pub fn answering(answers: &[Option<&str>]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.map(str::to_string)).collect(),
            ..Self::default()
        }
    }
}

impl Interaction for Scripted {
    fn confirm(&mut self, message: &str) -> bool {
        self.questions.push(message.to_string());
        self.confirms.pop_front().unwrap_or(false)
    }

    fn prompt(&mut self, message: &str) -> Option<String> {
        self.questions.push(message.to_string());
        self.answers.pop_front().flatten()
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}
