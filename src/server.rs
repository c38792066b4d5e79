use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::config::ServiceConfig;
use crate::data::{Catalog, GenerationParams, GenerationReport, GradeBand, SlotGrid, TeacherSummary};
use crate::error::ScheduleError;
use crate::manager::TimetableManager;

struct ServiceState {
    manager: TimetableManager,
    rng: StdRng,
}

/// Shared handle given to every handler; generation runs hold the lock end to end.
///
/// The lock is only taken inside blocking sections or for short reads, never
/// across an `.await`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Mutex<ServiceState>>,
}

impl AppState {
    fn lock(&self) -> Result<MutexGuard<'_, ServiceState>, ScheduleError> {
        self.inner
            .lock()
            .map_err(|_| ScheduleError::Unexpected("service state is poisoned".to_string()))
    }

    pub fn new(manager: TimetableManager, rng: StdRng) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ServiceState { manager, rng })),
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::new(TimetableManager::new(&config.output_dir), rng)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterTeacherRequest {
    pub name: String,
    /// Comma-separated, e.g. "Physics, Chemistry".
    pub subjects: String,
    pub grade_bands: Vec<GradeBand>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

pub enum AppError {
    NotFound(String),
    Schedule(ScheduleError),
}

impl From<ScheduleError> for AppError {
    fn from(e: ScheduleError) -> Self {
        AppError::Schedule(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::NotFound(what) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", format!("{what} not found"))
            }
            AppError::Schedule(e) if e.is_validation() => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
            }
            AppError::Schedule(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "GENERATION_ERROR", e.to_string())
            }
        };
        (status, Json(ErrorBody { code, message })).into_response()
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn catalog() -> Json<Catalog> {
    Json(Catalog::current())
}

async fn register_teacher(
    State(state): State<AppState>,
    Json(request): Json<RegisterTeacherRequest>,
) -> Result<(StatusCode, Json<TeacherSummary>), AppError> {
    let mut inner = state.lock()?;
    let summary = inner
        .manager
        .add_teacher(&request.name, &request.subjects, &request.grade_bands)?;
    Ok((StatusCode::CREATED, Json(summary)))
}

async fn list_teachers(
    State(state): State<AppState>,
) -> Result<Json<Vec<TeacherSummary>>, AppError> {
    Ok(Json(state.lock()?.manager.list_teachers()))
}

async fn generate_handler(
    State(state): State<AppState>,
    Json(params): Json<GenerationParams>,
) -> Result<Json<GenerationReport>, AppError> {
    // Generation and CSV export are CPU and file-system bound.
    let outcome = tokio::task::spawn_blocking(move || {
        let mut guard = state.lock()?;
        let ServiceState { manager, rng } = &mut *guard;
        manager.generate(&params, rng)
    })
    .await
    .map_err(|e| ScheduleError::Unexpected(format!("generation task failed: {e}")))?;

    match outcome {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            warn!("Generation failed: {e}");
            Err(e.into())
        }
    }
}

async fn list_classes(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    let inner = state.lock()?;
    Ok(Json(inner.manager.class_names().into_iter().map(String::from).collect()))
}

async fn class_timetable(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<SlotGrid>, AppError> {
    let inner = state.lock()?;
    inner
        .manager
        .class_timetable(&name)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Class {name}")))
}

async fn teacher_timetable(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<SlotGrid>, AppError> {
    let inner = state.lock()?;
    inner
        .manager
        .teacher_timetable(&name)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Teacher {name}")))
}

pub fn router(state: AppState) -> Router {
    let api_v1 = Router::new()
        .route("/catalog", get(catalog))
        .route("/teachers", post(register_teacher).get(list_teachers))
        .route("/timetables/generate", post(generate_handler))
        .route("/timetables/classes", get(list_classes))
        .route("/timetables/classes/:name", get(class_timetable))
        .route("/timetables/teachers/:name", get(teacher_timetable));

    Router::new()
        .route("/health", get(health))
        .nest("/v1", api_v1)
        .with_state(state)
}

pub async fn run_server(config: ServiceConfig) -> std::io::Result<()> {
    let app = router(AppState::from_config(&config));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(
        "Server running at http://{} (exports in {})",
        listener.local_addr()?,
        config.output_dir.display()
    );

    axum::serve(listener, app).await
}
