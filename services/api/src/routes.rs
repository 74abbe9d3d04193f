//! API service routes

use axum::{
    Extension, Json, Router, async_trait,
    extract::{FromRequest, Path, Request, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::{
    error::{ApiError, ApiResult},
    middleware::{AuthUser, auth_middleware},
    models::{
        AuthResponse, LoginRequest, MessageResponse, RefreshTokenRequest, RefreshTokenResponse,
        RegisterRequest, TaskListResponse, TaskMessageResponse, TaskRequest, TaskResponse,
    },
    state::AppState,
    tasks::parse_task_id,
};

/// JSON body extractor whose rejection is a 400 `{message}` like every other
/// client error
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!("Rejected request body: {}", rejection.body_text());
                Err(ApiError::Validation("Invalid request body".to_string()))
            }
        }
    }
}

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/tasks", post(create_task).get(get_tasks))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh_token))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}

/// User registration endpoint
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let session = state.auth_service.register(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully",
            session,
        }),
    ))
}

/// User login endpoint
///
/// Any body that cannot be read as credentials is treated as bad credentials.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<JsonBody<LoginRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let payload = payload.map(|JsonBody(p)| p).unwrap_or_default();
    let session = state.auth_service.login(payload).await?;

    Ok(Json(AuthResponse {
        message: "Login successful",
        session,
    }))
}

/// Refresh token endpoint
pub async fn refresh_token(
    State(state): State<AppState>,
    payload: Result<JsonBody<RefreshTokenRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let token = payload
        .ok()
        .and_then(|JsonBody(p)| p.refresh_token)
        .unwrap_or_default();
    let tokens = state.auth_service.refresh(&token).await?;

    Ok(Json(RefreshTokenResponse {
        message: "Token refreshed successfully",
        tokens,
    }))
}

pub async fn create_task(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(payload): JsonBody<TaskRequest>,
) -> ApiResult<impl IntoResponse> {
    let task = state.task_service.create(payload, user.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(TaskMessageResponse {
            message: "Task created successfully",
            task,
        }),
    ))
}

pub async fn get_tasks(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let tasks = state.task_service.list(user.id).await?;

    Ok(Json(TaskListResponse { tasks }))
}

pub async fn get_task(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let task = state
        .task_service
        .get_one(parse_task_id(&id)?, user.id)
        .await?;

    Ok(Json(TaskResponse { task }))
}

pub async fn update_task(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<TaskRequest>,
) -> ApiResult<impl IntoResponse> {
    let task_id = parse_task_id(&id)?;
    let task = state
        .task_service
        .update(task_id, user.id, payload)
        .await?;

    Ok(Json(TaskMessageResponse {
        message: "Task updated successfully",
        task,
    }))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state
        .task_service
        .delete(parse_task_id(&id)?, user.id)
        .await?;

    Ok(Json(MessageResponse {
        message: "Task deleted successfully",
    }))
}
