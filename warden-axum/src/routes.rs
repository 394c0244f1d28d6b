use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use warden::{RepositoryProvider, UserId, Warden};

use crate::{
    error::{ApiError, Result},
    types::*,
};

pub struct AppState<R: RepositoryProvider> {
    pub warden: Arc<Warden<R>>,
}

impl<R: RepositoryProvider> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            warden: self.warden.clone(),
        }
    }
}

pub fn create_router<R>(warden: Arc<Warden<R>>) -> Router
where
    R: RepositoryProvider + 'static,
{
    let state = AppState { warden };

    Router::new()
        .route("/health", get(health_handler))
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .route("/users/{id}/admin", get(is_admin_handler))
        .route("/verification", post(create_verification_handler))
        .route("/verification/verify", post(verify_mail_handler))
        .route("/password/reset", post(reset_password_handler))
        .with_state(state)
}

fn require(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ApiError::Missing { field });
    }
    Ok(())
}

async fn health_handler<R>(State(state): State<AppState<R>>) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    state.warden.health_check().await?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

async fn register_handler<R>(
    State(state): State<AppState<R>>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    require("email", &request.email)?;
    require("password", &request.password)?;

    let user_id = state
        .warden
        .register(&request.email, &request.password)
        .await?;

    Ok((StatusCode::CREATED, Json(UserIdResponse { user_id })))
}

async fn login_handler<R>(
    State(state): State<AppState<R>>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    require("email", &request.email)?;
    require("password", &request.password)?;
    if request.app_id == 0 {
        return Err(ApiError::Missing { field: "app_id" });
    }

    let token = state
        .warden
        .login(&request.email, &request.password, request.app_id)
        .await?;

    Ok(Json(TokenResponse { token }))
}

async fn is_admin_handler<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let user_id: UserId = id
        .parse()
        .map_err(|_| ApiError::Invalid { field: "user_id" })?;
    if user_id == 0 {
        return Err(ApiError::Missing { field: "user_id" });
    }

    let is_admin = state.warden.is_admin(user_id).await?;

    Ok(Json(IsAdminResponse { is_admin }))
}

async fn create_verification_handler<R>(
    State(state): State<AppState<R>>,
    Json(request): Json<CreateVerificationRequest>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    require("email", &request.email)?;

    state.warden.create_verification(&request.email).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse {
            message: "Verification code sent".to_string(),
        }),
    ))
}

async fn verify_mail_handler<R>(
    State(state): State<AppState<R>>,
    Json(request): Json<VerifyMailRequest>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    require("email", &request.email)?;
    require("code", &request.code)?;

    let user_id = state
        .warden
        .verify_mail(&request.email, &request.code)
        .await?;

    Ok(Json(UserIdResponse { user_id }))
}

async fn reset_password_handler<R>(
    State(state): State<AppState<R>>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    require("email", &request.email)?;
    require("code", &request.code)?;
    require("new_password", &request.new_password)?;

    let user_id = state
        .warden
        .reset_password(&request.email, &request.code, &request.new_password)
        .await?;

    Ok(Json(UserIdResponse { user_id }))
}
