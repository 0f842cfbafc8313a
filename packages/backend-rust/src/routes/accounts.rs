use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, is_valid_email, verify_password};
use crate::db::operations::{find_user_by_id, find_user_by_username, insert_user, NewUser, USER_TYPE_CHILD};
use crate::db::StoreError;
use crate::response::AppError;
use crate::routes::{parse_json, required};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/api/verify-student-access", post(verify_student_access))
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    first_name: Option<String>,
    last_name: Option<String>,
    username: Option<String>,
    password: Option<String>,
    user_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StudentAccessRequest {
    user_id: Option<String>,
    password: Option<String>,
}

#[derive(Serialize)]
struct RegisterResponse {
    message: &'static str,
    user_id: String,
    user_type: String,
}

#[derive(Serialize)]
struct LoginResponse {
    message: &'static str,
    user_id: String,
    user_type: String,
    first_name: String,
    last_name: String,
}

#[derive(Serialize)]
struct AccessResponse {
    success: bool,
    message: &'static str,
}

async fn register(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let payload: RegisterRequest = parse_json(&body)?;

    let (Some(first_name), Some(last_name), Some(username), Some(password)) = (
        required(payload.first_name),
        required(payload.last_name),
        required(payload.username),
        payload.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::validation("All fields are required"));
    };

    if !is_valid_email(&username) {
        return Err(AppError::validation("Invalid email format"));
    }

    let store = state.require_store()?;
    let password_hash = hash_password(&password, state.password_cost())
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "password hashing failed");
            AppError::internal("password hashing failed")
        })?;

    let new_user = NewUser {
        first_name,
        last_name,
        username,
        password_hash,
        user_type: required(payload.user_type).unwrap_or_else(|| USER_TYPE_CHILD.to_string()),
    };

    let user = match insert_user(&store, &new_user).await {
        Ok(user) => user,
        Err(StoreError::Conflict(_)) => return Err(AppError::conflict("Username already exists")),
        Err(err) => return Err(err.into()),
    };

    tracing::info!(user_id = %user.id, user_type = %user.user_type, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration successful",
            user_id: user.id,
            user_type: user.user_type,
        }),
    ))
}

async fn login(State(state): State<AppState>, body: Bytes) -> Result<impl IntoResponse, AppError> {
    let payload: LoginRequest = parse_json(&body)?;

    let (Some(username), Some(password)) = (
        required(payload.username),
        payload.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::validation("Username and password are required"));
    };

    let store = state.require_store()?;
    let Some(user) = find_user_by_username(&store, &username).await? else {
        return Err(AppError::unauthorized("Invalid credentials"));
    };

    if !check_password(&password, &user.password_hash).await? {
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    Ok(Json(LoginResponse {
        message: "Login successful",
        user_id: user.id,
        user_type: user.user_type,
        first_name: user.first_name,
        last_name: user.last_name,
    }))
}

/// Parent-side check before a child profile is opened
async fn verify_student_access(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let payload: StudentAccessRequest = parse_json(&body)?;

    let (Some(user_id), Some(password)) = (
        required(payload.user_id),
        payload.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::validation("User ID and password are required"));
    };

    let store = state.require_store()?;
    let Some(user) = find_user_by_id(&store, &user_id).await? else {
        return Err(AppError::not_found("Student not found"));
    };

    if !check_password(&password, &user.password_hash).await? {
        return Err(AppError::unauthorized("Incorrect password"));
    }

    Ok(Json(AccessResponse {
        success: true,
        message: "Access granted",
    }))
}

async fn check_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify_password(password, hash).await.map_err(|err| {
        tracing::error!(error = %err, "password verification failed");
        AppError::internal("password verification failed")
    })
}
