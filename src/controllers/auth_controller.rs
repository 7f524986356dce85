use axum::{
    extract::{Json, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::dto::auth_dto::LoginRequest;
use crate::repositories::admin_repository::AdminRepository;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Endpoint de login: valida credenciales y setea la cookie de sesión
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, AppError> {
    // Validar formato antes de consultar la base
    payload.validate()?;

    let repository = AdminRepository::new(state.pool.clone());
    let admin = repository.find_by_username(&payload.username).await?;

    let Some(admin) = admin else {
        return Err(AppError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    };

    let valid = bcrypt::verify(&payload.password, &admin.password_hash)
        .map_err(|e| AppError::Internal(format!("Error verifying credentials: {}", e)))?;

    if !valid {
        return Err(AppError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    let token = state.sessions.issue(&admin)?;
    log::info!("🔐 Login de administrador: {}", admin.username);

    Ok((
        [(header::SET_COOKIE, state.sessions.login_cookie(&token))],
        Json(json!({
            "success": true,
            "message": "Login successful"
        })),
    )
        .into_response())
}

/// Endpoint de logout: limpia la cookie de sesión. Siempre responde éxito.
pub async fn logout(State(state): State<AppState>) -> Response {
    (
        [(header::SET_COOKIE, state.sessions.logout_cookie())],
        Json(json!({ "success": true })),
    )
        .into_response()
}
