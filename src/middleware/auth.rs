//! Middleware de autenticación de administrador
//!
//! Verifica la cookie de sesión firmada antes de dejar pasar el request.
//! El rechazo ocurre antes de cualquier mutación.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::services::session_service::extract_session_token;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Exigir una sesión de administrador válida
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_session_token(request.headers()).ok_or_else(|| {
        AppError::Unauthorized("Unauthorized. Please login as admin.".to_string())
    })?;

    state.sessions.verify(&token)?;

    Ok(next.run(request).await)
}
