use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::state::AppState;
use crate::utils::errors::AppError;

/// Servir una imagen almacenada con cache headers de larga duración.
/// Las claves son inmutables (timestamp + nombre), así que la respuesta
/// puede cachearse indefinidamente.
pub async fn serve_image(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response, AppError> {
    let image = state
        .images
        .fetch(&key)
        .await?
        .ok_or_else(|| AppError::NotFound("Image not found".to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, image.content_type),
            (
                header::CACHE_CONTROL,
                "public, max-age=31536000, immutable".to_string(),
            ),
        ],
        image.bytes,
    )
        .into_response())
}
