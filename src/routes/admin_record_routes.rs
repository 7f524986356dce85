use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    middleware,
    routing::{delete, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::record_controller::RecordController;
use crate::dto::record_dto::{ApiResponse, RecordForm, RecordResponse};
use crate::middleware::auth::require_admin;
use crate::services::image_service::MAX_RECORD_IMAGE_SIZE;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_admin_record_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_record))
        .route("/:id", put(update_record))
        .route("/:id", delete(delete_record))
        // La autenticación se verifica antes de procesar cualquier body
        .route_layer(middleware::from_fn_with_state(state, require_admin))
        .layer(DefaultBodyLimit::max(MAX_RECORD_IMAGE_SIZE + 1024 * 1024))
}

async fn create_record(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<RecordResponse>>), AppError> {
    let (form, image) = RecordForm::from_multipart(multipart).await?;
    let controller = RecordController::new(state.pool.clone());
    let response = controller.create(form, image, &state.images).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<RecordResponse>>, AppError> {
    let (form, image) = RecordForm::from_multipart(multipart).await?;
    let controller = RecordController::new(state.pool.clone());
    let response = controller.update(id, form, image, &state.images).await?;
    Ok(Json(response))
}

async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = RecordController::new(state.pool.clone());
    controller.delete(id, &state.images).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Registro eliminado exitosamente"
    })))
}
