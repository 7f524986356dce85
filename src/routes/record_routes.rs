use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    routing::{get, post},
    Json, Router,
};

use crate::controllers::record_controller::RecordController;
use crate::dto::record_dto::{
    ImageSearchResponse, ListQuery, RecordPageResponse, SearchQuery, SearchResponse, UploadedImage,
};
use crate::services::image_service::MAX_SEARCH_IMAGE_SIZE;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_record_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_records))
        .route("/search", get(search_records))
        .route("/search-by-image", post(search_by_image))
        // Margen sobre el techo de 10MB para el overhead del multipart
        .layer(DefaultBodyLimit::max(MAX_SEARCH_IMAGE_SIZE + 1024 * 1024))
}

async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<RecordPageResponse>, AppError> {
    let controller = RecordController::new(state.pool.clone());
    let response = controller.list(query).await?;
    Ok(Json(response))
}

async fn search_records(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    let controller = RecordController::new(state.pool.clone());
    let response = controller.search(query).await?;
    Ok(Json(response))
}

async fn search_by_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ImageSearchResponse>, AppError> {
    let image = UploadedImage::from_multipart(multipart).await?;
    let controller = RecordController::new(state.pool.clone());
    let response = controller
        .search_by_image(image, &state.recognition)
        .await?;
    Ok(Json(response))
}
