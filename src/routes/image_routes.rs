use axum::{routing::get, Router};

use crate::controllers::image_controller;
use crate::state::AppState;

pub fn create_image_router() -> Router<AppState> {
    Router::new().route("/:key", get(image_controller::serve_image))
}
