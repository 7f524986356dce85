use axum::{
    routing::{delete, post},
    Router,
};

use crate::controllers::auth_controller;
use crate::state::AppState;

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/", post(auth_controller::login))
        .route("/", delete(auth_controller::logout))
}
