//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. Los colaboradores (sesiones, imágenes,
//! reconocimiento) se construyen explícitamente y se inyectan aquí para
//! que los handlers sean testeables con fakes.

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::services::image_service::ImagePipeline;
use crate::services::image_storage::ImageStore;
use crate::services::recognition_service::RecognitionClient;
use crate::services::session_service::SessionService;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub sessions: Arc<SessionService>,
    pub images: Arc<ImagePipeline>,
    pub recognition: Arc<RecognitionClient>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig, store: Arc<dyn ImageStore>) -> Self {
        let sessions = Arc::new(SessionService::new(
            &config.session_secret,
            config.session_ttl_hours,
            config.is_production(),
        ));
        let images = Arc::new(ImagePipeline::new(store));
        let recognition = Arc::new(RecognitionClient::new(config.ai_service_url.clone()));

        Self {
            pool,
            config,
            sessions,
            images,
            recognition,
        }
    }
}
