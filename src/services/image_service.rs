//! Pipeline de imágenes
//!
//! Valida content-type y tamaño contra la allow-list y delega el
//! almacenamiento al colaborador ImageStore. Sin estado propio y sin
//! retries: un fallo del almacenamiento se propaga tal cual.

use std::sync::Arc;

use crate::dto::record_dto::UploadedImage;
use crate::services::image_storage::{ImageStore, StoredImage};
use crate::utils::errors::AppError;

pub const ALLOWED_IMAGE_TYPES: [&str; 4] =
    ["image/jpeg", "image/jpg", "image/png", "image/webp"];

pub const MAX_RECORD_IMAGE_SIZE: usize = 10 * 1024 * 1024; // 10MB
pub const MAX_SEARCH_IMAGE_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Tipo de subida, con techo de tamaño propio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Record,
    Search,
}

impl ImageKind {
    pub fn max_size(&self) -> usize {
        match self {
            ImageKind::Record => MAX_RECORD_IMAGE_SIZE,
            ImageKind::Search => MAX_SEARCH_IMAGE_SIZE,
        }
    }
}

/// Validar content-type y tamaño de una imagen subida
pub fn validate_image(
    content_type: &str,
    size: usize,
    kind: ImageKind,
) -> Result<(), AppError> {
    if !ALLOWED_IMAGE_TYPES.contains(&content_type.to_lowercase().as_str()) {
        return Err(AppError::BadRequest(format!(
            "Invalid image type. Allowed types: {}",
            ALLOWED_IMAGE_TYPES.join(", ")
        )));
    }

    let max_size = kind.max_size();
    if size > max_size {
        return Err(AppError::BadRequest(format!(
            "Image size exceeds maximum allowed size of {}MB",
            max_size / (1024 * 1024)
        )));
    }

    Ok(())
}

/// Pipeline de imágenes sobre un ImageStore inyectado
pub struct ImagePipeline {
    store: Arc<dyn ImageStore>,
}

impl ImagePipeline {
    pub fn new(store: Arc<dyn ImageStore>) -> Self {
        Self { store }
    }

    /// Validar y almacenar; devuelve la referencia pública de la imagen
    pub async fn save(&self, image: &UploadedImage, kind: ImageKind) -> Result<String, AppError> {
        validate_image(&image.content_type, image.bytes.len(), kind)?;

        let key = self
            .store
            .store(image.bytes.clone(), &image.file_name, &image.content_type)
            .await?;

        Ok(format!("/images/{}", key))
    }

    /// Recuperar una imagen almacenada por clave
    pub async fn fetch(&self, key: &str) -> Result<Option<StoredImage>, AppError> {
        self.store.fetch(key).await
    }

    /// Eliminar una imagen por su referencia pública
    pub async fn delete(&self, reference: &str) -> Result<(), AppError> {
        let key = reference.rsplit('/').next().unwrap_or_default();
        if key.is_empty() {
            return Ok(());
        }
        self.store.delete(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_image_accepts_allowed_types() {
        for content_type in ALLOWED_IMAGE_TYPES {
            assert!(validate_image(content_type, 1024, ImageKind::Record).is_ok());
        }
        // Case-insensitive
        assert!(validate_image("IMAGE/JPEG", 1024, ImageKind::Search).is_ok());
    }

    #[test]
    fn test_validate_image_rejects_unknown_types() {
        assert!(validate_image("image/gif", 1024, ImageKind::Record).is_err());
        assert!(validate_image("application/pdf", 1024, ImageKind::Record).is_err());
        assert!(validate_image("", 1024, ImageKind::Search).is_err());
    }

    #[test]
    fn test_validate_image_enforces_size_ceiling() {
        assert!(validate_image("image/png", MAX_RECORD_IMAGE_SIZE, ImageKind::Record).is_ok());
        assert!(
            validate_image("image/png", MAX_RECORD_IMAGE_SIZE + 1, ImageKind::Record).is_err()
        );
        assert!(
            validate_image("image/png", MAX_SEARCH_IMAGE_SIZE + 1, ImageKind::Search).is_err()
        );
    }
}
