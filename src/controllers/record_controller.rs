use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::record_dto::{
    ApiResponse, ImageSearchResponse, ListQuery, RecordForm, RecordPageResponse, RecordResponse,
    SearchQuery, SearchResponse, UploadedImage,
};
use crate::repositories::record_repository::{RecordRepository, SearchField};
use crate::services::image_service::{ImageKind, ImagePipeline, MAX_SEARCH_IMAGE_SIZE};
use crate::services::recognition_service::RecognitionClient;
use crate::utils::errors::AppError;

pub struct RecordController {
    repository: RecordRepository,
}

impl RecordController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: RecordRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        form: RecordForm,
        image: Option<UploadedImage>,
        images: &ImagePipeline,
    ) -> Result<ApiResponse<RecordResponse>, AppError> {
        // Validar campos antes de cualquier mutación
        let draft = form.validate_create()?;

        let image =
            image.ok_or_else(|| AppError::BadRequest("Auto image is required".to_string()))?;

        // Verificar la matrícula antes de subir la imagen al storage
        if self
            .repository
            .vehicle_number_exists(&draft.vehicle_number, None)
            .await?
        {
            return Err(AppError::Conflict(
                "La matrícula ya está registrada en el sistema".to_string(),
            ));
        }

        let image_url = images.save(&image, ImageKind::Record).await?;
        let record = self.repository.create(&draft, &image_url).await?;

        Ok(ApiResponse::success_with_message(
            record.into(),
            "Registro creado exitosamente".to_string(),
        ))
    }

    pub async fn update(
        &self,
        id: Uuid,
        form: RecordForm,
        image: Option<UploadedImage>,
        images: &ImagePipeline,
    ) -> Result<ApiResponse<RecordResponse>, AppError> {
        let update = form.validate_update()?;

        let previous = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Registro no encontrado".to_string()))?;

        if let Some(vehicle_number) = &update.vehicle_number {
            if self
                .repository
                .vehicle_number_exists(vehicle_number, Some(id))
                .await?
            {
                return Err(AppError::Conflict(
                    "La matrícula ya está registrada en el sistema".to_string(),
                ));
            }
        }

        let image_url = match &image {
            Some(image) => Some(images.save(image, ImageKind::Record).await?),
            None => None,
        };

        let record = self
            .repository
            .update(id, &update, image_url.as_deref())
            .await?;

        // Limpieza best-effort de la imagen reemplazada
        if image_url.is_some() && previous.image_url != record.image_url {
            if let Err(e) = images.delete(&previous.image_url).await {
                log::warn!("⚠️ No se pudo eliminar la imagen reemplazada: {}", e);
            }
        }

        Ok(ApiResponse::success_with_message(
            record.into(),
            "Registro actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid, images: &ImagePipeline) -> Result<(), AppError> {
        let record = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Registro no encontrado".to_string()))?;

        self.repository.delete(id).await?;

        // Limpieza best-effort de la imagen asociada
        if let Err(e) = images.delete(&record.image_url).await {
            log::warn!("⚠️ No se pudo eliminar la imagen asociada: {}", e);
        }

        Ok(())
    }

    pub async fn list(&self, query: ListQuery) -> Result<RecordPageResponse, AppError> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(20).max(1);

        let (records, total) = self.repository.get_page(page, limit).await?;
        let total_pages = (total + limit - 1) / limit;

        Ok(RecordPageResponse {
            records: records.into_iter().map(RecordResponse::from).collect(),
            total,
            page,
            total_pages,
            limit,
        })
    }

    pub async fn search(&self, query: SearchQuery) -> Result<SearchResponse, AppError> {
        let q = query.q.unwrap_or_default();
        let q = q.trim();

        // Query vacía devuelve lista vacía sin tocar la base
        if q.is_empty() {
            return Ok(SearchResponse { records: vec![] });
        }

        let field = SearchField::from_param(
            query.search_type.as_deref().unwrap_or("vehicleNumber"),
        )
        .ok_or_else(|| {
            AppError::BadRequest(
                "Invalid search type. Expected 'vehicleNumber' or 'driverName'".to_string(),
            )
        })?;

        let records = self.repository.search(q, field).await?;

        Ok(SearchResponse {
            records: records.into_iter().map(RecordResponse::from).collect(),
        })
    }

    /// Composición de la búsqueda por imagen: reconocer la matrícula con el
    /// colaborador externo y buscar el registro canónico. Una matrícula
    /// reconocida sin registro almacenado es un 200 con lista vacía.
    pub async fn search_by_image(
        &self,
        image: Option<UploadedImage>,
        recognition: &RecognitionClient,
    ) -> Result<ImageSearchResponse, AppError> {
        let image =
            image.ok_or_else(|| AppError::BadRequest("No image file provided".to_string()))?;

        if image.bytes.len() > MAX_SEARCH_IMAGE_SIZE {
            return Err(AppError::BadRequest(
                "File size exceeds 10MB limit".to_string(),
            ));
        }

        let result = recognition
            .recognize(image.bytes, &image.file_name, &image.content_type)
            .await?;

        let matched = match result.vehicle_number.as_deref() {
            Some(plate) => self.repository.find_by_vehicle_number(plate).await?,
            None => None,
        };

        Ok(ImageSearchResponse {
            vehicle_number: result.vehicle_number,
            confidence: result.confidence,
            detection_box: result.detection_box,
            matched_records: matched.map(RecordResponse::from).into_iter().collect(),
        })
    }
}
