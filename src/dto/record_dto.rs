//! DTOs de registros
//!
//! Los handlers no hacen coerción ad-hoc de campos: el formulario multipart
//! se recolecta en RecordForm y la validación produce un draft tipado
//! (RecordDraft / RecordUpdate) o una lista de errores por campo.

use axum::extract::Multipart;
use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

use crate::models::record::{DriverRecord, RecordStatus};
use crate::utils::errors::AppError;
use crate::utils::plate;
use crate::utils::validation::{validate_length, validate_not_empty};

/// Imagen subida via multipart
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

impl UploadedImage {
    /// Extraer el único archivo de un body multipart (campo "file" o "image").
    /// Los campos de texto se ignoran.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Option<Self>, AppError> {
        let mut image = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name != "file" && name != "image" {
                continue;
            }

            let file_name = field.file_name().unwrap_or("upload").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;

            // Un input de archivo vacío llega como part de cero bytes
            if !bytes.is_empty() {
                image = Some(UploadedImage {
                    bytes: bytes.to_vec(),
                    file_name,
                    content_type,
                });
            }
        }

        Ok(image)
    }
}

/// Campos crudos del formulario de registro, tal como llegan del multipart
#[derive(Debug, Default)]
pub struct RecordForm {
    pub driver_name: Option<String>,
    pub vehicle_number: Option<String>,
    pub license_number: Option<String>,
    pub driver_address: Option<String>,
    pub driver_phone: Option<String>,
    pub blood_group: Option<String>,
    pub emergency_contact: Option<String>,
    pub status: Option<String>,
}

impl RecordForm {
    /// Recolectar los campos del formulario y la imagen (si viene) de un
    /// body multipart. Campos desconocidos se ignoran.
    pub async fn from_multipart(
        mut multipart: Multipart,
    ) -> Result<(Self, Option<UploadedImage>), AppError> {
        let mut form = RecordForm::default();
        let mut image = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if name == "image" {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;

                if !bytes.is_empty() {
                    image = Some(UploadedImage {
                        bytes: bytes.to_vec(),
                        file_name,
                        content_type,
                    });
                }
                continue;
            }

            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(format!("Invalid form field '{}': {}", name, e)))?;

            match name.as_str() {
                "driverName" => form.driver_name = Some(value),
                "vehicleNumber" => form.vehicle_number = Some(value),
                "licenseNumber" => form.license_number = Some(value),
                "driverAddress" => form.driver_address = Some(value),
                "driverPhone" => form.driver_phone = Some(value),
                "bloodGroup" => form.blood_group = Some(value),
                "emergencyContact" => form.emergency_contact = Some(value),
                "status" => form.status = Some(value),
                _ => {}
            }
        }

        Ok((form, image))
    }

    /// Validar el formulario completo para creación. La matrícula se
    /// canonicaliza; el estado ausente queda en Active. Sin efectos
    /// secundarios: nunca toca la base de datos.
    pub fn validate_create(self) -> Result<RecordDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let driver_name = required_field(&mut errors, "driverName", self.driver_name, 100);
        let vehicle_number = required_field(&mut errors, "vehicleNumber", self.vehicle_number, 20);
        let license_number = required_field(&mut errors, "licenseNumber", self.license_number, 50);
        let driver_address = required_field(&mut errors, "driverAddress", self.driver_address, 500);
        let driver_phone = required_field(&mut errors, "driverPhone", self.driver_phone, 20);

        let status = parse_status(&mut errors, self.status).unwrap_or_default();

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(RecordDraft {
            driver_name: driver_name.unwrap_or_default(),
            vehicle_number: plate::normalize(&vehicle_number.unwrap_or_default()),
            license_number: license_number.unwrap_or_default(),
            driver_address: driver_address.unwrap_or_default(),
            driver_phone: driver_phone.unwrap_or_default(),
            blood_group: optional_field(self.blood_group),
            emergency_contact: optional_field(self.emergency_contact),
            status,
        })
    }

    /// Validar el formulario para actualización parcial: solo se validan
    /// los campos presentes; los ausentes quedan sin cambios.
    pub fn validate_update(self) -> Result<RecordUpdate, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let driver_name = provided_field(&mut errors, "driverName", self.driver_name, 100);
        let vehicle_number = provided_field(&mut errors, "vehicleNumber", self.vehicle_number, 20);
        let license_number = provided_field(&mut errors, "licenseNumber", self.license_number, 50);
        let driver_address = provided_field(&mut errors, "driverAddress", self.driver_address, 500);
        let driver_phone = provided_field(&mut errors, "driverPhone", self.driver_phone, 20);

        let status = parse_status(&mut errors, self.status);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(RecordUpdate {
            driver_name,
            vehicle_number: vehicle_number.map(|v| plate::normalize(&v)),
            license_number,
            driver_address,
            driver_phone,
            blood_group: self.blood_group.map(|v| optional_field(Some(v))),
            emergency_contact: self.emergency_contact.map(|v| optional_field(Some(v))),
            status,
        })
    }
}

/// Draft completamente tipado para creación
#[derive(Debug, Clone)]
pub struct RecordDraft {
    pub driver_name: String,
    pub vehicle_number: String,
    pub license_number: String,
    pub driver_address: String,
    pub driver_phone: String,
    pub blood_group: Option<String>,
    pub emergency_contact: Option<String>,
    pub status: RecordStatus,
}

/// Campos a mergear en una actualización parcial.
/// Para los opcionales, Some(None) significa "borrar el valor".
#[derive(Debug, Clone, Default)]
pub struct RecordUpdate {
    pub driver_name: Option<String>,
    pub vehicle_number: Option<String>,
    pub license_number: Option<String>,
    pub driver_address: Option<String>,
    pub driver_phone: Option<String>,
    pub blood_group: Option<Option<String>>,
    pub emergency_contact: Option<Option<String>>,
    pub status: Option<RecordStatus>,
}

fn required_field(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<String>,
    max: usize,
) -> Option<String> {
    let value = value.unwrap_or_default();
    if let Err(e) = validate_not_empty(&value) {
        errors.add(field, e);
        return None;
    }
    if let Err(e) = validate_length(&value, 1, max) {
        errors.add(field, e);
        return None;
    }
    Some(value.trim().to_string())
}

fn provided_field(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<String>,
    max: usize,
) -> Option<String> {
    let value = value?;
    if let Err(e) = validate_not_empty(&value) {
        errors.add(field, e);
        return None;
    }
    if let Err(e) = validate_length(&value, 1, max) {
        errors.add(field, e);
        return None;
    }
    Some(value.trim().to_string())
}

fn optional_field(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_status(errors: &mut ValidationErrors, value: Option<String>) -> Option<RecordStatus> {
    match value.as_deref() {
        None | Some("") => None,
        Some(raw) => match RecordStatus::from_str(raw) {
            Some(status) => Some(status),
            None => {
                let mut error = validator::ValidationError::new("enum");
                error.add_param("value".into(), &raw.to_string());
                error.add_param(
                    "allowed_values".into(),
                    &format!("{:?}", RecordStatus::ALLOWED),
                );
                errors.add("status", error);
                None
            }
        },
    }
}

/// Response de registro para la API
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    pub id: String,
    pub driver_name: String,
    pub vehicle_number: String,
    pub vehicle_number_display: String,
    pub license_number: String,
    pub driver_address: String,
    pub driver_phone: String,
    pub blood_group: Option<String>,
    pub emergency_contact: Option<String>,
    pub status: String,
    pub image_url: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<DriverRecord> for RecordResponse {
    fn from(record: DriverRecord) -> Self {
        let display = plate::format_display(&record.vehicle_number);
        Self {
            id: record.id.to_string(),
            driver_name: record.driver_name,
            vehicle_number: record.vehicle_number,
            vehicle_number_display: display,
            license_number: record.license_number,
            driver_address: record.driver_address,
            driver_phone: record.driver_phone,
            blood_group: record.blood_group,
            emergency_contact: record.emergency_contact,
            status: record.status,
            image_url: record.image_url,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

/// Response paginada de listado
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPageResponse {
    pub records: Vec<RecordResponse>,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
    pub limit: i64,
}

/// Response de búsqueda
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub records: Vec<RecordResponse>,
}

/// Response de búsqueda por imagen
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSearchResponse {
    pub vehicle_number: Option<String>,
    pub confidence: f64,
    pub detection_box: Option<[f64; 4]>,
    pub matched_records: Vec<RecordResponse>,
}

/// Query params de listado
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Query params de búsqueda
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub search_type: Option<String>,
}

/// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_form() -> RecordForm {
        RecordForm {
            driver_name: Some("Ravi Kumar".to_string()),
            vehicle_number: Some("ka 01 ab 1234".to_string()),
            license_number: Some("DL123".to_string()),
            driver_address: Some("X".to_string()),
            driver_phone: Some("999".to_string()),
            blood_group: None,
            emergency_contact: None,
            status: None,
        }
    }

    #[test]
    fn test_validate_create_canonicalizes_and_defaults_status() {
        let draft = full_form().validate_create().unwrap();
        assert_eq!(draft.vehicle_number, "KA01AB1234");
        assert_eq!(draft.status, RecordStatus::Active);
        assert_eq!(draft.driver_name, "Ravi Kumar");
    }

    #[test]
    fn test_validate_create_reports_missing_fields() {
        let form = RecordForm {
            driver_name: Some("".to_string()),
            vehicle_number: None,
            ..Default::default()
        };
        let errors = form.validate_create().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("driverName"));
        assert!(fields.contains_key("vehicleNumber"));
        assert!(fields.contains_key("licenseNumber"));
        assert!(fields.contains_key("driverAddress"));
        assert!(fields.contains_key("driverPhone"));
    }

    #[test]
    fn test_validate_create_rejects_unknown_status() {
        let mut form = full_form();
        form.status = Some("Retired".to_string());
        let errors = form.validate_create().unwrap_err();
        assert!(errors.field_errors().contains_key("status"));
    }

    #[test]
    fn test_validate_create_accepts_enumerated_status() {
        let mut form = full_form();
        form.status = Some("Suspended".to_string());
        let draft = form.validate_create().unwrap();
        assert_eq!(draft.status, RecordStatus::Suspended);
    }

    #[test]
    fn test_validate_update_only_touches_provided_fields() {
        let form = RecordForm {
            status: Some("Suspended".to_string()),
            ..Default::default()
        };
        let update = form.validate_update().unwrap();
        assert_eq!(update.status, Some(RecordStatus::Suspended));
        assert!(update.driver_name.is_none());
        assert!(update.vehicle_number.is_none());
    }

    #[test]
    fn test_validate_update_normalizes_vehicle_number() {
        let form = RecordForm {
            vehicle_number: Some("mh 12 z 0001".to_string()),
            ..Default::default()
        };
        let update = form.validate_update().unwrap();
        assert_eq!(update.vehicle_number.as_deref(), Some("MH12Z0001"));
    }

    #[test]
    fn test_validate_update_rejects_empty_required_field() {
        let form = RecordForm {
            driver_name: Some("   ".to_string()),
            ..Default::default()
        };
        let errors = form.validate_update().unwrap_err();
        assert!(errors.field_errors().contains_key("driverName"));
    }

    #[test]
    fn test_validate_update_clears_optional_field_on_empty_value() {
        let form = RecordForm {
            blood_group: Some("".to_string()),
            ..Default::default()
        };
        let update = form.validate_update().unwrap();
        assert_eq!(update.blood_group, Some(None));
    }
}
