//! Cliente del servicio de reconocimiento de matrículas
//!
//! Reenvía los bytes de la imagen al servicio de IA externo y devuelve
//! la matrícula reconocida con su confianza. Si el servicio no responde
//! o devuelve un estado de error, se reporta ServiceUnavailable; no hay
//! retries ni cache de resultados.

use serde::Deserialize;

use crate::utils::errors::AppError;

/// Resultado del reconocimiento
#[derive(Debug, Clone, Deserialize)]
pub struct PlateRecognition {
    #[serde(rename = "vehicle_number", default)]
    pub vehicle_number: Option<String>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(rename = "detection_box", default)]
    pub detection_box: Option<[f64; 4]>,
}

pub struct RecognitionClient {
    base_url: String,
    client: reqwest::Client,
}

impl RecognitionClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { base_url, client }
    }

    /// Enviar la imagen al servicio de IA y obtener la matrícula detectada
    pub async fn recognize(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> Result<PlateRecognition, AppError> {
        let url = format!("{}/process-image", self.base_url);
        log::info!("🤖 Enviando imagen al servicio de reconocimiento: {}", url);

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| AppError::BadRequest(format!("Invalid content type: {}", e)))?;

        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                log::error!("❌ Servicio de reconocimiento inaccesible: {}", e);
                AppError::ServiceUnavailable(
                    "AI service unavailable. Please ensure the recognition service is running."
                        .to_string(),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            log::error!("❌ Servicio de reconocimiento respondió {}", status);
            return Err(AppError::ServiceUnavailable(format!(
                "AI service failed to process image (status {})",
                status
            )));
        }

        let recognition = response.json::<PlateRecognition>().await.map_err(|e| {
            log::error!("❌ Respuesta de reconocimiento inválida: {}", e);
            AppError::ServiceUnavailable(format!("Invalid recognition response: {}", e))
        })?;

        log::info!(
            "✅ Matrícula reconocida: {:?} (confianza {:.2})",
            recognition.vehicle_number,
            recognition.confidence
        );

        Ok(recognition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_successful_recognition() {
        // El servicio devuelve snake_case más un duplicado camelCase legacy
        let body = r#"{
            "vehicle_number": "KA01AB1234",
            "vehicleNumber": "KA01AB1234",
            "confidence": 0.92,
            "status": "matched",
            "detection_box": [10.0, 20.0, 110.0, 60.0],
            "debug": {}
        }"#;

        let recognition: PlateRecognition = serde_json::from_str(body).unwrap();
        assert_eq!(recognition.vehicle_number.as_deref(), Some("KA01AB1234"));
        assert!((recognition.confidence - 0.92).abs() < f64::EPSILON);
        assert_eq!(
            recognition.detection_box,
            Some([10.0, 20.0, 110.0, 60.0])
        );
    }

    #[test]
    fn test_deserialize_not_found_recognition() {
        let body = r#"{
            "vehicle_number": null,
            "vehicleNumber": null,
            "confidence": 0.0,
            "status": "not_found",
            "error": "No vehicle/plate detected"
        }"#;

        let recognition: PlateRecognition = serde_json::from_str(body).unwrap();
        assert!(recognition.vehicle_number.is_none());
        assert_eq!(recognition.confidence, 0.0);
        assert!(recognition.detection_box.is_none());
    }

    #[test]
    fn test_deserialize_error_payload() {
        // El servicio responde 200 con {error, status} ante fallos internos
        let body = r#"{ "error": "boom", "status": "error" }"#;

        let recognition: PlateRecognition = serde_json::from_str(body).unwrap();
        assert!(recognition.vehicle_number.is_none());
        assert_eq!(recognition.confidence, 0.0);
    }
}
