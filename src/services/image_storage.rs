//! Almacenamiento de imágenes
//!
//! El colaborador de almacenamiento se expresa como el trait ImageStore:
//! store/delete/fetch por clave. Dos implementaciones: Cloudflare R2 via
//! la API S3, y disco local como fallback de desarrollo cuando R2 no está
//! configurado.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Builder as S3ConfigBuilder, Credentials};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use chrono::Utc;
use std::path::PathBuf;
use tokio::fs;

use crate::config::environment::R2Config;
use crate::utils::errors::AppError;

/// Imagen recuperada del almacenamiento
#[derive(Debug)]
pub struct StoredImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Capacidad de almacenamiento de imágenes
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Guardar los bytes y devolver la clave generada
    async fn store(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> Result<String, AppError>;

    /// Eliminar una imagen por clave
    async fn delete(&self, key: &str) -> Result<(), AppError>;

    /// Recuperar una imagen por clave; None si no existe
    async fn fetch(&self, key: &str) -> Result<Option<StoredImage>, AppError>;
}

/// Clave única: timestamp en milisegundos + nombre saneado
fn unique_key(file_name: &str) -> String {
    format!("{}-{}", Utc::now().timestamp_millis(), sanitize_file_name(file_name))
}

/// Sanear un nombre de archivo para prevenir path traversal
fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' => c,
            _ => '_',
        })
        .collect::<String>()
        .trim_start_matches('.')
        .to_string()
}

/// Content type por extensión, para imágenes servidas desde disco
fn content_type_for(key: &str) -> &'static str {
    let extension = key.rsplit('.').next().unwrap_or_default().to_lowercase();
    match extension.as_str() {
        "jpeg" | "jpg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Almacenamiento en Cloudflare R2 (API compatible con S3)
pub struct R2ImageStore {
    client: S3Client,
    bucket: String,
}

impl R2ImageStore {
    pub async fn new(config: &R2Config) -> Self {
        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new("auto"))
            .load()
            .await;

        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "r2-static",
        );

        let s3_config = S3ConfigBuilder::from(&aws_config)
            .endpoint_url(format!(
                "https://{}.r2.cloudflarestorage.com",
                config.account_id
            ))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        Self {
            client: S3Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
        }
    }
}

#[async_trait]
impl ImageStore for R2ImageStore {
    async fn store(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> Result<String, AppError> {
        let key = unique_key(file_name);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to upload image: {}", e)))?;

        log::info!("🖼️ Imagen subida a R2: {}", key);

        Ok(key)
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to delete image: {}", e)))?;

        Ok(())
    }

    async fn fetch(&self, key: &str) -> Result<Option<StoredImage>, AppError> {
        let response = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                if e.as_service_error()
                    .map(|se| se.is_no_such_key())
                    .unwrap_or(false)
                {
                    return Ok(None);
                }
                return Err(AppError::Internal(format!("Failed to fetch image: {}", e)));
            }
        };

        let content_type = response
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| content_type_for(key).to_string());

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to read image body: {}", e)))?
            .to_vec();

        Ok(Some(StoredImage { bytes, content_type }))
    }
}

/// Fallback de desarrollo: archivos en disco local
pub struct LocalImageStore {
    dir: PathBuf,
}

impl LocalImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn is_valid_key(key: &str) -> bool {
        !key.is_empty() && !key.contains('/') && !key.contains('\\') && !key.contains("..")
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        _content_type: &str,
    ) -> Result<String, AppError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create upload dir: {}", e)))?;

        let key = unique_key(file_name);
        fs::write(self.dir.join(&key), bytes)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to write image: {}", e)))?;

        Ok(key)
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        if !Self::is_valid_key(key) {
            return Ok(());
        }

        match fs::remove_file(self.dir.join(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Internal(format!("Failed to delete image: {}", e))),
        }
    }

    async fn fetch(&self, key: &str) -> Result<Option<StoredImage>, AppError> {
        if !Self::is_valid_key(key) {
            return Ok(None);
        }

        match fs::read(self.dir.join(key)).await {
            Ok(bytes) => Ok(Some(StoredImage {
                bytes,
                content_type: content_type_for(key).to_string(),
            })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Internal(format!("Failed to read image: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("photo.jpg"), "photo.jpg");
        assert_eq!(sanitize_file_name("my photo.jpg"), "my_photo.jpg");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_file_name("auto#1 (new).png"), "auto_1__new_.png");
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("123-a.jpg"), "image/jpeg");
        assert_eq!(content_type_for("123-a.JPEG"), "image/jpeg");
        assert_eq!(content_type_for("123-a.png"), "image/png");
        assert_eq!(content_type_for("123-a.webp"), "image/webp");
        assert_eq!(content_type_for("123-a"), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_local_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path());

        let key = store
            .store(vec![1, 2, 3], "auto.jpg", "image/jpeg")
            .await
            .unwrap();
        assert!(key.ends_with("auto.jpg"));

        let stored = store.fetch(&key).await.unwrap().unwrap();
        assert_eq!(stored.bytes, vec![1, 2, 3]);
        assert_eq!(stored.content_type, "image/jpeg");

        store.delete(&key).await.unwrap();
        assert!(store.fetch(&key).await.unwrap().is_none());

        // Un segundo delete de la misma clave no falla
        store.delete(&key).await.unwrap();
    }

    #[tokio::test]
    async fn test_local_store_rejects_traversal_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path());

        assert!(store.fetch("../secret").await.unwrap().is_none());
        assert!(store.fetch("a/b").await.unwrap().is_none());
        assert!(store.fetch("").await.unwrap().is_none());
    }
}
