//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;

/// Configuración de Cloudflare R2 (API compatible con S3)
#[derive(Debug, Clone)]
pub struct R2Config {
    pub account_id: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub ai_service_url: String,
    pub admin_username: String,
    pub admin_password: String,
    pub upload_dir: String,
    pub r2: Option<R2Config>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        // R2 solo queda configurado si las tres credenciales están presentes
        let r2 = match (
            env::var("R2_ACCOUNT_ID"),
            env::var("R2_ACCESS_KEY_ID"),
            env::var("R2_SECRET_ACCESS_KEY"),
        ) {
            (Ok(account_id), Ok(access_key_id), Ok(secret_access_key)) => Some(R2Config {
                account_id,
                access_key_id,
                secret_access_key,
                bucket: env::var("R2_BUCKET_NAME")
                    .unwrap_or_else(|_| "registry-images".to_string()),
            }),
            _ => None,
        };

        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            session_secret: env::var("SESSION_SECRET")
                .unwrap_or_else(|_| "your-super-secret-session-key-change-in-production".to_string()),
            session_ttl_hours: env::var("SESSION_TTL_HOURS")
                .unwrap_or_else(|_| "168".to_string())
                .parse()
                .expect("SESSION_TTL_HOURS must be a valid number"),
            ai_service_url: env::var("AI_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            admin_username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string()),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            r2,
        }
    }
}

impl EnvironmentConfig {
    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
