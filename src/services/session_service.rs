//! Servicio de sesiones de administrador
//!
//! La sesión viaja como un token HS256 firmado dentro de una cookie
//! http-only. Un único secreto de proceso valida todas las sesiones;
//! no hay tabla de sesiones en el servidor.

use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::admin::Admin;
use crate::utils::errors::AppError;

/// Nombre de la cookie de sesión
pub const SESSION_COOKIE: &str = "admin_session";

/// Claims de la sesión
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

/// Servicio de sesiones - capacidad de autenticación inyectable.
/// Los handlers se testean contra este servicio sin cookie store real.
pub struct SessionService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
    secure_cookies: bool,
}

impl SessionService {
    pub fn new(secret: &str, ttl_hours: i64, secure_cookies: bool) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
            algorithm: Algorithm::HS256,
            ttl: Duration::hours(ttl_hours),
            secure_cookies,
        }
    }

    /// Emitir un token de sesión firmado para un administrador
    pub fn issue(&self, admin: &Admin) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: admin.id.to_string(),
            username: admin.username.clone(),
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Error generating session token: {}", e)))
    }

    /// Validar y decodificar un token de sesión
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AppError> {
        let validation = Validation::new(self.algorithm);

        decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized("Invalid or expired session".to_string()))
    }

    /// Cookie de login: http-only, misma duración que el token
    pub fn login_cookie(&self, token: &str) -> String {
        format!(
            "{}={}; HttpOnly; Path=/; SameSite=Strict; Max-Age={}{}",
            SESSION_COOKIE,
            token,
            self.ttl.num_seconds(),
            if self.secure_cookies { "; Secure" } else { "" }
        )
    }

    /// Cookie de logout: expira inmediatamente
    pub fn logout_cookie(&self) -> String {
        format!(
            "{}=; HttpOnly; Path=/; SameSite=Strict; Max-Age=0",
            SESSION_COOKIE
        )
    }
}

/// Extraer el token de sesión del header Cookie del request
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let cookie_header = headers
        .get(axum::http::header::COOKIE)?
        .to_str()
        .ok()?;

    for pair in cookie_header.split(';') {
        if let Some((name, value)) = pair.trim().split_once('=') {
            if name == SESSION_COOKIE {
                return Some(value.to_string());
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn test_admin() -> Admin {
        Admin {
            id: Uuid::new_v4(),
            username: "admin".to_string(),
            password_hash: "$2b$10$irrelevant".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let service = SessionService::new("test-secret", 1, false);
        let admin = test_admin();

        let token = service.issue(&admin).unwrap();
        assert!(!token.is_empty());

        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.sub, admin.id.to_string());
        assert_eq!(claims.username, "admin");
    }

    #[test]
    fn test_verify_rejects_garbage_token() {
        let service = SessionService::new("test-secret", 1, false);
        assert!(service.verify("not-a-token").is_err());
    }

    #[test]
    fn test_verify_rejects_token_from_other_secret() {
        let issuer = SessionService::new("secret-a", 1, false);
        let verifier = SessionService::new("secret-b", 1, false);

        let token = issuer.issue(&test_admin()).unwrap();
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        // TTL negativo produce un token ya expirado
        let service = SessionService::new("test-secret", -2, false);
        let token = service.issue(&test_admin()).unwrap();
        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn test_extract_session_token_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            "theme=dark; admin_session=abc.def.ghi; lang=es".parse().unwrap(),
        );
        assert_eq!(
            extract_session_token(&headers),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn test_extract_session_token_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(axum::http::header::COOKIE, "theme=dark".parse().unwrap());
        assert_eq!(extract_session_token(&headers), None);

        assert_eq!(extract_session_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_cookie_attributes() {
        let service = SessionService::new("test-secret", 168, true);
        let cookie = service.login_cookie("tok");
        assert!(cookie.starts_with("admin_session=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(cookie.contains("Secure"));

        let logout = service.logout_cookie();
        assert!(logout.contains("Max-Age=0"));
    }
}
