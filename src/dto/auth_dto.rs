//! DTOs de autenticación

use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

use crate::utils::validation::validate_length;

// Request de login de administrador
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    /// Validar el formato de las credenciales antes de consultar la base.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_length(&self.username, 3, 50) {
            errors.add("username", e);
        }
        if let Err(e) = validate_length(&self.password, 6, 100) {
            errors.add("password", e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

// Response de login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_validation() {
        let valid = LoginRequest {
            username: "admin".to_string(),
            password: "admin123".to_string(),
        };
        assert!(valid.validate().is_ok());

        let short_username = LoginRequest {
            username: "ab".to_string(),
            password: "admin123".to_string(),
        };
        assert!(short_username.validate().is_err());

        let short_password = LoginRequest {
            username: "admin".to_string(),
            password: "123".to_string(),
        };
        assert!(short_password.validate().is_err());
    }
}
