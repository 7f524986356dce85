//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de campos
//! de formularios antes de tocar la base de datos.

use validator::ValidationError;

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar longitud mínima y máxima
pub fn validate_length(value: &str, min: usize, max: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min || len > max {
        let mut error = ValidationError::new("length");
        error.add_param("min".into(), &min);
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &len);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor esté en una lista de valores permitidos
pub fn validate_enum(value: &str, allowed_values: &[&str]) -> Result<(), ValidationError> {
    if !allowed_values.contains(&value) {
        let mut error = ValidationError::new("enum");
        error.add_param("value".into(), &value.to_string());
        error.add_param("allowed_values".into(), &format!("{:?}", allowed_values));
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("Ravi Kumar").is_ok());
        assert!(validate_not_empty("").is_err());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_validate_length() {
        let value = "test";
        assert!(validate_length(value, 1, 10).is_ok());
        assert!(validate_length(value, 5, 10).is_err());
        assert!(validate_length(value, 1, 3).is_err());
    }

    #[test]
    fn test_validate_enum() {
        let allowed = ["Active", "Suspended", "Pending"];
        assert!(validate_enum("Active", &allowed).is_ok());
        assert!(validate_enum("Retired", &allowed).is_err());
    }
}
