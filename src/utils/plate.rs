//! Normalización de matrículas
//!
//! Forma canónica para almacenamiento y búsqueda: mayúsculas, sin espacios.
//! El formato de visualización re-inserta espacios entre grupos cuando la
//! matrícula sigue el patrón XX 00 XX 0000.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DISPLAY_PATTERN: Regex =
        Regex::new(r"^([A-Z]{2})(\d{2})([A-Z]{1,2})(\d{4})$").unwrap();
}

/// Convertir una matrícula a su forma canónica: sin espacios en blanco
/// y en mayúsculas. Función pura y total, sin modo de fallo.
pub fn normalize(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Formatear una matrícula canónica para visualización.
///
/// "KA01AB1234" -> "KA 01 AB 1234". Si la entrada no sigue el patrón,
/// se devuelve en mayúsculas sin cambios.
pub fn format_display(input: &str) -> String {
    let cleaned = normalize(input);

    if let Some(caps) = DISPLAY_PATTERN.captures(&cleaned) {
        return format!("{} {} {} {}", &caps[1], &caps[2], &caps[3], &caps[4]);
    }

    input.to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_whitespace_and_uppercases() {
        assert_eq!(normalize("ka 01 ab 1234"), "KA01AB1234");
        assert_eq!(normalize("  ka01\tab 1234 "), "KA01AB1234");
        assert_eq!(normalize("KA01AB1234"), "KA01AB1234");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = ["ka 01 ab 1234", "mh 12 z 0001", "  xyz  ", "", "t n 0 7"];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn test_format_display_round_trip() {
        assert_eq!(format_display(&normalize("ka01ab1234")), "KA 01 AB 1234");
        assert_eq!(format_display("KA01AB1234"), "KA 01 AB 1234");
    }

    #[test]
    fn test_format_display_single_letter_series() {
        assert_eq!(format_display("MH12Z0001"), "MH 12 Z 0001");
    }

    #[test]
    fn test_format_display_non_matching_returns_uppercased() {
        assert_eq!(format_display("tractor-77"), "TRACTOR-77");
        assert_eq!(format_display(""), "");
        // Tres letras de estado no siguen el patrón de visualización
        assert_eq!(format_display("xyz99ab1234"), "XYZ99AB1234");
    }
}
