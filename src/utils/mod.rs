//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación,
//! normalización de matrículas y otras funcionalidades comunes.

pub mod errors;
pub mod plate;
pub mod validation;
