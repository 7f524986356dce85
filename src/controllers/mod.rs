//! Controllers de la aplicación
//!
//! Componen validación, repositorios y colaboradores externos por
//! operación. Los routers delegan aquí.

pub mod auth_controller;
pub mod image_controller;
pub mod record_controller;
