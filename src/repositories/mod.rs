//! Repositorios de acceso a datos
//!
//! Cada repositorio encapsula las queries SQL de una colección.
//! Sin lógica de negocio más allá de los contratos CRUD y de búsqueda.

pub mod admin_repository;
pub mod record_repository;
