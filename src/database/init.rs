//! Inicialización del schema y datos semilla
//!
//! Crea las tablas si no existen y provisiona el administrador por defecto
//! cuando la colección de admins está vacía.

use sqlx::PgPool;
use tracing::info;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::admin_repository::AdminRepository;
use crate::utils::errors::AppError;

const BCRYPT_COST: u32 = 10;

/// Crear las tablas del sistema si no existen
pub async fn init_schema(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS driver_records (
            id UUID PRIMARY KEY,
            driver_name VARCHAR(100) NOT NULL,
            vehicle_number VARCHAR(20) NOT NULL UNIQUE,
            license_number VARCHAR(50) NOT NULL,
            driver_address VARCHAR(500) NOT NULL,
            driver_phone VARCHAR(20) NOT NULL,
            blood_group VARCHAR(10),
            emergency_contact VARCHAR(50),
            status VARCHAR(20) NOT NULL DEFAULT 'Active'
                CHECK (status IN ('Active', 'Suspended', 'Pending')),
            image_url TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_driver_records_created_at \
         ON driver_records (created_at DESC)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS admins (
            id UUID PRIMARY KEY,
            username VARCHAR(50) NOT NULL UNIQUE,
            password_hash VARCHAR(100) NOT NULL,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Provisionar el administrador por defecto si no existe
pub async fn init_default_admin(
    pool: &PgPool,
    config: &EnvironmentConfig,
) -> Result<(), AppError> {
    let repository = AdminRepository::new(pool.clone());

    if repository
        .find_by_username(&config.admin_username)
        .await?
        .is_some()
    {
        return Ok(());
    }

    let password_hash = bcrypt::hash(&config.admin_password, BCRYPT_COST)
        .map_err(|e| AppError::Internal(format!("Error hashing admin password: {}", e)))?;

    repository
        .create(&config.admin_username, &password_hash)
        .await?;

    info!("✅ Admin por defecto creado: {}", config.admin_username);

    Ok(())
}
