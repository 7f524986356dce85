use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::admin::Admin;
use crate::utils::errors::AppError;

pub struct AdminRepository {
    pool: PgPool,
}

impl AdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, username: &str, password_hash: &str) -> Result<Admin, AppError> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (id, username, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(admin)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<Admin>, AppError> {
        let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(admin)
    }
}
