use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::record_dto::{RecordDraft, RecordUpdate};
use crate::models::record::DriverRecord;
use crate::utils::errors::AppError;
use crate::utils::plate;

/// Campo sobre el que se busca
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    VehicleNumber,
    DriverName,
}

impl SearchField {
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "vehicleNumber" => Some(SearchField::VehicleNumber),
            "driverName" => Some(SearchField::DriverName),
            _ => None,
        }
    }
}

pub struct RecordRepository {
    pool: PgPool,
}

impl RecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        draft: &RecordDraft,
        image_url: &str,
    ) -> Result<DriverRecord, AppError> {
        if self.vehicle_number_exists(&draft.vehicle_number, None).await? {
            return Err(AppError::Conflict(format!(
                "Vehicle number '{}' already exists in the system",
                draft.vehicle_number
            )));
        }

        let id = Uuid::new_v4();
        let now = Utc::now();

        let record = sqlx::query_as::<_, DriverRecord>(
            r#"
            INSERT INTO driver_records (
                id, driver_name, vehicle_number, license_number, driver_address,
                driver_phone, blood_group, emergency_contact, status, image_url,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&draft.driver_name)
        .bind(&draft.vehicle_number)
        .bind(&draft.license_number)
        .bind(&draft.driver_address)
        .bind(&draft.driver_phone)
        .bind(&draft.blood_group)
        .bind(&draft.emergency_contact)
        .bind(draft.status.as_str())
        .bind(image_url)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &draft.vehicle_number))?;

        Ok(record)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<DriverRecord>, AppError> {
        let record =
            sqlx::query_as::<_, DriverRecord>("SELECT * FROM driver_records WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(record)
    }

    /// Mergear los campos presentes del update sobre el registro existente
    /// y refrescar updated_at. NotFound si el id no existe; Conflict si la
    /// matrícula colisiona con otro registro.
    pub async fn update(
        &self,
        id: Uuid,
        update: &RecordUpdate,
        image_url: Option<&str>,
    ) -> Result<DriverRecord, AppError> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Record not found".to_string()))?;

        if let Some(vehicle_number) = &update.vehicle_number {
            if self.vehicle_number_exists(vehicle_number, Some(id)).await? {
                return Err(AppError::Conflict(format!(
                    "Vehicle number '{}' already exists in the system",
                    vehicle_number
                )));
            }
        }

        let vehicle_number = update
            .vehicle_number
            .clone()
            .unwrap_or(current.vehicle_number);

        let status = update
            .status
            .map(|s| s.as_str().to_string())
            .unwrap_or(current.status);

        let record = sqlx::query_as::<_, DriverRecord>(
            r#"
            UPDATE driver_records
            SET driver_name = $2, vehicle_number = $3, license_number = $4,
                driver_address = $5, driver_phone = $6, blood_group = $7,
                emergency_contact = $8, status = $9, image_url = $10,
                updated_at = $11
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.driver_name.clone().unwrap_or(current.driver_name))
        .bind(&vehicle_number)
        .bind(update.license_number.clone().unwrap_or(current.license_number))
        .bind(update.driver_address.clone().unwrap_or(current.driver_address))
        .bind(update.driver_phone.clone().unwrap_or(current.driver_phone))
        .bind(update.blood_group.clone().unwrap_or(current.blood_group))
        .bind(
            update
                .emergency_contact
                .clone()
                .unwrap_or(current.emergency_contact),
        )
        .bind(status)
        .bind(image_url.map(str::to_string).unwrap_or(current.image_url))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &vehicle_number))?;

        Ok(record)
    }

    // Borrado no idempotente: el segundo delete del mismo id reporta NotFound
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let deleted: Option<(Uuid,)> =
            sqlx::query_as("DELETE FROM driver_records WHERE id = $1 RETURNING id")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        deleted.ok_or_else(|| AppError::NotFound("Record not found".to_string()))?;

        Ok(())
    }

    /// Página de registros ordenados por fecha de creación descendente,
    /// junto con el total para calcular la paginación. page y limit son
    /// 1-indexed y se ajustan a >= 1.
    pub async fn get_page(
        &self,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<DriverRecord>, i64), AppError> {
        let page = page.max(1);
        let limit = limit.max(1);
        let offset = (page - 1) * limit;

        let records = sqlx::query_as::<_, DriverRecord>(
            "SELECT * FROM driver_records ORDER BY created_at DESC, id DESC OFFSET $1 LIMIT $2",
        )
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM driver_records")
            .fetch_one(&self.pool)
            .await?;

        Ok((records, total.0))
    }

    /// Búsqueda exacta case-insensitive por matrícula canónica.
    /// Devuelve a lo sumo un registro.
    pub async fn find_by_vehicle_number(
        &self,
        raw: &str,
    ) -> Result<Option<DriverRecord>, AppError> {
        let canonical = plate::normalize(raw);
        if canonical.is_empty() {
            return Ok(None);
        }

        let record = sqlx::query_as::<_, DriverRecord>(
            "SELECT * FROM driver_records WHERE UPPER(vehicle_number) = $1",
        )
        .bind(&canonical)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Búsqueda por substring case-insensitive. Las consultas por matrícula
    /// se limpian de espacios antes de comparar.
    pub async fn search(
        &self,
        query: &str,
        field: SearchField,
    ) -> Result<Vec<DriverRecord>, AppError> {
        let (sql, needle) = match field {
            SearchField::VehicleNumber => (
                "SELECT * FROM driver_records WHERE vehicle_number ILIKE $1",
                plate::normalize(query),
            ),
            SearchField::DriverName => (
                "SELECT * FROM driver_records WHERE driver_name ILIKE $1",
                query.trim().to_string(),
            ),
        };

        let records = sqlx::query_as::<_, DriverRecord>(sql)
            .bind(format!("%{}%", escape_like(&needle)))
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    pub async fn vehicle_number_exists(
        &self,
        canonical: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM driver_records
                WHERE UPPER(vehicle_number) = $1
                  AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(canonical)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }
}

/// Traducir una violación de unicidad del INSERT/UPDATE a Conflict
/// en el punto del fallo; cualquier otro error de base pasa como está.
fn map_unique_violation(error: sqlx::Error, vehicle_number: &str) -> AppError {
    if let sqlx::Error::Database(ref db_error) = error {
        if db_error.is_unique_violation() {
            return AppError::Conflict(format!(
                "Vehicle number '{}' already exists in the system",
                vehicle_number
            ));
        }
    }
    AppError::Database(error)
}

/// Escapar comodines de LIKE para que la búsqueda sea un substring literal
fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_field_from_param() {
        assert_eq!(
            SearchField::from_param("vehicleNumber"),
            Some(SearchField::VehicleNumber)
        );
        assert_eq!(
            SearchField::from_param("driverName"),
            Some(SearchField::DriverName)
        );
        assert_eq!(SearchField::from_param("area"), None);
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("KA01"), "KA01");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
