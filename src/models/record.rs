//! Modelo de DriverRecord
//!
//! Este módulo contiene el struct DriverRecord y su enum de estado.
//! Mapea exactamente a la tabla driver_records con primary key 'id'.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Estado del registro - almacenado como VARCHAR en la tabla
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RecordStatus {
    Active,
    Suspended,
    Pending,
}

impl RecordStatus {
    pub const ALLOWED: [&'static str; 3] = ["Active", "Suspended", "Pending"];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Active => "Active",
            RecordStatus::Suspended => "Suspended",
            RecordStatus::Pending => "Pending",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "Active" => Some(RecordStatus::Active),
            "Suspended" => Some(RecordStatus::Suspended),
            "Pending" => Some(RecordStatus::Pending),
            _ => None,
        }
    }
}

impl Default for RecordStatus {
    fn default() -> Self {
        RecordStatus::Active
    }
}

/// Registro de conductor/vehículo - mapea exactamente a la tabla driver_records
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DriverRecord {
    pub id: Uuid,
    pub driver_name: String,
    pub vehicle_number: String,
    pub license_number: String,
    pub driver_address: String,
    pub driver_phone: String,
    pub blood_group: Option<String>,
    pub emergency_contact: Option<String>,
    pub status: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [RecordStatus::Active, RecordStatus::Suspended, RecordStatus::Pending] {
            assert_eq!(RecordStatus::from_str(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_status_rejects_unknown_values() {
        assert_eq!(RecordStatus::from_str("active"), None);
        assert_eq!(RecordStatus::from_str("Retired"), None);
        assert_eq!(RecordStatus::from_str(""), None);
    }

    #[test]
    fn test_status_defaults_to_active() {
        assert_eq!(RecordStatus::default(), RecordStatus::Active);
    }
}
