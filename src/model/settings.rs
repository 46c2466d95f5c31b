use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Office geofence and timing configuration. Single global row, mutated
/// only through the settings endpoint; read by every geofence check.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct OfficeSettings {
    #[schema(example = -6.2088)]
    pub office_latitude: f64,

    #[schema(example = 106.8456)]
    pub office_longitude: f64,

    #[schema(example = 100.0)]
    pub radius_meters: f64,

    /// When false, scans without GPS coordinates skip the geofence rule.
    #[schema(example = true)]
    pub require_location: bool,

    #[schema(example = "08:00:00", value_type = String, format = "time")]
    pub work_start_time: NaiveTime,

    #[schema(example = 15)]
    pub late_threshold_minutes: i64,

    #[schema(example = 5)]
    pub qr_validity_minutes: i64,
}
