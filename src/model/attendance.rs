use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Attendance event type. Only MASUK/KELUAR go through the validation
/// engine; IZIN/SAKIT/CUTI are mirrored leave types kept for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[derive(strum_macros::Display, strum_macros::EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum AttendanceType {
    #[sqlx(rename = "MASUK")]
    Masuk,
    #[sqlx(rename = "KELUAR")]
    Keluar,
    #[sqlx(rename = "IZIN")]
    Izin,
    #[sqlx(rename = "SAKIT")]
    Sakit,
    #[sqlx(rename = "CUTI")]
    Cuti,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[derive(strum_macros::Display, strum_macros::EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum AttendanceStatus {
    #[sqlx(rename = "VALID")]
    Valid,
    #[sqlx(rename = "TERLAMBAT")]
    Terlambat,
    #[sqlx(rename = "INVALID")]
    Invalid,
}

/// A latitude/longitude pair as claimed by the scanning client.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    #[schema(example = -6.2088)]
    pub latitude: f64,
    #[schema(example = 106.8456)]
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1000)]
    pub subject_id: u64,

    /// Display name, joined from the participant directory. Not owned here.
    #[schema(example = "Budi Santoso", nullable = true)]
    pub subject_name: Option<String>,

    #[schema(example = "MASUK")]
    pub tipe: AttendanceType,

    /// Event time as claimed by the client at scan time.
    #[schema(example = "2026-01-05T08:02:11", value_type = String, format = "date-time")]
    pub occurred_at: NaiveDateTime,

    #[schema(example = -6.2089, nullable = true)]
    pub latitude: Option<f64>,

    #[schema(example = 106.8457, nullable = true)]
    pub longitude: Option<f64>,

    #[schema(example = "Jl. Sudirman No. 1", nullable = true)]
    pub address: Option<String>,

    /// Opaque evidence URI (selfie), owned by external storage.
    #[schema(example = "https://cdn.example.com/p/abc.jpg", nullable = true)]
    pub proof_image_ref: Option<String>,

    /// QR token presented at scan time, kept for audit.
    #[schema(example = "6e5c1b8a-8f2d-4f7c-9c0e-0b6a2f4d1e3a")]
    pub session_token: String,

    #[schema(example = "VALID")]
    pub status: AttendanceStatus,

    #[schema(example = "scanned at lobby", nullable = true)]
    pub note: Option<String>,

    #[schema(example = "2026-01-05T08:02:11", value_type = String, format = "date-time", nullable = true)]
    pub created_at: Option<NaiveDateTime>,
}
