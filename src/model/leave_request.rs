use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[derive(strum_macros::Display, strum_macros::EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum LeaveType {
    #[sqlx(rename = "SAKIT")]
    Sakit,
    #[sqlx(rename = "IZIN")]
    Izin,
    #[sqlx(rename = "CUTI")]
    Cuti,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[derive(strum_macros::Display, strum_macros::EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum LeaveStatus {
    #[sqlx(rename = "PENDING")]
    Pending,
    #[sqlx(rename = "DISETUJUI")]
    Disetujui,
    #[sqlx(rename = "DITOLAK")]
    Ditolak,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRequest {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1000)]
    pub subject_id: u64,

    #[schema(example = "Budi Santoso", nullable = true)]
    pub subject_name: Option<String>,

    #[schema(example = "SAKIT")]
    pub kind: LeaveType,

    #[schema(example = "2026-01-06", value_type = String, format = "date")]
    pub start_date: NaiveDate,

    #[schema(example = "2026-01-07", value_type = String, format = "date")]
    pub end_date: NaiveDate,

    #[schema(example = "demam, surat dokter terlampir")]
    pub reason: String,

    /// Opaque evidence URI (doctor's note etc.), owned by external storage.
    #[schema(example = "https://cdn.example.com/d/xyz.pdf", nullable = true)]
    pub supporting_document_ref: Option<String>,

    #[schema(example = "PENDING")]
    pub status: LeaveStatus,

    #[schema(example = "2026-01-05T19:30:00", value_type = String, format = "date-time")]
    pub submitted_at: NaiveDateTime,

    /// Set exactly when status leaves PENDING, cleared on re-open.
    #[schema(example = "2026-01-06T09:00:00", value_type = String, format = "date-time", nullable = true)]
    pub resolved_at: Option<NaiveDateTime>,

    #[schema(example = "admin-1", nullable = true)]
    pub resolved_by: Option<String>,

    #[schema(example = "disetujui, lampiran lengkap", nullable = true)]
    pub resolution_note: Option<String>,
}
