use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Token kind. Only MASUK tokens are issued; KELUAR is retained so
/// legacy tokens still parse and validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[derive(strum_macros::Display, strum_macros::EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum QrKind {
    Masuk,
    Keluar,
}

/// A time-windowed check-in credential. Lives only in the in-memory
/// session store; expiry is evaluated lazily at validation time.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QrSession {
    #[schema(example = "6e5c1b8a-8f2d-4f7c-9c0e-0b6a2f4d1e3a")]
    pub token: String,

    #[schema(example = "MASUK")]
    pub kind: QrKind,

    #[schema(example = "2026-01-05T08:00:00", value_type = String, format = "date-time")]
    pub issued_at: NaiveDateTime,

    #[schema(example = "2026-01-05T08:05:00", value_type = String, format = "date-time")]
    pub expires_at: NaiveDateTime,

    /// Which geofence this token belongs to.
    #[schema(example = "kantor-pusat")]
    pub location_tag: String,
}
