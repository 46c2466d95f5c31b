use actix_web::{HttpResponse, Responder, web};
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::api::settings::current_settings;
use crate::config::Config;
use crate::core::attendance::{StatusInput, apply_override, derive_status};
use crate::core::geofence::{GeofenceCheck, is_within_geofence};
use crate::core::qr::{QrSessionManager, TokenCheck};
use crate::model::attendance::{AttendanceRecord, AttendanceStatus, AttendanceType, GeoPoint};

const SELECT_RECORD: &str = r#"
    SELECT a.id, a.subject_id, p.name AS subject_name, a.tipe, a.occurred_at,
           a.latitude, a.longitude, a.address, a.proof_image_ref,
           a.session_token, a.status, a.note, a.created_at
    FROM attendance_records a
    LEFT JOIN participants p ON p.id = a.subject_id
"#;

#[derive(Deserialize, ToSchema)]
pub struct ScanClaim {
    #[schema(example = 1000)]
    pub subject_id: u64,
    /// MASUK or KELUAR; mirrored leave types are not scannable.
    #[schema(example = "MASUK")]
    pub tipe: AttendanceType,
    /// Client-claimed event time.
    #[schema(example = "2026-01-05T08:02:11", value_type = String, format = "date-time")]
    pub occurred_at: NaiveDateTime,
    /// QR token presented by the scanning client.
    #[schema(example = "6e5c1b8a-8f2d-4f7c-9c0e-0b6a2f4d1e3a")]
    pub token: String,
    #[schema(example = -6.2089, nullable = true)]
    pub latitude: Option<f64>,
    #[schema(example = 106.8457, nullable = true)]
    pub longitude: Option<f64>,
    #[schema(example = "Jl. Sudirman No. 1", nullable = true)]
    pub address: Option<String>,
    #[schema(example = "https://cdn.example.com/p/abc.jpg", nullable = true)]
    pub proof_image_ref: Option<String>,
    #[schema(nullable = true)]
    pub note: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ScanResult {
    #[schema(example = 12)]
    pub id: u64,
    #[schema(example = "VALID")]
    pub status: AttendanceStatus,
    pub token: TokenCheck,
    /// Rounded distance from the office, when coordinates were supplied.
    #[schema(example = 16, nullable = true)]
    pub distance_meters: Option<u64>,
}

/// Submit a scan claim. A failed token or geofence check still records
/// the attempt (as INVALID) so admins can audit it.
#[utoipa::path(
    post,
    path = "/api/v1/attendance/scan",
    request_body = ScanClaim,
    responses(
        (status = 200, description = "Claim recorded with derived status", body = ScanResult),
        (status = 400, description = "Non-scannable attendance type"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn submit_scan(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    manager: web::Data<QrSessionManager>,
    payload: web::Json<ScanClaim>,
) -> actix_web::Result<impl Responder> {
    let claim = payload.into_inner();

    if !matches!(claim.tipe, AttendanceType::Masuk | AttendanceType::Keluar) {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Only MASUK and KELUAR can be scanned"
        })));
    }

    let settings = current_settings(pool.get_ref(), config.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to load settings for scan");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    // Token expiry is judged at scan time, not at the claimed event time.
    let token_check = manager.validate(&claim.token, Local::now().naive_local());

    let geofence: Option<GeofenceCheck> = match (claim.latitude, claim.longitude) {
        (Some(latitude), Some(longitude)) => Some(is_within_geofence(
            GeoPoint {
                latitude,
                longitude,
            },
            &settings,
        )),
        _ => None,
    };

    let status = derive_status(&StatusInput {
        tipe: claim.tipe,
        occurred_at: claim.occurred_at,
        work_start: settings.work_start_time,
        late_threshold_minutes: settings.late_threshold_minutes,
        location_required: settings.require_location,
        geofence: geofence.as_ref(),
        token: &token_check,
    });

    let result = sqlx::query(
        r#"
        INSERT INTO attendance_records
            (subject_id, tipe, occurred_at, latitude, longitude, address,
             proof_image_ref, session_token, status, note)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(claim.subject_id)
    .bind(claim.tipe.to_string())
    .bind(claim.occurred_at)
    .bind(claim.latitude)
    .bind(claim.longitude)
    .bind(&claim.address)
    .bind(&claim.proof_image_ref)
    .bind(&claim.token)
    .bind(status.to_string())
    .bind(&claim.note)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, subject_id = claim.subject_id, "Failed to record scan");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    tracing::info!(
        subject_id = claim.subject_id,
        tipe = %claim.tipe,
        status = %status,
        token_valid = token_check.valid,
        "Scan recorded"
    );

    Ok(HttpResponse::Ok().json(ScanResult {
        id: result.last_insert_id(),
        status,
        token: token_check,
        distance_meters: geofence.map(|g| g.display_distance()),
    }))
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct AttendanceFilter {
    /// Filter by participant ID
    #[schema(example = 1000)]
    pub subject_id: Option<u64>,
    /// Filter by derived status
    #[schema(example = "VALID")]
    pub status: Option<String>,
    /// Records on or after this date
    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub from: Option<NaiveDate>,
    /// Records on or before this date
    #[schema(example = "2026-01-31", value_type = String, format = "date")]
    pub to: Option<NaiveDate>,
    #[schema(example = 1)]
    pub page: Option<u64>,
    #[schema(example = 10)]
    pub per_page: Option<u64>,
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
    Date(NaiveDate),
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceListResponse {
    pub data: Vec<AttendanceRecord>,
    #[schema(example = 1)]
    pub page: u64,
    #[schema(example = 10)]
    pub per_page: u64,
    #[schema(example = 1)]
    pub total: i64,
}

/// List attendance records
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(AttendanceFilter),
    responses(
        (status = 200, description = "Paginated attendance list", body = AttendanceListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendanceFilter>,
) -> actix_web::Result<impl Responder> {
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(subject_id) = query.subject_id {
        where_sql.push_str(" AND a.subject_id = ?");
        args.push(FilterValue::U64(subject_id));
    }
    if let Some(status) = query.status.as_deref() {
        where_sql.push_str(" AND a.status = ?");
        args.push(FilterValue::Str(status));
    }
    if let Some(from) = query.from {
        where_sql.push_str(" AND DATE(a.occurred_at) >= ?");
        args.push(FilterValue::Date(from));
    }
    if let Some(to) = query.to {
        where_sql.push_str(" AND DATE(a.occurred_at) <= ?");
        args.push(FilterValue::Date(to));
    }

    let count_sql = format!("SELECT COUNT(*) FROM attendance_records a{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
            FilterValue::Date(d) => count_q.bind(*d),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count attendance records");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        "{}{} ORDER BY a.occurred_at DESC LIMIT ? OFFSET ?",
        SELECT_RECORD, where_sql
    );

    let mut data_q = sqlx::query_as::<_, AttendanceRecord>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
            FilterValue::Date(d) => data_q.bind(d),
        };
    }

    let records = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch attendance list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(AttendanceListResponse {
        data: records,
        page,
        per_page,
        total,
    }))
}

#[derive(Deserialize, ToSchema)]
pub struct OverrideStatus {
    #[schema(example = "VALID")]
    pub status: AttendanceStatus,
    /// Administrator performing the override; opaque identity string.
    #[schema(example = "admin-1")]
    pub actor: String,
}

/// Override a record's derived status (admin)
#[utoipa::path(
    put,
    path = "/api/v1/attendance/{id}/status",
    params(("id" = u64, Path, description = "Attendance record ID")),
    request_body = OverrideStatus,
    responses(
        (status = 200, description = "Record after override", body = AttendanceRecord),
        (status = 404, description = "Record not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn override_status(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<OverrideStatus>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();

    let sql = format!("{} WHERE a.id = ?", SELECT_RECORD);
    let record = sqlx::query_as::<_, AttendanceRecord>(&sql)
        .bind(id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, id, "Failed to fetch attendance record");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let Some(record) = record else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Attendance record not found"
        })));
    };

    let (record, changed) = apply_override(record, payload.status);

    if changed {
        sqlx::query("UPDATE attendance_records SET status = ? WHERE id = ?")
            .bind(record.status.to_string())
            .bind(id)
            .execute(pool.get_ref())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, id, "Failed to override status");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;

        tracing::info!(id, actor = %payload.actor, status = %record.status, "Status overridden");
    }

    Ok(HttpResponse::Ok().json(record))
}

/// Delete a record permanently (admin)
#[utoipa::path(
    delete,
    path = "/api/v1/attendance/{id}",
    params(("id" = u64, Path, description = "Attendance record ID")),
    responses(
        (status = 200, description = "Record deleted"),
        (status = 404, description = "Record not found")
    ),
    tag = "Attendance"
)]
pub async fn delete_record(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();

    let result = sqlx::query("DELETE FROM attendance_records WHERE id = ?")
        .bind(id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, id, "Failed to delete attendance record");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Attendance record not found"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Attendance record deleted"
    })))
}
