use actix_web::{HttpResponse, Responder, web};
use sqlx::MySqlPool;

use crate::config::Config;
use crate::model::settings::OfficeSettings;

const SELECT_SETTINGS: &str = r#"
    SELECT office_latitude, office_longitude, radius_meters, require_location,
           work_start_time, late_threshold_minutes, qr_validity_minutes
    FROM office_settings
    WHERE id = 1
"#;

/// Loads the global office settings row, falling back to env defaults
/// until an admin writes one.
pub async fn current_settings(
    pool: &MySqlPool,
    config: &Config,
) -> Result<OfficeSettings, sqlx::Error> {
    let row = sqlx::query_as::<_, OfficeSettings>(SELECT_SETTINGS)
        .fetch_optional(pool)
        .await?;

    Ok(row.unwrap_or_else(|| config.default_settings()))
}

/// Get office geofence + timing settings
#[utoipa::path(
    get,
    path = "/api/v1/settings",
    responses(
        (status = 200, description = "Current settings", body = OfficeSettings),
        (status = 500, description = "Internal server error")
    ),
    tag = "Settings"
)]
pub async fn get_settings(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    let settings = current_settings(pool.get_ref(), config.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to load settings");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(settings))
}

/// Update office geofence + timing settings
#[utoipa::path(
    put,
    path = "/api/v1/settings",
    request_body = OfficeSettings,
    responses(
        (status = 200, description = "Settings updated", body = OfficeSettings),
        (status = 400, description = "Bad request"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Settings"
)]
pub async fn update_settings(
    pool: web::Data<MySqlPool>,
    payload: web::Json<OfficeSettings>,
) -> actix_web::Result<impl Responder> {
    let settings = payload.into_inner();

    if settings.radius_meters < 0.0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "radius_meters cannot be negative"
        })));
    }
    if settings.late_threshold_minutes < 0 || settings.qr_validity_minutes < 1 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "late_threshold_minutes must be >= 0 and qr_validity_minutes >= 1"
        })));
    }

    sqlx::query(
        r#"
        INSERT INTO office_settings
            (id, office_latitude, office_longitude, radius_meters, require_location,
             work_start_time, late_threshold_minutes, qr_validity_minutes)
        VALUES (1, ?, ?, ?, ?, ?, ?, ?)
        ON DUPLICATE KEY UPDATE
            office_latitude = VALUES(office_latitude),
            office_longitude = VALUES(office_longitude),
            radius_meters = VALUES(radius_meters),
            require_location = VALUES(require_location),
            work_start_time = VALUES(work_start_time),
            late_threshold_minutes = VALUES(late_threshold_minutes),
            qr_validity_minutes = VALUES(qr_validity_minutes)
        "#,
    )
    .bind(settings.office_latitude)
    .bind(settings.office_longitude)
    .bind(settings.radius_meters)
    .bind(settings.require_location)
    .bind(settings.work_start_time)
    .bind(settings.late_threshold_minutes)
    .bind(settings.qr_validity_minutes)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to update settings");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(settings))
}
