use actix_web::{HttpResponse, Responder, web};
use chrono::Local;
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::api::settings::current_settings;
use crate::config::Config;
use crate::core::qr::{IssueRequest, QrSessionManager};
use crate::model::qr_session::{QrKind, QrSession};

#[derive(Deserialize, ToSchema)]
pub struct IssueQr {
    /// Geofence label the token belongs to. Defaults to the configured tag.
    #[schema(example = "kantor-pusat", nullable = true)]
    pub location_tag: Option<String>,
    /// Overrides the configured validity window.
    #[schema(example = 5, nullable = true)]
    pub validity_minutes: Option<i64>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct CurrentQrQuery {
    #[schema(example = "kantor-pusat", nullable = true)]
    pub location_tag: Option<String>,
}

/// Issue a fresh check-in token
#[utoipa::path(
    post,
    path = "/api/v1/qr",
    request_body = IssueQr,
    responses(
        (status = 200, description = "Token issued", body = QrSession),
        (status = 500, description = "Internal server error")
    ),
    tag = "QR"
)]
pub async fn issue_qr(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    manager: web::Data<QrSessionManager>,
    payload: web::Json<IssueQr>,
) -> actix_web::Result<impl Responder> {
    let settings = current_settings(pool.get_ref(), config.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to load settings for QR issue");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let session = manager.issue(
        IssueRequest {
            kind: QrKind::Masuk,
            location_tag: payload
                .location_tag
                .clone()
                .unwrap_or_else(|| config.default_location_tag.clone()),
            validity_minutes: payload
                .validity_minutes
                .unwrap_or(settings.qr_validity_minutes),
        },
        Local::now().naive_local(),
    );

    tracing::info!(
        token = %session.token,
        location_tag = %session.location_tag,
        expires_at = %session.expires_at,
        "QR session issued"
    );

    Ok(HttpResponse::Ok().json(session))
}

/// Read the current token for a location tag
#[utoipa::path(
    get,
    path = "/api/v1/qr/current",
    params(CurrentQrQuery),
    responses(
        (status = 200, description = "Current session", body = QrSession),
        (status = 404, description = "No session issued yet for this tag")
    ),
    tag = "QR"
)]
pub async fn current_qr(
    config: web::Data<Config>,
    manager: web::Data<QrSessionManager>,
    query: web::Query<CurrentQrQuery>,
) -> actix_web::Result<impl Responder> {
    let tag = query
        .location_tag
        .clone()
        .unwrap_or_else(|| config.default_location_tag.clone());

    match manager.current(&tag) {
        Some(session) => Ok(HttpResponse::Ok().json(session)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "No QR session issued for this location tag"
        }))),
    }
}
