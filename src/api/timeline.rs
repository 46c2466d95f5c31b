use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::core::timeline::{StatusBucket, TimelineFilter, TimelinePage, reconcile};
use crate::model::attendance::AttendanceRecord;
use crate::model::leave_request::LeaveRequest;

// Reconciliation is an in-memory merge; cap what we pull per stream so a
// runaway table cannot blow the heap. At larger scale this becomes a
// persistence-layer query.
const FETCH_CAP: u64 = 5_000;

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct TimelineQuery {
    /// Coarse status bucket: PENDING, HADIR or IZIN
    #[schema(example = "PENDING")]
    pub bucket: Option<StatusBucket>,
    /// Free-text match against subject name or record kind
    #[schema(example = "sakit")]
    pub q: Option<String>,
    #[schema(example = 1)]
    pub page: Option<u64>,
    #[schema(example = 10)]
    pub per_page: Option<u64>,
}

/// Unified admin timeline: attendance and leave merged into one
/// pending-first, most-recent-first page.
#[utoipa::path(
    get,
    path = "/api/v1/timeline",
    params(TimelineQuery),
    responses(
        (status = 200, description = "Reconciled activity page", body = TimelinePage),
        (status = 500, description = "Internal server error")
    ),
    tag = "Timeline"
)]
pub async fn unified_timeline(
    pool: web::Data<MySqlPool>,
    query: web::Query<TimelineQuery>,
) -> actix_web::Result<impl Responder> {
    let attendance = sqlx::query_as::<_, AttendanceRecord>(
        r#"
        SELECT a.id, a.subject_id, p.name AS subject_name, a.tipe, a.occurred_at,
               a.latitude, a.longitude, a.address, a.proof_image_ref,
               a.session_token, a.status, a.note, a.created_at
        FROM attendance_records a
        LEFT JOIN participants p ON p.id = a.subject_id
        ORDER BY a.occurred_at DESC
        LIMIT ?
        "#,
    )
    .bind(FETCH_CAP)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch attendance stream");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let leave = sqlx::query_as::<_, LeaveRequest>(
        r#"
        SELECT l.id, l.subject_id, p.name AS subject_name, l.kind, l.start_date,
               l.end_date, l.reason, l.supporting_document_ref, l.status,
               l.submitted_at, l.resolved_at, l.resolved_by, l.resolution_note
        FROM leave_requests l
        LEFT JOIN participants p ON p.id = l.subject_id
        ORDER BY l.submitted_at DESC
        LIMIT ?
        "#,
    )
    .bind(FETCH_CAP)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch leave stream");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let filter = TimelineFilter {
        bucket: query.bucket,
        q: query.q.clone(),
    };

    let page = reconcile(
        &attendance,
        &leave,
        &filter,
        query.page.unwrap_or(1),
        query.per_page.unwrap_or(10),
    );

    Ok(HttpResponse::Ok().json(page))
}
