use actix_web::{HttpResponse, Responder, web};
use chrono::Local;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::core::error::CoreError;
use crate::core::leave::{LeaveDecision, SubmitLeave, reopen, resolve, validate_submission};
use crate::model::leave_request::{LeaveRequest, LeaveStatus};

const SELECT_LEAVE: &str = r#"
    SELECT l.id, l.subject_id, p.name AS subject_name, l.kind, l.start_date,
           l.end_date, l.reason, l.supporting_document_ref, l.status,
           l.submitted_at, l.resolved_at, l.resolved_by, l.resolution_note
    FROM leave_requests l
    LEFT JOIN participants p ON p.id = l.subject_id
"#;

async fn fetch_leave(pool: &MySqlPool, id: u64) -> Result<Option<LeaveRequest>, sqlx::Error> {
    let sql = format!("{} WHERE l.id = ?", SELECT_LEAVE);
    sqlx::query_as::<_, LeaveRequest>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

async fn store_resolution(pool: &MySqlPool, request: &LeaveRequest) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE leave_requests
        SET status = ?, resolved_at = ?, resolved_by = ?, resolution_note = ?
        WHERE id = ?
        "#,
    )
    .bind(request.status.to_string())
    .bind(request.resolved_at)
    .bind(&request.resolved_by)
    .bind(&request.resolution_note)
    .bind(request.id)
    .execute(pool)
    .await?;
    Ok(())
}

/* =========================
Submit leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body(
        content = SubmitLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Leave request submitted", body = Object, example = json!({
            "id": 1,
            "status": "PENDING"
        })),
        (status = 400, description = "Bad request"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    pool: web::Data<MySqlPool>,
    payload: web::Json<SubmitLeave>,
) -> actix_web::Result<impl Responder> {
    let submission = payload.into_inner();

    if let Err(e) = validate_submission(&submission) {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": e.to_string()
        })));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO leave_requests
            (subject_id, kind, start_date, end_date, reason,
             supporting_document_ref, status, submitted_at)
        VALUES (?, ?, ?, ?, ?, ?, 'PENDING', ?)
        "#,
    )
    .bind(submission.subject_id)
    .bind(submission.kind.to_string())
    .bind(submission.start_date)
    .bind(submission.end_date)
    .bind(&submission.reason)
    .bind(&submission.supporting_document_ref)
    .bind(Local::now().naive_local())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, subject_id = submission.subject_id, "Failed to create leave request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "id": result.last_insert_id(),
        "status": LeaveStatus::Pending
    })))
}

#[derive(Deserialize, ToSchema)]
pub struct ResolveLeave {
    /// Administrator resolving the request; opaque identity string.
    #[schema(example = "admin-1")]
    pub actor: String,
    #[schema(example = "lampiran lengkap", nullable = true)]
    pub note: Option<String>,
}

async fn resolve_leave(
    pool: &MySqlPool,
    id: u64,
    decision: LeaveDecision,
    body: ResolveLeave,
) -> actix_web::Result<HttpResponse> {
    let request = fetch_leave(pool, id).await.map_err(|e| {
        tracing::error!(error = %e, id, "Failed to fetch leave request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let Some(request) = request else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Leave request not found"
        })));
    };

    let resolved = match resolve(
        request,
        decision,
        &body.actor,
        body.note,
        Local::now().naive_local(),
    ) {
        Ok(r) => r,
        Err(e @ CoreError::InvalidTransition(_)) => {
            return Ok(HttpResponse::Conflict().json(serde_json::json!({
                "message": e.to_string()
            })));
        }
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": e.to_string()
            })));
        }
    };

    store_resolution(pool, &resolved).await.map_err(|e| {
        tracing::error!(error = %e, id, "Failed to store leave resolution");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    tracing::info!(id, actor = %resolved.resolved_by.as_deref().unwrap_or("?"), status = %resolved.status, "Leave resolved");

    Ok(HttpResponse::Ok().json(resolved))
}

/* =========================
Approve leave (admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/approve",
    params(("leave_id" = u64, Path, description = "ID of the leave request to approve")),
    request_body = ResolveLeave,
    responses(
        (status = 200, description = "Leave approved", body = LeaveRequest),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Already resolved", body = Object, example = json!({
            "message": "invalid transition: leave request 1 already resolved as DISETUJUI"
        }))
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<ResolveLeave>,
) -> actix_web::Result<impl Responder> {
    resolve_leave(
        pool.get_ref(),
        path.into_inner(),
        LeaveDecision::Disetujui,
        payload.into_inner(),
    )
    .await
}

/* =========================
Reject leave (admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/reject",
    params(("leave_id" = u64, Path, description = "ID of the leave request to reject")),
    request_body = ResolveLeave,
    responses(
        (status = 200, description = "Leave rejected", body = LeaveRequest),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Already resolved")
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<ResolveLeave>,
) -> actix_web::Result<impl Responder> {
    resolve_leave(
        pool.get_ref(),
        path.into_inner(),
        LeaveDecision::Ditolak,
        payload.into_inner(),
    )
    .await
}

/* =========================
Re-open leave (admin override)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/reopen",
    params(("leave_id" = u64, Path, description = "ID of the leave request to re-open")),
    responses(
        (status = 200, description = "Leave back to PENDING", body = LeaveRequest),
        (status = 404, description = "Leave request not found")
    ),
    tag = "Leave"
)]
pub async fn reopen_leave(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();

    let request = fetch_leave(pool.get_ref(), id).await.map_err(|e| {
        tracing::error!(error = %e, id, "Failed to fetch leave request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let Some(request) = request else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Leave request not found"
        })));
    };

    let reopened = reopen(request);

    store_resolution(pool.get_ref(), &reopened).await.map_err(|e| {
        tracing::error!(error = %e, id, "Failed to re-open leave request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    tracing::info!(id, "Leave request re-opened");

    Ok(HttpResponse::Ok().json(reopened))
}

/// Fetch one leave request
#[utoipa::path(
    get,
    path = "/api/v1/leave/{leave_id}",
    params(("leave_id" = u64, Path, description = "ID of the leave request to fetch")),
    responses(
        (status = 200, description = "Leave request found", body = LeaveRequest),
        (status = 404, description = "Leave request not found")
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();

    let leave = fetch_leave(pool.get_ref(), id).await.map_err(|e| {
        tracing::error!(error = %e, id, "Failed to fetch leave request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match leave {
        Some(data) => Ok(HttpResponse::Ok().json(data)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Leave request not found"
        }))),
    }
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    /// Filter by participant ID
    #[schema(example = 1000)]
    pub subject_id: Option<u64>,
    /// Filter by leave status
    #[schema(example = "PENDING")]
    pub status: Option<String>,
    #[schema(example = 1)]
    pub page: Option<u64>,
    #[schema(example = 10)]
    pub per_page: Option<u64>,
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveRequest>,
    #[schema(example = 1)]
    pub page: u64,
    #[schema(example = 10)]
    pub per_page: u64,
    #[schema(example = 1)]
    pub total: i64,
}

/// List leave requests
#[utoipa::path(
    get,
    path = "/api/v1/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated leave list", body = LeaveListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveFilter>,
) -> actix_web::Result<impl Responder> {
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(subject_id) = query.subject_id {
        where_sql.push_str(" AND l.subject_id = ?");
        args.push(FilterValue::U64(subject_id));
    }
    if let Some(status) = query.status.as_deref() {
        where_sql.push_str(" AND l.status = ?");
        args.push(FilterValue::Str(status));
    }

    let count_sql = format!("SELECT COUNT(*) FROM leave_requests l{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count leave requests");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        "{}{} ORDER BY l.submitted_at DESC LIMIT ? OFFSET ?",
        SELECT_LEAVE, where_sql
    );

    let mut data_q = sqlx::query_as::<_, LeaveRequest>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let leaves = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch leave list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(LeaveListResponse {
        data: leaves,
        page,
        per_page,
        total,
    }))
}
