use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::core::error::CoreError;
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SubmitLeave {
    #[schema(example = 1000)]
    pub subject_id: u64,
    #[schema(example = "SAKIT")]
    pub kind: LeaveType,
    #[schema(example = "2026-01-06", value_type = String, format = "date")]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-07", value_type = String, format = "date")]
    pub end_date: NaiveDate,
    #[schema(example = "demam, surat dokter terlampir")]
    pub reason: String,
    #[schema(example = "https://cdn.example.com/d/xyz.pdf", nullable = true)]
    pub supporting_document_ref: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum LeaveDecision {
    Disetujui,
    Ditolak,
}

impl LeaveDecision {
    pub fn as_status(self) -> LeaveStatus {
        match self {
            LeaveDecision::Disetujui => LeaveStatus::Disetujui,
            LeaveDecision::Ditolak => LeaveStatus::Ditolak,
        }
    }
}

/// Shape checks for a new submission. Malformed input is the only thing
/// that errors here; a well-formed request always starts PENDING.
pub fn validate_submission(input: &SubmitLeave) -> Result<(), CoreError> {
    if input.start_date > input.end_date {
        return Err(CoreError::Validation(
            "start_date cannot be after end_date".into(),
        ));
    }
    if input.reason.trim().is_empty() {
        return Err(CoreError::Validation("reason must not be empty".into()));
    }
    Ok(())
}

/// Resolves a PENDING request exactly once. Resolving an already-resolved
/// request is rejected, not silently overwritten; corrections go through
/// `reopen` first.
pub fn resolve(
    mut request: LeaveRequest,
    decision: LeaveDecision,
    actor: &str,
    note: Option<String>,
    now: NaiveDateTime,
) -> Result<LeaveRequest, CoreError> {
    if request.status != LeaveStatus::Pending {
        return Err(CoreError::InvalidTransition(format!(
            "leave request {} already resolved as {}",
            request.id, request.status
        )));
    }

    request.status = decision.as_status();
    request.resolved_at = Some(now);
    request.resolved_by = Some(actor.to_string());
    request.resolution_note = note;
    Ok(request)
}

/// Admin override: put a resolved request back to PENDING, clearing the
/// resolution fields so the PENDING invariant holds again.
pub fn reopen(mut request: LeaveRequest) -> LeaveRequest {
    request.status = LeaveStatus::Pending;
    request.resolved_at = None;
    request.resolved_by = None;
    request.resolution_note = None;
    request
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    fn now() -> NaiveDateTime {
        date(6).and_hms_opt(9, 0, 0).unwrap()
    }

    fn submission() -> SubmitLeave {
        SubmitLeave {
            subject_id: 1000,
            kind: LeaveType::Sakit,
            start_date: date(6),
            end_date: date(7),
            reason: "demam".into(),
            supporting_document_ref: None,
        }
    }

    fn pending() -> LeaveRequest {
        LeaveRequest {
            id: 1,
            subject_id: 1000,
            subject_name: None,
            kind: LeaveType::Sakit,
            start_date: date(6),
            end_date: date(7),
            reason: "demam".into(),
            supporting_document_ref: None,
            status: LeaveStatus::Pending,
            submitted_at: date(5).and_hms_opt(19, 30, 0).unwrap(),
            resolved_at: None,
            resolved_by: None,
            resolution_note: None,
        }
    }

    #[test]
    fn well_formed_submission_passes() {
        assert!(validate_submission(&submission()).is_ok());
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let mut s = submission();
        s.start_date = date(8);
        assert!(matches!(
            validate_submission(&s),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn blank_reason_is_rejected() {
        let mut s = submission();
        s.reason = "   ".into();
        assert!(matches!(
            validate_submission(&s),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn single_day_range_is_allowed() {
        let mut s = submission();
        s.end_date = s.start_date;
        assert!(validate_submission(&s).is_ok());
    }

    #[test]
    fn resolve_sets_resolution_fields() {
        let resolved = resolve(
            pending(),
            LeaveDecision::Disetujui,
            "admin-1",
            Some("lampiran lengkap".into()),
            now(),
        )
        .unwrap();

        assert_eq!(resolved.status, LeaveStatus::Disetujui);
        assert_eq!(resolved.resolved_at, Some(now()));
        assert_eq!(resolved.resolved_by.as_deref(), Some("admin-1"));
    }

    #[test]
    fn double_resolve_is_an_invalid_transition() {
        let resolved = resolve(pending(), LeaveDecision::Disetujui, "admin-1", None, now()).unwrap();

        let err = resolve(resolved, LeaveDecision::Ditolak, "admin-2", None, now()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition(_)));
    }

    #[test]
    fn reopen_restores_the_pending_invariant() {
        let resolved = resolve(pending(), LeaveDecision::Ditolak, "admin-1", None, now()).unwrap();
        let reopened = reopen(resolved);

        assert_eq!(reopened.status, LeaveStatus::Pending);
        assert!(reopened.resolved_at.is_none());
        assert!(reopened.resolved_by.is_none());
        assert!(reopened.resolution_note.is_none());

        // and it can be resolved again
        let again = resolve(reopened, LeaveDecision::Disetujui, "admin-2", None, now());
        assert!(again.is_ok());
    }
}
