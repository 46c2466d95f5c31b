use chrono::{Duration, NaiveDateTime, NaiveTime};

use crate::core::geofence::GeofenceCheck;
use crate::core::qr::TokenCheck;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus, AttendanceType};

/// Everything the status decision needs, assembled by the caller.
/// `geofence` is `None` when the client supplied no coordinates; with
/// `location_required` set that counts as a failed check, not an error.
pub struct StatusInput<'a> {
    pub tipe: AttendanceType,
    pub occurred_at: NaiveDateTime,
    pub work_start: NaiveTime,
    pub late_threshold_minutes: i64,
    pub location_required: bool,
    pub geofence: Option<&'a GeofenceCheck>,
    pub token: &'a TokenCheck,
}

/// Derives the record status at scan time. First matching rule wins:
/// bad token, then geofence miss, then lateness, else VALID. Pure;
/// re-evaluating the same input always yields the same status.
pub fn derive_status(input: &StatusInput) -> AttendanceStatus {
    if !input.token.valid {
        return AttendanceStatus::Invalid;
    }

    if input.location_required && !input.geofence.map(|g| g.within_range).unwrap_or(false) {
        return AttendanceStatus::Invalid;
    }

    // Only check-ins can be late; a check-out carries no deadline.
    if input.tipe == AttendanceType::Masuk {
        let deadline = input.work_start + Duration::minutes(input.late_threshold_minutes);
        if input.occurred_at.time() > deadline {
            return AttendanceStatus::Terlambat;
        }
    }

    AttendanceStatus::Valid
}

/// Admin status override. Always permitted, idempotent, and leaves the
/// original claim (`occurred_at`, coordinates) untouched. Returns the
/// record plus whether anything actually changed.
pub fn apply_override(
    mut record: AttendanceRecord,
    new_status: AttendanceStatus,
) -> (AttendanceRecord, bool) {
    if record.status == new_status {
        return (record, false);
    }
    record.status = new_status;
    (record, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::qr::TokenFailReason;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 5)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn inside() -> GeofenceCheck {
        GeofenceCheck {
            distance_meters: 12.0,
            within_range: true,
        }
    }

    fn outside() -> GeofenceCheck {
        GeofenceCheck {
            distance_meters: 412.0,
            within_range: false,
        }
    }

    fn input<'a>(
        tipe: AttendanceType,
        occurred_at: NaiveDateTime,
        geofence: Option<&'a GeofenceCheck>,
        token: &'a TokenCheck,
    ) -> StatusInput<'a> {
        StatusInput {
            tipe,
            occurred_at,
            work_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            late_threshold_minutes: 15,
            location_required: true,
            geofence,
            token,
        }
    }

    #[test]
    fn on_time_checkin_is_valid() {
        let token = TokenCheck::ok();
        let geo = inside();
        let status = derive_status(&input(AttendanceType::Masuk, at(8, 10), Some(&geo), &token));
        assert_eq!(status, AttendanceStatus::Valid);
    }

    #[test]
    fn past_threshold_checkin_is_terlambat() {
        let token = TokenCheck::ok();
        let geo = inside();
        let status = derive_status(&input(AttendanceType::Masuk, at(8, 20), Some(&geo), &token));
        assert_eq!(status, AttendanceStatus::Terlambat);
    }

    #[test]
    fn bad_token_wins_over_punctuality() {
        let token = TokenCheck::fail(TokenFailReason::Expired);
        let geo = inside();
        let status = derive_status(&input(AttendanceType::Masuk, at(8, 0), Some(&geo), &token));
        assert_eq!(status, AttendanceStatus::Invalid);
    }

    #[test]
    fn out_of_range_is_invalid_when_location_required() {
        let token = TokenCheck::ok();
        let geo = outside();
        let status = derive_status(&input(AttendanceType::Masuk, at(8, 0), Some(&geo), &token));
        assert_eq!(status, AttendanceStatus::Invalid);
    }

    #[test]
    fn missing_location_counts_as_geofence_miss() {
        let token = TokenCheck::ok();
        let status = derive_status(&input(AttendanceType::Masuk, at(8, 0), None, &token));
        assert_eq!(status, AttendanceStatus::Invalid);
    }

    #[test]
    fn missing_location_passes_when_not_required() {
        let token = TokenCheck::ok();
        let mut i = input(AttendanceType::Masuk, at(8, 0), None, &token);
        i.location_required = false;
        assert_eq!(derive_status(&i), AttendanceStatus::Valid);
    }

    #[test]
    fn evening_checkout_is_not_late() {
        let token = TokenCheck::ok();
        let geo = inside();
        let status = derive_status(&input(AttendanceType::Keluar, at(17, 0), Some(&geo), &token));
        assert_eq!(status, AttendanceStatus::Valid);
    }

    #[test]
    fn derivation_is_deterministic() {
        let token = TokenCheck::ok();
        let geo = inside();
        let i = input(AttendanceType::Masuk, at(8, 20), Some(&geo), &token);
        assert_eq!(derive_status(&i), derive_status(&i));
    }

    fn record(status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            id: 1,
            subject_id: 1000,
            subject_name: None,
            tipe: AttendanceType::Masuk,
            occurred_at: at(8, 2),
            latitude: Some(-6.2089),
            longitude: Some(106.8457),
            address: None,
            proof_image_ref: None,
            session_token: "tok".into(),
            status,
            note: None,
            created_at: None,
        }
    }

    #[test]
    fn override_changes_status_and_nothing_else() {
        let before = record(AttendanceStatus::Invalid);
        let occurred_at = before.occurred_at;
        let (after, changed) = apply_override(before, AttendanceStatus::Valid);

        assert!(changed);
        assert_eq!(after.status, AttendanceStatus::Valid);
        assert_eq!(after.occurred_at, occurred_at);
        assert_eq!(after.latitude, Some(-6.2089));
    }

    #[test]
    fn override_is_idempotent() {
        let (once, _) = apply_override(record(AttendanceStatus::Invalid), AttendanceStatus::Valid);
        let (twice, changed) = apply_override(once, AttendanceStatus::Valid);

        assert!(!changed);
        assert_eq!(twice.status, AttendanceStatus::Valid);
    }
}
