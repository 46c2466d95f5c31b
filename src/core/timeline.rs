use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum SourceKind {
    Attendance,
    Leave,
}

/// Admin-facing status label after merging both record streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[derive(strum_macros::Display, strum_macros::EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum DisplayStatus {
    Hadir,
    Terlambat,
    Invalid,
    Pending,
    Sakit,
    Izin,
    Cuti,
    Ditolak,
}

impl DisplayStatus {
    pub fn color(self) -> &'static str {
        match self {
            DisplayStatus::Hadir => "green",
            DisplayStatus::Terlambat => "amber",
            DisplayStatus::Invalid => "red",
            DisplayStatus::Pending => "blue",
            DisplayStatus::Sakit => "purple",
            DisplayStatus::Izin => "teal",
            DisplayStatus::Cuti => "indigo",
            DisplayStatus::Ditolak => "gray",
        }
    }

    fn bucket(self) -> StatusBucket {
        match self {
            DisplayStatus::Pending => StatusBucket::Pending,
            DisplayStatus::Hadir | DisplayStatus::Terlambat | DisplayStatus::Invalid => {
                StatusBucket::Hadir
            }
            DisplayStatus::Sakit
            | DisplayStatus::Izin
            | DisplayStatus::Cuti
            | DisplayStatus::Ditolak => StatusBucket::Izin,
        }
    }
}

/// Coarse filter buckets: awaiting review, presence records, leave records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusBucket {
    Pending,
    Hadir,
    Izin,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct TimelineFilter {
    /// Restrict to one status bucket.
    pub bucket: Option<StatusBucket>,
    /// Case-insensitive match against subject name or record kind.
    pub q: Option<String>,
}

/// One merged row. Derived at read time, never persisted.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TimelineEntry {
    /// Source-scoped identifier, unique within a reconciled page.
    #[schema(example = "A-12")]
    pub id: String,
    pub source: SourceKind,
    #[schema(example = 1000)]
    pub subject_id: u64,
    #[schema(example = "Budi Santoso", nullable = true)]
    pub subject_name: Option<String>,
    #[schema(example = "2026-01-05T08:02:11", value_type = String, format = "date-time")]
    pub event_time: NaiveDateTime,
    #[schema(example = "HADIR")]
    pub display_status: DisplayStatus,
    #[schema(value_type = String, example = "green")]
    pub display_color: &'static str,
    #[schema(example = "MASUK pukul 08:02")]
    pub detail: String,
    #[schema(example = "https://cdn.example.com/p/abc.jpg", nullable = true)]
    pub evidence_ref: Option<String>,
    /// Full source record for drill-down.
    #[schema(value_type = Object)]
    pub original: serde_json::Value,
    #[serde(skip)]
    kind_label: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TimelinePage {
    pub data: Vec<TimelineEntry>,
    #[schema(example = 1)]
    pub page: u64,
    #[schema(example = 10)]
    pub per_page: u64,
    #[schema(example = 42)]
    pub total: u64,
    #[schema(example = 5)]
    pub total_pages: u64,
}

fn attendance_entry(record: &AttendanceRecord) -> TimelineEntry {
    let display_status = match record.status {
        AttendanceStatus::Valid => DisplayStatus::Hadir,
        AttendanceStatus::Terlambat => DisplayStatus::Terlambat,
        AttendanceStatus::Invalid => DisplayStatus::Invalid,
    };

    let mut detail = format!(
        "{} pukul {}",
        record.tipe,
        record.occurred_at.format("%H:%M")
    );
    if let Some(address) = &record.address {
        detail.push_str(&format!(" - {}", address));
    }
    if let Some(note) = &record.note {
        detail.push_str(&format!(" ({})", note));
    }

    TimelineEntry {
        id: format!("A-{}", record.id),
        source: SourceKind::Attendance,
        subject_id: record.subject_id,
        subject_name: record.subject_name.clone(),
        event_time: record.occurred_at,
        display_status,
        display_color: display_status.color(),
        detail,
        evidence_ref: record.proof_image_ref.clone(),
        original: serde_json::to_value(record).unwrap_or(serde_json::Value::Null),
        kind_label: record.tipe.to_string(),
    }
}

fn leave_entry(request: &LeaveRequest) -> TimelineEntry {
    let display_status = match request.status {
        LeaveStatus::Pending => DisplayStatus::Pending,
        LeaveStatus::Ditolak => DisplayStatus::Ditolak,
        // approved requests surface as their leave kind
        LeaveStatus::Disetujui => match request.kind {
            LeaveType::Sakit => DisplayStatus::Sakit,
            LeaveType::Izin => DisplayStatus::Izin,
            LeaveType::Cuti => DisplayStatus::Cuti,
        },
    };

    let detail = format!(
        "{} {} s/d {}: {}",
        request.kind, request.start_date, request.end_date, request.reason
    );

    TimelineEntry {
        id: format!("L-{}", request.id),
        source: SourceKind::Leave,
        subject_id: request.subject_id,
        subject_name: request.subject_name.clone(),
        event_time: request.submitted_at,
        display_status,
        display_color: display_status.color(),
        detail,
        evidence_ref: request.supporting_document_ref.clone(),
        original: serde_json::to_value(request).unwrap_or(serde_json::Value::Null),
        kind_label: request.kind.to_string(),
    }
}

fn matches(entry: &TimelineEntry, filter: &TimelineFilter) -> bool {
    if let Some(bucket) = filter.bucket {
        if entry.display_status.bucket() != bucket {
            return false;
        }
    }

    if let Some(q) = filter.q.as_deref() {
        let q = q.trim().to_lowercase();
        if !q.is_empty() {
            let name_hit = entry
                .subject_name
                .as_deref()
                .map(|n| n.to_lowercase().contains(&q))
                .unwrap_or(false);
            let kind_hit = entry.kind_label.to_lowercase().contains(&q);
            if !name_hit && !kind_hit {
                return false;
            }
        }
    }

    true
}

/// Merges both record streams into one ordered page. Filtering happens
/// before sorting and pagination; PENDING entries outrank everything
/// regardless of age, then recency decides. The sort is stable, so true
/// timestamp ties keep their input order. Pure in-memory transform,
/// cannot fail: empty inputs yield an empty page with `total = 0`.
pub fn reconcile(
    attendance: &[AttendanceRecord],
    leave: &[LeaveRequest],
    filter: &TimelineFilter,
    page: u64,
    per_page: u64,
) -> TimelinePage {
    let per_page = per_page.clamp(1, 100);
    let page = page.max(1);

    let mut entries: Vec<TimelineEntry> = attendance
        .iter()
        .map(attendance_entry)
        .chain(leave.iter().map(leave_entry))
        .filter(|e| matches(e, filter))
        .collect();

    entries.sort_by(|a, b| {
        let rank = |e: &TimelineEntry| u8::from(e.display_status != DisplayStatus::Pending);
        rank(a)
            .cmp(&rank(b))
            .then(b.event_time.cmp(&a.event_time))
    });

    let total = entries.len() as u64;
    let total_pages = (total + per_page - 1) / per_page;
    let offset = ((page - 1) * per_page) as usize;

    let data = entries
        .into_iter()
        .skip(offset)
        .take(per_page as usize)
        .collect();

    TimelinePage {
        data,
        page,
        per_page,
        total,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::AttendanceType;
    use chrono::NaiveDate;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn attendance(id: u64, status: AttendanceStatus, occurred_at: NaiveDateTime) -> AttendanceRecord {
        AttendanceRecord {
            id,
            subject_id: 1000,
            subject_name: Some("Budi Santoso".into()),
            tipe: AttendanceType::Masuk,
            occurred_at,
            latitude: None,
            longitude: None,
            address: None,
            proof_image_ref: None,
            session_token: "tok".into(),
            status,
            note: None,
            created_at: None,
        }
    }

    fn leave(id: u64, status: LeaveStatus, submitted_at: NaiveDateTime) -> LeaveRequest {
        LeaveRequest {
            id,
            subject_id: 2000,
            subject_name: Some("Siti Aminah".into()),
            kind: LeaveType::Sakit,
            start_date: submitted_at.date(),
            end_date: submitted_at.date(),
            reason: "demam".into(),
            supporting_document_ref: None,
            status,
            submitted_at,
            resolved_at: None,
            resolved_by: None,
            resolution_note: None,
        }
    }

    #[test]
    fn empty_inputs_yield_an_empty_page() {
        let page = reconcile(&[], &[], &TimelineFilter::default(), 1, 10);
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.data.is_empty());
    }

    #[test]
    fn pending_outranks_newer_records() {
        let records = [attendance(1, AttendanceStatus::Valid, at(6, 8, 0))];
        let requests = [leave(1, LeaveStatus::Pending, at(5, 19, 30))];

        let page = reconcile(&records, &requests, &TimelineFilter::default(), 1, 10);
        assert_eq!(page.data[0].id, "L-1");
        assert_eq!(page.data[0].display_status, DisplayStatus::Pending);
        assert_eq!(page.data[1].id, "A-1");
    }

    #[test]
    fn non_pending_entries_sort_most_recent_first() {
        let records = [
            attendance(1, AttendanceStatus::Valid, at(5, 8, 0)),
            attendance(2, AttendanceStatus::Terlambat, at(6, 8, 20)),
        ];
        let page = reconcile(&records, &[], &TimelineFilter::default(), 1, 10);
        assert_eq!(page.data[0].id, "A-2");
        assert_eq!(page.data[1].id, "A-1");
    }

    #[test]
    fn timestamp_ties_keep_input_order() {
        let records = [
            attendance(1, AttendanceStatus::Valid, at(6, 8, 0)),
            attendance(2, AttendanceStatus::Valid, at(6, 8, 0)),
        ];
        let page = reconcile(&records, &[], &TimelineFilter::default(), 1, 10);
        assert_eq!(page.data[0].id, "A-1");
        assert_eq!(page.data[1].id, "A-2");
    }

    #[test]
    fn approved_leave_is_labelled_by_kind() {
        let requests = [leave(1, LeaveStatus::Disetujui, at(5, 19, 30))];
        let page = reconcile(&[], &requests, &TimelineFilter::default(), 1, 10);
        assert_eq!(page.data[0].display_status, DisplayStatus::Sakit);
        assert_eq!(page.data[0].display_color, "purple");
    }

    #[test]
    fn bucket_filter_selects_one_family() {
        let records = [attendance(1, AttendanceStatus::Valid, at(6, 8, 0))];
        let requests = [
            leave(1, LeaveStatus::Pending, at(5, 19, 30)),
            leave(2, LeaveStatus::Disetujui, at(4, 10, 0)),
        ];

        let filter = TimelineFilter {
            bucket: Some(StatusBucket::Izin),
            q: None,
        };
        let page = reconcile(&records, &requests, &filter, 1, 10);
        assert_eq!(page.total, 1);
        assert_eq!(page.data[0].id, "L-2");
    }

    #[test]
    fn free_text_matches_name_and_kind() {
        let records = [attendance(1, AttendanceStatus::Valid, at(6, 8, 0))];
        let requests = [leave(1, LeaveStatus::Pending, at(5, 19, 30))];

        let by_name = TimelineFilter {
            bucket: None,
            q: Some("siti".into()),
        };
        let page = reconcile(&records, &requests, &by_name, 1, 10);
        assert_eq!(page.total, 1);
        assert_eq!(page.data[0].id, "L-1");

        let by_kind = TimelineFilter {
            bucket: None,
            q: Some("masuk".into()),
        };
        let page = reconcile(&records, &requests, &by_kind, 1, 10);
        assert_eq!(page.total, 1);
        assert_eq!(page.data[0].id, "A-1");
    }

    #[test]
    fn pagination_counts_the_filtered_set() {
        let records: Vec<_> = (1..=7)
            .map(|i| attendance(i, AttendanceStatus::Valid, at(5, 8, i as u32)))
            .collect();

        let page = reconcile(&records, &[], &TimelineFilter::default(), 2, 3);
        assert_eq!(page.total, 7);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.data.len(), 3);
        // page 2 of a descending sort: minutes 4, 3, 2
        assert_eq!(page.data[0].id, "A-4");

        let past_end = reconcile(&records, &[], &TimelineFilter::default(), 5, 3);
        assert!(past_end.data.is_empty());
        assert_eq!(past_end.total, 7);
    }
}
