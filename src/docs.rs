use crate::api::attendance::{
    AttendanceFilter, AttendanceListResponse, OverrideStatus, ScanClaim, ScanResult,
};
use crate::api::leave_request::{LeaveFilter, LeaveListResponse, ResolveLeave};
use crate::api::qr::{CurrentQrQuery, IssueQr};
use crate::api::timeline::TimelineQuery;
use crate::core::geofence::GeofenceCheck;
use crate::core::qr::{TokenCheck, TokenFailReason};
use crate::core::timeline::{
    DisplayStatus, SourceKind, StatusBucket, TimelineEntry, TimelineFilter, TimelinePage,
};
use crate::model::attendance::{AttendanceRecord, AttendanceStatus, AttendanceType, GeoPoint};
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};
use crate::model::qr_session::{QrKind, QrSession};
use crate::model::settings::OfficeSettings;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Presensi API",
        version = "1.0.0",
        description = r#"
## Internship Attendance Service

Tracks internship-program attendance: participants check in against
time-limited QR tokens with geofenced location proof; administrators
review records, resolve leave requests and read one unified activity
timeline.

### 🔹 Key Features
- **QR check-in**
  - Time-windowed tokens per office location, lazy expiry
- **Geofenced validation**
  - Haversine distance against a configurable office radius
- **Attendance lifecycle**
  - VALID / TERLAMBAT / INVALID derivation, idempotent admin override
- **Leave management**
  - Submit, approve/reject once, administrative re-open
- **Unified timeline**
  - Both record streams merged, pending-first, paginated

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::qr::issue_qr,
        crate::api::qr::current_qr,

        crate::api::attendance::submit_scan,
        crate::api::attendance::list_attendance,
        crate::api::attendance::override_status,
        crate::api::attendance::delete_record,

        crate::api::leave_request::create_leave,
        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,
        crate::api::leave_request::reopen_leave,

        crate::api::timeline::unified_timeline,

        crate::api::settings::get_settings,
        crate::api::settings::update_settings
    ),
    components(
        schemas(
            ScanClaim,
            ScanResult,
            AttendanceFilter,
            AttendanceListResponse,
            OverrideStatus,
            AttendanceRecord,
            AttendanceStatus,
            AttendanceType,
            GeoPoint,
            GeofenceCheck,
            TokenCheck,
            TokenFailReason,
            QrSession,
            QrKind,
            IssueQr,
            CurrentQrQuery,
            LeaveRequest,
            LeaveStatus,
            LeaveType,
            LeaveFilter,
            LeaveListResponse,
            ResolveLeave,
            crate::core::leave::SubmitLeave,
            crate::core::leave::LeaveDecision,
            TimelineQuery,
            TimelineFilter,
            TimelinePage,
            TimelineEntry,
            DisplayStatus,
            SourceKind,
            StatusBucket,
            OfficeSettings
        )
    ),
    tags(
        (name = "QR", description = "Check-in token APIs"),
        (name = "Attendance", description = "Attendance validation APIs"),
        (name = "Leave", description = "Leave request APIs"),
        (name = "Timeline", description = "Unified activity timeline APIs"),
        (name = "Settings", description = "Geofence and timing settings APIs"),
    )
)]
pub struct ApiDoc;
