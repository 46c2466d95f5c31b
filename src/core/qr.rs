use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use chrono::NaiveDateTime;
use moka::sync::Cache;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::model::qr_session::{QrKind, QrSession};

/// Sessions older than this are evicted regardless of count; an evicted
/// token reads back as UNKNOWN, same as one that was never issued.
const SESSION_RETENTION_SECS: u64 = 86_400;
const SESSION_CAPACITY: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[derive(strum_macros::Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum TokenFailReason {
    Expired,
    Unknown,
}

/// Validation verdict for a presented token. Never an error: a negative
/// verdict feeds status derivation and the scan is still recorded.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct TokenCheck {
    #[schema(example = true)]
    pub valid: bool,
    #[schema(example = "EXPIRED", nullable = true)]
    pub reason: Option<TokenFailReason>,
}

impl TokenCheck {
    pub fn ok() -> Self {
        TokenCheck {
            valid: true,
            reason: None,
        }
    }

    pub fn fail(reason: TokenFailReason) -> Self {
        TokenCheck {
            valid: false,
            reason: Some(reason),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IssueRequest {
    pub kind: QrKind,
    pub location_tag: String,
    pub validity_minutes: i64,
}

/// Keyed in-memory token store. Issuing never invalidates earlier
/// unexpired tokens; mobile clients cache the last QR image, so several
/// tokens may be concurrently valid for the same tag.
pub struct QrSessionManager {
    sessions: Cache<String, QrSession>,
    current_by_tag: RwLock<HashMap<String, String>>,
}

impl QrSessionManager {
    pub fn new() -> Self {
        QrSessionManager {
            sessions: Cache::builder()
                .max_capacity(SESSION_CAPACITY)
                .time_to_live(Duration::from_secs(SESSION_RETENTION_SECS))
                .build(),
            current_by_tag: RwLock::new(HashMap::new()),
        }
    }

    /// Issues a fresh token and makes it the current session for its
    /// location tag. `now` is caller-supplied; the manager has no clock.
    pub fn issue(&self, req: IssueRequest, now: NaiveDateTime) -> QrSession {
        let session = QrSession {
            token: Uuid::new_v4().to_string(),
            kind: req.kind,
            issued_at: now,
            expires_at: now + chrono::Duration::minutes(req.validity_minutes.max(1)),
            location_tag: req.location_tag,
        };

        self.sessions
            .insert(session.token.clone(), session.clone());
        self.current_by_tag
            .write()
            .expect("qr session lock poisoned")
            .insert(session.location_tag.clone(), session.token.clone());

        session
    }

    /// A token is valid iff it is known and `issued_at <= now <= expires_at`.
    /// Expiry is evaluated lazily here; there is no background sweep.
    pub fn validate(&self, token: &str, now: NaiveDateTime) -> TokenCheck {
        match self.sessions.get(token) {
            None => TokenCheck::fail(TokenFailReason::Unknown),
            Some(session) => {
                if now < session.issued_at || now > session.expires_at {
                    TokenCheck::fail(TokenFailReason::Expired)
                } else {
                    TokenCheck::ok()
                }
            }
        }
    }

    /// Most recently issued session for a tag, if any.
    pub fn current(&self, location_tag: &str) -> Option<QrSession> {
        let token = self
            .current_by_tag
            .read()
            .expect("qr session lock poisoned")
            .get(location_tag)
            .cloned()?;
        self.sessions.get(&token)
    }
}

impl Default for QrSessionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 5)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn request() -> IssueRequest {
        IssueRequest {
            kind: QrKind::Masuk,
            location_tag: "kantor-pusat".into(),
            validity_minutes: 5,
        }
    }

    #[test]
    fn issued_token_validates_within_window() {
        let manager = QrSessionManager::new();
        let session = manager.issue(request(), at(8, 0, 0));

        assert!(manager.validate(&session.token, session.issued_at).valid);
        assert!(manager.validate(&session.token, session.expires_at).valid);
    }

    #[test]
    fn token_expires_one_second_past_window() {
        let manager = QrSessionManager::new();
        let session = manager.issue(request(), at(8, 0, 0));

        let check = manager.validate(&session.token, at(8, 5, 1));
        assert!(!check.valid);
        assert_eq!(check.reason, Some(TokenFailReason::Expired));
    }

    #[test]
    fn unknown_token_reports_unknown() {
        let manager = QrSessionManager::new();
        let check = manager.validate("never-issued", at(8, 0, 0));
        assert!(!check.valid);
        assert_eq!(check.reason, Some(TokenFailReason::Unknown));
    }

    #[test]
    fn reissue_keeps_older_token_valid() {
        let manager = QrSessionManager::new();
        let first = manager.issue(request(), at(8, 0, 0));
        let second = manager.issue(request(), at(8, 3, 0));

        // both inside their own windows
        assert!(manager.validate(&first.token, at(8, 4, 0)).valid);
        assert!(manager.validate(&second.token, at(8, 4, 0)).valid);

        // but only the newest is current for the tag
        let current = manager.current("kantor-pusat").unwrap();
        assert_eq!(current.token, second.token);
    }

    #[test]
    fn validation_before_issue_time_fails() {
        let manager = QrSessionManager::new();
        let session = manager.issue(request(), at(8, 0, 0));

        let check = manager.validate(&session.token, at(7, 59, 59));
        assert!(!check.valid);
        assert_eq!(check.reason, Some(TokenFailReason::Expired));
    }
}
