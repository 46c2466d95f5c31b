//! The validation and reconciliation engine. Everything here is
//! synchronous and clock-free: "now" is always a parameter, so the
//! whole module tests without an HTTP or database harness.

pub mod attendance;
pub mod error;
pub mod geofence;
pub mod leave;
pub mod qr;
pub mod timeline;
