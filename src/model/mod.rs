pub mod attendance;
pub mod leave_request;
pub mod qr_session;
pub mod settings;
