pub mod attendance;
pub mod leave_request;
pub mod qr;
pub mod settings;
pub mod timeline;
