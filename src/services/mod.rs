pub mod auth;
pub mod qr;
pub mod session;
pub mod ui;
