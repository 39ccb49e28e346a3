pub mod encoding;
pub mod security;
pub mod server;
