mod auth;
mod common;
mod ui;

pub use auth::*;
pub use common::*;
pub use ui::*;
