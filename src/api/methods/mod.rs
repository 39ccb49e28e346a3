use crate::{
    AppState,
    error::{AppError, Result},
};

pub mod auth;
pub mod qr;
pub mod session;
pub mod ui;

fn require_state(state: Option<AppState>) -> Result<AppState> {
    state.ok_or(AppError::InternalServerError(
        "Failed to get app state".to_string(),
    ))
}
