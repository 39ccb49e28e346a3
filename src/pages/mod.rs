//! Server-rendered HTML: the account pages and the GODZEXMD panel page.

pub mod account;
pub mod flash;
pub mod godzexmd;
pub mod layout;

use axum::{Router, routing::get};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(account::index))
        .route("/signup", get(account::signup_form).post(account::signup))
        .route("/login", get(account::login_form).post(account::login))
        .route("/logout", get(account::logout))
        .route("/games", get(account::games))
        .route("/godzexmd", get(godzexmd::panel))
        .route("/static/script.js", get(godzexmd::script))
}
