use crate::{
    api::{
        methods::require_state,
        types::{GenerateSessionParams, SessionTokenResponse},
    },
    error::Result,
    services::session::generate_session_token,
};

pub async fn generate_session(params: GenerateSessionParams) -> Result<SessionTokenResponse> {
    let app_state = require_state(params.state)?;
    let config = &app_state.config.session;

    Ok(SessionTokenResponse {
        session_id: generate_session_token(&config.token_prefix, config.token_length),
    })
}
