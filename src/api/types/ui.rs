use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, ui::Effect};

#[derive(Deserialize)]
pub struct LoadUiParams {
    pub ui_session: Option<Uuid>,

    #[serde(skip)]
    pub state: Option<AppState>,
}

#[derive(Debug, Serialize)]
pub struct LoadUiResponse {
    pub ui_session: Uuid,
    pub effects: Vec<Effect>,
}

#[derive(Deserialize)]
pub struct ClickParams {
    pub ui_session: Option<Uuid>,
    pub control: String,
    pub server: Option<String>,
    pub input: Option<String>,

    #[serde(skip)]
    pub state: Option<AppState>,
}

#[derive(Debug, Serialize)]
pub struct ClickResponse {
    pub effects: Vec<Effect>,
}

#[derive(Deserialize)]
pub struct ImageLoadedParams {
    pub ui_session: Option<Uuid>,
    pub generation: u64,

    #[serde(skip)]
    pub state: Option<AppState>,
}

#[derive(Debug, Serialize)]
pub struct ImageLoadedResponse {
    pub draw: bool,
}

#[derive(Deserialize)]
pub struct GenerateSessionParams {
    #[serde(skip)]
    pub state: Option<AppState>,
}

#[derive(Debug, Serialize)]
pub struct SessionTokenResponse {
    pub session_id: String,
}

#[derive(Deserialize)]
pub struct QrUrlParams {
    #[serde(default)]
    pub text: String,

    #[serde(skip)]
    pub state: Option<AppState>,
}

#[derive(Debug, Serialize)]
pub struct QrUrlResponse {
    pub url: Option<String>,
    pub size: u32,
}
