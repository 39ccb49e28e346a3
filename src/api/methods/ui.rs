use crate::{
    api::{
        methods::require_state,
        types::{
            ClickParams, ClickResponse, ImageLoadedParams, ImageLoadedResponse, LoadUiParams,
            LoadUiResponse,
        },
    },
    error::{AppError, Result},
    services::ui as ui_service,
    ui::{ClickEvent, Control},
};

pub async fn load_ui(params: LoadUiParams) -> Result<LoadUiResponse> {
    let app_state = require_state(params.state)?;

    let (ui_session, effects) = ui_service::load_page(&app_state, params.ui_session).await;

    Ok(LoadUiResponse {
        ui_session,
        effects,
    })
}

pub async fn click_control(params: ClickParams) -> Result<ClickResponse> {
    let app_state = require_state(params.state)?;
    let ui_session = params.ui_session.ok_or(AppError::UiSessionNotFound)?;

    let event = ClickEvent {
        control: params.control.parse::<Control>()?,
        server: params.server,
        input: params.input,
    };

    let effects = ui_service::click(&app_state, ui_session, event).await?;

    Ok(ClickResponse { effects })
}

pub async fn image_loaded(params: ImageLoadedParams) -> Result<ImageLoadedResponse> {
    let app_state = require_state(params.state)?;
    let ui_session = params.ui_session.ok_or(AppError::UiSessionNotFound)?;

    let draw = ui_service::image_loaded(&app_state, ui_session, params.generation).await?;

    Ok(ImageLoadedResponse { draw })
}
