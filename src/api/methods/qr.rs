use crate::{
    api::{
        methods::require_state,
        types::{QrUrlParams, QrUrlResponse},
    },
    error::Result,
    services::qr::QrImageRequest,
};

pub async fn build_qr_url(params: QrUrlParams) -> Result<QrUrlResponse> {
    let app_state = require_state(params.state)?;
    let config = &app_state.config.qr;

    let url = QrImageRequest::for_input(&config.api_url, config.size, &params.text)
        .map(|request| request.url());

    Ok(QrUrlResponse {
        url,
        size: config.size,
    })
}
