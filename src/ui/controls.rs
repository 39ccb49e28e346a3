use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Element ids the page must carry.
pub mod element {
    pub const OPEN_BUTTON: &str = "godzexmd-btn";
    pub const SECTION: &str = "godzexmd-section";
    pub const BACK_BUTTON: &str = "back-btn";
    pub const GENERATE_SESSION: &str = "generate-session";
    pub const SESSION_FIELD: &str = "session-id";
    pub const QR_CANVAS: &str = "qr-canvas";
    pub const GENERATE_QR: &str = "generate-qr";
    pub const QR_INPUT: &str = "qr-input";

    pub const REQUIRED: [&str; 8] = [
        OPEN_BUTTON,
        SECTION,
        BACK_BUTTON,
        GENERATE_SESSION,
        SESSION_FIELD,
        QR_CANVAS,
        GENERATE_QR,
        QR_INPUT,
    ];
}

pub const PAIR_SERVER_CLASS: &str = "pair-server";
pub const QR_SERVER_CLASS: &str = "qr-server";

/// Something the user can click. Ids and classes double as wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    #[serde(rename = "godzexmd-btn")]
    OpenPanel,
    #[serde(rename = "back-btn")]
    ClosePanel,
    #[serde(rename = "generate-session")]
    GenerateSession,
    #[serde(rename = "generate-qr")]
    GenerateQr,
    #[serde(rename = "pair-server")]
    PairServer,
    #[serde(rename = "qr-server")]
    QrServer,
}

impl Control {
    pub const ALL: [Control; 6] = [
        Control::OpenPanel,
        Control::ClosePanel,
        Control::GenerateSession,
        Control::GenerateQr,
        Control::PairServer,
        Control::QrServer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Control::OpenPanel => element::OPEN_BUTTON,
            Control::ClosePanel => element::BACK_BUTTON,
            Control::GenerateSession => element::GENERATE_SESSION,
            Control::GenerateQr => element::GENERATE_QR,
            Control::PairServer => PAIR_SERVER_CLASS,
            Control::QrServer => QR_SERVER_CLASS,
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Control {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Control::ALL
            .into_iter()
            .find(|control| control.as_str() == value)
            .ok_or_else(|| AppError::UnknownControl(value.to_string()))
    }
}

/// One click as reported by the browser.
///
/// `server` carries the button's `data-server` attribute and `input` the
/// current `qr-input` value; both are only read by the handlers that need them.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub control: Control,
    pub server: Option<String>,
    pub input: Option<String>,
}

impl ClickEvent {
    pub fn new(control: Control) -> Self {
        Self {
            control,
            server: None,
            input: None,
        }
    }

    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip_through_from_str() {
        for control in Control::ALL {
            assert_eq!(control.as_str().parse::<Control>().unwrap(), control);
        }
    }

    #[test]
    fn unknown_control_is_rejected() {
        let err = "self-destruct".parse::<Control>().unwrap_err();
        assert!(matches!(err, AppError::UnknownControl(name) if name == "self-destruct"));
    }

    #[test]
    fn serde_uses_element_names() {
        let json = serde_json::to_string(&Control::OpenPanel).unwrap();
        assert_eq!(json, "\"godzexmd-btn\"");
    }
}
