use serde::{Deserialize, Serialize};

use crate::ui::state::Display;

/// A single change the browser has to make.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    SetDisplay {
        element: String,
        display: Display,
    },
    SetValue {
        element: String,
        value: String,
    },
    /// Resize and blank the drawing surface.
    ClearCanvas {
        element: String,
        width: u32,
        height: u32,
    },
    /// Load `url` and draw it onto `element` once the load finishes and the
    /// server confirms `generation` is still current.
    LoadImage {
        element: String,
        url: String,
        size: u32,
        generation: u64,
    },
    Alert {
        message: String,
    },
}

impl Effect {
    pub fn set_display(element: &str, display: Display) -> Self {
        Effect::SetDisplay {
            element: element.to_string(),
            display,
        }
    }

    pub fn set_value(element: &str, value: impl Into<String>) -> Self {
        Effect::SetValue {
            element: element.to_string(),
            value: value.into(),
        }
    }

    pub fn alert(message: impl Into<String>) -> Self {
        Effect::Alert {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effects_are_tagged_for_the_shim() {
        let value = serde_json::to_value(Effect::set_display("godzexmd-btn", Display::None)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "type": "set_display", "element": "godzexmd-btn", "display": "none" })
        );
    }
}
