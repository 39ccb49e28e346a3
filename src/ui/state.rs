use serde::{Deserialize, Serialize};

use crate::ui::{controls::element, effects::Effect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelState {
    #[default]
    Closed,
    Open,
}

/// CSS `display` values the page toggles between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Display {
    #[serde(rename = "block")]
    Block,
    #[serde(rename = "inline-block")]
    InlineBlock,
    #[serde(rename = "none")]
    None,
}

impl Display {
    pub fn is_visible(&self) -> bool {
        !matches!(self, Display::None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingImage {
    pub url: String,
    pub generation: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrCanvas {
    pub width: u32,
    pub height: u32,
    pub pending: Option<PendingImage>,
    pub drawn: Option<String>,
}

/// Everything the page shows that the handlers care about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    pub panel: PanelState,
    pub session_id: String,
    pub qr_input: String,
    pub canvas: QrCanvas,
    /// Generation of the most recent image request.
    pub generation: u64,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section_display(&self) -> Display {
        match self.panel {
            PanelState::Open => Display::Block,
            PanelState::Closed => Display::None,
        }
    }

    pub fn open_button_display(&self) -> Display {
        match self.panel {
            PanelState::Open => Display::None,
            PanelState::Closed => Display::InlineBlock,
        }
    }

    pub fn apply(&mut self, effects: &[Effect]) {
        for effect in effects {
            self.apply_one(effect);
        }
    }

    fn apply_one(&mut self, effect: &Effect) {
        match effect {
            Effect::SetDisplay { element, display } if element == element::SECTION => {
                self.panel = if display.is_visible() {
                    PanelState::Open
                } else {
                    PanelState::Closed
                };
            }
            Effect::SetValue { element, value } if element == element::SESSION_FIELD => {
                self.session_id = value.clone();
            }
            Effect::SetValue { element, value } if element == element::QR_INPUT => {
                self.qr_input = value.clone();
            }
            Effect::ClearCanvas { width, height, .. } => {
                self.canvas.width = *width;
                self.canvas.height = *height;
                self.canvas.drawn = None;
            }
            Effect::LoadImage {
                url, generation, ..
            } => {
                self.canvas.pending = Some(PendingImage {
                    url: url.clone(),
                    generation: *generation,
                });
                self.generation = self.generation.max(*generation);
            }
            // The open button mirrors the panel and alerts leave no trace.
            _ => {}
        }
    }

    /// Accepts a finished image load if it belongs to the latest request.
    pub fn complete_image_load(&mut self, generation: u64) -> bool {
        match &self.canvas.pending {
            Some(pending) if pending.generation == generation && generation == self.generation => {
                self.canvas.drawn = Some(pending.url.clone());
                self.canvas.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Effects that bring a freshly loaded page up to this state.
    pub fn restore_effects(&self) -> Vec<Effect> {
        let mut effects = vec![
            Effect::set_display(element::SECTION, self.section_display()),
            Effect::set_display(element::OPEN_BUTTON, self.open_button_display()),
            Effect::set_value(element::SESSION_FIELD, self.session_id.clone()),
            Effect::set_value(element::QR_INPUT, self.qr_input.clone()),
        ];

        let image = self
            .canvas
            .pending
            .as_ref()
            .map(|pending| pending.url.clone())
            .or_else(|| self.canvas.drawn.clone());

        if let Some(url) = image {
            effects.push(Effect::ClearCanvas {
                element: element::QR_CANVAS.to_string(),
                width: self.canvas.width,
                height: self.canvas.height,
            });
            effects.push(Effect::LoadImage {
                element: element::QR_CANVAS.to_string(),
                url,
                size: self.canvas.width,
                generation: self.generation,
            });
        }

        effects
    }
}
