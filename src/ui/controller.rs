use std::collections::HashMap;

use crate::{
    config::Config,
    error::{AppError, Result},
    services::{qr::QrImageRequest, session::generate_session_token},
    ui::{
        controls::{ClickEvent, Control, PAIR_SERVER_CLASS, QR_SERVER_CLASS, element},
        effects::Effect,
        markup::PageMarkup,
        state::{Display, UiState},
    },
};

/// Read-only settings the handlers need.
#[derive(Debug, Clone)]
pub struct HandlerContext {
    pub qr_api_url: String,
    pub qr_size: u32,
    pub token_prefix: String,
    pub token_length: usize,
}

impl HandlerContext {
    pub fn from_config(config: &Config) -> Self {
        Self {
            qr_api_url: config.qr.api_url.clone(),
            qr_size: config.qr.size,
            token_prefix: config.session.token_prefix.clone(),
            token_length: config.session.token_length,
        }
    }
}

type Handler = fn(&UiState, &ClickEvent, &HandlerContext) -> Vec<Effect>;

pub struct UiController {
    handlers: HashMap<Control, Handler>,
    context: HandlerContext,
}

impl UiController {
    /// Registers a handler for every control present on `markup`.
    ///
    /// Fails on the first required element id the page lacks. Server button
    /// groups are optional; a group with no buttons gets no handler.
    pub fn bind(context: HandlerContext, markup: &PageMarkup) -> Result<Self> {
        if let Some(missing) = element::REQUIRED.iter().find(|id| !markup.has_id(id)) {
            return Err(AppError::MissingElement(missing.to_string()));
        }

        let mut handlers: HashMap<Control, Handler> = HashMap::new();
        handlers.insert(Control::OpenPanel, open_panel);
        handlers.insert(Control::ClosePanel, close_panel);
        handlers.insert(Control::GenerateSession, generate_session);
        handlers.insert(Control::GenerateQr, generate_qr);

        let pair_buttons = markup.server_buttons(PAIR_SERVER_CLASS).count();
        if pair_buttons > 0 {
            handlers.insert(Control::PairServer, select_pair_server);
        }
        let qr_buttons = markup.server_buttons(QR_SERVER_CLASS).count();
        if qr_buttons > 0 {
            handlers.insert(Control::QrServer, select_qr_server);
        }

        tracing::debug!(
            controls = handlers.len(),
            pair_buttons,
            qr_buttons,
            "UI controller bound"
        );

        Ok(Self { handlers, context })
    }

    pub fn is_bound(&self, control: Control) -> bool {
        self.handlers.contains_key(&control)
    }

    /// Runs the handler for `event.control` and folds its effects into `state`.
    pub fn dispatch(&self, state: &mut UiState, event: &ClickEvent) -> Result<Vec<Effect>> {
        let handler = self
            .handlers
            .get(&event.control)
            .ok_or_else(|| AppError::UnknownControl(event.control.to_string()))?;

        if let Some(input) = &event.input {
            state.qr_input = input.clone();
        }

        let effects = handler(state, event, &self.context);
        state.apply(&effects);

        Ok(effects)
    }

    pub fn complete_image_load(&self, state: &mut UiState, generation: u64) -> bool {
        state.complete_image_load(generation)
    }
}

fn open_panel(_: &UiState, _: &ClickEvent, _: &HandlerContext) -> Vec<Effect> {
    vec![
        Effect::set_display(element::SECTION, Display::Block),
        Effect::set_display(element::OPEN_BUTTON, Display::None),
    ]
}

fn close_panel(_: &UiState, _: &ClickEvent, _: &HandlerContext) -> Vec<Effect> {
    vec![
        Effect::set_display(element::SECTION, Display::None),
        Effect::set_display(element::OPEN_BUTTON, Display::InlineBlock),
    ]
}

fn generate_session(_: &UiState, _: &ClickEvent, context: &HandlerContext) -> Vec<Effect> {
    let token = generate_session_token(&context.token_prefix, context.token_length);
    vec![Effect::set_value(element::SESSION_FIELD, token)]
}

fn generate_qr(state: &UiState, _: &ClickEvent, context: &HandlerContext) -> Vec<Effect> {
    let Some(request) =
        QrImageRequest::for_input(&context.qr_api_url, context.qr_size, &state.qr_input)
    else {
        return vec![];
    };

    vec![
        Effect::ClearCanvas {
            element: element::QR_CANVAS.to_string(),
            width: request.size(),
            height: request.size(),
        },
        Effect::LoadImage {
            element: element::QR_CANVAS.to_string(),
            url: request.url(),
            size: request.size(),
            generation: state.generation + 1,
        },
    ]
}

fn select_pair_server(_: &UiState, event: &ClickEvent, _: &HandlerContext) -> Vec<Effect> {
    vec![Effect::alert(format!(
        "Pair Code Server {} selected!",
        server_label(event)
    ))]
}

fn select_qr_server(_: &UiState, event: &ClickEvent, _: &HandlerContext) -> Vec<Effect> {
    vec![Effect::alert(format!(
        "QR Code Server {} selected!",
        server_label(event)
    ))]
}

// A button without `data-server` reads as `undefined` in the browser.
fn server_label(event: &ClickEvent) -> &str {
    event.server.as_deref().unwrap_or("undefined")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::state::PanelState;

    fn controller() -> UiController {
        let config = Config::local("0123456789abcdef0123456789abcdef");
        UiController::bind(
            HandlerContext::from_config(&config),
            &PageMarkup::godzexmd(3, 3),
        )
        .unwrap()
    }

    fn click(controller: &UiController, state: &mut UiState, event: ClickEvent) -> Vec<Effect> {
        controller.dispatch(state, &event).unwrap()
    }

    #[test]
    fn open_shows_section_and_hides_button() {
        let controller = controller();
        let mut state = UiState::new();

        let effects = click(&controller, &mut state, ClickEvent::new(Control::OpenPanel));

        assert!(effects.contains(&Effect::set_display(element::SECTION, Display::Block)));
        assert!(effects.contains(&Effect::set_display(element::OPEN_BUTTON, Display::None)));
        assert_eq!(state.panel, PanelState::Open);
    }

    #[test]
    fn repeated_open_changes_nothing_further() {
        let controller = controller();
        let mut state = UiState::new();

        click(&controller, &mut state, ClickEvent::new(Control::OpenPanel));
        let after_first = state.clone();
        click(&controller, &mut state, ClickEvent::new(Control::OpenPanel));

        assert_eq!(state, after_first);
    }

    #[test]
    fn close_returns_to_initial_state() {
        let controller = controller();
        let mut state = UiState::new();

        click(&controller, &mut state, ClickEvent::new(Control::OpenPanel));
        let effects = click(&controller, &mut state, ClickEvent::new(Control::ClosePanel));

        assert!(effects.contains(&Effect::set_display(element::SECTION, Display::None)));
        assert!(effects.contains(&Effect::set_display(
            element::OPEN_BUTTON,
            Display::InlineBlock
        )));
        assert_eq!(state, UiState::new());
    }

    #[test]
    fn session_token_is_written_and_overwritten() {
        let controller = controller();
        let mut state = UiState::new();

        click(&controller, &mut state, ClickEvent::new(Control::GenerateSession));
        let first = state.session_id.clone();
        assert!(first.starts_with("GODZEXMD-"));
        assert_eq!(first.len(), "GODZEXMD-".len() + 10);

        click(&controller, &mut state, ClickEvent::new(Control::GenerateSession));
        assert!(state.session_id.starts_with("GODZEXMD-"));
    }

    #[test]
    fn blank_qr_input_is_a_silent_no_op() {
        let controller = controller();
        let mut state = UiState::new();

        let effects = click(
            &controller,
            &mut state,
            ClickEvent::new(Control::GenerateQr).with_input("  "),
        );

        assert!(effects.is_empty());
        assert_eq!(state.canvas.pending, None);
        assert_eq!(state.generation, 0);
    }

    #[test]
    fn qr_request_targets_remote_api() {
        let controller = controller();
        let mut state = UiState::new();

        let effects = click(
            &controller,
            &mut state,
            ClickEvent::new(Control::GenerateQr).with_input("hello"),
        );

        let Some(Effect::LoadImage {
            url, generation, ..
        }) = effects.last()
        else {
            panic!("expected an image load, got {effects:?}");
        };
        assert!(url.contains("data=hello"));
        assert!(url.contains("size=180x180"));
        assert_eq!(*generation, 1);
        assert_eq!(state.canvas.width, 180);
        assert_eq!(state.canvas.height, 180);
    }

    #[test]
    fn newer_qr_request_wins_over_stale_load() {
        let controller = controller();
        let mut state = UiState::new();

        click(
            &controller,
            &mut state,
            ClickEvent::new(Control::GenerateQr).with_input("first"),
        );
        click(
            &controller,
            &mut state,
            ClickEvent::new(Control::GenerateQr).with_input("second"),
        );

        assert!(!controller.complete_image_load(&mut state, 1));
        assert!(controller.complete_image_load(&mut state, 2));
        assert!(state.canvas.drawn.as_deref().unwrap().contains("data=second"));
    }

    #[test]
    fn pair_server_alert_names_server() {
        let controller = controller();
        let mut state = UiState::new();

        let effects = click(
            &controller,
            &mut state,
            ClickEvent::new(Control::PairServer).with_server("3"),
        );

        assert_eq!(effects, vec![Effect::alert("Pair Code Server 3 selected!")]);
        assert_eq!(state, UiState::new());
    }

    #[test]
    fn qr_server_alert_without_attribute() {
        let controller = controller();
        let mut state = UiState::new();

        let effects = click(&controller, &mut state, ClickEvent::new(Control::QrServer));

        assert_eq!(effects, vec![Effect::alert("QR Code Server undefined selected!")]);
    }

    #[test]
    fn binding_fails_on_missing_element() {
        let config = Config::local("0123456789abcdef0123456789abcdef");
        let markup = PageMarkup::godzexmd(1, 1).without_id(element::QR_CANVAS);

        let err = UiController::bind(HandlerContext::from_config(&config), &markup)
            .err()
            .unwrap();

        assert!(matches!(err, AppError::MissingElement(id) if id == "qr-canvas"));
    }

    #[test]
    fn empty_server_group_has_no_handler() {
        let config = Config::local("0123456789abcdef0123456789abcdef");
        let controller =
            UiController::bind(HandlerContext::from_config(&config), &PageMarkup::godzexmd(2, 0))
                .unwrap();

        assert!(controller.is_bound(Control::PairServer));
        assert!(!controller.is_bound(Control::QrServer));

        let err = controller
            .dispatch(&mut UiState::new(), &ClickEvent::new(Control::QrServer))
            .unwrap_err();
        assert!(matches!(err, AppError::UnknownControl(_)));
    }
}
