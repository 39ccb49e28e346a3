use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
};

use crate::{
    AppState,
    ui::{
        PageMarkup,
        controls::{PAIR_SERVER_CLASS, QR_SERVER_CLASS, element},
    },
    utils::encoding::escape_html,
};

const SCRIPT: &str = include_str!("../../assets/script.js");

pub async fn panel(State(state): State<AppState>) -> Html<String> {
    Html(render_panel(&state.page, state.config.qr.size))
}

pub async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        SCRIPT,
    )
}

fn server_buttons(markup: &PageMarkup, class: &str) -> String {
    markup
        .server_buttons(class)
        .map(|button| {
            let server = button
                .server
                .as_deref()
                .map(|server| format!(r#" data-server="{}""#, escape_html(server)))
                .unwrap_or_default();
            format!(
                r#"        <button class="{class}"{server}>{label}</button>
"#,
                class = button.class,
                label = escape_html(&button.label),
            )
        })
        .collect()
}

fn render_panel(markup: &PageMarkup, qr_size: u32) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>GODZEXMD</title>
</head>
<body style="font-family: Arial;">
    <button id="{open}">GODZEXMD</button>

    <div id="{section}" style="display: none;">
        <button id="{back}">Back</button>

        <h2>Session</h2>
        <button id="{generate_session}">Generate Session ID</button>
        <input type="text" id="{session_field}" readonly>

        <h2>Pair Code Servers</h2>
{pair_buttons}
        <h2>QR Code</h2>
        <input type="text" id="{qr_input}" placeholder="Text to encode">
        <button id="{generate_qr}">Generate QR</button>
        <canvas id="{canvas}" width="{qr_size}" height="{qr_size}"></canvas>

        <h2>QR Code Servers</h2>
{qr_buttons}    </div>

    <p><a href="/">Back to Home</a></p>
    <script src="/static/script.js"></script>
</body>
</html>
"#,
        open = element::OPEN_BUTTON,
        section = element::SECTION,
        back = element::BACK_BUTTON,
        generate_session = element::GENERATE_SESSION,
        session_field = element::SESSION_FIELD,
        qr_input = element::QR_INPUT,
        generate_qr = element::GENERATE_QR,
        canvas = element::QR_CANVAS,
        pair_buttons = server_buttons(markup, PAIR_SERVER_CLASS),
        qr_buttons = server_buttons(markup, QR_SERVER_CLASS),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_page_carries_every_controller_id() {
        let html = render_panel(&PageMarkup::godzexmd(3, 3), 180);

        for id in element::REQUIRED {
            assert!(html.contains(&format!(r#"id="{id}""#)), "missing {id}");
        }
        assert!(html.contains(r#"<button class="pair-server" data-server="3">"#));
        assert!(html.contains(r#"<button class="qr-server" data-server="1">"#));
        assert!(html.contains(r#"width="180" height="180""#));
    }

    #[test]
    fn controls_bind_only_after_page_session_loads() {
        let load = SCRIPT.find("rpc('ui.load'").expect("script loads the page session");
        let bind = SCRIPT.find("bindControls();").expect("script binds controls");
        assert!(load < bind, "controls must be bound inside the ui.load callback");
        assert_eq!(SCRIPT.matches("bindControls();").count(), 1);
    }

    #[test]
    fn section_starts_hidden() {
        let html = render_panel(&PageMarkup::godzexmd(1, 1), 180);
        assert!(html.contains(r#"<div id="godzexmd-section" style="display: none;">"#));
    }

    #[test]
    fn button_without_server_attribute_renders_bare() {
        let markup = PageMarkup::godzexmd(0, 0).with_server_button(QR_SERVER_CLASS, None, "Mystery");
        let html = render_panel(&markup, 180);
        assert!(html.contains(r#"<button class="qr-server">Mystery</button>"#));
    }
}
