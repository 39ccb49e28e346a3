mod common;

use common::{Jar, app, app_with, rpc};
use godzexmd::config::Config;
use serde_json::{Value, json};

fn effects(response: &Value) -> &Vec<Value> {
    response["result"]["effects"]
        .as_array()
        .unwrap_or_else(|| panic!("no effects in {response}"))
}

async fn loaded(app: &axum::Router) -> Jar {
    let mut jar = Jar::default();
    let response = rpc(app, &mut jar, "ui.load", json!({})).await;
    assert!(response["result"]["ui_session"].is_string());
    assert!(jar.get("ui_session").is_some());
    jar
}

#[tokio::test]
async fn fresh_page_starts_closed() {
    let app = app().await;
    let mut jar = Jar::default();

    let response = rpc(&app, &mut jar, "ui.load", Value::Null).await;
    let effects = effects(&response);

    assert!(effects.contains(&json!({
        "type": "set_display", "element": "godzexmd-section", "display": "none"
    })));
    assert!(effects.contains(&json!({
        "type": "set_display", "element": "godzexmd-btn", "display": "inline-block"
    })));
}

#[tokio::test]
async fn open_then_close_panel() {
    let app = app().await;
    let mut jar = loaded(&app).await;

    let open = rpc(&app, &mut jar, "ui.click", json!({ "control": "godzexmd-btn" })).await;
    assert_eq!(
        effects(&open),
        &vec![
            json!({ "type": "set_display", "element": "godzexmd-section", "display": "block" }),
            json!({ "type": "set_display", "element": "godzexmd-btn", "display": "none" }),
        ]
    );

    let close = rpc(&app, &mut jar, "ui.click", json!({ "control": "back-btn" })).await;
    assert_eq!(
        effects(&close),
        &vec![
            json!({ "type": "set_display", "element": "godzexmd-section", "display": "none" }),
            json!({ "type": "set_display", "element": "godzexmd-btn", "display": "inline-block" }),
        ]
    );
}

#[tokio::test]
async fn reload_restores_open_panel_and_token() {
    let app = app().await;
    let mut jar = loaded(&app).await;

    rpc(&app, &mut jar, "ui.click", json!({ "control": "godzexmd-btn" })).await;
    let generated = rpc(&app, &mut jar, "ui.click", json!({ "control": "generate-session" })).await;
    let token = effects(&generated)[0]["value"].as_str().unwrap().to_string();

    let reload = rpc(&app, &mut jar, "ui.load", json!({})).await;
    let effects = effects(&reload);

    assert!(effects.contains(&json!({
        "type": "set_display", "element": "godzexmd-section", "display": "block"
    })));
    assert!(effects.contains(&json!({
        "type": "set_value", "element": "session-id", "value": token
    })));
}

#[tokio::test]
async fn session_token_shape() {
    let app = app().await;
    let mut jar = loaded(&app).await;

    let response = rpc(&app, &mut jar, "ui.click", json!({ "control": "generate-session" })).await;
    let effect = &effects(&response)[0];

    assert_eq!(effect["type"], "set_value");
    assert_eq!(effect["element"], "session-id");
    let token = effect["value"].as_str().unwrap();
    let suffix = token.strip_prefix("GODZEXMD-").expect("prefixed token");
    assert_eq!(suffix.len(), 10);
    assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
}

#[tokio::test]
async fn qr_generation_and_stale_loads() {
    let app = app().await;
    let mut jar = loaded(&app).await;

    let first = rpc(
        &app,
        &mut jar,
        "ui.click",
        json!({ "control": "generate-qr", "input": "hello world" }),
    )
    .await;
    let first = effects(&first);
    assert_eq!(
        first[0],
        json!({ "type": "clear_canvas", "element": "qr-canvas", "width": 180, "height": 180 })
    );
    assert_eq!(first[1]["type"], "load_image");
    assert!(
        first[1]["url"]
            .as_str()
            .unwrap()
            .ends_with("size=180x180&data=hello%20world")
    );

    rpc(
        &app,
        &mut jar,
        "ui.click",
        json!({ "control": "generate-qr", "input": "second" }),
    )
    .await;

    let stale = rpc(&app, &mut jar, "ui.imageLoaded", json!({ "generation": 1 })).await;
    assert_eq!(stale["result"]["draw"], false);

    let current = rpc(&app, &mut jar, "ui.imageLoaded", json!({ "generation": 2 })).await;
    assert_eq!(current["result"]["draw"], true);
}

#[tokio::test]
async fn blank_qr_input_produces_nothing() {
    let app = app().await;
    let mut jar = loaded(&app).await;

    let response = rpc(
        &app,
        &mut jar,
        "ui.click",
        json!({ "control": "generate-qr", "input": "   " }),
    )
    .await;

    assert!(effects(&response).is_empty());
}

#[tokio::test]
async fn server_buttons_alert() {
    let app = app().await;
    let mut jar = loaded(&app).await;

    let pair = rpc(
        &app,
        &mut jar,
        "ui.click",
        json!({ "control": "pair-server", "server": "3" }),
    )
    .await;
    assert_eq!(
        effects(&pair),
        &vec![json!({ "type": "alert", "message": "Pair Code Server 3 selected!" })]
    );

    let qr = rpc(&app, &mut jar, "ui.click", json!({ "control": "qr-server" })).await;
    assert_eq!(
        effects(&qr),
        &vec![json!({ "type": "alert", "message": "QR Code Server undefined selected!" })]
    );
}

#[tokio::test]
async fn click_errors() {
    let app = app().await;

    let mut anonymous = Jar::default();
    let response = rpc(
        &app,
        &mut anonymous,
        "ui.click",
        json!({ "control": "godzexmd-btn" }),
    )
    .await;
    assert_eq!(response["error"]["code"], -32052);

    let mut jar = loaded(&app).await;
    let response = rpc(&app, &mut jar, "ui.click", json!({ "control": "self-destruct" })).await;
    assert_eq!(response["error"]["code"], -32050);

    let response = rpc(&app, &mut jar, "ui.click", json!({})).await;
    assert_eq!(response["error"]["code"], -32602);
}

#[tokio::test]
async fn standalone_tools() {
    let app = app().await;
    let mut jar = Jar::default();

    let session = rpc(&app, &mut jar, "session.generate", json!({})).await;
    assert!(
        session["result"]["session_id"]
            .as_str()
            .unwrap()
            .starts_with("GODZEXMD-")
    );

    let qr = rpc(&app, &mut jar, "qr.url", json!({ "text": "a&b" })).await;
    assert_eq!(
        qr["result"]["url"],
        "https://api.qrserver.com/v1/create-qr-code/?size=180x180&data=a%26b"
    );
    assert_eq!(qr["result"]["size"], 180);

    let blank = rpc(&app, &mut jar, "qr.url", json!({ "text": "" })).await;
    assert_eq!(blank["result"]["url"], Value::Null);
}

#[tokio::test]
async fn unknown_method() {
    let app = app().await;
    let mut jar = Jar::default();

    let response = rpc(&app, &mut jar, "godzexmd.selfDestruct", json!({})).await;
    assert_eq!(response["error"]["code"], -32601);
}

#[tokio::test]
async fn account_lifecycle() {
    let app = app().await;
    let mut jar = Jar::default();

    let registered = rpc(
        &app,
        &mut jar,
        "auth.register",
        json!({ "username": "alice", "password": "wonderland" }),
    )
    .await;
    assert_eq!(registered["result"]["user"]["username"], "alice");
    assert!(registered["result"].get("access_token").is_none());
    assert!(jar.get("access_token").is_some());
    assert!(jar.get("refresh_token").is_some());

    let duplicate = rpc(
        &app,
        &mut Jar::default(),
        "auth.register",
        json!({ "username": "alice", "password": "other" }),
    )
    .await;
    assert_eq!(duplicate["error"]["code"], -32013);

    let me = rpc(&app, &mut jar, "auth.me", json!({})).await;
    assert_eq!(me["result"]["user"]["username"], "alice");

    let refreshed = rpc(&app, &mut jar, "auth.refresh", json!({})).await;
    assert_eq!(refreshed["result"]["user"]["username"], "alice");

    let logout = rpc(&app, &mut jar, "auth.logout", json!({})).await;
    assert_eq!(logout["result"]["success"], true);
    assert!(jar.get("access_token").is_none());

    let me = rpc(&app, &mut jar, "auth.me", json!({})).await;
    assert_eq!(me["error"]["code"], -32020);
}

#[tokio::test]
async fn demo_user_can_log_in() {
    let app = app().await;
    let mut jar = Jar::default();

    let bad = rpc(
        &app,
        &mut jar,
        "auth.login",
        json!({ "username": "testuser", "password": "wrong" }),
    )
    .await;
    assert_eq!(bad["error"]["code"], -32012);

    let good = rpc(
        &app,
        &mut jar,
        "auth.login",
        json!({ "username": "testuser", "password": "password123" }),
    )
    .await;
    assert_eq!(good["result"]["user"]["username"], "testuser");
}

#[tokio::test]
async fn client_supplied_tokens_are_ignored() {
    let app = app().await;
    let mut jar = Jar::default();

    let me = rpc(
        &app,
        &mut jar,
        "auth.me",
        json!({ "access_token": "forged" }),
    )
    .await;
    assert_eq!(me["error"]["code"], -32020);
}

#[tokio::test]
async fn auth_calls_are_rate_limited() {
    let mut config = Config::local(common::TEST_SECRET);
    config.rate_limit.auth_limit = 2;
    let app = app_with(config).await;
    let mut jar = Jar::default();

    for _ in 0..2 {
        let response = rpc(
            &app,
            &mut jar,
            "auth.login",
            json!({ "username": "testuser", "password": "wrong" }),
        )
        .await;
        assert_eq!(response["error"]["code"], -32012);
    }

    let limited = rpc(
        &app,
        &mut jar,
        "auth.login",
        json!({ "username": "testuser", "password": "wrong" }),
    )
    .await;
    assert_eq!(limited["error"]["code"], -32081);
}
