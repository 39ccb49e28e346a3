#![allow(dead_code)]

use std::collections::BTreeMap;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header, request},
};
use godzexmd::{AppState, build_router, config::Config};
use serde_json::{Value, json};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

pub async fn app() -> Router {
    app_with(Config::local(TEST_SECRET)).await
}

pub async fn app_with(config: Config) -> Router {
    let state = AppState::initialize(config)
        .await
        .expect("state should initialize");
    build_router(state)
}

/// Minimal cookie jar fed from `Set-Cookie` headers.
#[derive(Debug, Default, Clone)]
pub struct Jar(BTreeMap<String, String>);

impl Jar {
    pub fn store(&mut self, response: &Response<Body>) {
        for value in response.headers().get_all(header::SET_COOKIE) {
            let Ok(value) = value.to_str() else { continue };
            let pair = value.split(';').next().unwrap_or_default();
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            if value.is_empty() {
                self.0.remove(name);
            } else {
                self.0.insert(name.to_string(), value.to_string());
            }
        }
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        self.0.insert(name.to_string(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn attach(&self, builder: request::Builder) -> request::Builder {
        if self.0.is_empty() {
            builder
        } else {
            builder.header(header::COOKIE, self.header())
        }
    }

    pub fn header(&self) -> String {
        self.0
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

pub async fn send(app: &Router, jar: &mut Jar, request: Request<Body>) -> Response<Body> {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");
    jar.store(&response);
    response
}

pub async fn rpc(app: &Router, jar: &mut Jar, method: &str, params: Value) -> Value {
    let body = json!({ "jsonrpc": "2.0", "method": method, "params": params, "id": 1 });
    let request = jar
        .attach(Request::post("/api").header(header::CONTENT_TYPE, "application/json"))
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = send(app, jar, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    json_body(response).await
}

pub async fn get(app: &Router, jar: &mut Jar, uri: &str) -> Response<Body> {
    let request = jar.attach(Request::get(uri)).body(Body::empty()).unwrap();
    send(app, jar, request).await
}

pub async fn post_form(app: &Router, jar: &mut Jar, uri: &str, form: &str) -> Response<Body> {
    let request = jar
        .attach(Request::post(uri).header(header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .body(Body::from(form.to_string()))
        .unwrap();
    send(app, jar, request).await
}

pub async fn json_body(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("JSON body")
}

pub async fn text_body(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).expect("UTF-8 body")
}

async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body")
        .to_vec()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}
