use axum::{
    Form,
    extract::{Query, State},
    http::{Extensions, HeaderName, HeaderValue, StatusCode},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};
use axum_extra::TypedHeader;
use headers::Cookie;
use serde::Deserialize;

use crate::{
    AppState,
    error::{AppError, Result},
    infrastructure::store::UserRecord,
    middleware::rate_limit::client_key,
    pages::{
        flash::{Flash, FlashCategory, consume_flashes, flash_cookie, read_flashes},
        layout,
    },
    services::auth::{
        self, AuthOperation, TokenType,
        cookie::{clear_token_cookies, token_cookies},
    },
    utils::encoding::{encode_uri_component, escape_html},
};

type Cookies = Option<TypedHeader<Cookie>>;
type SetCookie = (HeaderName, HeaderValue);

#[derive(Debug, Default, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

pub async fn index(State(state): State<AppState>, cookies: Cookies) -> Result<Response> {
    let flashes = read_flashes(cookies.as_ref());

    let session = page_session(&state, cookies.as_ref()).await;
    let content = match &session {
        Some(PageSession { user, .. }) => format!(
            r#"<p>You are logged in as <strong>{}</strong>.</p>
<p><a href="/games">Continue to Play Games</a></p>
<p><a href="/godzexmd">Open GODZEXMD</a></p>
<p><a href="/logout">Logout</a></p>"#,
            escape_html(&user.username)
        ),
        None => r#"<p>You must sign up or log in to play games.</p>
<p><a href="/signup">Sign Up</a></p>
<p><a href="/login">Login</a></p>"#
            .to_string(),
    };

    let body = format!(
        "<h1>Welcome to the All-in-One Web App!</h1>\n{}\n{}",
        layout::flashes(&flashes),
        content
    );
    let renewed = session.map(|session| session.renewed).unwrap_or_default();
    render_with(&state, "Home Page", &body, &flashes, renewed)
}

pub async fn signup_form(State(state): State<AppState>, cookies: Cookies) -> Result<Response> {
    let flashes = read_flashes(cookies.as_ref());
    render(&state, "Sign Up", &signup_body(&flashes), &flashes)
}

pub async fn signup(
    State(state): State<AppState>,
    extensions: Extensions,
    Form(form): Form<CredentialsForm>,
) -> Result<Response> {
    if !within_rate_limit(&state, &extensions).await? {
        return rate_limited(&state, "Sign Up", signup_body);
    }

    if form.username.is_empty() || form.password.is_empty() {
        return redirect_with(
            &state,
            "/signup",
            &[Flash::new(
                FlashCategory::Danger,
                "Username and password are required.",
            )],
            vec![],
        );
    }

    match state.users.create_user(&form.username, &form.password).await {
        Ok(_) => redirect_with(
            &state,
            "/login",
            &[Flash::new(
                FlashCategory::Success,
                "Registration successful! Please log in.",
            )],
            vec![],
        ),
        Err(AppError::UsernameExists) => redirect_with(
            &state,
            "/signup",
            &[Flash::new(
                FlashCategory::Danger,
                "Username already taken. Please choose another.",
            )],
            vec![],
        ),
        Err(e) => Err(e),
    }
}

pub async fn login_form(State(state): State<AppState>, cookies: Cookies) -> Result<Response> {
    let flashes = read_flashes(cookies.as_ref());
    render(&state, "Log In", &login_body(&flashes), &flashes)
}

pub async fn login(
    State(state): State<AppState>,
    Query(query): Query<NextQuery>,
    cookies: Cookies,
    extensions: Extensions,
    Form(form): Form<CredentialsForm>,
) -> Result<Response> {
    if !within_rate_limit(&state, &extensions).await? {
        return rate_limited(&state, "Log In", login_body);
    }

    match auth::authenticate(&state, AuthOperation::Login, &form.username, &form.password).await
    {
        Ok(session) => {
            let token_cookies = token_cookies(
                &session.access_token,
                &session.refresh_token,
                &state.config.jwt,
                state.secure_cookies(),
            )?;

            redirect_with(
                &state,
                safe_next(query.next.as_deref()),
                &[Flash::new(FlashCategory::Success, "Successfully logged in!")],
                token_cookies,
            )
        }
        Err(AppError::InvalidCredentials) => {
            let mut flashes = read_flashes(cookies.as_ref());
            flashes.push(Flash::new(
                FlashCategory::Danger,
                "Invalid username or password.",
            ));
            render(&state, "Log In", &login_body(&flashes), &flashes)
        }
        Err(e) => Err(e),
    }
}

pub async fn logout(State(state): State<AppState>, cookies: Cookies) -> Result<Response> {
    let Some(session) = page_session(&state, cookies.as_ref()).await else {
        return login_redirect(&state, "/logout");
    };

    auth::logout(
        &state,
        &session.access_token,
        session.refresh_token.as_deref(),
    )
    .await?;

    redirect_with(
        &state,
        "/",
        &[Flash::new(FlashCategory::Info, "You have been logged out.")],
        clear_token_cookies(state.secure_cookies())?,
    )
}

pub async fn games(State(state): State<AppState>, cookies: Cookies) -> Result<Response> {
    let Some(PageSession { user, renewed, .. }) = page_session(&state, cookies.as_ref()).await
    else {
        return login_redirect(&state, "/games");
    };

    let flashes = read_flashes(cookies.as_ref());
    let body = format!(
        r#"<h1>Welcome, {username}!</h1>
<h2>Successfully Logged In!</h2>
{flashes}
<p>This is the exclusive games section. You made it!</p>

<div style="border: 2px solid green; padding: 20px; background-color: #eaffea;">
    <h3>Example Game Content:</h3>
    <ul>
        <li>Game 1: Rust Adventure!</li>
        <li>Game 2: Axum Builder</li>
    </ul>
</div>

<p><a href="/logout">Click here to log out</a>.</p>
<p><a href="/">Back to Home</a>.</p>"#,
        username = escape_html(&user.username),
        flashes = layout::flashes(&flashes),
    );

    render_with(&state, "Games", &body, &flashes, renewed)
}

/// A logged-in visitor. `renewed` holds `Set-Cookie` headers when the token
/// pair had to be rotated to recognise them.
struct PageSession {
    user: UserRecord,
    access_token: String,
    refresh_token: Option<String>,
    renewed: Vec<SetCookie>,
}

/// Resolves the visitor from the access cookie, falling back to the refresh
/// cookie once the access token has expired or the browser dropped it.
async fn page_session(
    state: &AppState,
    cookies: Option<&TypedHeader<Cookie>>,
) -> Option<PageSession> {
    let cookies = cookies?;
    let access_token = cookies.get(TokenType::Access.name());
    let refresh_token = cookies.get(TokenType::Refresh.name());

    if let Some(token) = access_token
        && let Ok(user) = auth::current_user(state, token).await
    {
        return Some(PageSession {
            user,
            access_token: token.to_string(),
            refresh_token: refresh_token.map(str::to_string),
            renewed: vec![],
        });
    }

    let issued = match auth::refresh(state, access_token, refresh_token?).await {
        Ok(issued) => issued,
        Err(e) => {
            tracing::debug!(error = %e, "Page session refresh rejected");
            return None;
        }
    };

    let renewed = match token_cookies(
        &issued.access_token,
        &issued.refresh_token,
        &state.config.jwt,
        state.secure_cookies(),
    ) {
        Ok(renewed) => renewed,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to build renewed token cookies");
            return None;
        }
    };

    tracing::debug!(username = %issued.user.username, "Page session renewed");
    Some(PageSession {
        user: issued.user,
        access_token: issued.access_token,
        refresh_token: Some(issued.refresh_token),
        renewed,
    })
}

async fn within_rate_limit(state: &AppState, extensions: &Extensions) -> Result<bool> {
    let client = client_key(extensions);
    let (allowed, _, _) = state.rate_limiters.auth.check(&client).await?;
    if !allowed {
        tracing::warn!(client = %client, "Account form rate limit exceeded");
    }
    Ok(allowed)
}

fn rate_limited(state: &AppState, title: &str, body: fn(&[Flash]) -> String) -> Result<Response> {
    let flashes = [Flash::new(
        FlashCategory::Danger,
        "Too many attempts. Please wait a minute and try again.",
    )];

    let mut response = render(state, title, &body(&flashes), &[])?;
    *response.status_mut() = StatusCode::TOO_MANY_REQUESTS;
    Ok(response)
}

fn signup_body(flashes: &[Flash]) -> String {
    format!(
        "<h1>Create an Account</h1>\n{}\n{}\n<p>Already have an account? <a href=\"/login\">Login here</a>.</p>",
        layout::flashes(flashes),
        layout::credentials_form("Sign Up"),
    )
}

fn login_body(flashes: &[Flash]) -> String {
    format!(
        "<h1>Log In</h1>\n{}\n{}\n<p>Don't have an account? <a href=\"/signup\">Sign up here</a>.</p>",
        layout::flashes(flashes),
        layout::credentials_form("Log In"),
    )
}

// Only same-site paths; anything else falls back to the games page.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/games",
    }
}

fn render(state: &AppState, title: &str, body: &str, flashes: &[Flash]) -> Result<Response> {
    render_with(state, title, body, flashes, vec![])
}

fn render_with(
    state: &AppState,
    title: &str,
    body: &str,
    flashes: &[Flash],
    mut cookies: Vec<SetCookie>,
) -> Result<Response> {
    cookies.extend(consume_flashes(flashes, state.secure_cookies())?);

    Ok((AppendHeaders(cookies), Html(layout::page(title, body))).into_response())
}

fn redirect_with(
    state: &AppState,
    to: &str,
    flashes: &[Flash],
    mut cookies: Vec<SetCookie>,
) -> Result<Response> {
    cookies.push(flash_cookie(flashes, state.secure_cookies())?);
    Ok((AppendHeaders(cookies), Redirect::to(to)).into_response())
}

fn login_redirect(state: &AppState, from: &str) -> Result<Response> {
    redirect_with(
        state,
        &format!("/login?next={}", encode_uri_component(from)),
        &[Flash::new(
            FlashCategory::Info,
            "Please log in to access this page.",
        )],
        vec![],
    )
}
