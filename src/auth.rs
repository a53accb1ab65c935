use axum::{
    async_trait,
    extract::{FromRequest, RequestParts},
    headers::{Cookie, HeaderMapExt},
    http::{HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use entity::user;
use std::sync::Arc;

use crate::{
    config::Config,
    constants::{SESSION_COOKIE_NAME, SESSION_DURATION_SECS, SESSION_KEY_PREFIX},
    error::ReviewlyError,
    server::State,
    session::Session,
    utils::RKeys,
};

/// The authorization of a user making a request.
#[derive(Debug, Clone)]
pub(crate) enum Auth {
    KnownUser(user::Model),
    Anonymous,
}

impl Auth {
    pub(crate) fn is_authenticated(&self) -> bool {
        matches!(self, Auth::KnownUser(_))
    }

    pub(crate) fn user(&self) -> Option<&user::Model> {
        match self {
            Auth::KnownUser(user) => Some(user),
            Auth::Anonymous => None,
        }
    }

    /// Resolve the acting identity from the session cookie, if any.
    ///
    /// A cookie whose session has expired, or whose user no longer exists, is just anonymous.
    pub(crate) async fn resolve(state: &State, headers: &HeaderMap) -> Result<Self, ReviewlyError> {
        let prefixed_key = match session_key(headers) {
            Some(keys) => keys.prefixed_key,
            None => return Ok(Auth::Anonymous),
        };

        let session = match state.store.get_session(&prefixed_key).await? {
            Some(session) => session,
            None => return Ok(Auth::Anonymous),
        };

        match state.users.find_by_id(session.user_id).await? {
            Some(user) => Ok(Auth::KnownUser(user)),
            None => Ok(Auth::Anonymous),
        }
    }
}

/// The session keys named by the request's cookie.
pub(crate) fn session_key(headers: &HeaderMap) -> Option<RKeys> {
    headers
        .typed_get::<Cookie>()
        .and_then(|cookie| cookie.get(SESSION_COOKIE_NAME).map(str::to_owned))
        .map(|base_key| RKeys::from_base(SESSION_KEY_PREFIX, base_key))
}

#[async_trait]
impl<B> FromRequest<B> for Auth
where
    B: Send,
{
    type Rejection = ReviewlyError;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        // already resolved by `require_login`
        if let Some(auth) = req.extensions().get::<Auth>() {
            return Ok(auth.clone());
        }

        let state = req
            .extensions()
            .get::<Arc<State>>()
            .cloned()
            .ok_or(ReviewlyError::MissingState)?;

        Auth::resolve(&state, req.headers()).await
    }
}

/// Guard for routes that need a logged-in user. Anonymous requests are redirected to the login
/// page; otherwise the resolved [`Auth`] is stashed for the handler.
pub(crate) async fn require_login<B>(
    mut req: Request<B>,
    next: Next<B>,
) -> Result<Response, ReviewlyError>
where
    B: Send,
{
    let state = req
        .extensions()
        .get::<Arc<State>>()
        .cloned()
        .ok_or(ReviewlyError::MissingState)?;

    match Auth::resolve(&state, req.headers()).await? {
        auth @ Auth::KnownUser(_) => {
            req.extensions_mut().insert(auth);
            Ok(next.run(req).await)
        }
        Auth::Anonymous => Ok(ReviewlyError::Unauthenticated.into_response()),
    }
}

/// The `Set-Cookie` value handing a new session to the browser.
///
/// Remembered sessions get a `Max-Age` and survive browser restarts; the rest are session cookies.
pub(crate) fn session_cookie(
    config: &Config,
    session: &Session,
) -> Result<HeaderValue, ReviewlyError> {
    let mut cookie = format!(
        "{cname}={cval}{attrs}",
        cname = SESSION_COOKIE_NAME,
        cval = session.key,
        attrs = cookie_attributes(config),
    );
    if session.data.remember {
        cookie.push_str(&format!("; Max-Age={}", SESSION_DURATION_SECS));
    }
    Ok(HeaderValue::from_str(&cookie)?)
}

/// The `Set-Cookie` value that makes the browser drop its session cookie.
pub(crate) fn expired_cookie(config: &Config) -> Result<HeaderValue, ReviewlyError> {
    let cookie = format!(
        "{cname}=expired{attrs}; Max-Age=-1",
        cname = SESSION_COOKIE_NAME,
        attrs = cookie_attributes(config),
    );
    Ok(HeaderValue::from_str(&cookie)?)
}

fn cookie_attributes(config: &Config) -> String {
    let mut attrs = String::from("; HttpOnly; Path=/; SameSite=Lax");
    if config.secure_cookies {
        attrs.push_str("; Secure");
    }
    if let Some(domain) = &config.cookie_domain {
        attrs.push_str(&format!("; Domain={}", domain));
    }
    attrs
}
