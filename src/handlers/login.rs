use axum::{
    extract::{Extension, Form},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::{
    auth::{expired_cookie, session_cookie, session_key, Auth},
    constants::HOME_PATH,
    error::ReviewlyError,
    forms::LoginForm,
    handlers::redirect,
    server::State,
    services::accounts,
    views::{FormBody, Page},
};

/// Handler for `GET /login`
pub(crate) async fn login_form(auth: Auth) -> Response {
    if auth.is_authenticated() {
        return redirect(HOME_PATH);
    }
    Page::new(
        "login",
        &auth,
        FormBody::blank(LoginForm::default().values()),
    )
    .into_response()
}

/// Handler for `POST /login`
pub(crate) async fn login(
    auth: Auth,
    Extension(state): Extension<Arc<State>>,
    Form(input): Form<LoginForm>,
) -> Result<Response, ReviewlyError> {
    if auth.is_authenticated() {
        return Ok(redirect(HOME_PATH));
    }

    match accounts::login(&state, &input).await {
        Ok(session) => {
            let mut res = redirect(HOME_PATH);
            res.headers_mut()
                .insert(header::SET_COOKIE, session_cookie(&state.config, &session)?);
            Ok(res)
        }
        Err(err) => {
            let (status, errors) = err.into_form_errors()?;
            Ok(Page::new("login", &auth, FormBody::with_errors(input.values(), errors))
                .render(status))
        }
    }
}

/// Handler for `GET /logout`
pub(crate) async fn logout(
    headers: HeaderMap,
    Extension(state): Extension<Arc<State>>,
) -> Result<Response, ReviewlyError> {
    accounts::logout(&state, session_key(&headers)).await?;

    let mut res = redirect(HOME_PATH);
    res.headers_mut()
        .insert(header::SET_COOKIE, expired_cookie(&state.config)?);
    Ok(res)
}
