use axum::{
    extract::{Extension, Form},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::{
    auth::Auth,
    constants::{HOME_PATH, LOGIN_PATH},
    error::ReviewlyError,
    forms::RegisterForm,
    handlers::redirect,
    server::State,
    services::accounts,
    views::{FormBody, Page},
};

/// Handler for `GET /register`
pub(crate) async fn register_form(auth: Auth) -> Response {
    if auth.is_authenticated() {
        return redirect(HOME_PATH);
    }
    Page::new(
        "register",
        &auth,
        FormBody::blank(RegisterForm::default().values()),
    )
    .into_response()
}

/// Handler for `POST /register`
pub(crate) async fn register(
    auth: Auth,
    Extension(state): Extension<Arc<State>>,
    Form(input): Form<RegisterForm>,
) -> Result<Response, ReviewlyError> {
    if auth.is_authenticated() {
        return Ok(redirect(HOME_PATH));
    }

    let values = input.values();
    match accounts::register(&state, input).await {
        Ok(_) => Ok(redirect(LOGIN_PATH)),
        Err(err) => {
            let (status, errors) = err.into_form_errors()?;
            Ok(Page::new("register", &auth, FormBody::with_errors(values, errors)).render(status))
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::{handlers::test_client::TestClient, server::testing::test_state};

    #[tokio::test]
    async fn register_then_reject_the_same_username() {
        let client = TestClient::new(test_state().await);

        client
            .post(
                "/register",
                "username=alice&email=a@x.com&password=pw123&confirm_password=pw123",
            )
            .await
            .assert_redirect("/login");

        let res = client
            .post(
                "/register",
                "username=alice&email=b@x.com&password=pw123&confirm_password=pw123",
            )
            .await;
        assert_eq!(res.status, StatusCode::CONFLICT);
        let page = res.json();
        assert_eq!(page["view"], "register");
        assert_eq!(page["values"]["email"], "b@x.com");
        assert!(page["values"].get("password").is_none());
        assert_eq!(
            page["errors"]["username"][0]["message"],
            "Sorry, that username is already taken"
        );
        assert_eq!(client.state.users.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn mismatched_passwords_rerender_the_form() {
        let client = TestClient::new(test_state().await);
        let res = client
            .post(
                "/register",
                "username=alice&email=a@x.com&password=pw123&confirm_password=pw321",
            )
            .await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert!(res.json()["errors"]["confirm_password"].is_array());
        assert_eq!(client.state.users.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn blank_fields_rerender_the_form() {
        let client = TestClient::new(test_state().await);
        let res = client
            .post(
                "/register",
                "username=%20%20%20&email=a@x.com&password=+++&confirm_password=+++",
            )
            .await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        let page = res.json();
        assert_eq!(page["errors"]["username"][0]["code"], "required");
        assert_eq!(page["errors"]["password"][0]["code"], "required");
        assert_eq!(client.state.users.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn logged_in_users_skip_registration() {
        let mut client = TestClient::new(test_state().await);
        client.sign_up("alice", "pw123456").await;

        client.get("/register").await.assert_redirect("/");
        client
            .post(
                "/register",
                "username=bob&email=b@x.com&password=pw123&confirm_password=pw123",
            )
            .await
            .assert_redirect("/");
        assert_eq!(client.state.users.count().await.unwrap(), 1);
    }
}
