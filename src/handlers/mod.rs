use axum::{
    async_trait,
    extract::{FromRequest, Path, RequestParts},
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use crate::error::ReviewlyError;

pub(crate) mod home;
pub(crate) mod login;
pub(crate) mod reviews;
pub(crate) mod user;

pub(crate) use home::*;
pub(crate) use login::*;
pub(crate) use reviews::*;
pub(crate) use user::*;

/// `303 See Other` to `path`, the answer to every successful form submission.
pub(crate) fn redirect(path: &str) -> Response {
    Redirect::to(path).into_response()
}

/// The `:id` segment of a review route. An id that is not a number, or does not fit one, cannot
/// name a review, so it is a 404 like any other missing review.
pub(crate) struct ReviewId(pub(crate) i32);

#[async_trait]
impl<B> FromRequest<B> for ReviewId
where
    B: Send,
{
    type Rejection = ReviewlyError;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i32>::from_request(req).await.map_err(|rejection| {
            debug!("Unusable review id: {}", rejection);
            ReviewlyError::NotFound
        })?;
        Ok(ReviewId(id))
    }
}

#[cfg(test)]
pub(crate) mod test_client {
    //! Drives the full router in-process.

    use axum::{
        body::Body,
        http::{header, Method, Request, Response, StatusCode},
    };
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::server::{app, State};

    pub(crate) struct TestClient {
        pub(crate) state: Arc<State>,
        /// `name=value` of the session cookie, once logged in.
        pub(crate) cookie: Option<String>,
    }

    pub(crate) struct TestResponse {
        pub(crate) status: StatusCode,
        pub(crate) location: Option<String>,
        pub(crate) set_cookie: Option<String>,
        pub(crate) body: Vec<u8>,
    }

    impl TestResponse {
        pub(crate) fn json(&self) -> Value {
            serde_json::from_slice(&self.body).unwrap()
        }

        pub(crate) fn assert_redirect(&self, to: &str) {
            assert_eq!(self.status, StatusCode::SEE_OTHER);
            assert_eq!(self.location.as_deref(), Some(to));
        }
    }

    impl TestClient {
        pub(crate) fn new(state: Arc<State>) -> Self {
            TestClient {
                state,
                cookie: None,
            }
        }

        pub(crate) async fn get(&self, uri: &str) -> TestResponse {
            self.send(Method::GET, uri, None).await
        }

        pub(crate) async fn post(&self, uri: &str, form: &str) -> TestResponse {
            self.send(Method::POST, uri, Some(form)).await
        }

        async fn send(&self, method: Method, uri: &str, form: Option<&str>) -> TestResponse {
            let mut req = Request::builder().method(method).uri(uri);
            if let Some(cookie) = &self.cookie {
                req = req.header(header::COOKIE, cookie.as_str());
            }
            let req = match form {
                Some(form) => req
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(form.to_owned())),
                None => req.body(Body::empty()),
            }
            .unwrap();

            let res: Response<_> = app(self.state.clone()).oneshot(req).await.unwrap();
            let header = |name: header::HeaderName| {
                res.headers()
                    .get(name)
                    .map(|value: &header::HeaderValue| value.to_str().unwrap().to_owned())
            };
            let location = header(header::LOCATION);
            let set_cookie = header(header::SET_COOKIE);
            let status = res.status();
            let body = hyper::body::to_bytes(res.into_body())
                .await
                .unwrap()
                .to_vec();

            TestResponse {
                status,
                location,
                set_cookie,
                body,
            }
        }

        /// Register and log in, keeping the session cookie for later requests.
        pub(crate) async fn sign_up(&mut self, username: &str, password: &str) {
            let email = format!("{}@x.com", username);
            self.post(
                "/register",
                &format!(
                    "username={}&email={}&password={pw}&confirm_password={pw}",
                    username,
                    email,
                    pw = password
                ),
            )
            .await
            .assert_redirect("/login");

            let res = self
                .post("/login", &format!("email={}&password={}", email, password))
                .await;
            res.assert_redirect("/");
            let set_cookie = res.set_cookie.expect("login sets a cookie");
            self.cookie = set_cookie.split(';').next().map(str::to_owned);
        }
    }
}
