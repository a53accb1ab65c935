//! The documents handed to the front end. Each one names the template it is meant for.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use entity::{review, user};
use serde::Serialize;
use validator::ValidationErrors;

use crate::auth::Auth;

/// A rendered page: the template name, who is looking, and the page's own content.
#[derive(Debug, Serialize)]
pub(crate) struct Page<T> {
    view: &'static str,
    current_user: Option<CurrentUser>,
    #[serde(flatten)]
    body: T,
}

#[derive(Debug, Serialize)]
pub(crate) struct CurrentUser {
    id: i32,
    username: String,
}

impl<T: Serialize> Page<T> {
    pub(crate) fn new(view: &'static str, auth: &Auth, body: T) -> Self {
        let current_user = auth.user().map(|user| CurrentUser {
            id: user.id,
            username: user.username.clone(),
        });
        Page {
            view,
            current_user,
            body,
        }
    }

    pub(crate) fn render(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

impl<T: Serialize> IntoResponse for Page<T> {
    fn into_response(self) -> Response {
        self.render(StatusCode::OK)
    }
}

/// A form, with the values to pre-fill and any errors from the last submission.
#[derive(Debug, Serialize)]
pub(crate) struct FormBody<V> {
    pub(crate) values: V,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) errors: Option<ValidationErrors>,
}

impl<V> FormBody<V> {
    pub(crate) fn blank(values: V) -> Self {
        FormBody {
            values,
            errors: None,
        }
    }

    pub(crate) fn with_errors(values: V, errors: ValidationErrors) -> Self {
        FormBody {
            values,
            errors: Some(errors),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ReviewView {
    id: i32,
    title: String,
    product_name: String,
    content: String,
    date_posted: DateTime<Utc>,
    author: Option<String>,
    upvotes: i32,
    downvotes: i32,
}

impl ReviewView {
    pub(crate) fn new(review: review::Model, author: Option<&user::Model>) -> Self {
        ReviewView {
            id: review.id,
            title: review.title,
            product_name: review.product_name,
            content: review.content,
            date_posted: review.date_posted,
            author: author.map(|user| user.username.clone()),
            upvotes: review.upvotes,
            downvotes: review.downvotes,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ReviewList {
    pub(crate) reviews: Vec<ReviewView>,
}

/// The edit form also shows which review is being edited.
#[derive(Debug, Serialize)]
pub(crate) struct EditBody<V> {
    pub(crate) review_id: i32,
    #[serde(flatten)]
    pub(crate) form: FormBody<V>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::field_error;
    use serde_json::{json, Value};

    #[test]
    fn pages_flatten_their_body() {
        let page = Page::new(
            "register",
            &Auth::Anonymous,
            FormBody::with_errors(
                json!({ "username": "al" }),
                field_error("username", "length", "Too short"),
            ),
        );
        let value: Value = serde_json::to_value(&page).unwrap();

        assert_eq!(value["view"], "register");
        assert_eq!(value["current_user"], Value::Null);
        assert_eq!(value["values"]["username"], "al");
        assert_eq!(value["errors"]["username"][0]["message"], "Too short");
    }

    #[test]
    fn blank_forms_have_no_errors_key() {
        let value = serde_json::to_value(FormBody::blank(json!({}))).unwrap();
        assert!(value.get("errors").is_none());
    }
}
