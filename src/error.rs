use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;
use std::borrow::Cow;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

use crate::constants::LOGIN_PATH;

// dost thou know of the pepeloni
const INTERNAL_SERVER_ERROR_MESSAGE: &str = "aah the pepeloni";

/// Any possible server errors
#[derive(Debug, Error)]
pub(crate) enum ReviewlyError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("Sorry, that username is already taken")]
    DuplicateUsername,

    #[error("Sorry, that email is already taken")]
    DuplicateEmail,

    #[error("Login unsuccessful. Please check email and password")]
    InvalidCredentials,

    #[error("Not found")]
    NotFound,

    #[error("Login required")]
    Unauthenticated,

    #[error("Forbidden")]
    Forbidden,

    #[error("Password hasher error: {0}")]
    PasswordHash(String),

    #[error(transparent)]
    AxumFormRejection(#[from] axum::extract::rejection::FormRejection),

    #[error("Application state missing from request")]
    MissingState,

    #[error(transparent)]
    InvalidHeader(#[from] axum::http::header::InvalidHeaderValue),

    #[error(transparent)]
    DbError(#[from] sea_orm::DbErr),

    #[error(transparent)]
    RedisError(#[from] redis::RedisError),

    #[error(transparent)]
    OsoError(#[from] oso::OsoError),
}

impl ReviewlyError {
    /// Splits off the errors that belong in a rendered form, returning the status to render it
    /// with and the per-field messages. Anything else is handed back untouched.
    pub(crate) fn into_form_errors(self) -> Result<(StatusCode, ValidationErrors), Self> {
        match self {
            ReviewlyError::Validation(errors) => Ok((StatusCode::BAD_REQUEST, errors)),
            ReviewlyError::DuplicateUsername => Ok((
                StatusCode::CONFLICT,
                field_error("username", "duplicate", self.to_string()),
            )),
            ReviewlyError::DuplicateEmail => Ok((
                StatusCode::CONFLICT,
                field_error("email", "duplicate", self.to_string()),
            )),
            ReviewlyError::InvalidCredentials => Ok((
                StatusCode::UNAUTHORIZED,
                field_error("email", "credentials", self.to_string()),
            )),
            other => Err(other),
        }
    }
}

/// Builds a single-field error set.
pub(crate) fn field_error(
    field: &'static str,
    code: &'static str,
    message: impl Into<Cow<'static, str>>,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(field, validation_error(code, message));
    errors
}

pub(crate) fn validation_error(
    code: &'static str,
    message: impl Into<Cow<'static, str>>,
) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

impl IntoResponse for ReviewlyError {
    fn into_response(self) -> Response {
        match self {
            ReviewlyError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            ReviewlyError::DuplicateUsername | ReviewlyError::DuplicateEmail => {
                (StatusCode::CONFLICT, self.to_string()).into_response()
            }
            ReviewlyError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, self.to_string()).into_response()
            }
            ReviewlyError::NotFound => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
            ReviewlyError::Unauthenticated => Redirect::to(LOGIN_PATH).into_response(),
            ReviewlyError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()).into_response(),
            ReviewlyError::AxumFormRejection(_) => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            e => {
                tracing::error!("Internal error occurred: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_SERVER_ERROR_MESSAGE,
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_username_lands_on_the_username_field() {
        let (status, errors) = ReviewlyError::DuplicateUsername
            .into_form_errors()
            .unwrap();
        assert_eq!(status, StatusCode::CONFLICT);
        let field = errors.field_errors();
        assert_eq!(field["username"][0].code, "duplicate");
    }

    #[test]
    fn infrastructure_errors_are_not_form_errors() {
        assert!(matches!(
            ReviewlyError::NotFound.into_form_errors(),
            Err(ReviewlyError::NotFound)
        ));
    }

    #[test]
    fn unauthenticated_redirects_to_login() {
        let res = ReviewlyError::Unauthenticated.into_response();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()["location"], LOGIN_PATH);
    }
}
