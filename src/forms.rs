//! Form inputs and their validation rules.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    error::{validation_error, ReviewlyError},
    repo::UserRepository,
};

/// Rejects input that is nothing but whitespace, which would otherwise pass the length rules.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("required");
        error.message = Some("This field is required.".into());
        return Err(error);
    }
    Ok(())
}

/// The form input of a `POST /register` request.
#[derive(Debug, Clone, Default, Validate, Deserialize)]
#[serde(default)]
pub(crate) struct RegisterForm {
    /// The provided username.
    #[validate(length(
        min = 3,
        max = 20,
        message = "Must be between 3 and 20 characters long."
    ), custom = "not_blank")]
    pub(crate) username: String,
    /// The provided email.
    #[validate(email(message = "Enter a valid Email address"), custom = "not_blank")]
    pub(crate) email: String,
    /// The provided password.
    #[validate(length(
        min = 3,
        max = 20,
        message = "Must be between 3 and 20 characters long."
    ), custom = "not_blank")]
    pub(crate) password: String,
    #[validate(
        length(
            min = 3,
            max = 20,
            message = "Must be between 3 and 20 characters long."
        ),
        must_match = "password",
        custom = "not_blank"
    )]
    pub(crate) confirm_password: String,
}

/// What a re-rendered registration form shows. Passwords are never echoed back.
#[derive(Debug, Serialize)]
pub(crate) struct RegisterValues {
    pub(crate) username: String,
    pub(crate) email: String,
}

impl RegisterForm {
    pub(crate) fn values(&self) -> RegisterValues {
        RegisterValues {
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }

    /// Run every rule, including the uniqueness lookups, and collect all failures.
    ///
    /// Shape errors come back as one `Validation` batch with any duplicate fields folded in; a
    /// submission whose only problem is a taken name or email gets the dedicated error instead.
    pub(crate) async fn validate_against(&self, users: &UserRepository) -> Result<(), ReviewlyError> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);

        let username_taken = users.username_taken(&self.username).await?;
        let email_taken = users.email_taken(&self.email).await?;

        if errors.errors().is_empty() {
            return match (username_taken, email_taken) {
                (true, _) => Err(ReviewlyError::DuplicateUsername),
                (false, true) => Err(ReviewlyError::DuplicateEmail),
                (false, false) => Ok(()),
            };
        }

        if username_taken {
            errors.add(
                "username",
                validation_error("duplicate", ReviewlyError::DuplicateUsername.to_string()),
            );
        }
        if email_taken {
            errors.add(
                "email",
                validation_error("duplicate", ReviewlyError::DuplicateEmail.to_string()),
            );
        }
        Err(errors.into())
    }
}

/// The form input of a `POST /login` request.
#[derive(Debug, Clone, Default, Validate, Deserialize)]
#[serde(default)]
pub(crate) struct LoginForm {
    #[validate(email(message = "Enter a valid Email address"), custom = "not_blank")]
    pub(crate) email: String,
    #[validate(length(
        min = 3,
        max = 20,
        message = "Must be between 3 and 20 characters long."
    ), custom = "not_blank")]
    pub(crate) password: String,
    /// Checkbox; browsers only send it when ticked.
    pub(crate) remember: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginValues {
    pub(crate) email: String,
    pub(crate) remember: bool,
}

impl LoginForm {
    pub(crate) fn remember(&self) -> bool {
        self.remember.is_some()
    }

    pub(crate) fn values(&self) -> LoginValues {
        LoginValues {
            email: self.email.clone(),
            remember: self.remember(),
        }
    }
}

/// The form input of a `POST /new_post` request.
#[derive(Debug, Clone, Default, Validate, Deserialize, Serialize)]
#[serde(default)]
pub(crate) struct ReviewForm {
    #[validate(length(
        min = 3,
        max = 200,
        message = "Must be between 3 and 200 characters long."
    ), custom = "not_blank")]
    pub(crate) title: String,
    #[validate(length(
        min = 3,
        max = 200,
        message = "Must be between 3 and 200 characters long."
    ), custom = "not_blank")]
    pub(crate) product_name: String,
    #[validate(
        length(min = 3, message = "Must be at least 3 characters long."),
        custom = "not_blank"
    )]
    pub(crate) content: String,
}
