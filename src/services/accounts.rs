//! Registration, login and logout.

use entity::user;
use tracing::{debug, info};
use validator::Validate;

use crate::{
    constants::{SESSION_DEFAULT_SECS, SESSION_DURATION_SECS, SESSION_KEY_PREFIX},
    error::ReviewlyError,
    forms::{LoginForm, RegisterForm},
    server::State,
    session::{Session, SessionData},
    utils::{
        pass::{self, Verified},
        RKeys,
    },
};

/// Create a new user from a registration form.
///
/// Nothing is written unless every rule passes, uniqueness included. Only the hash of the password
/// is stored.
pub(crate) async fn register(state: &State, form: RegisterForm) -> Result<user::Model, ReviewlyError> {
    form.validate_against(&state.users).await?;

    let password = pass::hash(&form.password)?;
    let user = state
        .users
        .insert(form.username, form.email, password)
        .await?;

    info!(user = user.id, "Registered new user {}", user.username);
    Ok(user)
}

/// Check credentials and open a session for the matching user.
pub(crate) async fn login(state: &State, form: &LoginForm) -> Result<Session, ReviewlyError> {
    form.validate()?;

    let user = match state.users.find_by_email(&form.email).await? {
        Some(user) => user,
        None => {
            // keep the miss about as slow as a wrong password
            let _ = pass::hash(&form.password);
            debug!("Login attempt for unknown email");
            return Err(ReviewlyError::InvalidCredentials);
        }
    };

    let user = match pass::verify(&user.password, &form.password) {
        Verified::No => {
            debug!(user = user.id, "Login attempt with wrong password");
            return Err(ReviewlyError::InvalidCredentials);
        }
        Verified::Yes => user,
        Verified::YesNeedsRehash => {
            // password needs to be updated
            let password = pass::hash(&form.password)?;
            state.users.update_password(user, password).await?
        }
    };

    let RKeys {
        base_key,
        prefixed_key,
    } = RKeys::generate(SESSION_KEY_PREFIX);
    let data = SessionData {
        user_id: user.id,
        remember: form.remember(),
    };
    let ttl = if data.remember {
        SESSION_DURATION_SECS
    } else {
        SESSION_DEFAULT_SECS
    };
    state.store.set_session(&prefixed_key, data, ttl).await?;

    info!(user = user.id, remember = data.remember, "User logged in");
    Ok(Session {
        key: base_key,
        data,
    })
}

/// End the session named by `keys`, if there is one.
pub(crate) async fn logout(state: &State, keys: Option<RKeys>) -> Result<(), ReviewlyError> {
    if let Some(RKeys { prefixed_key, .. }) = keys {
        state.store.del(&prefixed_key).await?;
    }
    Ok(())
}
