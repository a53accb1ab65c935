//! Constants

// for authorized sessions
pub(crate) const SESSION_COOKIE_NAME: &str = "msessid";
pub(crate) const SESSION_KEY_PREFIX: &str = "session:";
/// Lifetime of a "remember me" session, both the cookie and the stored entry.
pub(crate) const SESSION_DURATION_SECS: usize = 1209600;
/// Server-side lifetime of a browser-session login.
pub(crate) const SESSION_DEFAULT_SECS: usize = 86400;

// for the once-per-user vote policy
pub(crate) const VOTE_KEY_PREFIX: &str = "votes:";

// redirect targets
pub(crate) const HOME_PATH: &str = "/";
pub(crate) const LOGIN_PATH: &str = "/login";
pub(crate) const USER_POSTS_PATH: &str = "/user_post";
