//! What the session store remembers about a logged-in browser.

use serde::{Deserialize, Serialize};

use crate::impl_redis_rv;

/// The value kept under a `session:` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct SessionData {
    pub(crate) user_id: i32,
    /// Whether the cookie outlives the browser session.
    pub(crate) remember: bool,
}

impl_redis_rv!(SessionData);

/// A freshly established login.
#[derive(Debug)]
pub(crate) struct Session {
    /// The unprefixed key handed to the browser.
    pub(crate) key: String,
    pub(crate) data: SessionData,
}
