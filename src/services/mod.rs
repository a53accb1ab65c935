//! The operations behind the routes, independent of HTTP.

pub(crate) mod accounts;
pub(crate) mod reviews;
