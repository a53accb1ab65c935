//! Database entities shared by the server.

pub mod review;
pub mod user;
