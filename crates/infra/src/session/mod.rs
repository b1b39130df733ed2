//! Signed session artifact carrying the access context between requests.

pub mod cookie;

pub use cookie::{SessionCookie, SESSION_COOKIE_NAME};
