//! LMS identity provider adapter.

pub mod oauth;

pub use oauth::LmsOAuthClient;
