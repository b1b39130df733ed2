//! Domain types and models

pub mod identity;
pub mod oauth;
pub mod search;

pub use identity::{AccessContext, IdentityClaims};
pub use oauth::{AuthorizationCode, CallbackQuery, LtiLaunch, RedirectContext};
pub use search::{SearchCriteria, SearchPage};
