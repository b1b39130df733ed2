//! Impersonation checks
//!
//! Impersonation is refused at two points of the flow and each point sees a
//! different shape of the same problem, so the rules are kept apart:
//!
//! - [`check_impersonation`] runs once, right after the token exchange. A
//!   masquerade session whose real user equals the effective user has not
//!   switched identity at the protocol layer.
//! - [`deny_act_as`] runs on every authorized request and rejects sessions
//!   that are genuinely acting as someone else.

use gradebridge_domain::constants::MASQUERADE_NOT_ALLOWED_MESSAGE;
use gradebridge_domain::{AccessContext, ClientError, IdentityClaims, Result};

/// Reject freshly exchanged claims from a masquerade session.
///
/// # Errors
/// `ClientError(not_allowed)` when `real_user_id` is present and equal to
/// `user_id`.
pub fn check_impersonation(claims: &IdentityClaims) -> Result<()> {
    match claims.real_user_id.as_deref() {
        Some(real) if real == claims.user_id => {
            Err(ClientError::not_allowed(MASQUERADE_NOT_ALLOWED_MESSAGE).into())
        }
        _ => Ok(()),
    }
}

/// Reject an established access context that acts as another user.
///
/// # Errors
/// `ClientError(not_allowed)` when `real_user_id` is present and differs from
/// `user_id`.
pub fn deny_act_as(context: &AccessContext) -> Result<()> {
    match context.real_user_id.as_deref() {
        Some(real) if real != context.user_id => {
            Err(ClientError::not_allowed(MASQUERADE_NOT_ALLOWED_MESSAGE).into())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use gradebridge_domain::ClientErrorCode;

    use super::*;

    fn claims(user: &str, real: Option<&str>) -> IdentityClaims {
        IdentityClaims::new("token".into(), user.into(), real.map(str::to_string))
    }

    #[test]
    fn login_check_rejects_equal_real_user() {
        let err = check_impersonation(&claims("42", Some("42"))).unwrap_err();
        assert_eq!(err.client_code(), Some(ClientErrorCode::NotAllowed));
    }

    #[test]
    fn login_check_accepts_absent_real_user() {
        for user in ["1", "42", ""] {
            assert!(check_impersonation(&claims(user, None)).is_ok());
        }
    }

    #[test]
    fn login_check_lets_differing_real_user_through() {
        assert!(check_impersonation(&claims("42", Some("7"))).is_ok());
    }

    #[test]
    fn request_check_rejects_acting_as_other_user() {
        let context = AccessContext::from(claims("42", Some("7")));
        let err = deny_act_as(&context).unwrap_err();
        assert_eq!(err.client_code(), Some(ClientErrorCode::NotAllowed));
    }

    #[test]
    fn request_check_accepts_plain_and_same_user_sessions() {
        assert!(deny_act_as(&AccessContext::from(claims("42", None))).is_ok());
        assert!(deny_act_as(&AccessContext::from(claims("42", Some("42")))).is_ok());
    }
}
