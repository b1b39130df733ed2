//! Validation of the two browser hops of the OAuth login flow.

use gradebridge_domain::{
    AuthorizationCode, CallbackQuery, ClientError, ClientErrorCode, LtiLaunch, Result,
};
use tracing::warn;

/// Extract the course id from the LTI launch that starts the login flow.
///
/// # Errors
/// - `missing_body` when there is no launch body at all
/// - `missing_attribute` when `custom_canvas_course_id` is absent or empty
pub fn validate_launch(launch: Option<&LtiLaunch>) -> Result<String> {
    let Some(launch) = launch else {
        warn!("Missing body in the launch request");
        return Err(ClientError::new(ClientErrorCode::MissingBody, "").into());
    };

    match launch.custom_canvas_course_id.as_deref() {
        Some(course_id) if !course_id.is_empty() => Ok(course_id.to_string()),
        _ => {
            warn!("Body attribute \"custom_canvas_course_id\" missing");
            Err(ClientError::new(ClientErrorCode::MissingAttribute, "").into())
        }
    }
}

/// Validate the query the LMS redirects back with.
///
/// Checks run in a fixed order so the most specific problem is reported.
///
/// # Errors
/// - `missing_query_parameters` when there is no `course_id`
/// - `access_denied` when the user declined, or no `code` came back
/// - `unknown_oauth_error` for any other `error` value
pub fn validate_callback(query: Option<&CallbackQuery>) -> Result<AuthorizationCode> {
    let Some((query, course_id)) = query.and_then(|q| {
        q.course_id.as_deref().filter(|id| !id.is_empty()).map(|id| (q, id.to_string()))
    }) else {
        return Err(ClientError::new(
            ClientErrorCode::MissingQueryParameters,
            "Missing query parameter [course_id]",
        )
        .into());
    };

    match query.error.as_deref() {
        Some("access_denied") => {
            return Err(ClientError::new(
                ClientErrorCode::AccessDenied,
                "The user has not authorized the app. Obtained query parameter \
                 [error=access_denied]",
            )
            .into());
        }
        Some(other) if !other.is_empty() => {
            return Err(ClientError::new(
                ClientErrorCode::UnknownOauthError,
                format!("Unexpected query parameter [error={other}] received from Canvas"),
            )
            .into());
        }
        _ => {}
    }

    match query.code.as_deref() {
        Some(code) if !code.is_empty() => Ok(AuthorizationCode { code: code.to_string(), course_id }),
        _ => Err(ClientError::new(
            ClientErrorCode::AccessDenied,
            "The user has not authorized the app. Missing query parameter [code]",
        )
        .into()),
    }
}
