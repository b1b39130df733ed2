//! Conversions from external infrastructure errors into domain errors.
//!
//! `reqwest::Error` keeps its request URL and a boxed source chain that can
//! reach into the TLS connector. Nothing of it survives conversion: only a
//! classified description and the status code are copied out.

use gradebridge_domain::{GradeBridgeError, TransportError};
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub GradeBridgeError);

impl From<InfraError> for GradeBridgeError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<GradeBridgeError> for InfraError {
    fn from(value: GradeBridgeError) -> Self {
        Self(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoTransportError {
    fn into_transport(self) -> TransportError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → TransportError */
/* -------------------------------------------------------------------------- */

impl IntoTransportError for HttpError {
    fn into_transport(self) -> TransportError {
        if self.is_timeout() {
            return TransportError::new("HTTP request timed out");
        }

        if self.is_connect() {
            return TransportError::new("HTTP connection failure");
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            return TransportError::with_status(status_message(status), code);
        }

        if self.is_decode() {
            return TransportError::new("HTTP response body could not be decoded");
        }

        if self.is_body() {
            return TransportError::new("HTTP body could not be transferred");
        }

        if self.is_builder() {
            return TransportError::new("HTTP request could not be built");
        }

        // Display of a url-less reqwest error is its kind only, never the
        // source chain.
        TransportError::new(self.without_url().to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(GradeBridgeError::Transport(value.into_transport()))
    }
}

/// Sanitize a transport failure straight into the domain error.
pub(crate) fn sanitize(err: HttpError) -> GradeBridgeError {
    InfraError::from(err).into()
}

/// `HTTP 404 Not Found`
pub(crate) fn status_message(status: reqwest::StatusCode) -> String {
    format!("HTTP {} {}", status.as_u16(), status.canonical_reason().unwrap_or("unknown status"))
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use reqwest::{Client, StatusCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn http_status_keeps_code_only() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::UNAUTHORIZED))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        match sanitize(error) {
            GradeBridgeError::Transport(err) => {
                assert_eq!(err.status(), Some(401));
                assert!(err.message().contains("401"));
                assert!(!err.message().contains(&server.uri()));
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn connection_failure_drops_url() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener); // release the port so that requests fail with ECONNREFUSED
        let url = format!("http://{addr}/secret-path");

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(&url).send().await.unwrap_err();

        let mapped = sanitize(error);
        assert_eq!(mapped.kind(), "transport");
        assert!(!mapped.to_string().contains("secret-path"));
    }
}
