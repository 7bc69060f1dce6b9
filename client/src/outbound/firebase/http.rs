//! Response helpers shared by the Firebase adapters.

use reqwest::{RequestBuilder, StatusCode};

use super::dto::GoogleErrorDto;
use super::session::SessionHandle;

/// Failure classes every adapter maps into its own port error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum HttpFailure {
    /// Transport error, timeout, throttling or server fault.
    Unavailable(String),
    /// The service refused the request.
    Refused(String),
    /// The addressed resource does not exist.
    Missing(String),
}

pub(super) fn transport_failure(error: &reqwest::Error) -> HttpFailure {
    if error.is_timeout() {
        HttpFailure::Unavailable(format!("timed out: {error}"))
    } else {
        HttpFailure::Unavailable(error.to_string())
    }
}

/// Classify a non-success status, preferring the API's own error code.
pub(super) fn status_failure(status: StatusCode, body: &[u8]) -> HttpFailure {
    let message = api_message(body).unwrap_or_else(|| {
        let preview = body_preview(body);
        if preview.is_empty() {
            format!("status {}", status.as_u16())
        } else {
            format!("status {}: {preview}", status.as_u16())
        }
    });

    match status {
        StatusCode::NOT_FOUND => HttpFailure::Missing(message),
        StatusCode::TOO_MANY_REQUESTS
        | StatusCode::REQUEST_TIMEOUT
        | StatusCode::GATEWAY_TIMEOUT => HttpFailure::Unavailable(message),
        _ if status.is_client_error() => HttpFailure::Refused(message),
        _ => HttpFailure::Unavailable(message),
    }
}

fn api_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<GoogleErrorDto>(body)
        .ok()
        .map(|envelope| envelope.error.message)
        .filter(|message| !message.trim().is_empty())
}

pub(super) fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

/// Attach the session's ID token when one is held.
pub(super) fn authorised(request: RequestBuilder, session: &SessionHandle) -> RequestBuilder {
    match session.bearer() {
        Some(token) => request.bearer_auth(token.as_str()),
        None => request,
    }
}

/// Send `request` and return the body of a successful response.
pub(super) async fn send(request: RequestBuilder) -> Result<Vec<u8>, HttpFailure> {
    let response = request.send().await.map_err(|err| transport_failure(&err))?;
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|err| transport_failure(&err))?;
    if status.is_success() {
        Ok(body.to_vec())
    } else {
        Err(status_failure(status, body.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the shared status mapping.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::not_found(StatusCode::NOT_FOUND, "Missing")]
    #[case::rate_limited(StatusCode::TOO_MANY_REQUESTS, "Unavailable")]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, "Unavailable")]
    #[case::bad_request(StatusCode::BAD_REQUEST, "Refused")]
    #[case::forbidden(StatusCode::FORBIDDEN, "Refused")]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, "Unavailable")]
    fn maps_http_statuses_to_failure_classes(#[case] status: StatusCode, #[case] expected: &str) {
        let failure = status_failure(status, b"backend unavailable");
        let class = match failure {
            HttpFailure::Unavailable(_) => "Unavailable",
            HttpFailure::Refused(_) => "Refused",
            HttpFailure::Missing(_) => "Missing",
        };
        assert_eq!(class, expected);
    }

    #[test]
    fn google_error_code_is_preferred_over_raw_body() {
        let body = br#"{"error":{"code":400,"message":"INVALID_LOGIN_CREDENTIALS","errors":[]}}"#;
        assert_eq!(
            status_failure(StatusCode::BAD_REQUEST, body),
            HttpFailure::Refused("INVALID_LOGIN_CREDENTIALS".to_owned())
        );
    }

    #[test]
    fn raw_bodies_are_previewed_with_status() {
        let body = "x ".repeat(200);
        let HttpFailure::Unavailable(message) =
            status_failure(StatusCode::BAD_GATEWAY, body.as_bytes())
        else {
            panic!("expected unavailable");
        };
        assert!(message.starts_with("status 502: x x"));
        assert!(message.ends_with("..."));
    }

    #[test]
    fn empty_bodies_report_status_only() {
        assert_eq!(
            status_failure(StatusCode::SERVICE_UNAVAILABLE, b""),
            HttpFailure::Unavailable("status 503".to_owned())
        );
    }
}
