//! HTTP Error Translation
//!
//! Maps transport failures and non-success statuses onto the client's
//! error taxonomy:
//!
//! | Condition            | Error                                      |
//! |----------------------|--------------------------------------------|
//! | connection refused   | `Error::BackendUnreachable`                |
//! | HTTP 422             | `Error::Validation` with backend detail    |
//! | HTTP 5xx             | `Error::Server` with backend detail        |
//! | anything else        | `Error::Http` / `Error::Status` unchanged  |

use std::io::ErrorKind;

use reqwest::StatusCode;
use serde_json::Value;

use crate::error::Error;
use crate::i18n::tr;

/// Translate an error raised while sending a request
///
/// Only a refused connection becomes [`Error::BackendUnreachable`]; DNS,
/// TLS and timeout failures keep the transport error.
pub fn translate_send_error(err: reqwest::Error) -> Error {
    if err.is_connect() && is_connection_refused(&err) {
        Error::BackendUnreachable
    } else {
        Error::Http { source: err }
    }
}

/// Whether an `io::Error` with `ConnectionRefused` sits in the source chain
fn is_connection_refused(err: &reqwest::Error) -> bool {
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        if cause
            .downcast_ref::<std::io::Error>()
            .is_some_and(|io| io.kind() == ErrorKind::ConnectionRefused)
        {
            return true;
        }
        source = cause.source();
    }
    false
}

/// Translate a non-success response into an error
pub fn translate_status(status: StatusCode, body: &str) -> Error {
    if status == StatusCode::UNPROCESSABLE_ENTITY {
        let detail = extract_detail(body).unwrap_or_else(|| tr("errors.validation_fallback"));
        return Error::Validation { detail };
    }

    if status.is_server_error() {
        let detail = extract_detail(body).unwrap_or_else(|| tr("errors.server_fallback"));
        return Error::Server {
            status: status.as_u16(),
            detail,
        };
    }

    Error::Status {
        status: status.as_u16(),
        body: body.to_string(),
    }
}

/// Read the `detail` field of a backend error body
///
/// String details are returned as-is; structured details (such as a list of
/// field validation errors) are rendered as compact JSON.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Locale, format_args_in, tr_in};

    #[test]
    fn validation_error_carries_detail() {
        let err = translate_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail": "email fehlt"}"#,
        );
        assert!(matches!(&err, Error::Validation { detail } if detail == "email fehlt"));
    }

    #[test]
    fn validation_error_falls_back_without_detail() {
        let err = translate_status(StatusCode::UNPROCESSABLE_ENTITY, "not json");
        match err {
            Error::Validation { detail } => assert!(!detail.is_empty()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn structured_detail_is_rendered_as_json() {
        let body = r#"{"detail": [{"loc": ["body", "email"], "msg": "field required"}]}"#;
        let detail = extract_detail(body).expect("detail");
        assert!(detail.starts_with('['));
        assert!(detail.contains("field required"));
    }

    #[test]
    fn server_errors_cover_the_5xx_range() {
        for code in [500u16, 502, 503, 599] {
            let status = StatusCode::from_u16(code).expect("status");
            let err = translate_status(status, r#"{"detail": "kaputt"}"#);
            assert!(
                matches!(&err, Error::Server { status, detail } if *status == code && detail == "kaputt"),
                "code {code} translated to {err:?}"
            );
        }
    }

    #[test]
    fn other_statuses_pass_through() {
        let err = translate_status(StatusCode::NOT_FOUND, r#"{"detail": "Task nicht gefunden"}"#);
        match err {
            Error::Status { status, body } => {
                assert_eq!(status, 404);
                assert!(body.contains("Task nicht gefunden"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn translated_messages_read_as_expected() {
        assert_eq!(
            tr_in(Locale::De, "errors.backend_unreachable"),
            "Backend nicht erreichbar. Bitte Backend starten."
        );
        assert_eq!(
            format_args_in(Locale::De, "errors.validation", &[("detail", "x")]),
            "Validierungsfehler: x"
        );
    }
}
