use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use serde::{Deserialize, Serialize};

/// JSON reply sent for every outcome except the preflight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyBody {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

/// Transport-neutral response produced by the submission pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl ContactResponse {
    /// Decodes the JSON body, if any.
    pub fn reply(&self) -> Option<ReplyBody> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_str(body).ok())
    }
}

/// Headers attached to every contact response.
#[derive(Debug, Clone)]
pub(crate) struct ResponseHeaders {
    allowed_origin: HeaderValue,
}

impl ResponseHeaders {
    pub(crate) fn new(allowed_origin: &str) -> Self {
        let allowed_origin = HeaderValue::from_str(allowed_origin).unwrap_or_else(|_| {
            tracing::warn!(
                origin = allowed_origin,
                "allowed origin is not a valid header value; falling back to '*'"
            );
            HeaderValue::from_static("*")
        });
        Self { allowed_origin }
    }

    fn base(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            self.allowed_origin.clone(),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        );
        headers.insert(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        );
        headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
        headers.insert(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        );
        headers
    }

    pub(crate) fn empty(&self, status: StatusCode) -> ContactResponse {
        ContactResponse {
            status,
            headers: self.base(),
            body: None,
        }
    }

    pub(crate) fn json(&self, status: StatusCode, reply: &ReplyBody) -> ContactResponse {
        let mut headers = self.base();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );

        let body = match serde_json::to_string(reply) {
            Ok(body) => body,
            Err(err) => {
                tracing::error!(error = %err, "failed to encode contact reply");
                r#"{"success":false,"message":""}"#.to_string()
            }
        };

        ContactResponse {
            status,
            headers,
            body: Some(body),
        }
    }

    pub(crate) fn with_header(
        mut response: ContactResponse,
        name: HeaderName,
        value: HeaderValue,
    ) -> ContactResponse {
        response.headers.insert(name, value);
        response
    }
}

impl ReplyBody {
    pub(crate) fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            errors: None,
        }
    }

    pub(crate) fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: None,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: Some(errors),
        }
    }
}
