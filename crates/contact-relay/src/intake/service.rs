use std::sync::Arc;

use axum::body::Bytes;
use axum::http::{header, HeaderValue, Method, StatusCode};
use tracing::{error, info, warn};

use super::client::ClientHints;
use super::compose::compose;
use super::dispatch::{DispatchError, Dispatcher};
use super::domain::{RawSubmission, SanitizedSubmission};
use super::messages::{rate_limited, Locale, Notice};
use super::response::{ContactResponse, ReplyBody, ResponseHeaders};
use super::throttle::{
    Admission, Clock, InMemoryRateLimitStore, RateLimitStore, RateLimiter, SystemClock,
};
use super::validation::validate;
use crate::config::ContactConfig;

/// One inbound request, already stripped of its transport.
#[derive(Debug, Clone)]
pub struct ContactRequest {
    pub method: Method,
    pub client: ClientHints,
    pub body: Bytes,
}

impl ContactRequest {
    pub fn new(method: Method, client: ClientHints, body: impl Into<Bytes>) -> Self {
        Self {
            method,
            client,
            body: body.into(),
        }
    }
}

/// Submission pipeline shared by every deployment shape.
pub struct ContactService<S> {
    limiter: RateLimiter<S>,
    dispatcher: Dispatcher,
    clock: Arc<dyn Clock>,
    locale: Locale,
    headers: ResponseHeaders,
}

impl ContactService<InMemoryRateLimitStore> {
    /// Production wiring: in-memory limiter, wall clock, configured transport.
    pub fn from_config(config: &ContactConfig) -> Self {
        Self::new(
            config,
            Arc::new(InMemoryRateLimitStore::default()),
            Dispatcher::from_settings(&config.mail),
            Arc::new(SystemClock),
        )
    }
}

impl<S> ContactService<S>
where
    S: RateLimitStore,
{
    pub fn new(
        config: &ContactConfig,
        store: Arc<S>,
        dispatcher: Dispatcher,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            limiter: RateLimiter::new(store, config.rate_limit),
            dispatcher,
            clock,
            locale: config.locale,
            headers: ResponseHeaders::new(&config.allowed_origin),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn limiter(&self) -> &RateLimiter<S> {
        &self.limiter
    }

    pub async fn handle(&self, request: ContactRequest) -> ContactResponse {
        if request.method == Method::OPTIONS {
            return self.headers.empty(StatusCode::OK);
        }

        if request.method != Method::POST {
            let response = self.notice(StatusCode::METHOD_NOT_ALLOWED, Notice::MethodNotAllowed);
            return ResponseHeaders::with_header(
                response,
                header::ALLOW,
                HeaderValue::from_static("POST, OPTIONS"),
            );
        }

        let raw = RawSubmission::from_json(&request.body);
        let submission = SanitizedSubmission::from_raw(&raw);

        let outcome = validate(&submission);
        if !outcome.valid() {
            info!(violations = ?outcome.errors(), "contact submission rejected");
            let reply = ReplyBody::invalid(
                outcome.summary(self.locale),
                outcome.messages(self.locale),
            );
            return self.headers.json(StatusCode::BAD_REQUEST, &reply);
        }

        let client_key = request.client.client_key();
        match self.limiter.admit(&client_key, self.clock.now()) {
            Ok(Admission::Allowed { count }) => {
                tracing::debug!(client = %client_key, count, "contact submission admitted");
            }
            Ok(Admission::Denied { retry_after_secs }) => {
                warn!(client = %client_key, retry_after_secs, "contact rate limit exceeded");
                let reply = ReplyBody::failure(rate_limited(self.locale, retry_after_secs));
                return ResponseHeaders::with_header(
                    self.headers.json(StatusCode::TOO_MANY_REQUESTS, &reply),
                    header::RETRY_AFTER,
                    HeaderValue::from(retry_after_secs),
                );
            }
            Err(err) => {
                error!(error = %err, "rate limit store failed");
                return self.notice(StatusCode::INTERNAL_SERVER_ERROR, Notice::ProcessingFailed);
            }
        }

        let message = compose(&submission);
        match self.dispatcher.send(&message).await {
            Ok(delivery) => {
                info!(
                    provider_message_id = delivery.provider_message_id.as_deref().unwrap_or("-"),
                    "contact notification dispatched"
                );
                self.notice(StatusCode::OK, Notice::Accepted)
            }
            Err(DispatchError::Configuration(missing)) => {
                error!(error = %missing, "contact mail settings missing");
                self.notice(StatusCode::INTERNAL_SERVER_ERROR, Notice::ServerMisconfigured)
            }
            Err(DispatchError::Delivery(err)) => {
                error!(error = %err, "contact notification delivery failed");
                self.notice(StatusCode::INTERNAL_SERVER_ERROR, Notice::DeliveryFailed)
            }
        }
    }

    fn notice(&self, status: StatusCode, notice: Notice) -> ContactResponse {
        let text = notice.text(self.locale);
        let reply = if status.is_success() {
            ReplyBody::success(text)
        } else {
            ReplyBody::failure(text)
        };
        self.headers.json(status, &reply)
    }
}
