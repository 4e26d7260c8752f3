//! Contact form intake: sanitize, validate, throttle, compose and dispatch one
//! visitor submission, then shape the reply for whichever transport carried it.

pub mod client;
pub mod compose;
pub mod dispatch;
pub mod domain;
pub mod messages;
pub mod response;
pub mod router;
pub mod sanitizer;
pub mod service;
pub mod throttle;
pub mod validation;

#[cfg(test)]
mod tests;

pub use client::{ClientHints, UNKNOWN_CLIENT};
pub use compose::{compose, escape_html, EmailMessage};
pub use dispatch::{
    Delivery, DeliveryError, DispatchError, DispatchResult, Dispatcher, Envelope, MailTransport,
    MissingSetting, ResendTransport, SmtpRelayTransport,
};
pub use domain::{ProficiencyLevel, RawSubmission, SanitizedSubmission};
pub use messages::{Locale, Notice};
pub use response::{ContactResponse, ReplyBody};
pub use router::{contact_router, CONTACT_PATH, MAX_BODY_BYTES};
pub use sanitizer::sanitize;
pub use service::{ContactRequest, ContactService};
pub use throttle::{
    Admission, Clock, InMemoryRateLimitStore, RateLimitEntry, RateLimitStore, RateLimiter,
    StoreError, SystemClock, DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW,
};
pub use validation::{validate, FieldViolation, ValidationOutcome};
