//! Outbound notification delivery.
//!
//! A [`Dispatcher`] owns the provider credentials and the addresses taken from
//! configuration, wraps each [`EmailMessage`] in an [`Envelope`] and hands it to
//! one [`MailTransport`]. Exactly one attempt is made per submission.

mod resend;
mod smtp;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use super::compose::EmailMessage;
use crate::config::{MailSettings, MailTransportKind};

pub use resend::ResendTransport;
pub use smtp::SmtpRelayTransport;

/// Provider-ready message: the composed content plus sender and recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope {
    pub from: String,
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delivery {
    pub provider_message_id: Option<String>,
}

/// Setting the selected transport needs but configuration did not provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MissingSetting {
    #[error("RESEND_API_KEY is not set")]
    ApiKey,
    #[error("no recipient address configured (CONTACT_RECIPIENT_EMAIL)")]
    RecipientAddress,
    #[error("SMTP_USER is not set")]
    SmtpUsername,
    #[error("SMTP_PASS is not set")]
    SmtpPassword,
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("provider rejected the message with status {status}: {detail}")]
    Rejected { status: u16, detail: String },
    #[error("provider unreachable: {0}")]
    Transport(String),
    #[error("invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },
    #[error("provider did not answer within {0:?}")]
    TimedOut(Duration),
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("mail configuration incomplete: {0}")]
    Configuration(#[from] MissingSetting),
    #[error("mail delivery failed: {0}")]
    Delivery(#[from] DeliveryError),
}

pub type DispatchResult = Result<Delivery, DispatchError>;

/// Capability to hand one envelope to an email provider.
#[async_trait]
pub trait MailTransport: Send + Sync {
    fn name(&self) -> &'static str;

    async fn deliver(&self, envelope: &Envelope) -> Result<Delivery, DeliveryError>;
}

#[derive(Clone)]
struct Route {
    transport: Arc<dyn MailTransport>,
    from: String,
    to: String,
}

#[derive(Clone)]
pub struct Dispatcher {
    route: Result<Route, MissingSetting>,
    timeout: Duration,
}

impl Dispatcher {
    /// Builds the configured transport. Missing settings do not fail here; they
    /// are reported on every send so the process can still boot and answer.
    pub fn from_settings(settings: &MailSettings) -> Self {
        let route = match settings.transport {
            MailTransportKind::Resend => resend_route(settings),
            MailTransportKind::Smtp => smtp_route(settings),
        };

        if let Err(missing) = &route {
            tracing::warn!(
                transport = ?settings.transport,
                error = %missing,
                "mail dispatch is not configured; submissions will fail"
            );
        }

        Self {
            route,
            timeout: settings.timeout,
        }
    }

    /// Dispatcher over an explicit transport.
    pub fn with_transport(
        transport: Arc<dyn MailTransport>,
        from: impl Into<String>,
        to: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            route: Ok(Route {
                transport,
                from: from.into(),
                to: to.into(),
            }),
            timeout,
        }
    }

    /// Dispatcher that reports `missing` on every send.
    pub fn unconfigured(missing: MissingSetting) -> Self {
        Self {
            route: Err(missing),
            timeout: Duration::ZERO,
        }
    }

    pub fn transport_name(&self) -> Option<&'static str> {
        self.route.as_ref().ok().map(|route| route.transport.name())
    }

    pub async fn send(&self, message: &EmailMessage) -> DispatchResult {
        let route = self.route.as_ref().map_err(|missing| *missing)?;

        let envelope = Envelope {
            from: route.from.clone(),
            to: route.to.clone(),
            reply_to: message.reply_to.clone(),
            subject: message.subject.clone(),
            html: message.html.clone(),
            text: message.text.clone(),
        };

        let delivery = tokio::time::timeout(self.timeout, route.transport.deliver(&envelope))
            .await
            .map_err(|_| DeliveryError::TimedOut(self.timeout))??;

        Ok(delivery)
    }
}

fn sender(settings: &MailSettings, address: &str) -> String {
    format!("{} <{}>", settings.sender_name, address)
}

fn resend_route(settings: &MailSettings) -> Result<Route, MissingSetting> {
    let api_key = settings.api_key.clone().ok_or(MissingSetting::ApiKey)?;
    let to = settings
        .recipient_address
        .clone()
        .ok_or(MissingSetting::RecipientAddress)?;
    let from = settings.from_address.as_deref().unwrap_or(&to);

    Ok(Route {
        from: sender(settings, from),
        to: to.clone(),
        transport: Arc::new(ResendTransport::new(
            settings.api_url.clone(),
            api_key,
            settings.timeout,
        )),
    })
}

fn smtp_route(settings: &MailSettings) -> Result<Route, MissingSetting> {
    let smtp = &settings.smtp;
    let username = smtp.username.clone().ok_or(MissingSetting::SmtpUsername)?;
    let password = smtp.password.clone().ok_or(MissingSetting::SmtpPassword)?;
    let from = settings.from_address.as_deref().unwrap_or(&username);
    let to = settings
        .recipient_address
        .clone()
        .unwrap_or_else(|| username.clone());

    Ok(Route {
        from: sender(settings, from),
        to,
        transport: Arc::new(SmtpRelayTransport::new(
            smtp.host.clone(),
            smtp.port,
            username.clone(),
            password,
            settings.timeout,
        )),
    })
}
