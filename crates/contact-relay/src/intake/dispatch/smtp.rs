use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::{ExposeSecret, SecretString};

use super::{Delivery, DeliveryError, Envelope, MailTransport};

const IMPLICIT_TLS_PORT: u16 = 465;

/// Authenticated SMTP relay. Port 465 uses implicit TLS, any other port STARTTLS.
///
/// The session runs on the tokio runtime, so dropping a pending `deliver`
/// future closes the connection.
pub struct SmtpRelayTransport {
    host: String,
    port: u16,
    username: String,
    password: SecretString,
    timeout: Duration,
}

impl SmtpRelayTransport {
    pub fn new(
        host: String,
        port: u16,
        username: String,
        password: SecretString,
        timeout: Duration,
    ) -> Self {
        Self {
            host,
            port,
            username,
            password,
            timeout,
        }
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, DeliveryError> {
        let builder = if self.port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)
        }
        .map_err(|err| DeliveryError::Transport(format!("SMTP relay error: {err}")))?;

        let credentials = Credentials::new(
            self.username.clone(),
            self.password.expose_secret().to_string(),
        );

        Ok(builder
            .port(self.port)
            .credentials(credentials)
            .timeout(Some(self.timeout))
            .build())
    }
}

fn mailbox(address: &str) -> Result<Mailbox, DeliveryError> {
    address
        .parse()
        .map_err(|err: lettre::address::AddressError| DeliveryError::InvalidAddress {
            address: address.to_string(),
            reason: err.to_string(),
        })
}

fn build_message(envelope: &Envelope) -> Result<Message, DeliveryError> {
    let mut builder = Message::builder()
        .from(mailbox(&envelope.from)?)
        .to(mailbox(&envelope.to)?)
        .subject(envelope.subject.clone());

    match envelope.reply_to.parse::<Mailbox>() {
        Ok(reply_to) => builder = builder.reply_to(reply_to),
        Err(err) => tracing::warn!(error = %err, "skipping unparseable reply-to address"),
    }

    builder
        .multipart(MultiPart::alternative_plain_html(
            envelope.text.clone(),
            envelope.html.clone(),
        ))
        .map_err(|err| DeliveryError::Transport(format!("failed to build email: {err}")))
}

#[async_trait]
impl MailTransport for SmtpRelayTransport {
    fn name(&self) -> &'static str {
        "smtp"
    }

    async fn deliver(&self, envelope: &Envelope) -> Result<Delivery, DeliveryError> {
        let transport = self.transport()?;
        let message = build_message(envelope)?;

        transport.send(message).await.map_err(|err| {
            if err.is_timeout() {
                DeliveryError::TimedOut(self.timeout)
            } else {
                DeliveryError::Transport(format!("SMTP send failed: {err}"))
            }
        })?;

        Ok(Delivery::default())
    }
}
