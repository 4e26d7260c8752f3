use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{Delivery, DeliveryError, Envelope, MailTransport};

/// Transactional email over the Resend HTTP API.
pub struct ResendTransport {
    client: reqwest::Client,
    api_url: String,
    api_key: SecretString,
    timeout: Duration,
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    reply_to: &'a str,
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct SendEmailResponse {
    id: Option<String>,
}

impl ResendTransport {
    pub fn new(api_url: impl Into<String>, api_key: SecretString, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key,
            timeout,
        }
    }
}

#[async_trait]
impl MailTransport for ResendTransport {
    fn name(&self) -> &'static str {
        "resend"
    }

    async fn deliver(&self, envelope: &Envelope) -> Result<Delivery, DeliveryError> {
        let payload = SendEmailRequest {
            from: &envelope.from,
            to: [&envelope.to],
            reply_to: &envelope.reply_to,
            subject: &envelope.subject,
            html: &envelope.html,
            text: &envelope.text,
        };

        let response = self
            .client
            .post(format!("{}/emails", self.api_url))
            .bearer_auth(self.api_key.expose_secret())
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    DeliveryError::TimedOut(self.timeout)
                } else {
                    DeliveryError::Transport(err.without_url().to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        let body: SendEmailResponse = response
            .json()
            .await
            .map_err(|err| DeliveryError::Transport(format!("unreadable provider reply: {err}")))?;

        Ok(Delivery {
            provider_message_id: body.id,
        })
    }
}
