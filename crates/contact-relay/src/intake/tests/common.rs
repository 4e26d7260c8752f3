use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::http::Method;
use axum::response::Response;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use serde_json::{json, Value};

use crate::config::{ContactConfig, RateLimitConfig};
use crate::intake::client::ClientHints;
use crate::intake::dispatch::{Delivery, DeliveryError, Dispatcher, Envelope, MailTransport};
use crate::intake::domain::{RawSubmission, SanitizedSubmission};
use crate::intake::service::{ContactRequest, ContactService};
use crate::intake::throttle::{
    Clock, InMemoryRateLimitStore, RateLimitEntry, RateLimitStore, StoreError,
};

pub(super) const VISITOR_IP: &str = "203.0.113.7";

pub(super) fn payload() -> Value {
    json!({
        "fullName": "Ahmad Al-Sayed",
        "phone": "+962791234567",
        "email": "a@b.com",
        "telegram": "ahmad_99",
        "level": "متوسط",
        "message": "أريد التسجيل",
    })
}

pub(super) fn raw_submission() -> RawSubmission {
    serde_json::from_value(payload()).expect("canonical payload decodes")
}

pub(super) fn canonical() -> SanitizedSubmission {
    SanitizedSubmission::from_raw(&raw_submission())
}

pub(super) fn contact_config() -> ContactConfig {
    let mut config = ContactConfig::from_lookup(|_| None).expect("defaults load");
    config.allowed_origin = "https://linguaskill.example".to_string();
    config.rate_limit = RateLimitConfig::default();
    config
}

pub(super) fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub(super) fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub(super) fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock mutex poisoned");
        *now += TimeDelta::from_std(by).expect("duration fits");
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock mutex poisoned")
    }
}

#[derive(Default)]
pub(super) struct RecordingTransport {
    sent: Mutex<Vec<Envelope>>,
}

impl RecordingTransport {
    pub(super) fn sent(&self) -> Vec<Envelope> {
        self.sent.lock().expect("transport mutex poisoned").clone()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn deliver(&self, envelope: &Envelope) -> Result<Delivery, DeliveryError> {
        let mut sent = self.sent.lock().expect("transport mutex poisoned");
        sent.push(envelope.clone());
        Ok(Delivery {
            provider_message_id: Some(format!("msg-{}", sent.len())),
        })
    }
}

pub(super) struct RejectingTransport;

#[async_trait]
impl MailTransport for RejectingTransport {
    fn name(&self) -> &'static str {
        "rejecting"
    }

    async fn deliver(&self, _envelope: &Envelope) -> Result<Delivery, DeliveryError> {
        Err(DeliveryError::Rejected {
            status: 403,
            detail: "domain not verified for re_secret_key".to_string(),
        })
    }
}

pub(super) struct StalledTransport;

#[async_trait]
impl MailTransport for StalledTransport {
    fn name(&self) -> &'static str {
        "stalled"
    }

    async fn deliver(&self, _envelope: &Envelope) -> Result<Delivery, DeliveryError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(Delivery::default())
    }
}

pub(super) struct UnavailableStore;

impl RateLimitStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<RateLimitEntry>, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    fn set(&self, _key: &str, _entry: RateLimitEntry) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }
}

pub(super) fn dispatcher_over(transport: Arc<dyn MailTransport>) -> Dispatcher {
    Dispatcher::with_transport(
        transport,
        "Linguaskill Institute <noreply@linguaskill.example>",
        "office@linguaskill.example",
        Duration::from_secs(2),
    )
}

pub(super) struct Harness {
    pub(super) service: ContactService<InMemoryRateLimitStore>,
    pub(super) clock: Arc<ManualClock>,
    pub(super) transport: Arc<RecordingTransport>,
}

pub(super) fn harness() -> Harness {
    harness_with(contact_config())
}

pub(super) fn harness_with(config: ContactConfig) -> Harness {
    let clock = Arc::new(ManualClock::starting_at(epoch()));
    let transport = Arc::new(RecordingTransport::default());
    let service = ContactService::new(
        &config,
        Arc::new(InMemoryRateLimitStore::default()),
        dispatcher_over(transport.clone()),
        clock.clone(),
    );
    Harness {
        service,
        clock,
        transport,
    }
}

pub(super) fn service_with_dispatcher(
    dispatcher: Dispatcher,
) -> ContactService<InMemoryRateLimitStore> {
    ContactService::new(
        &contact_config(),
        Arc::new(InMemoryRateLimitStore::default()),
        dispatcher,
        Arc::new(ManualClock::starting_at(epoch())),
    )
}

pub(super) fn post(body: &Value) -> ContactRequest {
    post_from(body, VISITOR_IP)
}

pub(super) fn post_from(body: &Value, ip: &str) -> ContactRequest {
    let client = ClientHints {
        peer: Some(ip.parse::<IpAddr>().expect("valid ip")),
        ..ClientHints::default()
    };
    ContactRequest::new(
        Method::POST,
        client,
        serde_json::to_vec(body).expect("serialize payload"),
    )
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
