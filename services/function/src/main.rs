use contact_relay::config::{ContactConfig, TelemetryConfig};
use contact_relay::intake::ContactService;
use contact_relay::telemetry;
use lambda_http::{run, service_fn, Error};

#[tokio::main]
async fn main() -> Result<(), Error> {
    telemetry::init(&TelemetryConfig::from_env()?)?;
    let config = ContactConfig::from_env()?;

    tracing::info!(
        locale = %config.locale,
        transport = ?config.mail.transport,
        "contact function initialized"
    );

    let service = ContactService::from_config(&config);
    run(service_fn(|event| contact_relay_function::handle(&service, event))).await
}
