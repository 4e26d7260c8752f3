use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::{ConnectInfo, Request, State},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};

use super::client::ClientHints;
use super::response::ContactResponse;
use super::service::{ContactRequest, ContactService};
use super::throttle::RateLimitStore;

/// Largest request body read from the socket.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

pub const CONTACT_PATH: &str = "/api/contact";

/// Router exposing the contact endpoint for every method; the service decides
/// which ones it answers.
pub fn contact_router<S>(service: Arc<ContactService<S>>) -> Router
where
    S: RateLimitStore + 'static,
{
    Router::new()
        .route(CONTACT_PATH, any(contact_handler::<S>))
        .with_state(service)
}

pub(crate) async fn contact_handler<S>(
    State(service): State<Arc<ContactService<S>>>,
    request: Request,
) -> Response
where
    S: RateLimitStore + 'static,
{
    let (parts, body) = request.into_parts();
    let peer = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    let body = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::debug!(error = %err, "contact body unreadable; treating as empty");
            Default::default()
        }
    };

    let request = ContactRequest::new(
        parts.method,
        ClientHints::from_headers(&parts.headers, peer),
        body,
    );

    service.handle(request).await.into_response()
}

impl IntoResponse for ContactResponse {
    fn into_response(self) -> Response {
        let mut response = match self.body {
            Some(body) => Response::new(Body::from(body)),
            None => Response::new(Body::empty()),
        };
        *response.status_mut() = self.status;
        response.headers_mut().extend(self.headers);
        response
    }
}
