//! AWS Lambda adapter for the contact pipeline.
//!
//! Each warm instance owns its own [`ContactService`], so the rate-limit table is
//! per instance rather than global.

use std::net::IpAddr;

use contact_relay::intake::{
    ClientHints, ContactRequest, ContactResponse, ContactService, RateLimitStore,
};
use lambda_http::request::RequestContext;
use lambda_http::{Body, Error, Request, RequestExt, Response};

/// Translates one Lambda HTTP event through the shared pipeline.
pub async fn handle<S>(
    service: &ContactService<S>,
    event: Request,
) -> Result<Response<Body>, Error>
where
    S: RateLimitStore,
{
    let peer = source_ip(&event);
    let client = ClientHints::from_headers(event.headers(), peer);
    let (parts, body) = event.into_parts();

    let request = ContactRequest::new(parts.method, client, body.to_vec());
    Ok(into_lambda_response(service.handle(request).await))
}

fn source_ip(event: &Request) -> Option<IpAddr> {
    let raw = match event.request_context_ref()? {
        RequestContext::ApiGatewayV1(context) => context.identity.source_ip.as_deref(),
        RequestContext::ApiGatewayV2(context) => context.http.source_ip.as_deref(),
        _ => None,
    }?;
    raw.parse().ok()
}

fn into_lambda_response(response: ContactResponse) -> Response<Body> {
    let body = match response.body {
        Some(text) => Body::Text(text),
        None => Body::Empty,
    };

    let mut lambda_response = Response::new(body);
    *lambda_response.status_mut() = response.status;
    lambda_response.headers_mut().extend(response.headers);
    lambda_response
}
