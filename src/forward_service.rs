use actix_web::http::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

pub mod forward_config;
pub mod forward_error;
pub mod forward_factory;
pub mod forward_route_service;
pub mod forwarder;
pub mod inbound;
pub mod inbound_body;

/// Caller headers bound to the caller's own connection or recomputed by the
/// outbound transport.
pub const REQUEST_HEADER_DENYLIST: [&str; 3] = ["host", "connection", "content-length"];

/// Target headers describing the proxy's connection to the target.
pub const RESPONSE_HEADER_DENYLIST: [&str; 2] = ["connection", "transfer-encoding"];

#[inline]
fn is_listed(name: &HeaderName, denylist: &[&str]) -> bool {
  denylist.iter().any(|denied| name.as_str().eq_ignore_ascii_case(denied))
}

/// Caller headers that travel to the target, every value of a repeated header
/// included.
pub fn forwardable_request_headers(headers: &HeaderMap) -> HeaderMap {
  headers
    .iter()
    .filter(|(name, _)| !is_listed(name, &REQUEST_HEADER_DENYLIST))
    .map(|(name, value)| (name.clone(), value.clone()))
    .collect()
}

/// Target headers that are relayed back to the caller.
pub fn relayable_response_headers(headers: &HeaderMap) -> impl Iterator<Item = (&HeaderName, &HeaderValue)> {
  headers
    .iter()
    .filter(|(name, _)| !is_listed(name, &RESPONSE_HEADER_DENYLIST))
}

/// Only these methods carry the caller's body to the target.
#[inline]
pub fn attaches_body(method: &Method) -> bool {
  ["POST", "PUT", "PATCH"]
    .iter()
    .any(|candidate| method.as_str().eq_ignore_ascii_case(candidate))
}
