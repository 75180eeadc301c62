use actix_web::http::header::CONTENT_TYPE;
use actix_web::http::Method;
use actix_web::web::Query;
use actix_web::HttpRequest;
use bytes::Bytes;
use log::warn;
use reqwest::header::HeaderMap;
use reqwest::Url;

use crate::forward_service::forward_error::ForwardError;
use crate::forward_service::inbound_body::InboundBody;

pub const TARGET_PARAM: &str = "url";

/// Everything the forwarder needs from one caller request.
#[derive(Debug)]
pub struct InboundRequest {
  pub method: Method,
  pub target: Url,
  pub headers: HeaderMap,
  pub query: Vec<(String, String)>,
  pub body: Option<InboundBody>,
}

impl InboundRequest {
  pub fn from_parts(request: &HttpRequest, body: Bytes) -> Result<InboundRequest, ForwardError> {
    let (target, query) = split_target(request.query_string())?;

    let content_type = request
      .headers()
      .get(CONTENT_TYPE)
      .and_then(|value| value.to_str().ok());
    let body = InboundBody::decode(content_type, body)?;

    let headers: HeaderMap = request
      .headers()
      .iter()
      .map(|(name, value)| (name.clone(), value.clone()))
      .collect();

    Ok(InboundRequest {
      method: request.method().clone(),
      target,
      headers,
      query,
      body,
    })
  }
}

/// Separates the target from the parameters that travel with it. Repeated
/// `url` keys are dropped after the first one.
fn split_target(query_string: &str) -> Result<(Url, Vec<(String, String)>), ForwardError> {
  let pairs = match Query::<Vec<(String, String)>>::from_query(query_string) {
    Ok(pairs) => pairs.into_inner(),
    Err(err) => {
      warn!("Unable to parse query parameters {}", err);
      Vec::new()
    }
  };

  let (targets, forwarded): (Vec<_>, Vec<_>) = pairs.into_iter().partition(|(name, _)| name == TARGET_PARAM);

  let provided = targets
    .into_iter()
    .map(|(_, value)| value)
    .next()
    .filter(|value| !value.is_empty())
    .ok_or(ForwardError::MissingUrl)?;

  let target = Url::parse(&provided).map_err(|err| ForwardError::InvalidUrl {
    reason: err.to_string(),
    provided,
  })?;

  Ok((target, forwarded))
}

#[cfg(test)]
mod tests {
  use actix_web::test::TestRequest;

  use super::*;

  #[test]
  fn missing_target_is_rejected() {
    assert!(matches!(split_target(""), Err(ForwardError::MissingUrl)));
    assert!(matches!(split_target("foo=bar"), Err(ForwardError::MissingUrl)));
    assert!(matches!(split_target("url="), Err(ForwardError::MissingUrl)));
  }

  #[test]
  fn invalid_target_is_echoed() {
    for value in ["not%20a%20url", "/relative/path"] {
      match split_target(&format!("url={}", value)) {
        Err(ForwardError::InvalidUrl { provided, .. }) => {
          assert_eq!(provided, value.replace("%20", " "));
        }
        other => panic!("unexpected result {:?}", other),
      }
    }
  }

  #[test]
  fn target_is_removed_from_forwarded_params() {
    let (target, query) = split_target("url=https://api.example.com/data&foo=bar&tag=a&tag=b").unwrap();

    assert_eq!(target.as_str(), "https://api.example.com/data");
    assert_eq!(
      query,
      vec![
        ("foo".to_string(), "bar".to_string()),
        ("tag".to_string(), "a".to_string()),
        ("tag".to_string(), "b".to_string()),
      ]
    );
  }

  #[test]
  fn first_target_wins() {
    let (target, query) = split_target("url=https://a.example.com/&url=https://b.example.com/").unwrap();

    assert_eq!(target.host_str(), Some("a.example.com"));
    assert!(query.is_empty());
  }

  #[test]
  fn encoded_target_keeps_its_own_query() {
    let (target, _) = split_target("url=https%3A%2F%2Fapi.example.com%2Fsearch%3Fq%3Drust").unwrap();
    assert_eq!(target.as_str(), "https://api.example.com/search?q=rust");
  }

  #[test]
  fn builds_from_http_request() {
    let request = TestRequest::post()
      .uri("/proxy?url=https://api.example.com/items&page=2")
      .insert_header(("content-type", "application/json"))
      .insert_header(("x-api-key", "secret"))
      .to_http_request();

    let inbound = InboundRequest::from_parts(&request, Bytes::from_static(b"{\"name\":\"x\"}")).unwrap();

    assert_eq!(inbound.method, Method::POST);
    assert_eq!(inbound.target.as_str(), "https://api.example.com/items");
    assert_eq!(inbound.query, vec![("page".to_string(), "2".to_string())]);
    assert_eq!(inbound.headers.get("x-api-key").unwrap(), "secret");
    assert!(inbound.body.is_some());
  }

  #[test]
  fn malformed_json_body_fails() {
    let request = TestRequest::post()
      .uri("/proxy?url=https://api.example.com/items")
      .insert_header(("content-type", "application/json"))
      .to_http_request();

    let err = InboundRequest::from_parts(&request, Bytes::from_static(b"{oops")).unwrap_err();
    assert!(matches!(err, ForwardError::InvalidBody(_)));
  }
}
