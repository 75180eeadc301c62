use actix_web::HttpResponse;
use log::debug;
use reqwest::{Client, Request, Response};

use crate::forward_service::forward_config::ForwardConfig;
use crate::forward_service::forward_error::ForwardError;
use crate::forward_service::inbound::InboundRequest;
use crate::forward_service::{attaches_body, forwardable_request_headers, relayable_response_headers};

/// Stateless translator between one caller request and one target request.
pub struct Forwarder {
  http_client: Client,
  config: ForwardConfig,
}

impl Forwarder {
  pub fn new(http_client: Client, config: ForwardConfig) -> Self {
    Self { http_client, config }
  }

  pub fn config(&self) -> &ForwardConfig {
    &self.config
  }

  pub fn build_request(&self, inbound: InboundRequest) -> Result<Request, ForwardError> {
    let InboundRequest {
      method,
      target,
      headers,
      query,
      body,
    } = inbound;

    let carries_body = attaches_body(&method);
    let mut builder = self
      .http_client
      .request(method, target)
      .headers(forwardable_request_headers(&headers));

    if !query.is_empty() {
      builder = builder.query(&query);
    }

    if let (true, Some(body)) = (carries_body, body) {
      debug!("Attaching {:?} body of {} bytes", body.kind(), body.size());
      builder = builder.body(body.into_bytes());
    }

    builder.build().map_err(ForwardError::from_transport)
  }

  pub async fn forward(&self, inbound: InboundRequest) -> Result<HttpResponse, ForwardError> {
    let request = self.build_request(inbound)?;
    debug!("Forwarding {} {}", request.method(), request.url());

    let response = self
      .http_client
      .execute(request)
      .await
      .map_err(ForwardError::from_transport)?;

    debug!("Target response {:?}", &response);

    let status = response.status();
    let mut reply = Forwarder::map_response_head(&response);
    let body = response
      .bytes()
      .await
      .map_err(|err| ForwardError::from_body(status, err))?;

    Ok(reply.body(body))
  }

  fn map_response_head(response: &Response) -> actix_web::HttpResponseBuilder {
    let mut reply = HttpResponse::build(response.status());

    for (name, value) in relayable_response_headers(response.headers()) {
      reply.append_header((name.clone(), value.clone()));
    }

    reply
  }
}
