use std::sync::Arc;

use actix_web::dev::{self, Payload, Service, ServiceRequest, ServiceResponse};
use actix_web::http::header::CONTENT_LENGTH;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use bytes::{Bytes, BytesMut};
use futures_core::future::LocalBoxFuture;
use futures_util::StreamExt;
use log::{error, warn};

use crate::forward_service::forward_error::ForwardError;
use crate::forward_service::forwarder::Forwarder;
use crate::forward_service::inbound::InboundRequest;

pub struct ForwardRouteService {
  pub(super) forwarder: Arc<Forwarder>,
}

impl Service<ServiceRequest> for ForwardRouteService {
  type Response = ServiceResponse;
  type Error = actix_web::Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  dev::always_ready!();

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let (http_request, payload) = req.into_parts();
    let forwarder = self.forwarder.clone();

    Box::pin(async move {
      let response = match ForwardRouteService::exec(&forwarder, &http_request, payload).await {
        Ok(response) => response,
        Err(err) if err.is_client_input() => {
          warn!("Rejected proxy request {}", err);
          err.error_response()
        }
        Err(err) => {
          error!("Proxy request failed {}", err);
          err.error_response()
        }
      };

      Ok(ServiceResponse::new(http_request, response))
    })
  }
}

impl ForwardRouteService {
  async fn exec(forwarder: &Forwarder, http: &HttpRequest, payload: Payload) -> Result<HttpResponse, ForwardError> {
    let body = read_payload(http, payload, forwarder.config().body_limit).await?;
    let inbound = InboundRequest::from_parts(http, body)?;

    forwarder.forward(inbound).await
  }
}

async fn read_payload(http: &HttpRequest, mut payload: Payload, limit: usize) -> Result<Bytes, ForwardError> {
  let declared = http
    .headers()
    .get(CONTENT_LENGTH)
    .and_then(|value| value.to_str().ok())
    .and_then(|value| value.parse::<usize>().ok());

  if declared.is_some_and(|size| size > limit) {
    return Err(ForwardError::PayloadTooLarge { limit });
  }

  let mut body_buffer = BytesMut::with_capacity(declared.unwrap_or_default());

  while let Some(chunk) = payload.next().await {
    let bytes = chunk.map_err(|err| ForwardError::InvalidBody(err.to_string()))?;

    if body_buffer.len() + bytes.len() > limit {
      return Err(ForwardError::PayloadTooLarge { limit });
    }

    body_buffer.extend_from_slice(&bytes);
  }

  Ok(body_buffer.freeze())
}
