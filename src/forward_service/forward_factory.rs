use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use futures_core::future::LocalBoxFuture;

use crate::forward_service::forward_route_service::ForwardRouteService;
use crate::forward_service::forwarder::Forwarder;

pub struct ForwardRouteServiceFactory {
  pub forwarder: Arc<Forwarder>,
}

impl ServiceFactory<ServiceRequest> for ForwardRouteServiceFactory {
  type Response = ServiceResponse;
  type Error = actix_web::Error;
  type Config = ();
  type Service = ForwardRouteService;
  type InitError = ();
  type Future = LocalBoxFuture<'static, Result<Self::Service, Self::InitError>>;

  fn new_service(&self, _: Self::Config) -> Self::Future {
    let service = ForwardRouteService {
      forwarder: self.forwarder.clone(),
    };

    Box::pin(async move { Ok(service) })
  }
}

impl ForwardRouteServiceFactory {
  pub fn create(forwarder: Arc<Forwarder>) -> Self {
    Self { forwarder }
  }
}
