use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{web, App, Error};

use crate::cors::{allow_all_headers, PermissiveCors};
use crate::forward_service::forward_factory::ForwardRouteServiceFactory;
use crate::forward_service::forwarder::Forwarder;

pub mod cors;
pub mod forward_service;
pub mod http_client;
pub mod info;
pub mod settings;
pub mod std_logger;

pub const PROXY_PATH: &str = "/proxy";
pub const USAGE: &str = "/proxy?url=https://example.com";

/// Registers `GET /` and `ALL /proxy` on a host application. The host is
/// expected to wrap its `App` with [`PermissiveCors`] inside
/// [`allow_all_headers`].
pub fn configure(forwarder: Arc<Forwarder>) -> impl FnOnce(&mut web::ServiceConfig) {
  move |cfg| {
    cfg
      .route("/", web::get().to(info::service_info))
      .service(web::service(PROXY_PATH).finish(ForwardRouteServiceFactory::create(forwarder)));
  }
}

pub fn create_app(
  forwarder: Arc<Forwarder>,
) -> App<
  impl ServiceFactory<
    ServiceRequest,
    Response = ServiceResponse<impl MessageBody>,
    Config = (),
    InitError = (),
    Error = Error,
  >,
> {
  App::new()
    .wrap(PermissiveCors)
    .wrap(allow_all_headers())
    .wrap(Logger::new("%r %s %b %Dms"))
    .configure(configure(forwarder))
}
