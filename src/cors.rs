use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{self, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{
  ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use actix_web::http::Method;
use actix_web::middleware::DefaultHeaders;
use actix_web::{Error, HttpResponse};
use futures_core::future::LocalBoxFuture;
use futures_util::future::{ready, Ready};

pub const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, PATCH, OPTIONS";

/// Allow headers for every origin, method and request header. Values already
/// on a response, such as ones relayed from a target, are kept.
pub fn allow_all_headers() -> DefaultHeaders {
  DefaultHeaders::new()
    .add((ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
    .add((ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS))
    .add((ACCESS_CONTROL_ALLOW_HEADERS, "*"))
}

/// Answers every `OPTIONS` request itself with an empty 200, whatever the
/// path. Wrap it inside [`allow_all_headers`] so the reply carries the allow
/// headers.
pub struct PermissiveCors;

impl<S, B> Transform<S, ServiceRequest> for PermissiveCors
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
  S::Future: 'static,
  B: MessageBody + 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Transform = PermissiveCorsMiddleware<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(PermissiveCorsMiddleware { service }))
  }
}

pub struct PermissiveCorsMiddleware<S> {
  service: S,
}

impl<S, B> Service<ServiceRequest> for PermissiveCorsMiddleware<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
  S::Future: 'static,
  B: MessageBody + 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  dev::forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    if req.method() == Method::OPTIONS {
      let response = req.into_response(HttpResponse::Ok().finish()).map_into_right_body();

      return Box::pin(async move { Ok(response) });
    }

    let fut = self.service.call(req);

    Box::pin(async move { fut.await.map(|response| response.map_into_left_body()) })
  }
}
