use actix_web::web::Json;
use serde::Serialize;

use crate::cors::ALLOWED_METHODS;
use crate::USAGE;

#[derive(Serialize, PartialEq, Debug)]
pub struct ServiceInfo {
  pub message: &'static str,
  pub usage: &'static str,
  pub methods: &'static str,
  pub note: &'static str,
}

pub async fn service_info() -> Json<ServiceInfo> {
  Json(ServiceInfo {
    message: "Forwarding proxy server",
    usage: USAGE,
    methods: ALLOWED_METHODS,
    note: "Headers, body and query parameters are forwarded to the target",
  })
}
