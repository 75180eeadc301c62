use std::io::{Error, ErrorKind, Result};
use std::sync::Arc;

use actix_web::HttpServer;
use clap::Parser;
use log::info;

use forward_proxy::create_app;
use forward_proxy::forward_service::forward_config::ForwardConfig;
use forward_proxy::forward_service::forwarder::Forwarder;
use forward_proxy::http_client::HttpClientConfig;
use forward_proxy::settings::{CliArgs, RunMode, Settings};
use forward_proxy::std_logger;

#[actix_web::main]
async fn main() -> Result<()> {
  let settings = Settings::resolve(CliArgs::parse()).map_err(|err| Error::new(ErrorKind::Other, err))?;
  std_logger::init(settings.log_level).map_err(|err| Error::new(ErrorKind::Other, err))?;

  if settings.mode == RunMode::Production {
    info!("Production mode, no listener started. Mount `forward_proxy::configure` into the host server.");
    return Ok(());
  }

  let http_client = HttpClientConfig::from(&settings)
    .to_client()
    .map_err(|err| Error::new(ErrorKind::Other, err))?;

  let forwarder = Arc::new(Forwarder::new(
    http_client,
    ForwardConfig {
      body_limit: settings.body_limit,
    },
  ));

  info!(
    "Proxy server running on {}:{} with {} workers, outbound timeout {:?}.",
    settings.bind, settings.port, settings.workers, settings.timeout
  );

  HttpServer::new(move || create_app(forwarder.clone()))
    .workers(settings.workers)
    .bind((settings.bind.as_str(), settings.port))?
    .run()
    .await
}
