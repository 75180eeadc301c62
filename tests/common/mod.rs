//! Local target server and proxy construction shared by the integration tests.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use bytes::Bytes;
use futures_util::stream::{self, StreamExt};
use serde_json::{json, Map, Value};

use forward_proxy::forward_service::forward_config::ForwardConfig;
use forward_proxy::forward_service::forwarder::Forwarder;
use forward_proxy::http_client::HttpClientConfig;

/// Start a target server on an ephemeral port.
///
/// - `/status/{code}` answers with that status, `x-custom: abc` and a JSON body
/// - `/redirect/{hops}` redirects until `hops` reaches zero
/// - `/slow` answers after three seconds
/// - `/chunked` streams its body
/// - `/stall` sends the first body chunk, then waits three seconds for the rest
/// - anything else echoes the request it received as JSON
pub async fn start_target() -> SocketAddr {
  let server = HttpServer::new(|| {
    App::new()
      .route("/status/{code}", web::to(status))
      .route("/redirect/{hops}", web::to(redirect))
      .route("/slow", web::to(slow))
      .route("/chunked", web::get().to(chunked))
      .route("/stall", web::get().to(stall))
      .default_service(web::to(echo))
  })
  .workers(1)
  .bind(("127.0.0.1", 0))
  .unwrap();

  let addr = server.addrs()[0];
  actix_web::rt::spawn(server.run());
  addr
}

/// An address nothing listens on.
pub fn closed_addr() -> SocketAddr {
  let listener = TcpListener::bind("127.0.0.1:0").unwrap();
  listener.local_addr().unwrap()
}

/// A target that answers `200` announcing `declared` body bytes, sends only
/// `sent`, then closes the connection.
pub fn start_truncating_target(declared: usize, sent: &'static str) -> SocketAddr {
  let listener = TcpListener::bind("127.0.0.1:0").unwrap();
  let addr = listener.local_addr().unwrap();

  thread::spawn(move || {
    for connection in listener.incoming() {
      let Ok(mut socket) = connection else { break };

      let mut request = Vec::new();
      let mut buffer = [0u8; 1024];
      while !request.windows(4).any(|window| window == b"\r\n\r\n") {
        match socket.read(&mut buffer) {
          Ok(0) | Err(_) => break,
          Ok(read) => request.extend_from_slice(&buffer[..read]),
        }
      }

      let head = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\n\r\n",
        declared
      );
      let _ = socket.write_all(head.as_bytes());
      let _ = socket.write_all(sent.as_bytes());
      let _ = socket.flush();
    }
  });

  addr
}

pub fn forwarder(timeout: Duration, body_limit: usize) -> Arc<Forwarder> {
  let http_client = HttpClientConfig {
    http_proxy: None,
    user: None,
    pass: None,
    timeout,
  }
  .to_client()
  .unwrap();

  Arc::new(Forwarder::new(http_client, ForwardConfig { body_limit }))
}

pub fn default_forwarder() -> Arc<Forwarder> {
  forwarder(Duration::from_secs(10), ForwardConfig::default().body_limit)
}

async fn echo(req: HttpRequest, body: Bytes) -> HttpResponse {
  let mut headers = Map::new();
  for (name, value) in req.headers() {
    headers.insert(
      name.as_str().to_string(),
      Value::String(value.to_str().unwrap_or_default().to_string()),
    );
  }

  HttpResponse::Ok().json(json!({
    "method": req.method().as_str(),
    "path": req.path(),
    "query": req.query_string(),
    "headers": headers,
    "body": String::from_utf8_lossy(&body),
  }))
}

async fn status(code: web::Path<u16>) -> HttpResponse {
  let code = code.into_inner();
  let status = StatusCode::from_u16(code).unwrap();

  HttpResponse::build(status)
    .insert_header(("x-custom", "abc"))
    .json(json!({ "status": code }))
}

async fn redirect(hops: web::Path<u32>) -> HttpResponse {
  match hops.into_inner() {
    0 => HttpResponse::Ok().body("arrived"),
    hops => HttpResponse::Found()
      .insert_header(("location", format!("/redirect/{}", hops - 1)))
      .finish(),
  }
}

async fn slow() -> HttpResponse {
  actix_web::rt::time::sleep(Duration::from_secs(3)).await;
  HttpResponse::Ok().body("late")
}

async fn chunked() -> HttpResponse {
  let parts = vec![
    Ok::<_, actix_web::Error>(Bytes::from_static(b"part-one,")),
    Ok(Bytes::from_static(b"part-two")),
  ];

  HttpResponse::Ok()
    .content_type("text/plain")
    .streaming(futures_util::stream::iter(parts))
}

async fn stall() -> HttpResponse {
  let head = stream::iter(vec![Ok::<_, actix_web::Error>(Bytes::from_static(b"head,"))]);
  let tail = stream::once(async {
    actix_web::rt::time::sleep(Duration::from_secs(3)).await;
    Ok::<_, actix_web::Error>(Bytes::from_static(b"tail"))
  });

  HttpResponse::Ok()
    .content_type("text/plain")
    .streaming(Box::pin(head.chain(tail)))
}
