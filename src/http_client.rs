use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::Client;

use crate::settings::Settings;

/// Redirect hops followed before the exchange is abandoned.
pub const MAX_REDIRECTS: usize = 5;

pub struct HttpClientConfig {
  pub http_proxy: Option<String>,
  pub user: Option<String>,
  pub pass: Option<String>,
  pub timeout: Duration,
}

impl HttpClientConfig {
  /// Builds the outbound client. Response statuses are never turned into
  /// errors, bodies are not decompressed, and without an explicit upstream
  /// proxy requests go straight to the target.
  pub fn to_client(self) -> Result<Client, reqwest::Error> {
    let HttpClientConfig {
      http_proxy,
      user,
      pass,
      timeout,
    } = self;
    let mut client_builder = reqwest::ClientBuilder::new();

    if let Some(proxy_url) = http_proxy {
      let mut proxy = reqwest::Proxy::all(proxy_url)?;

      if let (Some(user_name), Some(password)) = (user, pass) {
        proxy = proxy.basic_auth(&user_name, &password);
      }

      client_builder = client_builder.proxy(proxy);
    } else {
      client_builder = client_builder.no_proxy();
    }

    let client = client_builder
      .redirect(Policy::limited(MAX_REDIRECTS))
      .timeout(timeout)
      .build()?;

    Ok(client)
  }
}

impl From<&Settings> for HttpClientConfig {
  fn from(settings: &Settings) -> Self {
    HttpClientConfig {
      http_proxy: settings.upstream_proxy.clone(),
      user: settings.upstream_proxy_user.clone(),
      pass: settings.upstream_proxy_pass.clone(),
      timeout: settings.timeout,
    }
  }
}
