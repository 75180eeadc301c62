/// Upper bound for an inbound body read into memory.
pub const DEFAULT_BODY_LIMIT: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ForwardConfig {
  pub body_limit: usize,
}

impl Default for ForwardConfig {
  fn default() -> Self {
    ForwardConfig {
      body_limit: DEFAULT_BODY_LIMIT,
    }
  }
}
