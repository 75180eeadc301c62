use bytes::Bytes;
use serde::de::IgnoredAny;

use crate::forward_service::forward_error::ForwardError;

const JSON_TYPE: &str = "application/json";
const FORM_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
  Json,
  Form,
  Raw,
}

impl BodyKind {
  pub fn detect(content_type: Option<&str>) -> BodyKind {
    let essence = content_type
      .and_then(|value| value.split(';').next())
      .map(|value| value.trim().to_ascii_lowercase());

    match essence.as_deref() {
      Some(JSON_TYPE) => BodyKind::Json,
      Some(FORM_TYPE) => BodyKind::Form,
      _ => BodyKind::Raw,
    }
  }
}

/// Request payload as received from the caller. The bytes are never
/// rewritten; JSON bodies are only checked for well-formedness.
#[derive(Debug, Clone)]
pub struct InboundBody {
  kind: BodyKind,
  bytes: Bytes,
}

impl InboundBody {
  pub fn decode(content_type: Option<&str>, bytes: Bytes) -> Result<Option<InboundBody>, ForwardError> {
    if bytes.is_empty() {
      return Ok(None);
    }

    let kind = BodyKind::detect(content_type);

    if kind == BodyKind::Json {
      serde_json::from_slice::<IgnoredAny>(&bytes).map_err(|err| ForwardError::InvalidBody(err.to_string()))?;
    }

    Ok(Some(InboundBody { kind, bytes }))
  }

  pub fn kind(&self) -> BodyKind {
    self.kind
  }

  pub fn size(&self) -> usize {
    self.bytes.len()
  }

  pub fn into_bytes(self) -> Bytes {
    self.bytes
  }
}
