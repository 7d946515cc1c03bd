//! HTTP-layer errors and their JSON:API error-document responses.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// The JSON:API media type.
pub const MEDIA_TYPE: &str = "application/vnd.api+json";

#[derive(Debug, Error)]
pub enum Error {
  /// The matched route carries no resource-type token. Every compiled route
  /// binds one, so this means the routing table and the classifier have
  /// drifted out of sync — a server fault, never a client error.
  #[error("no resource type bound to the matched route")]
  MissingResourceType,

  #[error("unknown middleware {0:?}")]
  UnknownMiddleware(String),

  #[error("unknown authorizer {0:?}")]
  UnknownAuthorizer(String),

  #[error("unknown validators {0:?}")]
  UnknownValidators(String),

  #[error("unsupported HTTP method {0}")]
  UnsupportedMethod(String),

  #[error("unauthenticated")]
  Unauthenticated,

  #[error("forbidden")]
  Forbidden,

  #[error("not found")]
  NotFound,

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("invalid document: {0}")]
  InvalidDocument(String),

  #[error("request body too large")]
  PayloadTooLarge,
}

impl Error {
  fn status(&self) -> StatusCode {
    match self {
      Error::MissingResourceType
      | Error::UnknownMiddleware(_)
      | Error::UnknownAuthorizer(_)
      | Error::UnknownValidators(_)
      | Error::UnsupportedMethod(_) => StatusCode::INTERNAL_SERVER_ERROR,
      Error::Unauthenticated => StatusCode::UNAUTHORIZED,
      Error::Forbidden => StatusCode::FORBIDDEN,
      Error::NotFound => StatusCode::NOT_FOUND,
      Error::BadRequest(_) => StatusCode::BAD_REQUEST,
      Error::Conflict(_) => StatusCode::CONFLICT,
      Error::InvalidDocument(_) => StatusCode::UNPROCESSABLE_ENTITY,
      Error::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = self.status();
    let body = json!({
      "errors": [{
        "status": status.as_u16().to_string(),
        "detail": self.to_string(),
      }]
    });
    let mut response = (status, Json(body)).into_response();
    response
      .headers_mut()
      .insert(header::CONTENT_TYPE, HeaderValue::from_static(MEDIA_TYPE));
    response
  }
}
