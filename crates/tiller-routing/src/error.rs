//! Configuration errors raised while compiling routes.
//!
//! All of these are fatal to bootstrap: the caller must not register any
//! route from a compilation that returned an error.

use http::Method;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("no HTTP method resolves for action {0:?}")]
  UnresolvedMethod(String),

  #[error("custom action {0:?} is declared more than once")]
  DuplicateCustomAction(String),

  #[error("custom action with an empty name")]
  EmptyCustomActionName,

  #[error("resource {0:?} has no actions left after applying only/except")]
  EmptyActionSet(String),

  #[error("duplicate route: {method} {path}")]
  DuplicateRoute { method: Method, path: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
