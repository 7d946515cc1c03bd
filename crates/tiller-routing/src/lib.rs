//! Route compilation for the Tiller JSON:API layer.
//!
//! Turns one resource type's declarative configuration ([`tiller_core`]) into
//! an ordered set of [`RouteRegistration`]s: HTTP method, URL pattern, route
//! name, middleware chain, handler reference. Compilation runs once at
//! bootstrap, is deterministic and side-effect-free, and rejects
//! misconfiguration outright — a partially-built routing table is never
//! produced.

pub mod compiler;
pub mod error;
pub mod registration;
pub mod relationships;

pub use compiler::RouteCompiler;
pub use error::{Error, Result};
pub use registration::{
  HandlerRef, Middleware, PARAM_RESOURCE_ID, RouteAction, RouteRegistration,
};
