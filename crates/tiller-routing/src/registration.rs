//! The compiled route output model.

use http::Method;
use tiller_core::{Action, RelationshipAction};

/// Name of the path parameter that carries the instance id in compiled URL
/// patterns.
pub const PARAM_RESOURCE_ID: &str = "resource_id";

/// One entry in a compiled middleware chain.
///
/// Entries are symbolic — a name, not a function. The HTTP layer resolves
/// them against its middleware registry at mount time, so a dangling identity
/// fails bootstrap rather than a live request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Middleware {
  /// Additional middleware referenced by name from the options bag.
  Named(String),
  /// Authorization middleware parameterized by a policy identity.
  Authorize(String),
  /// Validation middleware parameterized by a policy-set identity.
  Validate(String),
}

/// What a compiled route dispatches to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAction {
  Resource(Action),
  Relationship {
    name:   String,
    action: RelationshipAction,
  },
}

/// Handler reference carried by a compiled route: the resource type plus the
/// action to execute. Also the source of the classification tokens the mount
/// layer binds onto each request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerRef {
  pub resource_type: String,
  pub action:        RouteAction,
}

impl HandlerRef {
  /// The relationship name, for relationship sub-routes.
  pub fn relationship_name(&self) -> Option<&str> {
    match &self.action {
      RouteAction::Relationship { name, .. } => Some(name),
      RouteAction::Resource(_) => None,
    }
  }
}

/// The compiled output unit: method, URL pattern, route name, ordered
/// middleware chain, handler reference.
///
/// Within one resource type no two registrations share the same
/// `(method, path)` pair; the compiler enforces this before returning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRegistration {
  pub method:     Method,
  pub path:       String,
  pub name:       String,
  pub middleware: Vec<Middleware>,
  pub handler:    HandlerRef,
}
