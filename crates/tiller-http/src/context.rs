//! Request classification — the semantic projection of a matched route.
//!
//! A [`RequestContext`] is built once per request, after the router has
//! matched a route and before the resource handler runs. It is the sole
//! surface downstream code uses to branch behaviour; handlers must not
//! re-parse the path or re-inspect the router.

use axum::{
  extract::FromRequestParts,
  http::{Method, request::Parts},
};

use crate::error::Error;

/// The classification tokens resolved for a matched route.
///
/// The mount layer builds one per request — resource type and relationship
/// name from the route registration, resource id from the path parameters —
/// and stores it as a request extension so axum handlers can extract a
/// [`RequestContext`] themselves.
#[derive(Debug, Clone, Default)]
pub struct RouteParams {
  pub resource_type: Option<String>,
  pub resource_id:   Option<String>,
  pub relationship:  Option<String>,
}

/// Per-request, read-only view over the matched route and live request.
/// Stateless; all queries are pure and idempotent.
#[derive(Debug, Clone)]
pub struct RequestContext {
  method: Method,
  path:   String,
  params: RouteParams,
}

impl RequestContext {
  pub fn new(method: Method, path: impl Into<String>, params: RouteParams) -> Self {
    Self { method, path: path.into(), params }
  }

  /// The resource type bound to the matched route.
  ///
  /// Every compiled route binds this token, so an absent or empty value is a
  /// routing-table integrity fault surfaced as a server error — never
  /// defaulted, never mapped to a client error.
  pub fn resource_type(&self) -> Result<&str, Error> {
    match self.params.resource_type.as_deref() {
      Some(resource_type) if !resource_type.is_empty() => Ok(resource_type),
      _ => Err(Error::MissingResourceType),
    }
  }

  /// The instance id; absent for collection-level requests.
  pub fn resource_id(&self) -> Option<&str> {
    self.params.resource_id.as_deref()
  }

  /// The relationship name; present only for relationship sub-routes.
  pub fn relationship_name(&self) -> Option<&str> {
    self.params.relationship.as_deref()
  }

  pub fn is_relationship(&self) -> bool {
    self.params.relationship.is_some()
  }

  /// True when the request addresses the relationship's linkage data
  /// (`…/relationships/{name}`) rather than the related resource(s)
  /// (`…/{name}`) — two distinct JSON:API semantics sharing a name.
  pub fn is_relationship_data(&self) -> bool {
    self.is_relationship() && self.path.contains("/relationships/")
  }

  /// Whether a request document is expected from the client.
  ///
  /// Always true under the current policy. The historically intended
  /// alternative — true only for create/update/relationship mutation — is
  /// documented here as an alternative and deliberately not applied.
  pub fn is_expecting_document(&self) -> bool {
    true
  }

  // ── Derived method-kind predicates ──────────────────────────────────────
  // Computed from the same matched-route context; nothing here re-invokes
  // the router.

  fn is_method(&self, method: Method) -> bool {
    self.method == method
  }

  fn is_resource(&self) -> bool {
    self.params.resource_id.is_some()
  }

  pub fn is_index(&self) -> bool {
    self.is_method(Method::GET) && !self.is_resource() && !self.is_relationship()
  }

  pub fn is_create_resource(&self) -> bool {
    self.is_method(Method::POST) && !self.is_resource() && !self.is_relationship()
  }

  pub fn is_read_resource(&self) -> bool {
    self.is_method(Method::GET) && self.is_resource() && !self.is_relationship()
  }

  pub fn is_update_resource(&self) -> bool {
    self.is_method(Method::PATCH) && self.is_resource() && !self.is_relationship()
  }

  pub fn is_delete_resource(&self) -> bool {
    self.is_method(Method::DELETE) && self.is_resource() && !self.is_relationship()
  }

  pub fn is_read_related_resource(&self) -> bool {
    self.is_method(Method::GET)
      && self.is_relationship()
      && !self.is_relationship_data()
  }

  pub fn is_read_relationship(&self) -> bool {
    self.is_method(Method::GET) && self.is_relationship_data()
  }

  pub fn is_replace_relationship(&self) -> bool {
    self.is_method(Method::PATCH) && self.is_relationship_data()
  }

  pub fn is_add_to_relationship(&self) -> bool {
    self.is_method(Method::POST) && self.is_relationship_data()
  }

  pub fn is_remove_from_relationship(&self) -> bool {
    self.is_method(Method::DELETE) && self.is_relationship_data()
  }
}

impl<S> FromRequestParts<S> for RequestContext
where
  S: Send + Sync,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    let params = parts
      .extensions
      .get::<RouteParams>()
      .cloned()
      .ok_or(Error::MissingResourceType)?;
    Ok(RequestContext::new(
      parts.method.clone(),
      parts.uri.path(),
      params,
    ))
  }
}
