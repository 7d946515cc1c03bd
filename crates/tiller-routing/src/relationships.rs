//! Relationship sub-route compiler.
//!
//! The structural twin of the primary compiler: same action filtering, same
//! URL assignment shape, for `…/{name}` (related resource) and
//! `…/relationships/{name}` (linkage) routes. Constructed with the owning
//! resource's base path and middleware chain so its output joins the same
//! mounted group instead of recomputing either.

use http::Method;
use tiller_core::{
  RelationshipAction, RelationshipKind, RelationshipOptions, RouteOptions,
};

use crate::registration::{
  HandlerRef, Middleware, PARAM_RESOURCE_ID, RouteAction, RouteRegistration,
};

pub struct RelationshipCompiler<'a> {
  base:  &'a str,
  chain: &'a [Middleware],
}

impl<'a> RelationshipCompiler<'a> {
  pub fn new(base: &'a str, chain: &'a [Middleware]) -> Self {
    Self { base, chain }
  }

  /// Compile the sub-routes for every relationship declared in `options`,
  /// in declaration order.
  pub fn compile(
    &self,
    resource_type: &str,
    options: &RouteOptions,
  ) -> Vec<RouteRegistration> {
    let mut routes = Vec::new();
    for relationship in &options.relationships {
      for action in effective_actions(relationship) {
        routes.push(RouteRegistration {
          method:     method_for(action),
          path:       self.url_for(&relationship.name, action),
          name:       format!(
            "{resource_type}.relationships.{}.{action}",
            relationship.name
          ),
          middleware: self.chain.to_vec(),
          handler:    HandlerRef {
            resource_type: resource_type.to_string(),
            action:        RouteAction::Relationship {
              name: relationship.name.clone(),
              action,
            },
          },
        });
      }
    }
    routes
  }

  fn url_for(&self, name: &str, action: RelationshipAction) -> String {
    let base = self.base;
    match action {
      RelationshipAction::Related => {
        format!("{base}/{{{PARAM_RESOURCE_ID}}}/{name}")
      }
      _ => format!("{base}/{{{PARAM_RESOURCE_ID}}}/relationships/{name}"),
    }
  }
}

/// The kind's verb set filtered by `only`/`except`. To-one relationships
/// never compile linkage add/remove.
fn effective_actions(
  relationship: &RelationshipOptions,
) -> Vec<RelationshipAction> {
  let mut actions: Vec<RelationshipAction> = match relationship.kind {
    RelationshipKind::ToOne => vec![
      RelationshipAction::Related,
      RelationshipAction::Read,
      RelationshipAction::Replace,
    ],
    RelationshipKind::ToMany => RelationshipAction::ALL.to_vec(),
  };
  if let Some(only) = &relationship.only {
    actions.retain(|action| only.contains(action));
  }
  actions.retain(|action| !relationship.except.contains(action));
  actions
}

fn method_for(action: RelationshipAction) -> Method {
  match action {
    RelationshipAction::Related | RelationshipAction::Read => Method::GET,
    RelationshipAction::Replace => Method::PATCH,
    RelationshipAction::Add => Method::POST,
    RelationshipAction::Remove => Method::DELETE,
  }
}
