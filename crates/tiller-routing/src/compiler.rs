//! The route compiler: declarative resource configuration → compiled routes.
//!
//! Runs once per resource type at bootstrap. The output order is part of the
//! contract: built-in verbs in canonical order, then custom actions in
//! configuration order, then relationship sub-routes.

use std::collections::HashSet;

use http::Method;
use tiller_core::{
  Action, PolicyDefaults, ResourceDescriptor, RouteOptions, naming::dasherize,
};

use crate::{
  error::{Error, Result},
  registration::{
    HandlerRef, Middleware, PARAM_RESOURCE_ID, RouteAction, RouteRegistration,
  },
  relationships::RelationshipCompiler,
};

/// Compiles one resource type's configuration into concrete route
/// registrations. Holds the global policy defaults — the lowest tier of the
/// identity resolution precedence — passed in explicitly at construction.
#[derive(Debug, Clone, Default)]
pub struct RouteCompiler {
  defaults: PolicyDefaults,
}

impl RouteCompiler {
  pub fn new(defaults: PolicyDefaults) -> Self {
    Self { defaults }
  }

  /// Compile the full route set for `resource_type`.
  ///
  /// Primary-resource routes come first, then relationship sub-routes; every
  /// route shares the single middleware chain computed for the type. Any
  /// configuration fault aborts the whole compilation.
  pub fn compile(
    &self,
    resource_type: &str,
    descriptor: &ResourceDescriptor,
    options: &RouteOptions,
  ) -> Result<Vec<RouteRegistration>> {
    validate_custom_actions(options)?;

    let actions = effective_actions(options);
    if actions.is_empty() {
      return Err(Error::EmptyActionSet(resource_type.to_string()));
    }

    let chain = self.middleware_chain(descriptor, options);
    let base = format!("/{}", dasherize(resource_type));

    let mut routes = Vec::with_capacity(actions.len());
    for action in &actions {
      routes.push(RouteRegistration {
        method:     route_method(action, options)?,
        path:       route_url(&base, action, options),
        name:       format!("{resource_type}.{action}"),
        middleware: chain.clone(),
        handler:    HandlerRef {
          resource_type: resource_type.to_string(),
          action:        RouteAction::Resource(action.clone()),
        },
      });
    }

    // Relationship sub-routes join the same group and inherit its chain.
    routes
      .extend(RelationshipCompiler::new(&base, &chain).compile(resource_type, options));

    reject_overlaps(&routes)?;
    tracing::debug!(resource_type, routes = routes.len(), "compiled route group");
    Ok(routes)
  }

  /// One chain per resource type: explicit middleware names in given order,
  /// then authorization and validation entries for whichever policy
  /// identities resolve. An identity resolving nowhere means the entry is
  /// omitted — not a no-op, not an error.
  fn middleware_chain(
    &self,
    descriptor: &ResourceDescriptor,
    options: &RouteOptions,
  ) -> Vec<Middleware> {
    let mut chain: Vec<Middleware> = options
      .middleware
      .iter()
      .cloned()
      .map(Middleware::Named)
      .collect();

    if let Some(authorizer) = resolve(
      options.authorizer.as_deref(),
      descriptor.authorizer.as_deref(),
      self.defaults.authorizer.as_deref(),
    ) {
      chain.push(Middleware::Authorize(authorizer.to_string()));
    }
    if let Some(validators) = resolve(
      options.validators.as_deref(),
      descriptor.validators.as_deref(),
      self.defaults.validators.as_deref(),
    ) {
      chain.push(Middleware::Validate(validators.to_string()));
    }
    chain
  }
}

/// First match wins: per-route override, then descriptor, then global default.
fn resolve<'a>(
  override_id: Option<&'a str>,
  descriptor_id: Option<&'a str>,
  default_id: Option<&'a str>,
) -> Option<&'a str> {
  override_id.or(descriptor_id).or(default_id)
}

/// Built-in verbs in canonical order, then custom actions in configuration
/// order, filtered by `only` and `except`. A custom action named after a
/// built-in verb shadows the verb entirely: the verb's default route is not
/// compiled and the custom action keeps its own method and URL suffix.
fn effective_actions(options: &RouteOptions) -> Vec<Action> {
  let custom_names: Vec<&str> = options
    .custom_actions
    .iter()
    .map(|custom| custom.name.as_str())
    .collect();

  let mut actions: Vec<Action> = Action::VERBS
    .iter()
    .filter(|verb| !custom_names.contains(&verb.to_string().as_str()))
    .cloned()
    .collect();
  actions.extend(
    custom_names
      .iter()
      .map(|name| Action::Custom(name.to_string())),
  );

  if let Some(only) = &options.only {
    actions.retain(|action| only.contains(action));
  }
  actions.retain(|action| !options.except.contains(action));
  actions
}

fn route_method(action: &Action, options: &RouteOptions) -> Result<Method> {
  match action {
    Action::Index | Action::Read => Ok(Method::GET),
    Action::Create => Ok(Method::POST),
    Action::Update => Ok(Method::PATCH),
    Action::Delete => Ok(Method::DELETE),
    Action::Custom(name) => options
      .custom_actions
      .iter()
      .find(|custom| &custom.name == name)
      .map(|custom| custom.method.clone())
      .ok_or_else(|| Error::UnresolvedMethod(name.clone())),
  }
}

fn route_url(base: &str, action: &Action, options: &RouteOptions) -> String {
  match action {
    Action::Index | Action::Create => base.to_string(),
    Action::Read | Action::Update | Action::Delete => {
      format!("{base}/{{{PARAM_RESOURCE_ID}}}")
    }
    Action::Custom(name) => {
      let segment = options
        .custom_actions
        .iter()
        .find(|custom| &custom.name == name)
        .map(|custom| custom.path_segment())
        .unwrap_or(name);
      format!("{base}/{{{PARAM_RESOURCE_ID}}}/{segment}")
    }
  }
}

fn validate_custom_actions(options: &RouteOptions) -> Result<()> {
  let mut seen = HashSet::new();
  for custom in &options.custom_actions {
    if custom.name.is_empty() {
      return Err(Error::EmptyCustomActionName);
    }
    if !seen.insert(custom.name.as_str()) {
      return Err(Error::DuplicateCustomAction(custom.name.clone()));
    }
  }
  Ok(())
}

/// No two registrations may share a `(method, path)` pair.
fn reject_overlaps(routes: &[RouteRegistration]) -> Result<()> {
  let mut seen = HashSet::new();
  for route in routes {
    if !seen.insert((route.method.clone(), route.path.as_str())) {
      return Err(Error::DuplicateRoute {
        method: route.method.clone(),
        path:   route.path.clone(),
      });
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use tiller_core::{
    CustomAction, RelationshipAction, RelationshipKind, RelationshipOptions,
  };

  use super::*;

  fn compiler() -> RouteCompiler {
    RouteCompiler::new(PolicyDefaults::default())
  }

  fn compile(options: &RouteOptions) -> Vec<RouteRegistration> {
    compiler()
      .compile("articles", &ResourceDescriptor::new(), options)
      .unwrap()
  }

  fn summary(routes: &[RouteRegistration]) -> Vec<(String, String, String)> {
    routes
      .iter()
      .map(|r| (r.method.to_string(), r.path.clone(), r.name.clone()))
      .collect()
  }

  // ── Action set and URLs ─────────────────────────────────────────────────

  #[test]
  fn default_options_compile_the_five_verbs_in_canonical_order() {
    let routes = compile(&RouteOptions::new());
    assert_eq!(
      summary(&routes),
      vec![
        ("GET".into(), "/articles".into(), "articles.index".into()),
        ("POST".into(), "/articles".into(), "articles.create".into()),
        (
          "GET".into(),
          "/articles/{resource_id}".into(),
          "articles.read".into()
        ),
        (
          "PATCH".into(),
          "/articles/{resource_id}".into(),
          "articles.update".into()
        ),
        (
          "DELETE".into(),
          "/articles/{resource_id}".into(),
          "articles.delete".into()
        ),
      ]
    );
  }

  #[test]
  fn compiling_twice_yields_identical_routes() {
    let options = RouteOptions::new()
      .with_middleware("metrics")
      .with_authorizer("default")
      .with_custom_action(CustomAction::new("publish", Method::POST))
      .with_relationship(RelationshipOptions::new(
        "comments",
        RelationshipKind::ToMany,
      ));
    let first = compile(&options);
    let second = compile(&options);
    assert_eq!(first, second);
  }

  #[test]
  fn except_disables_actions() {
    let routes =
      compile(&RouteOptions::new().with_except(vec![Action::Delete]));
    let names: Vec<&str> = routes.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
      names,
      vec!["articles.index", "articles.create", "articles.read", "articles.update"]
    );
  }

  #[test]
  fn only_keeps_the_listed_actions() {
    let routes = compile(
      &RouteOptions::new().with_only(vec![Action::Index, Action::Read]),
    );
    let names: Vec<&str> = routes.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["articles.index", "articles.read"]);
  }

  #[test]
  fn empty_effective_action_set_is_a_configuration_error() {
    let result = compiler().compile(
      "articles",
      &ResourceDescriptor::new(),
      &RouteOptions::new().with_only(vec![]),
    );
    assert_eq!(result, Err(Error::EmptyActionSet("articles".to_string())));
  }

  #[test]
  fn resource_type_is_dasherized_in_paths_but_not_names() {
    let routes = compiler()
      .compile("blogPosts", &ResourceDescriptor::new(), &RouteOptions::new())
      .unwrap();
    assert_eq!(routes[0].path, "/blog-posts");
    assert_eq!(routes[0].name, "blogPosts.index");
    assert_eq!(routes[2].path, "/blog-posts/{resource_id}");
    assert_eq!(routes[2].name, "blogPosts.read");
  }

  // ── Custom actions ──────────────────────────────────────────────────────

  #[test]
  fn custom_action_compiles_instance_scoped_after_the_verbs() {
    let routes = compile(
      &RouteOptions::new()
        .with_custom_action(CustomAction::new("publish", Method::POST)),
    );
    let publish = routes.last().unwrap();
    assert_eq!(publish.method, Method::POST);
    assert_eq!(publish.path, "/articles/{resource_id}/publish");
    assert_eq!(publish.name, "articles.publish");
    assert_eq!(routes.len(), 6);
  }

  #[test]
  fn custom_action_uses_its_configured_suffix() {
    let routes = compile(&RouteOptions::new().with_custom_action(
      CustomAction::new("publish", Method::POST).with_suffix("publish-now"),
    ));
    assert_eq!(
      routes.last().unwrap().path,
      "/articles/{resource_id}/publish-now"
    );
    assert_eq!(routes.last().unwrap().name, "articles.publish");
  }

  #[test]
  fn custom_action_shadowing_a_verb_keeps_its_own_url_and_method() {
    let routes = compile(&RouteOptions::new().with_custom_action(
      CustomAction::new("delete", Method::DELETE).with_suffix("soft-delete"),
    ));
    // The verb's default instance route is gone; the custom action took the
    // `delete` slot with its own suffix.
    assert!(
      !routes
        .iter()
        .any(|r| r.method == Method::DELETE && r.path == "/articles/{resource_id}")
    );
    let custom = routes.last().unwrap();
    assert_eq!(custom.method, Method::DELETE);
    assert_eq!(custom.path, "/articles/{resource_id}/soft-delete");
    assert_eq!(custom.name, "articles.delete");
    assert_eq!(routes.len(), 5);
  }

  #[test]
  fn duplicate_custom_action_names_are_rejected() {
    let result = compiler().compile(
      "articles",
      &ResourceDescriptor::new(),
      &RouteOptions::new()
        .with_custom_action(CustomAction::new("publish", Method::POST))
        .with_custom_action(CustomAction::new("publish", Method::PATCH)),
    );
    assert_eq!(result, Err(Error::DuplicateCustomAction("publish".to_string())));
  }

  #[test]
  fn empty_custom_action_name_is_rejected() {
    let result = compiler().compile(
      "articles",
      &ResourceDescriptor::new(),
      &RouteOptions::new().with_custom_action(CustomAction::new("", Method::POST)),
    );
    assert_eq!(result, Err(Error::EmptyCustomActionName));
  }

  // ── Middleware chain and policy precedence ──────────────────────────────

  #[test]
  fn chain_orders_named_then_authorize_then_validate() {
    let routes = compile(
      &RouteOptions::new()
        .with_middleware("metrics")
        .with_middleware("cors")
        .with_authorizer("acl")
        .with_validators("strict"),
    );
    assert_eq!(
      routes[0].middleware,
      vec![
        Middleware::Named("metrics".to_string()),
        Middleware::Named("cors".to_string()),
        Middleware::Authorize("acl".to_string()),
        Middleware::Validate("strict".to_string()),
      ]
    );
  }

  #[test]
  fn every_route_in_the_group_shares_one_chain() {
    let routes = compile(
      &RouteOptions::new()
        .with_authorizer("acl")
        .with_relationship(RelationshipOptions::new(
          "comments",
          RelationshipKind::ToMany,
        )),
    );
    assert!(routes.len() > 5);
    assert!(
      routes
        .iter()
        .all(|r| r.middleware == routes[0].middleware)
    );
  }

  #[test]
  fn authorizer_resolution_prefers_the_per_route_override() {
    let compiler =
      RouteCompiler::new(PolicyDefaults::new().with_authorizer("global"));
    let descriptor = ResourceDescriptor::new().with_authorizer("descriptor");
    let routes = compiler
      .compile(
        "articles",
        &descriptor,
        &RouteOptions::new().with_authorizer("override"),
      )
      .unwrap();
    assert_eq!(
      routes[0].middleware,
      vec![Middleware::Authorize("override".to_string())]
    );
  }

  #[test]
  fn authorizer_resolution_falls_back_to_the_descriptor() {
    let compiler =
      RouteCompiler::new(PolicyDefaults::new().with_authorizer("global"));
    let descriptor = ResourceDescriptor::new().with_authorizer("descriptor");
    let routes = compiler
      .compile("articles", &descriptor, &RouteOptions::new())
      .unwrap();
    assert_eq!(
      routes[0].middleware,
      vec![Middleware::Authorize("descriptor".to_string())]
    );
  }

  #[test]
  fn authorizer_resolution_falls_back_to_the_global_default() {
    let compiler =
      RouteCompiler::new(PolicyDefaults::new().with_authorizer("global"));
    let routes = compiler
      .compile("articles", &ResourceDescriptor::new(), &RouteOptions::new())
      .unwrap();
    assert_eq!(
      routes[0].middleware,
      vec![Middleware::Authorize("global".to_string())]
    );
  }

  #[test]
  fn unresolved_policies_leave_the_chain_empty() {
    let routes = compile(&RouteOptions::new());
    assert!(routes[0].middleware.is_empty());
  }

  #[test]
  fn validators_resolve_through_the_same_precedence() {
    let compiler =
      RouteCompiler::new(PolicyDefaults::new().with_validators("global"));
    let descriptor = ResourceDescriptor::new().with_validators("descriptor");
    let routes = compiler
      .compile("articles", &descriptor, &RouteOptions::new())
      .unwrap();
    assert_eq!(
      routes[0].middleware,
      vec![Middleware::Validate("descriptor".to_string())]
    );
  }

  // ── Relationships ───────────────────────────────────────────────────────

  #[test]
  fn to_many_relationship_compiles_all_five_sub_routes() {
    let routes = compile(&RouteOptions::new().with_relationship(
      RelationshipOptions::new("comments", RelationshipKind::ToMany),
    ));
    let relationship: Vec<(String, String, String)> = summary(&routes)
      .into_iter()
      .filter(|(_, _, name)| name.contains("relationships"))
      .collect();
    assert_eq!(
      relationship,
      vec![
        (
          "GET".into(),
          "/articles/{resource_id}/comments".into(),
          "articles.relationships.comments.related".into()
        ),
        (
          "GET".into(),
          "/articles/{resource_id}/relationships/comments".into(),
          "articles.relationships.comments.read".into()
        ),
        (
          "PATCH".into(),
          "/articles/{resource_id}/relationships/comments".into(),
          "articles.relationships.comments.replace".into()
        ),
        (
          "POST".into(),
          "/articles/{resource_id}/relationships/comments".into(),
          "articles.relationships.comments.add".into()
        ),
        (
          "DELETE".into(),
          "/articles/{resource_id}/relationships/comments".into(),
          "articles.relationships.comments.remove".into()
        ),
      ]
    );
  }

  #[test]
  fn to_one_relationship_skips_add_and_remove() {
    let routes = compile(&RouteOptions::new().with_relationship(
      RelationshipOptions::new("author", RelationshipKind::ToOne),
    ));
    let names: Vec<&str> = routes
      .iter()
      .filter(|r| r.name.contains("relationships"))
      .map(|r| r.name.as_str())
      .collect();
    assert_eq!(
      names,
      vec![
        "articles.relationships.author.related",
        "articles.relationships.author.read",
        "articles.relationships.author.replace",
      ]
    );
  }

  #[test]
  fn relationship_only_and_except_filters_apply() {
    let routes = compile(
      &RouteOptions::new().with_relationship(
        RelationshipOptions::new("comments", RelationshipKind::ToMany)
          .with_only(vec![
            RelationshipAction::Related,
            RelationshipAction::Read,
            RelationshipAction::Add,
          ])
          .with_except(vec![RelationshipAction::Read]),
      ),
    );
    let names: Vec<&str> = routes
      .iter()
      .filter(|r| r.name.contains("relationships"))
      .map(|r| r.name.as_str())
      .collect();
    assert_eq!(
      names,
      vec![
        "articles.relationships.comments.related",
        "articles.relationships.comments.add",
      ]
    );
  }

  // ── Overlap rejection ───────────────────────────────────────────────────

  #[test]
  fn overlapping_custom_and_relationship_routes_are_rejected() {
    // A custom GET action named `comments` collides with the related-resource
    // route of a relationship of the same name.
    let result = compiler().compile(
      "articles",
      &ResourceDescriptor::new(),
      &RouteOptions::new()
        .with_custom_action(CustomAction::new("comments", Method::GET))
        .with_relationship(RelationshipOptions::new(
          "comments",
          RelationshipKind::ToMany,
        )),
    );
    assert_eq!(
      result,
      Err(Error::DuplicateRoute {
        method: Method::GET,
        path:   "/articles/{resource_id}/comments".to_string(),
      })
    );
  }

  #[test]
  fn compiled_routes_never_share_a_method_and_path_pair() {
    let routes = compile(
      &RouteOptions::new()
        .with_custom_action(CustomAction::new("publish", Method::POST))
        .with_relationship(RelationshipOptions::new(
          "comments",
          RelationshipKind::ToMany,
        ))
        .with_relationship(RelationshipOptions::new(
          "author",
          RelationshipKind::ToOne,
        )),
    );
    let mut pairs = HashSet::new();
    for route in &routes {
      assert!(pairs.insert((route.method.clone(), route.path.clone())));
    }
  }
}
