//! Declarative route configuration consumed by the route compiler.
//!
//! Everything here is a plain value constructed once per resource type at
//! bootstrap. The compiler reads these by shared reference and never mutates
//! them.

use http::Method;
use serde::{Deserialize, Deserializer};

use crate::action::{Action, RelationshipAction};

// ─── Custom actions ──────────────────────────────────────────────────────────

/// A resource-specific operation outside the canonical verb set.
///
/// Compiles to `{configured method} /{type}/{resource_id}/{suffix}`, with the
/// suffix defaulting to the action name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomAction {
  pub name:   String,
  pub method: Method,
  /// Literal path segment appended to the instance URL; defaults to `name`.
  pub suffix: Option<String>,
}

impl CustomAction {
  pub fn new(name: impl Into<String>, method: Method) -> Self {
    Self { name: name.into(), method, suffix: None }
  }

  pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
    self.suffix = Some(suffix.into());
    self
  }

  /// The URL segment this action occupies under the instance URL.
  pub fn path_segment(&self) -> &str {
    self.suffix.as_deref().unwrap_or(&self.name)
  }
}

impl<'de> Deserialize<'de> for CustomAction {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    #[derive(Deserialize)]
    struct Raw {
      name:   String,
      method: String,
      #[serde(default)]
      suffix: Option<String>,
    }

    let raw = Raw::deserialize(deserializer)?;
    let method = Method::from_bytes(raw.method.to_ascii_uppercase().as_bytes())
      .map_err(serde::de::Error::custom)?;
    Ok(CustomAction { name: raw.name, method, suffix: raw.suffix })
  }
}

// ─── Relationships ───────────────────────────────────────────────────────────

/// Cardinality of a declared relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipKind {
  ToOne,
  ToMany,
}

/// Configuration for one relationship sub-resource.
///
/// To-one relationships compile `related`/`read`/`replace` routes; to-many
/// relationships additionally compile linkage `add`/`remove`. The
/// `only`/`except` filters apply on top of the kind's verb set.
#[derive(Debug, Clone, Deserialize)]
pub struct RelationshipOptions {
  pub name: String,
  pub kind: RelationshipKind,
  #[serde(default)]
  pub only:   Option<Vec<RelationshipAction>>,
  #[serde(default)]
  pub except: Vec<RelationshipAction>,
}

impl RelationshipOptions {
  pub fn new(name: impl Into<String>, kind: RelationshipKind) -> Self {
    Self { name: name.into(), kind, only: None, except: Vec::new() }
  }

  pub fn with_only(mut self, actions: Vec<RelationshipAction>) -> Self {
    self.only = Some(actions);
    self
  }

  pub fn with_except(mut self, actions: Vec<RelationshipAction>) -> Self {
    self.except = actions;
    self
  }
}

// ─── Route options ───────────────────────────────────────────────────────────

/// The per-resource-type configuration bag the route compiler consumes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RouteOptions {
  /// Keep only these actions (applied before `except`).
  pub only: Option<Vec<Action>>,
  /// Disable these actions.
  pub except: Vec<Action>,
  /// Custom actions, in configuration order.
  pub custom_actions: Vec<CustomAction>,
  /// Additional middleware names, applied before policy middleware.
  pub middleware: Vec<String>,
  /// Per-route authorizer override (beats the descriptor and the defaults).
  pub authorizer: Option<String>,
  /// Per-route validator-set override (beats the descriptor and the defaults).
  pub validators: Option<String>,
  /// Relationship sub-resources to compile routes for.
  pub relationships: Vec<RelationshipOptions>,
}

impl RouteOptions {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_only(mut self, actions: Vec<Action>) -> Self {
    self.only = Some(actions);
    self
  }

  pub fn with_except(mut self, actions: Vec<Action>) -> Self {
    self.except = actions;
    self
  }

  pub fn with_custom_action(mut self, action: CustomAction) -> Self {
    self.custom_actions.push(action);
    self
  }

  pub fn with_middleware(mut self, name: impl Into<String>) -> Self {
    self.middleware.push(name.into());
    self
  }

  pub fn with_authorizer(mut self, identity: impl Into<String>) -> Self {
    self.authorizer = Some(identity.into());
    self
  }

  pub fn with_validators(mut self, identity: impl Into<String>) -> Self {
    self.validators = Some(identity.into());
    self
  }

  pub fn with_relationship(mut self, relationship: RelationshipOptions) -> Self {
    self.relationships.push(relationship);
    self
  }
}

// ─── Global policy defaults ──────────────────────────────────────────────────

/// Global default policy identities, threaded explicitly into the route
/// compiler. Lowest tier of the resolution precedence: per-route override,
/// then descriptor, then these.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PolicyDefaults {
  pub authorizer: Option<String>,
  pub validators: Option<String>,
}

impl PolicyDefaults {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_authorizer(mut self, identity: impl Into<String>) -> Self {
    self.authorizer = Some(identity.into());
    self
  }

  pub fn with_validators(mut self, identity: impl Into<String>) -> Self {
    self.validators = Some(identity.into());
    self
  }
}
