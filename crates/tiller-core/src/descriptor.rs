//! Per-resource-type capability record.

use serde::{Deserialize, Serialize};

/// Immutable capabilities of a registered resource type.
///
/// One instance exists per resource type, owned by the application's resource
/// registry and created at configuration time. The policy identities name
/// registered authorization / validation policies; either may be absent, in
/// which case the route compiler falls back to per-route overrides or global
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceDescriptor {
  /// Identity of the authorization policy enforced for this resource.
  pub authorizer: Option<String>,
  /// Identity of the validation policy set applied to this resource.
  pub validators: Option<String>,
}

impl ResourceDescriptor {
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
