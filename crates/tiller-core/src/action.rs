//! Action vocabularies — what a compiled route can dispatch to.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{Display, EnumString};

// ─── Primary-resource actions ────────────────────────────────────────────────

/// A primary-resource action: one of the five canonical verbs, or a
/// resource-specific custom action.
///
/// Parsing never fails — a name outside the canonical set becomes
/// [`Action::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Action {
  Index,
  Create,
  Read,
  Update,
  Delete,
  #[strum(default, to_string = "{0}")]
  Custom(String),
}

impl Action {
  /// The built-in verbs, in canonical registration order.
  pub const VERBS: [Action; 5] = [
    Action::Index,
    Action::Create,
    Action::Read,
    Action::Update,
    Action::Delete,
  ];

  /// Whether this is one of the five built-in verbs.
  pub fn is_verb(&self) -> bool {
    !matches!(self, Action::Custom(_))
  }
}

impl Serialize for Action {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for Action {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let name = String::deserialize(deserializer)?;
    match name.parse() {
      Ok(action) => Ok(action),
      Err(_) => Ok(Action::Custom(name)),
    }
  }
}

// ─── Relationship actions ────────────────────────────────────────────────────

/// An operation on a relationship sub-resource.
///
/// `Related` reads the related resource(s) through the relationship
/// (`…/{name}`); the remaining four operate on the relationship's linkage
/// data (`…/relationships/{name}`).
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RelationshipAction {
  Related,
  Read,
  Replace,
  Add,
  Remove,
}

impl RelationshipAction {
  /// Every relationship action, in registration order.
  pub const ALL: [RelationshipAction; 5] = [
    RelationshipAction::Related,
    RelationshipAction::Read,
    RelationshipAction::Replace,
    RelationshipAction::Add,
    RelationshipAction::Remove,
  ];
}
