//! Declarative resource model for the Tiller routing layer.
//!
//! This crate is deliberately free of HTTP-framework dependencies. It holds
//! the per-resource configuration the route compiler consumes — descriptors,
//! options, action vocabularies — plus the naming transform applied to
//! resource-type tokens. All types here are constructed once at application
//! configuration time and read-only thereafter.

pub mod action;
pub mod descriptor;
pub mod naming;
pub mod options;

pub use action::{Action, RelationshipAction};
pub use descriptor::ResourceDescriptor;
pub use options::{
  CustomAction, PolicyDefaults, RelationshipKind, RelationshipOptions,
  RouteOptions,
};
