//! Name-resolved middleware: guards and the registry that owns them.

use std::{collections::HashMap, future::Future, pin::Pin, sync::Arc};

use axum::http::request::Parts;
use bytes::Bytes;
use tiller_routing::Middleware;

use crate::{context::RequestContext, error::Error};

/// Boxed future returned by [`Guard::check`].
pub type GuardFuture<'a> =
  Pin<Box<dyn Future<Output = Result<(), Error>> + Send + 'a>>;

/// A middleware unit run before the resource handler.
///
/// Authorizers, validator sets, and named middleware all share this shape.
/// Guards run in chain order; the first failure short-circuits the request
/// with the error's response.
pub trait Guard: Send + Sync {
  fn check<'a>(
    &'a self,
    ctx: &'a RequestContext,
    parts: &'a Parts,
    body: &'a Bytes,
  ) -> GuardFuture<'a>;
}

/// Build a guard from a plain synchronous function.
pub fn fn_guard<F>(check: F) -> Arc<dyn Guard>
where
  F: Fn(&RequestContext, &Parts, &Bytes) -> Result<(), Error>
    + Send
    + Sync
    + 'static,
{
  struct FnGuard<F>(F);

  impl<F> Guard for FnGuard<F>
  where
    F: Fn(&RequestContext, &Parts, &Bytes) -> Result<(), Error> + Send + Sync,
  {
    fn check<'a>(
      &'a self,
      ctx: &'a RequestContext,
      parts: &'a Parts,
      body: &'a Bytes,
    ) -> GuardFuture<'a> {
      let result = (self.0)(ctx, parts, body);
      Box::pin(async move { result })
    }
  }

  Arc::new(FnGuard(check))
}

/// Registry mapping policy identities and middleware names to guards.
///
/// Compiled chains reference guards symbolically; resolution happens once, at
/// mount time, so an identity no registered guard answers to aborts bootstrap
/// instead of failing per request.
#[derive(Default, Clone)]
pub struct MiddlewareRegistry {
  named:       HashMap<String, Arc<dyn Guard>>,
  authorizers: HashMap<String, Arc<dyn Guard>>,
  validators:  HashMap<String, Arc<dyn Guard>>,
}

impl MiddlewareRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register_middleware(
    mut self,
    name: impl Into<String>,
    guard: Arc<dyn Guard>,
  ) -> Self {
    self.named.insert(name.into(), guard);
    self
  }

  pub fn register_authorizer(
    mut self,
    identity: impl Into<String>,
    guard: Arc<dyn Guard>,
  ) -> Self {
    self.authorizers.insert(identity.into(), guard);
    self
  }

  pub fn register_validators(
    mut self,
    identity: impl Into<String>,
    guard: Arc<dyn Guard>,
  ) -> Self {
    self.validators.insert(identity.into(), guard);
    self
  }

  /// Resolve one chain entry. Unknown identities are configuration errors.
  pub fn resolve(&self, entry: &Middleware) -> Result<Arc<dyn Guard>, Error> {
    match entry {
      Middleware::Named(name) => self
        .named
        .get(name)
        .cloned()
        .ok_or_else(|| Error::UnknownMiddleware(name.clone())),
      Middleware::Authorize(identity) => self
        .authorizers
        .get(identity)
        .cloned()
        .ok_or_else(|| Error::UnknownAuthorizer(identity.clone())),
      Middleware::Validate(identity) => self
        .validators
        .get(identity)
        .cloned()
        .ok_or_else(|| Error::UnknownValidators(identity.clone())),
    }
  }

  /// Resolve a whole chain, preserving order.
  pub fn resolve_chain(
    &self,
    chain: &[Middleware],
  ) -> Result<Vec<Arc<dyn Guard>>, Error> {
    chain.iter().map(|entry| self.resolve(entry)).collect()
  }
}
