//! The dispatch seam between mounted routes and resource controllers.

use std::{future::Future, pin::Pin};

use axum::{http::request::Parts, response::Response};
use bytes::Bytes;
use tiller_routing::RouteAction;

use crate::context::RequestContext;

/// Boxed future returned by [`ResourceHandler::handle`].
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Response> + Send + 'a>>;

/// Executes business logic for a classified request.
///
/// The mount layer calls this once per request, after the middleware chain
/// has passed, with the route's compiled action, the request context, the
/// request head, and the collected body.
pub trait ResourceHandler: Send + Sync {
  fn handle<'a>(
    &'a self,
    action: &'a RouteAction,
    ctx: &'a RequestContext,
    parts: &'a Parts,
    body: Bytes,
  ) -> HandlerFuture<'a>;
}
