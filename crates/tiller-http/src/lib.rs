//! HTTP layer for Tiller.
//!
//! Mounts compiled [`RouteRegistration`]s onto an axum [`Router`], resolves
//! middleware chains against a name-based registry at bootstrap, and builds
//! the per-request [`RequestContext`] that downstream handlers classify
//! requests with.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let routes = compiler.compile("articles", &descriptor, &options)?;
//! let app = tiller_http::mount(routes, &registry, Arc::new(handler))?;
//! ```

pub mod context;
pub mod error;
pub mod guard;
pub mod handler;
pub mod memory;

pub use context::{RequestContext, RouteParams};
pub use error::Error;
pub use guard::{Guard, MiddlewareRegistry};
pub use handler::ResourceHandler;

use std::sync::Arc;

use axum::{
  Router,
  body::to_bytes,
  extract::{RawPathParams, Request},
  response::{IntoResponse, Response},
  routing::{MethodFilter, on},
};
use tiller_routing::{PARAM_RESOURCE_ID, RouteRegistration};

/// Upper bound on collected request bodies.
const BODY_LIMIT: usize = 1024 * 1024;

struct CompiledRoute {
  registration: RouteRegistration,
  guards:       Vec<Arc<dyn Guard>>,
  handler:      Arc<dyn ResourceHandler>,
}

/// Mount compiled route registrations onto an axum router.
///
/// Every middleware entry is resolved against `registry` here, at bootstrap.
/// An identity no registered guard answers to aborts the mount — a
/// partially-built routing table is never served.
pub fn mount(
  routes: Vec<RouteRegistration>,
  registry: &MiddlewareRegistry,
  handler: Arc<dyn ResourceHandler>,
) -> Result<Router, Error> {
  let mut router = Router::new();
  for registration in routes {
    let guards = registry.resolve_chain(&registration.middleware)?;
    let filter = MethodFilter::try_from(registration.method.clone())
      .map_err(|_| Error::UnsupportedMethod(registration.method.to_string()))?;
    tracing::debug!(
      name = %registration.name,
      method = %registration.method,
      path = %registration.path,
      "mounting route"
    );

    let path = registration.path.clone();
    let route = Arc::new(CompiledRoute {
      registration,
      guards,
      handler: handler.clone(),
    });
    router = router.route(
      &path,
      on(filter, move |params: RawPathParams, request: Request| {
        dispatch(route.clone(), params, request)
      }),
    );
  }
  Ok(router)
}

async fn dispatch(
  route: Arc<CompiledRoute>,
  params: RawPathParams,
  request: Request,
) -> Response {
  let resource_id = params
    .iter()
    .find(|(name, _)| *name == PARAM_RESOURCE_ID)
    .map(|(_, value)| value.to_string());

  let (mut parts, body) = request.into_parts();
  let body = match to_bytes(body, BODY_LIMIT).await {
    Ok(bytes) => bytes,
    Err(_) => return Error::PayloadTooLarge.into_response(),
  };

  let route_params = RouteParams {
    resource_type: Some(route.registration.handler.resource_type.clone()),
    resource_id,
    relationship: route
      .registration
      .handler
      .relationship_name()
      .map(str::to_string),
  };
  // Downstream extractors read the tokens from the same extension.
  parts.extensions.insert(route_params.clone());

  let ctx =
    RequestContext::new(parts.method.clone(), parts.uri.path(), route_params);

  for guard in &route.guards {
    if let Err(rejection) = guard.check(&ctx, &parts, &body).await {
      return rejection.into_response();
    }
  }

  route
    .handler
    .handle(&route.registration.handler.action, &ctx, &parts, body)
    .await
}

// ─── Integration tests ────────────────────────────────────────────────────────
