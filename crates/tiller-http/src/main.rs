//! tiller-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), compiles
//! routes for every configured resource type, and serves them over HTTP with
//! an in-memory resource handler.
//!
//! Example configuration:
//!
//! ```toml
//! host = "127.0.0.1"
//! port = 8080
//!
//! [defaults]
//! validators = "json-document"
//!
//! [[resources]]
//! type = "articles"
//! authorizer = "demo-key"
//! custom_actions = [{ name = "publish", method = "POST" }]
//! relationships = [{ name = "comments", kind = "to-many" }]
//!
//! [[resources]]
//! type = "people"
//! except = ["delete"]
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use serde::Deserialize;
use tiller_core::{PolicyDefaults, ResourceDescriptor, RouteOptions};
use tiller_http::{
  Error, MiddlewareRegistry, guard::fn_guard, memory::InMemoryHandler,
};
use tiller_routing::RouteCompiler;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Tiller JSON:API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct ServerConfig {
  host:      String,
  port:      u16,
  defaults:  PolicyDefaults,
  resources: Vec<ResourceConfig>,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:      "127.0.0.1".to_string(),
      port:      8080,
      defaults:  PolicyDefaults::new(),
      resources: Vec::new(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
struct ResourceConfig {
  #[serde(rename = "type")]
  resource_type: String,
  #[serde(flatten)]
  options:       RouteOptions,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("TILLER"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Compile the routing table.
  let compiler = RouteCompiler::new(server_cfg.defaults.clone());
  let mut routes = Vec::new();
  for resource in &server_cfg.resources {
    let compiled = compiler
      .compile(
        &resource.resource_type,
        &ResourceDescriptor::new(),
        &resource.options,
      )
      .with_context(|| {
        format!("failed to compile routes for {:?}", resource.resource_type)
      })?;
    tracing::info!(
      resource_type = %resource.resource_type,
      routes = compiled.len(),
      "compiled resource routes"
    );
    routes.extend(compiled);
  }

  let app = tiller_http::mount(routes, &builtin_registry(), Arc::new(
    InMemoryHandler::new(),
  ))
  .context("failed to mount routes")?
  .layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Guards available to configuration out of the box.
fn builtin_registry() -> MiddlewareRegistry {
  MiddlewareRegistry::new()
    .register_middleware(
      "request-log",
      fn_guard(|ctx, parts, _| {
        tracing::debug!(method = %parts.method, path = %parts.uri.path(),
          resource_type = ctx.resource_type().unwrap_or("?"),
          "handling request");
        Ok(())
      }),
    )
    .register_authorizer("open", fn_guard(|_, _, _| Ok(())))
    .register_authorizer(
      "demo-key",
      fn_guard(|_, parts, _| match parts.headers.get("x-api-key") {
        Some(value) if value == "tiller-demo" => Ok(()),
        Some(_) => Err(Error::Forbidden),
        None => Err(Error::Unauthenticated),
      }),
    )
    .register_validators(
      "json-document",
      fn_guard(|ctx, _, body| {
        if !ctx.is_expecting_document() || body.is_empty() {
          return Ok(());
        }
        let document: serde_json::Value = serde_json::from_slice(body)
          .map_err(|error| Error::InvalidDocument(error.to_string()))?;
        if document.get("data").is_none() {
          return Err(Error::InvalidDocument(
            "missing top-level \"data\" member".to_string(),
          ));
        }
        Ok(())
      }),
    )
}
