//! A minimal in-memory JSON:API handler, used by the bundled server binary
//! and the integration tests.
//!
//! Stores documents as raw attribute objects keyed by resource type and id.
//! Relationships are not persisted; linkage reads return empty data and
//! linkage mutations succeed with no content.

use std::collections::{BTreeMap, HashMap};

use axum::{
  Json,
  http::{StatusCode, request::Parts},
  response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde_json::{Value, json};
use tiller_core::{Action, RelationshipAction};
use tiller_routing::RouteAction;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
  context::RequestContext,
  error::Error,
  handler::{HandlerFuture, ResourceHandler},
};

#[derive(Default)]
pub struct InMemoryHandler {
  records: RwLock<HashMap<String, BTreeMap<String, Value>>>,
}

impl InMemoryHandler {
  pub fn new() -> Self {
    Self::default()
  }

  fn document(resource_type: &str, id: &str, attributes: &Value) -> Value {
    json!({
      "data": { "type": resource_type, "id": id, "attributes": attributes }
    })
  }

  async fn index(&self, resource_type: &str) -> Result<Response, Error> {
    let records = self.records.read().await;
    let data: Vec<Value> = records
      .get(resource_type)
      .into_iter()
      .flatten()
      .map(|(id, attributes)| {
        json!({ "type": resource_type, "id": id, "attributes": attributes })
      })
      .collect();
    Ok(Json(json!({ "data": data })).into_response())
  }

  async fn create(
    &self,
    resource_type: &str,
    body: &Bytes,
  ) -> Result<Response, Error> {
    let document = parse_document(body)?;
    let attributes = attributes_of(&document)?;
    // JSON:API permits client-generated ids; otherwise the server assigns one.
    let id = match document["data"].get("id").and_then(Value::as_str) {
      Some(id) => id.to_string(),
      None => Uuid::new_v4().to_string(),
    };

    let mut records = self.records.write().await;
    let resources = records.entry(resource_type.to_string()).or_default();
    if resources.contains_key(&id) {
      return Err(Error::Conflict(format!(
        "{resource_type} {id:?} already exists"
      )));
    }
    resources.insert(id.clone(), attributes.clone());
    Ok(
      (
        StatusCode::CREATED,
        Json(Self::document(resource_type, &id, &attributes)),
      )
        .into_response(),
    )
  }

  async fn read(
    &self,
    resource_type: &str,
    id: &str,
  ) -> Result<Response, Error> {
    let records = self.records.read().await;
    let attributes = records
      .get(resource_type)
      .and_then(|resources| resources.get(id))
      .ok_or(Error::NotFound)?;
    Ok(Json(Self::document(resource_type, id, attributes)).into_response())
  }

  async fn update(
    &self,
    resource_type: &str,
    id: &str,
    body: &Bytes,
  ) -> Result<Response, Error> {
    let document = parse_document(body)?;
    let patch = attributes_of(&document)?;

    let mut records = self.records.write().await;
    let attributes = records
      .get_mut(resource_type)
      .and_then(|resources| resources.get_mut(id))
      .ok_or(Error::NotFound)?;
    if let (Value::Object(current), Value::Object(patch)) = (&mut *attributes, patch)
    {
      for (key, value) in patch {
        current.insert(key, value);
      }
    }
    Ok(Json(Self::document(resource_type, id, attributes)).into_response())
  }

  async fn delete(
    &self,
    resource_type: &str,
    id: &str,
  ) -> Result<Response, Error> {
    let mut records = self.records.write().await;
    records
      .get_mut(resource_type)
      .and_then(|resources| resources.remove(id))
      .ok_or(Error::NotFound)?;
    Ok(StatusCode::NO_CONTENT.into_response())
  }

  async fn dispatch(
    &self,
    action: &RouteAction,
    ctx: &RequestContext,
    body: &Bytes,
  ) -> Result<Response, Error> {
    let resource_type = ctx.resource_type()?;
    match action {
      RouteAction::Resource(Action::Index) => self.index(resource_type).await,
      RouteAction::Resource(Action::Create) => {
        self.create(resource_type, body).await
      }
      RouteAction::Resource(Action::Read) => {
        self.read(resource_type, required_id(ctx)?).await
      }
      RouteAction::Resource(Action::Update) => {
        self.update(resource_type, required_id(ctx)?, body).await
      }
      RouteAction::Resource(Action::Delete) => {
        self.delete(resource_type, required_id(ctx)?).await
      }
      RouteAction::Resource(Action::Custom(name)) => {
        Ok(Json(json!({ "meta": { "action": name } })).into_response())
      }
      RouteAction::Relationship { action, .. } => match action {
        RelationshipAction::Related | RelationshipAction::Read => {
          Ok(Json(json!({ "data": [] })).into_response())
        }
        _ => Ok(StatusCode::NO_CONTENT.into_response()),
      },
    }
  }
}

impl ResourceHandler for InMemoryHandler {
  fn handle<'a>(
    &'a self,
    action: &'a RouteAction,
    ctx: &'a RequestContext,
    _parts: &'a Parts,
    body: Bytes,
  ) -> HandlerFuture<'a> {
    Box::pin(async move {
      match self.dispatch(action, ctx, &body).await {
        Ok(response) => response,
        Err(error) => error.into_response(),
      }
    })
  }
}

fn required_id(ctx: &RequestContext) -> Result<&str, Error> {
  ctx
    .resource_id()
    .ok_or_else(|| Error::BadRequest("missing resource id".to_string()))
}

fn parse_document(body: &Bytes) -> Result<Value, Error> {
  let document: Value = serde_json::from_slice(body)
    .map_err(|error| Error::InvalidDocument(error.to_string()))?;
  if document.get("data").is_none() {
    return Err(Error::InvalidDocument(
      "missing top-level \"data\" member".to_string(),
    ));
  }
  Ok(document)
}

fn attributes_of(document: &Value) -> Result<Value, Error> {
  Ok(
    document["data"]
      .get("attributes")
      .cloned()
      .unwrap_or_else(|| json!({})),
  )
}
