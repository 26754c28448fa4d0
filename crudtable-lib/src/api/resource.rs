//! List, info, get, create and delete calls on a resource
//!
//! [`ResourceApi`] is the contract a table needs from its server.
//! [`CrudClient`] implements it over HTTP; tests and alternative transports
//! implement it directly.

use async_trait::async_trait;
use log::debug;
use reqwest::Method;
use reqwest::RequestBuilder;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;

use super::query::QueryState;
use crate::CrudClient;
use crate::error::ApiError;
use crate::error::Error;
use crate::error::FieldValidationError;
use crate::error::ValidationError;
use crate::model::Created;
use crate::model::CreatedResponse;
use crate::model::Item;
use crate::model::ItemId;
use crate::model::ItemResponse;
use crate::model::ListResponse;
use crate::model::ResourceInfo;
use crate::model::ResultSet;

/// Form data submitted to `create`: field key to JSON value.
pub type FormData = Map<String, Value>;

/// Operations a CRUD table performs against its server.
#[async_trait]
pub trait ResourceApi: Send + Sync {
    /// Fetches one page of records matching `query`.
    async fn list(&self, resource: &str, query: &QueryState) -> Result<ResultSet, Error>;

    /// Fetches form, filter and permission metadata.
    async fn info(&self, resource: &str) -> Result<ResourceInfo, Error>;

    /// Fetches a single record.
    async fn get_item(&self, resource: &str, id: &ItemId) -> Result<Item, Error>;

    /// Creates a record.
    async fn create(&self, resource: &str, data: &FormData) -> Result<Created, Error>;

    /// Deletes a record and returns the server's confirmation message.
    async fn delete(&self, resource: &str, id: &ItemId) -> Result<String, Error>;
}

#[derive(Debug, Default, Deserialize)]
struct MessageBody {
    #[serde(default)]
    message: Option<Value>,
}

#[async_trait]
impl ResourceApi for CrudClient {
    async fn list(&self, resource: &str, query: &QueryState) -> Result<ResultSet, Error> {
        let url = self.build_url(resource, &[]);
        let q = query.to_query_param();
        let request = self.http().get(&url).query(&[("q", q.as_str())]);
        let raw: ListResponse = self.send_json(Method::GET, &url, request, resource, None).await?;
        Ok(ResultSet::try_from(raw)?)
    }

    async fn info(&self, resource: &str) -> Result<ResourceInfo, Error> {
        let url = self.build_url(resource, &["_info"]);
        let request = self.http().get(&url);
        self.send_json(Method::GET, &url, request, resource, None).await
    }

    async fn get_item(&self, resource: &str, id: &ItemId) -> Result<Item, Error> {
        let id = id.to_string();
        let url = self.build_url(resource, &[&id]);
        let request = self.http().get(&url);
        let raw: ItemResponse = self
            .send_json(Method::GET, &url, request, resource, Some(&id))
            .await?;
        Ok(raw.into())
    }

    async fn create(&self, resource: &str, data: &FormData) -> Result<Created, Error> {
        let url = self.build_url(resource, &[]);
        let request = self.http().post(&url).json(data);
        let raw: CreatedResponse = self.send_json(Method::POST, &url, request, resource, None).await?;
        Ok(raw.into())
    }

    async fn delete(&self, resource: &str, id: &ItemId) -> Result<String, Error> {
        let id = id.to_string();
        let url = self.build_url(resource, &[&id]);
        let request = self.http().delete(&url);
        let body: MessageBody = self
            .send_json(Method::DELETE, &url, request, resource, Some(&id))
            .await?;
        Ok(body.message.map(message_text).unwrap_or_else(|| "OK".to_string()))
    }
}

// =============================================================================
// Helper methods
// =============================================================================

impl CrudClient {
    /// Sends a request and decodes a successful JSON body.
    ///
    /// Failures are classified into not-found, validation and plain HTTP
    /// errors.
    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        mut request: RequestBuilder,
        resource: &str,
        id: Option<&str>,
    ) -> Result<T, Error> {
        if let Some(timeout) = self.timeout() {
            request = request.timeout(timeout);
        }

        debug!("{method} {url}");
        let response = request.send().await.map_err(|e| self.map_send_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;
        debug!("{method} {url} -> {}", status.as_u16());

        if status.is_success() {
            return serde_json::from_str(&body)
                .map_err(|e| ApiError::parse_with_body(e.to_string(), body).into());
        }

        Err(classify_failure(status.as_u16(), &body, resource, id))
    }

    fn map_send_error(&self, err: reqwest::Error) -> Error {
        match self.timeout() {
            Some(timeout) if err.is_timeout() => ApiError::Timeout(timeout).into(),
            _ => ApiError::from(err).into(),
        }
    }
}

/// Turns a non-success response into an [`Error`].
fn classify_failure(status: u16, body: &str, resource: &str, id: Option<&str>) -> Error {
    if status == 404 {
        return Error::NotFound {
            resource: resource.to_string(),
            id: id.map(str::to_string),
        };
    }

    let message = serde_json::from_str::<MessageBody>(body)
        .ok()
        .and_then(|b| b.message);

    match message {
        Some(Value::Object(fields)) if (400..500).contains(&status) => {
            ValidationError::with_fields(status, field_errors(&fields)).into()
        }
        Some(message) if (400..500).contains(&status) => {
            ValidationError::message(status, message_text(message)).into()
        }
        Some(message) => ApiError::http(status, message_text(message)).into(),
        None => ApiError::http(status, String::new()).into(),
    }
}

/// Flattens `{"field": ["msg", ...]}` into per-field errors.
fn field_errors(fields: &Map<String, Value>) -> Vec<FieldValidationError> {
    let mut errors = Vec::new();
    for (field, messages) in fields {
        match messages {
            Value::Array(items) => {
                for item in items {
                    errors.push(FieldValidationError::new(field, message_text(item.clone())));
                }
            }
            other => errors.push(FieldValidationError::new(field, message_text(other.clone()))),
        }
    }
    errors
}

fn message_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
