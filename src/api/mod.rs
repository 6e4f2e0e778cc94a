//! REST client for the warranty backend.
//!
//! One method per endpoint, grouped by resource. Every body is a
//! `{ "data": ..., "message"?: ... }` envelope; list payloads may sit under a
//! named key inside `data` or be a bare array.

mod auth;
mod campaigns;
mod customers;
mod parts;
mod policies;
mod users;
mod vehicles;

pub use auth::LoginRequest;

use std::time::Duration;

use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::auth::Session;
use crate::config::Config;
use crate::errors::ClientError;
use crate::models::wire::WireRecord;
use crate::view::Mutation;

/// Header carrying a per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest pause between two GET attempts.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Bounded exponential backoff for idempotent requests.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    /// Delay before retry number `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor).min(MAX_RETRY_DELAY)
    }
}

/// HTTP client bound to one backend and, optionally, one session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
    retry: RetryPolicy,
}

impl ApiClient {
    pub fn new(config: &Config, session: Option<&Session>) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: session.map(|s| s.token().to_string()),
            retry: RetryPolicy {
                max_retries: config.get_retries,
                base_delay: config.retry_base_delay,
            },
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, self.url(path))
            .header(header::ACCEPT, "application/json")
            .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string());
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// GET a list endpoint and pull the records out of the envelope.
    pub(crate) async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        key: &str,
    ) -> Result<Vec<T>, ClientError> {
        let body = self.get_with_retry(path).await?;
        extract_list(body, key)
    }

    /// GET with bounded retry on connection failures and 5xx responses.
    async fn get_with_retry(&self, path: &str) -> Result<Value, ClientError> {
        let mut attempt = 0;
        loop {
            let result = match self.request(Method::GET, path).send().await {
                Ok(resp) => read_body(resp).await,
                Err(e) => Err(ClientError::from(e)),
            };
            match result {
                Ok(body) => return Ok(body.unwrap_or(Value::Null)),
                Err(e) if e.is_retryable() && attempt < self.retry.max_retries => {
                    let delay = self.retry.delay_for(attempt);
                    tracing::warn!(
                        path,
                        attempt = attempt + 1,
                        "GET failed ({}), retrying in {:?}",
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Send a mutation. Never retried.
    pub(crate) async fn mutate<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Mutation<T>, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + WireRecord,
    {
        tracing::debug!(method = method.as_str(), path, "Sending mutation");
        let mut builder = self.request(method, path);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let resp = builder.send().await?;
        let body = read_body(resp).await?;
        Ok(interpret_mutation(body))
    }

    /// POST that expects data back rather than a record mutation.
    pub(crate) async fn post_for_data<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.request(Method::POST, path).json(body).send().await?;
        let body = read_body(resp).await?.unwrap_or(Value::Null);
        let data = unwrap_data(body);
        serde_json::from_value(data).map_err(ClientError::from)
    }
}

/// Read a response body, turning error statuses into [`ClientError::Server`].
///
/// `Ok(None)` means a successful response with an empty body.
async fn read_body(resp: Response) -> Result<Option<Value>, ClientError> {
    let status = resp.status();
    let text = resp.text().await?;
    if !status.is_success() {
        tracing::debug!(status = status.as_u16(), "Server rejected request");
        return Err(ClientError::from_response(status.as_u16(), &text));
    }
    if text.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&text).map(Some).map_err(ClientError::from)
}

/// The `data` member of an envelope, or the body itself when unwrapped.
fn unwrap_data(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Pull a list of records out of a list response.
///
/// Accepts `{data: {<key>: [...]}}`, `{data: [...]}` and a bare `[...]`.
pub(crate) fn extract_list<T: DeserializeOwned>(
    body: Value,
    key: &str,
) -> Result<Vec<T>, ClientError> {
    let list = match unwrap_data(body) {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => match map.remove(key) {
            Some(list @ Value::Array(_)) => list,
            _ => {
                return Err(ClientError::Decode(format!(
                    "List response has no '{}' array",
                    key
                )))
            }
        },
        other => {
            return Err(ClientError::Decode(format!(
                "Expected a list response, got {}",
                type_name(&other)
            )))
        }
    };
    serde_json::from_value(list).map_err(ClientError::from)
}

/// Classify a successful mutation body.
///
/// Only a reply carrying the whole record is an [`Mutation::Entity`]; a
/// partial echo of the changed fields is [`Mutation::Unrecognized`] so the
/// caller refetches instead of overwriting a held row with it.
pub(crate) fn interpret_mutation<T>(body: Option<Value>) -> Mutation<T>
where
    T: DeserializeOwned + WireRecord,
{
    let Some(body) = body else {
        return Mutation::Acknowledged;
    };
    let has_envelope = matches!(&body, Value::Object(map) if map.contains_key("data"));
    match unwrap_data(body) {
        Value::Null => Mutation::Acknowledged,
        // `{message: "..."}` with no data is an acknowledgement.
        Value::Object(map)
            if !has_envelope && !map.contains_key("id") && !map.contains_key("vin") =>
        {
            Mutation::Acknowledged
        }
        Value::Object(map) => {
            if let Some(entity) = complete_record(&map) {
                return Mutation::Entity(entity);
            }
            // A record wrapped once more under a single key, e.g. {campaign: {...}}.
            if map.len() == 1 {
                if let Some(Value::Object(inner)) = map.values().next() {
                    if let Some(entity) = complete_record(inner) {
                        return Mutation::Entity(entity);
                    }
                }
            }
            tracing::debug!(
                fields = ?map.keys().collect::<Vec<_>>(),
                "Mutation reply is not a full record"
            );
            Mutation::Unrecognized
        }
        _ => Mutation::Unrecognized,
    }
}

fn complete_record<T>(object: &Map<String, Value>) -> Option<T>
where
    T: DeserializeOwned + WireRecord,
{
    if !T::is_complete(object) {
        return None;
    }
    serde_json::from_value(Value::Object(object.clone())).ok()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Campaign, PartPolicy};
    use serde_json::json;

    #[test]
    fn test_extract_list_shapes() {
        let nested = json!({"data": {"campaigns": [{"id": 1}, {"id": 2}]}});
        let bare_data = json!({"data": [{"id": 1}]});
        let bare = json!([{"id": 1}]);

        assert_eq!(extract_list::<Campaign>(nested, "campaigns").unwrap().len(), 2);
        assert_eq!(extract_list::<Campaign>(bare_data, "campaigns").unwrap().len(), 1);
        assert_eq!(extract_list::<Campaign>(bare, "campaigns").unwrap().len(), 1);
    }

    #[test]
    fn test_extract_list_wrong_key() {
        let body = json!({"data": {"partPolicies": []}});
        let err = extract_list::<Campaign>(body, "campaigns").unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    fn full_campaign(id: u32) -> Value {
        json!({"id": id, "code": "CMP-1", "name": "Recall", "description": null,
               "startDate": "2024-01-01", "endDate": "2024-01-31"})
    }

    #[test]
    fn test_interpret_mutation() {
        let entity: Mutation<Campaign> =
            interpret_mutation(Some(json!({"data": full_campaign(5)})));
        assert!(matches!(entity, Mutation::Entity(c) if c.id == "5"));

        let wrapped: Mutation<Campaign> =
            interpret_mutation(Some(json!({"data": {"campaign": full_campaign(6)}})));
        assert!(matches!(wrapped, Mutation::Entity(c) if c.id == "6"));

        let empty: Mutation<Campaign> = interpret_mutation(None);
        assert_eq!(empty, Mutation::Acknowledged);

        let null_data: Mutation<Campaign> =
            interpret_mutation(Some(json!({"data": null, "message": "Updated"})));
        assert_eq!(null_data, Mutation::Acknowledged);

        let message_only: Mutation<Campaign> = interpret_mutation(Some(json!({"message": "OK"})));
        assert_eq!(message_only, Mutation::Acknowledged);

        let odd: Mutation<Campaign> = interpret_mutation(Some(json!({"data": "done"})));
        assert_eq!(odd, Mutation::Unrecognized);

        let wrong_shape: Mutation<Campaign> =
            interpret_mutation(Some(json!({"data": {"ok": true, "count": 1}})));
        assert_eq!(wrong_shape, Mutation::Unrecognized);
    }

    #[test]
    fn test_partial_reply_is_not_an_entity() {
        let status_only: Mutation<PartPolicy> =
            interpret_mutation(Some(json!({"data": {"id": "P1", "status": "INACTIVE"}})));
        assert_eq!(status_only, Mutation::Unrecognized);

        let partial = json!({"id": "P1", "status": "INACTIVE"});
        let wrapped_partial: Mutation<PartPolicy> =
            interpret_mutation(Some(json!({"data": {"partPolicy": partial}})));
        assert_eq!(wrapped_partial, Mutation::Unrecognized);

        let bare_id: Mutation<Campaign> = interpret_mutation(Some(json!({"id": 5, "name": "X"})));
        assert_eq!(bare_id, Mutation::Unrecognized);
    }

    #[test]
    fn test_free_form_reply_is_accepted() {
        let reply: Mutation<Value> =
            interpret_mutation(Some(json!({"data": {"id": 55, "status": "PENDING"}})));
        assert_eq!(reply, Mutation::Entity(json!({"id": 55, "status": "PENDING"})));
    }

    #[test]
    fn test_retry_delay_is_bounded() {
        let policy = RetryPolicy {
            max_retries: 10,
            base_delay: Duration::from_millis(200),
        };
        assert_eq!(policy.delay_for(0), Duration::from_millis(200));
        assert_eq!(policy.delay_for(2), Duration::from_millis(800));
        assert_eq!(policy.delay_for(30), MAX_RETRY_DELAY);
        assert_eq!(RetryPolicy::none().delay_for(3), Duration::ZERO);
    }
}
