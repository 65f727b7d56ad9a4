//! The transport seam between the client and a server.
//!
//! [`WoqlClient`](crate::WoqlClient) never talks HTTP itself; every request
//! goes through a [`Dispatch`] implementation so tests can swap in a
//! recording double.
use std::time::Duration;

use anyhow::Context as _;
use itertools::Itertools;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::{debug, trace};

use crate::action::{ActionKind, Method};
use crate::config::ConnectionConfig;
use crate::error::ClientError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const QUERY_PARAM: &str = "terminus:query";

/// Sends one action to `url` and returns the decoded response.
pub trait Dispatch {
    fn dispatch(&self, url: &str, action: ActionKind, payload: &Value) -> anyhow::Result<Value>;
}

impl<D: Dispatch + ?Sized> Dispatch for &D {
    fn dispatch(&self, url: &str, action: ActionKind, payload: &Value) -> anyhow::Result<Value> {
        (**self).dispatch(url, action, payload)
    }
}

impl<D: Dispatch + ?Sized> Dispatch for Box<D> {
    fn dispatch(&self, url: &str, action: ActionKind, payload: &Value) -> anyhow::Result<Value> {
        (**self).dispatch(url, action, payload)
    }
}

/// [`Dispatch`] over blocking HTTP with basic auth.
#[derive(Debug, Clone)]
pub struct HttpDispatcher {
    http: Client,
    user: String,
    key: Option<String>,
}

impl HttpDispatcher {
    pub fn new(config: &ConnectionConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(HttpDispatcher {
            http,
            user: config.user().clone(),
            key: config.key().map(str::to_string),
        })
    }
}

impl Dispatch for HttpDispatcher {
    fn dispatch(&self, url: &str, action: ActionKind, payload: &Value) -> anyhow::Result<Value> {
        let wire = wire_payload(action, payload);
        debug!(url, %action, "dispatching request");
        trace!(payload = %wire, "request payload");

        let request = match action.method() {
            Method::Get => self.http.get(with_params(url, &wire)),
            Method::Delete => self.http.delete(with_params(url, &wire)),
            Method::Post => self.http.post(url).json(&wire),
        };

        let response = request
            .basic_auth(&self.user, self.key.as_deref())
            .send()
            .with_context(|| format!("failed to send {} request to {}", action, url))?;
        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map_or(false, |value| value.contains("json"));
        let text = response
            .text()
            .with_context(|| format!("failed to read {} response from {}", action, url))?;

        if status != StatusCode::OK {
            return Err(ClientError::Api {
                status: status.as_u16(),
                url: url.to_string(),
                message: text,
            }
            .into());
        }

        debug!(%status, bytes = text.len(), is_json, "received response");
        decode_body(text, is_json).with_context(|| format!("malformed {} response from {}", action, url))
    }
}

/// JSON bodies must parse. Anything else is handed back as a string.
fn decode_body(text: String, is_json: bool) -> anyhow::Result<Value> {
    if is_json {
        Ok(serde_json::from_str(&text)?)
    } else {
        Ok(Value::String(text))
    }
}

/// Query documents travel as a JSON string under `terminus:query`.
fn wire_payload(action: ActionKind, payload: &Value) -> Value {
    if action.is_query() {
        json!({ QUERY_PARAM: payload.to_string() })
    } else {
        payload.clone()
    }
}

fn param_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// URL-encodes the members of an object payload as a query string.
fn query_string(payload: &Value) -> String {
    match payload {
        Value::Object(members) => members
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(&param_value(value))
                )
            })
            .join("&"),
        _ => String::new(),
    }
}

fn with_params(url: &str, payload: &Value) -> String {
    let params = query_string(payload);
    if params.is_empty() {
        url.to_string()
    } else {
        format!("{}?{}", url, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_query_payload_is_wrapped() {
        let doc = json!({"@type": "True"});
        let wire = wire_payload(ActionKind::Select, &doc);
        assert_eq!(wire, json!({"terminus:query": "{\"@type\":\"True\"}"}));

        let wire = wire_payload(ActionKind::GetSchema, &doc);
        assert_eq!(wire, doc);
    }

    #[test]
    fn test_params_are_encoded() {
        let payload = json!({"terminus:encoding": "terminus:turtle", "limit": 5, "skip": null});
        assert_eq!(
            with_params("http://localhost:6363/people/schema", &payload),
            "http://localhost:6363/people/schema?terminus%3Aencoding=terminus%3Aturtle&limit=5&skip="
        );
    }

    #[test]
    fn test_decode_body_by_content_type() {
        assert_eq!(
            decode_body(r#"{"bindings":[]}"#.to_string(), true).unwrap(),
            json!({"bindings": []})
        );
        assert_eq!(
            decode_body("Database created".to_string(), false).unwrap(),
            json!("Database created")
        );
        assert!(decode_body("{\"bindings\":".to_string(), true).is_err());
    }

    #[test]
    fn test_empty_payload_adds_no_params() {
        assert_eq!(with_params("http://localhost:6363/", &json!({})), "http://localhost:6363/");
        assert_eq!(with_params("http://localhost:6363/", &Value::Null), "http://localhost:6363/");
    }
}
