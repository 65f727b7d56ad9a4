use serde_json::{Map, Value as JsonValue};
use tracing::trace;

use crate::context::Context;
use crate::error::{WoqlError, WoqlResult};
use crate::query::Query;

/// Conversion of a query tree node into its JSON-LD document.
pub trait ToWoqlJson {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue>;
}

impl<T: ToWoqlJson + ?Sized> ToWoqlJson for Box<T> {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        (**self).to_woql_json(ctx)
    }
}

impl<T: ToWoqlJson> ToWoqlJson for [T] {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        self.iter()
            .map(|item| item.to_woql_json(ctx))
            .collect::<WoqlResult<Vec<_>>>()
            .map(JsonValue::Array)
    }
}

impl<T: ToWoqlJson> ToWoqlJson for Vec<T> {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        self.as_slice().to_woql_json(ctx)
    }
}

/// An `@type`-tagged JSON object whose keys keep insertion order.
pub(crate) struct JsonLdObject(Map<String, JsonValue>);

impl JsonLdObject {
    pub(crate) fn new(kind: &str) -> Self {
        let mut map = Map::new();
        map.insert("@type".to_string(), JsonValue::from(kind));
        JsonLdObject(map)
    }

    pub(crate) fn field<T: ToWoqlJson + ?Sized>(
        mut self,
        key: &str,
        value: &T,
        ctx: &Context,
    ) -> WoqlResult<Self> {
        self.0.insert(key.to_string(), value.to_woql_json(ctx)?);
        Ok(self)
    }

    pub(crate) fn optional_field<T: ToWoqlJson>(
        self,
        key: &str,
        value: Option<&T>,
        ctx: &Context,
    ) -> WoqlResult<Self> {
        match value {
            Some(value) => self.field(key, value, ctx),
            None => Ok(self),
        }
    }

    pub(crate) fn raw(mut self, key: &str, value: impl Into<JsonValue>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub(crate) fn build(self) -> JsonValue {
        JsonValue::Object(self.0)
    }
}

pub(crate) fn string_array(items: &[String]) -> JsonValue {
    JsonValue::Array(items.iter().map(|item| JsonValue::String(item.clone())).collect())
}

/// Serializes a query tree into its canonical JSON-LD document.
///
/// The output depends only on the tree and the context; serializing twice
/// yields identical documents.
pub fn serialize(query: &Query, ctx: &Context) -> WoqlResult<JsonValue> {
    trace!(kind = query.kind(), "serializing woql query");
    query.to_woql_json(ctx)
}

/// Serializes a query tree to a compact JSON string.
pub fn to_json_string(query: &Query, ctx: &Context) -> WoqlResult<String> {
    let document = serialize(query, ctx)?;
    serde_json::to_string(&document).map_err(|err| WoqlError::Serialization(err.to_string()))
}
