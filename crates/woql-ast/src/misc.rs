use serde_json::Value as JsonValue;

use crate::context::Context;
use crate::error::WoqlResult;
use crate::query::Query;
use crate::serialize::{JsonLdObject, ToWoqlJson};
use crate::value::DataValue;

/// Limit a query to a particular maximum number of solutions specified by
/// `limit`.
#[derive(Debug, Clone, PartialEq)]
pub struct Limit {
    /// Maximum number of solutions.
    pub limit: u64,
    /// The query to perform.
    pub query: Box<Query>,
}

/// Start a query at the nth solution specified by `start`. Allows resumption
/// and paging of queries.
#[derive(Debug, Clone, PartialEq)]
pub struct Start {
    /// The numbered solution to start at.
    pub start: u64,
    /// The query to perform.
    pub query: Box<Query>,
}

/// Counts the number of solutions of a query.
#[derive(Debug, Clone, PartialEq)]
pub struct Count {
    /// The query from which to obtain the count.
    pub query: Box<Query>,
    /// The count of the number of solutions.
    pub count: DataValue,
}

impl ToWoqlJson for Limit {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("Limit")
            .raw("limit", self.limit)
            .field("query", &self.query, ctx)?
            .build())
    }
}

impl ToWoqlJson for Start {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("Start")
            .raw("start", self.start)
            .field("query", &self.query, ctx)?
            .build())
    }
}

impl ToWoqlJson for Count {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("Count")
            .field("query", &self.query, ctx)?
            .field("count", &self.count, ctx)?
            .build())
    }
}
