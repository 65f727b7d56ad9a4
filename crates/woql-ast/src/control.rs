use serde_json::Value as JsonValue;

use crate::context::Context;
use crate::error::WoqlResult;
use crate::query::Query;
use crate::serialize::{string_array, JsonLdObject, ToWoqlJson};

/// Select a specific collection for query.
#[derive(Debug, Clone, PartialEq)]
pub struct Using {
    /// The resource over which to run the query.
    pub collection: String,
    /// The query which will be run on the selected collection.
    pub query: Box<Query>,
}

/// Change the default read graph (between instance/schema).
#[derive(Debug, Clone, PartialEq)]
pub struct From {
    /// The graph filter: 'schema' or 'instance' or '*'.
    pub graph: String,
    /// The subquery with a new default graph.
    pub query: Box<Query>,
}

/// Change the default write graph (between instance/schema).
#[derive(Debug, Clone, PartialEq)]
pub struct Into {
    /// The graph filter: schema or instance.
    pub graph: String,
    /// The subquery with a new default write graph.
    pub query: Box<Query>,
}

/// Select specific variables from a query to return.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    /// The variables to select from the query.
    pub variables: Vec<String>,
    /// The query which will be run prior to selection.
    pub query: Box<Query>,
}

/// Ensure variables listed result in distinct solutions.
#[derive(Debug, Clone, PartialEq)]
pub struct Distinct {
    /// The variables which must be distinct from the query.
    pub variables: Vec<String>,
    /// The query which will be run prior to selection.
    pub query: Box<Query>,
}

/// A conditional which runs the then clause for every success from the test
/// clause, otherwise runs the else clause.
#[derive(Debug, Clone, PartialEq)]
pub struct If {
    /// A query which will provide bindings for the then clause.
    pub test: Box<Query>,
    /// A query which will run for every solution of test with associated bindings.
    pub then_query: Box<Query>,
    /// A query which runs whenever test fails.
    pub else_query: Box<Query>,
}

/// A query which will succeed (without bindings) even in the case of failure.
#[derive(Debug, Clone, PartialEq)]
pub struct WoqlOptional {
    pub query: Box<Query>,
}

/// Obtains exactly one solution from a query.
#[derive(Debug, Clone, PartialEq)]
pub struct Once {
    pub query: Box<Query>,
}

/// Attempts to perform all side-effecting operations immediately.
#[derive(Debug, Clone, PartialEq)]
pub struct Immediately {
    pub query: Box<Query>,
}

impl ToWoqlJson for Using {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("Using")
            .raw("collection", self.collection.as_str())
            .raw("@context", ctx.prefixes_path(&self.collection))
            .field("query", &self.query, ctx)?
            .build())
    }
}

impl ToWoqlJson for From {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("From")
            .raw("graph", self.graph.as_str())
            .field("query", &self.query, ctx)?
            .build())
    }
}

impl ToWoqlJson for Into {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("Into")
            .raw("graph", self.graph.as_str())
            .field("query", &self.query, ctx)?
            .build())
    }
}

impl ToWoqlJson for Select {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("Select")
            .raw("variables", string_array(&self.variables))
            .field("query", &self.query, ctx)?
            .build())
    }
}

impl ToWoqlJson for Distinct {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("Distinct")
            .raw("variables", string_array(&self.variables))
            .field("query", &self.query, ctx)?
            .build())
    }
}

impl ToWoqlJson for If {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("If")
            .field("test", &self.test, ctx)?
            .field("then", &self.then_query, ctx)?
            .field("else", &self.else_query, ctx)?
            .build())
    }
}

impl ToWoqlJson for WoqlOptional {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("Optional")
            .field("query", &self.query, ctx)?
            .build())
    }
}

impl ToWoqlJson for Once {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("Once").field("query", &self.query, ctx)?.build())
    }
}

impl ToWoqlJson for Immediately {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("Immediately")
            .field("query", &self.query, ctx)?
            .build())
    }
}
