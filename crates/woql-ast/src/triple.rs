use serde_json::Value as JsonValue;

use crate::context::Context;
use crate::error::WoqlResult;
use crate::serialize::JsonLdObject;
use crate::value::{NodeValue, Value};

/// An edge pattern in the graph.
///
/// The same shape backs `Triple`, `AddTriple`, `AddedTriple`,
/// `DeleteTriple` and `DeletedTriple`; the enclosing [`crate::query::Query`]
/// variant decides which one it is.
#[derive(Debug, Clone, PartialEq)]
pub struct Triple {
    /// A URI or variable which is the source or subject of the graph edge.
    pub subject: NodeValue,
    /// A URI or variable which is the edge-label or predicate of the graph edge.
    pub predicate: NodeValue,
    /// A URI, datatype or variable which is the target or object of the graph edge.
    pub object: Value,
    /// An optional graph (for example `schema` or `instance/main`).
    pub graph: Option<String>,
}

impl Triple {
    pub(crate) fn to_json_as(&self, kind: &str, ctx: &Context) -> WoqlResult<JsonValue> {
        let object = JsonLdObject::new(kind)
            .field("subject", &self.subject, ctx)?
            .field("predicate", &self.predicate, ctx)?
            .field("object", &self.object, ctx)?;
        Ok(match &self.graph {
            Some(graph) => object.raw("graph", graph.as_str()),
            None => object,
        }
        .build())
    }
}
