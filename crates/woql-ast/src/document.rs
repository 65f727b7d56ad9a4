use serde_json::Value as JsonValue;

use crate::context::Context;
use crate::error::WoqlResult;
use crate::serialize::{JsonLdObject, ToWoqlJson};
use crate::value::{NodeValue, Value};

/// Read a full document from an identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadDocument {
    pub identifier: NodeValue,
    pub document: Value,
}

/// Insert a document in the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertDocument {
    pub document: Value,
    /// Binds the identifier the document was inserted under.
    pub identifier: Option<NodeValue>,
}

/// Update a document identified by an identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateDocument {
    pub document: Value,
    pub identifier: Option<NodeValue>,
}

/// Delete a document from the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteDocument {
    pub identifier: NodeValue,
}

impl ToWoqlJson for ReadDocument {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("ReadDocument")
            .field("identifier", &self.identifier, ctx)?
            .field("document", &self.document, ctx)?
            .build())
    }
}

impl ToWoqlJson for InsertDocument {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("InsertDocument")
            .field("document", &self.document, ctx)?
            .optional_field("identifier", self.identifier.as_ref(), ctx)?
            .build())
    }
}

impl ToWoqlJson for UpdateDocument {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("UpdateDocument")
            .field("document", &self.document, ctx)?
            .optional_field("identifier", self.identifier.as_ref(), ctx)?
            .build())
    }
}

impl ToWoqlJson for DeleteDocument {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("DeleteDocument")
            .field("identifier", &self.identifier, ctx)?
            .build())
    }
}
