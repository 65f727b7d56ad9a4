use serde_json::Value as JsonValue;

use crate::context::Context;
use crate::error::WoqlResult;
use crate::serialize::{JsonLdObject, ToWoqlJson};
use crate::value::{DataValue, NodeValue, Value};

/// True whenever `left` is the same as `right`. Performs unification.
#[derive(Debug, Clone, PartialEq)]
pub struct Equals {
    pub left: Value,
    pub right: Value,
}

/// Predicate determining if one thing is less than another according to
/// natural ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct Less {
    pub left: DataValue,
    pub right: DataValue,
}

/// Predicate determining if one thing is greater than another according to
/// natural ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct Greater {
    pub left: DataValue,
    pub right: DataValue,
}

/// Test (or generate) the type of an element.
#[derive(Debug, Clone, PartialEq)]
pub struct IsA {
    pub element: NodeValue,
    pub type_of: NodeValue,
}

/// Predicate indicating that a child class is subsumed by (a subclass of)
/// a parent class.
#[derive(Debug, Clone, PartialEq)]
pub struct Subsumption {
    pub child: NodeValue,
    pub parent: NodeValue,
}

/// Determines the type of a value.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeOf {
    pub value: Value,
    pub type_uri: NodeValue,
}

/// Casts one type as another if possible.
#[derive(Debug, Clone, PartialEq)]
pub struct Typecast {
    pub value: Value,
    pub type_uri: NodeValue,
    pub result: Value,
}

impl ToWoqlJson for Equals {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("Equals")
            .field("left", &self.left, ctx)?
            .field("right", &self.right, ctx)?
            .build())
    }
}

impl ToWoqlJson for Less {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("Less")
            .field("left", &self.left, ctx)?
            .field("right", &self.right, ctx)?
            .build())
    }
}

impl ToWoqlJson for Greater {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("Greater")
            .field("left", &self.left, ctx)?
            .field("right", &self.right, ctx)?
            .build())
    }
}

impl ToWoqlJson for IsA {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("IsA")
            .field("element", &self.element, ctx)?
            .field("type", &self.type_of, ctx)?
            .build())
    }
}

impl ToWoqlJson for Subsumption {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("Subsumption")
            .field("child", &self.child, ctx)?
            .field("parent", &self.parent, ctx)?
            .build())
    }
}

impl ToWoqlJson for TypeOf {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("TypeOf")
            .field("value", &self.value, ctx)?
            .field("type", &self.type_uri, ctx)?
            .build())
    }
}

impl ToWoqlJson for Typecast {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("Typecast")
            .field("value", &self.value, ctx)?
            .field("type", &self.type_uri, ctx)?
            .field("result", &self.result, ctx)?
            .build())
    }
}
