use serde_json::Value as JsonValue;

use crate::context::Context;
use crate::error::WoqlResult;
use crate::serialize::{JsonLdObject, ToWoqlJson};
use crate::value::DataValue;

/// Generate or test every element of a list.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    /// The element to test for membership or to supply as generated.
    pub member: DataValue,
    /// The list of elements against which to generate or test membership.
    pub list: DataValue,
}

/// Find the length of a list.
#[derive(Debug, Clone, PartialEq)]
pub struct Length {
    /// The list of which to find the length.
    pub list: DataValue,
    /// The length of the list.
    pub length: DataValue,
}

/// Adds a list of numbers together.
#[derive(Debug, Clone, PartialEq)]
pub struct Sum {
    /// The list of numbers to sum.
    pub list: DataValue,
    /// The result of the sum as a number.
    pub result: DataValue,
}

/// Extracts a contiguous sub-list.
///
/// `start` is inclusive and `end` exclusive. Negative indices count from
/// the end of the list. Without `end` the slice runs to the end of the list.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub list: DataValue,
    pub result: DataValue,
    pub start: DataValue,
    pub end: Option<DataValue>,
}

impl ToWoqlJson for Member {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("Member")
            .field("member", &self.member, ctx)?
            .field("list", &self.list, ctx)?
            .build())
    }
}

impl ToWoqlJson for Length {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("Length")
            .field("list", &self.list, ctx)?
            .field("length", &self.length, ctx)?
            .build())
    }
}

impl ToWoqlJson for Sum {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("Sum")
            .field("list", &self.list, ctx)?
            .field("result", &self.result, ctx)?
            .build())
    }
}

impl ToWoqlJson for Slice {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("Slice")
            .field("list", &self.list, ctx)?
            .field("result", &self.result, ctx)?
            .field("start", &self.start, ctx)?
            .optional_field("end", self.end.as_ref(), ctx)?
            .build())
    }
}
