use serde_json::Value as JsonValue;

use crate::context::Context;
use crate::error::WoqlResult;
use crate::serialize::{JsonLdObject, ToWoqlJson};
use crate::value::DataValue;

/// Concatenates a list of strings into a single string.
#[derive(Debug, Clone, PartialEq)]
pub struct Concatenate {
    pub list: DataValue,
    pub result: DataValue,
}

/// Join a list of strings with a separator.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub list: DataValue,
    pub separator: DataValue,
    pub result: DataValue,
}

/// Split a string on a pattern into a list.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub string: DataValue,
    pub pattern: DataValue,
    pub list: DataValue,
}

/// Remove whitespace from both sides of a string.
#[derive(Debug, Clone, PartialEq)]
pub struct Trim {
    pub untrimmed: DataValue,
    pub trimmed: DataValue,
}

/// Lowercase a string.
#[derive(Debug, Clone, PartialEq)]
pub struct Lower {
    pub mixed: DataValue,
    pub lower: DataValue,
}

/// Uppercase a string.
#[derive(Debug, Clone, PartialEq)]
pub struct Upper {
    pub mixed: DataValue,
    pub upper: DataValue,
}

/// Test a string against a PCRE style regex pattern, optionally binding
/// the capture groups.
#[derive(Debug, Clone, PartialEq)]
pub struct Regexp {
    pub pattern: DataValue,
    pub string: DataValue,
    pub result: Option<DataValue>,
}

impl ToWoqlJson for Concatenate {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("Concatenate")
            .field("list", &self.list, ctx)?
            .field("result", &self.result, ctx)?
            .build())
    }
}

impl ToWoqlJson for Join {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("Join")
            .field("list", &self.list, ctx)?
            .field("separator", &self.separator, ctx)?
            .field("result", &self.result, ctx)?
            .build())
    }
}

impl ToWoqlJson for Split {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("Split")
            .field("string", &self.string, ctx)?
            .field("pattern", &self.pattern, ctx)?
            .field("list", &self.list, ctx)?
            .build())
    }
}

impl ToWoqlJson for Trim {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("Trim")
            .field("untrimmed", &self.untrimmed, ctx)?
            .field("trimmed", &self.trimmed, ctx)?
            .build())
    }
}

impl ToWoqlJson for Lower {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("Lower")
            .field("mixed", &self.mixed, ctx)?
            .field("lower", &self.lower, ctx)?
            .build())
    }
}

impl ToWoqlJson for Upper {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("Upper")
            .field("mixed", &self.mixed, ctx)?
            .field("upper", &self.upper, ctx)?
            .build())
    }
}

impl ToWoqlJson for Regexp {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("Regexp")
            .field("pattern", &self.pattern, ctx)?
            .field("string", &self.string, ctx)?
            .optional_field("result", self.result.as_ref(), ctx)?
            .build())
    }
}
