use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::context::Context;
use crate::error::WoqlResult;
use crate::query::Query;
use crate::serialize::{string_array, JsonLdObject, ToWoqlJson};
use crate::value::Value;

/// The direction of an ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl Order {
    pub fn as_str(&self) -> &'static str {
        match self {
            Order::Asc => "asc",
            Order::Desc => "desc",
        }
    }
}

/// The order template, consisting of the variable and ordering direction.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderTemplate {
    pub order: Order,
    pub variable: String,
}

/// Orders query results according to an ordering specification.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    /// A specification of the ordering of solutions.
    pub ordering: Vec<OrderTemplate>,
    /// The base query giving the solutions to order.
    pub query: Box<Query>,
}

/// Group a query into a list with each element of the list specified by
/// `template` using a given variable set for the group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupBy {
    /// The variables which should be grouped into like solutions.
    pub group_by: Vec<String>,
    /// The template of elements in the result list.
    pub template: Value,
    /// The final list of templates.
    pub grouped: Value,
    /// The subquery providing the solutions to group.
    pub query: Box<Query>,
}

impl ToWoqlJson for OrderTemplate {
    fn to_woql_json(&self, _ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("OrderTemplate")
            .raw("order", self.order.as_str())
            .raw("variable", self.variable.as_str())
            .build())
    }
}

impl ToWoqlJson for OrderBy {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("OrderBy")
            .field("ordering", &self.ordering, ctx)?
            .field("query", &self.query, ctx)?
            .build())
    }
}

impl ToWoqlJson for GroupBy {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("GroupBy")
            .raw("group_by", string_array(&self.group_by))
            .field("template", &self.template, ctx)?
            .field("grouped", &self.grouped, ctx)?
            .field("query", &self.query, ctx)?
            .build())
    }
}
