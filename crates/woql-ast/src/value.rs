use std::fmt;
use std::ops::Deref;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use decimal_rs::Decimal;
use serde_json::Value as JsonValue;

use crate::context::{is_node_prefix, Context};
use crate::error::{WoqlError, WoqlResult};
use crate::serialize::{JsonLdObject, ToWoqlJson};

pub const XSD_STRING: &str = "xsd:string";
pub const XSD_INTEGER: &str = "xsd:integer";
pub const XSD_DECIMAL: &str = "xsd:decimal";
pub const XSD_BOOLEAN: &str = "xsd:boolean";
pub const XSD_DATE_TIME: &str = "xsd:dateTime";
pub const XSD_DATE: &str = "xsd:date";

/// Returns the variable name of a `v:`-prefixed string.
///
/// `"v:"` on its own is not a variable.
pub fn variable_name(text: &str) -> Option<&str> {
    text.strip_prefix("v:").filter(|name| !name.is_empty())
}

/// A WOQL variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Var {
    name: String,
}

impl Var {
    /// Creates a variable reference. A leading `v:` is stripped.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let name = match variable_name(&name) {
            Some(stripped) => stripped.to_string(),
            None => name,
        };
        Var { name }
    }

    /// Returns the name of the variable (without the "v:" prefix).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the full name of the variable prefixed with "v:".
    pub fn full_name(&self) -> String {
        format!("v:{}", self.name)
    }

    pub fn into_name(self) -> String {
        self.name
    }
}

impl Deref for Var {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.name
    }
}

impl From<&str> for Var {
    fn from(name: &str) -> Self {
        Var::new(name)
    }
}

impl From<String> for Var {
    fn from(name: String) -> Self {
        Var::new(name)
    }
}

impl From<&Var> for Var {
    fn from(var: &Var) -> Self {
        var.clone()
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v:{}", self.name)
    }
}

/// The syntactic slot a raw value is encoded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Subject,
    Predicate,
    Object,
    Data,
    Index,
    Graph,
    Arithmetic,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Position::Subject => "subject",
            Position::Predicate => "predicate",
            Position::Object => "object",
            Position::Data => "data",
            Position::Index => "index",
            Position::Graph => "graph",
            Position::Arithmetic => "arithmetic",
        };
        f.write_str(name)
    }
}

/// Represents an input value for WOQL builder functions.
///
/// Plain strings arrive as [`WoqlInput::Text`] and are classified by the
/// position they are used in. Use [`WoqlInput::Node`] or
/// [`WoqlInput::String`] to force a reading.
#[derive(Debug, Clone, PartialEq)]
pub enum WoqlInput {
    Variable(Var),
    Text(String),
    Node(String),
    String(String),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Decimal(Decimal),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
    Typed(Literal),
    List(Vec<WoqlInput>),
    Json(JsonValue),
}

impl WoqlInput {
    fn from_json(json: JsonValue, position: Position) -> WoqlResult<WoqlInput> {
        match json {
            JsonValue::Null => Err(WoqlError::type_kind(position, "null")),
            JsonValue::Bool(b) => Ok(WoqlInput::Boolean(b)),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(WoqlInput::Integer(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(WoqlInput::Unsigned(u))
                } else {
                    Ok(WoqlInput::Float(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            JsonValue::String(s) => Ok(WoqlInput::Text(s)),
            JsonValue::Array(items) => Ok(WoqlInput::List(
                items.into_iter().map(WoqlInput::Json).collect(),
            )),
            JsonValue::Object(_) => Err(WoqlError::type_kind(position, "mapping")),
        }
    }
}

// --- Input Type Conversions ---

impl From<Var> for WoqlInput {
    fn from(v: Var) -> Self {
        WoqlInput::Variable(v)
    }
}

impl From<&Var> for WoqlInput {
    fn from(v: &Var) -> Self {
        WoqlInput::Variable(v.clone())
    }
}

impl From<&str> for WoqlInput {
    fn from(s: &str) -> Self {
        WoqlInput::Text(s.to_string())
    }
}

impl From<String> for WoqlInput {
    fn from(s: String) -> Self {
        WoqlInput::Text(s)
    }
}

impl From<&String> for WoqlInput {
    fn from(s: &String) -> Self {
        WoqlInput::Text(s.clone())
    }
}

impl From<bool> for WoqlInput {
    fn from(b: bool) -> Self {
        WoqlInput::Boolean(b)
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for WoqlInput {
            fn from(i: $t) -> Self {
                WoqlInput::Integer(i as i64)
            }
        })*
    };
}
impl_from_signed!(i8, u8, i16, u16, i32, u32, i64, isize);

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for WoqlInput {
            fn from(u: $t) -> Self {
                WoqlInput::Unsigned(u as u64)
            }
        })*
    };
}
impl_from_unsigned!(u64, usize);

impl From<f32> for WoqlInput {
    fn from(f: f32) -> Self {
        WoqlInput::Float(f as f64)
    }
}

impl From<f64> for WoqlInput {
    fn from(f: f64) -> Self {
        WoqlInput::Float(f)
    }
}

impl From<Decimal> for WoqlInput {
    fn from(d: Decimal) -> Self {
        WoqlInput::Decimal(d)
    }
}

impl From<DateTime<Utc>> for WoqlInput {
    fn from(dt: DateTime<Utc>) -> Self {
        WoqlInput::DateTime(dt)
    }
}

impl From<NaiveDate> for WoqlInput {
    fn from(d: NaiveDate) -> Self {
        WoqlInput::Date(d)
    }
}

impl From<Literal> for WoqlInput {
    fn from(l: Literal) -> Self {
        WoqlInput::Typed(l)
    }
}

impl From<JsonValue> for WoqlInput {
    fn from(json: JsonValue) -> Self {
        WoqlInput::Json(json)
    }
}

impl<T> From<Vec<T>> for WoqlInput
where
    T: Into<WoqlInput>,
{
    fn from(vec: Vec<T>) -> Self {
        WoqlInput::List(vec.into_iter().map(Into::into).collect())
    }
}

/// The scalar payload of a [`Literal`].
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Decimal(Decimal),
    Boolean(bool),
}

impl From<&str> for LiteralValue {
    fn from(s: &str) -> Self {
        LiteralValue::String(s.to_string())
    }
}

impl From<String> for LiteralValue {
    fn from(s: String) -> Self {
        LiteralValue::String(s)
    }
}

impl From<i64> for LiteralValue {
    fn from(i: i64) -> Self {
        LiteralValue::Integer(i)
    }
}

impl From<i32> for LiteralValue {
    fn from(i: i32) -> Self {
        LiteralValue::Integer(i as i64)
    }
}

impl From<u64> for LiteralValue {
    fn from(u: u64) -> Self {
        LiteralValue::Unsigned(u)
    }
}

impl From<f64> for LiteralValue {
    fn from(f: f64) -> Self {
        LiteralValue::Float(f)
    }
}

impl From<bool> for LiteralValue {
    fn from(b: bool) -> Self {
        LiteralValue::Boolean(b)
    }
}

impl From<Decimal> for LiteralValue {
    fn from(d: Decimal) -> Self {
        LiteralValue::Decimal(d)
    }
}

/// A typed data point: a datatype IRI and its value.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    datatype: String,
    value: LiteralValue,
}

impl Literal {
    pub fn new(value: impl Into<LiteralValue>, datatype: impl Into<String>) -> Self {
        Literal {
            datatype: datatype.into(),
            value: value.into(),
        }
    }

    pub fn string(s: impl Into<String>) -> Self {
        Literal::new(LiteralValue::String(s.into()), XSD_STRING)
    }

    pub fn integer(i: i64) -> Self {
        Literal::new(i, XSD_INTEGER)
    }

    pub fn decimal(value: impl Into<LiteralValue>) -> Self {
        Literal::new(value, XSD_DECIMAL)
    }

    pub fn boolean(b: bool) -> Self {
        Literal::new(b, XSD_BOOLEAN)
    }

    pub fn datatype(&self) -> &str {
        &self.datatype
    }

    pub fn value(&self) -> &LiteralValue {
        &self.value
    }
}

impl ToWoqlJson for Literal {
    fn to_woql_json(&self, _ctx: &Context) -> WoqlResult<JsonValue> {
        let value = match &self.value {
            LiteralValue::String(s) => JsonValue::from(s.as_str()),
            LiteralValue::Integer(i) => JsonValue::from(*i),
            LiteralValue::Unsigned(u) => JsonValue::from(*u),
            LiteralValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .ok_or_else(|| {
                    WoqlError::Serialization(format!("{} literal {} is not finite", self.datatype, f))
                })?,
            LiteralValue::Decimal(d) => JsonValue::from(d.to_string()),
            LiteralValue::Boolean(b) => JsonValue::from(*b),
        };
        Ok(JsonLdObject::new(&self.datatype).raw("@value", value).build())
    }
}

/// A variable, node or data point.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Node(String),
    Variable(String),
    Data(Literal),
    List(Vec<Value>),
}

/// A node or a variable.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    Node(String),
    Variable(String),
}

/// A data point, a list of data points, or a variable.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    Data(Literal),
    Variable(String),
    List(Vec<DataValue>),
}

/// A numeric operand or a variable.
#[derive(Debug, Clone, PartialEq)]
pub enum ArithmeticValue {
    Data(Literal),
    Variable(String),
}

impl ToWoqlJson for Value {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        let object = JsonLdObject::new("Value");
        Ok(match self {
            Value::Node(node) => object.raw("node", ctx.expand_node(node)),
            Value::Variable(name) => object.raw("variable", name.as_str()),
            Value::Data(literal) => object.field("data", literal, ctx)?,
            Value::List(items) => object.field("list", items, ctx)?,
        }
        .build())
    }
}

impl ToWoqlJson for NodeValue {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        let object = JsonLdObject::new("NodeValue");
        Ok(match self {
            NodeValue::Node(node) => object.raw("node", ctx.expand_node(node)),
            NodeValue::Variable(name) => object.raw("variable", name.as_str()),
        }
        .build())
    }
}

impl ToWoqlJson for DataValue {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        let object = JsonLdObject::new("DataValue");
        Ok(match self {
            DataValue::Data(literal) => object.field("data", literal, ctx)?,
            DataValue::Variable(name) => object.raw("variable", name.as_str()),
            DataValue::List(items) => object.field("list", items, ctx)?,
        }
        .build())
    }
}

impl ToWoqlJson for ArithmeticValue {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        let object = JsonLdObject::new("ArithmeticValue");
        Ok(match self {
            ArithmeticValue::Data(literal) => object.field("data", literal, ctx)?,
            ArithmeticValue::Variable(name) => object.raw("variable", name.as_str()),
        }
        .build())
    }
}

// --- Encoders ---

/// Converts a raw input into the wire value for `position`.
pub fn encode_value(raw: WoqlInput, position: Position) -> WoqlResult<Value> {
    use Position::*;

    match raw {
        WoqlInput::Variable(var) => Ok(Value::Variable(var.into_name())),
        WoqlInput::Text(text) => encode_text(text, position),
        WoqlInput::Node(iri) => match position {
            Subject | Predicate | Object | Graph => Ok(Value::Node(iri)),
            Data | Index | Arithmetic => Err(WoqlError::type_kind(position, "node")),
        },
        WoqlInput::String(s) => match position {
            Object | Data => Ok(Value::Data(Literal::string(s))),
            _ => Err(WoqlError::type_kind(position, "string literal")),
        },
        WoqlInput::Integer(i) => encode_number(LiteralValue::Integer(i), XSD_INTEGER, position),
        WoqlInput::Unsigned(u) => encode_number(LiteralValue::Unsigned(u), XSD_INTEGER, position),
        WoqlInput::Float(f) => encode_number(LiteralValue::Float(f), XSD_DECIMAL, position),
        WoqlInput::Decimal(d) => encode_number(LiteralValue::Decimal(d), XSD_DECIMAL, position),
        WoqlInput::Boolean(b) => encode_data_only(Literal::boolean(b), "boolean", position),
        WoqlInput::DateTime(dt) => encode_data_only(
            Literal::new(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true), XSD_DATE_TIME),
            "date",
            position,
        ),
        WoqlInput::Date(date) => encode_data_only(
            Literal::new(date.format("%Y-%m-%d").to_string(), XSD_DATE),
            "date",
            position,
        ),
        WoqlInput::Typed(literal) => match position {
            Object | Data | Index | Arithmetic => Ok(Value::Data(literal)),
            Subject | Predicate | Graph => Err(WoqlError::type_kind(position, "typed literal")),
        },
        WoqlInput::List(items) => match position {
            Object | Data => items
                .into_iter()
                .map(|item| encode_value(item, position))
                .collect::<WoqlResult<Vec<_>>>()
                .map(Value::List),
            _ => Err(WoqlError::type_kind(position, "list")),
        },
        WoqlInput::Json(json) => encode_value(WoqlInput::from_json(json, position)?, position),
    }
}

fn encode_text(text: String, position: Position) -> WoqlResult<Value> {
    if let Some(name) = variable_name(&text) {
        return Ok(Value::Variable(name.to_string()));
    }
    match position {
        Position::Subject | Position::Predicate | Position::Graph => Ok(Value::Node(text)),
        Position::Object if looks_like_node(&text) => Ok(Value::Node(text)),
        Position::Object | Position::Data => Ok(Value::Data(Literal::string(text))),
        Position::Arithmetic => Ok(Value::Data(Literal::new(text, XSD_DECIMAL))),
        Position::Index => Err(WoqlError::type_kind(position, "string")),
    }
}

fn encode_number(value: LiteralValue, datatype: &str, position: Position) -> WoqlResult<Value> {
    match position {
        Position::Object | Position::Data | Position::Index => {
            Ok(Value::Data(Literal::new(value, datatype)))
        }
        Position::Arithmetic => Ok(Value::Data(Literal::new(value, XSD_DECIMAL))),
        Position::Subject | Position::Predicate | Position::Graph => {
            Err(WoqlError::type_kind(position, "number"))
        }
    }
}

fn encode_data_only(literal: Literal, found: &'static str, position: Position) -> WoqlResult<Value> {
    match position {
        Position::Object | Position::Data => Ok(Value::Data(literal)),
        _ => Err(WoqlError::type_kind(position, found)),
    }
}

/// Object strings with a well-known prefix are read as node references.
fn looks_like_node(text: &str) -> bool {
    text.split_once(':')
        .map_or(false, |(prefix, _)| is_node_prefix(prefix))
}

/// Encodes a raw input for a slot that only takes nodes or variables.
pub fn encode_node(raw: impl Into<WoqlInput>, position: Position) -> WoqlResult<NodeValue> {
    match encode_value(raw.into(), position)? {
        Value::Node(node) => Ok(NodeValue::Node(node)),
        Value::Variable(name) => Ok(NodeValue::Variable(name)),
        Value::Data(_) => Err(WoqlError::type_kind(position, "literal")),
        Value::List(_) => Err(WoqlError::type_kind(position, "list")),
    }
}

/// Encodes a raw input for a slot that only takes data or variables.
pub fn encode_data(raw: impl Into<WoqlInput>, position: Position) -> WoqlResult<DataValue> {
    into_data_value(encode_value(raw.into(), position)?, position)
}

fn into_data_value(value: Value, position: Position) -> WoqlResult<DataValue> {
    match value {
        Value::Data(literal) => Ok(DataValue::Data(literal)),
        Value::Variable(name) => Ok(DataValue::Variable(name)),
        Value::List(items) => items
            .into_iter()
            .map(|item| into_data_value(item, position))
            .collect::<WoqlResult<Vec<_>>>()
            .map(DataValue::List),
        Value::Node(_) => Err(WoqlError::type_kind(position, "node")),
    }
}

/// Encodes an arithmetic operand. Numbers are typed `xsd:decimal`.
pub fn encode_arithmetic(raw: impl Into<WoqlInput>) -> WoqlResult<ArithmeticValue> {
    let position = Position::Arithmetic;
    match encode_value(raw.into(), position)? {
        Value::Data(literal) => Ok(ArithmeticValue::Data(literal)),
        Value::Variable(name) => Ok(ArithmeticValue::Variable(name)),
        Value::Node(_) => Err(WoqlError::type_kind(position, "node")),
        Value::List(_) => Err(WoqlError::type_kind(position, "list")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_v_prefix_is_a_variable_in_every_position() {
        for position in [
            Position::Subject,
            Position::Predicate,
            Position::Object,
            Position::Data,
            Position::Index,
            Position::Graph,
            Position::Arithmetic,
        ] {
            assert_eq!(
                encode_value("v:X".into(), position),
                Ok(Value::Variable("X".to_string()))
            );
        }
    }

    #[test]
    fn test_bare_v_prefix_is_not_a_variable() {
        assert_eq!(
            encode_value("v:".into(), Position::Subject),
            Ok(Value::Node("v:".to_string()))
        );
    }

    #[test]
    fn test_text_depends_on_position() {
        assert_eq!(
            encode_value("a".into(), Position::Subject),
            Ok(Value::Node("a".to_string()))
        );
        assert_eq!(
            encode_value("c".into(), Position::Object),
            Ok(Value::Data(Literal::string("c")))
        );
        assert_eq!(
            encode_value("rdf:type".into(), Position::Object),
            Ok(Value::Node("rdf:type".to_string()))
        );
        assert_eq!(
            encode_value("hello: world".into(), Position::Object),
            Ok(Value::Data(Literal::string("hello: world")))
        );
    }

    #[test]
    fn test_numbers_are_typed_by_host_type() {
        assert_eq!(
            encode_value(3.into(), Position::Data),
            Ok(Value::Data(Literal::integer(3)))
        );
        assert_eq!(
            encode_value(2.5.into(), Position::Object),
            Ok(Value::Data(Literal::decimal(2.5)))
        );
        assert_eq!(
            encode_value(true.into(), Position::Object),
            Ok(Value::Data(Literal::boolean(true)))
        );
    }

    #[test]
    fn test_arithmetic_operands_are_decimals() {
        assert_eq!(
            encode_arithmetic(2),
            Ok(ArithmeticValue::Data(Literal::new(2i64, XSD_DECIMAL)))
        );
    }

    #[test]
    fn test_negative_index_passes_through() {
        assert_eq!(
            encode_data(-2, Position::Index),
            Ok(DataValue::Data(Literal::integer(-2)))
        );
    }

    #[test]
    fn test_mapping_is_rejected_everywhere() {
        let err = encode_value(json!({"a": 1}).into(), Position::Object).unwrap_err();
        assert_eq!(
            err,
            WoqlError::TypeKind {
                position: Position::Object,
                found: "mapping"
            }
        );
        assert!(encode_value(JsonValue::Null.into(), Position::Data).is_err());
    }

    #[test]
    fn test_literals_cannot_be_nodes() {
        assert!(matches!(
            encode_node(5, Position::Subject),
            Err(WoqlError::TypeKind { found: "number", .. })
        ));
        assert!(matches!(
            encode_node(WoqlInput::String("x".into()), Position::Predicate),
            Err(WoqlError::TypeKind { found: "string literal", .. })
        ));
        assert!(matches!(
            encode_data(WoqlInput::Node("doc:x".into()), Position::Data),
            Err(WoqlError::TypeKind { found: "node", .. })
        ));
    }

    #[test]
    fn test_empty_list_is_valid() {
        assert_eq!(
            encode_data(Vec::<WoqlInput>::new(), Position::Data),
            Ok(DataValue::List(vec![]))
        );
        assert!(encode_value(vec!["a"].into(), Position::Subject).is_err());
    }

    #[test]
    fn test_json_arrays_become_lists() {
        assert_eq!(
            encode_data(json!(["a", 1]), Position::Data),
            Ok(DataValue::List(vec![
                DataValue::Data(Literal::string("a")),
                DataValue::Data(Literal::integer(1)),
            ]))
        );
    }

    #[test]
    fn test_non_finite_float_fails_to_serialize() {
        let literal = Literal::decimal(f64::NAN);
        assert!(matches!(
            literal.to_woql_json(&Context::default()),
            Err(WoqlError::Serialization(_))
        ));
    }

    #[test]
    fn test_var_strips_prefix() {
        assert_eq!(Var::new("v:Name"), Var::new("Name"));
        assert_eq!(Var::new("Name").full_name(), "v:Name");
    }
}
