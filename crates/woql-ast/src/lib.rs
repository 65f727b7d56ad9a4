//! WOQL query tree, value encoders and the JSON-LD serializer.
//!
//! A [`query::Query`] holds only encoded wire values; raw inputs go through
//! [`value::encode_value`] and its narrowing helpers first. Serialization is
//! driven by a [`context::Context`].

pub mod collection;
pub mod compare;
pub mod context;
pub mod control;
pub mod document;
pub mod error;
pub mod expression;
pub mod misc;
pub mod order;
pub mod query;
pub mod serialize;
pub mod string;
pub mod triple;
pub mod value;

pub mod prelude {
    pub use super::collection::{Length, Member, Slice, Sum};
    pub use super::compare::{Equals, Greater, IsA, Less, Subsumption, TypeOf, Typecast};
    pub use super::context::{Context, ListStyle, STANDARD_PREFIXES};
    pub use super::control::{
        Distinct, From as WoqlFrom, If, Immediately, Into as WoqlInto, Once, Select, Using,
        WoqlOptional,
    };
    pub use super::document::{DeleteDocument, InsertDocument, ReadDocument, UpdateDocument};
    pub use super::error::{WoqlError, WoqlResult};
    pub use super::expression::{ArithmeticExpression, Eval};
    pub use super::misc::{Count, Limit, Start};
    pub use super::order::{GroupBy, Order, OrderBy, OrderTemplate};
    pub use super::query::{And, Not, Or, Query, Step, True};
    pub use super::serialize::{serialize, to_json_string, ToWoqlJson};
    pub use super::string::{Concatenate, Join, Lower, Regexp, Split, Trim, Upper};
    pub use super::triple::Triple;
    pub use super::value::{
        encode_arithmetic, encode_data, encode_node, encode_value, ArithmeticValue, DataValue,
        Literal, LiteralValue, NodeValue, Position, Value, Var, WoqlInput,
    };
}
