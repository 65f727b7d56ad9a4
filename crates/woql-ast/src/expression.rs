use serde_json::Value as JsonValue;

use crate::context::Context;
use crate::error::WoqlResult;
use crate::serialize::{JsonLdObject, ToWoqlJson};
use crate::value::ArithmeticValue;

/// An arithmetic expression tree evaluated by [`Eval`].
#[derive(Debug, Clone, PartialEq)]
pub enum ArithmeticExpression {
    Value(ArithmeticValue),
    Plus {
        left: Box<ArithmeticExpression>,
        right: Box<ArithmeticExpression>,
    },
    Minus {
        left: Box<ArithmeticExpression>,
        right: Box<ArithmeticExpression>,
    },
    Times {
        left: Box<ArithmeticExpression>,
        right: Box<ArithmeticExpression>,
    },
    /// Floating point division.
    Divide {
        left: Box<ArithmeticExpression>,
        right: Box<ArithmeticExpression>,
    },
    /// Integer division.
    Div {
        left: Box<ArithmeticExpression>,
        right: Box<ArithmeticExpression>,
    },
    Exp {
        left: Box<ArithmeticExpression>,
        right: Box<ArithmeticExpression>,
    },
    Floor {
        argument: Box<ArithmeticExpression>,
    },
}

impl ArithmeticExpression {
    pub fn kind(&self) -> &'static str {
        match self {
            ArithmeticExpression::Value(_) => "ArithmeticValue",
            ArithmeticExpression::Plus { .. } => "Plus",
            ArithmeticExpression::Minus { .. } => "Minus",
            ArithmeticExpression::Times { .. } => "Times",
            ArithmeticExpression::Divide { .. } => "Divide",
            ArithmeticExpression::Div { .. } => "Div",
            ArithmeticExpression::Exp { .. } => "Exp",
            ArithmeticExpression::Floor { .. } => "Floor",
        }
    }
}

impl ToWoqlJson for ArithmeticExpression {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        match self {
            ArithmeticExpression::Value(value) => value.to_woql_json(ctx),
            ArithmeticExpression::Plus { left, right }
            | ArithmeticExpression::Minus { left, right }
            | ArithmeticExpression::Times { left, right }
            | ArithmeticExpression::Divide { left, right }
            | ArithmeticExpression::Div { left, right }
            | ArithmeticExpression::Exp { left, right } => Ok(JsonLdObject::new(self.kind())
                .field("left", left, ctx)?
                .field("right", right, ctx)?
                .build()),
            ArithmeticExpression::Floor { argument } => Ok(JsonLdObject::new("Floor")
                .field("argument", argument, ctx)?
                .build()),
        }
    }
}

/// Evaluate an arithmetic expression to obtain a result.
#[derive(Debug, Clone, PartialEq)]
pub struct Eval {
    /// The expression to be evaluated.
    pub expression: ArithmeticExpression,
    /// The numeric result.
    pub result: ArithmeticValue,
}

impl ToWoqlJson for Eval {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        Ok(JsonLdObject::new("Eval")
            .field("expression", &self.expression, ctx)?
            .field("result", &self.result, ctx)?
            .build())
    }
}
