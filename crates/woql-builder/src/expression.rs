//! Represents WOQL arithmetic expressions for use with the builder.
use decimal_rs::Decimal;
use woql_ast::expression::ArithmeticExpression as AstArithmeticExpression;
use woql_ast::prelude::{encode_arithmetic, Var, WoqlInput, WoqlResult};

/// Represents a WOQL arithmetic expression tree for the builder.
/// Operands stay raw until [`FinalizeWoqlExpr::finalize_expr`] encodes them.
#[derive(Debug, Clone, PartialEq)]
pub enum ArithmeticExpression {
    Operand(WoqlInput),
    Plus(Box<ArithmeticExpression>, Box<ArithmeticExpression>),
    Minus(Box<ArithmeticExpression>, Box<ArithmeticExpression>),
    Times(Box<ArithmeticExpression>, Box<ArithmeticExpression>),
    Divide(Box<ArithmeticExpression>, Box<ArithmeticExpression>),
    Div(Box<ArithmeticExpression>, Box<ArithmeticExpression>),
    Exp(Box<ArithmeticExpression>, Box<ArithmeticExpression>),
    Floor(Box<ArithmeticExpression>),
}

macro_rules! impl_from_operand {
    ($($t:ty),*) => {
        $(impl From<$t> for ArithmeticExpression {
            fn from(value: $t) -> Self {
                ArithmeticExpression::Operand(WoqlInput::from(value))
            }
        })*
    };
}
impl_from_operand!(Var, &Var, &str, String, i32, i64, u32, u64, f32, f64, Decimal);

impl From<WoqlInput> for ArithmeticExpression {
    fn from(value: WoqlInput) -> Self {
        ArithmeticExpression::Operand(value)
    }
}

// --- Helper Functions for Building Expressions --- //

/// Creates a '+' expression.
pub fn plus<L, R>(left: L, right: R) -> ArithmeticExpression
where
    L: Into<ArithmeticExpression>,
    R: Into<ArithmeticExpression>,
{
    ArithmeticExpression::Plus(Box::new(left.into()), Box::new(right.into()))
}

/// Creates a '-' expression.
pub fn minus<L, R>(left: L, right: R) -> ArithmeticExpression
where
    L: Into<ArithmeticExpression>,
    R: Into<ArithmeticExpression>,
{
    ArithmeticExpression::Minus(Box::new(left.into()), Box::new(right.into()))
}

/// Creates a '*' expression.
pub fn times<L, R>(left: L, right: R) -> ArithmeticExpression
where
    L: Into<ArithmeticExpression>,
    R: Into<ArithmeticExpression>,
{
    ArithmeticExpression::Times(Box::new(left.into()), Box::new(right.into()))
}

/// Creates a floating point '/' expression.
pub fn divide<L, R>(left: L, right: R) -> ArithmeticExpression
where
    L: Into<ArithmeticExpression>,
    R: Into<ArithmeticExpression>,
{
    ArithmeticExpression::Divide(Box::new(left.into()), Box::new(right.into()))
}

/// Creates an integer division expression.
pub fn div<L, R>(left: L, right: R) -> ArithmeticExpression
where
    L: Into<ArithmeticExpression>,
    R: Into<ArithmeticExpression>,
{
    ArithmeticExpression::Div(Box::new(left.into()), Box::new(right.into()))
}

/// Creates an exponentiation expression.
pub fn exp<L, R>(base: L, exponent: R) -> ArithmeticExpression
where
    L: Into<ArithmeticExpression>,
    R: Into<ArithmeticExpression>,
{
    ArithmeticExpression::Exp(Box::new(base.into()), Box::new(exponent.into()))
}

/// Creates a floor expression.
pub fn floor<A>(argument: A) -> ArithmeticExpression
where
    A: Into<ArithmeticExpression>,
{
    ArithmeticExpression::Floor(Box::new(argument.into()))
}

/// Conversion of a builder expression into the encoded query expression.
pub trait FinalizeWoqlExpr {
    fn finalize_expr(self) -> WoqlResult<AstArithmeticExpression>;
}

impl FinalizeWoqlExpr for ArithmeticExpression {
    fn finalize_expr(self) -> WoqlResult<AstArithmeticExpression> {
        fn pair(
            left: Box<ArithmeticExpression>,
            right: Box<ArithmeticExpression>,
        ) -> WoqlResult<(Box<AstArithmeticExpression>, Box<AstArithmeticExpression>)> {
            Ok((
                Box::new(left.finalize_expr()?),
                Box::new(right.finalize_expr()?),
            ))
        }

        Ok(match self {
            ArithmeticExpression::Operand(raw) => {
                AstArithmeticExpression::Value(encode_arithmetic(raw)?)
            }
            ArithmeticExpression::Plus(l, r) => {
                let (left, right) = pair(l, r)?;
                AstArithmeticExpression::Plus { left, right }
            }
            ArithmeticExpression::Minus(l, r) => {
                let (left, right) = pair(l, r)?;
                AstArithmeticExpression::Minus { left, right }
            }
            ArithmeticExpression::Times(l, r) => {
                let (left, right) = pair(l, r)?;
                AstArithmeticExpression::Times { left, right }
            }
            ArithmeticExpression::Divide(l, r) => {
                let (left, right) = pair(l, r)?;
                AstArithmeticExpression::Divide { left, right }
            }
            ArithmeticExpression::Div(l, r) => {
                let (left, right) = pair(l, r)?;
                AstArithmeticExpression::Div { left, right }
            }
            ArithmeticExpression::Exp(l, r) => {
                let (left, right) = pair(l, r)?;
                AstArithmeticExpression::Exp { left, right }
            }
            ArithmeticExpression::Floor(argument) => AstArithmeticExpression::Floor {
                argument: Box::new(argument.finalize_expr()?),
            },
        })
    }
}

impl FinalizeWoqlExpr for AstArithmeticExpression {
    fn finalize_expr(self) -> WoqlResult<AstArithmeticExpression> {
        Ok(self)
    }
}
