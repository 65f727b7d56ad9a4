pub mod builder;
mod expression;
mod paging;
pub mod value;

#[macro_use]
pub mod prelude {
    pub use crate::builder::WoqlQuery;

    // Expression items
    pub use crate::expression::ArithmeticExpression;
    pub use crate::expression::FinalizeWoqlExpr;
    pub use crate::expression::{div, divide, exp, floor, minus, plus, times};

    // Value items
    pub use crate::value::{asc, desc, list, literal, node, string_literal, Literal, Var, WoqlInput};

    pub use crate::vars;

    pub use woql_ast::prelude::{Context, ListStyle, Order, OrderTemplate, Query, WoqlError, WoqlResult};
}

#[cfg(test)]
mod tests;
