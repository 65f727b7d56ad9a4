pub use woql_ast::value::{Literal, LiteralValue, Var, WoqlInput};
use woql_ast::order::{Order, OrderTemplate};

/// Creates a `WoqlInput` that is always read as a node IRI.
pub fn node(iri: impl Into<String>) -> WoqlInput {
    WoqlInput::Node(iri.into())
}

/// Creates a `WoqlInput` that is always read as an `xsd:string` literal.
pub fn string_literal(s: impl Into<String>) -> WoqlInput {
    WoqlInput::String(s.into())
}

/// Creates a literal with an explicit datatype, e.g. `literal("en", "xsd:language")`.
pub fn literal(value: impl Into<LiteralValue>, datatype: impl Into<String>) -> WoqlInput {
    WoqlInput::Typed(Literal::new(value, datatype))
}

/// Creates a list input from anything convertible to `WoqlInput`.
pub fn list<T: Into<WoqlInput>>(items: impl IntoIterator<Item = T>) -> WoqlInput {
    WoqlInput::List(items.into_iter().map(Into::into).collect())
}

/// Ascending ordering on a variable.
pub fn asc(variable: impl Into<Var>) -> OrderTemplate {
    OrderTemplate {
        order: Order::Asc,
        variable: variable.into().into_name(),
    }
}

/// Descending ordering on a variable.
pub fn desc(variable: impl Into<Var>) -> OrderTemplate {
    OrderTemplate {
        order: Order::Desc,
        variable: variable.into().into_name(),
    }
}

/// Declares one or more variables.
///
/// ```
/// use woql_builder::prelude::*;
///
/// let (person, name) = vars!("Person", "Name");
/// assert_eq!(person.name(), "Person");
/// assert_eq!(name.full_name(), "v:Name");
/// ```
#[macro_export]
macro_rules! vars {
    ($name:expr) => {
        $crate::value::Var::new($name)
    };
    ($($names:expr),+) => {
        (
            $($crate::value::Var::new($names)),+
        )
    };
}
