use thiserror::Error;

use crate::value::Position;

/// Errors raised while building or serializing a WOQL query.
///
/// Every variant is raised synchronously by the call that received the
/// offending input; nothing in this crate retries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WoqlError {
    /// A raw value cannot occupy the requested operand slot.
    #[error("a {found} cannot be used in {position} position")]
    TypeKind {
        position: Position,
        found: &'static str,
    },

    /// A composition operator was given nothing to compose.
    #[error("{operator} requires at least one operand")]
    EmptyComposition { operator: &'static str },

    /// A pagination helper needs an operator the query does not contain.
    #[error("{helper} requires a {required} operator in the query")]
    MissingOperator {
        helper: &'static str,
        required: &'static str,
    },

    /// The tree holds a value that has no JSON-LD representation.
    #[error("cannot serialize query: {0}")]
    Serialization(String),
}

impl WoqlError {
    pub(crate) fn type_kind(position: Position, found: &'static str) -> Self {
        WoqlError::TypeKind { position, found }
    }
}

pub type WoqlResult<T> = Result<T, WoqlError>;
