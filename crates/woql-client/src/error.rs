use thiserror::Error;
use woql_ast::error::WoqlError;

use crate::action::ActionKind;

/// Errors raised by [`crate::WoqlClient`] and its collaborators.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Woql(#[from] WoqlError),

    /// The transport failed before a response was read.
    #[error("dispatch failed: {0:#}")]
    Dispatch(anyhow::Error),

    /// The server answered with a non-200 status.
    #[error("API error {status} from {url}: {message}")]
    Api {
        status: u16,
        url: String,
        message: String,
    },

    #[error("invalid {what} '{value}'")]
    InvalidUri { what: &'static str, value: String },

    #[error("access denied: {action} is not permitted on {scope}")]
    AccessDenied { action: ActionKind, scope: String },

    #[error("not connected to {server}; call connect() first")]
    NotConnected { server: String },
}

impl ClientError {
    pub(crate) fn invalid(what: &'static str, value: impl Into<String>) -> Self {
        ClientError::InvalidUri {
            what,
            value: value.into(),
        }
    }

    /// Recovers a `ClientError` a dispatcher raised inside an `anyhow::Error`.
    pub(crate) fn from_dispatch(err: anyhow::Error) -> Self {
        match err.downcast::<ClientError>() {
            Ok(client_error) => client_error,
            Err(other) => ClientError::Dispatch(other),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
