//! Runs WOQL queries built with `woql-builder` against a TerminusDB server.
//!
//! The client binds a [`WoqlQuery`](woql_builder::prelude::WoqlQuery) to a
//! [`Dispatch`] implementation, a [`ConnectionConfig`] and the capabilities
//! the server reported on `connect`.

pub mod action;
pub mod capabilities;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;

pub use action::{ActionKind, Method};
pub use capabilities::{CapabilityStore, ScopeRecord, ServerRecord};
pub use client::{ExecuteExt, WoqlClient};
pub use config::ConnectionConfig;
pub use dispatch::{Dispatch, HttpDispatcher};
pub use error::{ClientError, ClientResult};

pub mod prelude {
    pub use super::{
        ActionKind, CapabilityStore, ClientError, ClientResult, ConnectionConfig, Dispatch,
        ExecuteExt, HttpDispatcher, WoqlClient,
    };
    pub use woql_builder::prelude::*;
}
