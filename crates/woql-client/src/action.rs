use std::fmt;

use serde::{Deserialize, Serialize};

/// A server operation, used to pick the HTTP method and to check capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Connect,
    GetSchema,
    ClassFrame,
    Select,
    GetDocument,
    DeleteDatabase,
    DeleteDocument,
    CreateDatabase,
    UpdateSchema,
    CreateDocument,
    Update,
}

/// HTTP verb an action is sent with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl ActionKind {
    pub fn method(&self) -> Method {
        match self {
            ActionKind::Connect
            | ActionKind::GetSchema
            | ActionKind::ClassFrame
            | ActionKind::Select
            | ActionKind::GetDocument => Method::Get,
            ActionKind::DeleteDatabase | ActionKind::DeleteDocument => Method::Delete,
            ActionKind::CreateDatabase
            | ActionKind::UpdateSchema
            | ActionKind::CreateDocument
            | ActionKind::Update => Method::Post,
        }
    }

    /// The server's name for this action, as listed in `terminus:action`
    /// without the namespace.
    pub fn capability_name(&self) -> &'static str {
        match self {
            ActionKind::Connect => "connect",
            ActionKind::GetSchema => "get_schema",
            ActionKind::ClassFrame => "class_frame",
            ActionKind::Select => "woql_select",
            ActionKind::GetDocument => "get_document",
            ActionKind::DeleteDatabase => "delete_database",
            ActionKind::DeleteDocument => "delete_document",
            ActionKind::CreateDatabase => "create_database",
            ActionKind::UpdateSchema => "update_schema",
            ActionKind::CreateDocument => "create_document",
            ActionKind::Update => "woql_update",
        }
    }

    /// True for actions whose payload is a WOQL query document.
    pub fn is_query(&self) -> bool {
        matches!(self, ActionKind::Select | ActionKind::Update)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.capability_name())
    }
}
