//! Client-side record of what the connected user may do.
//!
//! `connect` answers with the user's `terminus:authority` grants. Each grant
//! lists the actions it allows and the resources (`terminus:authority_scope`)
//! it applies to; the store keeps one record per scope so later calls can be
//! checked before they are sent.
use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::action::ActionKind;
use crate::error::{ClientError, ClientResult};

const AUTHORITY: &str = "terminus:authority";
const AUTHORITY_SCOPE: &str = "terminus:authority_scope";
const ACTION: &str = "terminus:action";
const RESOURCE_NAME: &str = "terminus:resource_name";
const SERVER_TYPE: &str = "terminus:Server";

/// One resource a grant applies to, with the actions granted on it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScopeRecord {
    pub document: Map<String, Value>,
    pub actions: Vec<String>,
}

impl ScopeRecord {
    fn is_server(&self) -> bool {
        self.document.get("@type").and_then(Value::as_str) == Some(SERVER_TYPE)
    }

    fn resource_name(&self) -> Option<&str> {
        match self.document.get(RESOURCE_NAME)? {
            Value::String(name) => Some(name),
            Value::Object(literal) => literal.get("@value").and_then(Value::as_str),
            _ => None,
        }
    }

    fn permits(&self, action: ActionKind) -> bool {
        let name = format!("terminus:{}", action.capability_name());
        self.actions.iter().any(|granted| *granted == name)
    }
}

/// Everything `connect` reported for one server.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ServerRecord {
    /// Scopes by `@id`.
    pub scopes: BTreeMap<String, ScopeRecord>,
    /// Top-level properties of the connect response other than the grants.
    pub properties: Map<String, Value>,
}

impl ServerRecord {
    fn server_scope(&self) -> Option<&ScopeRecord> {
        self.scopes.values().find(|scope| scope.is_server())
    }

    fn db_scope_id(&self, db: &str) -> Option<&str> {
        if let Some((id, _)) = self.scopes.get_key_value(&format!("doc:{}", db)) {
            return Some(id.as_str());
        }
        self.scopes
            .iter()
            .find(|(_, scope)| scope.resource_name() == Some(db))
            .map(|(id, _)| id.as_str())
    }

    fn db_scope(&self, db: &str) -> Option<&ScopeRecord> {
        let id = self.db_scope_id(db)?;
        self.scopes.get(id)
    }
}

/// Capability records keyed by server URL.
#[derive(Debug, Clone, Default)]
pub struct CapabilityStore {
    servers: HashMap<String, ServerRecord>,
}

impl CapabilityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the record for `server` with the grants in a connect response.
    pub fn set_capabilities(&mut self, server: &str, response: &Value) {
        let mut record = ServerRecord::default();
        if let Value::Object(members) = response {
            for (key, value) in members {
                if key == AUTHORITY {
                    for grant in one_or_many(value) {
                        ingest_grant(&mut record, grant);
                    }
                } else {
                    record.properties.insert(key.clone(), value.clone());
                }
            }
        }
        debug!(server, scopes = record.scopes.len(), "stored server capabilities");
        self.servers.insert(server.to_string(), record);
    }

    pub fn server(&self, server: &str) -> Option<&ServerRecord> {
        self.servers.get(server)
    }

    pub fn is_connected(&self, server: &str) -> bool {
        self.servers.contains_key(server)
    }

    /// Checks that `action` is granted on `db`. Creating a database is
    /// checked against the server's own scope.
    pub fn capabilities_permit(
        &self,
        server: &str,
        action: ActionKind,
        db: Option<&str>,
    ) -> ClientResult<()> {
        let record = self
            .servers
            .get(server)
            .ok_or_else(|| ClientError::NotConnected {
                server: server.to_string(),
            })?;

        let (scope, label) = match (action, db) {
            (ActionKind::CreateDatabase, _) => (record.server_scope(), server.to_string()),
            (_, Some(db)) => (record.db_scope(db), db.to_string()),
            (_, None) => (None, "no database".to_string()),
        };

        if scope.map_or(false, |scope| scope.permits(action)) {
            trace!(server, %action, scope = %label, "capability granted");
            Ok(())
        } else {
            Err(ClientError::AccessDenied {
                action,
                scope: label,
            })
        }
    }

    /// Drops the record of a database, e.g. after it was deleted.
    pub fn remove_db(&mut self, server: &str, db: &str) -> bool {
        let Some(record) = self.servers.get_mut(server) else {
            return false;
        };
        match record.db_scope_id(db).map(str::to_string) {
            Some(id) => record.scopes.remove(&id).is_some(),
            None => false,
        }
    }
}

fn one_or_many(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

fn ingest_grant(record: &mut ServerRecord, grant: &Value) {
    let actions: Vec<String> = match grant.get(ACTION) {
        Some(Value::Array(actions)) => actions
            .iter()
            .filter_map(|action| action.get("@id").and_then(Value::as_str))
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };

    let Some(scopes) = grant.get(AUTHORITY_SCOPE) else {
        return;
    };
    for scope in one_or_many(scopes) {
        let Some(Value::String(id)) = scope.get("@id") else {
            continue;
        };
        let entry = record.scopes.entry(id.clone()).or_insert_with(|| ScopeRecord {
            document: scope.as_object().cloned().unwrap_or_default(),
            actions: Vec::new(),
        });
        entry.actions = actions.clone();
    }
}
