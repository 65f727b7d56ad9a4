use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Namespaces every context knows about.
pub const STANDARD_PREFIXES: &[(&str, &str)] = &[
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
    ("xdd", "http://terminusdb.com/schema/xdd#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("terminus", "http://terminusdb.com/schema/terminus#"),
    ("vio", "http://terminusdb.com/schema/vio#"),
    ("repo", "http://terminusdb.com/schema/repository#"),
    ("layer", "http://terminusdb.com/schema/layer#"),
    ("woql", "http://terminusdb.com/schema/woql#"),
    ("ref", "http://terminusdb.com/schema/ref#"),
    ("v", "http://terminusdb.com/woql/variable/"),
];

/// Prefixes that mark an object string as a node reference rather than text.
const NODE_PREFIXES: &[&str] = &["v", "scm", "doc", "@schema", "terminusdb", "http", "https"];

pub(crate) fn is_node_prefix(prefix: &str) -> bool {
    NODE_PREFIXES.contains(&prefix) || STANDARD_PREFIXES.iter().any(|(p, _)| *p == prefix)
}

/// How the elements of `And`/`Or` are written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    /// A bare JSON array.
    #[default]
    Plain,
    /// Each element wrapped in a `QueryListElement` carrying its index.
    Indexed,
}

/// The database context a query is serialized against.
///
/// Holds the prefix map used to expand node names and the collection a
/// `Using` clause resolves its `@context` from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    server: Option<String>,
    db: Option<String>,
    prefixes: BTreeMap<String, String>,
    collection: Option<String>,
    api_root: String,
    list_style: ListStyle,
    expand_prefixes: bool,
}

impl Default for Context {
    fn default() -> Self {
        Context {
            server: None,
            db: None,
            prefixes: STANDARD_PREFIXES
                .iter()
                .map(|(p, ns)| (p.to_string(), ns.to_string()))
                .collect(),
            collection: None,
            api_root: "/api".to_string(),
            list_style: ListStyle::default(),
            expand_prefixes: false,
        }
    }
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// The default context for a database: the standard prefixes plus
    /// `scm` and `doc` rooted at the database IRI.
    pub fn for_database(server: impl Into<String>, db: impl Into<String>) -> Self {
        let server = server.into();
        let db = db.into();
        let base = format!("{}/{}", server.trim_end_matches('/'), db);
        Context::default()
            .with_prefix("scm", format!("{}/schema#", base))
            .with_prefix("doc", format!("{}/data/", base))
            .with_server(server)
            .with_db(db)
    }

    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    pub fn with_db(mut self, db: impl Into<String>) -> Self {
        self.db = Some(db.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>, namespace: impl Into<String>) -> Self {
        self.prefixes.insert(prefix.into(), namespace.into());
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    pub fn with_api_root(mut self, api_root: impl Into<String>) -> Self {
        self.api_root = api_root.into();
        self
    }

    pub fn with_list_style(mut self, style: ListStyle) -> Self {
        self.list_style = style;
        self
    }

    pub fn with_prefix_expansion(mut self, expand: bool) -> Self {
        self.expand_prefixes = expand;
        self
    }

    pub fn server(&self) -> Option<&str> {
        self.server.as_deref()
    }

    pub fn db(&self) -> Option<&str> {
        self.db.as_deref()
    }

    pub fn prefixes(&self) -> &BTreeMap<String, String> {
        &self.prefixes
    }

    pub fn collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    pub fn list_style(&self) -> ListStyle {
        self.list_style
    }

    /// The `@context` path a `Using` clause on `collection` points at.
    pub fn prefixes_path(&self, collection: &str) -> String {
        format!("{}/prefixes/{}", self.api_root.trim_end_matches('/'), collection)
    }

    /// Expands a node name against the prefix map when expansion is enabled.
    ///
    /// `pfx:local` becomes `<namespace>local` for a known prefix, and a bare
    /// name is placed in the `doc` namespace. Full IRIs and unknown prefixes
    /// are left alone.
    pub fn expand_node(&self, node: &str) -> String {
        if !self.expand_prefixes {
            return node.to_string();
        }
        match node.split_once(':') {
            Some((prefix, local)) => match self.prefixes.get(prefix) {
                Some(namespace) if !local.starts_with("//") => format!("{}{}", namespace, local),
                _ => node.to_string(),
            },
            None => match self.prefixes.get("doc") {
                Some(namespace) => format!("{}{}", namespace, node),
                None => node.to_string(),
            },
        }
    }
}
