//! Server, database and document identifiers for a client connection.
use std::env;

use derive_getters::Getters;
use tracing::debug;
use url::Url;

use crate::error::{ClientError, ClientResult};

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:6363/";
pub const DEFAULT_USER: &str = "admin";

/// Where a client connects to and as whom.
///
/// The server URL always ends in `/`, so endpoint URLs are built by
/// appending path segments.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct ConnectionConfig {
    server: Url,
    db: Option<String>,
    document: Option<String>,
    user: String,
    #[getter(skip)]
    key: Option<String>,
    check_capabilities: bool,
}

impl ConnectionConfig {
    pub fn new(server: &str) -> ClientResult<Self> {
        Ok(ConnectionConfig {
            server: parse_server(server)?,
            db: None,
            document: None,
            user: DEFAULT_USER.to_string(),
            key: None,
            check_capabilities: true,
        })
    }

    /// Reads `TERMINUSDB_SERVER`, `TERMINUSDB_DB`, `TERMINUSDB_USER` and
    /// `TERMINUSDB_PASS`.
    pub fn from_env() -> ClientResult<Self> {
        let server = env::var("TERMINUSDB_SERVER").unwrap_or_else(|_| DEFAULT_SERVER.to_string());
        let mut config = Self::new(&server)?;
        if let Ok(db) = env::var("TERMINUSDB_DB") {
            config = config.with_db(&db)?;
        }
        if let Ok(user) = env::var("TERMINUSDB_USER") {
            config.user = user;
        }
        config.key = env::var("TERMINUSDB_PASS").ok();
        debug!(server = %config.server, db = ?config.db, user = %config.user, "loaded connection config from environment");
        Ok(config)
    }

    pub fn with_db(mut self, db: &str) -> ClientResult<Self> {
        if !valid_id(db) {
            return Err(ClientError::invalid("database id", db));
        }
        self.db = Some(db.to_string());
        self.document = None;
        Ok(self)
    }

    pub fn with_document(mut self, document: &str) -> ClientResult<Self> {
        if !valid_id(document) {
            return Err(ClientError::invalid("document id", document));
        }
        self.document = Some(document.to_string());
        Ok(self)
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_check_capabilities(mut self, check: bool) -> Self {
        self.check_capabilities = check;
        self
    }

    /// Forgets the database, e.g. after it was deleted.
    pub fn clear_db(&mut self) {
        self.db = None;
        self.document = None;
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn server_url(&self) -> &str {
        self.server.as_str()
    }

    fn require_db(&self) -> ClientResult<&str> {
        self.db
            .as_deref()
            .ok_or_else(|| ClientError::invalid("database id", "undefined"))
    }

    pub fn db_url(&self) -> ClientResult<String> {
        Ok(format!("{}{}", self.server, self.require_db()?))
    }

    pub fn schema_url(&self) -> ClientResult<String> {
        Ok(format!("{}/schema", self.db_url()?))
    }

    pub fn query_url(&self) -> ClientResult<String> {
        Ok(format!("{}/woql", self.db_url()?))
    }

    pub fn frame_url(&self) -> ClientResult<String> {
        Ok(format!("{}/frame", self.db_url()?))
    }

    pub fn doc_url(&self) -> ClientResult<String> {
        Ok(format!(
            "{}/document/{}",
            self.db_url()?,
            self.document.as_deref().unwrap_or_default()
        ))
    }
}

fn parse_server(server: &str) -> ClientResult<Url> {
    let mut url = Url::parse(server).map_err(|_| ClientError::invalid("server URL", server))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ClientError::invalid("server URL", server));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Database and document ids are path segments: non-empty, with no
/// whitespace, `/` or `:`.
fn valid_id(id: &str) -> bool {
    !id.is_empty() && !id.chars().any(|c| c.is_whitespace() || c == '/' || c == ':')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_server_gets_trailing_slash() {
        let config = ConnectionConfig::new("http://localhost:6363/api").unwrap();
        assert_eq!(config.server_url(), "http://localhost:6363/api/");

        let config = ConnectionConfig::new("https://example.com").unwrap();
        assert_eq!(config.server_url(), "https://example.com/");
    }

    #[test]
    fn test_invalid_server() {
        assert!(matches!(
            ConnectionConfig::new("not a url"),
            Err(ClientError::InvalidUri { what: "server URL", .. })
        ));
        assert!(ConnectionConfig::new("ftp://example.com").is_err());
    }

    #[test]
    fn test_endpoint_urls() {
        let config = ConnectionConfig::new(DEFAULT_SERVER)
            .unwrap()
            .with_db("people")
            .unwrap()
            .with_document("Person_1")
            .unwrap();
        assert_eq!(config.db_url().unwrap(), "http://127.0.0.1:6363/people");
        assert_eq!(config.schema_url().unwrap(), "http://127.0.0.1:6363/people/schema");
        assert_eq!(config.query_url().unwrap(), "http://127.0.0.1:6363/people/woql");
        assert_eq!(config.frame_url().unwrap(), "http://127.0.0.1:6363/people/frame");
        assert_eq!(
            config.doc_url().unwrap(),
            "http://127.0.0.1:6363/people/document/Person_1"
        );
    }

    #[test]
    fn test_urls_need_a_database() {
        let config = ConnectionConfig::new(DEFAULT_SERVER).unwrap();
        assert!(matches!(
            config.query_url(),
            Err(ClientError::InvalidUri { what: "database id", .. })
        ));
    }

    #[test]
    fn test_invalid_ids() {
        let config = ConnectionConfig::new(DEFAULT_SERVER).unwrap();
        assert!(config.clone().with_db("").is_err());
        assert!(config.clone().with_db("a/b").is_err());
        assert!(config.clone().with_db("doc:x").is_err());
        assert!(config.with_document("with space").is_err());
    }

    #[test]
    fn test_switching_db_clears_document() {
        let config = ConnectionConfig::new(DEFAULT_SERVER)
            .unwrap()
            .with_db("a")
            .unwrap()
            .with_document("d")
            .unwrap()
            .with_db("b")
            .unwrap();
        assert_eq!(config.document(), &None);
        assert_eq!(config.db(), &Some("b".to_string()));
    }
}
