use serde_json::{json, Value};
use tracing::{debug, instrument, trace};
use woql_ast::prelude::{serialize, Context, Query, Using};
use woql_builder::prelude::WoqlQuery;

use crate::action::ActionKind;
use crate::capabilities::CapabilityStore;
use crate::config::ConnectionConfig;
use crate::dispatch::{Dispatch, HttpDispatcher};
use crate::error::{ClientError, ClientResult};

/// Runs queries and database operations against one server.
///
/// The client owns its [`CapabilityStore`]; `connect` fills it and every
/// later call is checked against it unless the config turns checking off.
#[derive(Debug)]
pub struct WoqlClient<D = HttpDispatcher> {
    config: ConnectionConfig,
    dispatcher: D,
    capabilities: CapabilityStore,
    context: Context,
}

impl WoqlClient<HttpDispatcher> {
    /// A client that talks HTTP to the configured server.
    pub fn http(config: ConnectionConfig) -> ClientResult<Self> {
        let dispatcher = HttpDispatcher::new(&config).map_err(ClientError::Dispatch)?;
        Ok(Self::new(config, dispatcher))
    }
}

impl<D: Dispatch> WoqlClient<D> {
    pub fn new(config: ConnectionConfig, dispatcher: D) -> Self {
        let context = database_context(&config);
        WoqlClient {
            config,
            dispatcher,
            capabilities: CapabilityStore::new(),
            context,
        }
    }

    /// Starts from capabilities gathered elsewhere instead of calling `connect`.
    pub fn with_capabilities(mut self, capabilities: CapabilityStore) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Overrides the context queries are serialized with. Queries that
    /// carry their own context keep it.
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    /// Runs every query inside `Using(collection)`.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.context = self.context.with_collection(collection);
        self
    }

    /// Switches to another database. The serialization context follows and
    /// keeps its collection.
    pub fn set_db(&mut self, db: &str) -> ClientResult<()> {
        self.config = self.config.clone().with_db(db)?;
        self.reset_context();
        Ok(())
    }

    fn reset_context(&mut self) {
        let context = database_context(&self.config);
        self.context = match self.context.collection() {
            Some(collection) => context.with_collection(collection),
            None => context,
        };
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn capabilities(&self) -> &CapabilityStore {
        &self.capabilities
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn collection(&self) -> Option<&str> {
        self.context.collection()
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    fn send(&self, url: &str, action: ActionKind, payload: &Value) -> ClientResult<Value> {
        self.dispatcher
            .dispatch(url, action, payload)
            .map_err(ClientError::from_dispatch)
    }

    fn check(&self, action: ActionKind, db: Option<&str>) -> ClientResult<()> {
        if !*self.config.check_capabilities() {
            return Ok(());
        }
        self.capabilities
            .capabilities_permit(self.config.server_url(), action, db)
    }

    fn check_db(&self, action: ActionKind) -> ClientResult<()> {
        self.check(action, self.config.db().as_deref())
    }

    /// Fetches the user's capabilities from the server and stores them.
    #[instrument(
        name = "woql.client.connect",
        skip(self),
        fields(server = %self.config.server_url()),
        err
    )]
    pub fn connect(&mut self) -> ClientResult<Value> {
        let server = self.config.server_url().to_string();
        let response = self.send(&server, ActionKind::Connect, &json!({}))?;
        self.capabilities.set_capabilities(&server, &response);
        Ok(response)
    }

    /// Serializes `query` and sends it to the database's WOQL endpoint.
    ///
    /// Queries that write are sent as updates, everything else as selects.
    #[instrument(
        name = "woql.client.execute",
        skip(self, query),
        fields(db = ?self.config.db(), collection = ?self.collection()),
        err
    )]
    pub fn execute(&self, query: &WoqlQuery) -> ClientResult<Value> {
        let url = self.config.query_url()?;
        let context = query.get_context().unwrap_or(&self.context);
        let collection = context.collection().or_else(|| self.collection());
        let root = scoped(query.query().clone(), collection);
        let action = if root.contains_update() {
            ActionKind::Update
        } else {
            ActionKind::Select
        };
        self.check_db(action)?;

        let document = serialize(&root, context)?;
        debug!(%action, root = root.kind(), "executing query");
        trace!(%document, "query document");
        self.send(&url, action, &document)
    }

    /// Creates `db` on the server and makes it the current database.
    pub fn create_database(
        &mut self,
        db: &str,
        label: &str,
        comment: Option<&str>,
    ) -> ClientResult<Value> {
        self.check(ActionKind::CreateDatabase, None)?;
        self.set_db(db)?;
        let user = self.config.user();
        let payload = json!({
            "label": label,
            "comment": comment.unwrap_or_default(),
            "prefixes": {
                "scm": format!("terminus://{}/{}/schema#", user, db),
                "doc": format!("terminus://{}/{}/data/", user, db),
            },
        });
        self.send(&self.config.db_url()?, ActionKind::CreateDatabase, &payload)
    }

    /// Deletes `db` and forgets it locally.
    pub fn delete_database(&mut self, db: &str) -> ClientResult<Value> {
        self.set_db(db)?;
        self.check_db(ActionKind::DeleteDatabase)?;
        let response = self.send(&self.config.db_url()?, ActionKind::DeleteDatabase, &json!({}))?;

        let server = self.config.server_url().to_string();
        if self.capabilities.remove_db(&server, db) {
            debug!(db, "dropped capability record of deleted database");
        }
        self.config.clear_db();
        self.reset_context();
        Ok(response)
    }

    pub fn get_schema(&self) -> ClientResult<Value> {
        self.check_db(ActionKind::GetSchema)?;
        let payload = json!({"terminus:encoding": "terminus:turtle"});
        self.send(&self.config.schema_url()?, ActionKind::GetSchema, &payload)
    }

    /// Replaces the schema with a turtle document.
    pub fn update_schema(&self, turtle: &str) -> ClientResult<Value> {
        self.check_db(ActionKind::UpdateSchema)?;
        let payload = json!({
            "terminus:encoding": "terminus:turtle",
            "terminus:turtle": turtle,
        });
        self.send(&self.config.schema_url()?, ActionKind::UpdateSchema, &payload)
    }

    /// Reads the frame of a class, e.g. `scm:Person`.
    pub fn class_frame(&self, class: &str) -> ClientResult<Value> {
        self.check_db(ActionKind::ClassFrame)?;
        let payload = json!({"terminus:class": class});
        self.send(&self.config.frame_url()?, ActionKind::ClassFrame, &payload)
    }

    pub fn get_document(&mut self, id: &str) -> ClientResult<Value> {
        self.config = self.config.clone().with_document(id)?;
        self.check_db(ActionKind::GetDocument)?;
        let payload = json!({"terminus:encoding": "terminus:frame"});
        self.send(&self.config.doc_url()?, ActionKind::GetDocument, &payload)
    }

    /// Stores `document` under `id`, wrapped as a `terminus:APIUpdate`.
    pub fn create_document(&mut self, id: &str, document: &Value) -> ClientResult<Value> {
        self.config = self.config.clone().with_document(id)?;
        self.check_db(ActionKind::CreateDocument)?;
        let url = self.config.doc_url()?;
        let payload = api_update(document, &url);
        self.send(&url, ActionKind::CreateDocument, &payload)
    }

    pub fn delete_document(&mut self, id: &str) -> ClientResult<Value> {
        self.config = self.config.clone().with_document(id)?;
        self.check_db(ActionKind::DeleteDocument)?;
        self.send(&self.config.doc_url()?, ActionKind::DeleteDocument, &json!({}))
    }
}

/// Wraps `root` in `Using(collection)` unless it already names one.
fn scoped(root: Query, collection: Option<&str>) -> Query {
    match collection {
        Some(collection) if !matches!(root, Query::Using(_)) => Query::Using(Using {
            collection: collection.to_string(),
            query: Box::new(root),
        }),
        _ => root,
    }
}

fn database_context(config: &ConnectionConfig) -> Context {
    match config.db() {
        Some(db) => Context::for_database(config.server_url(), db.as_str()),
        None => Context::default().with_server(config.server_url()),
    }
}

/// Moves a document's `@context` to the top level and nests the rest under
/// `terminus:document`.
fn api_update(document: &Value, url: &str) -> Value {
    let mut body = document.clone();
    let mut context = body
        .as_object_mut()
        .and_then(|members| members.remove("@context"))
        .unwrap_or_else(|| json!({}));
    if let (Some(members), Some(id)) = (context.as_object_mut(), document.get("@id")) {
        members.insert("_".to_string(), id.clone());
    }
    json!({
        "@context": context,
        "terminus:document": body,
        "@type": "terminus:APIUpdate",
        "@id": url,
    })
}

/// Runs a built query through a client.
pub trait ExecuteExt {
    fn execute<D: Dispatch>(&self, client: &WoqlClient<D>) -> ClientResult<Value>;
}

impl ExecuteExt for WoqlQuery {
    fn execute<D: Dispatch>(&self, client: &WoqlClient<D>) -> ClientResult<Value> {
        client.execute(self)
    }
}
