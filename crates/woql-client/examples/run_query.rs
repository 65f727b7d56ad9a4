//! Lists people in a database.
//!
//! ```sh
//! TERMINUSDB_DB=people TERMINUSDB_PASS=root RUST_LOG=woql_client=debug \
//!     cargo run -p woql-client --example run_query
//! ```
use tracing_subscriber::EnvFilter;
use woql_client::prelude::*;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ConnectionConfig::from_env()?;
    let mut client = WoqlClient::http(config)?;
    client.connect()?;

    let query = WoqlQuery::new()
        .triple("v:Person", "rdf:type", "scm:Person")?
        .triple("v:Person", "scm:name", "v:Name")?
        .select(["v:Name"])?
        .limit(20);

    let response = query.execute(&client)?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
