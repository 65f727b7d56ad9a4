//! Builds a paged query and prints its JSON-LD document.
use woql_builder::prelude::*;

fn main() -> Result<(), WoqlError> {
    let (person, name) = vars!("Person", "Name");

    let query = WoqlQuery::new()
        .limit(10)
        .start(0)
        .triple(person.clone(), "rdf:type", node("scm:Person"))?
        .triple(person, "scm:name", name.clone())?
        .order_by([asc(name)])?;

    // Third page of ten
    let query = query.set_page(3)?;
    println!("page {}", query.get_page()?);
    println!("{}", query.json()?);
    Ok(())
}
