//! Byte-level comparisons of built queries against recorded JSON-LD documents.
use pretty_assertions::assert_eq;
use woql_builder::prelude::*;

fn fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{}.json", env!("CARGO_MANIFEST_DIR"), name);
    let text = std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("reading {}: {}", path, e));
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    serde_json::to_string(&parsed).unwrap()
}

fn assert_golden(query: &WoqlQuery, name: &str) {
    assert_eq!(query.json().unwrap(), fixture(name));
}

#[test]
fn test_and_of_two_triples() {
    let query = WoqlQuery::new()
        .and(vec![
            WoqlQuery::new().triple("a", "b", "c").unwrap(),
            WoqlQuery::new().triple("1", "2", "3").unwrap(),
        ])
        .unwrap();
    assert_golden(&query, "and");
}

#[test]
fn test_chained_triples_match_explicit_and() {
    let query = WoqlQuery::new()
        .triple("a", "b", "c")
        .unwrap()
        .triple("1", "2", "3")
        .unwrap();
    assert_golden(&query, "and");
}

#[test]
fn test_or_of_two_triples() {
    let query = WoqlQuery::new()
        .or(vec![
            WoqlQuery::new().triple("a", "b", node("c")).unwrap(),
            WoqlQuery::new().triple("1", "2", node("3")).unwrap(),
        ])
        .unwrap();
    assert_golden(&query, "or");
}

#[test]
fn test_select_wraps_triple() {
    let query = WoqlQuery::new()
        .triple("a", "b", "c")
        .unwrap()
        .select(["v:V1"])
        .unwrap();
    assert_golden(&query, "select");
}

#[test]
fn test_delete_with_optional_incoming_edges() {
    let outgoing = WoqlQuery::new()
        .delete_quad("id", "v:Outgoing", "v:Value", "schema")
        .unwrap();
    let incoming = WoqlQuery::new()
        .delete_quad("v:Other", "v:Incoming", node("id"), "schema")
        .unwrap()
        .opt();
    let query = outgoing.and(vec![incoming]).unwrap();
    assert_golden(&query, "delete");
}

#[test]
fn test_join() {
    let query = WoqlQuery::new()
        .join(list(vec!["v:A_obj", "v:B_obj"]), ", ", "v:output")
        .unwrap();
    assert_golden(&query, "join");
}

#[test]
fn test_split() {
    let list_obj = vars!("list_obj");
    let query = WoqlQuery::new().split("A, B, C", ", ", list_obj).unwrap();
    assert_golden(&query, "split");
}

#[test]
fn test_eval_plus() {
    let query = WoqlQuery::new().eval(plus(1, 2), "v:x").unwrap();
    assert_golden(&query, "eval");
}

#[test]
fn test_eval_floor() {
    let query = WoqlQuery::new().eval(floor(2.5), "v:x").unwrap();
    assert_golden(&query, "eval_floor");
}

#[test]
fn test_slice_basic() {
    let query = WoqlQuery::new()
        .slice(list(vec!["a", "b", "c", "d"]), "v:Result", 1, 3)
        .unwrap();
    assert_golden(&query, "slice_basic");
}

#[test]
fn test_slice_negative_indices() {
    let query = WoqlQuery::new()
        .slice(list(vec!["a", "b", "c", "d"]), "v:Result", -2, -1)
        .unwrap();
    assert_golden(&query, "slice_negative");
}

#[test]
fn test_slice_without_end() {
    let query = WoqlQuery::new()
        .slice_from(list(vec!["a", "b", "c", "d"]), "v:Result", 1)
        .unwrap();
    assert_golden(&query, "slice_without_end");
}

#[test]
fn test_slice_variable_list() {
    let query = WoqlQuery::new()
        .slice("v:MyList", "v:Result", 0, 2)
        .unwrap();
    assert_golden(&query, "slice_variable_list");
}

#[test]
fn test_slice_variable_indices() {
    let (start, end) = vars!("Start", "End");
    let query = WoqlQuery::new()
        .slice(list(vec!["x", "y", "z"]), "v:Result", start, end)
        .unwrap();
    assert_golden(&query, "slice_variable_indices");
}

#[test]
fn test_slice_empty_list() {
    let query = WoqlQuery::new()
        .slice(list(Vec::<&str>::new()), "v:Result", 0, 1)
        .unwrap();
    assert_golden(&query, "slice_empty_list");
}

#[test]
fn test_json_is_stable_across_calls() {
    let query = WoqlQuery::new()
        .triple("v:Person", "rdf:type", "@schema:Person")
        .unwrap()
        .limit(10)
        .start(0);
    assert_eq!(query.json().unwrap(), query.json().unwrap());
}
