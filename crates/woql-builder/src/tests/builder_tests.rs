#![allow(clippy::redundant_clone)]
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::prelude::*;
use woql_ast::prelude::{DataValue, NodeValue, Position, Step, Value};

fn assert_and_contains(query: Query, expected_len: usize) -> Vec<Query> {
    match query {
        Query::And(and_query) => {
            assert_eq!(and_query.and.len(), expected_len);
            and_query.and
        }
        _ => panic!("Expected And query, found {:?}", query),
    }
}

#[test]
fn test_single_triple() {
    let query = WoqlQuery::new()
        .triple("doc:Subj", "prop:pred", "v:Obj")
        .unwrap()
        .into_query();

    // A single triple should not be wrapped in And
    match query {
        Query::Triple(ref t) => {
            assert!(matches!(&t.subject, NodeValue::Node(iri) if iri == "doc:Subj"));
            assert!(matches!(&t.predicate, NodeValue::Node(iri) if iri == "prop:pred"));
            assert!(matches!(&t.object, Value::Variable(name) if name == "Obj"));
            assert_eq!(t.graph, None);
        }
        _ => panic!("Expected Triple query"),
    }
}

#[test]
fn test_triple_object_classification() {
    let query = WoqlQuery::new()
        .triple("v:Subj", "rdf:type", "@schema:Person")
        .unwrap()
        .triple("v:Subj", "name", "Alice")
        .unwrap()
        .triple("v:Subj", "age", 42)
        .unwrap()
        .into_query();

    let triples = assert_and_contains(query, 3);
    match (&triples[0], &triples[1], &triples[2]) {
        (Query::Triple(a), Query::Triple(b), Query::Triple(c)) => {
            assert!(matches!(&a.object, Value::Node(n) if n == "@schema:Person"));
            assert!(matches!(&b.object, Value::Data(l) if l.datatype() == "xsd:string"));
            assert!(matches!(&c.object, Value::Data(l) if l.datatype() == "xsd:integer"));
        }
        other => panic!("Expected three triples, found {:?}", other),
    }
}

#[test]
fn test_multiple_triples_implicit_and_flattened() {
    let query = WoqlQuery::new()
        .triple("a", "b", "c")
        .unwrap()
        .triple("d", "e", "f")
        .unwrap()
        .triple("g", "h", "i")
        .unwrap()
        .into_query();

    let queries_in_and = assert_and_contains(query, 3);
    assert!(queries_in_and.iter().all(|q| matches!(q, Query::Triple(_))));
}

#[test]
fn test_cursor_follows_conjunction() {
    let builder = WoqlQuery::new()
        .triple("a", "b", "c")
        .unwrap()
        .triple("d", "e", "f")
        .unwrap();
    assert_eq!(builder.cursor(), &[Step::Item(1)]);
    assert!(matches!(builder.current(), Some(Query::Triple(_))));
}

#[test]
fn test_explicit_and_flattens_nested_and() {
    let b1 = WoqlQuery::new().triple("a", "b", "c").unwrap();
    let b2 = WoqlQuery::new()
        .triple("d", "e", "f")
        .unwrap()
        .triple("g", "h", "i")
        .unwrap();
    let b3 = WoqlQuery::new().triple("j", "k", "l").unwrap();

    let query = b1.and(vec![b2, b3]).unwrap().into_query();
    assert_and_contains(query, 4);
}

#[test]
fn test_and_skips_empty_builders() {
    let query = WoqlQuery::new()
        .and(vec![
            WoqlQuery::new(),
            WoqlQuery::new().triple("a", "b", "c").unwrap(),
        ])
        .unwrap()
        .into_query();
    assert_and_contains(query, 1);
}

#[test]
fn test_and_with_nothing_fails() {
    let err = WoqlQuery::new().and(Vec::new()).unwrap_err();
    assert_eq!(err, WoqlError::EmptyComposition { operator: "And" });

    let err = WoqlQuery::new().and(vec![WoqlQuery::new()]).unwrap_err();
    assert_eq!(err, WoqlError::EmptyComposition { operator: "And" });
}

#[test]
fn test_explicit_or() {
    let b1 = WoqlQuery::new().triple("a", "b", "c").unwrap();
    let b2 = WoqlQuery::new().triple("d", "e", "f").unwrap();

    let query = WoqlQuery::new().or(vec![b1, b2]).unwrap().into_query();
    match query {
        Query::Or(or_query) => {
            assert_eq!(or_query.or.len(), 2);
            assert!(matches!(or_query.or[0], Query::Triple(_)));
            assert!(matches!(or_query.or[1], Query::Triple(_)));
        }
        _ => panic!("Expected Or query, found {:?}", query),
    }
}

#[test]
fn test_or_after_triple_is_conjoined() {
    let query = WoqlQuery::new()
        .triple("a", "b", "c")
        .unwrap()
        .or(vec![
            WoqlQuery::new().triple("d", "e", "f").unwrap(),
            WoqlQuery::new().triple("g", "h", "i").unwrap(),
        ])
        .unwrap()
        .into_query();
    let items = assert_and_contains(query, 2);
    assert!(matches!(items[1], Query::Or(_)));
}

#[test]
fn test_or_with_nothing_fails() {
    let err = WoqlQuery::new().or(Vec::new()).unwrap_err();
    assert_eq!(err, WoqlError::EmptyComposition { operator: "Or" });
}

#[test]
fn test_limit_wraps_whole_conjunction() {
    let query = WoqlQuery::new()
        .triple("a", "b", "c")
        .unwrap()
        .triple("d", "e", "f")
        .unwrap()
        .limit(10)
        .into_query();

    match query {
        Query::Limit(limit) => {
            assert_eq!(limit.limit, 10);
            assert_and_contains(*limit.query, 2);
        }
        _ => panic!("Expected Limit query, found {:?}", query),
    }
}

#[test]
fn test_wrappers_open_slots_before_body() {
    let query = WoqlQuery::new()
        .limit(2)
        .start(0)
        .triple("v:S", "v:P", "v:O")
        .unwrap();

    assert_eq!(
        query.to_dict().unwrap(),
        json!({
            "@type": "Limit",
            "limit": 2,
            "query": {
                "@type": "Start",
                "start": 0,
                "query": {
                    "@type": "Triple",
                    "subject": {"@type": "NodeValue", "variable": "S"},
                    "predicate": {"@type": "NodeValue", "variable": "P"},
                    "object": {"@type": "Value", "variable": "O"}
                }
            }
        })
    );
}

#[test]
fn test_triple_after_wrapper_joins_its_body() {
    let query = WoqlQuery::new()
        .triple("a", "b", "c")
        .unwrap()
        .limit(1)
        .triple("d", "e", "f")
        .unwrap();
    assert_eq!(query.cursor(), &[Step::Sub, Step::Item(1)]);

    match query.into_query() {
        Query::Limit(limit) => {
            assert_and_contains(*limit.query, 2);
        }
        other => panic!("Expected Limit query, found {:?}", other),
    }
}

#[test]
fn test_not() {
    let query = WoqlQuery::new()
        .not()
        .triple("v:S", "v:P", "v:O")
        .unwrap()
        .into_query();
    match query {
        Query::Not(not) => assert!(matches!(*not.query, Query::Triple(_))),
        _ => panic!("Expected Not query, found {:?}", query),
    }
}

#[test]
fn test_when_fills_missing_branches_with_true() {
    let query = WoqlQuery::new()
        .when(WoqlQuery::new().triple("a", "b", "c").unwrap(), WoqlQuery::new())
        .into_query();
    match query {
        Query::If(if_query) => {
            assert!(matches!(*if_query.test, Query::Triple(_)));
            assert!(matches!(*if_query.then_query, Query::True(_)));
            assert!(matches!(*if_query.else_query, Query::True(_)));
        }
        _ => panic!("Expected If query, found {:?}", query),
    }
}

#[test]
fn test_quad_records_graph() {
    let query = WoqlQuery::new()
        .add_quad("doc:x", "rdf:type", "@schema:Thing", "instance/main")
        .unwrap();
    assert!(query.query().contains_update());
    let doc = query.to_dict().unwrap();
    assert_eq!(doc["@type"], "AddTriple");
    assert_eq!(doc["graph"], "instance/main");
}

#[test]
fn test_variable_graph_is_rejected() {
    let err = WoqlQuery::new()
        .quad("a", "b", "c", "v:G")
        .unwrap_err();
    assert_eq!(
        err,
        WoqlError::TypeKind {
            position: Position::Graph,
            found: "variable",
        }
    );
}

#[test]
fn test_literal_subject_is_rejected() {
    let err = WoqlQuery::new().triple(7, "b", "c").unwrap_err();
    assert!(matches!(err, WoqlError::TypeKind { position: Position::Subject, .. }));
}

#[test]
fn test_node_in_data_position_is_rejected() {
    let err = WoqlQuery::new().less(node("doc:x"), 1).unwrap_err();
    assert!(matches!(err, WoqlError::TypeKind { position: Position::Data, .. }));
}

#[test]
fn test_select_and_distinct_strip_variable_prefix() {
    let (a, b) = vars!("A", "B");
    let query = WoqlQuery::new()
        .triple(a.clone(), "b", b.clone())
        .unwrap()
        .select(vec![a.clone(), b.clone(), a.clone()])
        .unwrap()
        .into_query();
    match query {
        Query::Select(select) => assert_eq!(select.variables, vec!["A", "B", "A"]),
        _ => panic!("Expected Select query, found {:?}", query),
    }

    let query = WoqlQuery::new().distinct(["v:X"]).unwrap().into_query();
    assert!(matches!(query, Query::Distinct(d) if d.variables == vec!["X".to_string()]));
}

#[test]
fn test_empty_select_fails() {
    let err = WoqlQuery::new().select(Vec::<Var>::new()).unwrap_err();
    assert_eq!(err, WoqlError::EmptyComposition { operator: "Select" });
}

#[test]
fn test_order_by() {
    let query = WoqlQuery::new()
        .triple("v:S", "age", "v:Age")
        .unwrap()
        .order_by([desc("v:Age"), asc("S")])
        .unwrap();
    let doc = query.to_dict().unwrap();
    assert_eq!(doc["@type"], "OrderBy");
    assert_eq!(
        doc["ordering"],
        json!([
            {"@type": "OrderTemplate", "order": "desc", "variable": "Age"},
            {"@type": "OrderTemplate", "order": "asc", "variable": "S"}
        ])
    );
}

#[test]
fn test_group_by() {
    let query = WoqlQuery::new()
        .triple("v:Person", "city", "v:City")
        .unwrap()
        .group_by(["v:City"], "v:Person", "v:People")
        .unwrap()
        .into_query();
    match query {
        Query::GroupBy(group) => {
            assert_eq!(group.group_by, vec!["City"]);
            assert_eq!(group.template, Value::Variable("Person".to_string()));
            assert_eq!(group.grouped, Value::Variable("People".to_string()));
            assert!(matches!(*group.query, Query::Triple(_)));
        }
        _ => panic!("Expected GroupBy query, found {:?}", query),
    }
}

#[test]
fn test_count_wraps_query() {
    let query = WoqlQuery::new()
        .triple("v:S", "v:P", "v:O")
        .unwrap()
        .count("v:Count")
        .unwrap()
        .into_query();
    match query {
        Query::Count(count) => {
            assert_eq!(count.count, DataValue::Variable("Count".to_string()));
            assert!(matches!(*count.query, Query::Triple(_)));
        }
        _ => panic!("Expected Count query, found {:?}", query),
    }
}

#[test]
fn test_eval_with_variables() {
    let (x, y) = vars!("X", "Y");
    let query = WoqlQuery::new()
        .eval(times(x.clone(), plus(2, 3)), y.clone())
        .unwrap();
    let doc = query.to_dict().unwrap();
    assert_eq!(doc["expression"]["@type"], "Times");
    assert_eq!(doc["expression"]["left"], json!({"@type": "ArithmeticValue", "variable": "X"}));
    assert_eq!(doc["expression"]["right"]["@type"], "Plus");
    assert_eq!(doc["result"], json!({"@type": "ArithmeticValue", "variable": "Y"}));
}

#[test]
fn test_string_operations() {
    let query = WoqlQuery::new()
        .trim("  padded ", "v:Trimmed")
        .unwrap()
        .lower("v:Trimmed", "v:Lower")
        .unwrap()
        .upper("v:Lower", "v:Upper")
        .unwrap()
        .concat(list(vec![string_literal("Name: "), Var::new("Upper").into()]), "v:Out")
        .unwrap()
        .regexp("^N", "v:Out", "v:Groups")
        .unwrap()
        .into_query();
    let items = assert_and_contains(query, 5);
    assert!(matches!(items[0], Query::Trim(_)));
    assert!(matches!(items[4], Query::Regexp(ref r) if r.result.is_some()));
}

#[test]
fn test_collection_operations() {
    let query = WoqlQuery::new()
        .member("v:Item", list(vec![1, 2, 3]))
        .unwrap()
        .length("v:List", "v:Len")
        .unwrap()
        .sum(list(vec![1, 2, 3]), "v:Total")
        .unwrap()
        .into_query();
    let items = assert_and_contains(query, 3);
    match &items[0] {
        Query::Member(member) => match &member.list {
            DataValue::List(values) => assert_eq!(values.len(), 3),
            other => panic!("Expected list, found {:?}", other),
        },
        other => panic!("Expected Member, found {:?}", other),
    }
}

#[test]
fn test_comparisons_and_typing() {
    let query = WoqlQuery::new()
        .isa("v:X", "@schema:Person")
        .unwrap()
        .subsumption("@schema:Employee", "@schema:Person")
        .unwrap()
        .type_of("v:Value", "v:Type")
        .unwrap()
        .typecast("v:Value", "xsd:integer", "v:Number")
        .unwrap()
        .greater("v:Number", 18)
        .unwrap()
        .equals("v:A", "v:B")
        .unwrap()
        .into_query();
    let items = assert_and_contains(query, 6);
    assert!(matches!(items[0], Query::IsA(_)));
    assert!(matches!(items[3], Query::Typecast(_)));
    assert!(matches!(items[4], Query::Greater(_)));
}

#[test]
fn test_document_operations() {
    let query = WoqlQuery::new()
        .read_document("doc:Person/1", "v:Doc")
        .unwrap()
        .update_document("v:Doc")
        .unwrap()
        .insert_document_as("v:New", "v:Id")
        .unwrap()
        .delete_document("doc:Person/2")
        .unwrap();
    assert!(query.query().contains_update());
    let items = assert_and_contains(query.into_query(), 4);
    match &items[2] {
        Query::InsertDocument(insert) => {
            assert_eq!(insert.identifier, Some(NodeValue::Variable("Id".to_string())));
        }
        other => panic!("Expected InsertDocument, found {:?}", other),
    }
}

#[test]
fn test_document_mapping_is_rejected() {
    let err = WoqlQuery::new()
        .insert_document(json!({"@type": "Person", "name": "Alice"}))
        .unwrap_err();
    assert!(matches!(err, WoqlError::TypeKind { found: "mapping", .. }));
}

#[test]
fn test_read_only_query_has_no_update() {
    let query = WoqlQuery::new().triple("v:S", "v:P", "v:O").unwrap();
    assert!(!query.query().contains_update());
}

#[test]
fn test_graph_wrappers() {
    let query = WoqlQuery::new()
        .using("admin/people")
        .from_graph("instance/main")
        .into_graph("instance/main")
        .add_triple("doc:x", "name", "X")
        .unwrap();
    let doc = query.to_dict().unwrap();
    assert_eq!(doc["@type"], "Using");
    assert_eq!(doc["collection"], "admin/people");
    assert_eq!(doc["@context"], "/api/prefixes/admin/people");
    assert_eq!(doc["query"]["@type"], "From");
    assert_eq!(doc["query"]["query"]["@type"], "Into");
    assert_eq!(doc["query"]["query"]["query"]["@type"], "AddTriple");
}

#[test]
fn test_opt_once_immediately() {
    let query = WoqlQuery::new()
        .triple("v:S", "v:P", "v:O")
        .unwrap()
        .opt()
        .once()
        .immediately();
    let doc = query.to_dict().unwrap();
    assert_eq!(doc["@type"], "Optional");
    assert_eq!(doc["query"]["@type"], "Once");
    assert_eq!(doc["query"]["query"]["@type"], "Immediately");
    assert_eq!(doc["query"]["query"]["query"]["@type"], "Triple");
}

#[test]
fn test_add_operator_conjoins() {
    let left = WoqlQuery::new().triple("a", "b", "c").unwrap();
    let right = WoqlQuery::new()
        .triple("d", "e", "f")
        .unwrap()
        .triple("g", "h", "i")
        .unwrap();
    let query = (left + right).into_query();
    assert_and_contains(query, 3);
}

#[test]
fn test_add_empty_is_identity() {
    let left = WoqlQuery::new().triple("a", "b", "c").unwrap();
    let query = left.clone() + WoqlQuery::new();
    assert_eq!(query.query(), left.query());
}

#[test]
fn test_embed_places_subtree() {
    let inner = WoqlQuery::new().triple("a", "b", "c").unwrap().limit(1);
    let query = WoqlQuery::new().not().embed(inner).into_query();
    match query {
        Query::Not(not) => assert!(matches!(*not.query, Query::Limit(_))),
        _ => panic!("Expected Not query, found {:?}", query),
    }
}

#[test]
fn test_empty_query_serializes_to_empty_object() {
    assert_eq!(WoqlQuery::new().to_dict().unwrap(), json!({}));
}

#[test]
fn test_attached_context_expands_nodes() {
    let ctx = Context::for_database("http://localhost:6363", "people").with_prefix_expansion(true);
    let query = WoqlQuery::new()
        .triple("Person/1", "rdf:type", "v:T")
        .unwrap()
        .context(ctx.clone());
    assert_eq!(query.get_context(), Some(&ctx));

    let doc = query.to_dict().unwrap();
    assert_eq!(doc["subject"]["node"], "http://localhost:6363/people/data/Person/1");
    assert_eq!(
        doc["predicate"]["node"],
        "http://www.w3.org/1999/02/22-rdf-syntax-ns#type"
    );

    // An explicit context wins over the attached one
    let plain = query.to_dict_with(&Context::default()).unwrap();
    assert_eq!(plain["subject"]["node"], "Person/1");
}

#[test]
fn test_indexed_list_style() {
    let query = WoqlQuery::new().true_().true_();
    let ctx = Context::default().with_list_style(ListStyle::Indexed);
    assert_eq!(
        query.to_dict_with(&ctx).unwrap(),
        json!({
            "@type": "And",
            "and": [
                {"@type": "QueryListElement", "index": 0, "query": {"@type": "True"}},
                {"@type": "QueryListElement", "index": 1, "query": {"@type": "True"}}
            ]
        })
    );
}

#[test]
fn test_to_dict_is_idempotent() {
    let query = WoqlQuery::new()
        .triple("v:S", "v:P", "v:O")
        .unwrap()
        .select(["S"])
        .unwrap();
    let first = query.to_dict().unwrap();
    let second = query.to_dict().unwrap();
    assert_eq!(first, second);
    assert_eq!(query.json().unwrap(), serde_json::to_string(&first).unwrap());
}
