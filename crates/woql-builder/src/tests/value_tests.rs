use chrono::NaiveDate;
use decimal_rs::Decimal;

use crate::expression::ArithmeticExpression;
use crate::value::{asc, desc, list, literal, node, string_literal, LiteralValue, Var, WoqlInput};
use crate::vars;
use woql_ast::prelude::Order;

#[test]
fn test_vars_macro() {
    // Test single variable
    let var_a = vars!("A");
    assert_eq!(var_a, Var::new("A"));

    // Test multiple variables
    let (var_b, var_c, var_d) = vars!("B", "C", "D");
    assert_eq!(var_b, Var::new("B"));
    assert_eq!(var_c, Var::new("C"));
    assert_eq!(var_d, Var::new("D"));
}

#[test]
fn test_var_strips_prefix() {
    let var = Var::new("v:Person");
    assert_eq!(var.name(), "Person");
    assert_eq!(var.full_name(), "v:Person");
    assert_eq!(var.to_string(), "v:Person");
}

#[test]
fn test_list_helper_function() {
    // Plain strings stay unclassified until they are encoded
    let list1 = list(vec!["Hello", "World"]);
    match list1 {
        WoqlInput::List(items) => {
            assert_eq!(items.len(), 2);
            assert!(matches!(&items[0], WoqlInput::Text(s) if s == "Hello"));
            assert!(matches!(&items[1], WoqlInput::Text(s) if s == "World"));
        }
        _ => panic!("Expected List"),
    }

    let list2 = list(vec![string_literal("foo"), node("doc:bar")]);
    match list2 {
        WoqlInput::List(items) => {
            assert!(matches!(&items[0], WoqlInput::String(s) if s == "foo"));
            assert!(matches!(&items[1], WoqlInput::Node(s) if s == "doc:bar"));
        }
        _ => panic!("Expected List"),
    }

    let list3 = list(vec![Var::new("X"), Var::new("Y")]);
    match list3 {
        WoqlInput::List(items) => {
            assert!(matches!(&items[0], WoqlInput::Variable(v) if v.name() == "X"));
            assert!(matches!(&items[1], WoqlInput::Variable(v) if v.name() == "Y"));
        }
        _ => panic!("Expected List"),
    }
}

#[test]
fn test_typed_literal_helper() {
    match literal("en", "xsd:language") {
        WoqlInput::Typed(lit) => {
            assert_eq!(lit.datatype(), "xsd:language");
            assert_eq!(lit.value(), &LiteralValue::String("en".to_string()));
        }
        other => panic!("Expected typed literal, found {:?}", other),
    }
}

#[test]
fn test_scalar_conversions() {
    assert_eq!(WoqlInput::from(true), WoqlInput::Boolean(true));
    assert_eq!(WoqlInput::from(-3i32), WoqlInput::Integer(-3));
    assert_eq!(WoqlInput::from(3u64), WoqlInput::Unsigned(3));
    assert_eq!(WoqlInput::from(1.5f64), WoqlInput::Float(1.5));

    let decimal: Decimal = "12.50".parse().unwrap();
    assert_eq!(WoqlInput::from(decimal), WoqlInput::Decimal(decimal));

    let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    assert_eq!(WoqlInput::from(date), WoqlInput::Date(date));
}

#[test]
fn test_order_helpers() {
    let ordering = desc("v:Age");
    assert_eq!(ordering.order, Order::Desc);
    assert_eq!(ordering.variable, "Age");

    let ordering = asc(Var::new("Name"));
    assert_eq!(ordering.order, Order::Asc);
    assert_eq!(ordering.variable, "Name");
}

#[test]
fn test_expression_operands() {
    let expr: ArithmeticExpression = Var::new("X").into();
    assert!(matches!(expr, ArithmeticExpression::Operand(WoqlInput::Variable(_))));

    let expr: ArithmeticExpression = 7i64.into();
    assert!(matches!(expr, ArithmeticExpression::Operand(WoqlInput::Integer(7))));
}
