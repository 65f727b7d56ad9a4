use serde_json::Value as JsonValue;

use crate::collection::{Length, Member, Slice, Sum};
use crate::compare::{Equals, Greater, IsA, Less, Subsumption, TypeOf, Typecast};
use crate::context::{Context, ListStyle};
use crate::control::{
    Distinct, From as WoqlFrom, If, Immediately, Into as WoqlInto, Once, Select, Using,
    WoqlOptional,
};
use crate::document::{DeleteDocument, InsertDocument, ReadDocument, UpdateDocument};
use crate::error::WoqlResult;
use crate::expression::Eval;
use crate::misc::{Count, Limit, Start};
use crate::order::{GroupBy, OrderBy};
use crate::serialize::{JsonLdObject, ToWoqlJson};
use crate::string::{Concatenate, Join, Lower, Regexp, Split, Trim, Upper};
use crate::triple::Triple;

/// A conjunction of queries which must all have a solution.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct And {
    /// List of queries which must hold.
    pub and: Vec<Query>,
}

/// A disjunction of queries any of which can provide a solution.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Or {
    /// List of queries which may hold.
    pub or: Vec<Query>,
}

/// The negation of a query. Provides no solution bindings, but will succeed
/// if its sub-query fails.
#[derive(Debug, Clone, PartialEq)]
pub struct Not {
    /// The query which must not hold.
    pub query: Box<Query>,
}

/// The query which is always true.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct True;

/// A WOQL query tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Query {
    /// An open sub-query slot waiting for its body.
    #[default]
    Pending,
    And(And),
    Or(Or),
    Not(Not),
    True(True),
    Triple(Triple),
    AddTriple(Triple),
    AddedTriple(Triple),
    DeleteTriple(Triple),
    DeletedTriple(Triple),
    Eval(Eval),
    Equals(Equals),
    Less(Less),
    Greater(Greater),
    IsA(IsA),
    Subsumption(Subsumption),
    TypeOf(TypeOf),
    Typecast(Typecast),
    Select(Select),
    Distinct(Distinct),
    Using(Using),
    From(WoqlFrom),
    Into(WoqlInto),
    WoqlOptional(WoqlOptional),
    Once(Once),
    Immediately(Immediately),
    If(If),
    Limit(Limit),
    Start(Start),
    Count(Count),
    OrderBy(OrderBy),
    GroupBy(GroupBy),
    Member(Member),
    Length(Length),
    Sum(Sum),
    Slice(Slice),
    Concatenate(Concatenate),
    Join(Join),
    Split(Split),
    Trim(Trim),
    Lower(Lower),
    Upper(Upper),
    Regexp(Regexp),
    ReadDocument(ReadDocument),
    InsertDocument(InsertDocument),
    UpdateDocument(UpdateDocument),
    DeleteDocument(DeleteDocument),
}

/// One hop from a node to one of its sub-queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// The `query` of a single-child wrapper such as `Limit` or `Not`.
    Sub,
    /// An element of an `And` or `Or` list.
    Item(usize),
    Test,
    Then,
    Else,
}

impl Query {
    /// The `@type` this node serializes under.
    pub fn kind(&self) -> &'static str {
        match self {
            Query::Pending => "Pending",
            Query::And(_) => "And",
            Query::Or(_) => "Or",
            Query::Not(_) => "Not",
            Query::True(_) => "True",
            Query::Triple(_) => "Triple",
            Query::AddTriple(_) => "AddTriple",
            Query::AddedTriple(_) => "AddedTriple",
            Query::DeleteTriple(_) => "DeleteTriple",
            Query::DeletedTriple(_) => "DeletedTriple",
            Query::Eval(_) => "Eval",
            Query::Equals(_) => "Equals",
            Query::Less(_) => "Less",
            Query::Greater(_) => "Greater",
            Query::IsA(_) => "IsA",
            Query::Subsumption(_) => "Subsumption",
            Query::TypeOf(_) => "TypeOf",
            Query::Typecast(_) => "Typecast",
            Query::Select(_) => "Select",
            Query::Distinct(_) => "Distinct",
            Query::Using(_) => "Using",
            Query::From(_) => "From",
            Query::Into(_) => "Into",
            Query::WoqlOptional(_) => "Optional",
            Query::Once(_) => "Once",
            Query::Immediately(_) => "Immediately",
            Query::If(_) => "If",
            Query::Limit(_) => "Limit",
            Query::Start(_) => "Start",
            Query::Count(_) => "Count",
            Query::OrderBy(_) => "OrderBy",
            Query::GroupBy(_) => "GroupBy",
            Query::Member(_) => "Member",
            Query::Length(_) => "Length",
            Query::Sum(_) => "Sum",
            Query::Slice(_) => "Slice",
            Query::Concatenate(_) => "Concatenate",
            Query::Join(_) => "Join",
            Query::Split(_) => "Split",
            Query::Trim(_) => "Trim",
            Query::Lower(_) => "Lower",
            Query::Upper(_) => "Upper",
            Query::Regexp(_) => "Regexp",
            Query::ReadDocument(_) => "ReadDocument",
            Query::InsertDocument(_) => "InsertDocument",
            Query::UpdateDocument(_) => "UpdateDocument",
            Query::DeleteDocument(_) => "DeleteDocument",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Query::Pending)
    }

    /// The single `query` child of a wrapper node.
    pub fn subquery(&self) -> Option<&Query> {
        match self {
            Query::Not(q) => Some(&q.query),
            Query::Select(q) => Some(&q.query),
            Query::Distinct(q) => Some(&q.query),
            Query::Using(q) => Some(&q.query),
            Query::From(q) => Some(&q.query),
            Query::Into(q) => Some(&q.query),
            Query::WoqlOptional(q) => Some(&q.query),
            Query::Once(q) => Some(&q.query),
            Query::Immediately(q) => Some(&q.query),
            Query::Limit(q) => Some(&q.query),
            Query::Start(q) => Some(&q.query),
            Query::Count(q) => Some(&q.query),
            Query::OrderBy(q) => Some(&q.query),
            Query::GroupBy(q) => Some(&q.query),
            _ => None,
        }
    }

    /// Like [`Query::subquery`], handing `self` back when there is no child.
    pub fn subquery_slot(&mut self) -> Result<&mut Query, &mut Query> {
        match self {
            Query::Not(q) => Ok(&mut *q.query),
            Query::Select(q) => Ok(&mut *q.query),
            Query::Distinct(q) => Ok(&mut *q.query),
            Query::Using(q) => Ok(&mut *q.query),
            Query::From(q) => Ok(&mut *q.query),
            Query::Into(q) => Ok(&mut *q.query),
            Query::WoqlOptional(q) => Ok(&mut *q.query),
            Query::Once(q) => Ok(&mut *q.query),
            Query::Immediately(q) => Ok(&mut *q.query),
            Query::Limit(q) => Ok(&mut *q.query),
            Query::Start(q) => Ok(&mut *q.query),
            Query::Count(q) => Ok(&mut *q.query),
            Query::OrderBy(q) => Ok(&mut *q.query),
            Query::GroupBy(q) => Ok(&mut *q.query),
            other => Err(other),
        }
    }

    pub fn subquery_mut(&mut self) -> Option<&mut Query> {
        self.subquery_slot().ok()
    }

    pub fn child(&self, step: Step) -> Option<&Query> {
        match (self, step) {
            (Query::And(q), Step::Item(i)) => q.and.get(i),
            (Query::Or(q), Step::Item(i)) => q.or.get(i),
            (Query::If(q), Step::Test) => Some(&q.test),
            (Query::If(q), Step::Then) => Some(&q.then_query),
            (Query::If(q), Step::Else) => Some(&q.else_query),
            (node, Step::Sub) => node.subquery(),
            _ => None,
        }
    }

    /// Follows `step`, handing `self` back when the step leads nowhere.
    pub fn child_slot(&mut self, step: Step) -> Result<&mut Query, &mut Query> {
        if self.child(step).is_none() {
            return Err(self);
        }
        match (self, step) {
            (Query::And(q), Step::Item(i)) => Ok(&mut q.and[i]),
            (Query::Or(q), Step::Item(i)) => Ok(&mut q.or[i]),
            (Query::If(q), Step::Test) => Ok(&mut *q.test),
            (Query::If(q), Step::Then) => Ok(&mut *q.then_query),
            (Query::If(q), Step::Else) => Ok(&mut *q.else_query),
            (node, _) => node.subquery_slot(),
        }
    }

    pub fn child_mut(&mut self, step: Step) -> Option<&mut Query> {
        self.child_slot(step).ok()
    }

    /// The node at the end of `path`, if every step exists.
    pub fn descend(&self, path: &[Step]) -> Option<&Query> {
        path.iter().try_fold(self, |node, step| node.child(*step))
    }

    pub fn descend_mut(&mut self, path: &[Step]) -> Option<&mut Query> {
        path.iter().try_fold(self, |node, step| node.child_mut(*step))
    }

    /// True when any node in the tree writes to the graph.
    pub fn contains_update(&self) -> bool {
        match self {
            Query::AddTriple(_)
            | Query::DeleteTriple(_)
            | Query::InsertDocument(_)
            | Query::UpdateDocument(_)
            | Query::DeleteDocument(_) => true,
            Query::And(q) => q.and.iter().any(Query::contains_update),
            Query::Or(q) => q.or.iter().any(Query::contains_update),
            Query::If(q) => {
                q.test.contains_update()
                    || q.then_query.contains_update()
                    || q.else_query.contains_update()
            }
            other => other.subquery().map_or(false, Query::contains_update),
        }
    }
}

fn query_list(queries: &[Query], ctx: &Context) -> WoqlResult<JsonValue> {
    match ctx.list_style() {
        ListStyle::Plain => queries.to_woql_json(ctx),
        ListStyle::Indexed => queries
            .iter()
            .enumerate()
            .map(|(index, query)| {
                Ok(JsonLdObject::new("QueryListElement")
                    .raw("index", index)
                    .field("query", query, ctx)?
                    .build())
            })
            .collect::<WoqlResult<Vec<_>>>()
            .map(JsonValue::Array),
    }
}

impl ToWoqlJson for Query {
    fn to_woql_json(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        match self {
            Query::Pending => Ok(JsonValue::Object(Default::default())),
            Query::And(q) => Ok(JsonLdObject::new("And")
                .raw("and", query_list(&q.and, ctx)?)
                .build()),
            Query::Or(q) => Ok(JsonLdObject::new("Or")
                .raw("or", query_list(&q.or, ctx)?)
                .build()),
            Query::Not(q) => Ok(JsonLdObject::new("Not").field("query", &q.query, ctx)?.build()),
            Query::True(_) => Ok(JsonLdObject::new("True").build()),
            Query::Triple(t)
            | Query::AddTriple(t)
            | Query::AddedTriple(t)
            | Query::DeleteTriple(t)
            | Query::DeletedTriple(t) => t.to_json_as(self.kind(), ctx),
            Query::Eval(q) => q.to_woql_json(ctx),
            Query::Equals(q) => q.to_woql_json(ctx),
            Query::Less(q) => q.to_woql_json(ctx),
            Query::Greater(q) => q.to_woql_json(ctx),
            Query::IsA(q) => q.to_woql_json(ctx),
            Query::Subsumption(q) => q.to_woql_json(ctx),
            Query::TypeOf(q) => q.to_woql_json(ctx),
            Query::Typecast(q) => q.to_woql_json(ctx),
            Query::Select(q) => q.to_woql_json(ctx),
            Query::Distinct(q) => q.to_woql_json(ctx),
            Query::Using(q) => q.to_woql_json(ctx),
            Query::From(q) => q.to_woql_json(ctx),
            Query::Into(q) => q.to_woql_json(ctx),
            Query::WoqlOptional(q) => q.to_woql_json(ctx),
            Query::Once(q) => q.to_woql_json(ctx),
            Query::Immediately(q) => q.to_woql_json(ctx),
            Query::If(q) => q.to_woql_json(ctx),
            Query::Limit(q) => q.to_woql_json(ctx),
            Query::Start(q) => q.to_woql_json(ctx),
            Query::Count(q) => q.to_woql_json(ctx),
            Query::OrderBy(q) => q.to_woql_json(ctx),
            Query::GroupBy(q) => q.to_woql_json(ctx),
            Query::Member(q) => q.to_woql_json(ctx),
            Query::Length(q) => q.to_woql_json(ctx),
            Query::Sum(q) => q.to_woql_json(ctx),
            Query::Slice(q) => q.to_woql_json(ctx),
            Query::Concatenate(q) => q.to_woql_json(ctx),
            Query::Join(q) => q.to_woql_json(ctx),
            Query::Split(q) => q.to_woql_json(ctx),
            Query::Trim(q) => q.to_woql_json(ctx),
            Query::Lower(q) => q.to_woql_json(ctx),
            Query::Upper(q) => q.to_woql_json(ctx),
            Query::Regexp(q) => q.to_woql_json(ctx),
            Query::ReadDocument(q) => q.to_woql_json(ctx),
            Query::InsertDocument(q) => q.to_woql_json(ctx),
            Query::UpdateDocument(q) => q.to_woql_json(ctx),
            Query::DeleteDocument(q) => q.to_woql_json(ctx),
        }
    }
}
