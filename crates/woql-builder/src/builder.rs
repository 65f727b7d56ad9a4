use std::mem;
use std::ops::Add;

use serde_json::Value as JsonValue;
use tracing::{debug, trace};
use woql_ast::prelude::*;

use crate::expression::FinalizeWoqlExpr;

/// Builds a WOQL query using a fluent interface.
///
/// The builder owns one query tree plus a cursor: the path from the root to
/// the slot the next call writes into. Leaf operators are placed at the
/// cursor and conjoined with whatever is already there; wrapping operators
/// (`limit`, `select`, `not`, ...) take the current node as their body and
/// move the cursor inside.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WoqlQuery {
    pub(crate) root: Query,
    pub(crate) cursor: Vec<Step>,
    context: Option<Context>,
}

impl WoqlQuery {
    /// Creates a new, empty query.
    pub fn new() -> Self {
        WoqlQuery::default()
    }

    /// Wraps an existing tree; the cursor starts at the root.
    pub fn from_query(query: Query) -> Self {
        WoqlQuery {
            root: query,
            cursor: Vec::new(),
            context: None,
        }
    }

    pub fn query(&self) -> &Query {
        &self.root
    }

    pub fn into_query(self) -> Query {
        self.root
    }

    pub fn cursor(&self) -> &[Step] {
        &self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_pending()
    }

    /// The node the cursor points at.
    pub fn current(&self) -> Option<&Query> {
        self.root.descend(&self.cursor)
    }

    // --- Context & serialization ---

    /// Attaches the context used by [`WoqlQuery::to_dict`].
    pub fn context(mut self, ctx: Context) -> Self {
        self.context = Some(ctx);
        self
    }

    pub fn get_context(&self) -> Option<&Context> {
        self.context.as_ref()
    }

    /// Serializes the query against the attached context, or the default one.
    pub fn to_dict(&self) -> WoqlResult<JsonValue> {
        match &self.context {
            Some(ctx) => serialize(&self.root, ctx),
            None => serialize(&self.root, &Context::default()),
        }
    }

    pub fn to_dict_with(&self, ctx: &Context) -> WoqlResult<JsonValue> {
        serialize(&self.root, ctx)
    }

    /// The compact JSON text of [`WoqlQuery::to_dict`].
    pub fn json(&self) -> WoqlResult<String> {
        match &self.context {
            Some(ctx) => to_json_string(&self.root, ctx),
            None => to_json_string(&self.root, &Context::default()),
        }
    }

    // --- Cursor plumbing ---

    fn slot_mut(&mut self) -> &mut Query {
        if self.root.descend(&self.cursor).is_none() {
            debug!(cursor = ?self.cursor, "cursor does not resolve, resetting to root");
            self.cursor.clear();
        }
        let mut node = &mut self.root;
        for step in &self.cursor {
            node = match node.child_slot(*step) {
                Ok(child) | Err(child) => child,
            };
        }
        node
    }

    /// True when the cursor sits on an element of an `And`.
    fn in_conjunction(&self) -> bool {
        match self.cursor.split_last() {
            Some((Step::Item(_), parent)) => {
                matches!(self.root.descend(parent), Some(Query::And(_)))
            }
            _ => false,
        }
    }

    fn leave_conjunction(&mut self) {
        while self.in_conjunction() {
            self.cursor.pop();
        }
    }

    /// Places a leaf node at the cursor, conjoining it with what is there.
    pub(crate) fn insert(&mut self, node: Query) {
        trace!(kind = node.kind(), cursor = ?self.cursor, "inserting woql node");
        let occupied = !self.slot_mut().is_pending();
        if occupied && self.in_conjunction() {
            self.cursor.pop();
        }

        let slot = self.slot_mut();
        let step = if slot.is_pending() {
            *slot = node;
            None
        } else if let Query::And(and) = &mut *slot {
            and.and.push(node);
            Some(Step::Item(and.and.len() - 1))
        } else {
            let previous = mem::take(slot);
            *slot = Query::And(And {
                and: vec![previous, node],
            });
            Some(Step::Item(1))
        };

        if let Some(step) = step {
            self.cursor.push(step);
        }
    }

    /// Replaces the current node with `make(current)` and moves the cursor
    /// into the wrapper's body.
    pub(crate) fn wrap(&mut self, make: impl FnOnce(Box<Query>) -> Query) {
        self.leave_conjunction();
        let slot = self.slot_mut();
        let current = mem::take(slot);
        *slot = make(Box::new(current));
        trace!(kind = slot.kind(), "wrapped current woql node");
        self.cursor.push(Step::Sub);
    }

    /// Wraps the whole tree, keeping the cursor on the same node.
    pub(crate) fn wrap_root(&mut self, make: impl FnOnce(Box<Query>) -> Query) {
        let root = mem::take(&mut self.root);
        self.root = make(Box::new(root));
        self.cursor.insert(0, Step::Sub);
    }

    fn conjoin(&mut self, incoming: Vec<Query>) {
        self.leave_conjunction();
        let slot = self.slot_mut();
        if slot.is_pending() {
            *slot = Query::And(And { and: incoming });
        } else if let Query::And(and) = &mut *slot {
            and.and.extend(incoming);
        } else {
            let previous = mem::take(slot);
            let mut and = vec![previous];
            and.extend(incoming);
            *slot = Query::And(And { and });
        }
    }

    // --- Logic ---

    /// Conjoins the given queries with the current node. Nested `And`s are
    /// spliced in rather than nested.
    pub fn and(mut self, queries: impl IntoIterator<Item = WoqlQuery>) -> WoqlResult<Self> {
        let mut incoming = Vec::new();
        for query in queries {
            flatten_and(query.root, &mut incoming);
        }
        if incoming.is_empty() {
            return Err(WoqlError::EmptyComposition { operator: "And" });
        }
        self.conjoin(incoming);
        Ok(self)
    }

    /// Adds a disjunction of the given queries.
    pub fn or(mut self, queries: impl IntoIterator<Item = WoqlQuery>) -> WoqlResult<Self> {
        let or: Vec<Query> = queries
            .into_iter()
            .map(|q| q.root)
            .filter(|q| !q.is_pending())
            .collect();
        if or.is_empty() {
            return Err(WoqlError::EmptyComposition { operator: "Or" });
        }
        self.insert(Query::Or(Or { or }));
        Ok(self)
    }

    /// Negates the current node, or opens a negated slot when there is none.
    pub fn not(mut self) -> Self {
        self.wrap(|query| Query::Not(Not { query }));
        self
    }

    /// Adds a query that always succeeds.
    pub fn true_(mut self) -> Self {
        self.insert(Query::True(True));
        self
    }

    /// Places another query's tree at the cursor.
    pub fn embed(mut self, query: WoqlQuery) -> Self {
        if !query.is_empty() {
            self.insert(query.root);
        }
        self
    }

    /// Adds a conditional. Empty branches are read as `True`.
    pub fn if_then_else(mut self, test: WoqlQuery, then: WoqlQuery, otherwise: WoqlQuery) -> Self {
        self.insert(Query::If(If {
            test: Box::new(or_true(test)),
            then_query: Box::new(or_true(then)),
            else_query: Box::new(or_true(otherwise)),
        }));
        self
    }

    /// A conditional without an else branch.
    pub fn when(self, test: WoqlQuery, then: WoqlQuery) -> Self {
        self.if_then_else(test, then, WoqlQuery::new())
    }

    // --- Triples ---

    fn edge<S, P, O>(subject: S, predicate: P, object: O, graph: Option<String>) -> WoqlResult<Triple>
    where
        S: Into<WoqlInput>,
        P: Into<WoqlInput>,
        O: Into<WoqlInput>,
    {
        Ok(Triple {
            subject: encode_node(subject, Position::Subject)?,
            predicate: encode_node(predicate, Position::Predicate)?,
            object: encode_value(object.into(), Position::Object)?,
            graph,
        })
    }

    fn graph_name(graph: impl Into<WoqlInput>) -> WoqlResult<String> {
        match encode_node(graph, Position::Graph)? {
            NodeValue::Node(name) => Ok(name),
            NodeValue::Variable(_) => Err(WoqlError::TypeKind {
                position: Position::Graph,
                found: "variable",
            }),
        }
    }

    /// Adds a triple pattern to the query.
    pub fn triple<S, P, O>(mut self, subject: S, predicate: P, object: O) -> WoqlResult<Self>
    where
        S: Into<WoqlInput>,
        P: Into<WoqlInput>,
        O: Into<WoqlInput>,
    {
        self.insert(Query::Triple(Self::edge(subject, predicate, object, None)?));
        Ok(self)
    }

    /// Adds a triple pattern restricted to `graph`.
    pub fn quad<S, P, O, G>(mut self, subject: S, predicate: P, object: O, graph: G) -> WoqlResult<Self>
    where
        S: Into<WoqlInput>,
        P: Into<WoqlInput>,
        O: Into<WoqlInput>,
        G: Into<WoqlInput>,
    {
        let graph = Self::graph_name(graph)?;
        self.insert(Query::Triple(Self::edge(subject, predicate, object, Some(graph))?));
        Ok(self)
    }

    pub fn add_triple<S, P, O>(mut self, subject: S, predicate: P, object: O) -> WoqlResult<Self>
    where
        S: Into<WoqlInput>,
        P: Into<WoqlInput>,
        O: Into<WoqlInput>,
    {
        self.insert(Query::AddTriple(Self::edge(subject, predicate, object, None)?));
        Ok(self)
    }

    pub fn add_quad<S, P, O, G>(mut self, subject: S, predicate: P, object: O, graph: G) -> WoqlResult<Self>
    where
        S: Into<WoqlInput>,
        P: Into<WoqlInput>,
        O: Into<WoqlInput>,
        G: Into<WoqlInput>,
    {
        let graph = Self::graph_name(graph)?;
        self.insert(Query::AddTriple(Self::edge(subject, predicate, object, Some(graph))?));
        Ok(self)
    }

    pub fn delete_triple<S, P, O>(mut self, subject: S, predicate: P, object: O) -> WoqlResult<Self>
    where
        S: Into<WoqlInput>,
        P: Into<WoqlInput>,
        O: Into<WoqlInput>,
    {
        self.insert(Query::DeleteTriple(Self::edge(subject, predicate, object, None)?));
        Ok(self)
    }

    pub fn delete_quad<S, P, O, G>(mut self, subject: S, predicate: P, object: O, graph: G) -> WoqlResult<Self>
    where
        S: Into<WoqlInput>,
        P: Into<WoqlInput>,
        O: Into<WoqlInput>,
        G: Into<WoqlInput>,
    {
        let graph = Self::graph_name(graph)?;
        self.insert(Query::DeleteTriple(Self::edge(subject, predicate, object, Some(graph))?));
        Ok(self)
    }

    /// Matches an edge added at the current commit.
    pub fn added_triple<S, P, O>(mut self, subject: S, predicate: P, object: O) -> WoqlResult<Self>
    where
        S: Into<WoqlInput>,
        P: Into<WoqlInput>,
        O: Into<WoqlInput>,
    {
        self.insert(Query::AddedTriple(Self::edge(subject, predicate, object, None)?));
        Ok(self)
    }

    /// Matches an edge removed at the current commit.
    pub fn deleted_triple<S, P, O>(mut self, subject: S, predicate: P, object: O) -> WoqlResult<Self>
    where
        S: Into<WoqlInput>,
        P: Into<WoqlInput>,
        O: Into<WoqlInput>,
    {
        self.insert(Query::DeletedTriple(Self::edge(subject, predicate, object, None)?));
        Ok(self)
    }

    // --- Comparison & typing ---

    pub fn equals(mut self, left: impl Into<WoqlInput>, right: impl Into<WoqlInput>) -> WoqlResult<Self> {
        self.insert(Query::Equals(Equals {
            left: encode_value(left.into(), Position::Object)?,
            right: encode_value(right.into(), Position::Object)?,
        }));
        Ok(self)
    }

    pub fn less(mut self, left: impl Into<WoqlInput>, right: impl Into<WoqlInput>) -> WoqlResult<Self> {
        self.insert(Query::Less(Less {
            left: encode_data(left, Position::Data)?,
            right: encode_data(right, Position::Data)?,
        }));
        Ok(self)
    }

    pub fn greater(mut self, left: impl Into<WoqlInput>, right: impl Into<WoqlInput>) -> WoqlResult<Self> {
        self.insert(Query::Greater(Greater {
            left: encode_data(left, Position::Data)?,
            right: encode_data(right, Position::Data)?,
        }));
        Ok(self)
    }

    /// Adds a check that `element` is of type `type_of`.
    pub fn isa(mut self, element: impl Into<WoqlInput>, type_of: impl Into<WoqlInput>) -> WoqlResult<Self> {
        self.insert(Query::IsA(IsA {
            element: encode_node(element, Position::Subject)?,
            type_of: encode_node(type_of, Position::Subject)?,
        }));
        Ok(self)
    }

    pub fn subsumption(mut self, child: impl Into<WoqlInput>, parent: impl Into<WoqlInput>) -> WoqlResult<Self> {
        self.insert(Query::Subsumption(Subsumption {
            child: encode_node(child, Position::Subject)?,
            parent: encode_node(parent, Position::Subject)?,
        }));
        Ok(self)
    }

    pub fn type_of(mut self, value: impl Into<WoqlInput>, type_uri: impl Into<WoqlInput>) -> WoqlResult<Self> {
        self.insert(Query::TypeOf(TypeOf {
            value: encode_value(value.into(), Position::Object)?,
            type_uri: encode_node(type_uri, Position::Subject)?,
        }));
        Ok(self)
    }

    pub fn typecast(
        mut self,
        value: impl Into<WoqlInput>,
        type_uri: impl Into<WoqlInput>,
        result: impl Into<WoqlInput>,
    ) -> WoqlResult<Self> {
        self.insert(Query::Typecast(Typecast {
            value: encode_value(value.into(), Position::Object)?,
            type_uri: encode_node(type_uri, Position::Subject)?,
            result: encode_value(result.into(), Position::Object)?,
        }));
        Ok(self)
    }

    // --- Arithmetic ---

    /// Evaluates an arithmetic expression into `result`.
    pub fn eval(mut self, expression: impl FinalizeWoqlExpr, result: impl Into<WoqlInput>) -> WoqlResult<Self> {
        self.insert(Query::Eval(Eval {
            expression: expression.finalize_expr()?,
            result: encode_arithmetic(result)?,
        }));
        Ok(self)
    }

    // --- Collections ---

    pub fn member(mut self, member: impl Into<WoqlInput>, list: impl Into<WoqlInput>) -> WoqlResult<Self> {
        self.insert(Query::Member(Member {
            member: encode_data(member, Position::Data)?,
            list: encode_data(list, Position::Data)?,
        }));
        Ok(self)
    }

    pub fn length(mut self, list: impl Into<WoqlInput>, length: impl Into<WoqlInput>) -> WoqlResult<Self> {
        self.insert(Query::Length(Length {
            list: encode_data(list, Position::Data)?,
            length: encode_data(length, Position::Data)?,
        }));
        Ok(self)
    }

    pub fn sum(mut self, list: impl Into<WoqlInput>, result: impl Into<WoqlInput>) -> WoqlResult<Self> {
        self.insert(Query::Sum(Sum {
            list: encode_data(list, Position::Data)?,
            result: encode_data(result, Position::Data)?,
        }));
        Ok(self)
    }

    fn push_slice(
        &mut self,
        list: WoqlInput,
        result: WoqlInput,
        start: WoqlInput,
        end: Option<WoqlInput>,
    ) -> WoqlResult<()> {
        let end = match end {
            Some(end) => Some(encode_data(end, Position::Index)?),
            None => None,
        };
        self.insert(Query::Slice(Slice {
            list: encode_data(list, Position::Data)?,
            result: encode_data(result, Position::Data)?,
            start: encode_data(start, Position::Index)?,
            end,
        }));
        Ok(())
    }

    /// Binds `result` to the elements of `list` from `start` (inclusive) to
    /// `end` (exclusive). Negative indices count from the end.
    pub fn slice(
        mut self,
        list: impl Into<WoqlInput>,
        result: impl Into<WoqlInput>,
        start: impl Into<WoqlInput>,
        end: impl Into<WoqlInput>,
    ) -> WoqlResult<Self> {
        self.push_slice(list.into(), result.into(), start.into(), Some(end.into()))?;
        Ok(self)
    }

    /// Like [`WoqlQuery::slice`], running to the end of the list.
    pub fn slice_from(
        mut self,
        list: impl Into<WoqlInput>,
        result: impl Into<WoqlInput>,
        start: impl Into<WoqlInput>,
    ) -> WoqlResult<Self> {
        self.push_slice(list.into(), result.into(), start.into(), None)?;
        Ok(self)
    }

    // --- Strings ---

    pub fn concat(mut self, list: impl Into<WoqlInput>, result: impl Into<WoqlInput>) -> WoqlResult<Self> {
        self.insert(Query::Concatenate(Concatenate {
            list: encode_data(list, Position::Data)?,
            result: encode_data(result, Position::Data)?,
        }));
        Ok(self)
    }

    pub fn join(
        mut self,
        list: impl Into<WoqlInput>,
        separator: impl Into<WoqlInput>,
        result: impl Into<WoqlInput>,
    ) -> WoqlResult<Self> {
        self.insert(Query::Join(Join {
            list: encode_data(list, Position::Data)?,
            separator: encode_data(separator, Position::Data)?,
            result: encode_data(result, Position::Data)?,
        }));
        Ok(self)
    }

    pub fn split(
        mut self,
        string: impl Into<WoqlInput>,
        pattern: impl Into<WoqlInput>,
        list: impl Into<WoqlInput>,
    ) -> WoqlResult<Self> {
        self.insert(Query::Split(Split {
            string: encode_data(string, Position::Data)?,
            pattern: encode_data(pattern, Position::Data)?,
            list: encode_data(list, Position::Data)?,
        }));
        Ok(self)
    }

    pub fn trim(mut self, untrimmed: impl Into<WoqlInput>, trimmed: impl Into<WoqlInput>) -> WoqlResult<Self> {
        self.insert(Query::Trim(Trim {
            untrimmed: encode_data(untrimmed, Position::Data)?,
            trimmed: encode_data(trimmed, Position::Data)?,
        }));
        Ok(self)
    }

    pub fn lower(mut self, mixed: impl Into<WoqlInput>, lower: impl Into<WoqlInput>) -> WoqlResult<Self> {
        self.insert(Query::Lower(Lower {
            mixed: encode_data(mixed, Position::Data)?,
            lower: encode_data(lower, Position::Data)?,
        }));
        Ok(self)
    }

    pub fn upper(mut self, mixed: impl Into<WoqlInput>, upper: impl Into<WoqlInput>) -> WoqlResult<Self> {
        self.insert(Query::Upper(Upper {
            mixed: encode_data(mixed, Position::Data)?,
            upper: encode_data(upper, Position::Data)?,
        }));
        Ok(self)
    }

    /// Matches `string` against `pattern`, binding the capture groups to `result`.
    pub fn regexp(
        mut self,
        pattern: impl Into<WoqlInput>,
        string: impl Into<WoqlInput>,
        result: impl Into<WoqlInput>,
    ) -> WoqlResult<Self> {
        self.insert(Query::Regexp(Regexp {
            pattern: encode_data(pattern, Position::Data)?,
            string: encode_data(string, Position::Data)?,
            result: Some(encode_data(result, Position::Data)?),
        }));
        Ok(self)
    }

    /// Tests `string` against `pattern` without binding groups.
    pub fn like_pattern(mut self, pattern: impl Into<WoqlInput>, string: impl Into<WoqlInput>) -> WoqlResult<Self> {
        self.insert(Query::Regexp(Regexp {
            pattern: encode_data(pattern, Position::Data)?,
            string: encode_data(string, Position::Data)?,
            result: None,
        }));
        Ok(self)
    }

    // --- Documents ---

    pub fn read_document(mut self, identifier: impl Into<WoqlInput>, document: impl Into<WoqlInput>) -> WoqlResult<Self> {
        self.insert(Query::ReadDocument(ReadDocument {
            identifier: encode_node(identifier, Position::Subject)?,
            document: encode_value(document.into(), Position::Object)?,
        }));
        Ok(self)
    }

    pub fn insert_document(mut self, document: impl Into<WoqlInput>) -> WoqlResult<Self> {
        self.insert(Query::InsertDocument(InsertDocument {
            document: encode_value(document.into(), Position::Object)?,
            identifier: None,
        }));
        Ok(self)
    }

    /// Inserts a document and binds the identifier it was stored under.
    pub fn insert_document_as(
        mut self,
        document: impl Into<WoqlInput>,
        identifier: impl Into<WoqlInput>,
    ) -> WoqlResult<Self> {
        self.insert(Query::InsertDocument(InsertDocument {
            document: encode_value(document.into(), Position::Object)?,
            identifier: Some(encode_node(identifier, Position::Subject)?),
        }));
        Ok(self)
    }

    pub fn update_document(mut self, document: impl Into<WoqlInput>) -> WoqlResult<Self> {
        self.insert(Query::UpdateDocument(UpdateDocument {
            document: encode_value(document.into(), Position::Object)?,
            identifier: None,
        }));
        Ok(self)
    }

    pub fn update_document_as(
        mut self,
        document: impl Into<WoqlInput>,
        identifier: impl Into<WoqlInput>,
    ) -> WoqlResult<Self> {
        self.insert(Query::UpdateDocument(UpdateDocument {
            document: encode_value(document.into(), Position::Object)?,
            identifier: Some(encode_node(identifier, Position::Subject)?),
        }));
        Ok(self)
    }

    pub fn delete_document(mut self, identifier: impl Into<WoqlInput>) -> WoqlResult<Self> {
        self.insert(Query::DeleteDocument(DeleteDocument {
            identifier: encode_node(identifier, Position::Subject)?,
        }));
        Ok(self)
    }

    // --- Wrapping operators ---

    /// Limits the current query to `limit` solutions.
    pub fn limit(mut self, limit: u64) -> Self {
        self.wrap(|query| Query::Limit(Limit { limit, query }));
        self
    }

    /// Skips the first `start` solutions of the current query.
    pub fn start(mut self, start: u64) -> Self {
        self.wrap(|query| Query::Start(Start { start, query }));
        self
    }

    /// Projects the current query onto `variables`. Duplicates are kept.
    pub fn select<V>(mut self, variables: impl IntoIterator<Item = V>) -> WoqlResult<Self>
    where
        V: Into<Var>,
    {
        let variables = variable_names(variables);
        if variables.is_empty() {
            return Err(WoqlError::EmptyComposition { operator: "Select" });
        }
        self.wrap(|query| Query::Select(Select { variables, query }));
        Ok(self)
    }

    pub fn distinct<V>(mut self, variables: impl IntoIterator<Item = V>) -> WoqlResult<Self>
    where
        V: Into<Var>,
    {
        let variables = variable_names(variables);
        if variables.is_empty() {
            return Err(WoqlError::EmptyComposition { operator: "Distinct" });
        }
        self.wrap(|query| Query::Distinct(Distinct { variables, query }));
        Ok(self)
    }

    /// Runs the current query against another collection, e.g. `admin/db/local/branch/dev`.
    pub fn using(mut self, collection: impl Into<String>) -> Self {
        let collection = collection.into();
        self.wrap(|query| Query::Using(Using { collection, query }));
        self
    }

    /// Changes the default read graph.
    pub fn from_graph(mut self, graph: impl Into<String>) -> Self {
        let graph = graph.into();
        self.wrap(|query| Query::From(WoqlFrom { graph, query }));
        self
    }

    /// Changes the default write graph.
    pub fn into_graph(mut self, graph: impl Into<String>) -> Self {
        let graph = graph.into();
        self.wrap(|query| Query::Into(WoqlInto { graph, query }));
        self
    }

    /// Makes the current query optional.
    pub fn opt(mut self) -> Self {
        self.wrap(|query| Query::WoqlOptional(WoqlOptional { query }));
        self
    }

    /// Alias for [`WoqlQuery::opt`].
    pub fn optional(self) -> Self {
        self.opt()
    }

    pub fn once(mut self) -> Self {
        self.wrap(|query| Query::Once(Once { query }));
        self
    }

    pub fn immediately(mut self) -> Self {
        self.wrap(|query| Query::Immediately(Immediately { query }));
        self
    }

    /// Counts the solutions of the current query into `count`.
    pub fn count(mut self, count: impl Into<WoqlInput>) -> WoqlResult<Self> {
        let count = encode_data(count, Position::Data)?;
        self.wrap(|query| Query::Count(Count { query, count }));
        Ok(self)
    }

    /// Orders the solutions of the current query.
    pub fn order_by(mut self, ordering: impl IntoIterator<Item = OrderTemplate>) -> WoqlResult<Self> {
        let ordering: Vec<OrderTemplate> = ordering.into_iter().collect();
        if ordering.is_empty() {
            return Err(WoqlError::EmptyComposition { operator: "OrderBy" });
        }
        self.wrap(|query| Query::OrderBy(OrderBy { ordering, query }));
        Ok(self)
    }

    /// Groups the solutions of the current query by `group_by`, collecting
    /// `template` for each group into `grouped`.
    pub fn group_by<V>(
        mut self,
        group_by: impl IntoIterator<Item = V>,
        template: impl Into<WoqlInput>,
        grouped: impl Into<WoqlInput>,
    ) -> WoqlResult<Self>
    where
        V: Into<Var>,
    {
        let group_by = variable_names(group_by);
        let template = encode_value(template.into(), Position::Object)?;
        let grouped = encode_value(grouped.into(), Position::Object)?;
        self.wrap(|query| {
            Query::GroupBy(GroupBy {
                group_by,
                template,
                grouped,
                query,
            })
        });
        Ok(self)
    }
}

fn variable_names<V: Into<Var>>(variables: impl IntoIterator<Item = V>) -> Vec<String> {
    variables
        .into_iter()
        .map(|v| v.into().into_name())
        .collect()
}

fn flatten_and(query: Query, target: &mut Vec<Query>) {
    match query {
        Query::Pending => {}
        Query::And(and) => {
            for inner in and.and {
                flatten_and(inner, target);
            }
        }
        other => target.push(other),
    }
}

fn or_true(query: WoqlQuery) -> Query {
    if query.is_empty() {
        Query::True(True)
    } else {
        query.root
    }
}

impl Add for WoqlQuery {
    type Output = WoqlQuery;

    /// Conjoins two queries; `a + b` reads as `a.and([b])`.
    fn add(mut self, rhs: WoqlQuery) -> WoqlQuery {
        let mut incoming = Vec::new();
        flatten_and(rhs.root, &mut incoming);
        if !incoming.is_empty() {
            self.conjoin(incoming);
        }
        self
    }
}

impl From<Query> for WoqlQuery {
    fn from(query: Query) -> Self {
        WoqlQuery::from_query(query)
    }
}
