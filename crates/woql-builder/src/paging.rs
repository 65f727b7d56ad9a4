//! Paging helpers over the `Limit`/`Start` wrappers of a built query.
use tracing::debug;
use woql_ast::prelude::*;

use crate::builder::WoqlQuery;

/// Wrappers a paging lookup may descend through.
fn is_paging_transitive(query: &Query) -> bool {
    matches!(
        query,
        Query::Select(_)
            | Query::Distinct(_)
            | Query::From(_)
            | Query::Using(_)
            | Query::Start(_)
            | Query::Limit(_)
            | Query::WoqlOptional(_)
            | Query::OrderBy(_)
    )
}

fn is_limit(query: &Query) -> bool {
    matches!(query, Query::Limit(_))
}

fn is_start(query: &Query) -> bool {
    matches!(query, Query::Start(_))
}

fn is_select(query: &Query) -> bool {
    matches!(query, Query::Select(_))
}

impl WoqlQuery {
    /// Path from the root to the first node matching `target`, following only
    /// paging-transitive wrappers.
    fn locate(&self, target: fn(&Query) -> bool) -> Option<Vec<Step>> {
        let mut node = &self.root;
        let mut path = Vec::new();
        loop {
            if target(node) {
                return Some(path);
            }
            if !is_paging_transitive(node) {
                return None;
            }
            node = node.subquery()?;
            path.push(Step::Sub);
        }
    }

    fn located_mut(&mut self, target: fn(&Query) -> bool) -> Option<&mut Query> {
        let path = self.locate(target)?;
        self.root.descend_mut(&path)
    }

    fn missing(helper: &'static str, required: &'static str) -> WoqlError {
        WoqlError::MissingOperator { helper, required }
    }

    pub fn get_limit(&self) -> Option<u64> {
        let path = self.locate(is_limit)?;
        match self.root.descend(&path)? {
            Query::Limit(limit) => Some(limit.limit),
            _ => None,
        }
    }

    /// Replaces the size of the outermost reachable `Limit`.
    pub fn set_limit(mut self, limit: u64) -> WoqlResult<Self> {
        match self.located_mut(is_limit) {
            Some(Query::Limit(node)) => node.limit = limit,
            _ => return Err(Self::missing("set_limit", "Limit")),
        }
        Ok(self)
    }

    pub fn is_paged(&self) -> bool {
        self.locate(is_limit).is_some()
    }

    pub fn has_start(&self) -> bool {
        self.locate(is_start).is_some()
    }

    pub fn get_start(&self) -> Option<u64> {
        let path = self.locate(is_start)?;
        match self.root.descend(&path)? {
            Query::Start(start) => Some(start.start),
            _ => None,
        }
    }

    /// Sets the offset, wrapping the whole query in `Start` when none is reachable.
    pub fn set_start(mut self, start: u64) -> Self {
        match self.located_mut(is_start) {
            Some(Query::Start(node)) => node.start = start,
            _ => self.wrap_root(|query| Query::Start(Start { start, query })),
        }
        self
    }

    /// Adds `offset` to the current start, or wraps the whole query in
    /// `Start(offset, ..)` when none is reachable.
    pub fn add_start(mut self, offset: u64) -> Self {
        match self.located_mut(is_start) {
            Some(Query::Start(node)) => node.start = node.start.saturating_add(offset),
            _ => self.wrap_root(|query| Query::Start(Start { start: offset, query })),
        }
        self
    }

    fn paging(&self, helper: &'static str) -> WoqlResult<(u64, u64)> {
        let limit = self
            .get_limit()
            .ok_or_else(|| Self::missing(helper, "Limit"))?;
        let start = self
            .get_start()
            .ok_or_else(|| Self::missing(helper, "Start"))?;
        Ok((limit, start))
    }

    /// The 1-based page the current offset falls on.
    pub fn get_page(&self) -> WoqlResult<u64> {
        let (limit, start) = self.paging("get_page")?;
        if limit == 0 {
            return Ok(1);
        }
        Ok(start / limit + 1)
    }

    /// Moves the offset to the first row of `page`. Page 0 reads as page 1.
    pub fn set_page(self, page: u64) -> WoqlResult<Self> {
        let limit = self
            .get_limit()
            .ok_or_else(|| Self::missing("set_page", "Limit"))?;
        let start = page.saturating_sub(1).saturating_mul(limit);
        debug!(page, limit, start, "setting page");
        if self.has_start() {
            Ok(self.set_start(start))
        } else {
            Ok(self.add_start(start))
        }
    }

    pub fn next_page(self) -> WoqlResult<Self> {
        let (limit, start) = self.paging("next_page")?;
        Ok(self.set_start(start.saturating_add(limit)))
    }

    pub fn previous_page(self) -> WoqlResult<Self> {
        let (limit, start) = self.paging("previous_page")?;
        Ok(self.set_start(start.saturating_sub(limit)))
    }

    pub fn first_page(self) -> WoqlResult<Self> {
        self.set_page(1)
    }

    /// Changes the page size while staying on the same page number.
    pub fn set_page_size(self, size: u64) -> WoqlResult<Self> {
        if !self.is_paged() {
            return Err(Self::missing("set_page_size", "Limit"));
        }
        if !self.has_start() {
            return self.set_limit(size);
        }
        let page = self.get_page()?;
        self.set_limit(size)?.set_page(page)
    }

    pub fn has_select(&self) -> bool {
        self.locate(is_select).is_some()
    }

    /// Variables of the outermost reachable `Select`, without the `v:` prefix.
    pub fn get_select_variables(&self) -> Option<&[String]> {
        let path = self.locate(is_select)?;
        match self.root.descend(&path)? {
            Query::Select(select) => Some(&select.variables),
            _ => None,
        }
    }
}
