//! Task search.
//!
//! Searchers decide whether a task is visible for a query; the board
//! projection hides tasks that no searcher matches.

use crate::Task;

pub trait TaskSearcher {
    fn matches(&self, task: &Task) -> bool;
}

/// Case-insensitive substring match on the title.
pub struct TitleSearcher {
    query: String,
}

impl TitleSearcher {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into().to_lowercase(),
        }
    }
}

impl TaskSearcher for TitleSearcher {
    fn matches(&self, task: &Task) -> bool {
        self.query.is_empty() || task.title.to_lowercase().contains(&self.query)
    }
}

/// Case-insensitive substring match on the description.
pub struct DescriptionSearcher {
    query: String,
}

impl DescriptionSearcher {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into().to_lowercase(),
        }
    }
}

impl TaskSearcher for DescriptionSearcher {
    fn matches(&self, task: &Task) -> bool {
        self.query.is_empty() || task.description.to_lowercase().contains(&self.query)
    }
}

pub enum SearchBy {
    Title(TitleSearcher),
    Description(DescriptionSearcher),
}

impl TaskSearcher for SearchBy {
    fn matches(&self, task: &Task) -> bool {
        match self {
            Self::Title(s) => s.matches(task),
            Self::Description(s) => s.matches(task),
        }
    }
}

/// Matches when any inner searcher matches. With no searchers every task
/// matches.
#[derive(Default)]
pub struct CompositeSearcher {
    searchers: Vec<SearchBy>,
}

impl CompositeSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Title or description. An empty query matches everything.
    pub fn all(query: impl Into<String>) -> Self {
        let query = query.into();
        if query.is_empty() {
            return Self::new();
        }
        Self {
            searchers: vec![
                SearchBy::Title(TitleSearcher::new(query.clone())),
                SearchBy::Description(DescriptionSearcher::new(query)),
            ],
        }
    }

    pub fn with_search(mut self, searcher: SearchBy) -> Self {
        self.searchers.push(searcher);
        self
    }
}

impl TaskSearcher for CompositeSearcher {
    fn matches(&self, task: &Task) -> bool {
        self.searchers.is_empty() || self.searchers.iter().any(|s| s.matches(task))
    }
}
