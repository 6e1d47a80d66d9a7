use crate::types::SearchTerm;
use std::collections::VecDeque;
use tracing::debug;

/// Bounded list of distinct search terms, newest first.
#[derive(Debug, Clone)]
pub struct HistoryList {
    terms: VecDeque<SearchTerm>,
    limit: usize,
}

impl HistoryList {
    pub fn new(limit: usize) -> Self {
        Self {
            terms: VecDeque::with_capacity(limit),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.iter().any(|t| t.as_str() == term)
    }

    /// Prepend `term` and return whatever fell off the tail.
    /// A term that is already present is left where it is and nothing is evicted.
    pub fn push_front(&mut self, term: SearchTerm) -> Vec<SearchTerm> {
        if self.contains(term.as_str()) {
            return Vec::new();
        }

        self.terms.push_front(term);

        let mut evicted = Vec::new();
        while self.terms.len() > self.limit {
            if let Some(oldest) = self.terms.pop_back() {
                debug!("History full, dropping '{}'", oldest);
                evicted.push(oldest);
            }
        }
        evicted
    }

    pub fn get(&self, index: usize) -> Option<&SearchTerm> {
        self.terms.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SearchTerm> {
        self.terms.iter()
    }

    pub fn to_vec(&self) -> Vec<SearchTerm> {
        self.terms.iter().cloned().collect()
    }
}
