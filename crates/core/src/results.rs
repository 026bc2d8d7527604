//! Transient search and suggestion state, kept apart from the task collection.

use crate::model::SearchHit;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub hits: Vec<SearchHit>,
    /// Whether the result surface is showing.
    pub visible: bool,
}

/// Latest search results and suggestions. Each completed call replaces the
/// previous set wholesale.
#[derive(Debug, Clone, Default)]
pub struct ResultHolder {
    search: SearchResults,
    suggestions: Vec<String>,
}

impl ResultHolder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new result set and open the result surface.
    pub fn replace_search(&mut self, hits: Vec<SearchHit>) {
        self.search = SearchResults {
            hits,
            visible: true,
        };
    }

    pub fn close_search(&mut self) {
        self.search.visible = false;
    }

    pub fn replace_suggestions(&mut self, suggestions: Vec<String>) {
        self.suggestions = suggestions;
    }

    pub fn clear_suggestions(&mut self) {
        self.suggestions.clear();
    }

    pub fn search(&self) -> SearchResults {
        self.search.clone()
    }

    pub fn suggestions(&self) -> Vec<String> {
        self.suggestions.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskId;

    fn hit(id: &str, score: f64) -> SearchHit {
        SearchHit {
            id: TaskId::from(id),
            text: format!("task {id}"),
            score,
        }
    }

    #[test]
    fn search_replace_never_merges() {
        let mut holder = ResultHolder::new();
        holder.replace_search(vec![hit("1", 0.9), hit("2", 0.4)]);
        holder.replace_search(vec![hit("3", 0.7)]);

        let results = holder.search();
        assert!(results.visible);
        assert_eq!(results.hits, vec![hit("3", 0.7)]);
    }

    #[test]
    fn closing_keeps_last_hits() {
        let mut holder = ResultHolder::new();
        holder.replace_search(vec![hit("1", 0.9)]);
        holder.close_search();
        let results = holder.search();
        assert!(!results.visible);
        assert_eq!(results.hits.len(), 1);
    }

    #[test]
    fn suggestions_are_replaced_then_cleared() {
        let mut holder = ResultHolder::new();
        holder.replace_suggestions(vec!["a".into(), "b".into()]);
        holder.replace_suggestions(vec!["c".into()]);
        assert_eq!(holder.suggestions(), vec!["c".to_string()]);
        holder.clear_suggestions();
        assert!(holder.suggestions().is_empty());
    }
}
