//! Iteration context for one `each` pass.
//!
//! [`IterationState`] walks a result sequence once, reporting first/last
//! membership, and keeps the header memory used for change-triggered
//! headers. A new state is created for every `each` invocation.

use std::collections::HashMap;

use lineage_pages::Page;

/// Header name used when a header tag has no `name` attribute.
pub const DEFAULT_HEADER: &str = "unnamed";

/// Position of the current element within the pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    /// Zero-based index.
    pub index: usize,
    /// True exactly for index 0.
    pub is_first: bool,
    /// True exactly for the final index.
    pub is_last: bool,
}

/// Element yielded by [`IterationState::advance`].
#[derive(Clone, Debug)]
pub struct Visit {
    pub page: Page,
    pub position: Position,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    NotStarted,
    Iterating(usize),
    Finished,
}

/// State of a single pass over a result sequence.
///
/// # Example
///
/// ```
/// use lineage_tags::IterationState;
///
/// let mut state = IterationState::begin(Vec::new());
/// assert!(state.advance().is_none());
/// assert!(state.is_finished());
/// ```
#[derive(Debug)]
pub struct IterationState {
    results: Vec<Page>,
    phase: Phase,
    headers: HashMap<String, String>,
}

impl IterationState {
    /// Start a pass over `results`. Header memory starts empty.
    #[must_use]
    pub fn begin(results: Vec<Page>) -> Self {
        Self {
            results,
            phase: Phase::NotStarted,
            headers: HashMap::new(),
        }
    }

    /// Move to the next element.
    ///
    /// Returns `None` once the sequence is exhausted; the state then stays
    /// finished.
    pub fn advance(&mut self) -> Option<Visit> {
        let next = match self.phase {
            Phase::NotStarted => 0,
            Phase::Iterating(index) => index + 1,
            Phase::Finished => return None,
        };

        if next >= self.results.len() {
            self.phase = Phase::Finished;
            return None;
        }

        self.phase = Phase::Iterating(next);
        let position = self.position()?;
        Some(Visit {
            page: self.results[next].clone(),
            position,
        })
    }

    /// Element currently visited, if any.
    #[must_use]
    pub fn current(&self) -> Option<&Page> {
        match self.phase {
            Phase::Iterating(index) => self.results.get(index),
            Phase::NotStarted | Phase::Finished => None,
        }
    }

    /// Position of the element currently visited, if any.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        match self.phase {
            Phase::Iterating(index) => Some(Position {
                index,
                is_first: index == 0,
                is_last: index + 1 == self.results.len(),
            }),
            Phase::NotStarted | Phase::Finished => None,
        }
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.position().is_some_and(|p| p.is_first)
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.position().is_some_and(|p| p.is_last)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Number of elements in the pass.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Change-triggered header.
    ///
    /// Returns `rendered` if it differs from what the header `name` last
    /// emitted (or if it never emitted), remembering it; returns `None`
    /// otherwise. When the header emits, the memory of every header named
    /// in `restart` is cleared so they emit on their next occurrence.
    pub fn header(&mut self, name: &str, rendered: String, restart: &[&str]) -> Option<String> {
        if self.headers.get(name) == Some(&rendered) {
            tracing::trace!(header = name, "Header unchanged, suppressed");
            return None;
        }

        self.headers.insert(name.to_owned(), rendered.clone());
        for other in restart {
            if self.headers.remove(*other).is_some() {
                tracing::trace!(header = name, restarted = *other, "Header restarted");
            }
        }
        tracing::trace!(header = name, "Header emitted");
        Some(rendered)
    }
}

#[cfg(test)]
mod tests {
    use lineage_pages::{MemoryRepository, NewPage, PageRepository};

    use super::*;

    fn pages(slugs: &[&str]) -> Vec<Page> {
        let mut repo = MemoryRepository::new();
        slugs
            .iter()
            .map(|slug| {
                let id = repo.insert(NewPage::new(*slug));
                repo.page(id).unwrap().unwrap()
            })
            .collect()
    }

    #[test]
    fn test_advance_visits_in_order() {
        let mut state = IterationState::begin(pages(&["a", "b", "c"]));
        let mut seen = Vec::new();
        while let Some(visit) = state.advance() {
            seen.push((visit.page.slug, visit.position.index));
        }
        assert_eq!(
            seen,
            vec![("a".to_owned(), 0), ("b".to_owned(), 1), ("c".to_owned(), 2)]
        );
        assert!(state.is_finished());
        assert!(state.advance().is_none());
    }

    #[test]
    fn test_first_and_last_flags() {
        let mut state = IterationState::begin(pages(&["a", "b", "c"]));
        let flags: Vec<_> = std::iter::from_fn(|| state.advance())
            .map(|v| (v.position.is_first, v.position.is_last))
            .collect();
        assert_eq!(flags, vec![(true, false), (false, false), (false, true)]);
    }

    #[test]
    fn test_single_element_is_first_and_last() {
        let mut state = IterationState::begin(pages(&["only"]));
        let visit = state.advance().unwrap();
        assert!(visit.position.is_first);
        assert!(visit.position.is_last);
        assert!(state.is_first());
        assert!(state.is_last());
    }

    #[test]
    fn test_no_current_before_start_or_after_finish() {
        let mut state = IterationState::begin(pages(&["a"]));
        assert!(state.current().is_none());
        assert!(!state.is_first());
        state.advance();
        assert_eq!(state.current().map(|p| p.slug.as_str()), Some("a"));
        state.advance();
        assert!(state.current().is_none());
        assert!(!state.is_last());
    }

    #[test]
    fn test_header_emits_only_on_change() {
        let mut state = IterationState::begin(Vec::new());
        let emitted: Vec<_> = ["Dec", "Feb", "Feb", "Mar", "Mar"]
            .into_iter()
            .map(|text| state.header(DEFAULT_HEADER, text.to_owned(), &[]))
            .collect();
        assert_eq!(
            emitted,
            vec![
                Some("Dec".to_owned()),
                Some("Feb".to_owned()),
                None,
                Some("Mar".to_owned()),
                None
            ]
        );
    }

    #[test]
    fn test_named_headers_are_independent() {
        let mut state = IterationState::begin(Vec::new());
        assert!(state.header("year", "2001".to_owned(), &[]).is_some());
        assert!(state.header("month", "Feb".to_owned(), &[]).is_some());
        assert!(state.header("year", "2001".to_owned(), &[]).is_none());
        assert!(state.header("month", "Feb".to_owned(), &[]).is_none());
    }

    #[test]
    fn test_restart_clears_other_header() {
        let mut state = IterationState::begin(Vec::new());
        state.header("year", "2000".to_owned(), &["month"]);
        state.header("month", "Jun".to_owned(), &[]);

        // Same month in a new year still re-renders
        assert!(state.header("year", "2001".to_owned(), &["month"]).is_some());
        assert_eq!(state.header("month", "Jun".to_owned(), &[]), Some("Jun".to_owned()));
    }

    #[test]
    fn test_restart_only_when_header_changes() {
        let mut state = IterationState::begin(Vec::new());
        state.header("year", "2000".to_owned(), &["month"]);
        state.header("month", "Jun".to_owned(), &[]);

        assert!(state.header("year", "2000".to_owned(), &["month"]).is_none());
        assert!(state.header("month", "Jun".to_owned(), &[]).is_none());
    }
}
