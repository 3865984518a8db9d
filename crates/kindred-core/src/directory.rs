//! Directory view state: the query the buckets are computed from, with
//! search text debounced and every other control applied immediately.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use kindred_types::models::BookmarkMark;
use tracing::debug;

use crate::catalog::Catalog;
use crate::filter::{Buckets, CategoryFilter, FilterQuery, SortMode, filter_entries};

pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Holds back typed text until no new input has arrived for `delay`.
/// Time is passed in so callers and tests control the clock.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    /// Record new input, restarting the delay.
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        self.pending = Some((text.into(), now));
    }

    /// Returns the pending text once the delay has elapsed since the last input.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, at)) if now.saturating_duration_since(*at) >= self.delay => {
                self.pending.take().map(|(text, _)| text)
            }
            _ => None,
        }
    }

    /// Take pending text regardless of the delay.
    pub fn flush(&mut self) -> Option<String> {
        self.pending.take().map(|(text, _)| text)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DEBOUNCE)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DirectoryView {
    query: FilterQuery,
    debouncer: SearchDebouncer,
}

impl DirectoryView {
    pub fn new(debounce: Duration) -> Self {
        Self {
            query: FilterQuery::default(),
            debouncer: SearchDebouncer::new(debounce),
        }
    }

    /// The query the buckets are currently computed from.
    pub fn query(&self) -> &FilterQuery {
        &self.query
    }

    pub fn is_search_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn set_search(&mut self, text: impl Into<String>, now: Instant) {
        self.debouncer.input(text, now);
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.query.category = category;
    }

    /// Add the tag to the required set, or remove it if already present.
    pub fn toggle_tag(&mut self, tag: &str) {
        if !self.query.tags.remove(tag) {
            self.query.tags.insert(tag.to_string());
        }
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        self.query.sort = sort;
    }

    pub fn clear_filters(&mut self) {
        self.debouncer.flush();
        self.query = FilterQuery::default();
    }

    /// Apply debounced search text if due. Returns true if the query changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(text) if text != self.query.search => {
                debug!("Applying debounced search {:?}", text);
                self.query.search = text;
                true
            }
            _ => false,
        }
    }

    pub fn buckets<'a>(
        &self,
        catalog: &'a Catalog,
        marks: &HashMap<u32, BookmarkMark>,
    ) -> Buckets<'a> {
        filter_entries(catalog.entries(), &self.query, marks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kindred_types::models::{Category, Entry};

    fn catalog() -> Catalog {
        let entry = |id: u32, name: &str, category: Category, tag: &str| Entry {
            id,
            name: name.to_string(),
            category,
            tags: [tag.to_string()].into_iter().collect(),
            description: String::new(),
            subcategory: None,
        };
        Catalog::new(
            "test",
            vec![
                entry(1, "Love Map", Category::Communication, "gottman"),
                entry(2, "Love Language", Category::Communication, "chapman"),
                entry(3, "Flooding", Category::Conflict, "gottman"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn debouncer_waits_for_quiet_period() {
        let start = Instant::now();
        let mut d = SearchDebouncer::new(Duration::from_millis(300));

        d.input("l", start);
        d.input("lo", start + Duration::from_millis(100));
        assert_eq!(d.poll(start + Duration::from_millis(350)), None);
        assert_eq!(d.poll(start + Duration::from_millis(400)).as_deref(), Some("lo"));
        assert_eq!(d.poll(start + Duration::from_millis(900)), None);
    }

    #[test]
    fn search_is_applied_only_after_tick() {
        let catalog = catalog();
        let start = Instant::now();
        let mut view = DirectoryView::new(DEFAULT_SEARCH_DEBOUNCE);

        view.set_search("love", start);
        assert!(view.is_search_pending());
        assert_eq!(view.buckets(&catalog, &HashMap::new()).len(), 3);

        assert!(!view.tick(start + Duration::from_millis(299)));
        assert!(view.tick(start + Duration::from_millis(300)));
        assert_eq!(view.query().search, "love");
        assert_eq!(view.buckets(&catalog, &HashMap::new()).len(), 2);
    }

    #[test]
    fn other_controls_apply_immediately() {
        let catalog = catalog();
        let mut view = DirectoryView::default();

        view.toggle_tag("gottman");
        assert_eq!(view.buckets(&catalog, &HashMap::new()).len(), 2);

        view.set_category(CategoryFilter::Only(Category::Conflict));
        let buckets = view.buckets(&catalog, &HashMap::new());
        assert_eq!(buckets.other.iter().map(|e| e.id).collect::<Vec<_>>(), vec![3]);

        view.toggle_tag("gottman");
        assert!(view.query().tags.is_empty());

        view.set_category(CategoryFilter::All);
        view.set_sort(SortMode::NameAsc);
        let buckets = view.buckets(&catalog, &HashMap::new());
        assert_eq!(buckets.other.iter().map(|e| e.id).collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[test]
    fn clear_drops_pending_search() {
        let mut view = DirectoryView::default();
        view.set_search("x", Instant::now());
        view.toggle_tag("a");
        view.clear_filters();
        assert!(!view.is_search_pending());
        assert_eq!(view.query(), &FilterQuery::default());
    }
}
