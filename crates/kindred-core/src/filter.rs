//! Search, category/tag filtering and bookmark bucketing for the directory.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;

use kindred_types::models::{BookmarkMark, Category, Entry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(Self::All),
            other => other.parse().map(Self::Only),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Catalog insertion order.
    #[default]
    Default,
    NameAsc,
    NameDesc,
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "default" => Ok(Self::Default),
            "az" | "name-asc" => Ok(Self::NameAsc),
            "za" | "name-desc" => Ok(Self::NameDesc),
            other => Err(format!("unknown sort mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterQuery {
    pub search: String,
    pub category: CategoryFilter,
    /// Entries must carry every tag in the set.
    pub tags: BTreeSet<String>,
    pub sort: SortMode,
}

impl FilterQuery {
    fn matches_category(&self, entry: &Entry) -> bool {
        match self.category {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => entry.category == c,
        }
    }
}

/// Filtered entries split by the viewer's bookmark mark.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Buckets<'a> {
    pub loved: Vec<&'a Entry>,
    pub liked: Vec<&'a Entry>,
    pub other: Vec<&'a Entry>,
}

impl Buckets<'_> {
    pub fn len(&self) -> usize {
        self.loved.len() + self.liked.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Filter `entries` by `query` and partition survivors by `marks`.
pub fn filter_entries<'a>(
    entries: &'a [Entry],
    query: &FilterQuery,
    marks: &HashMap<u32, BookmarkMark>,
) -> Buckets<'a> {
    let needle = normalize_search(&query.search);
    let mut buckets = Buckets::default();

    for entry in entries {
        if !matches_search(entry, &needle)
            || !query.matches_category(entry)
            || !query.tags.iter().all(|t| entry.has_tag(t))
        {
            continue;
        }

        match marks.get(&entry.id) {
            Some(BookmarkMark::Loved) => buckets.loved.push(entry),
            Some(BookmarkMark::Liked) => buckets.liked.push(entry),
            None => buckets.other.push(entry),
        }
    }

    sort_entries(&mut buckets.loved, query.sort);
    sort_entries(&mut buckets.liked, query.sort);
    sort_entries(&mut buckets.other, query.sort);

    buckets
}

/// Stable, case-insensitive sort by name. `Default` leaves order untouched.
pub fn sort_entries(entries: &mut [&Entry], sort: SortMode) {
    match sort {
        SortMode::Default => {}
        SortMode::NameAsc => entries.sort_by(|a, b| compare_names(a, b)),
        SortMode::NameDesc => entries.sort_by(|a, b| compare_names(b, a)),
    }
}

fn compare_names(a: &Entry, b: &Entry) -> Ordering {
    a.name.to_lowercase().cmp(&b.name.to_lowercase())
}

fn normalize_search(search: &str) -> String {
    search.trim().to_lowercase()
}

fn matches_search(entry: &Entry, needle: &str) -> bool {
    needle.is_empty()
        || entry.name.to_lowercase().contains(needle)
        || entry.description.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u32, name: &str, category: Category, tags: &[&str]) -> Entry {
        Entry {
            id,
            name: name.to_string(),
            category,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            description: format!("About {}", name.to_lowercase()),
            subcategory: None,
        }
    }

    fn catalog() -> Vec<Entry> {
        vec![
            entry(1, "Oxytocin Ritual", Category::Rituals, &["touch", "daily"]),
            entry(2, "Stonewalling", Category::Conflict, &["gottman"]),
            entry(3, "Bid for Connection", Category::Communication, &["gottman", "daily"]),
            entry(4, "Aftercare", Category::Intimacy, &["touch"]),
            entry(5, "Repair Attempt", Category::Conflict, &["gottman", "daily"]),
        ]
    }

    fn names(entries: &[&Entry]) -> Vec<String> {
        entries.iter().map(|e| e.name.clone()).collect()
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let entries = catalog();
        for search in ["oxy", "OXY", "  oXy  "] {
            let query = FilterQuery { search: search.into(), ..Default::default() };
            let buckets = filter_entries(&entries, &query, &HashMap::new());
            assert_eq!(names(&buckets.other), vec!["Oxytocin Ritual"], "search {:?}", search);
        }
    }

    #[test]
    fn search_matches_description() {
        let entries = catalog();
        let query = FilterQuery { search: "about after".into(), ..Default::default() };
        let buckets = filter_entries(&entries, &query, &HashMap::new());
        assert_eq!(names(&buckets.other), vec!["Aftercare"]);
    }

    #[test]
    fn empty_search_passes_everything() {
        let entries = catalog();
        let query = FilterQuery { search: "   ".into(), ..Default::default() };
        assert_eq!(filter_entries(&entries, &query, &HashMap::new()).len(), entries.len());
    }

    #[test]
    fn category_is_exact() {
        let entries = catalog();
        let query = FilterQuery {
            category: CategoryFilter::Only(Category::Conflict),
            ..Default::default()
        };
        let buckets = filter_entries(&entries, &query, &HashMap::new());
        assert_eq!(names(&buckets.other), vec!["Stonewalling", "Repair Attempt"]);
    }

    #[test]
    fn tags_use_and_semantics() {
        let entries = catalog();
        let query = FilterQuery {
            tags: ["gottman", "daily"].iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        };
        let buckets = filter_entries(&entries, &query, &HashMap::new());
        assert_eq!(names(&buckets.other), vec!["Bid for Connection", "Repair Attempt"]);
    }

    #[test]
    fn adding_tags_never_grows_result() {
        let entries = catalog();
        let mut query = FilterQuery::default();
        let mut previous = filter_entries(&entries, &query, &HashMap::new()).len();

        for tag in ["daily", "gottman", "touch", "missing"] {
            query.tags.insert(tag.to_string());
            let now = filter_entries(&entries, &query, &HashMap::new()).len();
            assert!(now <= previous, "adding {} grew {} -> {}", tag, previous, now);
            previous = now;
        }
        assert_eq!(previous, 0);
    }

    #[test]
    fn buckets_partition_filtered_set() {
        let entries = catalog();
        let marks = HashMap::from([
            (1, BookmarkMark::Loved),
            (2, BookmarkMark::Liked),
            (5, BookmarkMark::Loved),
            // not in the catalog; must not appear anywhere
            (99, BookmarkMark::Liked),
        ]);
        let query = FilterQuery::default();
        let buckets = filter_entries(&entries, &query, &marks);

        assert_eq!(names(&buckets.loved), vec!["Oxytocin Ritual", "Repair Attempt"]);
        assert_eq!(names(&buckets.liked), vec!["Stonewalling"]);
        assert_eq!(names(&buckets.other), vec!["Bid for Connection", "Aftercare"]);

        let mut ids: Vec<u32> = buckets
            .loved
            .iter()
            .chain(&buckets.liked)
            .chain(&buckets.other)
            .map(|e| e.id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn sort_descending_ignores_case() {
        let entries = vec![
            entry(1, "Apple", Category::Rituals, &[]),
            entry(2, "banana", Category::Rituals, &[]),
            entry(3, "Cherry", Category::Rituals, &[]),
        ];
        let query = FilterQuery { sort: SortMode::NameDesc, ..Default::default() };
        let buckets = filter_entries(&entries, &query, &HashMap::new());
        assert_eq!(names(&buckets.other), vec!["Cherry", "banana", "Apple"]);

        let query = FilterQuery { sort: SortMode::NameAsc, ..Default::default() };
        let buckets = filter_entries(&entries, &query, &HashMap::new());
        assert_eq!(names(&buckets.other), vec!["Apple", "banana", "Cherry"]);
    }

    #[test]
    fn sort_is_stable_for_equal_names() {
        let entries = vec![
            entry(1, "echo", Category::Rituals, &[]),
            entry(2, "Echo", Category::Rituals, &[]),
            entry(3, "alpha", Category::Rituals, &[]),
        ];
        let query = FilterQuery { sort: SortMode::NameAsc, ..Default::default() };
        let buckets = filter_entries(&entries, &query, &HashMap::new());
        let ids: Vec<u32> = buckets.other.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn parses_filter_params() {
        assert_eq!("all".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "conflict".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Only(Category::Conflict)
        );
        assert!("nope".parse::<CategoryFilter>().is_err());
        assert_eq!("za".parse::<SortMode>().unwrap(), SortMode::NameDesc);
        assert_eq!("".parse::<SortMode>().unwrap(), SortMode::Default);
    }
}
