/// Maximum number of cities kept in the recent-search list.
pub const MAX_RECENT: usize = 5;

/// Bounded, deduplicated, most-recent-first list of searched city names.
///
/// Matching is exact and case-sensitive: "paris" and "Paris" are two entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentSearches {
    entries: Vec<String>,
}

impl RecentSearches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the list from persisted data, dropping blanks, duplicates and
    /// overflow.
    pub fn from_persisted(entries: Vec<String>) -> Self {
        let mut kept: Vec<String> = Vec::with_capacity(MAX_RECENT);
        for city in entries {
            if kept.len() == MAX_RECENT {
                break;
            }
            if !city.trim().is_empty() && !kept.contains(&city) {
                kept.push(city);
            }
        }
        Self { entries: kept }
    }

    /// Move `city` to the front, inserting it if absent.
    pub fn record(&mut self, city: &str) {
        self.entries.retain(|c| c != city);
        self.entries.insert(0, city.to_string());
        self.entries.truncate(MAX_RECENT);
    }

    pub fn list(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.entries.clone()
    }
}
