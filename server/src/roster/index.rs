use rand::seq::SliceRandom;
use shared::{EntityId, EntitySummary, MAX_SEARCH_LIMIT};
use std::collections::HashSet;

#[derive(Debug, Clone)]
struct IndexEntry {
    /// Lowercased name used for matching
    key: String,
    summary: EntitySummary,
}

/// Searchable, read-only view over one roster generation
#[derive(Debug, Clone, Default)]
pub struct RosterIndex {
    entries: Vec<IndexEntry>,
}

impl RosterIndex {
    /// Builds the index, keeping the first entry per id and ordering by name
    pub fn build(summaries: Vec<EntitySummary>) -> Self {
        let mut seen = HashSet::new();
        let mut entries: Vec<IndexEntry> = summaries
            .into_iter()
            .filter(|summary| !summary.name.trim().is_empty() && seen.insert(summary.id))
            .map(|summary| IndexEntry {
                key: summary.name.to_lowercase(),
                summary,
            })
            .collect();

        entries.sort_by(|a, b| {
            a.summary
                .name
                .cmp(&b.summary.name)
                .then(a.summary.id.cmp(&b.summary.id))
        });

        Self { entries }
    }

    /// Case-insensitive substring match over names, in index order
    pub fn search(&self, query: &str, limit: usize) -> Vec<EntitySummary> {
        let needle = query.trim().to_lowercase();
        let limit = limit.clamp(1, MAX_SEARCH_LIMIT);

        self.entries
            .iter()
            .filter(|entry| entry.key.contains(&needle))
            .take(limit)
            .map(|entry| entry.summary.clone())
            .collect()
    }

    /// Uniformly selected entry
    pub fn random(&self) -> Option<&EntitySummary> {
        self.entries
            .choose(&mut rand::thread_rng())
            .map(|entry| &entry.summary)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entries.iter().any(|entry| entry.summary.id == id)
    }

    /// Copy of this index without `id`
    pub fn without(&self, id: EntityId) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|entry| entry.summary.id != id)
                .cloned()
                .collect(),
        }
    }

    pub fn summaries(&self) -> impl Iterator<Item = &EntitySummary> {
        self.entries.iter().map(|entry| &entry.summary)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: u32, name: &str) -> EntitySummary {
        EntitySummary {
            id,
            name: name.to_string(),
            team: "LAL".to_string(),
            image_url: None,
        }
    }

    fn index() -> RosterIndex {
        RosterIndex::build(vec![
            summary(3, "LeBron James"),
            summary(1, "James Harden"),
            summary(2, "Bronny James"),
            summary(4, "Stephen Curry"),
            summary(1, "James Harden (duplicate)"),
            summary(9, "  "),
        ])
    }

    #[test]
    fn test_build_sorts_and_dedups() {
        let index = index();
        assert_eq!(index.len(), 4);

        let names: Vec<&str> = index.summaries().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Bronny James", "James Harden", "LeBron James", "Stephen Curry"]
        );
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let results = index().search("JAMES", 10);
        let ids: Vec<u32> = results.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);

        let results = index().search("curr", 10);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 4);
    }

    #[test]
    fn test_search_respects_limit() {
        assert_eq!(index().search("james", 2).len(), 2);
        // A zero limit is clamped up to one result
        assert_eq!(index().search("james", 0).len(), 1);
    }

    #[test]
    fn test_random_draws_from_index() {
        let index = index();
        for _ in 0..20 {
            let pick = index.random().unwrap();
            assert!(index.summaries().any(|s| s.id == pick.id));
        }
        assert!(RosterIndex::default().random().is_none());
    }

    #[test]
    fn test_without_drops_one_player() {
        let index = index();
        assert!(index.contains(3));

        let trimmed = index.without(3);
        assert!(!trimmed.contains(3));
        assert_eq!(trimmed.len(), 3);
        assert!(trimmed.search("lebron", 10).is_empty());
        assert_eq!(index.len(), 4);
    }
}
