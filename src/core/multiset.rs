use std::collections::{BTreeMap, HashMap};

use tracing::warn;

use crate::core::record::Record;

/// Occurrence counts per normalized RUT for one source file.
///
/// Aggregation is commutative: input order never affects the result.
/// Rows whose identifier normalized to the empty sentinel are not
/// counted; they are tallied as skipped so the run summary can report
/// them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RutMultiset {
    counts: HashMap<String, u32>,
    skipped: usize,
}

impl RutMultiset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of a normalized RUT. Empty identifiers are
    /// skipped and tallied.
    pub fn add(&mut self, rut: &str) {
        if rut.is_empty() {
            self.skipped += 1;
            return;
        }
        *self.counts.entry(rut.to_string()).or_insert(0) += 1;
    }

    /// Occurrences of `rut`, 0 when absent.
    pub fn count(&self, rut: &str) -> u32 {
        self.counts.get(rut).copied().unwrap_or(0)
    }

    pub fn contains(&self, rut: &str) -> bool {
        self.counts.contains_key(rut)
    }

    /// Distinct identifiers.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Number of distinct identifiers.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total counted rows (sum of all occurrence counts).
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| u64::from(c)).sum()
    }

    /// Rows dropped because their identifier was unusable.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<S: AsRef<str>> FromIterator<S> for RutMultiset {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for rut in iter {
            set.add(rut.as_ref());
        }
        set
    }
}

/// Source multisets partitioned by category tag.
///
/// Variants without categories live under the `None` key. `BTreeMap`
/// keeps category iteration order stable for reports.
#[derive(Debug, Clone, Default)]
pub struct CategorizedMultisets {
    by_category: BTreeMap<Option<String>, RutMultiset>,
}

impl CategorizedMultisets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from already-filtered records, logging a warning when rows
    /// had to be skipped.
    pub fn from_records<I>(records: I, source: &str) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        let mut sets = Self::new();
        for record in records {
            sets.add(record.category.clone(), &record.rut);
        }

        let skipped = sets.skipped();
        if skipped > 0 {
            warn!(source, skipped, "rows without a usable RUT were skipped");
        }
        sets
    }

    pub fn add(&mut self, category: Option<String>, rut: &str) {
        self.by_category.entry(category).or_default().add(rut);
    }

    pub fn get(&self, category: Option<&str>) -> Option<&RutMultiset> {
        self.by_category
            .get(&category.map(str::to_string))
            .filter(|s| !s.is_empty() || s.skipped() > 0)
    }

    pub fn categories(&self) -> impl Iterator<Item = Option<&str>> {
        self.by_category.keys().map(Option::as_deref)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Option<&str>, &RutMultiset)> {
        self.by_category.iter().map(|(k, v)| (k.as_deref(), v))
    }

    /// Skipped rows across all categories.
    pub fn skipped(&self) -> usize {
        self.by_category.values().map(RutMultiset::skipped).sum()
    }

    /// Counted rows across all categories.
    pub fn total(&self) -> u64 {
        self.by_category.values().map(RutMultiset::total).sum()
    }
}
