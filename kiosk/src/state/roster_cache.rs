//! # Roster Cache
//!
//! In-memory snapshot of every student, keyed by card id. The backend is the
//! source of truth: the cache is replaced wholesale on every refresh and only
//! patched in place by the optimistic check-in and point operations.

use shared::{QuickMap, StudentRecord};
use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub struct RosterCache {
    students: HashMap<String, StudentRecord>,
    loaded: bool,
}

impl RosterCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_quick_map(map: QuickMap) -> Self {
        let mut cache = Self::new();
        cache.replace(map);
        cache
    }

    /// Replace the whole cache with a fresh quick map
    pub fn replace(&mut self, map: QuickMap) {
        self.replace_records(map.into_iter().map(|(id, entry)| entry.into_record(id)));
    }

    pub fn replace_records(&mut self, records: impl IntoIterator<Item = StudentRecord>) {
        self.students = records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        self.loaded = true;
    }

    /// Whether at least one refresh has completed
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&StudentRecord> {
        self.students.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut StudentRecord> {
        self.students.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.students.contains_key(id)
    }

    pub fn insert(&mut self, record: StudentRecord) {
        self.students.insert(record.id.clone(), record);
    }

    pub fn iter(&self) -> impl Iterator<Item = &StudentRecord> {
        self.students.values()
    }

    /// Case-insensitive substring match on name or id; empty query returns everyone
    pub fn search(&self, query: &str) -> Vec<StudentRecord> {
        let query = query.trim().to_lowercase();
        let mut matches: Vec<StudentRecord> = self
            .students
            .values()
            .filter(|s| {
                query.is_empty()
                    || s.name.to_lowercase().contains(&query)
                    || s.id.to_lowercase().contains(&query)
            })
            .cloned()
            .collect();

        matches.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        matches
    }

    /// Exact card match, as used by reader lookups
    pub fn find_by_card(&self, id: &str) -> Option<StudentRecord> {
        self.students.get(id.trim()).cloned()
    }
}
