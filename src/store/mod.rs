//! In-memory contribution store
//!
//! Holds the normalized notes of exactly one community. A scope change is a
//! whole-value replacement ([`ContributionStore::for_community`] builds the
//! new store, the session swaps it in); within a scope the store only grows.

use std::collections::HashMap;

use crate::model::Note;

#[derive(Debug, Default)]
pub struct ContributionStore {
    scope: Option<String>,
    notes: HashMap<String, Note>,
    // Server order of the bulk load, followed by cache-miss inserts
    order: Vec<String>,
}

impl ContributionStore {
    /// Store scoped to `community_id`, seeded with its bulk-loaded notes
    pub fn for_community(community_id: &str, notes: impl IntoIterator<Item = Note>) -> Self {
        let mut store = Self {
            scope: Some(community_id.to_string()),
            ..Default::default()
        };
        for note in notes {
            store.insert(note);
        }
        store
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn is_scoped_to(&self, community_id: &str) -> bool {
        self.scope.as_deref() == Some(community_id)
    }

    pub fn get(&self, note_id: &str) -> Option<&Note> {
        self.notes.get(note_id)
    }

    pub fn contains(&self, note_id: &str) -> bool {
        self.notes.contains_key(note_id)
    }

    /// Add or refresh a note; first-seen position is kept
    pub fn insert(&mut self, note: Note) {
        if !self.notes.contains_key(&note.id) {
            self.order.push(note.id.clone());
        }
        self.notes.insert(note.id.clone(), note);
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Notes in load order
    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.order.iter().filter_map(|id| self.notes.get(id))
    }

    /// Notes listing `author_id` among their authors
    pub fn by_author(&self, author_id: &str) -> HashMap<String, Note> {
        self.notes
            .values()
            .filter(|n| n.is_authored_by(author_id))
            .map(|n| (n.id.clone(), n.clone()))
            .collect()
    }
}
