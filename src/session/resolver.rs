//! View graph resolution
//!
//! A view's notes are the targets of its `contains` links. A rise-above
//! note points back at the view it summarizes, so resolving a view pulls in
//! those views too: direct notes first, then each discovered sub-view in
//! discovery order, each fully expanded before the next.

use serde_json::{json, Value};
use std::collections::{HashSet, VecDeque};
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, info, warn};

use super::{records, Session};
use crate::error::{Error, Result};
use crate::model::{Link, Note, RawNote};

type ResolveFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<Note>>> + Send + 'a>>;

impl Session {
    /// Every note reachable from `view_id`, flattened
    ///
    /// Order: the view's `contains` targets as the server returns them,
    /// then the notes of each rise-above sub-view in the order those
    /// sub-views were discovered. Fails with [`Error::Cycle`] when a
    /// rise-above chain leads back to a view still being expanded.
    pub async fn notes_from_view(&mut self, community_id: &str, view_id: &str) -> Result<Vec<Note>> {
        let mut expanding = HashSet::new();
        self.expand_view(community_id, view_id, &mut expanding).await
    }

    fn expand_view<'a>(
        &'a mut self,
        community_id: &'a str,
        view_id: &'a str,
        expanding: &'a mut HashSet<String>,
    ) -> ResolveFuture<'a> {
        Box::pin(async move {
            if !expanding.insert(view_id.to_string()) {
                warn!(view_id, "rise-above cycle");
                return Err(Error::Cycle {
                    view_id: view_id.to_string(),
                });
            }

            self.load_contributions(community_id).await?;

            let mut notes = Vec::new();
            let mut riseaboves = VecDeque::new();
            for note_id in self.contained_note_ids(community_id, view_id).await? {
                let note = self.cached_or_fetch(&note_id).await?;
                if let Some(sub_view) = &note.riseabove_view_id {
                    riseaboves.push_back(sub_view.clone());
                }
                notes.push(note);
            }

            while let Some(sub_view) = riseaboves.pop_front() {
                let sub_notes = self
                    .expand_view(community_id, &sub_view, expanding)
                    .await?;
                notes.extend(sub_notes);
            }

            expanding.remove(view_id);
            Ok(notes)
        })
    }

    /// Targets of the active `contains` links leaving `view_id`
    async fn contained_note_ids(&self, community_id: &str, view_id: &str) -> Result<Vec<String>> {
        let body = json!({
            "query": {
                "type": "contains",
                "from": view_id,
                "_to.type": "Note",
                "_to.status": "active",
            }
        });
        let value = self
            .post_json(&format!("/api/links/{}/search", community_id), &body)
            .await?;

        let title = value
            .pointer("/0/_from/title")
            .and_then(Value::as_str)
            .unwrap_or("-")
            .to_string();
        let links: Vec<Link> = records(value)?;
        info!(view_id, title = %title, notes = links.len(), "resolving view");

        Ok(links.into_iter().map(|l| l.to).collect())
    }

    /// Note from the store, fetched and cached when the bulk load missed it
    async fn cached_or_fetch(&mut self, note_id: &str) -> Result<Note> {
        if let Some(note) = self.store.get(note_id) {
            return Ok(note.clone());
        }

        debug!(note_id, "cache miss");
        let value = self.get_json(&format!("/api/objects/{}", note_id)).await?;
        let raw: RawNote = serde_json::from_value(value)?;
        let note = Note::from_raw(raw);
        self.store.insert(note.clone());
        Ok(note)
    }
}
