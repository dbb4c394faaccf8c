//! Note creation

use serde_json::{json, Value};
use tracing::info;

use super::Session;
use crate::error::{Error, Result};
use crate::model::word_count;

/// Canvas position given to newly linked notes
const DEFAULT_POSITION: (i64, i64) = (10, 10);

impl Session {
    /// Author id of the caller in `community_id`; remembered on the session
    pub async fn my_author_id(&mut self, community_id: &str) -> Result<String> {
        let value = self
            .get_json(&format!("/api/authors/{}/me", community_id))
            .await?;
        let author_id = record_id(&value, "author")?;
        self.author_id = Some(author_id.clone());
        Ok(author_id)
    }

    /// Create a note in `community_id` and place it on `view_id`
    ///
    /// Two requests, not transactional: if placing the note on the view
    /// fails, the note already exists on the server without a link and the
    /// error is returned as is. Returns the new note's id.
    pub async fn create_contribution(
        &mut self,
        community_id: &str,
        view_id: &str,
        title: &str,
        content: &str,
    ) -> Result<String> {
        let author_id = self.my_author_id(community_id).await?;

        let payload = note_payload(community_id, &author_id, title, content);
        let created = self
            .post_json(&format!("/api/contributions/{}", community_id), &payload)
            .await?;
        let note_id = record_id(&created, "contribution")?;

        self.post_json("/api/links/", &contains_link(view_id, &note_id))
            .await?;

        info!(community_id, view_id, note_id = %note_id, "contribution created");
        Ok(note_id)
    }
}

fn note_payload(community_id: &str, author_id: &str, title: &str, content: &str) -> Value {
    json!({
        "communityId": community_id,
        "type": "Note",
        "title": title,
        "authors": [author_id],
        "status": "active",
        "permission": "protected",
        "_groupMembers": [],
        "data": {
            "body": content,
        },
        "wordCount": word_count(content),
        "text4search": format!("( {} ) {} ()", title, content),
    })
}

fn contains_link(view_id: &str, note_id: &str) -> Value {
    let (x, y) = DEFAULT_POSITION;
    json!({
        "from": view_id,
        "to": note_id,
        "type": "contains",
        "data": {"x": x, "y": y},
    })
}

fn record_id(value: &Value, what: &str) -> Result<String> {
    value
        .get("_id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidResponse(format!("{} record has no _id", what)))
}
