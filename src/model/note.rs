//! Note records and normalization

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::html::extract_text;

/// Note record as returned by KF6
#[derive(Debug, Clone, Deserialize)]
pub struct RawNote {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub note_type: String,
    pub authors: Vec<String>,
    pub title: String,
    pub text4search: String,
    #[serde(rename = "wordCount", default)]
    pub word_count: Option<usize>,
    pub status: String,
    pub created: DateTime<Utc>,
    pub data: RawNoteData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawNoteData {
    pub body: String,
    #[serde(default)]
    pub riseabove: Option<RiseAbove>,
}

/// Back-reference to the view a rise-above note was built from
#[derive(Debug, Clone, Deserialize)]
pub struct RiseAbove {
    #[serde(rename = "viewId", default)]
    pub view_id: Option<String>,
}

/// Normalized note held in the contribution store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Note {
    pub id: String,
    pub note_type: String,
    pub authors: Vec<String>,
    pub title: String,
    pub text4search: String,
    pub word_count: usize,
    pub status: String,
    pub created: DateTime<Utc>,
    /// Raw HTML body
    pub body: String,
    /// Set only on notes produced by rising above another view
    pub riseabove_view_id: Option<String>,
    pub processed_text: String,
}

impl Note {
    pub fn from_raw(raw: RawNote) -> Self {
        let processed_text = processed_text(&raw.data.body);
        let word_count = raw
            .word_count
            .unwrap_or_else(|| word_count(&processed_text));

        Self {
            id: raw.id,
            note_type: raw.note_type,
            authors: raw.authors,
            title: raw.title,
            text4search: raw.text4search,
            word_count,
            status: raw.status,
            created: raw.created,
            body: raw.data.body,
            riseabove_view_id: raw
                .data
                .riseabove
                .and_then(|r| r.view_id)
                .filter(|v| !v.is_empty()),
            processed_text,
        }
    }

    pub fn is_authored_by(&self, author_id: &str) -> bool {
        self.authors.iter().any(|a| a == author_id)
    }
}

/// Plain text of a note body: markup stripped, boundary newlines trimmed,
/// non-breaking spaces turned into spaces
pub fn processed_text(body: &str) -> String {
    extract_text(body).trim_matches('\n').replace('\u{a0}', " ")
}

/// Number of single-space separated pieces; empty text counts as one
pub fn word_count(text: &str) -> usize {
    text.split(' ').count()
}
