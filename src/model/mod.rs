//! KF6 records and their client-side projections

mod html;
mod note;

pub use html::extract_text;
pub use note::{processed_text, word_count, Note, RawNote, RawNoteData, RiseAbove};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Community the caller is registered in
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Community {
    pub id: String,
    pub title: String,
    pub created: DateTime<Utc>,
}

// Registration record from /api/users/myRegistrations
#[derive(Debug, Deserialize)]
pub(crate) struct Registration {
    #[serde(rename = "communityId")]
    community_id: String,
    #[serde(rename = "_community")]
    community: RegisteredCommunity,
    created: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct RegisteredCommunity {
    title: String,
}

impl From<Registration> for Community {
    fn from(r: Registration) -> Self {
        Self {
            id: r.community_id,
            title: r.community.title,
            created: r.created,
        }
    }
}

/// Canvas grouping notes through `contains` links
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    #[serde(rename = "type")]
    pub view_type: String,
    #[serde(skip_serializing)]
    pub(crate) status: String,
}

impl View {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

/// Succinct link projection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub from: String,
    pub to: String,
}

/// Link types accepted as a search filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkType {
    /// View displays a note
    Contains,
    /// Note builds on another contribution
    BuildsOn,
}

impl LinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Contains => "contains",
            LinkType::BuildsOn => "buildson",
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contains" => Ok(LinkType::Contains),
            "buildson" => Ok(LinkType::BuildsOn),
            other => Err(Error::Precondition(format!(
                "link type must be 'buildson' or 'contains', got '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_registration_projection() {
        let raw = json!({
            "communityId": "c1",
            "_community": {"title": "Grade 5 Science", "scaffolds": []},
            "created": "2021-02-03T04:05:06.000Z",
            "role": "writer"
        });
        let community: Community = serde_json::from_value::<Registration>(raw).unwrap().into();
        assert_eq!(community.id, "c1");
        assert_eq!(community.title, "Grade 5 Science");
        assert_eq!(community.created.to_rfc3339(), "2021-02-03T04:05:06+00:00");
    }

    #[test]
    fn test_view_status() {
        let view: View = serde_json::from_value(json!({
            "_id": "v1",
            "title": "Welcome",
            "created": "2021-02-03T04:05:06.000Z",
            "modified": "2021-02-04T04:05:06.000Z",
            "type": "View",
            "status": "unsaved"
        }))
        .unwrap();
        assert!(!view.is_active());
        assert_eq!(view.view_type, "View");
    }

    #[test]
    fn test_link_type_parsing() {
        assert_eq!("contains".parse::<LinkType>().unwrap(), LinkType::Contains);
        assert_eq!("buildson".parse::<LinkType>().unwrap(), LinkType::BuildsOn);
        assert!(matches!(
            "riseabove".parse::<LinkType>(),
            Err(Error::Precondition(_))
        ));
    }
}
