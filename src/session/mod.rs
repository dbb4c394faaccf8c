//! Authenticated KF6 session
//!
//! A [`Session`] owns the bearer token and the contribution store. Every
//! operation that may touch the store takes `&mut self`: one owner drives a
//! session at a time, and a community switch replaces the store in a single
//! assignment once the new community's notes are fully loaded. Share a
//! session across tasks by wrapping it in a `tokio::sync::Mutex`.

mod contribution;
mod resolver;

use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{Community, Link, LinkType, Note, RawNote, Registration, View};
use crate::store::ContributionStore;
use crate::transport::{HttpTransport, Transport};

pub struct Session {
    transport: Arc<dyn Transport>,
    token: String,
    author_id: Option<String>,
    store: ContributionStore,
}

impl Session {
    /// Log in to the KF6 server at `url`
    pub async fn login(url: &str, username: &str, password: &str) -> Result<Self> {
        let transport = HttpTransport::new(url)?;
        Self::with_transport(Arc::new(transport), username, password).await
    }

    /// Log in with the server and credentials sections of `config`
    pub async fn from_config(config: &Config) -> Result<Self> {
        let credentials = config
            .credentials
            .as_ref()
            .ok_or_else(|| Error::Config("no credentials configured".to_string()))?;
        let transport = HttpTransport::from_config(&config.server)?;
        Self::with_transport(
            Arc::new(transport),
            &credentials.username,
            &credentials.password,
        )
        .await
    }

    /// Log in through a caller-supplied transport
    pub async fn with_transport(
        transport: Arc<dyn Transport>,
        username: &str,
        password: &str,
    ) -> Result<Self> {
        let body = json!({
            "userName": username,
            "password": password,
        });
        let response = transport.post("/auth/local", &body, None).await?;

        if !response.is_success() {
            return Err(Error::Authentication {
                status: response.status,
                message: response.message(),
            });
        }

        let token = response
            .body
            .get("token")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::InvalidResponse("login response has no token".to_string()))?
            .to_string();

        info!(username, "logged in");

        Ok(Self {
            transport,
            token,
            author_id: None,
            store: ContributionStore::default(),
        })
    }

    /// Community whose contributions are currently cached
    pub fn current_community(&self) -> Option<&str> {
        self.store.scope()
    }

    /// Author id resolved by the last author lookup
    pub fn author_id(&self) -> Option<&str> {
        self.author_id.as_deref()
    }

    /// Cached note, if the current scope holds it
    pub fn cached_note(&self, note_id: &str) -> Option<&Note> {
        self.store.get(note_id)
    }

    // ============================================
    // COMMUNITIES & VIEWS
    // ============================================

    /// Communities the caller is registered in
    pub async fn communities(&self) -> Result<Vec<Community>> {
        let value = self.get_json("/api/users/myRegistrations").await?;
        let registrations: Vec<Registration> = records(value)?;
        Ok(registrations.into_iter().map(Community::from).collect())
    }

    /// Active views of a community
    pub async fn views(&self, community_id: &str) -> Result<Vec<View>> {
        let value = self
            .get_json(&format!("/api/communities/{}/views", community_id))
            .await?;
        let views: Vec<View> = records(value)?;
        Ok(views.into_iter().filter(View::is_active).collect())
    }

    // ============================================
    // CONTRIBUTIONS
    // ============================================

    /// Load every active note of `community_id` into the store
    ///
    /// A community that is already loaded is never fetched again, so later
    /// server-side changes stay invisible until the scope changes.
    pub async fn load_contributions(&mut self, community_id: &str) -> Result<()> {
        if self.store.is_scoped_to(community_id) {
            debug!(community_id, "contributions already cached");
            return Ok(());
        }

        let body = json!({
            "query": {
                "type": "Note",
                "pagesize": "max",
                "status": "active",
            }
        });
        let value = self
            .post_json(&format!("/api/contributions/{}/search", community_id), &body)
            .await?;
        let raw_notes: Vec<RawNote> = records(value)?;

        let store =
            ContributionStore::for_community(community_id, raw_notes.into_iter().map(Note::from_raw));
        info!(community_id, notes = store.len(), "contributions cached");

        self.store = store;
        Ok(())
    }

    /// Cached notes of `community_id` in server order, optionally
    /// restricted to the given ids
    pub async fn contributions(
        &mut self,
        community_id: &str,
        filter: Option<&[&str]>,
    ) -> Result<Vec<Note>> {
        self.load_contributions(community_id).await?;

        Ok(self
            .store
            .iter()
            .filter(|n| filter.map_or(true, |ids| ids.contains(&n.id.as_str())))
            .cloned()
            .collect())
    }

    /// Notes of the loaded community that list `author_id` as an author
    ///
    /// Reads the store only; fails when no community has been loaded.
    pub fn notes_by_author(&self, author_id: &str) -> Result<HashMap<String, Note>> {
        if self.store.scope().is_none() {
            return Err(Error::Precondition(
                "no community loaded; call load_contributions first".to_string(),
            ));
        }
        Ok(self.store.by_author(author_id))
    }

    // ============================================
    // LINKS
    // ============================================

    /// Links of a community as `{from, to}` pairs
    pub async fn links(&self, community_id: &str, link_type: Option<&str>) -> Result<Vec<Link>> {
        let raw = self.raw_links(community_id, link_type).await?;
        raw.into_iter()
            .map(|r| serde_json::from_value(r).map_err(Error::from))
            .collect()
    }

    /// Link records exactly as returned by the server
    ///
    /// `link_type` must be `buildson` or `contains`; anything else is
    /// rejected before a request is sent.
    pub async fn raw_links(
        &self,
        community_id: &str,
        link_type: Option<&str>,
    ) -> Result<Vec<Value>> {
        let link_type = link_type.map(str::parse::<LinkType>).transpose()?;

        let mut query = Map::new();
        if let Some(link_type) = link_type {
            query.insert("type".to_string(), Value::from(link_type.as_str()));
        }

        let value = self
            .post_json(
                &format!("/api/links/{}/search", community_id),
                &json!({ "query": query }),
            )
            .await?;
        records(value)
    }

    // ============================================
    // REQUEST HELPERS
    // ============================================

    async fn get_json(&self, path: &str) -> Result<Value> {
        self.transport
            .get(path, Some(&self.token))
            .await?
            .into_json()
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        self.transport
            .post(path, body, Some(&self.token))
            .await?
            .into_json()
    }
}

fn records<T: DeserializeOwned>(value: Value) -> Result<Vec<T>> {
    if !value.is_array() {
        return Err(Error::InvalidResponse(format!(
            "expected a list of records, got {}",
            value
        )));
    }
    Ok(serde_json::from_value(value)?)
}
