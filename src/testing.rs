//! In-process KF6 stand-in for session tests

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::error::Result;
use crate::transport::{Response, Transport};

/// One request as seen by the fake server
#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
    pub token: Option<String>,
}

#[derive(Default)]
pub(crate) struct FakeKf6 {
    registrations: Vec<Value>,
    views: BTreeMap<String, Value>,
    notes: BTreeMap<String, Vec<Value>>,
    contains: BTreeMap<String, Vec<String>>,
    objects: BTreeMap<String, Value>,
    author_id: String,
    fail_link_creation: bool,
    requests: Mutex<Vec<Recorded>>,
}

/// Server-side note record
pub(crate) fn raw_note(id: &str, authors: &[&str], riseabove: Option<&str>) -> Value {
    let mut data = json!({ "body": format!("<p>Body of {}</p>", id) });
    if let Some(view_id) = riseabove {
        data["riseabove"] = json!({ "viewId": view_id });
    }
    json!({
        "_id": id,
        "type": "Note",
        "authors": authors,
        "title": format!("Note {}", id),
        "text4search": format!("( Note {} ) Body of {} ()", id, id),
        "status": "active",
        "created": "2021-05-01T10:00:00.000Z",
        "data": data,
    })
}

impl FakeKf6 {
    pub const TOKEN: &'static str = "fake-token";
    pub const PASSWORD: &'static str = "secret";
    pub const CREATED_NOTE_ID: &'static str = "created-note";

    pub fn new() -> Self {
        Self {
            author_id: "author-1".to_string(),
            ..Default::default()
        }
    }

    pub fn with_registrations(mut self, registrations: Value) -> Self {
        self.registrations = registrations.as_array().cloned().unwrap_or_default();
        self
    }

    pub fn with_views(mut self, community_id: &str, views: Value) -> Self {
        self.views.insert(community_id.to_string(), views);
        self
    }

    /// Note returned by the community's bulk search
    pub fn with_note(mut self, community_id: &str, note: Value) -> Self {
        self.notes
            .entry(community_id.to_string())
            .or_default()
            .push(note);
        self
    }

    /// Object reachable only through /api/objects
    pub fn with_object(mut self, object: Value) -> Self {
        let id = object["_id"].as_str().unwrap_or_default().to_string();
        self.objects.insert(id, object);
        self
    }

    pub fn with_contains(mut self, view_id: &str, note_ids: &[&str]) -> Self {
        self.contains.insert(
            view_id.to_string(),
            note_ids.iter().map(|id| id.to_string()).collect(),
        );
        self
    }

    pub fn with_author(mut self, author_id: &str) -> Self {
        self.author_id = author_id.to_string();
        self
    }

    pub fn failing_link_creation(mut self) -> Self {
        self.fail_link_creation = true;
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    fn record(&self, method: &'static str, path: &str, body: Option<&Value>, token: Option<&str>) {
        self.requests.lock().unwrap().push(Recorded {
            method,
            path: path.to_string(),
            body: body.cloned(),
            token: token.map(str::to_string),
        });
    }

    fn link_record(from: &str, to: &str) -> Value {
        json!({
            "_id": format!("{}->{}", from, to),
            "from": from,
            "to": to,
            "type": "contains",
            "_from": {"title": format!("View {}", from)},
            "_to": {"type": "Note", "status": "active"},
        })
    }

    fn search_links(&self, query: &Value) -> Value {
        if let Some(link_type) = query.get("type").and_then(Value::as_str) {
            if link_type != "contains" {
                return json!([]);
            }
        }

        let links: Vec<Value> = match query.get("from").and_then(Value::as_str) {
            Some(from) => self
                .contains
                .get(from)
                .map(|ids| ids.iter().map(|to| Self::link_record(from, to)).collect())
                .unwrap_or_default(),
            None => self
                .contains
                .iter()
                .flat_map(|(from, ids)| ids.iter().map(move |to| Self::link_record(from, to)))
                .collect(),
        };
        Value::Array(links)
    }
}

fn ok(body: Value) -> Result<Response> {
    Ok(Response::new(200, body))
}

fn not_found() -> Result<Response> {
    Ok(Response::new(404, json!("Not Found")))
}

#[async_trait]
impl Transport for FakeKf6 {
    async fn get(&self, path: &str, token: Option<&str>) -> Result<Response> {
        self.record("GET", path, None, token);
        if token != Some(Self::TOKEN) {
            return Ok(Response::new(401, json!("Unauthorized")));
        }

        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        match segments.as_slice() {
            ["api", "users", "myRegistrations"] => ok(Value::Array(self.registrations.clone())),
            ["api", "communities", community, "views"] => {
                ok(self.views.get(*community).cloned().unwrap_or(json!([])))
            }
            ["api", "objects", id] => match self.objects.get(*id) {
                Some(object) => ok(object.clone()),
                None => not_found(),
            },
            ["api", "authors", _, "me"] => ok(json!({"_id": self.author_id, "type": "Author"})),
            _ => not_found(),
        }
    }

    async fn post(&self, path: &str, body: &Value, token: Option<&str>) -> Result<Response> {
        self.record("POST", path, Some(body), token);

        if path == "/auth/local" {
            return if body["password"] == Self::PASSWORD {
                ok(json!({"token": Self::TOKEN}))
            } else {
                Ok(Response::new(401, json!("Unauthorized")))
            };
        }
        if token != Some(Self::TOKEN) {
            return Ok(Response::new(401, json!("Unauthorized")));
        }

        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        match segments.as_slice() {
            ["api", "contributions", community, "search"] => match self.notes.get(*community) {
                Some(notes) => ok(Value::Array(notes.clone())),
                None => not_found(),
            },
            ["api", "contributions", _] => Ok(Response::new(
                201,
                json!({"_id": Self::CREATED_NOTE_ID, "type": "Note"}),
            )),
            ["api", "links", _, "search"] => ok(self.search_links(&body["query"])),
            ["api", "links", ""] => {
                if self.fail_link_creation {
                    Ok(Response::new(500, json!("link creation failed")))
                } else {
                    Ok(Response::new(201, json!({"_id": "created-link"})))
                }
            }
            _ => not_found(),
        }
    }
}
