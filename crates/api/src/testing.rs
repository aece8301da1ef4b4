//! In-memory API server used by the unit tests.
//!
//! Serves Hydra collections for the known resource bases with CRUD semantics,
//! and replays scripted responses or network failures when queued.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, VecDeque};

use crate::error::{ApiError, Result};
use crate::http::{HttpRequest, HttpResponse, Method, Transport};

const BASES: [&str; 8] = [
    "/api/appointments",
    "/api/projects",
    "/api/services",
    "/api/partners",
    "/testimonials",
    "/api/contacts",
    "/api/users",
    "/api/stats",
];

enum Scripted {
    Response(HttpResponse),
    Fail(String),
}

#[derive(Default)]
struct ServerState {
    collections: BTreeMap<String, Vec<Value>>,
    next_id: u64,
    scripted: VecDeque<Scripted>,
    requests: Vec<HttpRequest>,
    hydra_keys: bool,
}

pub(crate) struct MockServer {
    state: Mutex<ServerState>,
}

impl MockServer {
    pub(crate) fn new() -> Self {
        let mut state = ServerState {
            next_id: 1,
            ..ServerState::default()
        };
        for base in BASES {
            state.collections.insert(base.to_string(), Vec::new());
        }
        Self {
            state: Mutex::new(state),
        }
    }

    /// Emit `hydra:`-prefixed envelope keys.
    pub(crate) fn use_hydra_keys(&self) {
        self.state.lock().hydra_keys = true;
    }

    /// Insert records into a collection, assigning ids where missing.
    pub(crate) fn seed(&self, base: &str, records: Vec<Value>) {
        let mut state = self.state.lock();
        for record in records {
            let record = state.assign_id(base, record);
            state.collections.entry(base.to_string()).or_default().push(record);
        }
    }

    /// Queue a JSON response for the next request.
    pub(crate) fn respond(&self, status: u16, body: Value) {
        self.respond_raw(status, &body.to_string());
    }

    pub(crate) fn respond_raw(&self, status: u16, body: &str) {
        self.state
            .lock()
            .scripted
            .push_back(Scripted::Response(HttpResponse::new(status, body)));
    }

    /// Make the next request fail without a response.
    pub(crate) fn fail_next(&self, message: &str) {
        self.state
            .lock()
            .scripted
            .push_back(Scripted::Fail(message.to_string()));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().requests.clone()
    }

    pub(crate) fn last_request(&self) -> Option<HttpRequest> {
        self.state.lock().requests.last().cloned()
    }
}

impl ServerState {
    fn assign_id(&mut self, base: &str, record: Value) -> Value {
        let mut map = match record {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let id = match map.get("id").and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => {
                let id = self.next_id.to_string();
                self.next_id += 1;
                id
            }
        };
        map.insert("@id".to_string(), json!(format!("{}/{}", base, id)));
        map.insert("id".to_string(), json!(id));
        Value::Object(map)
    }

    fn envelope(&self, base: &str, members: Vec<Value>, total: usize) -> Value {
        let (member_key, total_key, kind) = if self.hydra_keys {
            ("hydra:member", "hydra:totalItems", "hydra:Collection")
        } else {
            ("member", "totalItems", "Collection")
        };
        let mut map = Map::new();
        map.insert("@id".to_string(), json!(base));
        map.insert("@type".to_string(), json!(kind));
        map.insert(member_key.to_string(), Value::Array(members));
        map.insert(total_key.to_string(), json!(total));
        Value::Object(map)
    }

    fn route(&mut self, request: &HttpRequest) -> HttpResponse {
        let (path, query) = match request.path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (request.path.as_str(), None),
        };

        if self.collections.contains_key(path) {
            return self.collection(request, path, query);
        }

        if let Some((base, id)) = path.rsplit_once('/') {
            if self.collections.contains_key(base) {
                return self.item(request, base, id, None);
            }
            if let Some((grand, item_id)) = base.rsplit_once('/') {
                if self.collections.contains_key(grand) {
                    return self.item(request, grand, item_id, Some(id));
                }
            }
        }

        not_found()
    }

    fn collection(&mut self, request: &HttpRequest, base: &str, query: Option<&str>) -> HttpResponse {
        match request.method {
            Method::Get => {
                let records = self.collections.get(base).cloned().unwrap_or_default();
                let total = records.len();
                let limit = query
                    .and_then(|q| q.strip_prefix("limit="))
                    .and_then(|n| n.parse::<usize>().ok())
                    .unwrap_or(total);
                let members = records.into_iter().take(limit).collect();
                HttpResponse::json(200, &self.envelope(base, members, total))
            }
            Method::Post => {
                let mut record = self.assign_id(base, request.body.clone().unwrap_or(Value::Null));
                if let Some(status) = default_status(base) {
                    if let Value::Object(map) = &mut record {
                        map.entry("status").or_insert_with(|| json!(status));
                    }
                }
                self.collections
                    .entry(base.to_string())
                    .or_default()
                    .push(record.clone());
                HttpResponse::json(201, &record)
            }
            _ => HttpResponse::new(405, ""),
        }
    }

    fn item(&mut self, request: &HttpRequest, base: &str, id: &str, field: Option<&str>) -> HttpResponse {
        let Some(records) = self.collections.get_mut(base) else {
            return not_found();
        };
        let Some(index) = records
            .iter()
            .position(|record| record.get("id").and_then(Value::as_str) == Some(id))
        else {
            return not_found();
        };

        match (request.method, field) {
            (Method::Get, None) => HttpResponse::json(200, &records[index]),
            (Method::Put, None) => {
                let mut replacement = match request.body.clone() {
                    Some(Value::Object(map)) => map,
                    _ => Map::new(),
                };
                replacement.insert("id".to_string(), json!(id));
                replacement.insert("@id".to_string(), json!(format!("{}/{}", base, id)));
                records[index] = Value::Object(replacement);
                HttpResponse::json(200, &records[index])
            }
            (Method::Patch, _) => {
                if let (Value::Object(target), Some(Value::Object(changes))) =
                    (&mut records[index], request.body.clone())
                {
                    for (key, value) in changes {
                        target.insert(key, value);
                    }
                }
                HttpResponse::json(200, &records[index])
            }
            (Method::Delete, None) => {
                records.remove(index);
                HttpResponse::new(204, "")
            }
            _ => HttpResponse::new(405, ""),
        }
    }
}

fn default_status(base: &str) -> Option<&'static str> {
    match base {
        "/api/appointments" => Some("pending"),
        "/api/contacts" => Some("new"),
        _ => None,
    }
}

fn not_found() -> HttpResponse {
    HttpResponse::json(404, &json!({ "title": "Not Found" }))
}

#[async_trait]
impl Transport for MockServer {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut state = self.state.lock();
        state.requests.push(request.clone());

        match state.scripted.pop_front() {
            Some(Scripted::Response(response)) => Ok(response),
            Some(Scripted::Fail(message)) => Err(ApiError::Network(message)),
            None => Ok(state.route(&request)),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
