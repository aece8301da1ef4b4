//! Key figures shown on the home and about pages (`/api/stats`). Read-only.
//!
//! The same endpoint may carry a figures list (`member`), the home page
//! counters (`home`), or both.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::ApiClient;
use crate::collection::{text_or_number, Collection};
use crate::error::Result;

pub const STATS_PATH: &str = "/api/stats";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    pub label: String,
    /// Display value; numbers are kept as their decimal text.
    #[serde(deserialize_with = "text_or_number")]
    pub value: String,
    #[serde(default)]
    pub icon: String,
}

/// "N Projets / N Experts" counters of the home page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeFigures {
    #[serde(default)]
    pub expert: u64,
    #[serde(default)]
    pub project: u64,
}

#[derive(Debug, Clone)]
pub struct StatsApi {
    client: ApiClient,
}

impl StatsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Figures list. A stats document without a member list has none.
    pub async fn get_all(&self) -> Result<Collection<Stat>> {
        figures(self.fetch().await?)
    }

    /// Home page counters, zero when the server sends no `home` object.
    pub async fn home(&self) -> Result<HomeFigures> {
        home_figures(self.fetch().await?)
    }

    async fn fetch(&self) -> Result<Value> {
        self.client.get(STATS_PATH).await?.json()
    }
}

fn figures(body: Value) -> Result<Collection<Stat>> {
    match &body {
        Value::Object(map)
            if !map.contains_key("label")
                && !map.contains_key("member")
                && !map.contains_key("hydra:member") =>
        {
            Ok(Collection::empty())
        }
        _ => Collection::from_value(body),
    }
}

fn home_figures(body: Value) -> Result<HomeFigures> {
    match body.get("home") {
        None | Some(Value::Null) => Ok(HomeFigures::default()),
        Some(home) => Ok(HomeFigures::deserialize(home)?),
    }
}
