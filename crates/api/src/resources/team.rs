//! Team members (`/api/users`).

use serde::{Deserialize, Serialize};

use super::{Resource, ResourceApi};

pub const TEAM_PATH: &str = "/api/users";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    #[serde(deserialize_with = "crate::collection::text_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio: Option<String>,
}

impl Resource for TeamMember {
    const PATH: &'static str = TEAM_PATH;
}

pub type TeamApi = ResourceApi<TeamMember>;
