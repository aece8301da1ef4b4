//! Partners and clients (`/api/partners`).

use serde::{Deserialize, Serialize};

use super::{Resource, ResourceApi};
use crate::error::Result;

pub const PARTNERS_PATH: &str = "/api/partners";

/// `kind` value marking a partner as a client of the agency.
pub const CLIENT_KIND: &str = "client";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partner {
    #[serde(deserialize_with = "crate::collection::text_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Partner {
    pub fn is_client(&self) -> bool {
        self.kind == CLIENT_KIND
    }
}

impl Resource for Partner {
    const PATH: &'static str = PARTNERS_PATH;
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PartnerInput {
    pub name: String,
    pub logo: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

pub type PartnersApi = ResourceApi<Partner>;

impl ResourceApi<Partner> {
    /// Partners of kind `client`, in server order.
    pub async fn clients(&self) -> Result<Vec<Partner>> {
        let all = self.get_all().await?;
        Ok(all.into_iter().filter(Partner::is_client).collect())
    }
}
