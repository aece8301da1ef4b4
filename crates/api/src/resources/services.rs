//! Services offered by the agency (`/api/services`).

use serde::{Deserialize, Serialize};

use super::{Resource, ResourceApi};

pub const SERVICES_PATH: &str = "/api/services";

/// A service shown on the services page and offered in the booking form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    #[serde(deserialize_with = "crate::collection::text_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub fields: String,
}

impl Resource for Service {
    const PATH: &'static str = SERVICES_PATH;
}

/// Fields accepted when creating or replacing a service.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ServiceInput {
    pub title: String,
    pub description: String,
    pub icon: String,
    pub fields: String,
}

pub type ServicesApi = ResourceApi<Service>;

/// IRI of a service, as appointments reference it.
pub fn service_iri(id: &str) -> String {
    format!("{}/{}", SERVICES_PATH, id)
}
