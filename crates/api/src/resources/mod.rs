// =============================================================================
// CreUp API - Resource Clients
// =============================================================================
// Table of Contents:
// 1. Submodules
// 2. Re-exports
// 3. Resource Trait
// 4. Resource API
// =============================================================================

pub mod appointments;
pub mod contacts;
pub mod partners;
pub mod projects;
pub mod services;
pub mod stats;
pub mod team;
pub mod testimonials;

pub use appointments::*;
pub use contacts::*;
pub use partners::*;
pub use projects::*;
pub use services::*;
pub use stats::*;
pub use team::*;
pub use testimonials::*;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::ApiClient;
use crate::collection::Collection;
use crate::error::Result;
use crate::generic::GenericApi;

// -----------------------------------------------------------------------------
// 3. Resource Trait
// -----------------------------------------------------------------------------

/// Record type served under a fixed base path.
pub trait Resource: DeserializeOwned {
    const PATH: &'static str;
}

// -----------------------------------------------------------------------------
// 4. Resource API
// -----------------------------------------------------------------------------

/// CRUD facade over one resource, addressed as `<base>` and `<base>/{id}`.
pub struct ResourceApi<T> {
    api: GenericApi<T>,
    base: &'static str,
}

impl<T> Clone for ResourceApi<T> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            base: self.base,
        }
    }
}

impl<T: Resource> ResourceApi<T> {
    pub fn new(client: ApiClient) -> Self {
        Self::with_base(client, T::PATH)
    }
}

impl<T> ResourceApi<T> {
    /// Serve `T` from a base path other than its default.
    pub fn with_base(client: ApiClient, base: &'static str) -> Self {
        Self {
            api: GenericApi::new(client),
            base,
        }
    }

    pub fn base(&self) -> &'static str {
        self.base
    }

    pub fn client(&self) -> &ApiClient {
        self.api.client()
    }

    fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.base, id)
    }
}

impl<T: DeserializeOwned> ResourceApi<T> {
    /// List every record.
    pub async fn get_all(&self) -> Result<Collection<T>> {
        self.api.get(self.base).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<T> {
        self.client().get(&self.item_path(id)).await?.json()
    }

    pub async fn create<B: Serialize + ?Sized>(&self, record: &B) -> Result<T> {
        self.client().post(self.base, record).await?.json()
    }

    /// Replace a record.
    pub async fn update<B: Serialize + ?Sized>(&self, id: &str, record: &B) -> Result<T> {
        self.client().put(&self.item_path(id), record).await?.json()
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.api.delete(&self.item_path(id)).await
    }
}
