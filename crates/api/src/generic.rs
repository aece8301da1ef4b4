// =============================================================================
// CreUp API - Generic Collection Client
// =============================================================================
// Table of Contents:
// 1. Generic API
// =============================================================================

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

use crate::client::ApiClient;
use crate::collection::Collection;
use crate::error::Result;

// -----------------------------------------------------------------------------
// 1. Generic API
// -----------------------------------------------------------------------------

/// Typed access to arbitrary endpoints, decoding every response as a
/// [`Collection`]. Writes that answer with a single record come back as a
/// one-member collection.
///
/// Every call is a fresh round trip.
pub struct GenericApi<T> {
    client: ApiClient,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for GenericApi<T> {
    fn clone(&self) -> Self {
        Self::new(self.client.clone())
    }
}

impl<T> GenericApi<T> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            _record: PhantomData,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

impl<T: DeserializeOwned> GenericApi<T> {
    /// GET a collection.
    pub async fn get(&self, endpoint: &str) -> Result<Collection<T>> {
        self.client.get(endpoint).await?.json()
    }

    /// POST a JSON body.
    pub async fn post<B: Serialize + ?Sized>(&self, endpoint: &str, data: &B) -> Result<Collection<T>> {
        self.client.post(endpoint, data).await?.json()
    }

    /// PUT (full replace).
    pub async fn put<B: Serialize + ?Sized>(&self, endpoint: &str, data: &B) -> Result<Collection<T>> {
        self.client.put(endpoint, data).await?.json()
    }

    /// PATCH (partial update).
    pub async fn patch<B: Serialize + ?Sized>(&self, endpoint: &str, data: &B) -> Result<Collection<T>> {
        self.client.patch(endpoint, data).await?.json()
    }

    /// DELETE, discarding the body.
    pub async fn delete(&self, endpoint: &str) -> Result<()> {
        self.client.delete(endpoint).await?;
        Ok(())
    }
}
