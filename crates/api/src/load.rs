//! Fetch-on-mount helpers for views.
//!
//! A view starts in [`LoadState::Loading`], runs its fetch through [`load`]
//! with the token it cancels on teardown, and only applies the returned state
//! when one comes back.

use std::future::Future;
use tracing::{error, warn};

use crate::cancel::CancelToken;
use crate::error::{ApiError, Result};

/// What a view renders for one fetch.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    #[default]
    Loading,
    Loaded(T),
    /// Localized message shown in place of the data.
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LoadState<U> {
        match self {
            LoadState::Loading => LoadState::Loading,
            LoadState::Loaded(data) => LoadState::Loaded(f(data)),
            LoadState::Failed(message) => LoadState::Failed(message),
        }
    }
}

/// Run `fetch` under `token`.
///
/// Returns `None` once the token is cancelled, whatever the fetch did; the
/// caller must then leave its view untouched. Failures are logged and
/// collapse to the generic load message.
pub async fn load<T, F>(token: &CancelToken, fetch: F) -> Option<LoadState<T>>
where
    F: Future<Output = Result<T>>,
{
    let outcome = match token.run(fetch).await {
        Ok(outcome) => outcome,
        Err(_) => return None,
    };
    if token.is_cancelled() {
        return None;
    }

    match outcome {
        Ok(data) => Some(LoadState::Loaded(data)),
        Err(ApiError::Cancelled) => None,
        Err(err) => {
            error!(error = %err, "Failed to load data");
            Some(LoadState::Failed(err.user_message().to_string()))
        }
    }
}

/// Keep whatever a fetch produced, falling back to the empty value when it
/// failed. For pages that join several fetches and render the ones that
/// succeeded.
pub fn settled<T: Default>(result: Result<T>) -> T {
    match result {
        Ok(data) => data,
        Err(err) => {
            warn!(error = %err, "Fetch failed, rendering without it");
            T::default()
        }
    }
}
