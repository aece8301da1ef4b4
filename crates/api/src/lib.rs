//! # CreUp API
//!
//! REST client for the CreUp agency backend.
//!
//! ## Features
//!
//! - **Transport**: JSON over HTTP through a swappable [`Transport`], `reqwest` by default
//! - **Auth interceptors**: bearer token on dashboard pages, forced logout on a rejected session
//! - **Collections**: one decoder for Hydra envelopes, whichever key spelling the server uses
//! - **Resource clients**: appointments, projects, services, partners, testimonials,
//!   contacts, team members and stats
//! - **Cancellation**: a [`CancelToken`] per view aborts its in-flight requests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use creup_api::{ApiClient, AuthApi, AppointmentsApi, ClientConfig, Session};
//!
//! # async fn run() -> creup_api::Result<()> {
//! let client = ApiClient::builder(ClientConfig::from_env()?)
//!     .session(Session::in_memory())
//!     .build()?;
//!
//! AuthApi::new(client.clone()).login("admin@creup.fr", "secret").await?;
//! let appointments = AppointmentsApi::new(client).get_all().await?;
//! for appointment in &appointments {
//!     println!("{} {}", appointment.full_name(), appointment.status.label());
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod cancel;
pub mod client;
pub mod collection;
pub mod config;
pub mod error;
pub mod generic;
pub mod http;
pub mod load;
pub mod middleware;
pub mod navigation;
pub mod resources;

#[cfg(test)]
mod testing;

// Re-exports for ergonomic API
pub use auth::interceptor::{BearerAuth, SessionGuard};
pub use auth::store::{CredentialStore, MemoryCredentialStore, Session, SharedCredentialStore};
pub use auth::{AuthApi, CurrentUser, LoginResponse};
pub use cancel::CancelToken;
pub use client::{ApiClient, ApiClientBuilder, ApiResponse};
pub use collection::{iri_id, Collection, PartialView, Reference};
pub use config::ClientConfig;
pub use error::{ApiError, Result};
pub use generic::GenericApi;
pub use http::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
pub use load::{load, settled, LoadState};
pub use middleware::{MiddlewareChain, RequestMiddleware, ResponseMiddleware};
pub use navigation::{MemoryNavigator, Navigator};
pub use resources::*;

#[cfg(not(target_arch = "wasm32"))]
pub use auth::store::FileCredentialStore;

#[cfg(target_arch = "wasm32")]
pub use auth::store::LocalStorageCredentialStore;
#[cfg(target_arch = "wasm32")]
pub use navigation::BrowserNavigator;

/// Prelude for views and tools built on the client.
pub mod prelude {
    pub use crate::{
        ApiClient, ApiError, AuthApi, CancelToken, ClientConfig, Collection, GenericApi, LoadState,
        Reference, Result, Session,
    };
    pub use crate::resources::{
        AppointmentStatus, AppointmentsApi, ContactStatus, ContactsApi, PartnersApi, ProjectsApi,
        ServicesApi, StatsApi, TeamApi, TestimonialsApi,
    };
}
