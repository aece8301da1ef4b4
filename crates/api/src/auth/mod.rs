// =============================================================================
// CreUp API - Authentication
// =============================================================================
// Table of Contents:
// 1. Submodules
// 2. Request/Response Types
// 3. Auth API
// =============================================================================

pub mod interceptor;
pub mod store;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::client::ApiClient;
use crate::error::Result;

pub const LOGIN_PATH: &str = "/login";
pub const CURRENT_USER_PATH: &str = "/user/me";

// -----------------------------------------------------------------------------
// 2. Request/Response Types
// -----------------------------------------------------------------------------

/// Login request payload. The backend expects the email as `username`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Login response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Account behind the current token.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CurrentUser {
    #[serde(default, deserialize_with = "crate::collection::optional_text_or_number")]
    pub id: Option<String>,
    #[serde(default, alias = "username")]
    pub email: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    /// Fields the client does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// -----------------------------------------------------------------------------
// 3. Auth API
// -----------------------------------------------------------------------------

/// Login, logout and account lookup against the client's session.
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a token and persist it with the
    /// authenticated flag. Nothing is stored when the server refuses.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let request = LoginRequest {
            username: email,
            password,
        };
        let response: LoginResponse = self.client.post(LOGIN_PATH, &request).await?.json()?;

        self.client.session().establish(&response.token)?;
        info!(email = %email, "Logged in");
        Ok(response)
    }

    /// Drop the stored credentials. No request is made.
    pub fn logout(&self) -> Result<()> {
        self.client.session().clear()?;
        info!("Logged out");
        Ok(())
    }

    pub async fn current_user(&self) -> Result<CurrentUser> {
        self.client.get(CURRENT_USER_PATH).await?.json()
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.session().is_authenticated()
    }
}
