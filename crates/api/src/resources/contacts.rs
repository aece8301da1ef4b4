// =============================================================================
// CreUp API - Contact Messages
// =============================================================================
// Table of Contents:
// 1. Types
// 2. Status Lifecycle
// 3. Contacts API
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use super::{Resource, ResourceApi};
use crate::error::{ApiError, Result};

pub const CONTACTS_PATH: &str = "/api/contacts";

// -----------------------------------------------------------------------------
// 1. Types
// -----------------------------------------------------------------------------

/// Message sent through the public contact form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(deserialize_with = "crate::collection::text_or_number")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub subject: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub status: ContactStatus,
}

impl Resource for Contact {
    const PATH: &'static str = CONTACTS_PATH;
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

#[derive(Serialize)]
struct StatusChange {
    status: ContactStatus,
}

// -----------------------------------------------------------------------------
// 2. Status Lifecycle
// -----------------------------------------------------------------------------

/// Inbox state of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    New,
    Read,
    Archived,
}

impl ContactStatus {
    pub const ALL: [ContactStatus; 3] = [Self::New, Self::Read, Self::Archived];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Read => "read",
            Self::Archived => "archived",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::New => "Nouveau",
            Self::Read => "Lu",
            Self::Archived => "Archivé",
        }
    }

    /// Archived messages can only be reopened as read.
    pub fn can_transition_to(&self, next: ContactStatus) -> bool {
        use ContactStatus::*;
        matches!(
            (self, next),
            (New, Read) | (New, Archived) | (Read, Archived) | (Read, New) | (Archived, Read)
        )
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContactStatus {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ApiError::Deserialize(format!("unknown contact status '{}'", s)))
    }
}

// -----------------------------------------------------------------------------
// 3. Contacts API
// -----------------------------------------------------------------------------

pub type ContactsApi = ResourceApi<Contact>;

impl ResourceApi<Contact> {
    /// PATCH the record's status without checking the current one.
    pub async fn update_status(&self, id: &str, status: ContactStatus) -> Result<Contact> {
        self.client()
            .patch(&self.item_path(id), &StatusChange { status })
            .await?
            .json()
    }

    pub async fn transition(&self, contact: &Contact, next: ContactStatus) -> Result<Contact> {
        if !contact.status.can_transition_to(next) {
            return Err(ApiError::InvalidTransition {
                from: contact.status.to_string(),
                to: next.to_string(),
            });
        }
        let updated = self.update_status(&contact.id, next).await?;
        info!(id = %updated.id, status = %updated.status, "Contact status changed");
        Ok(updated)
    }
}
