// =============================================================================
// CreUp API - Appointments
// =============================================================================
// Table of Contents:
// 1. Types
// 2. Status Lifecycle
// 3. Appointments API
// =============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use super::services::Service;
use super::{Resource, ResourceApi};
use crate::collection::Reference;
use crate::error::{ApiError, Result};

pub const APPOINTMENTS_PATH: &str = "/api/appointments";

// -----------------------------------------------------------------------------
// 1. Types
// -----------------------------------------------------------------------------

/// Booked appointment, as listed in the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(deserialize_with = "crate::collection::text_or_number")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub service: Reference<Service>,
    pub date: String,
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub status: AppointmentStatus,
}

impl Appointment {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Resource for Appointment {
    const PATH: &'static str = APPOINTMENTS_PATH;
}

/// Booking form payload. The server assigns `id` and `status`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Service IRI, see [`service_iri`](super::services::service_iri).
    pub service: String,
    pub date: String,
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Serialize)]
struct StatusChange {
    status: AppointmentStatus,
}

// -----------------------------------------------------------------------------
// 2. Status Lifecycle
// -----------------------------------------------------------------------------

/// `pending` until staff confirm or cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 3] = [Self::Pending, Self::Confirmed, Self::Cancelled];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Dashboard badge label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "En attente",
            Self::Confirmed => "Confirmé",
            Self::Cancelled => "Annulé",
        }
    }

    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed) | (Self::Pending, Self::Cancelled)
        )
    }

    pub fn is_final(&self) -> bool {
        !Self::ALL.iter().any(|next| self.can_transition_to(*next))
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ApiError::Deserialize(format!("unknown appointment status '{}'", s)))
    }
}

// -----------------------------------------------------------------------------
// 3. Appointments API
// -----------------------------------------------------------------------------

pub type AppointmentsApi = ResourceApi<Appointment>;

impl ResourceApi<Appointment> {
    /// Set the status without checking the current one.
    pub async fn update_status(&self, id: &str, status: AppointmentStatus) -> Result<Appointment> {
        let path = format!("{}/status", self.item_path(id));
        self.client()
            .patch(&path, &StatusChange { status })
            .await?
            .json()
    }

    /// Move `appointment` to `next`, rejecting moves the lifecycle forbids.
    /// Returns the record as stored by the server.
    pub async fn transition(
        &self,
        appointment: &Appointment,
        next: AppointmentStatus,
    ) -> Result<Appointment> {
        if !appointment.status.can_transition_to(next) {
            return Err(ApiError::InvalidTransition {
                from: appointment.status.to_string(),
                to: next.to_string(),
            });
        }
        let updated = self.update_status(&appointment.id, next).await?;
        info!(id = %updated.id, status = %updated.status, "Appointment status changed");
        Ok(updated)
    }
}
