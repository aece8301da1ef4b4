// ============================================================================
// CreUp Admin - Commands
// ============================================================================
// Table of Contents:
// 1. Client Setup
// 2. Dispatch
// 3. Listings
// 4. Output Helpers
// ============================================================================

use anyhow::{anyhow, bail, Context, Result};
use colored::{ColoredString, Colorize};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use creup_api::{
    ApiClient, ApiError, AppointmentStatus, AppointmentsApi, AuthApi, ClientConfig, ContactStatus,
    ContactsApi, FileCredentialStore, GenericApi, MemoryNavigator, PartnersApi, ProjectsApi,
    Reference, ServicesApi, Session, StatsApi, TeamApi, TestimonialsApi,
};

use crate::{Command, ResourceKind};

// ----------------------------------------------------------------------------
// 1. Client Setup
// ----------------------------------------------------------------------------

/// Client acting as if it were on `pathname`, persisting the session in
/// `session_file`.
fn build_client(config: ClientConfig, session_file: &Path, pathname: &str) -> Result<ApiClient> {
    let store = FileCredentialStore::open(session_file)
        .with_context(|| format!("Failed to open session file {}", session_file.display()))?;

    let client = ApiClient::builder(config)
        .session(Session::new(Arc::new(store)))
        .navigator(Arc::new(MemoryNavigator::new(pathname)))
        .build()?;
    Ok(client)
}

/// Turn a forced logout into an actionable message.
fn explain(err: ApiError) -> anyhow::Error {
    match err {
        ApiError::Unauthorized => anyhow!("Session expired or missing, run `creup-admin login`"),
        other => anyhow::Error::new(other),
    }
}

// ----------------------------------------------------------------------------
// 2. Dispatch
// ----------------------------------------------------------------------------

pub(crate) async fn run(command: Command, config: ClientConfig, session_file: &Path) -> Result<()> {
    let pathname = match command {
        Command::Login { .. } => config.login_route.clone(),
        _ => config.protected_prefix.clone(),
    };
    let client = build_client(config, session_file, &pathname)?;

    match command {
        Command::Login { email, password } => {
            let auth = AuthApi::new(client);
            auth.login(&email, &password)
                .await
                .map_err(|e| anyhow!("{} ({})", e.login_message(), e))?;
            println!("{} {}", "✓".green(), format!("Logged in as {}", email).bold());
        }
        Command::Logout => {
            AuthApi::new(client).logout()?;
            println!("{} Logged out", "✓".green());
        }
        Command::Whoami => {
            if !client.session().is_authenticated() {
                bail!("Not logged in, run `creup-admin login`");
            }
            let user = AuthApi::new(client).current_user().await.map_err(explain)?;
            println!(
                "{} {}",
                user.email.as_deref().unwrap_or("(unknown)").bold(),
                user.roles.join(", ").dimmed()
            );
        }
        Command::List {
            resource,
            limit,
            clients,
        } => list(client, resource, limit, clients).await.map_err(explain)?,
        Command::Show { resource, id } => {
            let path = format!("{}/{}", resource.path(), id);
            let record: Value = client.get(&path).await.map_err(explain)?.json()?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::Delete { resource, id } => {
            let path = format!("{}/{}", resource.path(), id);
            GenericApi::<Value>::new(client)
                .delete(&path)
                .await
                .map_err(explain)?;
            info!(path = %path, "Record deleted");
            println!("{} Deleted {}", "✓".green(), path);
        }
        Command::AppointmentStatus { id, status } => {
            let appointments = AppointmentsApi::new(client);
            let appointment = appointments.get_by_id(&id).await.map_err(explain)?;
            let updated = appointments
                .transition(&appointment, status)
                .await
                .map_err(explain)?;
            println!(
                "{} {} → {}",
                updated.full_name(),
                appointment_badge(appointment.status),
                appointment_badge(updated.status)
            );
        }
        Command::ContactStatus { id, status } => {
            let contacts = ContactsApi::new(client);
            let contact = contacts.get_by_id(&id).await.map_err(explain)?;
            let updated = contacts.transition(&contact, status).await.map_err(explain)?;
            println!(
                "{} {} → {}",
                updated.name,
                contact_badge(contact.status),
                contact_badge(updated.status)
            );
        }
    }

    Ok(())
}

// ----------------------------------------------------------------------------
// 3. Listings
// ----------------------------------------------------------------------------

async fn list(
    client: ApiClient,
    resource: ResourceKind,
    limit: Option<usize>,
    clients: bool,
) -> std::result::Result<(), ApiError> {
    match resource {
        ResourceKind::Appointments => {
            for a in AppointmentsApi::new(client).get_all().await? {
                println!(
                    "{:>6}  {} {}  {:<24} {}",
                    a.id,
                    a.date,
                    a.time,
                    a.full_name(),
                    appointment_badge(a.status)
                );
            }
        }
        ResourceKind::Projects => {
            let api = ProjectsApi::new(client);
            let projects = match limit {
                Some(limit) => api.latest(limit).await?,
                None => api.get_all().await?,
            };
            for p in projects {
                let client_name = match &p.client {
                    Reference::Embedded(partner) => partner.name.clone(),
                    Reference::Iri(iri) => iri.clone(),
                };
                println!("{:>6}  {:<32} {:<18} {}", p.id, p.title, p.category.label(), client_name.dimmed());
            }
        }
        ResourceKind::Services => {
            for s in ServicesApi::new(client).get_all().await? {
                println!("{:>6}  {}", s.id, s.title);
            }
        }
        ResourceKind::Partners => {
            let api = PartnersApi::new(client);
            let partners = if clients {
                api.clients().await?
            } else {
                api.get_all().await?.into_members()
            };
            for p in partners {
                println!("{:>6}  {:<32} {}", p.id, p.name, p.kind.dimmed());
            }
        }
        ResourceKind::Testimonials => {
            for t in TestimonialsApi::new(client).get_all().await? {
                println!("{:>6}  {} ({})", t.id, t.name, t.company.dimmed());
            }
        }
        ResourceKind::Contacts => {
            for c in ContactsApi::new(client).get_all().await? {
                let received = c
                    .created_at
                    .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                println!(
                    "{:>6}  {:<16} {:<24} {:<32} {}",
                    c.id,
                    received,
                    c.name,
                    c.subject,
                    contact_badge(c.status)
                );
            }
        }
        ResourceKind::Team => {
            for m in TeamApi::new(client).get_all().await? {
                println!("{:>6}  {:<24} {}", m.id, m.name, m.role.dimmed());
            }
        }
        ResourceKind::Stats => {
            let api = StatsApi::new(client);
            let home = api.home().await?;
            println!("{:>10}  Projets", home.project.to_string().bold());
            println!("{:>10}  Experts", home.expert.to_string().bold());
            for s in api.get_all().await? {
                println!("{:>10}  {}", s.value.bold(), s.label);
            }
        }
    }
    Ok(())
}

// ----------------------------------------------------------------------------
// 4. Output Helpers
// ----------------------------------------------------------------------------

fn appointment_badge(status: AppointmentStatus) -> ColoredString {
    match status {
        AppointmentStatus::Pending => status.label().yellow(),
        AppointmentStatus::Confirmed => status.label().green(),
        AppointmentStatus::Cancelled => status.label().red(),
    }
}

fn contact_badge(status: ContactStatus) -> ColoredString {
    match status {
        ContactStatus::New => status.label().blue(),
        ContactStatus::Read => status.label().normal(),
        ContactStatus::Archived => status.label().yellow(),
    }
}
