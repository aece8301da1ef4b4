// =============================================================================
// CreUp API - Projects
// =============================================================================
// Table of Contents:
// 1. Types
// 2. Projects API
// =============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;

use super::partners::Partner;
use super::team::TeamMember;
use super::{Resource, ResourceApi};
use crate::collection::{Collection, Reference};
use crate::error::Result;

pub const PROJECTS_PATH: &str = "/api/projects";

// -----------------------------------------------------------------------------
// 1. Types
// -----------------------------------------------------------------------------

/// Portfolio category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectCategory {
    #[serde(rename = "Graphique design")]
    GraphicDesign,
    #[serde(rename = "Photo")]
    Photo,
    #[serde(rename = "Vidéo")]
    Video,
    #[serde(rename = "Projet interne")]
    Internal,
}

impl ProjectCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::GraphicDesign => "Graphique design",
            Self::Photo => "Photo",
            Self::Video => "Vidéo",
            Self::Internal => "Projet interne",
        }
    }
}

impl fmt::Display for ProjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Team member credited on a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectTeamMember {
    #[serde(flatten)]
    pub member: TeamMember,
    #[serde(default)]
    pub contribution: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialPost {
    pub url: String,
    #[serde(default)]
    pub thumbnail: String,
}

/// Quote attached to a case study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectTestimonial {
    pub name: String,
    #[serde(default)]
    pub role: String,
    pub content: String,
}

/// Case study shown in the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(deserialize_with = "crate::collection::text_or_number")]
    pub id: String,
    pub title: String,
    pub client: Reference<Partner>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    pub category: ProjectCategory,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Vec<ProjectTeamMember>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallery: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_post: Option<SocialPost>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testimonial: Option<ProjectTestimonial>,
}

impl Resource for Project {
    const PATH: &'static str = PROJECTS_PATH;
}

// -----------------------------------------------------------------------------
// 2. Projects API
// -----------------------------------------------------------------------------

pub type ProjectsApi = ResourceApi<Project>;

impl ResourceApi<Project> {
    /// First `limit` projects in server order, for the home page teaser.
    pub async fn latest(&self, limit: usize) -> Result<Collection<Project>> {
        self.api.get(&format!("{}?limit={}", self.base, limit)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::test_support::dashboard_client;
    use serde_json::json;
    use tokio_test::assert_ok;

    fn project(title: &str) -> serde_json::Value {
        json!({
            "title": title,
            "client": "/api/partners/1",
            "category": "Photo",
            "tags": ["mode"]
        })
    }

    #[tokio::test]
    async fn latest_sends_the_limit() {
        let (client, server) = dashboard_client();
        server.seed(PROJECTS_PATH, vec![project("A"), project("B"), project("C")]);

        let latest = assert_ok!(ProjectsApi::new(client).latest(2).await);
        assert_eq!(server.last_request().unwrap().path, "/api/projects?limit=2");
        assert_eq!(latest.len(), 2);
        assert_eq!(latest.total(), 3);
        assert_eq!(latest.member[0].title, "A");
    }

    #[tokio::test]
    async fn decodes_a_full_case_study() {
        let (client, server) = dashboard_client();
        server.seed(
            PROJECTS_PATH,
            vec![json!({
                "id": "12",
                "title": "Campagne printemps",
                "client": { "id": "1", "name": "Maison Blanche", "kind": "client" },
                "category": "Vidéo",
                "tags": ["vidéo", "mode"],
                "videoUrl": "https://video.example/12",
                "team": [{ "id": "4", "name": "Hugo", "role": "Vidéaste", "contribution": "Tournage" }],
                "socialPost": { "url": "https://insta.example/p/1", "thumbnail": "t.jpg" },
                "testimonial": { "name": "Nadia", "role": "Fondatrice", "content": "Bravo" }
            })],
        );

        let project = assert_ok!(ProjectsApi::new(client).get_by_id("12").await);
        assert_eq!(project.category, ProjectCategory::Video);
        assert_eq!(project.category.to_string(), "Vidéo");
        assert_eq!(project.client.embedded().map(|c| c.name.as_str()), Some("Maison Blanche"));
        assert_eq!(project.video_url.as_deref(), Some("https://video.example/12"));

        let team = project.team.unwrap();
        assert_eq!(team[0].member.name, "Hugo");
        assert_eq!(team[0].contribution, "Tournage");
        assert_eq!(project.social_post.unwrap().thumbnail, "t.jpg");
        assert!(project.gallery.is_none());
    }

    #[tokio::test]
    async fn client_may_be_an_iri() {
        let (client, server) = dashboard_client();
        server.seed(PROJECTS_PATH, vec![project("Affiche")]);

        let all = assert_ok!(ProjectsApi::new(client).get_all().await);
        assert_eq!(all.member[0].client.iri(), Some("/api/partners/1"));
        assert_eq!(all.member[0].category, ProjectCategory::Photo);
    }

    #[tokio::test]
    async fn nested_integer_ids_decode() {
        let (client, server) = dashboard_client();
        server.respond(
            200,
            json!({
                "hydra:member": [{
                    "id": 12,
                    "title": "Campagne printemps",
                    "client": { "id": 1, "name": "Maison Blanche", "kind": "client" },
                    "category": "Photo",
                    "team": [{ "id": 4, "name": "Hugo", "role": "Photographe", "contribution": "Prise de vue" }]
                }]
            }),
        );

        let all = assert_ok!(ProjectsApi::new(client).get_all().await);
        let project = &all.member[0];
        assert_eq!(project.id, "12");
        assert_eq!(project.client.embedded().map(|c| c.id.as_str()), Some("1"));
        assert_eq!(project.team.as_ref().unwrap()[0].member.id, "4");
    }
}
