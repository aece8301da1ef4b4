//! Client testimonials. Served outside the `/api` prefix.

use serde::{Deserialize, Serialize};

use super::{Resource, ResourceApi};

pub const TESTIMONIALS_PATH: &str = "/testimonials";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    #[serde(deserialize_with = "crate::collection::text_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub company: String,
    pub content: String,
    #[serde(default)]
    pub image: String,
}

impl Resource for Testimonial {
    const PATH: &'static str = TESTIMONIALS_PATH;
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TestimonialInput {
    pub name: String,
    pub role: String,
    pub company: String,
    pub content: String,
    pub image: String,
}

pub type TestimonialsApi = ResourceApi<Testimonial>;
