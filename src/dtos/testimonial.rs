use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::testimonial::Testimonial;

#[derive(Deserialize)]
pub struct CreateTestimonialRequest {
    pub author: String,
    pub content: String,
    #[serde(default)]
    pub is_visible: bool,
}

#[derive(Deserialize)]
pub struct UpdateTestimonialRequest {
    pub author: Option<String>,
    pub content: Option<String>,
    pub is_visible: Option<bool>,
}

/// Visitor submission from the about page. `fax_number` is a honeypot.
#[derive(Deserialize)]
pub struct PublicTestimonialRequest {
    pub author: String,
    pub content: String,
    pub fax_number: Option<String>,
}

#[derive(Serialize)]
pub struct PublicTestimonial {
    pub id: i64,
    pub author: String,
    pub content: String,
    pub date_posted: DateTime<Utc>,
    pub likes: i32,
    pub dislikes: i32,
}

impl From<Testimonial> for PublicTestimonial {
    fn from(t: Testimonial) -> Self {
        Self {
            id: t.id,
            author: t.author,
            content: t.content,
            date_posted: t.date_posted,
            likes: t.likes,
            dislikes: t.dislikes,
        }
    }
}
