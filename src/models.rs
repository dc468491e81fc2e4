//! Typed records for the flat-file databases (used by serde).
//!
//! The generic admin CRUD endpoint works on loose JSON; these types cover the
//! documents the public read endpoints and the central roles database return.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Project record from `projects.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub year: Option<i64>,
    pub director: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    pub poster: String,
    pub hero_image: String,
    pub description: String,
    pub credits: ProjectCredits,
    pub roles: Vec<String>,
    pub tags: Vec<String>,
    pub slug: String,
    pub featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gallery: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            year: None,
            director: String::new(),
            producer: None,
            kind: String::new(),
            genre: None,
            poster: String::new(),
            hero_image: String::new(),
            description: String::new(),
            credits: ProjectCredits::default(),
            roles: Vec::new(),
            tags: Vec::new(),
            slug: String::new(),
            featured: false,
            gallery: None,
            client: None,
            format: None,
            status: None,
        }
    }
}

/// Per-discipline credit lists on a project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectCredits {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound_design: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub re_recording_mix: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adr: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foley: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_post_producer: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound_editor: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialogue_editor: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_roles: Option<HashMap<String, Vec<String>>>,
}

/// Person record from `people.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    pub name: String,
    pub role: String,
    pub roles: Vec<String>,
    pub bio: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialties: Option<Vec<String>>,
    pub featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

/// News post record from `news.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewsPost {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub published_at: String,
    pub updated_at: String,
    pub hero_image: String,
    pub category: String,
    pub tags: Vec<String>,
    pub featured: bool,
}

/// Central credit-role record from `roles.json` (flat array file).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CreditRole {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub order: i64,
}

impl Default for CreditRole {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            category: "additional".to_string(),
            description: String::new(),
            order: 0,
        }
    }
}

/// Whole-file wrappers for the public read endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectsFile {
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PeopleFile {
    pub people: Vec<Person>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsFile {
    pub news: Vec<NewsPost>,
}
