//! Storage and editor shapes for page documents.
//!
//! A stored page is an ordered list of typed sections; the editor works on a
//! flat list of blocks derived from them (see [`crate::content::transform`]).

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Timestamp in the format every stored document already uses.
pub fn iso_now() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Stored page document, one JSON file per page id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub title: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub sections: Vec<Section>,
    pub metadata: PageMetadata,
    pub settings: PageSettings,
    pub last_modified: String,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            path: String::new(),
            kind: "page".to_string(),
            sections: Vec::new(),
            metadata: PageMetadata::default(),
            settings: PageSettings::default(),
            last_modified: String::new(),
        }
    }
}

/// SEO fields on the stored page. Passed through untransformed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub og_image: String,
    pub canonical: String,
    pub robots: String,
}

impl Default for PageMetadata {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            keywords: Vec::new(),
            og_image: "/og-image.jpg".to_string(),
            canonical: String::new(),
            robots: "index, follow".to_string(),
        }
    }
}

/// Page-level rendering flags. Passed through untransformed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageSettings {
    pub theme: String,
    pub layout: String,
    pub show_breadcrumbs: bool,
    pub show_footer: bool,
    #[serde(rename = "customCSS")]
    pub custom_css: String,
    #[serde(rename = "customJS")]
    pub custom_js: String,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            theme: "auto".to_string(),
            layout: "default".to_string(),
            show_breadcrumbs: true,
            show_footer: true,
            custom_css: String::new(),
            custom_js: String::new(),
        }
    }
}

/// One content block in storage shape. `content` is type-dependent and
/// deliberately loose; the transform only touches the fields it knows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default = "empty_object")]
    pub content: Value,
    pub images: Vec<Value>,
    pub settings: SectionSettings,
}

impl Default for Section {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            kind: String::new(),
            content: empty_object(),
            images: Vec::new(),
            settings: SectionSettings::default(),
        }
    }
}

/// Per-block rendering overrides. Unknown keys survive a round trip through
/// the flattened map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SectionSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One content block in editor shape. `order` is derived from array position
/// at normalization time and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub order: usize,
    pub visible: bool,
    #[serde(default = "empty_object")]
    pub content: Value,
}

/// Editor-facing page document, produced by normalization and posted back by
/// the admin UI on save.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorPage {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    pub created: String,
    pub last_modified: String,
    pub meta: EditorMeta,
    pub blocks: Vec<Block>,
}

impl Default for EditorPage {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            slug: String::new(),
            kind: "page".to_string(),
            status: "published".to_string(),
            created: String::new(),
            last_modified: String::new(),
            meta: EditorMeta::default(),
            blocks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorMeta {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
}

fn page_title(page_id: &str) -> &'static str {
    match page_id {
        "homepage" => "Homepage",
        "about" => "About Us",
        "services" => "Services",
        "facilities" => "Facilities",
        "people" => "People",
        "projects" => "Projects",
        "news" => "News",
        "contact" => "Contact",
        _ => "Page",
    }
}

/// Lazily-defaulted page for ids with no backing file: empty sections, the
/// fixed title table, and documented default settings.
pub fn default_page(page_id: &str) -> Page {
    let title = page_title(page_id);
    let path = if page_id == "homepage" {
        "/".to_string()
    } else {
        format!("/{page_id}")
    };

    Page {
        id: page_id.to_string(),
        title: title.to_string(),
        path: path.clone(),
        kind: "page".to_string(),
        sections: Vec::new(),
        metadata: PageMetadata {
            title: format!("{title} - Posta Vermaas"),
            canonical: path,
            ..PageMetadata::default()
        },
        settings: PageSettings::default(),
        last_modified: iso_now(),
    }
}
