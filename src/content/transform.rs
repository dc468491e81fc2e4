//! The bidirectional page-block transform.
//!
//! Normalization maps a stored page's heterogeneous `sections` into the flat
//! `blocks` list the editor and renderer consume; denormalization is the
//! inverse, rebuilding storage sections from an edited block list. Both sides
//! are pure per-type reshapes over JSON maps - fields the tables below don't
//! name pass through untouched.
//!
//! Two reshapes are knowingly lossy on the write path: contact-info cannot
//! recover phone/email from the normalized address string (fixed placeholders
//! are re-filled), and stats drop `description`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::page::{
    iso_now, Block, EditorMeta, EditorPage, Page, PageMetadata, PageSettings, Section,
    SectionSettings,
};

/// Placeholders re-filled on denormalization; the normalized contact shape
/// has nowhere to carry the originals.
pub const PLACEHOLDER_PHONE: &str = "+31 20 123 4567";
pub const PLACEHOLDER_EMAIL: &str = "info@postavermaas.com";

const DEFAULT_SUBMIT_TEXT: &str = "Send Message";
const DEFAULT_SUCCESS_MESSAGE: &str = "Thank you for your message!";

/// Stored shape of one `contact-info` location.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Location {
    name: String,
    address: String,
    postal_code: String,
    city: String,
    country: String,
    phone: String,
    email: String,
}

/// Shared shape of a `service-highlights` entry on both sides of the
/// transform (`highlights` in storage, `services` in the editor).
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct ServiceEntry {
    title: String,
    description: String,
    icon: String,
    features: Vec<Value>,
}

// ---------------------------------------------------------------------------
// Normalize: storage -> editor
// ---------------------------------------------------------------------------

/// Produce the editor shape for a stored page. Blocks keep section order;
/// `order` is the array index.
pub fn normalize_page(page: &Page) -> EditorPage {
    let timestamp = if page.last_modified.is_empty() {
        iso_now()
    } else {
        page.last_modified.clone()
    };

    EditorPage {
        id: page.id.clone(),
        title: page.title.clone(),
        slug: page.path.clone(),
        kind: if page.id == "homepage" {
            "homepage".to_string()
        } else {
            page.id.clone()
        },
        status: "published".to_string(),
        created: timestamp.clone(),
        last_modified: timestamp,
        meta: EditorMeta {
            title: if page.metadata.title.is_empty() {
                page.title.clone()
            } else {
                page.metadata.title.clone()
            },
            description: page.metadata.description.clone(),
            keywords: page.metadata.keywords.clone(),
        },
        blocks: page
            .sections
            .iter()
            .enumerate()
            .map(|(index, section)| normalize_section(section, index))
            .collect(),
    }
}

pub fn normalize_section(section: &Section, index: usize) -> Block {
    let mut content = normalize_content(&section.kind, &section.content);

    // The block content carries everything the renderer needs, so the
    // section-level images and settings are folded in.
    content.insert("images".to_string(), json!(section.images));
    content.insert(
        "settings".to_string(),
        serde_json::to_value(&section.settings).unwrap_or_else(|_| json!({})),
    );

    Block {
        id: section.id.clone(),
        kind: section.kind.clone(),
        order: index,
        visible: section.settings.visibility.as_deref() != Some("hidden"),
        content: Value::Object(content),
    }
}

/// Per-type content reshape, storage field names to editor field names.
/// Pure; returns a new map and never touches files.
fn normalize_content(kind: &str, content: &Value) -> Map<String, Value> {
    let mut map = as_object(content);

    match kind {
        "contact-info" => {
            if let Some(locations) = map.remove("locations") {
                let entries: Vec<Value> = locations
                    .as_array()
                    .map(|locations| {
                        locations
                            .iter()
                            .map(|location| {
                                let loc: Location =
                                    serde_json::from_value(location.clone()).unwrap_or_default();
                                json!({
                                    "type": "address",
                                    "label": loc.name,
                                    "value": format!(
                                        "{}, {} {}, {}",
                                        loc.address, loc.postal_code, loc.city, loc.country
                                    ),
                                    "icon": "",
                                })
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                map.insert("contactInfo".to_string(), Value::Array(entries));
            }
        }
        "contact-form" => {
            if let Some(fields) = map.remove("formFields") {
                map.insert("fields".to_string(), fields);
                if !map.contains_key("submitText") {
                    map.insert("submitText".to_string(), json!(DEFAULT_SUBMIT_TEXT));
                }
                if !map.contains_key("successMessage") {
                    map.insert("successMessage".to_string(), json!(DEFAULT_SUCCESS_MESSAGE));
                }
            }
        }
        "stats" => {
            if let Some(stats) = map.get("stats").and_then(Value::as_array) {
                let stats: Vec<Value> = stats.iter().map(normalize_stat).collect();
                map.insert("stats".to_string(), Value::Array(stats));
            }
        }
        "service-highlights" => {
            if let Some(highlights) = map.remove("highlights") {
                map.insert("services".to_string(), reshape_service_entries(&highlights));
            }
        }
        // studio-details and equipment-list keep their storage shape, as
        // does every type the table doesn't know.
        _ => {}
    }

    map
}

fn normalize_stat(stat: &Value) -> Value {
    let mut out = Map::new();
    if let Some(label) = stat.get("label") {
        out.insert("label".to_string(), label.clone());
    }
    let value = match stat.get("number") {
        Some(number) if !number.is_null() => number.clone(),
        _ => stat.get("value").cloned().unwrap_or(Value::Null),
    };
    out.insert("value".to_string(), value);
    out.insert(
        "description".to_string(),
        match stat.get("description") {
            Some(description) if !description.is_null() => description.clone(),
            _ => json!(""),
        },
    );
    Value::Object(out)
}

// ---------------------------------------------------------------------------
// Denormalize: editor -> storage
// ---------------------------------------------------------------------------

/// Rebuild the storage document from an edited page. Stored metadata and
/// settings are re-derived; `lastModified` is stamped now.
pub fn denormalize_page(editor: &EditorPage) -> Page {
    Page {
        id: editor.id.clone(),
        title: editor.title.clone(),
        path: editor.slug.clone(),
        kind: "page".to_string(),
        sections: editor.blocks.iter().map(denormalize_block).collect(),
        metadata: PageMetadata {
            title: editor.meta.title.clone(),
            description: editor.meta.description.clone(),
            keywords: editor.meta.keywords.clone(),
            og_image: "/og-image.jpg".to_string(),
            canonical: editor.slug.clone(),
            robots: "index, follow".to_string(),
        },
        settings: PageSettings {
            show_breadcrumbs: editor.id != "homepage",
            ..PageSettings::default()
        },
        last_modified: iso_now(),
    }
}

pub fn denormalize_block(block: &Block) -> Section {
    let mut content = denormalize_content(&block.kind, &block.content);

    // The merged-in images and settings go back to the section level; leaving
    // them inside content would make storage drift on every save.
    let images = content
        .remove("images")
        .and_then(|v| v.as_array().cloned())
        .unwrap_or_default();
    let mut settings: SectionSettings = content
        .remove("settings")
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();
    settings.visibility = Some(if block.visible { "visible" } else { "hidden" }.to_string());

    Section {
        id: block.id.clone(),
        name: section_name_from_id(&block.id),
        kind: block.kind.clone(),
        content: Value::Object(content),
        images,
        settings,
    }
}

/// Inverse per-type reshape, editor field names back to storage field names.
fn denormalize_content(kind: &str, content: &Value) -> Map<String, Value> {
    let mut map = as_object(content);

    match kind {
        "contact-info" => {
            if let Some(entries) = map.remove("contactInfo") {
                let locations: Vec<Value> = entries
                    .as_array()
                    .map(|entries| entries.iter().map(denormalize_contact_entry).collect())
                    .unwrap_or_default();
                map.insert("locations".to_string(), Value::Array(locations));
            }
        }
        "contact-form" => {
            if let Some(fields) = map.remove("fields") {
                map.insert("formFields".to_string(), fields);
            }
        }
        "stats" => {
            if let Some(stats) = map.get("stats").and_then(Value::as_array) {
                // description does not survive this direction.
                let stats: Vec<Value> = stats
                    .iter()
                    .map(|stat| {
                        json!({
                            "number": stat.get("value").cloned().unwrap_or(Value::Null),
                            "label": stat.get("label").cloned().unwrap_or(Value::Null),
                        })
                    })
                    .collect();
                map.insert("stats".to_string(), Value::Array(stats));
            }
        }
        "service-highlights" => {
            if let Some(services) = map.remove("services") {
                map.insert("highlights".to_string(), reshape_service_entries(&services));
            }
        }
        _ => {}
    }

    map
}

/// Split the normalized `"<address>, <postalCode> <city>, <country>"` string
/// back into a location. Phone and email are not recoverable.
fn denormalize_contact_entry(entry: &Value) -> Value {
    let label = entry.get("label").and_then(Value::as_str).unwrap_or("");
    let value = entry.get("value").and_then(Value::as_str).unwrap_or("");
    let parts: Vec<&str> = value.split(", ").collect();

    let address = parts.first().copied().unwrap_or("");
    let postal_and_city = parts.get(1).copied().unwrap_or("");
    let postal_code = postal_and_city.split(' ').next().unwrap_or("");
    let city_rest = postal_and_city
        .split(' ')
        .skip(1)
        .collect::<Vec<_>>()
        .join(" ");
    let city: &str = if city_rest.is_empty() {
        parts.get(2).copied().unwrap_or("")
    } else {
        city_rest.as_str()
    };
    let country = parts.last().copied().unwrap_or("");

    serde_json::to_value(Location {
        name: label.to_string(),
        address: address.to_string(),
        postal_code: postal_code.to_string(),
        city: city.to_string(),
        country: country.to_string(),
        phone: PLACEHOLDER_PHONE.to_string(),
        email: PLACEHOLDER_EMAIL.to_string(),
    })
    .unwrap_or_else(|_| json!({}))
}

/// `{title, description, icon, features ?? []}` - identical on both sides,
/// so one helper covers highlights -> services and services -> highlights.
fn reshape_service_entries(entries: &Value) -> Value {
    let reshaped: Vec<Value> = entries
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .map(|entry| {
                    let entry: ServiceEntry =
                        serde_json::from_value(entry.clone()).unwrap_or_default();
                    serde_json::to_value(entry).unwrap_or_else(|_| json!({}))
                })
                .collect()
        })
        .unwrap_or_default();
    Value::Array(reshaped)
}

/// Human label for a section, derived from its id: dashes become spaces and
/// each word is capitalized.
fn section_name_from_id(id: &str) -> String {
    id.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn as_object(value: &Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}
