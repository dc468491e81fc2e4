/**
 * Site Routes
 * Singleton documents: site metadata, navigation, shared page copy.
 * Each is seeded with its defaults on first access and updated one
 * top-level section at a time.
 */
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::routes::{store_unavailable, ErrorResponse};
use crate::store::{self, FileStore};

fn default_site() -> Value {
    json!({
        "metadata": {
            "title": {
                "default": "Posta Vermaas - Professional Audio Post Production",
                "template": "%s | Posta Vermaas"
            },
            "description": "Professional audio post production services including Dolby Atmos, sound design, re-recording mixing, ADR, and foley. Based in Amsterdam with state-of-the-art facilities.",
            "keywords": [
                "audio post production",
                "Dolby Atmos",
                "sound design",
                "re-recording mixing",
                "ADR",
                "foley",
                "Amsterdam",
                "film audio",
                "television audio",
                "commercial audio"
            ],
            "openGraph": {
                "type": "website",
                "locale": "en_US",
                "url": "https://postavermaas.com",
                "siteName": "Posta Vermaas",
                "title": "Posta Vermaas - Professional Audio Post Production",
                "images": [
                    { "url": "/og-image.jpg", "width": 1200, "height": 630 }
                ]
            },
            "robots": { "index": true, "follow": true }
        },
        "locations": {
            "main": {
                "name": "Main Location",
                "address": "Koivistokade 58",
                "postalCode": "1018 WB",
                "city": "Amsterdam",
                "country": "Netherlands",
                "phone": "+31 20 123 4567",
                "email": "info@postavermaas.com",
                "coordinates": { "lat": 52.3676, "lng": 4.9041 }
            },
            "secondary": {
                "name": "Secondary Location",
                "address": "Brantasgracht 11",
                "postalCode": "1018 XT",
                "city": "Amsterdam",
                "country": "Netherlands",
                "phone": "+31 20 123 4567",
                "email": "info@postavermaas.com",
                "coordinates": { "lat": 52.3676, "lng": 4.9041 }
            }
        },
        "company": {
            "name": "Posta Vermaas",
            "tagline": "Sound for Picture",
            "description": "Creating immersive sound experiences for film, television and streaming. Based in Amsterdam.",
            "founded": "2008",
            "phone": "+31 20 123 4567",
            "email": "info@postavermaas.com",
            "social": {
                "linkedin": "https://linkedin.com/company/posta-vermaas",
                "twitter": "https://twitter.com/postavermaas"
            }
        },
        "contact": {
            "phone": "+31 20 123 4567",
            "email": "info@postavermaas.com",
            "address": "Koivistokade 58, 1018 WB Amsterdam, Netherlands"
        }
    })
}

fn default_navigation() -> Value {
    json!({
        "main": [
            { "name": "Home", "href": "/" },
            { "name": "Projects", "href": "/projects" },
            { "name": "People", "href": "/people" },
            { "name": "Services", "href": "/services" },
            { "name": "Facilities", "href": "/facilities" },
            { "name": "News", "href": "/news" }
        ],
        "footer": [
            { "name": "About us", "href": "/about-us" },
            { "name": "Contact us", "href": "/contact" },
            { "name": "Route", "href": "/route" },
            { "name": "Dutch Cash Rebate", "href": "/dutch-cash-rebate" },
            { "name": "Source Connect", "href": "/services/source-connect" }
        ],
        "services": [
            { "name": "Dolby Atmos", "href": "/services#dolby-atmos" },
            { "name": "Re-recording", "href": "/services#re-recording" },
            { "name": "Sound Design", "href": "/services#sound-design" },
            { "name": "Foley", "href": "/services#foley" },
            { "name": "ADR", "href": "/services#adr" },
            { "name": "Source Connect", "href": "/services/source-connect" }
        ]
    })
}

fn default_content() -> Value {
    json!({
        "homepage": {
            "hero": {
                "title": "Dutch market-leading audiopost facility",
                "subtitle": "for feature films and hi-end TV- and VOD-drama",
                "description": "Operating from the heart of its motion-picture industry, Amsterdam, POSTA VERMAAS provides complete audio post production packages for feature films and high-end television productions."
            },
            "services": [
                "Sound Design",
                "Re-recording Mixing",
                "ADR Recording",
                "Foley Recording",
                "Dolby Atmos",
                "Source Connect"
            ]
        },
        "about": {
            "title": "About Posta Vermaas",
            "description": "Founded in 2008, POSTA VERMAAS is the Dutch market-leading audiopost facility for feature films and hi-end TV- and VOD-drama operating from the heart of its motion-picture industry, Amsterdam.",
            "mission": "To elevate storytelling through exceptional sound design and immersive audio experiences."
        },
        "services": {
            "title": "Our Services",
            "description": "Complete audio post production services from concept to delivery."
        },
        "facilities": {
            "title": "Our Facilities",
            "description": "State-of-the-art audio studios equipped with the latest technology."
        },
        "people": {
            "title": "Our Team",
            "description": "Meet our experienced professionals."
        },
        "contact": {
            "title": "Contact Us",
            "address": "Koivistokade 58, Amsterdam",
            "phone": "+31 20 123 4567",
            "email": "info@postavermaas.nl"
        }
    })
}

fn read_singleton(
    store: &FileStore,
    key: &str,
    default: &Value,
    failure: &'static str,
) -> Result<Value, (StatusCode, Json<ErrorResponse>)> {
    store.read_or_seed(key, default).map_err(|e| {
        tracing::error!(document = key, "Failed to read document: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(failure)),
        )
    })
}

fn update_section(
    store: &FileStore,
    key: &str,
    default: &Value,
    section: &str,
    data: Value,
    failure: &'static str,
) -> Result<(), (StatusCode, Json<ErrorResponse>)> {
    let mut document = read_singleton(store, key, default, failure)?;
    if let Some(map) = document.as_object_mut() {
        map.insert(section.to_string(), data);
    }
    store.write(key, &document).map_err(|e| {
        tracing::error!(document = key, "Failed to write document: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(failure)),
        )
    })
}

/// GET /api/site
pub async fn get_site() -> impl IntoResponse {
    let store = match store::get_store() {
        Some(s) => s,
        None => return store_unavailable().into_response(),
    };
    match read_singleton(&store, "site", &default_site(), "Failed to load site data") {
        Ok(document) => (StatusCode::OK, Json(document)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct SiteUpdate {
    pub section: String,
    pub data: Value,
}

/// POST /api/site - replace one top-level section
pub async fn update_site(Json(update): Json<SiteUpdate>) -> impl IntoResponse {
    let store = match store::get_store() {
        Some(s) => s,
        None => return store_unavailable().into_response(),
    };
    match update_section(
        &store,
        "site",
        &default_site(),
        &update.section,
        update.data,
        "Failed to update site data",
    ) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "success": true, "message": "Site data updated successfully" })),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

/// GET /api/navigation
pub async fn get_navigation() -> impl IntoResponse {
    let store = match store::get_store() {
        Some(s) => s,
        None => return store_unavailable().into_response(),
    };
    match read_singleton(
        &store,
        "navigation",
        &default_navigation(),
        "Failed to load navigation",
    ) {
        Ok(document) => (StatusCode::OK, Json(document)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct NavigationUpdate {
    pub section: String,
    pub navigation: Value,
}

/// POST /api/navigation - replace one navigation section
pub async fn update_navigation(Json(update): Json<NavigationUpdate>) -> impl IntoResponse {
    let store = match store::get_store() {
        Some(s) => s,
        None => return store_unavailable().into_response(),
    };
    match update_section(
        &store,
        "navigation",
        &default_navigation(),
        &update.section,
        update.navigation,
        "Failed to update navigation",
    ) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "success": true, "message": "Navigation updated successfully" })),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

/// GET /api/content
pub async fn get_content() -> impl IntoResponse {
    let store = match store::get_store() {
        Some(s) => s,
        None => return store_unavailable().into_response(),
    };
    match read_singleton(&store, "content", &default_content(), "Failed to load content") {
        Ok(document) => (StatusCode::OK, Json(document)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct ContentUpdate {
    pub section: String,
    pub content: Value,
}

/// POST /api/content - replace one content section
pub async fn update_content(Json(update): Json<ContentUpdate>) -> impl IntoResponse {
    let store = match store::get_store() {
        Some(s) => s,
        None => return store_unavailable().into_response(),
    };
    match update_section(
        &store,
        "content",
        &default_content(),
        &update.section,
        update.content,
        "Failed to update content",
    ) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "success": true, "message": "Content updated successfully" })),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_singleton() {
        let site = default_site();
        assert_eq!(site["company"]["name"], "Posta Vermaas");
        assert_eq!(site["locations"]["main"]["postalCode"], "1018 WB");

        let navigation = default_navigation();
        assert_eq!(navigation["main"][0]["href"], "/");

        let content = default_content();
        assert!(content["homepage"]["hero"]["title"].is_string());
    }
}
