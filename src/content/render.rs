//! Generic block renderer.
//!
//! Pure dispatch from block `type` to an HTML-emitting routine. Blocks are
//! rendered in `order`, hidden blocks are skipped, and unknown types render
//! nothing. All interpolated text is escaped.

use serde_json::Value;

use super::page::{Block, Page};
use super::transform::normalize_page;

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn text(content: &Value, field: &str) -> String {
    escape_html(content.get(field).and_then(Value::as_str).unwrap_or(""))
}

fn items<'a>(content: &'a Value, field: &str) -> &'a [Value] {
    content
        .get(field)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Render a normalized block list to an HTML fragment.
pub fn render_blocks(blocks: &[Block]) -> String {
    let mut visible: Vec<&Block> = blocks.iter().filter(|b| b.visible).collect();
    visible.sort_by_key(|b| b.order);
    visible.iter().map(|b| render_block(b)).collect()
}

fn render_block(block: &Block) -> String {
    let content = &block.content;
    match block.kind.as_str() {
        "hero" => render_hero(block, content),
        "text" => format!(
            "<section class=\"text\" id=\"{}\"><p>{}</p></section>\n",
            escape_html(&block.id),
            text(content, "body"),
        ),
        "cta" => format!(
            "<section class=\"cta\" id=\"{}\"><a href=\"{}\">{}</a></section>\n",
            escape_html(&block.id),
            text(content, "link"),
            text(content, "label"),
        ),
        "stats" => render_stats(block, content),
        "contact-info" => render_contact_info(block, content),
        "contact-form" => render_contact_form(block, content),
        "service-highlights" => render_service_highlights(block, content),
        "studio-details" => render_studio_details(block, content),
        "equipment-list" => render_equipment_list(block, content),
        _ => String::new(),
    }
}

fn render_hero(block: &Block, content: &Value) -> String {
    format!(
        "<section class=\"hero\" id=\"{}\"><h1>{}</h1><h2>{}</h2><p>{}</p></section>\n",
        escape_html(&block.id),
        text(content, "title"),
        text(content, "subtitle"),
        text(content, "description"),
    )
}

fn render_stats(block: &Block, content: &Value) -> String {
    let mut out = format!("<section class=\"stats\" id=\"{}\"><dl>", escape_html(&block.id));
    for stat in items(content, "stats") {
        out.push_str(&format!(
            "<div><dt>{}</dt><dd>{}</dd></div>",
            text(stat, "label"),
            text(stat, "value"),
        ));
    }
    out.push_str("</dl></section>\n");
    out
}

fn render_contact_info(block: &Block, content: &Value) -> String {
    let mut out = format!("<section class=\"contact-info\" id=\"{}\"><ul>", escape_html(&block.id));
    for entry in items(content, "contactInfo") {
        out.push_str(&format!(
            "<li><strong>{}</strong> {}</li>",
            text(entry, "label"),
            text(entry, "value"),
        ));
    }
    out.push_str("</ul></section>\n");
    out
}

fn render_contact_form(block: &Block, content: &Value) -> String {
    let mut out = format!(
        "<section class=\"contact-form\" id=\"{}\"><form method=\"post\">",
        escape_html(&block.id)
    );
    for field in items(content, "fields") {
        let name = text(field, "name");
        let kind = field.get("type").and_then(Value::as_str).unwrap_or("text");
        out.push_str(&format!(
            "<label>{}<input name=\"{}\" type=\"{}\"></label>",
            text(field, "label"),
            name,
            escape_html(kind),
        ));
    }
    out.push_str(&format!(
        "<button type=\"submit\">{}</button></form></section>\n",
        text(content, "submitText"),
    ));
    out
}

fn render_service_highlights(block: &Block, content: &Value) -> String {
    let mut out = format!(
        "<section class=\"service-highlights\" id=\"{}\">",
        escape_html(&block.id)
    );
    for service in items(content, "services") {
        out.push_str(&format!(
            "<article><h3>{}</h3><p>{}</p>",
            text(service, "title"),
            text(service, "description"),
        ));
        let features = items(service, "features");
        if !features.is_empty() {
            out.push_str("<ul>");
            for feature in features {
                out.push_str(&format!(
                    "<li>{}</li>",
                    escape_html(feature.as_str().unwrap_or(""))
                ));
            }
            out.push_str("</ul>");
        }
        out.push_str("</article>");
    }
    out.push_str("</section>\n");
    out
}

fn render_studio_details(block: &Block, content: &Value) -> String {
    let mut out = format!("<section class=\"studio-details\" id=\"{}\">", escape_html(&block.id));
    for studio in items(content, "studios") {
        out.push_str(&format!(
            "<article><h3>{}</h3><p>{}</p></article>",
            text(studio, "name"),
            text(studio, "description"),
        ));
    }
    out.push_str("</section>\n");
    out
}

fn render_equipment_list(block: &Block, content: &Value) -> String {
    let mut out = format!("<section class=\"equipment-list\" id=\"{}\">", escape_html(&block.id));
    for category in items(content, "categories") {
        out.push_str(&format!("<h3>{}</h3><ul>", text(category, "name")));
        for item in items(category, "items") {
            out.push_str(&format!("<li>{}</li>", escape_html(item.as_str().unwrap_or(""))));
        }
        out.push_str("</ul>");
    }
    out.push_str("</section>\n");
    out
}

/// Render a stored page as a complete, minimal HTML document.
pub fn render_page_html(page: &Page) -> String {
    let editor = normalize_page(page);
    let title = if page.metadata.title.is_empty() {
        &page.title
    } else {
        &page.metadata.title
    };
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<meta name=\"description\" content=\"{}\">\n</head>\n\
         <body>\n{}</body>\n</html>\n",
        escape_html(title),
        escape_html(&page.metadata.description),
        render_blocks(&editor.blocks),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn block(kind: &str, order: usize, visible: bool, content: Value) -> Block {
        Block {
            id: format!("{kind}-{order}"),
            kind: kind.to_string(),
            order,
            visible,
            content,
        }
    }

    #[test]
    fn unknown_types_render_nothing() {
        let html = render_blocks(&[block("holographic-tour", 0, true, json!({ "x": 1 }))]);
        assert!(html.is_empty());
    }

    #[test]
    fn hidden_blocks_are_skipped() {
        let html = render_blocks(&[
            block("hero", 0, false, json!({ "title": "Hidden" })),
            block("hero", 1, true, json!({ "title": "Shown" })),
        ]);
        assert!(!html.contains("Hidden"));
        assert!(html.contains("Shown"));
    }

    #[test]
    fn blocks_render_in_order() {
        let html = render_blocks(&[
            block("hero", 1, true, json!({ "title": "Second" })),
            block("hero", 0, true, json!({ "title": "First" })),
        ]);
        assert!(html.find("First").unwrap() < html.find("Second").unwrap());
    }

    #[test]
    fn interpolated_text_is_escaped() {
        let html = render_blocks(&[block(
            "hero",
            0,
            true,
            json!({ "title": "<script>alert(1)</script>" }),
        )]);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn stats_render_label_and_value() {
        let html = render_blocks(&[block(
            "stats",
            0,
            true,
            json!({ "stats": [{ "label": "Projects", "value": "500+" }] }),
        )]);
        assert!(html.contains("<dt>Projects</dt>"));
        assert!(html.contains("<dd>500+</dd>"));
    }

    #[test]
    fn page_html_uses_metadata_title() {
        let page = Page {
            id: "about".to_string(),
            title: "About Us".to_string(),
            metadata: crate::content::PageMetadata {
                title: "About Us - Posta Vermaas".to_string(),
                ..Default::default()
            },
            ..Page::default()
        };
        let html = render_page_html(&page);
        assert!(html.contains("<title>About Us - Posta Vermaas</title>"));
    }
}
