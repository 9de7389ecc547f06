//! Popup templates attached to markers.

use serde::Serialize;

/// Body of a popup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum PopupContent {
    /// Pre-formatted HTML.
    Html(String),
    /// Plain text shown as-is.
    Text(String),
}

impl PopupContent {
    pub fn as_str(&self) -> &str {
        match self {
            PopupContent::Html(s) | PopupContent::Text(s) => s,
        }
    }
}

/// Info panel shown when a marker is activated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub title: String,
    pub content: PopupContent,
    /// Whether the popup may be collapsed to its title bar.
    pub collapse_enabled: bool,
}

/// Font size applied to housing popup titles.
pub const TITLE_FONT_SIZE_PX: u32 = 16;

/// Title used for energy popups.
pub const ENERGY_POPUP_TITLE: &str = "Energy rating";

impl Popup {
    /// Popup for a housing listing: the name as title and a two-row table.
    pub fn housing(name: &str, address: &str, link: &str) -> Self {
        let name = escape_html(name);
        let title = format!(
            r#"<span style="font-size:{}px">{}</span>"#,
            TITLE_FONT_SIZE_PX, name
        );
        let body = format!(
            concat!(
                r#"<table class="popup-table">"#,
                r#"<tr><th>Name</th><td><a href="{link}">{name}</a></td></tr>"#,
                r#"<tr><th>Address</th><td>{address}</td></tr>"#,
                "</table>"
            ),
            link = escape_html(link),
            name = name,
            address = escape_html(address),
        );

        Self {
            title,
            content: PopupContent::Html(body),
            collapse_enabled: false,
        }
    }

    /// Popup for an energy site showing its rating.
    pub fn energy(rating: &str) -> Self {
        Self {
            title: ENERGY_POPUP_TITLE.to_string(),
            content: PopupContent::Text(rating.to_string()),
            collapse_enabled: false,
        }
    }
}

/// Escapes the characters that would break out of HTML text or attributes.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_housing_popup_contains_fields_in_table() {
        let popup = Popup::housing("Test House", "1 Test St", "/product/1");
        let body = popup.content.as_str();

        assert!(body.starts_with("<table"));
        assert!(body.ends_with("</table>"));
        assert!(body.contains(r#"<tr><th>Name</th><td><a href="/product/1">Test House</a></td></tr>"#));
        assert!(body.contains("<tr><th>Address</th><td>1 Test St</td></tr>"));
        assert_eq!(body.matches("<tr>").count(), 2);
    }

    #[test]
    fn test_housing_popup_title_has_font_size() {
        let popup = Popup::housing("Test House", "1 Test St", "/product/1");
        assert_eq!(
            popup.title,
            r#"<span style="font-size:16px">Test House</span>"#
        );
        assert!(!popup.collapse_enabled);
    }

    #[test]
    fn test_housing_popup_escapes_markup() {
        let popup = Popup::housing("<b>Flat</b>", "Smith & Sons", "/p/1");
        let body = popup.content.as_str();
        assert!(body.contains("&lt;b&gt;Flat&lt;/b&gt;"));
        assert!(body.contains("Smith &amp; Sons"));
        assert!(!body.contains("<b>"));
    }

    #[test]
    fn test_energy_popup() {
        let popup = Popup::energy("B");
        assert_eq!(popup.title, ENERGY_POPUP_TITLE);
        assert_eq!(popup.content, PopupContent::Text("B".to_string()));
    }
}
