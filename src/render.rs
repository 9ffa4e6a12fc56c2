//! Plain-text and markup renderings of a composed command

use serde::{Deserialize, Serialize};

use crate::compositor::CommandPart;

/// Escape text for inclusion in HTML content or attribute values.
///
/// ```
/// use jetpalette::render::escape_html;
///
/// assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
/// ```
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

/// Concatenate part texts in order.
pub fn plain_text(parts: &[CommandPart]) -> String {
    parts.iter().map(|p| p.text.as_str()).collect()
}

/// Render parts as HTML, wrapping colored parts in a styled span.
pub fn markup(parts: &[CommandPart]) -> String {
    let mut out = String::new();
    for part in parts {
        match part.color.as_deref().filter(|c| !c.is_empty()) {
            Some(color) => {
                out.push_str("<span style=\"color: ");
                out.push_str(&escape_html(color));
                out.push_str("\">");
                out.push_str(&escape_html(&part.text));
                out.push_str("</span>");
            }
            None => out.push_str(&escape_html(&part.text)),
        }
    }
    out
}

/// A composed command in every form the sheet displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutput {
    pub html: String,
    pub text: String,
    pub parts: Vec<CommandPart>,
}

impl CommandOutput {
    pub fn from_parts(parts: Vec<CommandPart>) -> Self {
        Self { html: markup(&parts), text: plain_text(&parts), parts }
    }
}
