//! Info card rendered as a Telegram HTML message

use serde::Deserialize;

use crate::config::{DEFAULT_OSTICKET_URL, DEFAULT_WIKI_URL};

/// A single `name: value` line of the card.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CardField {
    pub name: String,
    pub value: String,
}

/// Rich reply sent for the `info` command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InfoCard {
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fields: Vec<CardField>,
    #[serde(default)]
    pub footer: Option<String>,
}

impl Default for InfoCard {
    fn default() -> Self {
        Self {
            title: "Sark".to_string(),
            url: Some(DEFAULT_WIKI_URL.to_string()),
            description: "Helper bot for the Free Geek Arkansas volunteers.".to_string(),
            fields: vec![
                CardField {
                    name: "Tickets".to_string(),
                    value: DEFAULT_OSTICKET_URL.to_string(),
                },
                CardField {
                    name: "Wiki".to_string(),
                    value: DEFAULT_WIKI_URL.to_string(),
                },
            ],
            footer: None,
        }
    }
}

impl InfoCard {
    /// Render the card with Telegram's HTML parse mode in mind.
    pub fn to_html(&self) -> String {
        let title = escape_html(&self.title);
        let mut lines = vec![match &self.url {
            Some(url) => format!("<b><a href=\"{}\">{}</a></b>", escape_html(url), title),
            None => format!("<b>{}</b>", title),
        }];

        if !self.description.is_empty() {
            lines.push(escape_html(&self.description));
        }

        if !self.fields.is_empty() {
            lines.push(String::new());
            for field in &self.fields {
                lines.push(format!(
                    "<b>{}:</b> {}",
                    escape_html(&field.name),
                    escape_html(&field.value)
                ));
            }
        }

        if let Some(footer) = &self.footer {
            lines.push(String::new());
            lines.push(format!("<i>{}</i>", escape_html(footer)));
        }

        lines.join("\n")
    }
}

/// Escape the characters Telegram's HTML parser treats specially.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
