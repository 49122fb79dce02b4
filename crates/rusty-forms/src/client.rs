// File: src/client.rs
// Purpose: Client-side validation attributes emitted from rule configuration

use std::collections::BTreeMap;

use maud::{html, Markup, PreEscaped};
use serde::Serialize;

use crate::catalog::RuleCatalog;
use crate::context::DisplayNames;
use crate::rule::Rule;

/// Serialized whitelist configuration for an out-of-process evaluator.
///
/// `allowed` is exactly the list interpolated into the server message;
/// `message` is fully formatted. Both are raw text: escaping belongs to
/// whatever embeds them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientMirror {
    adapter: String,
    allowed: String,
    message: String,
}

impl ClientMirror {
    /// Mirror of a whitelist rule; `None` for every other rule kind
    pub fn from_rule(rule: &Rule, display_name: &str, names: &dyn DisplayNames) -> Option<Self> {
        let allowed = rule.allowed_values()?;
        Some(Self {
            adapter: allowed.adapter().to_string(),
            allowed: allowed.token(),
            message: rule.format_message(display_name, names),
        })
    }

    pub fn adapter(&self) -> &str {
        &self.adapter
    }

    /// Normalized, delimiter-joined allowed values
    pub fn allowed_token(&self) -> &str {
        &self.allowed
    }

    pub fn message_token(&self) -> &str {
        &self.message
    }

    /// `data-val-<adapter>` carries the message,
    /// `data-val-<adapter>-allowed` the allowed list.
    pub fn attributes(&self) -> Vec<(String, String)> {
        vec![
            (format!("data-val-{}", self.adapter), self.message.clone()),
            (format!("data-val-{}-allowed", self.adapter), self.allowed.clone()),
        ]
    }
}

/// Mirrors for every whitelist rule on `field`, in rule order
pub fn client_mirrors(catalog: &RuleCatalog, field: &str) -> Vec<ClientMirror> {
    let Some(entry) = catalog.field(field) else {
        return Vec::new();
    };
    entry
        .rules()
        .iter()
        .filter_map(|rule| ClientMirror::from_rule(rule, entry.display_name(), catalog))
        .collect()
}

/// Client validation attributes for one field
#[derive(Debug, Clone)]
pub struct FieldAttrs {
    /// Display name, for labels
    pub label: String,
    /// Attribute name to raw (unescaped) value
    pub attrs: BTreeMap<String, String>,
}

impl FieldAttrs {
    /// Attributes for a declared field, `None` if the catalog does not know it
    pub fn for_field(catalog: &RuleCatalog, field: &str) -> Option<Self> {
        let entry = catalog.field(field)?;
        let display = entry.display_name();
        let mut attrs = BTreeMap::new();

        for rule in entry.rules() {
            if let Some(mirror) = ClientMirror::from_rule(rule, display, catalog) {
                attrs.extend(mirror.attributes());
                continue;
            }

            let params = rule.parameters();
            let message = rule.format_message(display, catalog);
            let param = |key: &str| params.get(key).cloned().unwrap_or_default();
            match rule.name() {
                "required" => {
                    attrs.insert("data-val-required".to_string(), message);
                }
                "length" => {
                    attrs.insert("data-val-length-min".to_string(), param("min"));
                    attrs.insert("data-val-length-max".to_string(), param("max"));
                    attrs.insert("data-val-length".to_string(), message);
                }
                "range" => {
                    attrs.insert("data-val-range-min".to_string(), param("min"));
                    attrs.insert("data-val-range-max".to_string(), param("max"));
                    attrs.insert("data-val-range".to_string(), message);
                }
                "pattern" => {
                    attrs.insert("data-val-regex-pattern".to_string(), param("pattern"));
                    attrs.insert("data-val-regex".to_string(), message);
                }
                _ => {}
            }
        }

        if !attrs.is_empty() {
            attrs.insert("data-val".to_string(), "true".to_string());
        }

        Some(Self {
            label: display.to_string(),
            attrs,
        })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Render the attributes, escaped, as `name="value"` pairs
    pub fn render_attrs(&self) -> String {
        self.attrs
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", k, escape(v)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// A text `<input>` carrying the attributes
    pub fn render_input(&self, name: &str, value: &str) -> Markup {
        let mut tag = format!(
            "<input type=\"text\" id=\"{name}\" name=\"{name}\" value=\"{value}\"",
            name = escape(name),
            value = escape(value),
        );
        if !self.attrs.is_empty() {
            tag.push(' ');
            tag.push_str(&self.render_attrs());
        }
        tag.push('>');
        PreEscaped(tag)
    }
}

fn escape(raw: &str) -> String {
    html! { (raw) }.into_string()
}
