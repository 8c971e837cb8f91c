//! Payload formatting (structured JSON → Telegram HTML).

use serde_json::Value;

/// Escape HTML special characters for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render an arbitrary payload into display markup.
///
/// A `text` key with a non-empty trimmed string short-circuits everything:
/// its value is returned verbatim (trimmed, escaped). Otherwise key/value
/// pairs are rendered recursively; `null` and empty-string values are
/// dropped at every depth. An empty result means "nothing to send" and the
/// caller records a diagnostic, never an error.
pub fn render(payload: &Value) -> String {
    if let Some(text) = payload.get("text").and_then(Value::as_str) {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            return escape_html(trimmed);
        }
    }

    let mut lines = Vec::new();
    match payload {
        Value::Object(map) => {
            for (key, value) in map {
                render_entry(key, value, 0, &mut lines);
            }
        }
        other => {
            if let Some(s) = scalar_text(other) {
                lines.push(escape_html(&s));
            }
        }
    }
    lines.join("\n")
}

fn render_entry(label: &str, value: &Value, depth: usize, out: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    let label = escape_html(label);

    match value {
        Value::Object(map) => {
            // Render children first so an all-empty mapping drops its header.
            let mut children = Vec::new();
            for (key, child) in map {
                render_entry(key, child, depth + 1, &mut children);
            }
            if children.is_empty() {
                return;
            }
            out.push(format!("{indent}<b>{label}:</b>"));
            out.append(&mut children);
        }
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(scalar_text)
                .map(|s| escape_html(&s))
                .collect();
            if parts.is_empty() {
                return;
            }
            out.push(format!("{indent}<b>{label}:</b> {}", parts.join(", ")));
        }
        scalar => {
            let Some(text) = scalar_text(scalar) else {
                return;
            };
            let text = escape_html(&text);
            if depth == 0 {
                out.push(format!("<b>{label}:</b> {text}"));
            } else {
                out.push(format!("{indent}{label}: {text}"));
            }
        }
    }
}

/// Stringify a scalar, treating `null` and blank strings as absent.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        // Nested containers inside an array are summarized as compact JSON.
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn escapes_html() {
        let s = r#"<a href="x&y">"#;
        assert_eq!(escape_html(s), "&lt;a href=&quot;x&amp;y&quot;&gt;");
    }

    #[test]
    fn text_key_short_circuits() {
        let v = json!({"text": "  hello <world>  ", "other": 1});
        assert_eq!(render(&v), "hello &lt;world&gt;");
    }

    #[test]
    fn blank_text_key_falls_through_to_structure() {
        let v = json!({"text": "   ", "count": 3});
        assert_eq!(render(&v), "<b>count:</b> 3");
    }

    #[test]
    fn renders_nested_mapping_and_drops_nulls() {
        let v = json!({"a": 1, "b": {"c": 2, "d": null}});
        assert_eq!(render(&v), "<b>a:</b> 1\n<b>b:</b>\n  c: 2");
    }

    #[test]
    fn renders_sequence_comma_joined() {
        let v = json!({"tags": ["x", "", "y", null]});
        assert_eq!(render(&v), "<b>tags:</b> x, y");
    }

    #[test]
    fn all_empty_payload_renders_empty() {
        let v = json!({"a": null, "b": ""});
        assert_eq!(render(&v), "");
    }

    #[test]
    fn all_empty_nested_mapping_drops_its_header() {
        let v = json!({"a": {"b": null, "c": ""}});
        assert_eq!(render(&v), "");
    }
}
