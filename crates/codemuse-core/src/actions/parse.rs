use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

fn fenced_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json|JSON)?[ \t]*\r?\n(.*?)```").expect("valid fence regex")
    })
}

/// Locate the JSON object in a model reply.
///
/// Accepts a bare object, an object inside a fenced block, or an object
/// surrounded by prose. Returns `None` when nothing parses as an object.
pub fn extract_json_object(reply: &str) -> Option<Value> {
    let trimmed = reply.trim();
    if let Some(v) = parse_object(trimmed) {
        return Some(v);
    }

    for caps in fenced_block().captures_iter(trimmed) {
        if let Some(v) = caps.get(1).and_then(|m| parse_object(m.as_str().trim())) {
            return Some(v);
        }
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    parse_object(&trimmed[start..=end])
}

fn parse_object(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(v @ Value::Object(_)) => Some(v),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_object() {
        let v = extract_json_object(r#" {"code": "x"} "#).unwrap();
        assert_eq!(v["code"], "x");
    }

    #[test]
    fn test_fenced_object() {
        let reply = "Here you go:\n```json\n{\"output\": \"2\\n\"}\n```\nEnjoy.";
        let v = extract_json_object(reply).unwrap();
        assert_eq!(v["output"], "2\n");
    }

    #[test]
    fn test_object_inside_prose() {
        let v = extract_json_object("Sure! {\"explanation\": \"it adds\"} Hope that helps").unwrap();
        assert_eq!(v["explanation"], "it adds");
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(extract_json_object("[1, 2, 3]").is_none());
        assert!(extract_json_object("just words").is_none());
        assert!(extract_json_object("} backwards {").is_none());
    }
}
