use std::sync::LazyLock;

use regex::Regex;

static ATTRIBUTE_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_][A-Za-z0-9_-]*)\s*=\s*"([^"]*)""#).expect("valid regex pattern")
});

/// Extract a double-quoted `key="value"` attribute from an opening tag
///
/// Attribute order does not matter and names match case-insensitively.
/// Values must be double-quoted; embedded quotes are not supported. Returns
/// `None` when the attribute is absent.
pub fn extract_attribute(tag: &str, name: &str) -> Option<String> {
    ATTRIBUTE_PAIR.captures_iter(tag).find_map(|caps| {
        let key = caps.get(1).map_or("", |m| m.as_str());
        if key.eq_ignore_ascii_case(name) {
            Some(caps.get(2).map_or("", |m| m.as_str()).to_string())
        } else {
            None
        }
    })
}
