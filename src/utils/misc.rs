//! Small helpers for ids, validation and JSON records.

use std::cmp::Ordering;
use std::collections::HashSet;

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::{Map, Value};
use url::Url;

/// Random alphanumeric id, optionally prefixed (`"my prefix"` → `"my-prefix-..."`).
pub fn generate_random_id(length: usize, prefix: Option<&str>) -> String {
    let id: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect();

    match prefix.filter(|p| !p.is_empty()) {
        Some(prefix) => format!("{}-{}", prefix.replace(' ', "-"), id),
        None => id,
    }
}

/// True if `value` starts with an optionally negative integer and, when
/// bounds are given, parses as a number within them.
pub fn is_valid_integer(value: &str, min: Option<i64>, max: Option<i64>) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    if !digits.starts_with(|c: char| c.is_ascii_digit()) {
        return false;
    }

    if min.is_none() && max.is_none() {
        return true;
    }

    let Ok(number) = value.trim().parse::<f64>() else {
        return false;
    };
    min.map_or(true, |min| number >= min as f64) && max.map_or(true, |max| number <= max as f64)
}

/// True for absolute http(s) URLs.
pub fn is_valid_url(url: &str) -> bool {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return false;
    }
    Url::parse(url).is_ok()
}

/// Escape text for safe inclusion in HTML.
pub fn escape_html(unsafe_text: &str) -> String {
    let mut out = String::with_capacity(unsafe_text.len());
    for c in unsafe_text.chars() {
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

/// Copy of the listed keys present on a JSON object. Non-objects yield `{}`.
pub fn pick(object: &Value, keys: &[&str]) -> Value {
    let mut picked = Map::new();
    if let Value::Object(fields) = object {
        for key in keys {
            if let Some(value) = fields.get(*key) {
                picked.insert((*key).to_string(), value.clone());
            }
        }
    }
    Value::Object(picked)
}

/// True if two records share the same value for `property`.
pub fn has_duplicate_property(items: &[Value], property: &str) -> bool {
    let mut seen = HashSet::new();
    items.iter().any(|item| {
        let value = item.get(property).cloned().unwrap_or(Value::Null);
        !seen.insert(value.to_string())
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Sort records by a string property, case-insensitively. Records missing
/// the property sort first.
pub fn sort_by_property(items: &mut [Value], property: &str, order: SortOrder) {
    items.sort_by(|a, b| {
        let ord = compare_by_property(a, b, property);
        match order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    });
}

/// Compare two JSON records by a string property.
pub fn compare_by_property(a: &Value, b: &Value, property: &str) -> Ordering {
    let key = |v: &Value| v.get(property).and_then(Value::as_str).map(str::to_lowercase);
    key(a).cmp(&key(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_random_id() {
        let id = generate_random_id(12, None);
        assert_eq!(id.len(), 12);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));

        let id = generate_random_id(6, Some("course tab"));
        assert!(id.starts_with("course-tab-"));
        assert_eq!(id.len(), "course-tab-".len() + 6);
        assert_ne!(generate_random_id(16, None), generate_random_id(16, None));
    }

    #[test]
    fn test_is_valid_integer() {
        assert!(is_valid_integer("42", None, None));
        assert!(is_valid_integer("-7", None, None));
        assert!(is_valid_integer("12abc", None, None));
        assert!(!is_valid_integer("abc", None, None));
        assert!(!is_valid_integer("", None, None));

        assert!(is_valid_integer("5", Some(1), Some(10)));
        assert!(!is_valid_integer("0", Some(1), None));
        assert!(!is_valid_integer("11", None, Some(10)));
        assert!(!is_valid_integer("12abc", Some(1), None));
    }

    #[test]
    fn test_is_valid_url() {
        assert!(is_valid_url("https://example.com/path?q=1"));
        assert!(is_valid_url("http://localhost:8080"));
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url("example.com"));
        assert!(!is_valid_url("http://"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_pick() {
        let course = json!({ "name": "Safety", "short_name": "S1", "summary": null, "id": 3 });
        assert_eq!(
            pick(&course, &["name", "summary", "missing"]),
            json!({ "name": "Safety", "summary": null })
        );
        assert_eq!(pick(&Value::Null, &["name"]), json!({}));
    }

    #[test]
    fn test_duplicates() {
        let items = vec![json!({ "email": "a@x.io" }), json!({ "email": "b@x.io" })];
        assert!(!has_duplicate_property(&items, "email"));

        let mut items = items;
        items.push(json!({ "email": "a@x.io" }));
        assert!(has_duplicate_property(&items, "email"));
    }

    #[test]
    fn test_sort_by_property() {
        let mut items = vec![json!({ "n": "beta" }), json!({ "n": "Alpha" }), json!({ "n": "gamma" })];

        sort_by_property(&mut items, "n", SortOrder::Ascending);
        assert_eq!(items[0]["n"], "Alpha");

        sort_by_property(&mut items, "n", SortOrder::Descending);
        assert_eq!(items[0]["n"], "gamma");
        assert_eq!(compare_by_property(&items[0], &items[1], "n"), Ordering::Greater);
    }
}
