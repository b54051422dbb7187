//! Field-level change summaries for update entries

use serde_json::Value;

/// Summarise top-level field changes between two JSON values, or `None`
/// when nothing changed
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let changes = match (before, after) {
        (Value::Object(before_obj), Value::Object(after_obj)) => {
            let mut changes = Vec::new();

            for (key, before_val) in before_obj {
                match after_obj.get(key) {
                    Some(after_val) if after_val != before_val => changes.push(format!(
                        "{}: {} -> {}",
                        key,
                        format_value(before_val),
                        format_value(after_val)
                    )),
                    Some(_) => {}
                    None => changes.push(format!("{}: {} -> (removed)", key, format_value(before_val))),
                }
            }

            for (key, after_val) in after_obj {
                if !before_obj.contains_key(key) {
                    changes.push(format!("{}: (added) -> {}", key, format_value(after_val)));
                }
            }

            changes
        }
        _ if before != after => vec![format!(
            "{} -> {}",
            format_value(before),
            format_value(after)
        )],
        _ => Vec::new(),
    };

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.chars().count() > 40 => {
            let head: String = s.chars().take(37).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_changed_field_only() {
        let before = json!({"year": 2024, "q2_start": "04-01"});
        let after = json!({"year": 2024, "q2_start": "05-01"});

        let diff = generate_diff(&before, &after).unwrap();
        assert_eq!(diff, "q2_start: \"04-01\" -> \"05-01\"");
    }

    #[test]
    fn test_added_and_removed() {
        let before = json!({"a": 1});
        let after = json!({"b": true});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("a: 1 -> (removed)"));
        assert!(diff.contains("b: (added) -> true"));
    }

    #[test]
    fn test_no_changes() {
        let value = json!({"year": 2024});
        assert!(generate_diff(&value, &value).is_none());
    }

    #[test]
    fn test_scalar_values() {
        assert_eq!(
            generate_diff(&json!("USD"), &json!("EUR")).as_deref(),
            Some("\"USD\" -> \"EUR\"")
        );
        assert!(generate_diff(&json!(false), &json!(false)).is_none());
    }

    #[test]
    fn test_long_string_truncation() {
        let long = "é".repeat(60);
        let diff = generate_diff(&json!({"description": long}), &json!({"description": "x"})).unwrap();
        assert!(diff.contains("...\""));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!(null)), "null");
        assert_eq!(format_value(&json!([1, 2, 3])), "[3 items]");
        assert_eq!(format_value(&json!({"a": 1, "b": 2})), "{2 fields}");
    }
}
