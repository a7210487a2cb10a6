use serde_json::Value;

/// Pulls the human-readable `detail` out of an error body.
///
/// The API answers with `{"detail": "..."}` for handled errors and with a list
/// of `{"loc": [...], "msg": "..."}` objects for request validation failures.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::String(_) | Value::Null => None,
        Value::Array(entries) => {
            let messages: Vec<String> = entries
                .iter()
                .filter_map(|entry| match entry {
                    Value::String(s) => Some(s.clone()),
                    Value::Object(obj) => {
                        let msg = obj.get("msg").and_then(Value::as_str)?;
                        let field = obj
                            .get("loc")
                            .and_then(Value::as_array)
                            .and_then(|loc| loc.last())
                            .and_then(Value::as_str);
                        Some(match field {
                            Some(field) => format!("{field}: {msg}"),
                            None => msg.to_string(),
                        })
                    }
                    _ => None,
                })
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        other => Some(other.to_string()),
    }
}
