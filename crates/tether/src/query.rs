//! Query-string encoding for request parameters.

use serde_json::Value;

/// Request parameters: a JSON object whose nested objects and arrays become
/// bracketed keys.
pub type Params = serde_json::Map<String, Value>;

/// Encodes parameters bracket style, keeping insertion order.
///
/// `{"page": {"size": 10}, "filter": {"id": [1, 2]}}` becomes
/// `page[size]=10&filter[id][]=1&filter[id][]=2`. Keys and values are
/// percent-encoded; brackets are left readable. `null` encodes as an empty
/// value.
pub fn to_query_string(params: &Params) -> String {
    let mut pairs = vec![];

    for (key, value) in params {
        flatten(&encode(key), value, &mut pairs);
    }

    pairs
        .into_iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, value) in map {
                flatten(&format!("{prefix}[{}]", encode(key)), value, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                flatten(&format!("{prefix}[]"), item, out);
            }
        }
        Value::Null => out.push((prefix.to_string(), String::new())),
        Value::String(s) => out.push((prefix.to_string(), encode(s))),
        other => out.push((prefix.to_string(), encode(&other.to_string()))),
    }
}

fn encode(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}
