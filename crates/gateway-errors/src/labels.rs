use crate::model::ErrorObj;
use std::collections::BTreeMap;

/// Meta keys promoted to log labels when present.
const LABELLED_META: [&str; 2] = ["route", "tenant"];

/// Low-cardinality labels describing an error, for structured logs.
pub fn labels(err: &ErrorObj) -> BTreeMap<&'static str, String> {
    let mut map = BTreeMap::from([
        ("code", err.code.to_string()),
        ("kind", err.kind.to_string()),
        ("status", err.http_status.to_string()),
        ("retryable", err.retryable.as_str().to_string()),
        ("severity", err.severity.as_str().to_string()),
    ]);

    for key in LABELLED_META {
        if let Some(value) = err.meta.get(key) {
            let rendered = value
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string());
            map.insert(key, rendered);
        }
    }

    map
}
