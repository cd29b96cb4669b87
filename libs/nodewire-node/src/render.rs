//! JSON rendering of node information, used for display and for comparing
//! what survived a trip through an older protocol version.

use serde::Serialize;
use serde_json::Value;

use crate::node_info::NodeInfo;

pub fn render_json(info: &NodeInfo) -> Result<Value, serde_json::Error> {
    to_json(info)
}

/// Any section of the family, e.g. `render::to_json(&info.os)`.
pub fn to_json<T: Serialize + ?Sized>(section: &T) -> Result<Value, serde_json::Error> {
    serde_json::to_value(section)
}

pub fn render_pretty(info: &NodeInfo) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(info)
}

/// Top-level keys present in `before` but not in `after`.
pub fn dropped_keys(before: &Value, after: &Value) -> Vec<String> {
    let (Some(before), Some(after)) = (before.as_object(), after.as_object()) else {
        return Vec::new();
    };
    before
        .keys()
        .filter(|k| !after.contains_key(*k))
        .cloned()
        .collect()
}

/// Top-level keys present in both but rendered differently.
pub fn changed_keys(before: &Value, after: &Value) -> Vec<String> {
    let (Some(before), Some(after)) = (before.as_object(), after.as_object()) else {
        return Vec::new();
    };
    before
        .iter()
        .filter(|(k, v)| after.get(*k).is_some_and(|a| a != *v))
        .map(|(k, _)| k.clone())
        .collect()
}
