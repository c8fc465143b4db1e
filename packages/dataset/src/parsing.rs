//! Field extraction for fixture nodes.
//!
//! Fixture properties come in Chinese and English spellings and numbers
//! are sometimes stored as strings. Every extractor tries its field names
//! in order and takes the first usable value.

use serde_json::Value;
use wanbei_map_event_models::{EventRecord, GeoPoint};

use crate::Node;

const LNG_FIELDS: &[&str] = &["lng", "经度"];
const LAT_FIELDS: &[&str] = &["lat", "纬度"];
const REGION_FIELDS: &[&str] = &["地区", "region"];
const CATEGORY_FIELDS: &[&str] = &["突发事件", "事件类型"];
const NAME_FIELDS: &[&str] = &["事件名称", "name", "名称"];

/// Converts an event node into an [`EventRecord`]. Nodes without an id
/// get a positional one.
#[must_use]
pub fn node_to_event(node: &Node, position: usize) -> EventRecord {
    let id = node_id(&node.id).unwrap_or_else(|| format!("event-{position}"));

    let coordinate = parse_lng_lat(
        first_number(&node.properties, LNG_FIELDS),
        first_number(&node.properties, LAT_FIELDS),
    );

    EventRecord {
        id,
        name: first_str(&node.properties, NAME_FIELDS),
        coordinate,
        region: first_str(&node.properties, REGION_FIELDS),
        category: first_str(&node.properties, CATEGORY_FIELDS),
    }
}

/// Builds a coordinate from optional axes. Returns `None` if either axis
/// is missing or zero.
#[must_use]
pub fn parse_lng_lat(lng: Option<f64>, lat: Option<f64>) -> Option<GeoPoint> {
    let lng = lng?;
    let lat = lat?;
    if lng == 0.0 || lat == 0.0 || !lng.is_finite() || !lat.is_finite() {
        return None;
    }
    Some(GeoPoint { lng, lat })
}

fn node_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First non-empty string among `fields`.
fn first_str(props: &serde_json::Map<String, Value>, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .filter_map(|field| props.get(*field)?.as_str())
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// First non-zero number among `fields`, accepting numeric strings.
fn first_number(props: &serde_json::Map<String, Value>, fields: &[&str]) -> Option<f64> {
    fields
        .iter()
        .filter_map(|field| {
            let value = props.get(*field)?;
            value
                .as_f64()
                .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
        })
        .find(|v| *v != 0.0)
}
