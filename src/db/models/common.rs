//! Value types shared across catalog models, stored as JSON TEXT columns.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Media attachment on a product, accessory or spare part
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Media {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub url: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Instagram,
}

/// Optional social profile links on a product
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
}

/// Physical dimensions of an accessory or spare part
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub unit: DimensionUnit,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DimensionUnit {
    Mm,
    Cm,
    In,
}

/// Parse a JSON array column; missing or malformed text yields an empty list
pub fn parse_json_list<T: DeserializeOwned>(json: Option<&str>) -> Vec<T> {
    json.and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or_default()
}

/// Serialize a list for a JSON TEXT column; empty lists store as NULL
pub fn serialize_json_list<T: Serialize>(items: &[T]) -> Option<String> {
    if items.is_empty() {
        None
    } else {
        serde_json::to_string(items).ok()
    }
}

/// Parse a JSON object column
pub fn parse_json<T: DeserializeOwned>(json: Option<&str>) -> Option<T> {
    json.and_then(|s| serde_json::from_str(s).ok())
}

/// Serialize an optional JSON object for a TEXT column
pub fn serialize_json<T: Serialize>(value: Option<&T>) -> Option<String> {
    value.and_then(|v| serde_json::to_string(v).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_wire_format() {
        let media = Media {
            kind: MediaKind::Image,
            url: "https://cdn.example.com/a.jpg".to_string(),
        };
        let json = serde_json::to_string(&media).unwrap();
        assert!(json.contains(r#""type":"image""#));

        let parsed: Media = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, media);
    }

    #[test]
    fn test_json_list_round_trip() {
        let specs = vec!["Die-cast body".to_string(), "Opening doors".to_string()];
        let stored = serialize_json_list(&specs).unwrap();
        let parsed: Vec<String> = parse_json_list(Some(&stored));
        assert_eq!(parsed, specs);
    }

    #[test]
    fn test_json_list_empty_and_malformed() {
        assert!(serialize_json_list::<String>(&[]).is_none());
        let parsed: Vec<String> = parse_json_list(None);
        assert!(parsed.is_empty());
        let parsed: Vec<String> = parse_json_list(Some("not json"));
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_dimensions_unit_lowercase() {
        let dims = Dimensions {
            length: 10.0,
            width: 4.0,
            height: 3.0,
            unit: DimensionUnit::Cm,
        };
        let json = serde_json::to_string(&dims).unwrap();
        assert!(json.contains(r#""unit":"cm""#));
    }
}
