//! Record codecs for item files.
//!
//! A codec turns one Item into the bytes of its record file and back. Codecs
//! are stateless values owned by the store; `JsonCodec` is the default and
//! `YamlCodec` is available for hand-edited stores.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Item;
use crate::error::Result;

/// Encode/decode contract for record files.
///
/// `decode(encode(item))` must reproduce every field of `item`.
pub trait RecordCodec: Send + Sync {
    /// File extension for records, without the leading dot
    fn extension(&self) -> &'static str;

    /// Encode an item into record bytes
    fn encode(&self, item: &Item) -> Result<Vec<u8>>;

    /// Decode record bytes into an item
    fn decode(&self, bytes: &[u8]) -> Result<Item>;
}

/// Pretty-printed JSON records (`.json`)
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl RecordCodec for JsonCodec {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn encode(&self, item: &Item) -> Result<Vec<u8>> {
        let mut bytes = serde_json::to_vec_pretty(item)?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Item> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// YAML records (`.yml`)
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl RecordCodec for YamlCodec {
    fn extension(&self) -> &'static str {
        "yml"
    }

    fn encode(&self, item: &Item) -> Result<Vec<u8>> {
        Ok(serde_yaml::to_string(item)?.into_bytes())
    }

    fn decode(&self, bytes: &[u8]) -> Result<Item> {
        Ok(serde_yaml::from_slice(bytes)?)
    }
}

/// Record format selected by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordFormat {
    #[default]
    Json,
    Yaml,
}

impl RecordFormat {
    /// Build the codec for this format
    pub fn codec(&self) -> Box<dyn RecordCodec> {
        match self {
            RecordFormat::Json => Box::new(JsonCodec),
            RecordFormat::Yaml => Box::new(YamlCodec),
        }
    }
}

impl fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordFormat::Json => f.write_str("json"),
            RecordFormat::Yaml => f.write_str("yaml"),
        }
    }
}

impl<C: RecordCodec + ?Sized> RecordCodec for Box<C> {
    fn extension(&self) -> &'static str {
        (**self).extension()
    }

    fn encode(&self, item: &Item) -> Result<Vec<u8>> {
        (**self).encode(item)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Item> {
        (**self).decode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Priority;
    use crate::error::PrioritError;
    use chrono::{TimeZone, Utc};

    fn sample_item() -> Item {
        Item::new()
            .with_id("1738300800123_417")
            .with_title("naming things")
            .with_text("multi\nline: text with \"quotes\"")
            .with_categories(["Work", "hard problems", "zzz"])
            .with_due_date(Utc.with_ymd_and_hms(2026, 11, 2, 18, 45, 12).unwrap())
            .with_priority(Priority::Med)
            .with_done(false)
    }

    #[test]
    fn test_json_round_trip() {
        let codec = JsonCodec;
        let item = sample_item();
        let restored = codec.decode(&codec.encode(&item).unwrap()).unwrap();
        assert!(item.same_content(&restored));
    }

    #[test]
    fn test_yaml_round_trip() {
        let codec = YamlCodec;
        let item = sample_item().with_priority(Priority::VeryHigh).with_done(true);
        let restored = codec.decode(&codec.encode(&item).unwrap()).unwrap();
        assert!(item.same_content(&restored));
    }

    #[test]
    fn test_category_order_in_record_does_not_matter() {
        let codec = JsonCodec;
        let json = br#"{
            "id": "x",
            "title": "",
            "text": "",
            "categories": ["zeta", "Alpha", "mid"],
            "due_date": "2026-01-01T00:00:00Z",
            "priority": "LOW",
            "done": false
        }"#;
        let item = codec.decode(json).unwrap();
        assert_eq!(item.category_names(), vec!["Alpha", "mid", "zeta"]);
        assert_eq!(item.priority(), Priority::Low);
    }

    #[test]
    fn test_json_encoding_uses_priority_names() {
        let bytes = JsonCodec.encode(&sample_item()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\"MED\""));
    }

    #[test]
    fn test_decode_garbage_is_codec_error() {
        let err = JsonCodec.decode(b"<item><uName>x</uName></item>").unwrap_err();
        assert!(matches!(err, PrioritError::Codec(_)));
    }

    #[test]
    fn test_decode_unknown_priority_fails() {
        let json = br#"{"id":"x","due_date":"2026-01-01T00:00:00Z","priority":"URGENT"}"#;
        assert!(JsonCodec.decode(json).is_err());
    }

    #[test]
    fn test_format_selects_extension() {
        assert_eq!(RecordFormat::Json.codec().extension(), "json");
        assert_eq!(RecordFormat::Yaml.codec().extension(), "yml");
    }

    #[test]
    fn test_boxed_codec_delegates() {
        let codec: Box<dyn RecordCodec> = RecordFormat::Yaml.codec();
        let item = sample_item();
        let restored = codec.decode(&codec.encode(&item).unwrap()).unwrap();
        assert!(item.same_content(&restored));
    }
}
