//! The `insert_text` primitive.
//!
//! Hosts deliver command arguments as loosely typed JSON, so the argument
//! struct deserializes leniently instead of rejecting: a `point` that is not
//! an integer is coerced (floats truncate, numeric strings parse, anything
//! else becomes 0) and missing fields take their defaults. The resolved
//! point is clipped into `[0, document length]` before the edit.

use anyhow::Result;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::model::DocumentId;
use crate::host::Host;

/// Arguments for [`insert_text`], as delivered by the host command API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsertTextArgs {
    #[serde(default, deserialize_with = "lenient_point")]
    pub point: i64,
    #[serde(default)]
    pub text: String,
}

impl InsertTextArgs {
    /// Decode arguments from a raw host payload. Malformed payloads coerce to
    /// the defaults rather than failing.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

/// Insert `args.text` at `args.point`, clipped into the document. Returns the
/// character offset actually used.
pub fn insert_text(host: &mut dyn Host, doc: DocumentId, args: &InsertTextArgs) -> Result<usize> {
    let len = host.document_len(doc);
    let point = args.point.clamp(0, len as i64) as usize;
    host.insert(doc, point, &args.text)?;
    Ok(point)
}

fn lenient_point<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_point(&value))
}

fn coerce_point(value: &Value) -> i64 {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(text) => text.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Region;
    use crate::infra::headless::HeadlessHost;
    use serde_json::json;

    #[test]
    fn decodes_plain_arguments() {
        let args = InsertTextArgs::from_value(json!({"point": 4, "text": "hey"}));
        assert_eq!(args, InsertTextArgs { point: 4, text: "hey".into() });
    }

    #[test]
    fn coerces_non_integer_points() {
        assert_eq!(InsertTextArgs::from_value(json!({"point": 3.9})).point, 3);
        assert_eq!(InsertTextArgs::from_value(json!({"point": "12"})).point, 12);
        assert_eq!(InsertTextArgs::from_value(json!({"point": "nope"})).point, 0);
        assert_eq!(InsertTextArgs::from_value(json!({"point": [1]})).point, 0);
        assert_eq!(InsertTextArgs::from_value(json!({"point": null})).point, 0);
    }

    #[test]
    fn missing_or_malformed_payloads_default() {
        assert_eq!(InsertTextArgs::from_value(json!({})), InsertTextArgs::default());
        assert_eq!(InsertTextArgs::from_value(json!("garbage")), InsertTextArgs::default());
    }

    #[test]
    fn clips_point_into_document() {
        let mut host = HeadlessHost::new();
        let doc = host.open_scratch("abc");

        let args = InsertTextArgs { point: -5, text: "<".into() };
        assert_eq!(insert_text(&mut host, doc, &args).unwrap(), 0);

        let args = InsertTextArgs { point: 100, text: ">".into() };
        assert_eq!(insert_text(&mut host, doc, &args).unwrap(), 4);

        assert_eq!(host.document_text(doc), "<abc>");
    }

    #[test]
    fn inserts_at_character_offsets_not_bytes() {
        let mut host = HeadlessHost::new();
        let doc = host.open_scratch("héllo");
        host.set_selections(doc, vec![Region::caret(0)]);

        let args = InsertTextArgs { point: 2, text: "-".into() };
        insert_text(&mut host, doc, &args).unwrap();
        assert_eq!(host.document_text(doc), "hé-llo");
    }
}
