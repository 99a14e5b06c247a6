// ── Record <-> state conversion ──
//
// RouterOS speaks kebab-case keys and string values. State speaks
// snake_case attribute names and typed JSON values. The schema decides
// how each field crosses over; keys it does not declare are dropped.

use indexmap::IndexMap;
use serde_json::Value;
use tikform_api::Record;
use tikform_api::models::ID_KEY;

use crate::error::CoreError;
use crate::schema::{AttributeType, ResourceSchema};

/// RouterOS key for an attribute name (`src_address` -> `src-address`).
pub fn attribute_key(name: &str) -> String {
    name.replace('_', "-")
}

/// The `.id` of a record, if it carries one.
pub fn record_id(record: &Record) -> Option<&str> {
    record.get(ID_KEY).and_then(Value::as_str)
}

/// Decode the attributes the schema declares from a RouterOS record.
///
/// Missing keys and empty strings leave the attribute absent.
pub fn record_to_state(
    schema: &ResourceSchema,
    record: &Record,
) -> Result<IndexMap<String, Value>, CoreError> {
    let mut attributes = IndexMap::new();
    for (name, attr) in schema.attributes() {
        let Some(raw) = record.get(&attribute_key(name)) else {
            continue;
        };
        if let Some(value) = decode(name, attr.kind, raw)? {
            attributes.insert(name.to_owned(), value);
        }
    }
    Ok(attributes)
}

/// Encode typed attribute values into a RouterOS record.
///
/// `None` values are attributes being cleared and go out as the type's
/// zero value (`""`, `"false"`, `"0"`).
pub fn state_to_record<'a, I>(schema: &ResourceSchema, values: I) -> Record
where
    I: IntoIterator<Item = (&'a str, Option<&'a Value>)>,
{
    values
        .into_iter()
        .filter_map(|(name, value)| {
            let attr = schema.get(name)?;
            let encoded = match value {
                Some(v) => encode(v),
                None => cleared(attr.kind).to_owned(),
            };
            Some((attribute_key(name), Value::String(encoded)))
        })
        .collect()
}

fn cleared(kind: AttributeType) -> &'static str {
    match kind {
        AttributeType::String => "",
        AttributeType::Bool => "false",
        AttributeType::Int => "0",
    }
}

/// Decode one RouterOS value. `Ok(None)` means "not set".
pub fn decode(name: &str, kind: AttributeType, raw: &Value) -> Result<Option<Value>, CoreError> {
    let text = match raw {
        Value::Null => return Ok(None),
        Value::String(s) if s.is_empty() => return Ok(None),
        Value::String(s) => s.as_str(),
        // Some firmware builds return native JSON scalars.
        Value::Bool(_) | Value::Number(_) if kind.accepts(raw) => return Ok(Some(raw.clone())),
        other => return Err(decode_error(name, &other.to_string(), kind)),
    };

    let value = match kind {
        AttributeType::String => Value::String(text.to_owned()),
        AttributeType::Bool => match text {
            "true" | "yes" => Value::Bool(true),
            "false" | "no" => Value::Bool(false),
            _ => return Err(decode_error(name, text, kind)),
        },
        AttributeType::Int => text
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| decode_error(name, text, kind))?,
    };
    Ok(Some(value))
}

/// Encode one typed value as RouterOS expects it.
pub fn encode(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn decode_error(name: &str, value: &str, kind: AttributeType) -> CoreError {
    CoreError::Decode {
        attribute: name.to_owned(),
        value: value.to_owned(),
        expected: kind.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::schema::{Attribute, ResourceKind};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn schema() -> ResourceSchema {
        ResourceSchema::new("routeros_test", "/test", ResourceKind::List)
            .attribute("src_address", Attribute::optional_string())
            .attribute("accounting_port", Attribute::optional_int())
            .attribute("disabled", Attribute::optional_bool())
    }

    fn record(value: Value) -> Record {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn decodes_declared_keys_only() {
        let rec = record(json!({
            ".id": "*3",
            "src-address": "10.0.0.2",
            "accounting-port": "1813",
            "disabled": "yes",
            "dynamic": "false"
        }));
        let attrs = record_to_state(&schema(), &rec).unwrap();
        assert_eq!(attrs.get("src_address"), Some(&json!("10.0.0.2")));
        assert_eq!(attrs.get("accounting_port"), Some(&json!(1813)));
        assert_eq!(attrs.get("disabled"), Some(&json!(true)));
        assert_eq!(attrs.len(), 3);
        assert_eq!(record_id(&rec), Some("*3"));
    }

    #[test]
    fn empty_values_stay_absent() {
        let rec = record(json!({"src-address": ""}));
        assert!(record_to_state(&schema(), &rec).unwrap().is_empty());
    }

    #[test]
    fn bad_integer_is_a_decode_error() {
        let rec = record(json!({"accounting-port": "many"}));
        let err = record_to_state(&schema(), &rec).unwrap_err();
        assert!(matches!(err, CoreError::Decode { ref attribute, .. } if attribute == "accounting_port"));
    }

    #[test]
    fn encodes_and_clears() {
        let port = json!(1700);
        let flag = json!(false);
        let rec = state_to_record(
            &schema(),
            [
                ("accounting_port", Some(&port)),
                ("disabled", Some(&flag)),
                ("src_address", None),
                ("unknown", Some(&port)),
            ],
        );
        assert_eq!(
            Value::Object(rec),
            json!({"accounting-port": "1700", "disabled": "false", "src-address": ""})
        );

        let rec = state_to_record(&schema(), [("disabled", None), ("accounting_port", None)]);
        assert_eq!(
            Value::Object(rec),
            json!({"disabled": "false", "accounting-port": "0"})
        );
    }
}
