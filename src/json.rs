//! JSON interop for entity values.
//!
//! Entities arrive as JSON in the CLI and in tests; their fields are typed
//! by the resource metadata on the way in (`entity_from_json`), so a
//! DateTime-declared field holding an ISO string becomes a real
//! `Value::DateTime` and decimal fields keep their precision. Output is
//! deterministic: object keys are sorted.

use std::collections::HashMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Number};
use uuid::Uuid;

use crate::ast::ScalarType;
use crate::lexer::parse_datetime_body;
use crate::metadata::{MetadataResolver, PropertyKind};
use crate::value::Value;

/// Convert arbitrary JSON to a Value with heuristic scalar typing: whole
/// numbers become Int64, other numbers Double.
pub fn from_json(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int64(i),
            None => Value::Double(n.as_f64().unwrap_or(0.0)),
        },
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => Value::Array(items.iter().map(from_json).collect()),
        serde_json::Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), from_json(v)))
                .collect::<HashMap<String, Value>>(),
        ),
    }
}

/// Convert a JSON entity to a Value, typing each known field by its
/// declared kind: primitives get their EDM width, complex and embedded
/// navigation values recurse into the target type. Fields the metadata
/// does not know keep the heuristic typing.
pub fn entity_from_json(
    json: &serde_json::Value,
    resource_type: &str,
    metadata: &dyn MetadataResolver,
) -> Value {
    let serde_json::Value::Object(map) = json else {
        return from_json(json);
    };

    let mut out = HashMap::new();
    for (key, field) in map {
        let value = match metadata.resolve(resource_type, key) {
            Some(prop) => match &prop.kind {
                PropertyKind::Primitive(ty) => scalar_from_json(field, *ty),
                PropertyKind::Complex(target) | PropertyKind::NavigationSingle(target) => {
                    entity_from_json(field, target, metadata)
                }
                PropertyKind::NavigationCollection(target) => match field {
                    serde_json::Value::Array(items) => Value::Array(
                        items
                            .iter()
                            .map(|item| entity_from_json(item, target, metadata))
                            .collect(),
                    ),
                    _ => from_json(field),
                },
            },
            None => from_json(field),
        };
        out.insert(key.clone(), value);
    }
    Value::Object(out)
}

fn scalar_from_json(json: &serde_json::Value, ty: ScalarType) -> Value {
    use serde_json::Value as J;

    match (ty, json) {
        (_, J::Null) => Value::Null,
        (ScalarType::Int32, J::Number(n)) => n
            .as_i64()
            .and_then(|i| i32::try_from(i).ok())
            .map(Value::Int32)
            .unwrap_or(Value::Null),
        (ScalarType::Int64, J::Number(n)) => {
            n.as_i64().map(Value::Int64).unwrap_or(Value::Null)
        }
        (ScalarType::Single, J::Number(n)) => n
            .as_f64()
            .map(|f| Value::Single(f as f32))
            .unwrap_or(Value::Null),
        (ScalarType::Double, J::Number(n)) => {
            n.as_f64().map(Value::Double).unwrap_or(Value::Null)
        }
        // parse through the decimal string form to keep precision
        (ScalarType::Decimal, J::Number(n)) => n
            .to_string()
            .parse::<Decimal>()
            .map(Value::Decimal)
            .unwrap_or(Value::Null),
        (ScalarType::Decimal, J::String(s)) => {
            s.parse::<Decimal>().map(Value::Decimal).unwrap_or(Value::Null)
        }
        (ScalarType::String, J::String(s)) => Value::String(s.clone()),
        (ScalarType::Boolean, J::Bool(b)) => Value::Boolean(*b),
        (ScalarType::DateTime, J::String(s)) => parse_datetime_body(s)
            .map(Value::DateTime)
            .unwrap_or(Value::Null),
        (ScalarType::Guid, J::String(s)) => {
            Uuid::parse_str(s).map(Value::Guid).unwrap_or(Value::Null)
        }
        (ScalarType::Binary, J::String(s)) => {
            hex::decode(s).map(Value::Binary).unwrap_or(Value::Null)
        }
        _ => Value::Null,
    }
}

/// Convert a Value back to JSON. DateTime, Guid, Binary and out-of-range
/// Decimal values serialize as strings; object keys are sorted for
/// deterministic output.
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Int32(n) => serde_json::Value::Number((*n).into()),
        Value::Int64(n) => serde_json::Value::Number((*n).into()),
        Value::Single(n) => Number::from_f64(*n as f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Double(n) => Number::from_f64(*n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Decimal(d) => match d.to_f64().and_then(Number::from_f64) {
            Some(n) => serde_json::Value::Number(n),
            None => serde_json::Value::String(d.to_string()),
        },
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::DateTime(dt) => {
            serde_json::Value::String(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
        }
        Value::Guid(g) => serde_json::Value::String(g.to_string()),
        Value::Binary(b) => serde_json::Value::String(hex::encode(b)),
        Value::Object(map) => {
            let mut keys: Vec<_> = map.keys().collect();
            keys.sort();
            let mut out = Map::new();
            for key in keys {
                if let Some(v) = map.get(key) {
                    out.insert(key.clone(), to_json(v));
                }
            }
            serde_json::Value::Object(out)
        }
        Value::Array(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
    }
}
