use std::collections::HashMap;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use uuid::Uuid;

/// A runtime value supplied by an entity or produced during expression
/// evaluation.
///
/// The scalar variants mirror the EDM primitive widths so that numeric
/// promotion (Int32 → Int64 → Single → Double → Decimal) can happen at
/// operator boundaries without forgetting the declared width of either
/// operand.
///
/// # Examples
///
/// ```
/// use odata_expr::Value;
/// use std::collections::HashMap;
///
/// let mut entity = HashMap::new();
/// entity.insert("UnitPrice".to_string(), Value::Double(6.5));
/// entity.insert("ProductName".to_string(), Value::String("Chai".to_string()));
///
/// let entity = Value::Object(entity);
/// assert!(entity.field("UnitPrice").is_some());
/// assert!(entity.field("Missing").is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent or explicit null
    Null,

    /// Edm.Boolean
    Boolean(bool),

    /// Edm.Int32
    Int32(i32),

    /// Edm.Int64
    Int64(i64),

    /// Edm.Single
    Single(f32),

    /// Edm.Double
    Double(f64),

    /// Edm.Decimal (exact, via rust_decimal)
    Decimal(Decimal),

    /// Edm.String
    String(String),

    /// Edm.DateTime (no timezone offset)
    DateTime(NaiveDateTime),

    /// Edm.Guid
    Guid(Uuid),

    /// Edm.Binary
    Binary(Vec<u8>),

    /// An entity or complex-property value (named fields)
    Object(HashMap<String, Value>),

    /// A collection of values. Only produced by JSON interop (embedded
    /// related collections); expression evaluation never yields one.
    Array(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as boolean, if this is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Look up a field on an entity or complex value
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(name),
            _ => None,
        }
    }
}

/// Returns a human-readable type name for a Value
pub fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Boolean(_) => "boolean",
        Value::Int32(_) => "int32",
        Value::Int64(_) => "int64",
        Value::Single(_) => "single",
        Value::Double(_) => "double",
        Value::Decimal(_) => "decimal",
        Value::String(_) => "string",
        Value::DateTime(_) => "datetime",
        Value::Guid(_) => "guid",
        Value::Binary(_) => "binary",
        Value::Object(_) => "object",
        Value::Array(_) => "array",
    }
}
