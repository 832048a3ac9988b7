//! Load a metadata model from a JSON description.
//!
//! The format is one object per resource or complex type; a property is
//! either an EDM scalar name or an object naming the kind and target type:
//!
//! ```text
//! {
//!   "Orders": {
//!     "OrderID": "Int32",
//!     "Customer": { "kind": "navigation", "target": "Customers" }
//!   },
//!   "Customers": {
//!     "CustomerID": "String",
//!     "Address": { "kind": "complex", "target": "Address" }
//!   },
//!   "Address": { "LineNumber": "Int32" }
//! }
//! ```

use super::CliError;
use crate::ast::ScalarType;
use crate::metadata::{Model, ResourceType};

pub fn model_from_json(json: &serde_json::Value) -> Result<Model, CliError> {
    let serde_json::Value::Object(types) = json else {
        return Err(CliError::Model(
            "expected an object of resource types".to_string(),
        ));
    };

    let mut model = Model::new();
    for (type_name, props) in types {
        let serde_json::Value::Object(props) = props else {
            return Err(CliError::Model(format!(
                "resource type '{}' must be an object of properties",
                type_name
            )));
        };

        let mut ty = ResourceType::new(type_name);
        for (prop_name, desc) in props {
            ty = match desc {
                serde_json::Value::String(scalar) => {
                    let scalar = ScalarType::from_name(scalar).ok_or_else(|| {
                        CliError::Model(format!(
                            "unknown scalar type '{}' for property '{}'",
                            scalar, prop_name
                        ))
                    })?;
                    ty.with_primitive(prop_name, scalar)
                }
                serde_json::Value::Object(desc) => {
                    let kind = desc.get("kind").and_then(|v| v.as_str()).ok_or_else(|| {
                        CliError::Model(format!("property '{}' needs a 'kind'", prop_name))
                    })?;
                    let target = desc.get("target").and_then(|v| v.as_str()).ok_or_else(|| {
                        CliError::Model(format!("property '{}' needs a 'target'", prop_name))
                    })?;
                    match kind {
                        "complex" => ty.with_complex(prop_name, target),
                        "navigation" => ty.with_navigation(prop_name, target),
                        "collection" => ty.with_navigation_collection(prop_name, target),
                        other => {
                            return Err(CliError::Model(format!(
                                "unknown property kind '{}' for '{}'",
                                other, prop_name
                            )));
                        }
                    }
                }
                _ => {
                    return Err(CliError::Model(format!(
                        "property '{}' must be a scalar name or a kind/target object",
                        prop_name
                    )));
                }
            };
        }
        model = model.with_type(ty);
    }
    Ok(model)
}
