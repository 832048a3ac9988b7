//! Resource metadata: the shape of entity types and the resolver boundary
//! the parser works against.
//!
//! The compiler never discovers metadata itself; it consumes a
//! [`MetadataResolver`] owned by the hosting data service. [`Model`] is the
//! in-memory implementation used by tests and the CLI.

use crate::ast::ScalarType;

/// What kind of property a name resolves to on a resource type.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKind {
    /// A scalar-valued property
    Primitive(ScalarType),
    /// A nested structured value with no identity of its own; the string
    /// names the complex type
    Complex(String),
    /// A reference to one related entity; the string names the target
    /// resource type
    NavigationSingle(String),
    /// A reference to a related entity collection
    NavigationCollection(String),
}

impl PropertyKind {
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            PropertyKind::NavigationSingle(_) | PropertyKind::NavigationCollection(_)
        )
    }
}

/// One declared property of a resource or complex type.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceProperty {
    pub name: String,
    pub kind: PropertyKind,
}

/// A resource or complex type: a name plus its properties in declaration
/// order.
#[derive(Debug, Clone)]
pub struct ResourceType {
    name: String,
    properties: Vec<ResourceProperty>,
}

impl ResourceType {
    pub fn new(name: &str) -> Self {
        ResourceType {
            name: name.to_string(),
            properties: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn with_primitive(mut self, name: &str, ty: ScalarType) -> Self {
        self.properties.push(ResourceProperty {
            name: name.to_string(),
            kind: PropertyKind::Primitive(ty),
        });
        self
    }

    pub fn with_complex(mut self, name: &str, target: &str) -> Self {
        self.properties.push(ResourceProperty {
            name: name.to_string(),
            kind: PropertyKind::Complex(target.to_string()),
        });
        self
    }

    /// Add a single-valued navigation property
    pub fn with_navigation(mut self, name: &str, target: &str) -> Self {
        self.properties.push(ResourceProperty {
            name: name.to_string(),
            kind: PropertyKind::NavigationSingle(target.to_string()),
        });
        self
    }

    /// Add a collection-valued navigation property
    pub fn with_navigation_collection(mut self, name: &str, target: &str) -> Self {
        self.properties.push(ResourceProperty {
            name: name.to_string(),
            kind: PropertyKind::NavigationCollection(target.to_string()),
        });
        self
    }

    pub fn property(&self, name: &str) -> Option<&ResourceProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn properties(&self) -> &[ResourceProperty] {
        &self.properties
    }
}

/// The metadata lookup capability the parser consumes.
///
/// Implementations must be side-effect-free and safe to call from multiple
/// concurrent parses; metadata is read-only for the lifetime of a service
/// instance.
pub trait MetadataResolver {
    /// Resolve a property name on a resource or complex type. None when
    /// either the type or the property is unknown.
    fn resolve(&self, resource_type: &str, property: &str) -> Option<&ResourceProperty>;
}

/// An in-memory metadata model.
///
/// # Examples
///
/// ```
/// use odata_expr::{Model, ResourceType, ScalarType};
///
/// let model = Model::new()
///     .with_type(
///         ResourceType::new("Orders")
///             .with_primitive("OrderID", ScalarType::Int32)
///             .with_navigation("Customer", "Customers"),
///     )
///     .with_type(
///         ResourceType::new("Customers")
///             .with_primitive("CustomerID", ScalarType::String),
///     );
///
/// assert!(model.resource_type("Orders").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Model {
    types: Vec<ResourceType>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, ty: ResourceType) -> Self {
        self.types.push(ty);
        self
    }

    pub fn resource_type(&self, name: &str) -> Option<&ResourceType> {
        self.types.iter().find(|t| t.name() == name)
    }
}

impl MetadataResolver for Model {
    fn resolve(&self, resource_type: &str, property: &str) -> Option<&ResourceProperty> {
        self.resource_type(resource_type)?.property(property)
    }
}
