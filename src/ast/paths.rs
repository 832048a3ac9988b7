use std::fmt;

use crate::ast::ScalarType;

/// One traversed intermediate property in a path: a navigation hop (join)
/// or a structural descent into a complex value.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    pub name: String,
    /// true for navigation properties, false for complex properties
    pub navigational: bool,
}

/// A resolved property access `A/B/C`: the intermediate segments plus the
/// terminal primitive property and its scalar type.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyPath {
    /// Intermediate navigation/complex hops, in traversal order
    pub segments: Vec<PathSegment>,
    /// Terminal primitive property name
    pub name: String,
    /// The terminal property's scalar type
    pub ty: ScalarType,
}

impl PropertyPath {
    /// The maximal navigational prefix of this path, if any. Complex hops
    /// end the run; they are structural access, not relationship traversal.
    pub fn navigation_chain(&self) -> Option<NavigationChain> {
        let names: Vec<String> = self
            .segments
            .iter()
            .take_while(|s| s.navigational)
            .map(|s| s.name.clone())
            .collect();
        if names.is_empty() {
            None
        } else {
            Some(NavigationChain::new(names))
        }
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for seg in &self.segments {
            write!(f, "{}/", seg.name)?;
        }
        write!(f, "{}", self.name)
    }
}

/// One join-hop sequence from the root resource to a related entity: an
/// ordered, non-empty list of navigation property names.
///
/// Identity is the exact name sequence: `A/B` and `A/C` are distinct
/// chains even though they share a prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NavigationChain {
    properties: Vec<String>,
}

impl NavigationChain {
    pub fn new(properties: Vec<String>) -> Self {
        debug_assert!(!properties.is_empty());
        NavigationChain { properties }
    }

    pub fn properties(&self) -> &[String] {
        &self.properties
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl fmt::Display for NavigationChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.properties.join("/"))
    }
}
