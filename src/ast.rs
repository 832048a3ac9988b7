//! # OData Expression AST
//!
//! The typed Abstract Syntax Tree for OData `$filter` and `$orderby`
//! expressions, plus the lexical tokens and the compiled result artifacts.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[types]** - The closed EDM scalar-type tag and the numeric
//!   promotion ladder
//! - **[operators]** - Binary and unary operators
//! - **[paths]** - Resolved property paths and navigation chains
//! - **[expressions]** - Type-checked expression nodes
//! - **[query]** - FilterInfo / OrderByInfo result artifacts
//!
//! ## Core Concepts
//!
//! ### Typed nodes
//!
//! Every [`Expr`] carries the scalar type it resolves to. The parser
//! resolves property paths against the resource metadata and type-checks
//! operators and function calls while building the tree, so a constructed
//! AST is always well-typed and a filter root is always boolean.
//!
//! ### Navigation chains
//!
//! A property path like `Order/Customer/CustomerID` crosses two navigation
//! properties before reaching a primitive. The maximal navigational prefix
//! of each path (`Order/Customer` here) is recorded as a
//! [`NavigationChain`]; the execution layer uses the chain list to know
//! which related entities a predicate needs. Complex-property hops such as
//! `Address` in `Customer/Address/LineNumber` are structural access and
//! never appear in a chain.
pub mod expressions;
pub mod operators;
pub mod paths;
pub mod query;
pub mod tokens;
pub mod types;

pub use expressions::Expr;
pub use operators::{BinOp, UnaryOp};
pub use paths::{NavigationChain, PathSegment, PropertyPath};
pub use query::{FilterInfo, OrderByInfo, OrderByKey, SortDirection};
pub use tokens::{Token, TokenKind};
pub use types::ScalarType;
