pub mod ast;
#[cfg(feature = "cli")]
pub mod cli;
pub mod evaluator;
pub mod functions;
pub mod json;
pub mod lexer;
pub mod metadata;
pub mod parser;
pub mod value;

pub use ast::{
    BinOp, Expr, FilterInfo, NavigationChain, OrderByInfo, OrderByKey, PathSegment, PropertyPath,
    ScalarType, SortDirection, Token, TokenKind, UnaryOp,
};
pub use evaluator::{EmbeddedNavigation, EvalContext, EvalError, Evaluator, NavigationSource};
pub use json::{entity_from_json, from_json, to_json};
pub use lexer::{LexError, Lexer};
pub use metadata::{MetadataResolver, Model, PropertyKind, ResourceProperty, ResourceType};
pub use parser::{parse_filter, parse_orderby, ExprLimits, NavigationTracker, ParseError, Parser};
pub use value::Value;
