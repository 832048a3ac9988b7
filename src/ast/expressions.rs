use crate::ast::{BinOp, PropertyPath, ScalarType, UnaryOp};
use crate::value::Value;

/// A type-checked expression node.
///
/// Built once by the parser and never mutated afterwards. Every node knows
/// the scalar type it resolves to; type resolution happened while parsing,
/// so evaluation can assume operand kinds line up.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal constant. The type is fixed by the lexical form of the
    /// literal (`42` is Int32, `42L` is Int64, ...); promotion only happens
    /// at operator and function boundaries.
    Literal { value: Value, ty: ScalarType },

    /// A resolved property access, possibly through navigation and complex
    /// segments.
    Property(PropertyPath),

    /// `not x` or `-x`
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        ty: ScalarType,
    },

    /// Binary operation (comparison, arithmetic, logical)
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        ty: ScalarType,
    },

    /// Call to one of the fixed OData functions, validated against the
    /// registry
    Function {
        name: &'static str,
        args: Vec<Expr>,
        ty: ScalarType,
    },
}

impl Expr {
    /// The scalar type this node resolves to.
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            Expr::Literal { ty, .. } => *ty,
            Expr::Property(path) => path.ty,
            Expr::Unary { ty, .. } => *ty,
            Expr::Binary { ty, .. } => *ty,
            Expr::Function { ty, .. } => *ty,
        }
    }

    /// Whether this node is the `null` literal (the operand form that turns
    /// `eq`/`ne` into a presence test).
    pub fn is_null_literal(&self) -> bool {
        matches!(
            self,
            Expr::Literal {
                ty: ScalarType::Null,
                ..
            }
        )
    }
}
