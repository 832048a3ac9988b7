use std::cmp::Ordering;

use chrono::{Datelike, Timelike};
use rust_decimal::{prelude::FromPrimitive, Decimal};

use crate::ast::{
    BinOp, Expr, FilterInfo, NavigationChain, OrderByInfo, PropertyPath, SortDirection, UnaryOp,
};
use crate::value::Value;

/// Resolves a navigation chain to the related entity at evaluation time.
///
/// Chain resolution belongs to the execution layer (it may require a join
/// or a lookup); the evaluator only asks for the entity a chain leads to
/// and treats an unresolved chain as an absent value.
pub trait NavigationSource {
    fn resolve(&self, root: &Value, chain: &NavigationChain) -> Option<Value>;
}

/// The reference `NavigationSource`: related entities embedded as nested
/// objects of the root entity, keyed by navigation property name.
pub struct EmbeddedNavigation;

impl NavigationSource for EmbeddedNavigation {
    fn resolve(&self, root: &Value, chain: &NavigationChain) -> Option<Value> {
        let mut current = root;
        for name in chain.properties() {
            current = current.field(name)?;
        }
        Some(current.clone())
    }
}

/// Binding context for one entity: its property values plus the source of
/// related entities for the navigation chains the expression uses.
pub struct EvalContext<'a> {
    pub root: &'a Value,
    pub navigation: &'a dyn NavigationSource,
}

impl<'a> EvalContext<'a> {
    pub fn new(root: &'a Value, navigation: &'a dyn NavigationSource) -> Self {
        EvalContext { root, navigation }
    }
}

/// Errors that can occur while evaluating a compiled expression.
///
/// Absent values never error: comparisons on them are `false` and
/// arithmetic on them is null, per OData null propagation.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Integer or decimal division/modulo by zero
    DivisionByZero,

    /// Integer or decimal arithmetic out of range
    NumericOverflow,
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::DivisionByZero => write!(f, "Division by zero"),
            EvalError::NumericOverflow => write!(f, "Numeric overflow"),
        }
    }
}

impl std::error::Error for EvalError {}

/// The expression interpreter.
///
/// Walks a type-checked AST against one entity at a time. A filter
/// predicate collapses to a plain boolean at the root: an expression that
/// propagates null evaluates to `false`.
///
/// # Examples
///
/// ```
/// use odata_expr::{
///     parse_filter, EmbeddedNavigation, Evaluator, Model, ResourceType, ScalarType, Value,
/// };
/// use std::collections::HashMap;
///
/// let model = Model::new().with_type(
///     ResourceType::new("Products").with_primitive("UnitPrice", ScalarType::Double),
/// );
/// let filter = parse_filter("UnitPrice ge 6", &model, "Products", None).unwrap();
///
/// let mut entity = HashMap::new();
/// entity.insert("UnitPrice".to_string(), Value::Double(6.5));
/// let entity = Value::Object(entity);
///
/// let evaluator = Evaluator::new(&EmbeddedNavigation);
/// assert!(evaluator.matches(&filter, &entity).unwrap());
/// ```
pub struct Evaluator<'a> {
    navigation: &'a dyn NavigationSource,
}

impl<'a> Evaluator<'a> {
    pub fn new(navigation: &'a dyn NavigationSource) -> Self {
        Evaluator { navigation }
    }

    /// Evaluate a filter predicate against one entity.
    pub fn matches(&self, filter: &FilterInfo, entity: &Value) -> Result<bool, EvalError> {
        let ctx = EvalContext::new(entity, self.navigation);
        let result = self.eval_expr(filter.expression(), &ctx)?;
        Ok(predicate_bool(&result))
    }

    /// Compare two entities under an orderby clause: first non-equal key
    /// wins, honoring each key's direction.
    pub fn compare(
        &self,
        orderby: &OrderByInfo,
        a: &Value,
        b: &Value,
    ) -> Result<Ordering, EvalError> {
        let ctx_a = EvalContext::new(a, self.navigation);
        let ctx_b = EvalContext::new(b, self.navigation);
        for key in orderby.keys() {
            let ka = self.eval_expr(key.expression(), &ctx_a)?;
            let kb = self.eval_expr(key.expression(), &ctx_b)?;
            let mut ord = compare_keys(&ka, &kb);
            if key.direction() == SortDirection::Descending {
                ord = ord.reverse();
            }
            if ord != Ordering::Equal {
                return Ok(ord);
            }
        }
        Ok(Ordering::Equal)
    }

    /// Stable multi-key sort of a set of entities. Key tuples are
    /// evaluated up front so an evaluation error surfaces before any
    /// reordering happens.
    pub fn sort(&self, orderby: &OrderByInfo, entities: &mut Vec<Value>) -> Result<(), EvalError> {
        let mut key_sets = Vec::with_capacity(entities.len());
        for entity in entities.iter() {
            let ctx = EvalContext::new(entity, self.navigation);
            let mut keys = Vec::with_capacity(orderby.keys().len());
            for key in orderby.keys() {
                keys.push(self.eval_expr(key.expression(), &ctx)?);
            }
            key_sets.push(keys);
        }

        let mut keyed: Vec<(Vec<Value>, Value)> =
            key_sets.into_iter().zip(entities.drain(..)).collect();
        keyed.sort_by(|(ka, _), (kb, _)| {
            for (i, key) in orderby.keys().iter().enumerate() {
                let mut ord = compare_keys(&ka[i], &kb[i]);
                if key.direction() == SortDirection::Descending {
                    ord = ord.reverse();
                }
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
        entities.extend(keyed.into_iter().map(|(_, entity)| entity));
        Ok(())
    }

    fn eval_expr(&self, expr: &Expr, ctx: &EvalContext) -> Result<Value, EvalError> {
        match expr {
            Expr::Literal { value, .. } => Ok(value.clone()),
            Expr::Property(path) => Ok(self.eval_property(path, ctx)),
            Expr::Unary { op, operand, .. } => {
                let v = self.eval_expr(operand, ctx)?;
                match op {
                    UnaryOp::Not => match v {
                        Value::Boolean(b) => Ok(Value::Boolean(!b)),
                        _ => Ok(Value::Null),
                    },
                    UnaryOp::Negate => negate(&v),
                }
            }
            Expr::Binary {
                op, left, right, ..
            } => self.eval_binary(*op, left, right, ctx),
            Expr::Function { name, args, .. } => {
                let mut vals = Vec::with_capacity(args.len());
                for arg in args {
                    let v = self.eval_expr(arg, ctx)?;
                    if v.is_null() {
                        // null propagates through every function
                        return Ok(Value::Null);
                    }
                    vals.push(v);
                }
                Ok(apply_function(name, &vals))
            }
        }
    }

    fn eval_binary(
        &self,
        op: BinOp,
        left: &Expr,
        right: &Expr,
        ctx: &EvalContext,
    ) -> Result<Value, EvalError> {
        match op {
            // Short-circuit logic; a null operand collapses to false at
            // the boolean boundary
            BinOp::And => {
                if !predicate_bool(&self.eval_expr(left, ctx)?) {
                    return Ok(Value::Boolean(false));
                }
                let r = predicate_bool(&self.eval_expr(right, ctx)?);
                Ok(Value::Boolean(r))
            }
            BinOp::Or => {
                if predicate_bool(&self.eval_expr(left, ctx)?) {
                    return Ok(Value::Boolean(true));
                }
                let r = predicate_bool(&self.eval_expr(right, ctx)?);
                Ok(Value::Boolean(r))
            }

            BinOp::Eq | BinOp::Ne => {
                // A literal null operand turns eq/ne into a presence test
                if left.is_null_literal() || right.is_null_literal() {
                    let other = if left.is_null_literal() { right } else { left };
                    let v = self.eval_expr(other, ctx)?;
                    let is_null = v.is_null();
                    return Ok(Value::Boolean(if op == BinOp::Eq {
                        is_null
                    } else {
                        !is_null
                    }));
                }
                let l = self.eval_expr(left, ctx)?;
                let r = self.eval_expr(right, ctx)?;
                if l.is_null() || r.is_null() {
                    return Ok(Value::Boolean(false));
                }
                let equal = compare_values(&l, &r) == Some(Ordering::Equal);
                Ok(Value::Boolean(if op == BinOp::Eq { equal } else { !equal }))
            }

            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
                let l = self.eval_expr(left, ctx)?;
                let r = self.eval_expr(right, ctx)?;
                if l.is_null() || r.is_null() {
                    // comparison against an absent value is false, never
                    // an error
                    return Ok(Value::Boolean(false));
                }
                let result = match compare_values(&l, &r) {
                    Some(ord) => match op {
                        BinOp::Lt => ord == Ordering::Less,
                        BinOp::Le => ord != Ordering::Greater,
                        BinOp::Gt => ord == Ordering::Greater,
                        _ => ord != Ordering::Less,
                    },
                    None => false,
                };
                Ok(Value::Boolean(result))
            }

            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => {
                let l = self.eval_expr(left, ctx)?;
                let r = self.eval_expr(right, ctx)?;
                if l.is_null() || r.is_null() {
                    return Ok(Value::Null);
                }
                apply_arithmetic(op, &l, &r)
            }
        }
    }

    /// Resolve a property access: the navigational prefix through the
    /// `NavigationSource`, the structural remainder through field lookup.
    /// Any absent hop makes the whole access null.
    fn eval_property(&self, path: &PropertyPath, ctx: &EvalContext) -> Value {
        let chain = path.navigation_chain();
        let (current, skip) = match &chain {
            Some(chain) => match ctx.navigation.resolve(ctx.root, chain) {
                Some(v) if !v.is_null() => (v, chain.len()),
                _ => return Value::Null,
            },
            None => (ctx.root.clone(), 0),
        };

        let mut current = current;
        for seg in &path.segments[skip..] {
            current = match current.field(&seg.name) {
                Some(v) => v.clone(),
                None => return Value::Null,
            };
        }
        match current.field(&path.name) {
            Some(v) => v.clone(),
            None => Value::Null,
        }
    }
}

/// Collapse an evaluated value to a predicate boolean: only `true` passes.
fn predicate_bool(v: &Value) -> bool {
    matches!(v, Value::Boolean(true))
}

fn numeric_rank(v: &Value) -> Option<u8> {
    match v {
        Value::Int32(_) => Some(0),
        Value::Int64(_) => Some(1),
        Value::Single(_) => Some(2),
        Value::Double(_) => Some(3),
        Value::Decimal(_) => Some(4),
        _ => None,
    }
}

fn as_i64(v: &Value) -> Option<i64> {
    match v {
        Value::Int32(n) => Some(*n as i64),
        Value::Int64(n) => Some(*n),
        _ => None,
    }
}

fn as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Int32(n) => Some(*n as f64),
        Value::Int64(n) => Some(*n as f64),
        Value::Single(n) => Some(*n as f64),
        Value::Double(n) => Some(*n),
        _ => None,
    }
}

fn as_decimal(v: &Value) -> Option<Decimal> {
    match v {
        Value::Int32(n) => Some(Decimal::from(*n)),
        Value::Int64(n) => Some(Decimal::from(*n)),
        Value::Single(n) => Decimal::from_f32(*n),
        Value::Double(n) => Decimal::from_f64(*n),
        Value::Decimal(d) => Some(*d),
        _ => None,
    }
}

fn negate(v: &Value) -> Result<Value, EvalError> {
    match v {
        Value::Int32(n) => n
            .checked_neg()
            .map(Value::Int32)
            .ok_or(EvalError::NumericOverflow),
        Value::Int64(n) => n
            .checked_neg()
            .map(Value::Int64)
            .ok_or(EvalError::NumericOverflow),
        Value::Single(n) => Ok(Value::Single(-n)),
        Value::Double(n) => Ok(Value::Double(-n)),
        Value::Decimal(d) => Ok(Value::Decimal(-*d)),
        _ => Ok(Value::Null),
    }
}

/// Apply an arithmetic operator after widening both operands to their
/// promoted type. Integer and decimal division by zero is a hard error;
/// floating-point follows IEEE-754.
fn apply_arithmetic(op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let (Some(lr), Some(rr)) = (numeric_rank(left), numeric_rank(right)) else {
        return Ok(Value::Null);
    };

    match lr.max(rr) {
        0 => {
            let (Value::Int32(a), Value::Int32(b)) = (left, right) else {
                return Ok(Value::Null);
            };
            let (a, b) = (*a, *b);
            let result = match op {
                BinOp::Add => a.checked_add(b),
                BinOp::Sub => a.checked_sub(b),
                BinOp::Mul => a.checked_mul(b),
                BinOp::Div => {
                    if b == 0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    a.checked_div(b)
                }
                BinOp::Mod => {
                    if b == 0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    a.checked_rem(b)
                }
                _ => unreachable!(),
            };
            result.map(Value::Int32).ok_or(EvalError::NumericOverflow)
        }
        1 => {
            let (Some(a), Some(b)) = (as_i64(left), as_i64(right)) else {
                return Ok(Value::Null);
            };
            let result = match op {
                BinOp::Add => a.checked_add(b),
                BinOp::Sub => a.checked_sub(b),
                BinOp::Mul => a.checked_mul(b),
                BinOp::Div => {
                    if b == 0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    a.checked_div(b)
                }
                BinOp::Mod => {
                    if b == 0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    a.checked_rem(b)
                }
                _ => unreachable!(),
            };
            result.map(Value::Int64).ok_or(EvalError::NumericOverflow)
        }
        2 => {
            let (Some(a), Some(b)) = (as_f64(left), as_f64(right)) else {
                return Ok(Value::Null);
            };
            Ok(Value::Single(apply_float(op, a, b) as f32))
        }
        3 => {
            let (Some(a), Some(b)) = (as_f64(left), as_f64(right)) else {
                return Ok(Value::Null);
            };
            Ok(Value::Double(apply_float(op, a, b)))
        }
        _ => {
            let (Some(a), Some(b)) = (as_decimal(left), as_decimal(right)) else {
                return Ok(Value::Null);
            };
            let result = match op {
                BinOp::Add => a.checked_add(b),
                BinOp::Sub => a.checked_sub(b),
                BinOp::Mul => a.checked_mul(b),
                BinOp::Div => {
                    if b.is_zero() {
                        return Err(EvalError::DivisionByZero);
                    }
                    a.checked_div(b)
                }
                BinOp::Mod => {
                    if b.is_zero() {
                        return Err(EvalError::DivisionByZero);
                    }
                    a.checked_rem(b)
                }
                _ => unreachable!(),
            };
            result.map(Value::Decimal).ok_or(EvalError::NumericOverflow)
        }
    }
}

fn apply_float(op: BinOp, a: f64, b: f64) -> f64 {
    match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Div => a / b,
        BinOp::Mod => a % b,
        _ => unreachable!(),
    }
}

/// Compare two values of comparable kinds, widening numerics to their
/// promoted type. None for pairings the type system never produces.
fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    if let (Some(lr), Some(rr)) = (numeric_rank(a), numeric_rank(b)) {
        return match lr.max(rr) {
            0 | 1 => Some(as_i64(a)?.cmp(&as_i64(b)?)),
            2 | 3 => Some(as_f64(a)?.total_cmp(&as_f64(b)?)),
            _ => Some(as_decimal(a)?.cmp(&as_decimal(b)?)),
        };
    }
    match (a, b) {
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Boolean(x), Value::Boolean(y)) => Some(x.cmp(y)),
        (Value::DateTime(x), Value::DateTime(y)) => Some(x.cmp(y)),
        (Value::Guid(x), Value::Guid(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Orderby key comparison: null orders before every value.
fn compare_keys(a: &Value, b: &Value) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => compare_values(a, b).unwrap_or(Ordering::Equal),
    }
}

fn str_arg<'v>(args: &'v [Value], i: usize) -> Option<&'v str> {
    match args.get(i)? {
        Value::String(s) => Some(s.as_str()),
        _ => None,
    }
}

fn int_arg(args: &[Value], i: usize) -> Option<i64> {
    match args.get(i)? {
        Value::Int32(n) => Some(*n as i64),
        Value::Int64(n) => Some(*n),
        _ => None,
    }
}

/// Apply a registry function to evaluated, non-null arguments. Arguments
/// whose runtime kind does not match the signature degrade to null rather
/// than erroring, consistent with null propagation over malformed data.
fn apply_function(name: &str, args: &[Value]) -> Value {
    match name {
        "substring" => {
            let (Some(s), Some(start)) = (str_arg(args, 0), int_arg(args, 1)) else {
                return Value::Null;
            };
            let start = start.max(0) as usize;
            let out: String = if args.len() == 3 {
                match int_arg(args, 2) {
                    Some(len) => s.chars().skip(start).take(len.max(0) as usize).collect(),
                    None => return Value::Null,
                }
            } else {
                s.chars().skip(start).collect()
            };
            Value::String(out)
        }
        "replace" => {
            let (Some(s), Some(from), Some(to)) =
                (str_arg(args, 0), str_arg(args, 1), str_arg(args, 2))
            else {
                return Value::Null;
            };
            Value::String(s.replace(from, to))
        }
        "indexof" => {
            let (Some(s), Some(needle)) = (str_arg(args, 0), str_arg(args, 1)) else {
                return Value::Null;
            };
            match s.find(needle) {
                Some(byte_idx) => Value::Int32(s[..byte_idx].chars().count() as i32),
                None => Value::Int32(-1),
            }
        }
        "length" => match str_arg(args, 0) {
            Some(s) => Value::Int32(s.chars().count() as i32),
            None => Value::Null,
        },
        "toupper" => match str_arg(args, 0) {
            Some(s) => Value::String(s.to_uppercase()),
            None => Value::Null,
        },
        "tolower" => match str_arg(args, 0) {
            Some(s) => Value::String(s.to_lowercase()),
            None => Value::Null,
        },
        "trim" => match str_arg(args, 0) {
            Some(s) => Value::String(s.trim().to_string()),
            None => Value::Null,
        },
        "concat" => {
            let (Some(a), Some(b)) = (str_arg(args, 0), str_arg(args, 1)) else {
                return Value::Null;
            };
            Value::String(format!("{}{}", a, b))
        }
        "startswith" => {
            let (Some(s), Some(prefix)) = (str_arg(args, 0), str_arg(args, 1)) else {
                return Value::Null;
            };
            Value::Boolean(s.starts_with(prefix))
        }
        "endswith" => {
            let (Some(s), Some(suffix)) = (str_arg(args, 0), str_arg(args, 1)) else {
                return Value::Null;
            };
            Value::Boolean(s.ends_with(suffix))
        }
        "year" | "month" | "day" | "hour" | "minute" | "second" => {
            let Some(Value::DateTime(dt)) = args.first() else {
                return Value::Null;
            };
            let part = match name {
                "year" => dt.year(),
                "month" => dt.month() as i32,
                "day" => dt.day() as i32,
                "hour" => dt.hour() as i32,
                "minute" => dt.minute() as i32,
                _ => dt.second() as i32,
            };
            Value::Int32(part)
        }
        "round" | "floor" | "ceiling" => match args.first() {
            Some(Value::Decimal(d)) => {
                let result = match name {
                    "round" => d.round(),
                    "floor" => d.floor(),
                    _ => d.ceil(),
                };
                Value::Decimal(result)
            }
            Some(v) => match as_f64(v) {
                Some(f) => {
                    let result = match name {
                        "round" => f.round(),
                        "floor" => f.floor(),
                        _ => f.ceil(),
                    };
                    Value::Double(result)
                }
                None => Value::Null,
            },
            None => Value::Null,
        },
        _ => Value::Null,
    }
}
