//! The fixed OData function set.
//!
//! Process-wide, read-only state: the table is built exactly once on first
//! use and never mutated afterwards, so it is freely shared across
//! concurrent parses with no synchronization.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::ast::ScalarType;

/// One signature of a registered function. Functions with overloads
/// (substring, round, floor, ceiling) carry one entry per signature.
#[derive(Debug, Clone, Copy)]
pub struct FunctionSig {
    pub name: &'static str,
    pub params: &'static [ScalarType],
    pub ret: ScalarType,
}

use ScalarType::{Boolean, DateTime, Decimal, Double, Int32, String as Str};

static SIGNATURES: &[FunctionSig] = &[
    // String functions
    FunctionSig { name: "substring", params: &[Str, Int32], ret: Str },
    FunctionSig { name: "substring", params: &[Str, Int32, Int32], ret: Str },
    FunctionSig { name: "replace", params: &[Str, Str, Str], ret: Str },
    FunctionSig { name: "indexof", params: &[Str, Str], ret: Int32 },
    FunctionSig { name: "length", params: &[Str], ret: Int32 },
    FunctionSig { name: "toupper", params: &[Str], ret: Str },
    FunctionSig { name: "tolower", params: &[Str], ret: Str },
    FunctionSig { name: "trim", params: &[Str], ret: Str },
    FunctionSig { name: "concat", params: &[Str, Str], ret: Str },
    FunctionSig { name: "startswith", params: &[Str, Str], ret: Boolean },
    FunctionSig { name: "endswith", params: &[Str, Str], ret: Boolean },
    // Date/time accessors
    FunctionSig { name: "year", params: &[DateTime], ret: Int32 },
    FunctionSig { name: "month", params: &[DateTime], ret: Int32 },
    FunctionSig { name: "day", params: &[DateTime], ret: Int32 },
    FunctionSig { name: "hour", params: &[DateTime], ret: Int32 },
    FunctionSig { name: "minute", params: &[DateTime], ret: Int32 },
    FunctionSig { name: "second", params: &[DateTime], ret: Int32 },
    // Math functions
    FunctionSig { name: "round", params: &[Double], ret: Double },
    FunctionSig { name: "round", params: &[Decimal], ret: Decimal },
    FunctionSig { name: "floor", params: &[Double], ret: Double },
    FunctionSig { name: "floor", params: &[Decimal], ret: Decimal },
    FunctionSig { name: "ceiling", params: &[Double], ret: Double },
    FunctionSig { name: "ceiling", params: &[Decimal], ret: Decimal },
];

static REGISTRY: LazyLock<HashMap<&'static str, Vec<FunctionSig>>> = LazyLock::new(|| {
    let mut map: HashMap<&'static str, Vec<FunctionSig>> = HashMap::new();
    for sig in SIGNATURES {
        map.entry(sig.name).or_default().push(*sig);
    }
    map
});

/// All signatures registered under a function name, or None for an unknown
/// function.
pub fn lookup(name: &str) -> Option<&'static [FunctionSig]> {
    REGISTRY.get(name).map(|sigs| sigs.as_slice())
}

pub fn contains(name: &str) -> bool {
    REGISTRY.contains_key(name)
}
