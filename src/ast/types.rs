use std::fmt;

/// The closed set of EDM scalar types an expression node can resolve to.
///
/// Every AST node carries one of these; operator and function sites match on
/// them exhaustively, so an unsupported combination is rejected while
/// parsing rather than discovered at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Int32,
    Int64,
    Single,
    Double,
    Decimal,
    String,
    Boolean,
    DateTime,
    Guid,
    Binary,
    /// The type of the `null` literal. No property declares it; it only
    /// participates in `eq`/`ne` presence tests.
    Null,
}

impl ScalarType {
    /// Position in the numeric promotion ladder, or None for non-numerics.
    fn ladder(self) -> Option<u8> {
        match self {
            ScalarType::Int32 => Some(0),
            ScalarType::Int64 => Some(1),
            ScalarType::Single => Some(2),
            ScalarType::Double => Some(3),
            ScalarType::Decimal => Some(4),
            _ => None,
        }
    }

    pub fn is_numeric(self) -> bool {
        self.ladder().is_some()
    }

    /// The promoted type of two numeric operands: whichever of the pair
    /// appears later in Int32 → Int64 → Single → Double → Decimal.
    /// None if either side is not numeric.
    pub fn promoted(self, other: ScalarType) -> Option<ScalarType> {
        let a = self.ladder()?;
        let b = other.ladder()?;
        Some(if a >= b { self } else { other })
    }

    /// Whether a value of this type may be passed where `target` is
    /// declared: exact match, or numeric widening up the ladder.
    pub fn widens_to(self, target: ScalarType) -> bool {
        if self == target {
            return true;
        }
        match (self.ladder(), target.ladder()) {
            (Some(a), Some(b)) => a <= b,
            _ => false,
        }
    }

    /// Comparability under `eq`/`ne`: the closed list of pairings, plus
    /// `null` on either side for presence tests.
    pub fn equality_comparable(self, other: ScalarType) -> bool {
        if self == ScalarType::Null || other == ScalarType::Null {
            return true;
        }
        self.order_comparable(other)
    }

    /// Comparability under `lt`/`le`/`gt`/`ge`: numeric×numeric after
    /// promotion, or the same kind among String, Boolean, DateTime, Guid.
    pub fn order_comparable(self, other: ScalarType) -> bool {
        if self.is_numeric() && other.is_numeric() {
            return true;
        }
        matches!(
            (self, other),
            (ScalarType::String, ScalarType::String)
                | (ScalarType::Boolean, ScalarType::Boolean)
                | (ScalarType::DateTime, ScalarType::DateTime)
                | (ScalarType::Guid, ScalarType::Guid)
        )
    }

    /// Whether values of this type form a total order usable as an
    /// `$orderby` key. Binary and null are excluded.
    pub fn is_orderable(self) -> bool {
        !matches!(self, ScalarType::Binary | ScalarType::Null)
    }

    /// Parse an EDM scalar name as written in model descriptions.
    pub fn from_name(name: &str) -> Option<ScalarType> {
        match name {
            "Int32" | "Edm.Int32" => Some(ScalarType::Int32),
            "Int64" | "Edm.Int64" => Some(ScalarType::Int64),
            "Single" | "Edm.Single" => Some(ScalarType::Single),
            "Double" | "Edm.Double" => Some(ScalarType::Double),
            "Decimal" | "Edm.Decimal" => Some(ScalarType::Decimal),
            "String" | "Edm.String" => Some(ScalarType::String),
            "Boolean" | "Edm.Boolean" => Some(ScalarType::Boolean),
            "DateTime" | "Edm.DateTime" => Some(ScalarType::DateTime),
            "Guid" | "Edm.Guid" => Some(ScalarType::Guid),
            "Binary" | "Edm.Binary" => Some(ScalarType::Binary),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarType::Int32 => write!(f, "Edm.Int32"),
            ScalarType::Int64 => write!(f, "Edm.Int64"),
            ScalarType::Single => write!(f, "Edm.Single"),
            ScalarType::Double => write!(f, "Edm.Double"),
            ScalarType::Decimal => write!(f, "Edm.Decimal"),
            ScalarType::String => write!(f, "Edm.String"),
            ScalarType::Boolean => write!(f, "Edm.Boolean"),
            ScalarType::DateTime => write!(f, "Edm.DateTime"),
            ScalarType::Guid => write!(f, "Edm.Guid"),
            ScalarType::Binary => write!(f, "Edm.Binary"),
            ScalarType::Null => write!(f, "null"),
        }
    }
}
