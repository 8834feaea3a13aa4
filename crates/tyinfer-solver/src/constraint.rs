//! Constraints produced by the structural matcher.

use crate::types::Type;

/// Direction of a constraint on the free type variable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// The variable is exactly `ty`.
    Equals,
    /// The variable must be a supertype of `ty` (a lower bound).
    Supertype,
    /// The variable must be a subtype of `ty` (an upper bound).
    Subtype,
}

impl ConstraintKind {
    /// Flip the direction, as when matching through a `? super` wildcard.
    pub fn flipped(self) -> Self {
        match self {
            ConstraintKind::Equals => ConstraintKind::Equals,
            ConstraintKind::Supertype => ConstraintKind::Subtype,
            ConstraintKind::Subtype => ConstraintKind::Supertype,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Constraint {
    pub ty: Type,
    pub kind: ConstraintKind,
}

impl Constraint {
    pub fn new(ty: Type, kind: ConstraintKind) -> Self {
        Self { ty, kind }
    }

    pub fn equals(ty: Type) -> Self {
        Self::new(ty, ConstraintKind::Equals)
    }

    pub fn supertype(ty: Type) -> Self {
        Self::new(ty, ConstraintKind::Supertype)
    }

    pub fn subtype(ty: Type) -> Self {
        Self::new(ty, ConstraintKind::Subtype)
    }

    /// An `Equals` constraint whose type is a wildcard: a capture.
    pub fn is_wildcard_capture(&self) -> bool {
        self.kind == ConstraintKind::Equals && self.ty.is_wildcard()
    }
}

/// Result of matching one pattern against one argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The argument says nothing about the variable.
    NoInfo,
    /// The argument contradicts any binding of the variable.
    Failed,
    /// The variable met a raw class argument and must be erased.
    Raw,
    Constraint(Constraint),
}

impl MatchOutcome {
    pub fn is_no_info(&self) -> bool {
        matches!(self, MatchOutcome::NoInfo)
    }

    pub fn constraint(&self) -> Option<&Constraint> {
        match self {
            MatchOutcome::Constraint(constraint) => Some(constraint),
            _ => None,
        }
    }

    /// The constrained type, when this is a constraint.
    pub fn into_type(self) -> Option<Type> {
        match self {
            MatchOutcome::Constraint(constraint) => Some(constraint.ty),
            _ => None,
        }
    }
}

impl From<Constraint> for MatchOutcome {
    fn from(constraint: Constraint) -> Self {
        MatchOutcome::Constraint(constraint)
    }
}
