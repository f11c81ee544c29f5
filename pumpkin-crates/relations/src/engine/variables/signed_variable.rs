use std::ops::Neg;

use super::DomainId;
use super::IntegerVariable;
use crate::engine::predicates::Predicate;
use crate::engine::predicates::PredicateConstructor;
use crate::engine::Assignments;
use crate::math::negate_bound;
use crate::predicate;

/// Either a domain `x` or its negation `-x`.
///
/// Relations with unit coefficients are of the form `a + b <= c` for two signed variables `a` and
/// `b`, which makes them the edges of a precedence graph over signed variables.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignedVariable {
    domain_id: DomainId,
    is_negated: bool,
}

impl SignedVariable {
    pub fn new(domain_id: DomainId, is_negated: bool) -> Self {
        SignedVariable {
            domain_id,
            is_negated,
        }
    }

    pub fn get_domain_id(&self) -> DomainId {
        self.domain_id
    }

    pub fn is_negated(&self) -> bool {
        self.is_negated
    }

    /// The coefficient with which the domain appears, i.e. `1` or `-1`.
    pub fn coefficient(&self) -> i64 {
        if self.is_negated {
            -1
        } else {
            1
        }
    }
}

impl From<DomainId> for SignedVariable {
    fn from(domain_id: DomainId) -> Self {
        SignedVariable::new(domain_id, false)
    }
}

impl Neg for SignedVariable {
    type Output = SignedVariable;

    fn neg(self) -> Self::Output {
        SignedVariable::new(self.domain_id, !self.is_negated)
    }
}

impl IntegerVariable for SignedVariable {
    fn lower_bound(&self, assignments: &Assignments) -> i64 {
        if self.is_negated {
            negate_bound(self.domain_id.upper_bound(assignments))
        } else {
            self.domain_id.lower_bound(assignments)
        }
    }

    fn upper_bound(&self, assignments: &Assignments) -> i64 {
        if self.is_negated {
            negate_bound(self.domain_id.lower_bound(assignments))
        } else {
            self.domain_id.upper_bound(assignments)
        }
    }

    fn root_lower_bound(&self, assignments: &Assignments) -> i64 {
        if self.is_negated {
            negate_bound(self.domain_id.root_upper_bound(assignments))
        } else {
            self.domain_id.root_lower_bound(assignments)
        }
    }

    fn root_upper_bound(&self, assignments: &Assignments) -> i64 {
        if self.is_negated {
            negate_bound(self.domain_id.root_lower_bound(assignments))
        } else {
            self.domain_id.root_upper_bound(assignments)
        }
    }
}

impl PredicateConstructor for SignedVariable {
    type Value = i64;

    fn lower_bound_predicate(&self, bound: i64) -> Predicate {
        let domain_id = self.domain_id;
        if self.is_negated {
            predicate!(domain_id <= negate_bound(bound))
        } else {
            predicate!(domain_id >= bound)
        }
    }

    fn upper_bound_predicate(&self, bound: i64) -> Predicate {
        let domain_id = self.domain_id;
        if self.is_negated {
            predicate!(domain_id >= negate_bound(bound))
        } else {
            predicate!(domain_id <= bound)
        }
    }
}

impl std::fmt::Display for SignedVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_negated {
            write!(f, "-{}", self.domain_id)
        } else {
            write!(f, "{}", self.domain_id)
        }
    }
}

impl std::fmt::Debug for SignedVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}
