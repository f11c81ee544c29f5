use std::ops::Not;

use super::DomainId;
use crate::engine::predicates::Predicate;
use crate::predicate;

/// A Boolean literal; it is backed by a domain with values 0 and 1, where the literal is true if
/// the domain is assigned to 1 (or to 0 for a negated literal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    domain_id: DomainId,
    is_negated: bool,
}

impl Literal {
    /// Creates a new literal wrapping the provided [`DomainId`].
    ///
    /// Note: the provided `domain_id` should have a domain between 0 and 1.
    pub fn new(domain_id: DomainId) -> Literal {
        Literal {
            domain_id,
            is_negated: false,
        }
    }

    pub fn get_domain_id(&self) -> DomainId {
        self.domain_id
    }

    pub fn is_negated(&self) -> bool {
        self.is_negated
    }

    /// The [`Predicate`] which holds if and only if this literal is true.
    pub fn get_true_predicate(&self) -> Predicate {
        let domain_id = self.domain_id;
        if self.is_negated {
            predicate!(domain_id <= 0)
        } else {
            predicate!(domain_id >= 1)
        }
    }

    /// The [`Predicate`] which holds if and only if this literal is false.
    pub fn get_false_predicate(&self) -> Predicate {
        (!*self).get_true_predicate()
    }
}

impl Not for Literal {
    type Output = Literal;

    fn not(self) -> Self::Output {
        Literal {
            domain_id: self.domain_id,
            is_negated: !self.is_negated,
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get_true_predicate())
    }
}
