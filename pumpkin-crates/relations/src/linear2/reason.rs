use std::fmt::Display;

use thiserror::Error;

use crate::basic_types::PropositionalConjunction;
use crate::engine::predicates::Predicate;
use crate::engine::variables::Literal;
use crate::engine::Assignments;

/// An explanation for a bound on a two-variable expression.
///
/// The explanation is the conjunction of `literals` (which are all true) and `integer_literals`
/// (which all hold in the current bounds).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Linear2Reason {
    pub literals: Vec<Literal>,
    pub integer_literals: Vec<Predicate>,
}

impl Linear2Reason {
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty() && self.integer_literals.is_empty()
    }

    /// Adds a predicate to the explanation; trivially true predicates are skipped.
    pub fn push_integer_literal(&mut self, predicate: Predicate) {
        if predicate != Predicate::trivially_true() {
            self.integer_literals.push(predicate);
        }
    }

    /// Returns true if every element of the explanation holds in the provided assignments.
    pub fn is_satisfied(&self, assignments: &Assignments) -> bool {
        self.literals
            .iter()
            .all(|literal| assignments.is_literal_true(*literal))
            && self
                .integer_literals
                .iter()
                .all(|predicate| assignments.is_predicate_satisfied(*predicate))
    }

    fn predicates(&self) -> impl Iterator<Item = Predicate> + '_ {
        self.literals
            .iter()
            .map(|literal| literal.get_true_predicate())
            .chain(self.integer_literals.iter().copied())
    }
}

impl From<Linear2Reason> for PropositionalConjunction {
    fn from(reason: Linear2Reason) -> Self {
        PropositionalConjunction::default().extend_and_remove_duplicates(reason.predicates())
    }
}

impl Display for Linear2Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let conjunction: PropositionalConjunction = self.predicates().collect();
        write!(f, "{conjunction}")
    }
}

/// A pushed bound contradicts what is already known.
///
/// The `reason` contains the explanation of the pushed bound and the explanation of the bound which
/// it contradicts; all of its elements currently hold, yet together they are infeasible.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("the bound is in conflict with the current state, reason: {reason}")]
pub struct RelationConflict {
    pub reason: Linear2Reason,
}
