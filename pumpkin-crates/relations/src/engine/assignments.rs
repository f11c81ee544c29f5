use thiserror::Error;

use crate::basic_types::PropositionalConjunction;
use crate::basic_types::Trail;
use crate::containers::KeyedVec;
use crate::engine::predicates::Predicate;
use crate::engine::predicates::PredicateType;
use crate::engine::variables::DomainId;
use crate::engine::variables::Literal;
use crate::pumpkin_assert_moderate;
use crate::pumpkin_assert_simple;

/// The bounds of every integer domain, together with the trail of bound changes which allows them
/// to be restored when backtracking.
#[derive(Clone, Debug)]
pub struct Assignments {
    trail: Trail<ConstraintProgrammingTrailEntry>,
    /// The current bounds of the domains.
    bounds: KeyedVec<DomainId, (i64, i64)>,
    /// The bounds of the domains at decision level zero.
    root_bounds: KeyedVec<DomainId, (i64, i64)>,
}

impl Default for Assignments {
    fn default() -> Self {
        let mut assignments = Self {
            trail: Default::default(),
            bounds: Default::default(),
            root_bounds: Default::default(),
        };

        // As a convention, we allocate a dummy domain_id=0, which represents a 0-1 variable that is
        // assigned to one. We use it to represent predicates that are trivially true.
        let dummy_variable = assignments.grow(1, 1);
        pumpkin_assert_simple!(dummy_variable.id() == 0);

        assignments
    }
}

/// Indicates that a bound change would have emptied a domain.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
#[error("the domain became empty")]
pub struct EmptyDomain;

/// A bound change which is recorded on the trail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstraintProgrammingTrailEntry {
    pub predicate: Predicate,
    /// The lower bound of the domain before the change was applied.
    pub old_lower_bound: i64,
    /// The upper bound of the domain before the change was applied.
    pub old_upper_bound: i64,
    /// The explanation of the change; `None` for decisions.
    pub reason: Option<PropositionalConjunction>,
}

impl Assignments {
    pub fn get_decision_level(&self) -> usize {
        self.trail.get_checkpoint()
    }

    pub(crate) fn increase_decision_level(&mut self) {
        self.trail.new_checkpoint()
    }

    pub fn num_trail_entries(&self) -> usize {
        self.trail.len()
    }

    pub fn get_trail_entry(&self, index: usize) -> &ConstraintProgrammingTrailEntry {
        &self.trail[index]
    }

    /// Registers the domain of a new integer variable.
    pub fn grow(&mut self, lower_bound: i64, upper_bound: i64) -> DomainId {
        pumpkin_assert_simple!(
            self.get_decision_level() == 0,
            "can only create variables at the root"
        );
        pumpkin_assert_simple!(lower_bound <= upper_bound);

        let id = self.bounds.push((lower_bound, upper_bound));
        let _ = self.root_bounds.push((lower_bound, upper_bound));

        id
    }

    pub fn get_lower_bound(&self, domain_id: DomainId) -> i64 {
        self.bounds[domain_id].0
    }

    pub fn get_upper_bound(&self, domain_id: DomainId) -> i64 {
        self.bounds[domain_id].1
    }

    pub fn get_root_lower_bound(&self, domain_id: DomainId) -> i64 {
        self.root_bounds[domain_id].0
    }

    pub fn get_root_upper_bound(&self, domain_id: DomainId) -> i64 {
        self.root_bounds[domain_id].1
    }

    /// Returns `Some(true)` if the predicate holds in the current bounds, `Some(false)` if its
    /// negation holds, and `None` otherwise.
    pub fn evaluate_predicate(&self, predicate: Predicate) -> Option<bool> {
        let domain_id = predicate.get_domain();
        let value = predicate.get_right_hand_side();
        let (lower_bound, upper_bound) = self.bounds[domain_id];

        match predicate.get_predicate_type() {
            PredicateType::LowerBound if lower_bound >= value => Some(true),
            PredicateType::LowerBound if upper_bound < value => Some(false),
            PredicateType::UpperBound if upper_bound <= value => Some(true),
            PredicateType::UpperBound if lower_bound > value => Some(false),
            _ => None,
        }
    }

    pub fn is_predicate_satisfied(&self, predicate: Predicate) -> bool {
        self.evaluate_predicate(predicate) == Some(true)
    }

    /// Returns true if the predicate holds in the bounds at the root.
    pub fn is_predicate_satisfied_at_root(&self, predicate: Predicate) -> bool {
        let (lower_bound, upper_bound) = self.root_bounds[predicate.get_domain()];
        match predicate.get_predicate_type() {
            PredicateType::LowerBound => lower_bound >= predicate.get_right_hand_side(),
            PredicateType::UpperBound => upper_bound <= predicate.get_right_hand_side(),
        }
    }

    pub fn evaluate_literal(&self, literal: Literal) -> Option<bool> {
        self.evaluate_predicate(literal.get_true_predicate())
    }

    pub fn is_literal_true(&self, literal: Literal) -> bool {
        self.evaluate_literal(literal) == Some(true)
    }

    pub fn is_literal_false(&self, literal: Literal) -> bool {
        self.evaluate_literal(literal) == Some(false)
    }

    /// Applies the provided predicate to the bounds of its domain.
    ///
    /// Returns `Ok(true)` if a bound was tightened, `Ok(false)` if the predicate already held, and
    /// [`EmptyDomain`] if applying the predicate would leave no value in the domain; in that case
    /// the bounds are left untouched.
    pub fn post_predicate(
        &mut self,
        predicate: Predicate,
        reason: Option<PropositionalConjunction>,
    ) -> Result<bool, EmptyDomain> {
        let domain_id = predicate.get_domain();
        let value = predicate.get_right_hand_side();
        let (old_lower_bound, old_upper_bound) = self.bounds[domain_id];

        let new_bounds = match predicate.get_predicate_type() {
            PredicateType::LowerBound => {
                if value <= old_lower_bound {
                    return Ok(false);
                }
                (value, old_upper_bound)
            }
            PredicateType::UpperBound => {
                if value >= old_upper_bound {
                    return Ok(false);
                }
                (old_lower_bound, value)
            }
        };

        if new_bounds.0 > new_bounds.1 {
            return Err(EmptyDomain);
        }

        self.trail.push(ConstraintProgrammingTrailEntry {
            predicate,
            old_lower_bound,
            old_upper_bound,
            reason,
        });
        self.bounds[domain_id] = new_bounds;
        if self.get_decision_level() == 0 {
            self.root_bounds[domain_id] = new_bounds;
        }

        Ok(true)
    }

    /// Returns the reason of the trail entry which first made `predicate` true, if the predicate is
    /// currently true and was not true at the time the domain was created.
    pub fn get_reason(&self, predicate: Predicate) -> Option<&PropositionalConjunction> {
        self.trail
            .iter()
            .find(|entry| entry.predicate.implies(predicate))
            .and_then(|entry| entry.reason.as_ref())
    }

    /// Restores the bounds to the state at the provided decision level.
    pub(crate) fn synchronise(&mut self, new_decision_level: usize) {
        pumpkin_assert_simple!(new_decision_level <= self.get_decision_level());
        if new_decision_level == self.get_decision_level() {
            return;
        }

        for entry in self.trail.synchronise(new_decision_level) {
            let domain_id = entry.predicate.get_domain();
            self.bounds[domain_id] = (entry.old_lower_bound, entry.old_upper_bound);
        }

        pumpkin_assert_moderate!(self
            .bounds
            .keys()
            .all(|domain_id| new_decision_level > 0
                || self.bounds[domain_id] == self.root_bounds[domain_id]));
    }
}
