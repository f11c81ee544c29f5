use crate::basic_types::ConstraintOperationError;
use crate::engine::predicates::Predicate;
use crate::engine::variables::DomainId;
use crate::engine::variables::Literal;
use crate::engine::Assignments;
use crate::engine::EmptyDomain;
use crate::linear2::Linear2Bounds;
use crate::linear2::Linear2Options;
use crate::pumpkin_assert_simple;

/// The domains of the variables together with the relation cache which is kept in sync with them.
///
/// Both are public so that callers can borrow them separately, e.g.
/// `state.linear2_bounds.upper_bound(expression, &state.assignments)`.
#[derive(Debug, Default)]
pub struct State {
    pub assignments: Assignments,
    pub linear2_bounds: Linear2Bounds,
}

impl State {
    pub fn new(options: Linear2Options) -> Self {
        State {
            assignments: Assignments::default(),
            linear2_bounds: Linear2Bounds::new(options),
        }
    }

    /// Creates a new integer variable with the domain `[lower_bound, upper_bound]`.
    pub fn new_bounded_integer(&mut self, lower_bound: i64, upper_bound: i64) -> DomainId {
        self.assignments.grow(lower_bound, upper_bound)
    }

    /// Creates a new Boolean (0-1) variable.
    pub fn new_literal(&mut self) -> Literal {
        Literal::new(self.new_bounded_integer(0, 1))
    }

    pub fn get_checkpoint(&self) -> usize {
        self.assignments.get_decision_level()
    }

    /// Create a checkpoint of the current [`State`], that can be returned to with
    /// [`State::restore_to`].
    pub fn new_checkpoint(&mut self) {
        self.assignments.increase_decision_level();
    }

    /// Restores the domains and the conditional relation bounds to the given checkpoint.
    ///
    /// If the provided checkpoint is equal to the current checkpoint, this is a no-op.
    pub fn restore_to(&mut self, checkpoint: usize) {
        pumpkin_assert_simple!(checkpoint <= self.get_checkpoint());
        if checkpoint == self.get_checkpoint() {
            return;
        }

        self.assignments.synchronise(checkpoint);
        self.linear2_bounds.set_level(checkpoint);
    }

    /// Posts the predicate as a decision; returns whether a domain changed.
    pub fn post(&mut self, predicate: Predicate) -> Result<bool, EmptyDomain> {
        self.assignments.post_predicate(predicate, None)
    }

    /// Lets the relation cache pick up the literals which were fixed at the root.
    pub fn propagate_root_level_fixings(&mut self) -> Result<(), ConstraintOperationError> {
        self.linear2_bounds
            .propagate_root_level_fixings(&mut self.assignments)
    }

    /// Turns the registered relations into equivalences; see [`Linear2Bounds::build`].
    pub fn build_relations(&mut self) -> Result<usize, ConstraintOperationError> {
        self.linear2_bounds.build(&mut self.assignments)
    }
}
