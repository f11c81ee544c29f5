mod constraint_operation_error;
mod propositional_conjunction;
mod trail;

pub use constraint_operation_error::ConstraintOperationError;
pub use propositional_conjunction::PropositionalConjunction;
pub(crate) use trail::Trail;
