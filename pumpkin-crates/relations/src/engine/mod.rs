mod assignments;
pub mod predicates;
mod propagator_id;
mod state;
pub mod variables;

pub use assignments::Assignments;
pub use assignments::ConstraintProgrammingTrailEntry;
pub use assignments::EmptyDomain;
pub use propagator_id::PropagatorId;
pub use state::State;
