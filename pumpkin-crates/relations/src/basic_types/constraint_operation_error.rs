use thiserror::Error;

#[cfg(doc)]
use crate::Linear2Bounds;

/// Errors related to registering relations with the [`Linear2Bounds`].
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConstraintOperationError {
    /// Error which indicates that a relation contradicts the facts which are known at the root.
    #[error("Adding the relation failed because it is infeasible at the root")]
    InfeasibleRelation,
    /// Error which indicates that propagating the facts fixed at the root led to an empty domain.
    #[error("Propagating root-level facts failed because the state is infeasible")]
    InfeasibleState,
}
