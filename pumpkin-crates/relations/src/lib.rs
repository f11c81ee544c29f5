//! # Pumpkin Relations
//! The binary-relation bounds cache of the Pumpkin solver.
//!
//! For every pairwise linear relation `a * x + b * y` between two integer variables, this crate
//! maintains the tightest upper bound which is currently known, together with a way to
//! reconstruct an explanation for that bound when conflict analysis asks for it. The bounds come
//! from several sources (tiers):
//! * facts which hold unconditionally ([`RootLevelLinear2Bounds`]);
//! * facts which hold while a set of enforcement literals is true ([`EnforcedLinear2Bounds`]);
//! * literals which are equivalent to a bound ([`ReifiedLinear2Bounds`]);
//! * bounds derived from constraints over three variables ([`Linear2BoundsFromLinear3`]).
//!
//! Propagators only interact with the [`Linear2Bounds`] façade, which combines the tiers:
//! ```rust
//! # use pumpkin_relations::LinearExpression2;
//! # use pumpkin_relations::State;
//! # use pumpkin_relations::MIN_INTEGER_VALUE;
//! let mut state = State::default();
//! let x = state.new_bounded_integer(0, 100);
//! let y = state.new_bounded_integer(0, 100);
//!
//! let x_plus_y = LinearExpression2::new(x, 1, y, 1);
//! state
//!     .linear2_bounds
//!     .add_relation(&[], x_plus_y, MIN_INTEGER_VALUE, 10, &mut state.assignments)
//!     .expect("the relation is consistent");
//!
//! assert_eq!(
//!     state.linear2_bounds.upper_bound(x_plus_y, &state.assignments),
//!     10
//! );
//! ```
pub(crate) mod basic_types;
pub mod containers;
pub(crate) mod engine;
pub(crate) mod linear2;
pub(crate) mod math;
pub(crate) mod pumpkin_asserts;
pub mod statistics;

pub use convert_case;

pub use crate::basic_types::ConstraintOperationError;
pub use crate::basic_types::PropositionalConjunction;
pub use crate::engine::predicates;
pub use crate::engine::variables;
pub use crate::engine::Assignments;
pub use crate::engine::EmptyDomain;
pub use crate::engine::PropagatorId;
pub use crate::engine::State;
pub use crate::linear2::*;
pub use crate::math::MAX_INTEGER_VALUE;
pub use crate::math::MIN_INTEGER_VALUE;
