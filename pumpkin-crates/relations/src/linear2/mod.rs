//! The cache of bounds on expressions `a * x + b * y` over two integer variables.
//!
//! The bounds are kept in separate tiers, see [`Linear2Bounds`] for how they are combined.
mod enforced_bounds;
mod indices;
mod linear2_bounds;
mod linear3_bounds;
mod linear_expression;
mod options;
mod reason;
mod reified_bounds;
mod repository;
mod root_level_bounds;
mod sharing;
mod transitive;
mod watcher;

pub use enforced_bounds::EnforcedLinear2Bounds;
pub use enforced_bounds::PrecedenceData;
pub use indices::Linear2Index;
pub use indices::Linear2Indices;
pub use linear2_bounds::Linear2Bounds;
pub use linear3_bounds::Linear2BoundsFromLinear3;
pub use linear_expression::LinearExpression2;
pub use options::Linear2Options;
pub use options::TransitiveClosure;
pub use reason::Linear2Reason;
pub use reason::RelationConflict;
pub use reified_bounds::EncodedBound;
pub use reified_bounds::ReifiedLinear2Bounds;
pub use repository::BinaryRelationRepository;
pub use repository::Relation;
pub use root_level_bounds::Augmentation;
pub use root_level_bounds::RelationStatus;
pub use root_level_bounds::RootLevelLinear2Bounds;
pub use sharing::Linear2Sharing;
pub use sharing::SharedLinear2Bounds;
pub use sharing::SharedLinear2Key;
pub use sharing::VariableMapping;
pub use transitive::FullIntegerPrecedence;
pub use transitive::TransitivePrecedencesEvaluator;
pub use watcher::Linear2Watcher;
