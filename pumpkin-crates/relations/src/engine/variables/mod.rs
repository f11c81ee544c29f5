//! A variable, in the context of the relation cache, is a view onto a domain stored in the
//! [`Assignments`]. It may forward domain information unaltered, or apply a transformation (a
//! negation, or an affine mapping).
//!
//! [`Assignments`]: crate::engine::Assignments

mod affine_expression;
mod domain_id;
mod integer_variable;
mod literal;
mod signed_variable;

pub use affine_expression::AffineExpression;
pub use domain_id::DomainId;
pub use integer_variable::IntegerVariable;
pub use literal::Literal;
pub use signed_variable::SignedVariable;
