//! Integer arithmetic used for bound reasoning.
//!
//! Bounds are `i64` values in the range `[MIN_INTEGER_VALUE, MAX_INTEGER_VALUE]`, where the
//! extremes stand for -infinity and +infinity respectively. All arithmetic on bounds saturates at
//! these values; an infinite operand stays infinite.
pub(crate) mod num_ext;

pub(crate) use num_ext::*;

/// The value which represents +infinity, i.e. "no upper bound".
pub const MAX_INTEGER_VALUE: i64 = i64::MAX - 1;
/// The value which represents -infinity, i.e. "no lower bound".
pub const MIN_INTEGER_VALUE: i64 = -MAX_INTEGER_VALUE;
