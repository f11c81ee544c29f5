use crate::engine::Assignments;

/// A trait specifying the required behaviour of an integer variable such as retrieving its current
/// bounds and the bounds it has at the root.
pub trait IntegerVariable: Copy {
    /// Get the current lower bound of the integer variable.
    fn lower_bound(&self, assignments: &Assignments) -> i64;

    /// Get the current upper bound of the integer variable.
    fn upper_bound(&self, assignments: &Assignments) -> i64;

    /// Get the lower bound of the integer variable at the root (decision level zero).
    fn root_lower_bound(&self, assignments: &Assignments) -> i64;

    /// Get the upper bound of the integer variable at the root (decision level zero).
    fn root_upper_bound(&self, assignments: &Assignments) -> i64;
}
