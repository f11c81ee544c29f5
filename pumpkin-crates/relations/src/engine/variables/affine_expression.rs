use super::DomainId;
use super::IntegerVariable;
use crate::engine::predicates::Predicate;
use crate::engine::predicates::PredicateConstructor;
use crate::engine::Assignments;
use crate::math::cap_add;
use crate::math::cap_prod;
use crate::math::cap_sub;
use crate::math::ceil_ratio;
use crate::math::floor_ratio;
use crate::predicate;

/// Models the expression `scale * x + offset`, where `x` may be absent in which case the
/// expression is the constant `offset`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AffineExpression {
    var: Option<DomainId>,
    scale: i64,
    offset: i64,
}

impl AffineExpression {
    pub fn new(var: DomainId, scale: i64, offset: i64) -> Self {
        if scale == 0 {
            return AffineExpression::constant(offset);
        }

        AffineExpression {
            var: Some(var),
            scale,
            offset,
        }
    }

    pub fn constant(value: i64) -> Self {
        AffineExpression {
            var: None,
            scale: 0,
            offset: value,
        }
    }

    pub fn get_variable(&self) -> Option<DomainId> {
        self.var
    }

    fn evaluate_bound(&self, lower_bound: i64, upper_bound: i64, maximise: bool) -> i64 {
        let value = if (self.scale > 0) == maximise {
            upper_bound
        } else {
            lower_bound
        };
        cap_add(cap_prod(self.scale, value), self.offset)
    }
}

impl IntegerVariable for AffineExpression {
    fn lower_bound(&self, assignments: &Assignments) -> i64 {
        match self.var {
            Some(var) => self.evaluate_bound(
                var.lower_bound(assignments),
                var.upper_bound(assignments),
                false,
            ),
            None => self.offset,
        }
    }

    fn upper_bound(&self, assignments: &Assignments) -> i64 {
        match self.var {
            Some(var) => self.evaluate_bound(
                var.lower_bound(assignments),
                var.upper_bound(assignments),
                true,
            ),
            None => self.offset,
        }
    }

    fn root_lower_bound(&self, assignments: &Assignments) -> i64 {
        match self.var {
            Some(var) => self.evaluate_bound(
                var.root_lower_bound(assignments),
                var.root_upper_bound(assignments),
                false,
            ),
            None => self.offset,
        }
    }

    fn root_upper_bound(&self, assignments: &Assignments) -> i64 {
        match self.var {
            Some(var) => self.evaluate_bound(
                var.root_lower_bound(assignments),
                var.root_upper_bound(assignments),
                true,
            ),
            None => self.offset,
        }
    }
}

impl PredicateConstructor for AffineExpression {
    type Value = i64;

    fn lower_bound_predicate(&self, bound: i64) -> Predicate {
        let Some(var) = self.var else {
            return if self.offset >= bound {
                Predicate::trivially_true()
            } else {
                Predicate::trivially_false()
            };
        };

        if self.scale > 0 {
            predicate!(var >= ceil_ratio(cap_sub(bound, self.offset), self.scale))
        } else {
            predicate!(var <= floor_ratio(cap_sub(self.offset, bound), -self.scale))
        }
    }

    fn upper_bound_predicate(&self, bound: i64) -> Predicate {
        let Some(var) = self.var else {
            return if self.offset <= bound {
                Predicate::trivially_true()
            } else {
                Predicate::trivially_false()
            };
        };

        if self.scale > 0 {
            predicate!(var <= floor_ratio(cap_sub(bound, self.offset), self.scale))
        } else {
            predicate!(var >= ceil_ratio(cap_sub(self.offset, bound), -self.scale))
        }
    }
}

impl std::fmt::Display for AffineExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.var {
            Some(var) => write!(f, "{} * {var} + {}", self.scale, self.offset),
            None => write!(f, "{}", self.offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upper_bound_predicate_rounds_towards_the_variable() {
        let z = DomainId::new(1);

        // 2z + 1 <= 8 <=> z <= 3
        assert_eq!(
            predicate!(z <= 3),
            AffineExpression::new(z, 2, 1).upper_bound_predicate(8)
        );
        // -3z + 1 <= 8 <=> z >= -2
        assert_eq!(
            predicate!(z >= -2),
            AffineExpression::new(z, -3, 1).upper_bound_predicate(8)
        );
    }

    #[test]
    fn constant_expressions_give_trivial_predicates() {
        let constant = AffineExpression::constant(5);

        assert_eq!(Predicate::trivially_true(), constant.upper_bound_predicate(5));
        assert_eq!(Predicate::trivially_false(), constant.upper_bound_predicate(4));
        assert_eq!(Predicate::trivially_true(), constant.lower_bound_predicate(5));
    }

    #[test]
    fn bounds_follow_the_sign_of_the_scale() {
        let mut assignments = Assignments::default();
        let z = assignments.grow(-2, 4);

        let affine = AffineExpression::new(z, -3, 1);
        assert_eq!(-11, affine.lower_bound(&assignments));
        assert_eq!(7, affine.upper_bound(&assignments));
    }
}
