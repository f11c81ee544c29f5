use crate::containers::HashMap;
use crate::engine::predicates::Predicate;
use crate::engine::predicates::PredicateConstructor;
use crate::engine::variables::AffineExpression;
use crate::engine::variables::IntegerVariable;
use crate::engine::Assignments;
use crate::linear2::Linear2Index;
use crate::linear2::Linear2Indices;
use crate::linear2::Linear2Reason;
use crate::linear2::Linear2Watcher;
use crate::math::cap_add;
use crate::math::cap_prod;
use crate::math::cap_sub;
use crate::math::floor_ratio;
use crate::math::MAX_INTEGER_VALUE;
use crate::pumpkin_assert_simple;

#[derive(Clone, Copy, Debug)]
struct AffineUpperBound {
    affine: AffineExpression,
    divisor: i64,
    /// Whether `divisor * expression == affine` holds rather than only `<=`.
    is_exact: bool,
}

impl AffineUpperBound {
    fn upper_bound(&self, assignments: &Assignments) -> i64 {
        floor_ratio(self.affine.upper_bound(assignments), self.divisor)
    }

    /// The weakest bound on the affine expression which implies `expression <= upper_bound`.
    fn bounding_predicate(&self, upper_bound: i64) -> Predicate {
        let affine_bound = cap_sub(cap_prod(cap_add(upper_bound, 1), self.divisor), 1);
        self.affine.upper_bound_predicate(affine_bound)
    }
}

/// Upper bounds on two-variable expressions derived from linear constraints over three variables.
///
/// From `c_x * x + c_y * y + c_z * z <= rhs` follows `c_x * x + c_y * y <= rhs - c_z * z`; per
/// expression the derivation giving the tightest bound is stored in the form
/// `divisor * expression <= affine`. The stored bound moves with the bounds of the third variable,
/// so nothing has to be undone on backtracking.
#[derive(Clone, Debug, Default)]
pub struct Linear2BoundsFromLinear3 {
    best: HashMap<Linear2Index, AffineUpperBound>,
    num_updates: u64,
}

impl Linear2BoundsFromLinear3 {
    /// Records `divisor * expression <= affine` (or `==` if `is_exact`) for the expression
    /// identified by `index`; returns whether it replaced the stored derivation.
    ///
    /// A derivation replaces the stored one only if its bound is strictly tighter in the current
    /// bounds, or equally tight and exact where the stored one is not.
    #[allow(clippy::too_many_arguments, reason = "the tiers are borrowed separately")]
    pub fn add_affine_upper_bound(
        &mut self,
        index: Linear2Index,
        affine: AffineExpression,
        divisor: i64,
        is_exact: bool,
        indices: &Linear2Indices,
        assignments: &Assignments,
        watcher: &mut Linear2Watcher,
    ) -> bool {
        pumpkin_assert_simple!(divisor > 0);

        let candidate = AffineUpperBound {
            affine,
            divisor,
            is_exact,
        };
        let new_bound = candidate.upper_bound(assignments);

        if let Some(current) = self.best.get(&index) {
            let current_bound = current.upper_bound(assignments);
            let is_better = new_bound < current_bound
                || (new_bound == current_bound && is_exact && !current.is_exact);
            if !is_better {
                return false;
            }
        }

        let _ = self.best.insert(index, candidate);
        self.num_updates += 1;
        if new_bound < MAX_INTEGER_VALUE {
            watcher.notify_bound_changed(&indices.get_expression(index));
        }
        true
    }

    /// The upper bound on the expression identified by `index` implied by the current bounds of
    /// the stored third variable.
    pub fn upper_bound(&self, index: Linear2Index, assignments: &Assignments) -> i64 {
        self.best
            .get(&index)
            .map(|bound| bound.upper_bound(assignments))
            .unwrap_or(MAX_INTEGER_VALUE)
    }

    /// Adds the bound on the third variable which explains that the expression identified by
    /// `index` is at most `upper_bound`.
    pub fn add_reason_for_upper_bound_lower_than(
        &self,
        index: Linear2Index,
        upper_bound: i64,
        reason: &mut Linear2Reason,
    ) {
        let Some(bound) = self.best.get(&index) else {
            pumpkin_assert_simple!(false, "no linear3 derivation to explain for {index}");
            return;
        };

        reason.push_integer_literal(bound.bounding_predicate(upper_bound));
    }

    /// Returns a predicate which is equivalent to `expression <= upper_bound` for the expression
    /// identified by `index`, if an exact derivation is stored.
    pub fn encoded_predicate(&self, index: Linear2Index, upper_bound: i64) -> Option<Predicate> {
        self.best
            .get(&index)
            .filter(|bound| bound.is_exact)
            .map(|bound| bound.bounding_predicate(upper_bound))
    }

    pub fn num_updates(&self) -> u64 {
        self.num_updates
    }
}
