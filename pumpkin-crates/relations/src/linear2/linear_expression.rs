use std::fmt::Display;

use num::Integer;

use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::SignedVariable;
use crate::engine::Assignments;
use crate::math::cap_add;
use crate::math::cap_prod;

/// The variable used for terms with a zero coefficient; by convention it is the dummy domain which
/// is fixed to one.
const PLACEHOLDER: DomainId = DomainId::new(0);

/// The expression `coeffs[0] * vars[0] + coeffs[1] * vars[1]`.
///
/// An expression is in simple canonical form if terms with a zero coefficient use the placeholder
/// variable, the non-zero terms come first, the variables of two non-zero terms are different and
/// ordered by id. Additionally dividing by the gcd of the coefficients and making the first
/// coefficient positive gives the fully canonical form under which expressions are indexed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinearExpression2 {
    pub vars: [DomainId; 2],
    pub coeffs: [i64; 2],
}

impl LinearExpression2 {
    /// Creates `coeff0 * var0 + coeff1 * var1`; the result is in simple canonical form.
    pub fn new(var0: DomainId, coeff0: i64, var1: DomainId, coeff1: i64) -> Self {
        let mut expression = LinearExpression2 {
            vars: [var0, var1],
            coeffs: [coeff0, coeff1],
        };
        expression.simple_canonicalization();
        expression
    }

    /// Creates the expression `coeff * var`.
    pub fn single(var: DomainId, coeff: i64) -> Self {
        LinearExpression2::new(var, coeff, PLACEHOLDER, 0)
    }

    /// Creates the expression `a + b` over two signed variables.
    pub fn from_signed_variables(a: SignedVariable, b: SignedVariable) -> Self {
        LinearExpression2::new(
            a.get_domain_id(),
            a.coefficient(),
            b.get_domain_id(),
            b.coefficient(),
        )
    }

    pub fn negated(mut self) -> Self {
        self.coeffs = [-self.coeffs[0], -self.coeffs[1]];
        self
    }

    /// The number of non-zero terms.
    pub fn num_terms(&self) -> usize {
        self.coeffs.iter().filter(|&&coeff| coeff != 0).count()
    }

    /// Returns true if both coefficients are either `1` or `-1`.
    pub fn is_unit(&self) -> bool {
        self.coeffs.iter().all(|coeff| coeff.abs() == 1)
    }

    /// Returns the two signed variables `a` and `b` such that the expression is `a + b`, if the
    /// expression is unit.
    pub fn signed_variables(&self) -> Option<[SignedVariable; 2]> {
        if !self.is_unit() {
            return None;
        }

        Some([0, 1].map(|i| SignedVariable::new(self.vars[i], self.coeffs[i] < 0)))
    }

    pub fn simple_canonicalization(&mut self) {
        for i in 0..2 {
            if self.coeffs[i] == 0 {
                self.vars[i] = PLACEHOLDER;
            }
        }

        if self.coeffs[0] != 0 && self.coeffs[1] != 0 && self.vars[0] == self.vars[1] {
            self.coeffs[0] = self.coeffs[0].saturating_add(self.coeffs[1]);
            self.coeffs[1] = 0;
            self.vars[1] = PLACEHOLDER;
            if self.coeffs[0] == 0 {
                self.vars[0] = PLACEHOLDER;
            }
        }

        let should_swap = if self.coeffs[0] == 0 {
            self.coeffs[1] != 0
        } else {
            self.coeffs[1] != 0 && self.vars[0] > self.vars[1]
        };
        if should_swap {
            self.vars.swap(0, 1);
            self.coeffs.swap(0, 1);
        }
    }

    /// Divides both coefficients by their greatest common divisor, which is returned. An expression
    /// without terms has divisor 1.
    pub fn divide_by_gcd(&mut self) -> i64 {
        let gcd = self.coeffs[0].gcd(&self.coeffs[1]);
        if gcd <= 1 {
            return 1;
        }

        self.coeffs[0] /= gcd;
        self.coeffs[1] /= gcd;
        gcd
    }

    /// Negates the expression if its first coefficient is negative; returns whether the expression
    /// was negated.
    pub fn negate_for_canonicalization(&mut self) -> bool {
        if self.coeffs[0] < 0 {
            *self = self.negated();
            true
        } else {
            false
        }
    }

    /// Returns the expression in simple canonical form divided by the gcd of its coefficients,
    /// together with that gcd. The orientation of the expression is kept.
    pub fn canonicalized(mut self) -> (Self, i64) {
        self.simple_canonicalization();
        let gcd = self.divide_by_gcd();
        (self, gcd)
    }

    fn terms(&self) -> impl Iterator<Item = (DomainId, i64)> + '_ {
        self.vars
            .iter()
            .zip(self.coeffs)
            .filter(|(_, coeff)| *coeff != 0)
            .map(|(var, coeff)| (*var, coeff))
    }

    fn evaluate_bound(&self, term_bound: impl Fn(DomainId, bool) -> i64) -> i64 {
        self.terms().fold(0, |sum, (var, coeff)| {
            cap_add(sum, cap_prod(coeff, term_bound(var, coeff > 0)))
        })
    }

    /// The upper bound of the expression implied by the current domains.
    pub fn upper_bound(&self, assignments: &Assignments) -> i64 {
        self.evaluate_bound(|var, positive| {
            if positive {
                var.upper_bound(assignments)
            } else {
                var.lower_bound(assignments)
            }
        })
    }

    /// The lower bound of the expression implied by the current domains.
    pub fn lower_bound(&self, assignments: &Assignments) -> i64 {
        self.evaluate_bound(|var, positive| {
            if positive {
                var.lower_bound(assignments)
            } else {
                var.upper_bound(assignments)
            }
        })
    }

    /// The upper bound of the expression implied by the domains at the root.
    pub fn root_upper_bound(&self, assignments: &Assignments) -> i64 {
        self.evaluate_bound(|var, positive| {
            if positive {
                var.root_upper_bound(assignments)
            } else {
                var.root_lower_bound(assignments)
            }
        })
    }

    /// The lower bound of the expression implied by the domains at the root.
    pub fn root_lower_bound(&self, assignments: &Assignments) -> i64 {
        self.evaluate_bound(|var, positive| {
            if positive {
                var.root_lower_bound(assignments)
            } else {
                var.root_upper_bound(assignments)
            }
        })
    }
}

impl Display for LinearExpression2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut terms = self.terms();
        match terms.next() {
            Some((var, coeff)) => write!(f, "{coeff} * {var}")?,
            None => return write!(f, "0"),
        }
        for (var, coeff) in terms {
            if coeff < 0 {
                write!(f, " - {} * {var}", -coeff)?;
            } else {
                write!(f, " + {coeff} * {var}")?;
            }
        }
        Ok(())
    }
}
