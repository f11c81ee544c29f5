use itertools::Itertools;

use crate::containers::HashMap;
use crate::engine::predicates::PredicateConstructor;
use crate::engine::variables::Literal;
use crate::engine::variables::SignedVariable;
use crate::linear2::Linear2Indices;
use crate::linear2::LinearExpression2;
use crate::linear2::ReifiedLinear2Bounds;
use crate::math::ceil_ratio;
use crate::math::floor_ratio;
use crate::math::negate_bound;
use crate::math::MAX_INTEGER_VALUE;
use crate::math::MIN_INTEGER_VALUE;

/// The half-reified relation `enforcement => lhs <= expression <= rhs`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Relation {
    pub enforcement: Literal,
    pub expression: LinearExpression2,
    pub lhs: i64,
    pub rhs: i64,
}

impl Relation {
    /// Brings the relation in the canonical form of its expression; the bounds are scaled and
    /// swapped accordingly.
    fn canonical_range(&self) -> (LinearExpression2, i64, i64) {
        let (mut expression, gcd) = self.expression.canonicalized();
        let lhs = ceil_ratio(self.lhs, gcd);
        let rhs = floor_ratio(self.rhs, gcd);

        if expression.negate_for_canonicalization() {
            (expression, negate_bound(rhs), negate_bound(lhs))
        } else {
            (expression, lhs, rhs)
        }
    }
}

/// The relations which hold when a single literal is true, as registered by the model.
///
/// [`BinaryRelationRepository::build`] turns pairs of relations on the same expression which are
/// enforced by a literal and by its negation into equivalences.
#[derive(Clone, Debug, Default)]
pub struct BinaryRelationRepository {
    relations: Vec<Relation>,
    relations_by_literal: HashMap<Literal, Vec<usize>>,
}

impl BinaryRelationRepository {
    pub fn add(&mut self, relation: Relation) {
        self.relations_by_literal
            .entry(relation.enforcement)
            .or_default()
            .push(self.relations.len());
        self.relations.push(relation);
    }

    pub fn num_relations(&self) -> usize {
        self.relations.len()
    }

    pub fn relations_enforced_by(&self, literal: Literal) -> impl Iterator<Item = &Relation> + '_ {
        self.relations_by_literal
            .get(&literal)
            .into_iter()
            .flatten()
            .map(|relation_id| &self.relations[*relation_id])
    }

    /// Detects `l => expression <= a` and `~l => expression >= b` with `a < b`, and registers
    /// `l <=> expression <= a` and `~l <=> expression >= b` in `reified`. Returns the number of
    /// equivalences which were found.
    pub fn build(&self, reified: &mut ReifiedLinear2Bounds, indices: &mut Linear2Indices) -> usize {
        let mut num_equivalences = 0;

        for literal in self.relations_by_literal.keys().copied().sorted() {
            for positive in self.relations_enforced_by(literal) {
                let (expression, _, upper_bound) = positive.canonical_range();
                if upper_bound >= MAX_INTEGER_VALUE || expression.num_terms() == 0 {
                    continue;
                }

                for negative in self.relations_enforced_by(!literal) {
                    let (other_expression, lower_bound, _) = negative.canonical_range();
                    if other_expression != expression
                        || lower_bound <= MIN_INTEGER_VALUE
                        || upper_bound >= lower_bound
                    {
                        continue;
                    }

                    if Self::register(
                        reified,
                        indices,
                        literal,
                        expression,
                        upper_bound,
                        lower_bound,
                    ) {
                        num_equivalences += 1;
                    }
                }
            }
        }

        log::debug!("found {num_equivalences} equivalences between literals and relations");
        num_equivalences
    }

    fn register(
        reified: &mut ReifiedLinear2Bounds,
        indices: &mut Linear2Indices,
        literal: Literal,
        expression: LinearExpression2,
        upper_bound: i64,
        lower_bound: i64,
    ) -> bool {
        if expression.num_terms() == 1 {
            let var = SignedVariable::new(expression.vars[0], expression.coeffs[0] < 0);
            let registered_true =
                reified.add_predicate_encoding(literal, var.upper_bound_predicate(upper_bound));
            let registered_false =
                reified.add_predicate_encoding(!literal, var.lower_bound_predicate(lower_bound));
            registered_true || registered_false
        } else {
            let index = indices.add_or_get(expression);
            let registered_true = reified.add_encoded_bound(literal, index, upper_bound);
            let registered_false =
                reified.add_encoded_bound(!literal, index.negated(), negate_bound(lower_bound));
            registered_true || registered_false
        }
    }
}
