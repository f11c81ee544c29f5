use crate::containers::HashMap;
use crate::engine::predicates::Predicate;
use crate::engine::predicates::PredicateConstructor;
use crate::engine::variables::Literal;
use crate::engine::variables::SignedVariable;
use crate::engine::Assignments;
use crate::linear2::Linear2BoundsFromLinear3;
use crate::linear2::Linear2Index;
use crate::linear2::Linear2Indices;
use crate::linear2::LinearExpression2;
use crate::linear2::RelationStatus;
use crate::linear2::RootLevelLinear2Bounds;
use crate::math::floor_ratio;
use crate::math::MIN_INTEGER_VALUE;

/// How `expression <= upper_bound` can be enforced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncodedBound {
    /// The bound holds at the root.
    AlwaysTrue,
    /// The bound is violated at the root.
    AlwaysFalse,
    /// The bound is equivalent to the literal.
    Literal(Literal),
    /// The bound is equivalent to the predicate.
    IntegerLiteral(Predicate),
    /// No encoding of the bound is known.
    Nothing,
}

/// Literals which are equivalent to a bound on an expression.
///
/// Bounds on two-variable expressions are stored as `(index, upper_bound)`, bounds on a single
/// variable as the predicate describing them.
#[derive(Clone, Debug, Default)]
pub struct ReifiedLinear2Bounds {
    relation_to_literal: HashMap<(Linear2Index, i64), Literal>,
    literal_to_relations: HashMap<Literal, Vec<(Linear2Index, i64)>>,
    predicate_to_literal: HashMap<Predicate, Literal>,
    literal_to_predicates: HashMap<Literal, Vec<Predicate>>,
}

impl ReifiedLinear2Bounds {
    /// Records `literal <=> expression(index) <= upper_bound`; returns false if the bound already
    /// had an encoding, which is then kept.
    pub fn add_encoded_bound(
        &mut self,
        literal: Literal,
        index: Linear2Index,
        upper_bound: i64,
    ) -> bool {
        if self.relation_to_literal.contains_key(&(index, upper_bound)) {
            return false;
        }

        let _ = self
            .relation_to_literal
            .insert((index, upper_bound), literal);
        self.literal_to_relations
            .entry(literal)
            .or_default()
            .push((index, upper_bound));
        true
    }

    /// Records `literal <=> predicate`; returns false if the predicate already had an encoding,
    /// which is then kept.
    pub fn add_predicate_encoding(&mut self, literal: Literal, predicate: Predicate) -> bool {
        if self.predicate_to_literal.contains_key(&predicate) {
            return false;
        }

        let _ = self.predicate_to_literal.insert(predicate, literal);
        self.literal_to_predicates
            .entry(literal)
            .or_default()
            .push(predicate);
        true
    }

    pub fn get_literal(&self, index: Linear2Index, upper_bound: i64) -> Option<Literal> {
        self.relation_to_literal.get(&(index, upper_bound)).copied()
    }

    pub fn get_literal_for_predicate(&self, predicate: Predicate) -> Option<Literal> {
        self.predicate_to_literal.get(&predicate).copied()
    }

    /// The bounds `(index, upper_bound)` which are equivalent to `literal`.
    pub fn relations_encoded_by(&self, literal: Literal) -> &[(Linear2Index, i64)] {
        self.literal_to_relations
            .get(&literal)
            .map(|relations| relations.as_slice())
            .unwrap_or(&[])
    }

    /// The predicates which are equivalent to `literal`.
    pub fn predicates_encoded_by(&self, literal: Literal) -> &[Predicate] {
        self.literal_to_predicates
            .get(&literal)
            .map(|predicates| predicates.as_slice())
            .unwrap_or(&[])
    }

    pub fn num_encodings(&self) -> usize {
        self.relation_to_literal.len() + self.predicate_to_literal.len()
    }

    /// Looks for a way to enforce `expression <= upper_bound`: first whether the root already
    /// decides it, then an equivalent literal, and finally a predicate from an exact linear3
    /// derivation.
    pub fn get_encoded_bound(
        &self,
        expression: LinearExpression2,
        upper_bound: i64,
        root: &RootLevelLinear2Bounds,
        linear3: &Linear2BoundsFromLinear3,
        indices: &Linear2Indices,
        assignments: &Assignments,
    ) -> EncodedBound {
        match root.get_level_zero_status(
            expression,
            MIN_INTEGER_VALUE,
            upper_bound,
            indices,
            assignments,
        ) {
            RelationStatus::True => return EncodedBound::AlwaysTrue,
            RelationStatus::False => return EncodedBound::AlwaysFalse,
            RelationStatus::Unknown => {}
        }

        let (canonical, gcd) = expression.canonicalized();
        let upper_bound = floor_ratio(upper_bound, gcd);

        match canonical.num_terms() {
            0 => EncodedBound::Nothing,
            1 => {
                let var = SignedVariable::new(canonical.vars[0], canonical.coeffs[0] < 0);
                let predicate = var.upper_bound_predicate(upper_bound);
                self.get_literal_for_predicate(predicate)
                    .map(EncodedBound::Literal)
                    .unwrap_or(EncodedBound::IntegerLiteral(predicate))
            }
            _ => {
                let Some(index) = indices.get_index(canonical) else {
                    return EncodedBound::Nothing;
                };

                if let Some(literal) = self.get_literal(index, upper_bound) {
                    return EncodedBound::Literal(literal);
                }

                match linear3.encoded_predicate(index, upper_bound) {
                    Some(predicate) if predicate == Predicate::trivially_true() => {
                        EncodedBound::AlwaysTrue
                    }
                    Some(predicate) if predicate == Predicate::trivially_false() => {
                        EncodedBound::AlwaysFalse
                    }
                    Some(predicate) => EncodedBound::IntegerLiteral(predicate),
                    None => EncodedBound::Nothing,
                }
            }
        }
    }
}
