use crate::containers::HashMap;
use crate::containers::StorageKey;
use crate::engine::variables::DomainId;
use crate::linear2::LinearExpression2;
use crate::pumpkin_assert_moderate;

/// A dense identifier of a canonical two-variable expression.
///
/// The least significant bit indicates the orientation: `index.negated()` identifies the negation
/// of the expression identified by `index`. An upper bound on the negated expression is therefore
/// a lower bound on the positive one.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Linear2Index(u32);

impl Linear2Index {
    pub fn negated(self) -> Self {
        Linear2Index(self.0 ^ 1)
    }

    pub fn is_negated(self) -> bool {
        self.0 & 1 == 1
    }

    /// The index with the positive orientation.
    pub fn positive(self) -> Self {
        Linear2Index(self.0 & !1)
    }
}

impl StorageKey for Linear2Index {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        Linear2Index(index as u32)
    }
}

impl std::fmt::Display for Linear2Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_negated() {
            write!(f, "-lin2#{}", self.0 >> 1)
        } else {
            write!(f, "lin2#{}", self.0 >> 1)
        }
    }
}

impl std::fmt::Debug for Linear2Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

/// Assigns a [`Linear2Index`] to every canonical two-variable expression which is used in the
/// cache, and allows looking up the expressions over a variable or a pair of variables.
#[derive(Clone, Debug, Default)]
pub struct Linear2Indices {
    index_by_expression: HashMap<LinearExpression2, Linear2Index>,
    /// The expressions with positive orientation, indexed by `index >> 1`.
    expressions: Vec<LinearExpression2>,
    indices_by_variable: HashMap<DomainId, Vec<Linear2Index>>,
    indices_by_pair: HashMap<(DomainId, DomainId), Vec<Linear2Index>>,
}

impl Linear2Indices {
    /// Brings the expression in the form under which it is indexed. Returns `None` if the
    /// expression does not have two terms.
    fn canonical_form(expression: LinearExpression2) -> Option<(LinearExpression2, bool)> {
        let (mut expression, _) = expression.canonicalized();
        if expression.num_terms() != 2 {
            return None;
        }

        let negated = expression.negate_for_canonicalization();
        Some((expression, negated))
    }

    fn orient(index: Linear2Index, negated: bool) -> Linear2Index {
        if negated {
            index.negated()
        } else {
            index
        }
    }

    /// Returns the index of the expression, allocating one if the expression was not seen before.
    ///
    /// The gcd of the coefficients is ignored; i.e. `2x + 4y` and `x + 2y` share an index. Callers
    /// only pass expressions over two distinct variables.
    pub(crate) fn add_or_get(&mut self, expression: LinearExpression2) -> Linear2Index {
        let Some((canonical, negated)) = Self::canonical_form(expression) else {
            panic!("only expressions over two variables are indexed, got {expression}");
        };

        if let Some(index) = self.index_by_expression.get(&canonical) {
            return Self::orient(*index, negated);
        }

        let index = Linear2Index((self.expressions.len() as u32) << 1);
        self.expressions.push(canonical);
        let _ = self.index_by_expression.insert(canonical, index);
        let _ = self
            .index_by_expression
            .insert(canonical.negated(), index.negated());

        for var in canonical.vars {
            self.indices_by_variable.entry(var).or_default().push(index);
        }
        self.indices_by_pair
            .entry((canonical.vars[0], canonical.vars[1]))
            .or_default()
            .push(index);

        pumpkin_assert_moderate!(self.get_expression(index) == canonical);

        Self::orient(index, negated)
    }

    /// Returns the index of the expression if it has been allocated.
    pub fn get_index(&self, expression: LinearExpression2) -> Option<Linear2Index> {
        let (canonical, negated) = Self::canonical_form(expression)?;
        self.index_by_expression
            .get(&canonical)
            .map(|index| Self::orient(*index, negated))
    }

    /// Returns the canonical expression identified by `index`, taking its orientation into
    /// account.
    pub fn get_expression(&self, index: Linear2Index) -> LinearExpression2 {
        let expression = self.expressions[(index.0 >> 1) as usize];
        if index.is_negated() {
            expression.negated()
        } else {
            expression
        }
    }

    /// The positive indices of all expressions which contain `var`.
    pub fn indices_containing(&self, var: DomainId) -> &[Linear2Index] {
        self.indices_by_variable
            .get(&var)
            .map(|indices| indices.as_slice())
            .unwrap_or(&[])
    }

    /// The positive indices of all expressions over exactly the variables `a` and `b`.
    pub fn indices_between(&self, a: DomainId, b: DomainId) -> &[Linear2Index] {
        let key = if a < b { (a, b) } else { (b, a) };
        self.indices_by_pair
            .get(&key)
            .map(|indices| indices.as_slice())
            .unwrap_or(&[])
    }

    /// The number of expressions with an index; negations are not counted separately.
    pub fn num_expressions(&self) -> usize {
        self.expressions.len()
    }
}
