use crate::containers::HashMap;
use crate::containers::KeyedVec;
use crate::engine::variables::DomainId;
use crate::engine::variables::SignedVariable;
use crate::engine::Assignments;
use crate::linear2::Linear2Index;
use crate::linear2::Linear2Indices;
use crate::linear2::Linear2Sharing;
use crate::linear2::Linear2Watcher;
use crate::linear2::LinearExpression2;
use crate::math::cap_add;
use crate::math::ceil_ratio;
use crate::math::floor_ratio;
use crate::math::negate_bound;
use crate::math::MAX_INTEGER_VALUE;

/// Whether a relation holds, is violated, or neither, given what is known at the root.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RelationStatus {
    True,
    False,
    Unknown,
}

/// The outcome of [`RootLevelLinear2Bounds::augment_simple_relations`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Augmentation {
    /// The number of relation pairs which were considered.
    pub work_done: usize,
    /// The number of derived relations which tightened a stored bound.
    pub num_tightened: usize,
}

/// The upper bounds on two-variable expressions which hold unconditionally.
///
/// Bounds in this tier only ever become tighter and are never undone by backtracking. Relations
/// with unit coefficients, `a + b <= c` for signed variables `a` and `b`, are additionally kept as
/// a precedence graph over signed variables which can be closed transitively using
/// [`RootLevelLinear2Bounds::augment_simple_relations`].
#[derive(Clone, Debug, Default)]
pub struct RootLevelLinear2Bounds {
    best_upper_bounds: KeyedVec<Linear2Index, i64>,
    /// For every signed variable `a`, the pairs `(b, index)` such that `index` identifies `a + b`.
    simple_relations: HashMap<SignedVariable, Vec<(SignedVariable, Linear2Index)>>,
    num_updates: u64,
    sharing: Option<Linear2Sharing>,
}

impl RootLevelLinear2Bounds {
    pub fn set_sharing(&mut self, sharing: Linear2Sharing) {
        self.sharing = Some(sharing);
    }

    pub(crate) fn sharing(&self) -> Option<&Linear2Sharing> {
        self.sharing.as_ref()
    }

    /// The tightest known unconditional upper bound on the expression identified by `index`.
    pub fn upper_bound(&self, index: Linear2Index) -> i64 {
        self.best_upper_bounds
            .get(index)
            .copied()
            .unwrap_or(MAX_INTEGER_VALUE)
    }

    /// The number of times a bound in this tier became tighter.
    pub fn num_updates(&self) -> u64 {
        self.num_updates
    }

    /// Records that the expression identified by `index` is at most `upper_bound`.
    ///
    /// The bound is only stored if it is strictly tighter than both the stored bound and the bound
    /// implied by the root domains; returns whether it was stored.
    pub fn add_upper_bound(
        &mut self,
        index: Linear2Index,
        upper_bound: i64,
        indices: &Linear2Indices,
        assignments: &Assignments,
        watcher: &mut Linear2Watcher,
    ) -> bool {
        let expression = indices.get_expression(index);
        if upper_bound >= self.upper_bound(index)
            || upper_bound >= expression.root_upper_bound(assignments)
        {
            return false;
        }

        self.best_upper_bounds.accomodate(index, MAX_INTEGER_VALUE);
        self.best_upper_bounds
            .accomodate(index.negated(), MAX_INTEGER_VALUE);

        let is_new_relation = self.best_upper_bounds[index] == MAX_INTEGER_VALUE;
        self.best_upper_bounds[index] = upper_bound;
        self.num_updates += 1;
        watcher.notify_bound_changed(&expression);

        if is_new_relation {
            if let Some([a, b]) = expression.signed_variables() {
                self.simple_relations.entry(a).or_default().push((b, index));
                self.simple_relations.entry(b).or_default().push((a, index));
            }
        }

        if let Some(sharing) = &self.sharing {
            if !sharing.export(&expression, upper_bound) {
                log::trace!("not sharing {expression} <= {upper_bound}, a variable is not shared");
            }
        }

        true
    }

    /// Combines every relation `var + t <= k1` with every relation `-var + s <= k2` into
    /// `t + s <= k1 + k2`, skipping pairs over the same variable.
    ///
    /// At most `work_limit` pairs are considered, including the skipped ones. Augmenting `var` and
    /// `-var` considers the same pairs.
    pub fn augment_simple_relations(
        &mut self,
        var: SignedVariable,
        work_limit: usize,
        indices: &mut Linear2Indices,
        assignments: &Assignments,
        watcher: &mut Linear2Watcher,
    ) -> Augmentation {
        let (Some(with_positive), Some(with_negative)) = (
            self.simple_relations.get(&var),
            self.simple_relations.get(&-var),
        ) else {
            return Augmentation::default();
        };
        let with_positive = with_positive.clone();
        let with_negative = with_negative.clone();

        let mut augmentation = Augmentation::default();
        'outer: for &(t, first_index) in &with_positive {
            for &(s, second_index) in &with_negative {
                if augmentation.work_done >= work_limit {
                    break 'outer;
                }
                augmentation.work_done += 1;
                if t.get_domain_id() == s.get_domain_id() {
                    continue;
                }

                let upper_bound = cap_add(
                    self.upper_bound(first_index),
                    self.upper_bound(second_index),
                );
                let index = indices.add_or_get(LinearExpression2::from_signed_variables(t, s));
                if self.add_upper_bound(index, upper_bound, indices, assignments, watcher) {
                    augmentation.num_tightened += 1;
                }
            }
        }

        augmentation
    }

    /// Determines whether `lower_bound <= expression <= upper_bound` holds at the root.
    pub fn get_level_zero_status(
        &self,
        expression: LinearExpression2,
        lower_bound: i64,
        upper_bound: i64,
        indices: &Linear2Indices,
        assignments: &Assignments,
    ) -> RelationStatus {
        let (canonical, gcd) = expression.canonicalized();
        let lower_bound = ceil_ratio(lower_bound, gcd);
        let upper_bound = floor_ratio(upper_bound, gcd);

        let mut minimum = canonical.root_lower_bound(assignments);
        let mut maximum = canonical.root_upper_bound(assignments);
        if let Some(index) = indices.get_index(canonical) {
            maximum = maximum.min(self.upper_bound(index));
            minimum = minimum.max(negate_bound(self.upper_bound(index.negated())));
        }

        if minimum >= lower_bound && maximum <= upper_bound {
            RelationStatus::True
        } else if maximum < lower_bound || minimum > upper_bound {
            RelationStatus::False
        } else {
            RelationStatus::Unknown
        }
    }

    /// The signed variables `b` for which a relation `var + b <= c` is known.
    pub fn get_variables_in_simple_relation(
        &self,
        var: SignedVariable,
    ) -> impl Iterator<Item = SignedVariable> + '_ {
        self.simple_relations
            .get(&var)
            .into_iter()
            .flatten()
            .map(|(other, _)| *other)
    }

    /// All unit relations `a + b <= c` stored in this tier, as `(a, b, c)`.
    pub(crate) fn simple_relations(
        &self,
    ) -> impl Iterator<Item = (SignedVariable, SignedVariable, i64)> + '_ {
        self.simple_relations.iter().flat_map(move |(a, relations)| {
            relations
                .iter()
                .map(move |(b, index)| (*a, *b, self.upper_bound(*index)))
        })
    }

    fn collect_bounds(
        &self,
        positive_indices: &[Linear2Index],
        indices: &Linear2Indices,
    ) -> Vec<(LinearExpression2, i64)> {
        positive_indices
            .iter()
            .flat_map(|index| [*index, index.negated()])
            .filter_map(|index| {
                let upper_bound = self.upper_bound(index);
                (upper_bound < MAX_INTEGER_VALUE)
                    .then(|| (indices.get_expression(index), upper_bound))
            })
            .collect()
    }

    /// All non-trivial bounds on expressions which contain `var`.
    pub fn get_all_bounds_containing_variable(
        &self,
        var: DomainId,
        indices: &Linear2Indices,
    ) -> Vec<(LinearExpression2, i64)> {
        self.collect_bounds(indices.indices_containing(var), indices)
    }

    /// All non-trivial bounds on expressions over exactly the variables `a` and `b`.
    pub fn get_all_bounds_containing_variables(
        &self,
        a: DomainId,
        b: DomainId,
        indices: &Linear2Indices,
    ) -> Vec<(LinearExpression2, i64)> {
        self.collect_bounds(indices.indices_between(a, b), indices)
    }

    /// All non-trivial bounds in this tier, sorted by expression.
    pub fn get_sorted_non_trivial_upper_bounds(
        &self,
        indices: &Linear2Indices,
    ) -> Vec<(LinearExpression2, i64)> {
        let mut bounds = self
            .best_upper_bounds
            .keys()
            .filter(|index| self.upper_bound(*index) < MAX_INTEGER_VALUE)
            .map(|index| (indices.get_expression(index), self.upper_bound(index)))
            .collect::<Vec<_>>();
        bounds.sort();
        bounds
    }
}
