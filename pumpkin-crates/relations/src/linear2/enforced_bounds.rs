use std::ops::Range;

use crate::basic_types::Trail;
use crate::containers::HashMap;
use crate::containers::KeyedVec;
use crate::engine::variables::DomainId;
use crate::engine::variables::Literal;
use crate::engine::variables::SignedVariable;
use crate::engine::Assignments;
use crate::linear2::Linear2Index;
use crate::linear2::Linear2Indices;
use crate::linear2::Linear2Reason;
use crate::linear2::Linear2Watcher;
use crate::linear2::RootLevelLinear2Bounds;
use crate::math::MAX_INTEGER_VALUE;
use crate::pumpkin_assert_moderate;
use crate::pumpkin_assert_simple;

/// A single version of the conditional bound of an expression.
#[derive(Clone, Debug)]
struct ConditionalEntry {
    /// The entry which was the head of the chain before this entry was pushed.
    previous: Option<usize>,
    upper_bound: i64,
    index: Linear2Index,
    /// The range in the literal arena holding the literals under which the bound holds.
    enforcement: Range<usize>,
}

/// States that `var + offset <= vars[index]` holds at the current decision level, where `offset`
/// is minus the conditional bound of the expression identified by `lin2_index`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrecedenceData {
    pub var: DomainId,
    pub index: usize,
    pub lin2_index: Linear2Index,
}

/// The upper bounds on two-variable expressions which hold while a set of enforcement literals is
/// true.
///
/// Every expression has a chain of versions which only become tighter; its head is the current
/// bound. Entries are kept on a [`Trail`] so that backtracking pops exactly the entries pushed at
/// the undone decision levels and restores the previous heads. A head pushed at the current
/// decision level is overwritten when the bound tightens again, so every expression has at most
/// one version per level.
#[derive(Clone, Debug, Default)]
pub struct EnforcedLinear2Bounds {
    entries: Trail<ConditionalEntry>,
    literals: Trail<Literal>,
    heads: KeyedVec<Linear2Index, Option<usize>>,
    /// For every signed variable `a`, the pairs `(b, index)` such that `index` identifies `a + b`
    /// and has a conditional bound.
    simple_relations: HashMap<SignedVariable, Vec<(SignedVariable, Linear2Index)>>,
    /// The keys of `simple_relations` in the order in which entries were added to them.
    simple_relations_trail: Trail<SignedVariable>,
    num_pushes: u64,
}

impl EnforcedLinear2Bounds {
    /// Records that the expression identified by `index` is at most `upper_bound` while all of
    /// `enforcement` is true; returns whether the bound was stored (in this tier or the root).
    ///
    /// Without enforcement literals, or at the root, the bound is passed on to `root`. Bounds which
    /// are not strictly tighter than the root bound or the current conditional bound are ignored.
    #[allow(clippy::too_many_arguments, reason = "the tiers are borrowed separately")]
    pub fn push_conditional_relation(
        &mut self,
        enforcement: &[Literal],
        index: Linear2Index,
        upper_bound: i64,
        root: &mut RootLevelLinear2Bounds,
        indices: &Linear2Indices,
        assignments: &Assignments,
        watcher: &mut Linear2Watcher,
    ) -> bool {
        let decision_level = assignments.get_decision_level();
        if enforcement.is_empty() || decision_level == 0 {
            return root.add_upper_bound(index, upper_bound, indices, assignments, watcher);
        }

        if upper_bound >= root.upper_bound(index) || upper_bound >= self.upper_bound(index) {
            return false;
        }

        pumpkin_assert_moderate!(enforcement
            .iter()
            .all(|literal| assignments.is_literal_true(*literal)));

        while self.entries.get_checkpoint() < decision_level {
            self.entries.new_checkpoint();
            self.literals.new_checkpoint();
            self.simple_relations_trail.new_checkpoint();
        }

        self.heads.accomodate(index, None);
        self.heads.accomodate(index.negated(), None);

        let previous = self.heads[index];
        self.num_pushes += 1;

        if let Some(entry_id) =
            previous.filter(|&entry_id| entry_id >= self.entries.checkpoint_start())
        {
            self.replace_head(entry_id, enforcement, upper_bound);
            watcher.notify_bound_changed(&indices.get_expression(index));
            return true;
        }

        let start = self.literals.len();
        enforcement
            .iter()
            .for_each(|&literal| self.literals.push(literal));

        self.heads[index] = Some(self.entries.len());
        self.entries.push(ConditionalEntry {
            previous,
            upper_bound,
            index,
            enforcement: start..self.literals.len(),
        });

        let expression = indices.get_expression(index);
        if previous.is_none() {
            if let Some([a, b]) = expression.signed_variables() {
                self.simple_relations.entry(a).or_default().push((b, index));
                self.simple_relations_trail.push(a);
                self.simple_relations.entry(b).or_default().push((a, index));
                self.simple_relations_trail.push(b);
            }
        }

        watcher.notify_bound_changed(&expression);
        true
    }

    /// Removes every entry which was pushed at a decision level above `decision_level`.
    pub fn set_level(&mut self, decision_level: usize) {
        if decision_level >= self.entries.get_checkpoint() {
            return;
        }

        for entry in self.entries.synchronise(decision_level) {
            self.heads[entry.index] = entry.previous;
        }

        for var in self.simple_relations_trail.synchronise(decision_level) {
            let relations = self.simple_relations.get_mut(&var);
            pumpkin_assert_simple!(relations.is_some());
            if let Some(relations) = relations {
                let _ = relations.pop();
            }
        }

        let _ = self.literals.synchronise(decision_level);
    }

    /// Overwrites the entry `entry_id`, which was pushed at the current decision level. The chain
    /// below it is left untouched.
    fn replace_head(&mut self, entry_id: usize, enforcement: &[Literal], upper_bound: i64) {
        // The literals of the last entry are the last ones on the literal trail.
        if entry_id + 1 == self.entries.len() {
            let start = self.entries[entry_id].enforcement.start;
            while self.literals.len() > start {
                let _ = self.literals.pop();
            }
        }

        let start = self.literals.len();
        enforcement
            .iter()
            .for_each(|&literal| self.literals.push(literal));

        let entry = &mut self.entries[entry_id];
        entry.upper_bound = upper_bound;
        entry.enforcement = start..self.literals.len();
    }

    /// The current conditional bound on the expression identified by `index`.
    pub fn upper_bound(&self, index: Linear2Index) -> i64 {
        self.head(index)
            .map(|entry| entry.upper_bound)
            .unwrap_or(MAX_INTEGER_VALUE)
    }

    /// The number of conditional bounds which were stored.
    pub fn num_pushes(&self) -> u64 {
        self.num_pushes
    }

    #[cfg(test)]
    fn num_entries(&self) -> usize {
        self.entries.len()
    }

    fn head(&self, index: Linear2Index) -> Option<&ConditionalEntry> {
        self.heads
            .get(index)
            .copied()
            .flatten()
            .map(|entry_id| &self.entries[entry_id])
    }

    /// Adds the enforcement literals explaining that the expression identified by `index` is at
    /// most `upper_bound`.
    ///
    /// Of all the versions which are tight enough, the oldest is used since its enforcement became
    /// true the earliest.
    pub fn add_reason_for_upper_bound_lower_than(
        &self,
        index: Linear2Index,
        upper_bound: i64,
        reason: &mut Linear2Reason,
    ) {
        let Some(mut entry) = self.head(index) else {
            pumpkin_assert_simple!(false, "no conditional bound to explain for {index}");
            return;
        };
        pumpkin_assert_simple!(entry.upper_bound <= upper_bound);

        while let Some(previous) = entry.previous.map(|entry_id| &self.entries[entry_id]) {
            if previous.upper_bound > upper_bound {
                break;
            }
            entry = previous;
        }

        reason
            .literals
            .extend_from_slice(&self.literals[entry.enforcement.clone()]);
    }

    /// For every variable `vars[i]`, finds the variables `var` for which a conditional bound on
    /// `var - vars[i]` is known.
    pub fn collect_precedences(&self, vars: &[DomainId]) -> Vec<PrecedenceData> {
        vars.iter()
            .enumerate()
            .flat_map(|(index, var)| {
                let negated = -SignedVariable::from(*var);
                self.simple_relations
                    .get(&negated)
                    .into_iter()
                    .flatten()
                    .filter(|(other, _)| !other.is_negated())
                    .map(move |(other, lin2_index)| PrecedenceData {
                        var: other.get_domain_id(),
                        index,
                        lin2_index: *lin2_index,
                    })
            })
            .collect()
    }
}
