use std::collections::VecDeque;

use crate::containers::HashMap;
use crate::engine::variables::DomainId;
use crate::engine::variables::SignedVariable;
use crate::engine::Assignments;
use crate::linear2::Linear2Indices;
use crate::linear2::Linear2Options;
use crate::linear2::Linear2Watcher;
use crate::linear2::RootLevelLinear2Bounds;
use crate::linear2::TransitiveClosure;
use crate::math::cap_add;
use crate::math::negate_bound;
use crate::math::MAX_INTEGER_VALUE;

/// States that `vars[indices[i]] + offsets[i] <= var` for every `i`, where `vars` are the target
/// variables given to [`TransitivePrecedencesEvaluator::compute_full_precedences`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FullIntegerPrecedence {
    pub var: DomainId,
    pub indices: Vec<usize>,
    pub offsets: Vec<i64>,
}

/// Analyses the unit relations at the root as a precedence graph over signed variables.
///
/// A relation `a + b <= c` gives the arcs `a -> -b` and `b -> -a`, both with offset `-c`, where an
/// arc `u -> v` with offset `d` states `u + d <= v`. If the graph is acyclic, relations are
/// derived along a topological order within a work limit.
#[derive(Clone, Debug, Default)]
pub struct TransitivePrecedencesEvaluator {
    /// The number of root updates at the time of the last build.
    built_at: Option<u64>,
    is_dag: bool,
    topological_order: Vec<SignedVariable>,
    arcs: HashMap<SignedVariable, Vec<(SignedVariable, i64)>>,
    work_done: u64,
    num_augmented_relations: u64,
}

impl TransitivePrecedencesEvaluator {
    /// Whether the last build found the precedence graph to be acyclic.
    pub fn is_dag(&self) -> bool {
        self.is_dag
    }

    /// The total number of relation pairs which were combined over all builds.
    pub fn work_done(&self) -> u64 {
        self.work_done
    }

    /// The total number of root relations which were tightened by augmentation.
    pub fn num_augmented_relations(&self) -> u64 {
        self.num_augmented_relations
    }

    pub fn topological_order(&self) -> &[SignedVariable] {
        &self.topological_order
    }

    /// Rebuilds the precedence graph if the root relations changed since the last build.
    pub fn build(
        &mut self,
        root: &mut RootLevelLinear2Bounds,
        indices: &mut Linear2Indices,
        assignments: &Assignments,
        watcher: &mut Linear2Watcher,
        options: &Linear2Options,
    ) {
        if self.built_at == Some(root.num_updates()) {
            return;
        }

        self.collect_arcs(root);
        self.is_dag = self.compute_topological_order();

        if !self.is_dag {
            log::debug!("the precedence graph contains a cycle; no transitive closure is computed");
            self.topological_order.clear();
            self.built_at = Some(root.num_updates());
            return;
        }

        if options.transitive_closure == TransitiveClosure::Bounded {
            let mut remaining = options.augmentation_work_limit;
            let mut num_tightened = 0;
            for var in self.topological_order.clone() {
                if remaining == 0 {
                    break;
                }
                // `-var` combines the same pairs as `var`.
                if var.is_negated() {
                    continue;
                }
                let augmentation =
                    root.augment_simple_relations(var, remaining, indices, assignments, watcher);
                remaining -= augmentation.work_done;
                num_tightened += augmentation.num_tightened;
            }
            let work_done = options.augmentation_work_limit - remaining;
            self.work_done += work_done as u64;
            self.num_augmented_relations += num_tightened as u64;
            log::debug!("augmented {num_tightened} precedences using {work_done} pairs");

            // New relations follow existing paths, so the order remains topological.
            self.collect_arcs(root);
        }

        self.built_at = Some(root.num_updates());
    }

    fn collect_arcs(&mut self, root: &RootLevelLinear2Bounds) {
        self.arcs.clear();
        for (a, b, upper_bound) in root.simple_relations() {
            if upper_bound >= MAX_INTEGER_VALUE {
                continue;
            }
            self.arcs
                .entry(a)
                .or_default()
                .push((-b, negate_bound(upper_bound)));
        }
        for successors in self.arcs.values_mut() {
            successors.sort();
        }
    }

    /// Computes a topological order using Kahn's algorithm; returns false if there is a cycle.
    fn compute_topological_order(&mut self) -> bool {
        let mut in_degree: HashMap<SignedVariable, usize> = HashMap::default();
        for (node, successors) in &self.arcs {
            let _ = in_degree.entry(*node).or_default();
            for (successor, _) in successors {
                *in_degree.entry(*successor).or_default() += 1;
            }
        }

        let mut sources = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(node, _)| *node)
            .collect::<Vec<_>>();
        sources.sort();
        let mut queue = VecDeque::from(sources);

        self.topological_order.clear();
        while let Some(node) = queue.pop_front() {
            self.topological_order.push(node);
            for (successor, _) in self.arcs.get(&node).into_iter().flatten() {
                let degree = in_degree.entry(*successor).or_default();
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(*successor);
                }
            }
        }

        self.topological_order.len() == in_degree.len()
    }

    /// For every variable, collects which of `vars` precede it and with which offset, by a single
    /// pass over the topological order.
    ///
    /// Only variables preceded by at least two of `vars` are reported; a single predecessor is
    /// already a relation in the cache. Nothing is reported if the graph has a cycle.
    pub fn compute_full_precedences(&self, vars: &[DomainId]) -> Vec<FullIntegerPrecedence> {
        if !self.is_dag {
            return vec![];
        }

        let targets: HashMap<SignedVariable, usize> = vars
            .iter()
            .enumerate()
            .map(|(index, var)| (SignedVariable::from(*var), index))
            .collect();

        let mut preceding: HashMap<SignedVariable, HashMap<usize, i64>> = HashMap::default();
        let mut precedences = vec![];

        for node in &self.topological_order {
            let predecessors = preceding.remove(node).unwrap_or_default();

            for (successor, offset) in self.arcs.get(node).into_iter().flatten() {
                let successor_predecessors = preceding.entry(*successor).or_default();
                let mut merge = |index: usize, offset: i64| {
                    let entry = successor_predecessors.entry(index).or_insert(offset);
                    *entry = (*entry).max(offset);
                };

                if let Some(index) = targets.get(node) {
                    merge(*index, *offset);
                }
                for (index, predecessor_offset) in &predecessors {
                    merge(*index, cap_add(*predecessor_offset, *offset));
                }
            }

            if !node.is_negated() && predecessors.len() >= 2 {
                let mut sorted = predecessors.into_iter().collect::<Vec<_>>();
                sorted.sort();
                precedences.push(FullIntegerPrecedence {
                    var: node.get_domain_id(),
                    indices: sorted.iter().map(|(index, _)| *index).collect(),
                    offsets: sorted.iter().map(|(_, offset)| *offset).collect(),
                });
            }
        }

        precedences
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear2::LinearExpression2;

    struct TestSetup {
        assignments: Assignments,
        indices: Linear2Indices,
        watcher: Linear2Watcher,
        root: RootLevelLinear2Bounds,
        evaluator: TransitivePrecedencesEvaluator,
    }

    impl TestSetup {
        fn new() -> Self {
            TestSetup {
                assignments: Assignments::default(),
                indices: Linear2Indices::default(),
                watcher: Linear2Watcher::default(),
                root: RootLevelLinear2Bounds::default(),
                evaluator: TransitivePrecedencesEvaluator::default(),
            }
        }

        /// Adds `before + offset <= after`.
        fn precedence(&mut self, before: DomainId, offset: i64, after: DomainId) {
            let index = self
                .indices
                .add_or_get(LinearExpression2::new(before, 1, after, -1));
            let _ = self.root.add_upper_bound(
                index,
                -offset,
                &self.indices,
                &self.assignments,
                &mut self.watcher,
            );
        }

        fn build(&mut self, options: Linear2Options) {
            self.evaluator.build(
                &mut self.root,
                &mut self.indices,
                &self.assignments,
                &mut self.watcher,
                &options,
            );
        }

        fn upper_bound(&self, expression: LinearExpression2) -> i64 {
            self.indices
                .get_index(expression)
                .map(|index| self.root.upper_bound(index))
                .unwrap_or(MAX_INTEGER_VALUE)
        }
    }

    #[test]
    fn chains_are_closed_transitively() {
        let mut setup = TestSetup::new();
        let a = setup.assignments.grow(0, 100);
        let b = setup.assignments.grow(0, 100);
        let c = setup.assignments.grow(0, 100);

        setup.precedence(a, 2, b);
        setup.precedence(b, 3, c);
        setup.build(Linear2Options::default());

        assert!(setup.evaluator.is_dag());
        assert_eq!(-5, setup.upper_bound(LinearExpression2::new(a, 1, c, -1)));
        assert_eq!(1, setup.evaluator.work_done());
        assert_eq!(1, setup.evaluator.num_augmented_relations());
    }

    #[test]
    fn augmentation_stops_at_the_work_limit() {
        let mut setup = TestSetup::new();
        let a = setup.assignments.grow(0, 100);
        let b = setup.assignments.grow(0, 100);
        let c = setup.assignments.grow(0, 100);
        let d = setup.assignments.grow(0, 100);

        setup.precedence(a, 2, b);
        setup.precedence(b, 3, c);
        setup.precedence(c, 4, d);
        setup.build(Linear2Options {
            augmentation_work_limit: 1,
            ..Default::default()
        });

        assert_eq!(1, setup.evaluator.work_done());
        assert_eq!(1, setup.evaluator.num_augmented_relations());
    }

    #[test]
    fn disabled_closure_only_orders() {
        let mut setup = TestSetup::new();
        let a = setup.assignments.grow(0, 100);
        let b = setup.assignments.grow(0, 100);
        let c = setup.assignments.grow(0, 100);

        setup.precedence(a, 2, b);
        setup.precedence(b, 3, c);
        setup.build(Linear2Options {
            transitive_closure: TransitiveClosure::Disabled,
            ..Default::default()
        });

        assert!(setup.evaluator.is_dag());
        assert_eq!(
            MAX_INTEGER_VALUE,
            setup.upper_bound(LinearExpression2::new(a, 1, c, -1))
        );
        let order = setup.evaluator.topological_order();
        let position = |var: DomainId| {
            order
                .iter()
                .position(|node| *node == SignedVariable::from(var))
        };
        assert!(position(a) < position(b));
        assert!(position(b) < position(c));
    }

    #[test]
    fn cycles_disable_the_analysis() {
        let mut setup = TestSetup::new();
        let a = setup.assignments.grow(0, 100);
        let b = setup.assignments.grow(0, 100);

        setup.precedence(a, 0, b);
        setup.precedence(b, 0, a);
        setup.build(Linear2Options::default());

        assert!(!setup.evaluator.is_dag());
        assert!(setup.evaluator.compute_full_precedences(&[a, b]).is_empty());
    }

    #[test]
    fn full_precedences_merge_paths() {
        let mut setup = TestSetup::new();
        let a = setup.assignments.grow(0, 100);
        let b = setup.assignments.grow(0, 100);
        let c = setup.assignments.grow(0, 100);
        let d = setup.assignments.grow(0, 100);

        setup.precedence(a, 2, c);
        setup.precedence(b, 4, c);
        setup.precedence(c, 1, d);
        setup.build(Linear2Options {
            transitive_closure: TransitiveClosure::Disabled,
            ..Default::default()
        });

        let precedences = setup.evaluator.compute_full_precedences(&[a, b]);
        assert_eq!(
            vec![
                FullIntegerPrecedence {
                    var: c,
                    indices: vec![0, 1],
                    offsets: vec![2, 4],
                },
                FullIntegerPrecedence {
                    var: d,
                    indices: vec![0, 1],
                    offsets: vec![3, 5],
                },
            ],
            precedences
        );
    }

    #[test]
    fn build_is_memoised_on_root_updates() {
        let mut setup = TestSetup::new();
        let a = setup.assignments.grow(0, 100);
        let b = setup.assignments.grow(0, 100);
        let c = setup.assignments.grow(0, 100);

        setup.precedence(a, 2, b);
        setup.build(Linear2Options::default());
        assert_eq!(2, setup.evaluator.topological_order().len() / 2);

        setup.precedence(b, 3, c);
        setup.build(Linear2Options::default());
        assert_eq!(-5, setup.upper_bound(LinearExpression2::new(a, 1, c, -1)));
    }
}
