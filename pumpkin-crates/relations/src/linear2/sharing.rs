use std::sync::Arc;
use std::sync::Mutex;

use crate::containers::HashMap;
use crate::engine::variables::DomainId;
use crate::linear2::LinearExpression2;
use crate::math::negate_bound;
use crate::math::MAX_INTEGER_VALUE;
use crate::math::MIN_INTEGER_VALUE;

/// Identifies a two-variable expression across workers, using the external ids of its variables.
///
/// The variables are ordered by external id and the first coefficient is positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SharedLinear2Key {
    pub external_ids: [usize; 2],
    pub coeffs: [i64; 2],
}

impl SharedLinear2Key {
    /// Creates the key for `coeffs[0] * ids[0] + coeffs[1] * ids[1] <= upper_bound`; returns the
    /// key together with the lower and upper bound on the keyed expression.
    pub fn from_upper_bound(
        mut external_ids: [usize; 2],
        mut coeffs: [i64; 2],
        upper_bound: i64,
    ) -> (SharedLinear2Key, i64, i64) {
        if external_ids[0] > external_ids[1] {
            external_ids.swap(0, 1);
            coeffs.swap(0, 1);
        }

        if coeffs[0] < 0 {
            let key = SharedLinear2Key {
                external_ids,
                coeffs: [-coeffs[0], -coeffs[1]],
            };
            (key, negate_bound(upper_bound), MAX_INTEGER_VALUE)
        } else {
            let key = SharedLinear2Key {
                external_ids,
                coeffs,
            };
            (key, MIN_INTEGER_VALUE, upper_bound)
        }
    }
}

/// A store of root-level bounds which is shared between several solver workers.
///
/// Bounds are merged by keeping the tightest lower and upper bound per key; every worker has an
/// import cursor so that it only receives bounds which changed since its last import.
#[derive(Debug, Default)]
pub struct SharedLinear2Bounds {
    inner: Mutex<SharedBoundsInner>,
}

#[derive(Debug, Default)]
struct SharedBoundsInner {
    bounds: HashMap<SharedLinear2Key, (i64, i64)>,
    /// The keys in the order in which they were tightened, along with the worker which did so.
    updates: Vec<(SharedLinear2Key, usize)>,
    import_cursors: HashMap<usize, usize>,
}

impl SharedLinear2Bounds {
    /// Merges the bounds `[lower_bound, upper_bound]` on the keyed expression into the store.
    pub fn add(&self, worker_id: usize, key: SharedLinear2Key, lower_bound: i64, upper_bound: i64) {
        let Ok(mut inner) = self.inner.lock() else {
            return;
        };

        let (current_lower_bound, current_upper_bound) = inner
            .bounds
            .get(&key)
            .copied()
            .unwrap_or((MIN_INTEGER_VALUE, MAX_INTEGER_VALUE));

        if lower_bound <= current_lower_bound && upper_bound >= current_upper_bound {
            return;
        }

        let merged = (
            lower_bound.max(current_lower_bound),
            upper_bound.min(current_upper_bound),
        );
        let _ = inner.bounds.insert(key, merged);
        inner.updates.push((key, worker_id));
    }

    /// Returns the current bounds on the keyed expression.
    pub fn get(&self, key: SharedLinear2Key) -> Option<(i64, i64)> {
        self.inner
            .lock()
            .ok()
            .and_then(|inner| inner.bounds.get(&key).copied())
    }

    /// Returns the bounds which were tightened by other workers since the last call with the same
    /// `worker_id`.
    pub fn new_bounds_for(&self, worker_id: usize) -> Vec<(SharedLinear2Key, i64, i64)> {
        let Ok(mut inner) = self.inner.lock() else {
            return vec![];
        };

        let start = inner.import_cursors.get(&worker_id).copied().unwrap_or(0);
        let end = inner.updates.len();
        let _ = inner.import_cursors.insert(worker_id, end);

        let mut keys = inner.updates[start..end]
            .iter()
            .filter(|(_, updater)| *updater != worker_id)
            .map(|(key, _)| *key)
            .collect::<Vec<_>>();
        keys.sort();
        keys.dedup();

        keys.into_iter()
            .filter_map(|key| {
                inner
                    .bounds
                    .get(&key)
                    .map(|(lower_bound, upper_bound)| (key, *lower_bound, *upper_bound))
            })
            .collect()
    }

    pub fn num_bounds(&self) -> usize {
        self.inner.lock().map(|inner| inner.bounds.len()).unwrap_or(0)
    }
}

/// Maps the domains of one worker to the ids which are shared between all workers.
#[derive(Clone, Debug, Default)]
pub struct VariableMapping {
    external_by_domain: HashMap<DomainId, usize>,
    domain_by_external: HashMap<usize, DomainId>,
}

impl VariableMapping {
    pub fn add(&mut self, domain_id: DomainId, external_id: usize) {
        let _ = self.external_by_domain.insert(domain_id, external_id);
        let _ = self.domain_by_external.insert(external_id, domain_id);
    }

    pub fn external_id(&self, domain_id: DomainId) -> Option<usize> {
        self.external_by_domain.get(&domain_id).copied()
    }

    pub fn domain_id(&self, external_id: usize) -> Option<DomainId> {
        self.domain_by_external.get(&external_id).copied()
    }
}

/// The connection of a single worker to a [`SharedLinear2Bounds`] store.
#[derive(Clone, Debug)]
pub struct Linear2Sharing {
    shared: Arc<SharedLinear2Bounds>,
    worker_id: usize,
    mapping: VariableMapping,
}

impl Linear2Sharing {
    pub fn new(
        shared: Arc<SharedLinear2Bounds>,
        worker_id: usize,
        mapping: VariableMapping,
    ) -> Self {
        Linear2Sharing {
            shared,
            worker_id,
            mapping,
        }
    }

    /// Publishes `expression <= upper_bound`; returns false if one of the variables has no
    /// external id, in which case nothing is published.
    pub(crate) fn export(&self, expression: &LinearExpression2, upper_bound: i64) -> bool {
        let (Some(id0), Some(id1)) = (
            self.mapping.external_id(expression.vars[0]),
            self.mapping.external_id(expression.vars[1]),
        ) else {
            return false;
        };

        let (key, lower_bound, upper_bound) =
            SharedLinear2Key::from_upper_bound([id0, id1], expression.coeffs, upper_bound);
        self.shared.add(self.worker_id, key, lower_bound, upper_bound);
        true
    }

    /// Returns the upper bounds, in terms of this worker's domains, which other workers published
    /// since the last import.
    pub(crate) fn import(&self) -> Vec<(LinearExpression2, i64)> {
        let mut imported = vec![];

        for (key, lower_bound, upper_bound) in self.shared.new_bounds_for(self.worker_id) {
            let (Some(var0), Some(var1)) = (
                self.mapping.domain_id(key.external_ids[0]),
                self.mapping.domain_id(key.external_ids[1]),
            ) else {
                continue;
            };

            let expression = LinearExpression2::new(var0, key.coeffs[0], var1, key.coeffs[1]);
            if upper_bound < MAX_INTEGER_VALUE {
                imported.push((expression, upper_bound));
            }
            if lower_bound > MIN_INTEGER_VALUE {
                imported.push((expression.negated(), negate_bound(lower_bound)));
            }
        }

        imported
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tightest_bounds_are_kept() {
        let shared = SharedLinear2Bounds::default();
        let (key, lower_bound, upper_bound) =
            SharedLinear2Key::from_upper_bound([3, 1], [1, 1], 10);

        shared.add(0, key, lower_bound, upper_bound);
        shared.add(1, key, lower_bound, 12);
        shared.add(1, key, 2, MAX_INTEGER_VALUE);

        assert_eq!(Some((2, 10)), shared.get(key));
        assert_eq!([1, 3], key.external_ids);
    }

    #[test]
    fn keys_have_a_positive_first_coefficient() {
        let (key, lower_bound, upper_bound) =
            SharedLinear2Key::from_upper_bound([1, 2], [-1, 2], 4);

        assert_eq!([1, -2], key.coeffs);
        assert_eq!(-4, lower_bound);
        assert_eq!(MAX_INTEGER_VALUE, upper_bound);
    }

    #[test]
    fn workers_do_not_import_their_own_bounds() {
        let shared = Arc::new(SharedLinear2Bounds::default());
        let (key, lower_bound, upper_bound) =
            SharedLinear2Key::from_upper_bound([1, 2], [1, 1], 10);

        shared.add(0, key, lower_bound, upper_bound);

        assert!(shared.new_bounds_for(0).is_empty());
        assert_eq!(vec![(key, lower_bound, upper_bound)], shared.new_bounds_for(1));
        assert!(shared.new_bounds_for(1).is_empty());
    }

    #[test]
    fn unmapped_variables_are_not_exported() {
        let shared = Arc::new(SharedLinear2Bounds::default());
        let x = DomainId::new(1);
        let y = DomainId::new(2);
        let mut mapping = VariableMapping::default();
        mapping.add(x, 7);

        let sharing = Linear2Sharing::new(Arc::clone(&shared), 0, mapping);

        assert!(!sharing.export(&LinearExpression2::new(x, 1, y, 1), 5));
        assert_eq!(0, shared.num_bounds());
    }

    #[test]
    fn imported_bounds_are_translated_to_local_domains() {
        let shared = Arc::new(SharedLinear2Bounds::default());

        let mut first_mapping = VariableMapping::default();
        first_mapping.add(DomainId::new(1), 10);
        first_mapping.add(DomainId::new(2), 20);
        let first = Linear2Sharing::new(Arc::clone(&shared), 0, first_mapping);

        let mut second_mapping = VariableMapping::default();
        second_mapping.add(DomainId::new(5), 20);
        second_mapping.add(DomainId::new(6), 10);
        let second = Linear2Sharing::new(Arc::clone(&shared), 1, second_mapping);

        let x = DomainId::new(1);
        let y = DomainId::new(2);
        assert!(first.export(&LinearExpression2::new(x, 1, y, -1), 3));

        let imported = second.import();
        assert_eq!(
            vec![(
                LinearExpression2::new(DomainId::new(6), 1, DomainId::new(5), -1),
                3
            )],
            imported
        );
    }
}
