use crate::containers::HashSet;
use crate::containers::KeyedVec;
use crate::engine::variables::DomainId;
use crate::engine::PropagatorId;
use crate::linear2::LinearExpression2;

/// Notifies interested propagators whenever the cached bound of any two-variable expression
/// becomes tighter.
///
/// Besides scheduling propagators, it maintains a global timestamp and a timestamp per variable so
/// that consumers can cheaply check whether anything changed since they last looked.
#[derive(Clone, Debug, Default)]
pub struct Linear2Watcher {
    timestamp: u64,
    var_timestamps: KeyedVec<DomainId, u64>,
    watchers: Vec<PropagatorId>,
    scheduled: Vec<PropagatorId>,
    is_scheduled: HashSet<PropagatorId>,
}

impl Linear2Watcher {
    /// Registers a propagator which is scheduled on every tightening of any expression.
    pub fn watch_all_linear_expressions2(&mut self, propagator: PropagatorId) {
        if !self.watchers.contains(&propagator) {
            self.watchers.push(propagator);
        }
    }

    /// Signals that the bound of `expression` became tighter.
    pub fn notify_bound_changed(&mut self, expression: &LinearExpression2) {
        self.timestamp += 1;

        for (var, coeff) in expression.vars.iter().zip(expression.coeffs) {
            if coeff == 0 {
                continue;
            }
            self.var_timestamps.accomodate(*var, 0);
            self.var_timestamps[*var] += 1;
        }

        for &propagator in &self.watchers {
            if self.is_scheduled.insert(propagator) {
                self.scheduled.push(propagator);
            }
        }
    }

    /// The number of tightenings which have been signalled so far.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// The number of tightenings of expressions involving `var` which have been signalled so far.
    pub fn var_timestamp(&self, var: DomainId) -> u64 {
        self.var_timestamps.get(var).copied().unwrap_or(0)
    }

    /// Returns the propagators which were scheduled since the last call, each exactly once.
    pub fn drain_scheduled(&mut self) -> impl Iterator<Item = PropagatorId> + '_ {
        self.is_scheduled.clear();
        self.scheduled.drain(..)
    }
}
