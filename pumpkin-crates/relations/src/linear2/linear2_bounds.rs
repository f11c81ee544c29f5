use crate::basic_types::ConstraintOperationError;
use crate::basic_types::PropositionalConjunction;
use crate::create_statistics_struct;
use crate::engine::predicates::Predicate;
use crate::engine::predicates::PredicateConstructor;
use crate::engine::variables::AffineExpression;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::Literal;
use crate::engine::Assignments;
use crate::engine::PropagatorId;
use crate::linear2::BinaryRelationRepository;
use crate::linear2::EncodedBound;
use crate::linear2::EnforcedLinear2Bounds;
use crate::linear2::FullIntegerPrecedence;
use crate::linear2::Linear2BoundsFromLinear3;
use crate::linear2::Linear2Index;
use crate::linear2::Linear2Indices;
use crate::linear2::Linear2Options;
use crate::linear2::Linear2Reason;
use crate::linear2::Linear2Sharing;
use crate::linear2::Linear2Watcher;
use crate::linear2::LinearExpression2;
use crate::linear2::PrecedenceData;
use crate::linear2::ReifiedLinear2Bounds;
use crate::linear2::Relation;
use crate::linear2::RelationConflict;
use crate::linear2::RelationStatus;
use crate::linear2::RootLevelLinear2Bounds;
use crate::linear2::TransitivePrecedencesEvaluator;
use crate::math::cap_add;
use crate::math::cap_prod;
use crate::math::cap_sub;
use crate::math::ceil_ratio;
use crate::math::floor_ratio;
use crate::math::negate_bound;
use crate::math::MAX_INTEGER_VALUE;
use crate::math::MIN_INTEGER_VALUE;
use crate::pumpkin_assert_moderate;
use crate::pumpkin_assert_simple;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

create_statistics_struct!(
    /// Counters of the operations performed through the [`Linear2Bounds`].
    Linear2Statistics {
    /// The number of relations registered by the model.
    num_relations_added: usize,
    /// The number of relations with more than one enforcement literal, which are not cached.
    num_relations_ignored: usize,
    /// The number of equivalences between literals and bounds found when building.
    num_equivalences: usize,
    /// The number of pushed bounds which were enforced through an equivalent literal.
    num_literal_enqueues: usize,
    /// The number of pushed bounds which were enforced through an equivalent predicate.
    num_integer_literal_enqueues: usize,
    /// The number of pushed bounds which were enforced on the individual variables.
    num_split_enqueues: usize,
    /// The number of pushed bounds which were in conflict.
    num_conflicts: usize,
    /// The number of bounds promoted to the root by literals fixed at the root.
    num_root_promotions: usize,
    /// The number of bounds imported from other workers.
    num_shared_imports: usize,
});

/// The tightest known upper bounds on two-variable expressions, combining every source of bounds.
///
/// The bound of an expression is the minimum of:
/// * the bound implied by the current domains of its variables;
/// * the unconditional bound ([`RootLevelLinear2Bounds`]);
/// * the bound which holds under true enforcement literals ([`EnforcedLinear2Bounds`]);
/// * the bound derived from a linear constraint over three variables
///   ([`Linear2BoundsFromLinear3`]).
///
/// Expressions are compared up to scaling; the bound of `2x + 4y` is twice the bound of `x + 2y`.
#[derive(Debug, Default)]
pub struct Linear2Bounds {
    indices: Linear2Indices,
    watcher: Linear2Watcher,
    root: RootLevelLinear2Bounds,
    enforced: EnforcedLinear2Bounds,
    linear3: Linear2BoundsFromLinear3,
    repository: BinaryRelationRepository,
    reified: ReifiedLinear2Bounds,
    transitive: TransitivePrecedencesEvaluator,
    options: Linear2Options,
    /// The position on the trail up to which literals fixed at the root have been processed.
    root_trail_position: usize,
    statistics: Linear2Statistics,
}

impl Linear2Bounds {
    pub fn new(options: Linear2Options) -> Self {
        Linear2Bounds {
            options,
            ..Default::default()
        }
    }

    pub fn indices(&self) -> &Linear2Indices {
        &self.indices
    }

    pub fn root(&self) -> &RootLevelLinear2Bounds {
        &self.root
    }

    pub fn watcher(&self) -> &Linear2Watcher {
        &self.watcher
    }

    pub fn reified(&self) -> &ReifiedLinear2Bounds {
        &self.reified
    }

    /// Registers a propagator which is scheduled whenever any cached bound becomes tighter.
    pub fn watch_all_linear_expressions2(&mut self, propagator: PropagatorId) {
        self.watcher.watch_all_linear_expressions2(propagator);
    }

    /// Returns the propagators which were scheduled since the last call.
    pub fn drain_scheduled_propagators(&mut self) -> impl Iterator<Item = PropagatorId> + '_ {
        self.watcher.drain_scheduled()
    }

    /// Connects the root bounds to a store shared with other workers.
    pub fn set_sharing(&mut self, sharing: Linear2Sharing) {
        self.root.set_sharing(sharing);
    }

    /// Registers `enforcement => lhs <= expression <= rhs` while building the model.
    ///
    /// Without enforcement the relation is stored at the root, with one literal it is kept for
    /// [`Linear2Bounds::build`], and relations with more enforcement literals are not cached.
    pub fn add_relation(
        &mut self,
        enforcement: &[Literal],
        expression: LinearExpression2,
        lhs: i64,
        rhs: i64,
        assignments: &mut Assignments,
    ) -> Result<(), ConstraintOperationError> {
        pumpkin_assert_simple!(
            assignments.get_decision_level() == 0,
            "relations are registered at the root"
        );

        let (canonical, gcd) = expression.canonicalized();
        let lhs = ceil_ratio(lhs.max(MIN_INTEGER_VALUE), gcd);
        let rhs = floor_ratio(rhs.min(MAX_INTEGER_VALUE), gcd);

        match enforcement {
            [] => {
                self.statistics.num_relations_added += 1;
                self.add_root_relation(canonical, lhs, rhs, assignments)
            }
            [literal] => {
                self.statistics.num_relations_added += 1;
                if canonical.num_terms() == 2 {
                    let _ = self.indices.add_or_get(canonical);
                }
                if lhs > rhs {
                    // The literal implies an empty range, so it is false.
                    return assignments
                        .post_predicate(literal.get_false_predicate(), None)
                        .map(|_| ())
                        .map_err(|_| ConstraintOperationError::InfeasibleRelation);
                }
                self.repository.add(Relation {
                    enforcement: *literal,
                    expression: canonical,
                    lhs,
                    rhs,
                });
                Ok(())
            }
            _ => {
                self.statistics.num_relations_ignored += 1;
                log::debug!(
                    "not caching {lhs} <= {canonical} <= {rhs} with {} enforcement literals",
                    enforcement.len()
                );
                Ok(())
            }
        }
    }

    fn add_root_relation(
        &mut self,
        canonical: LinearExpression2,
        lhs: i64,
        rhs: i64,
        assignments: &mut Assignments,
    ) -> Result<(), ConstraintOperationError> {
        if lhs > rhs {
            return Err(ConstraintOperationError::InfeasibleRelation);
        }

        match canonical.num_terms() {
            0 if lhs <= 0 && 0 <= rhs => Ok(()),
            0 => Err(ConstraintOperationError::InfeasibleRelation),
            1 => {
                let term = AffineExpression::new(canonical.vars[0], canonical.coeffs[0], 0);
                for predicate in [
                    term.lower_bound_predicate(lhs),
                    term.upper_bound_predicate(rhs),
                ] {
                    let _ = assignments
                        .post_predicate(predicate, None)
                        .map_err(|_| ConstraintOperationError::InfeasibleRelation)?;
                }
                Ok(())
            }
            _ => {
                let status = self.root.get_level_zero_status(
                    canonical,
                    lhs,
                    rhs,
                    &self.indices,
                    assignments,
                );
                if status == RelationStatus::False {
                    return Err(ConstraintOperationError::InfeasibleRelation);
                }

                let index = self.indices.add_or_get(canonical);
                let _ = self.root.add_upper_bound(
                    index,
                    rhs,
                    &self.indices,
                    assignments,
                    &mut self.watcher,
                );
                let _ = self.root.add_upper_bound(
                    index.negated(),
                    negate_bound(lhs),
                    &self.indices,
                    assignments,
                    &mut self.watcher,
                );
                Ok(())
            }
        }
    }

    /// Registers `lhs <= coeffs[0] * vars[0] + coeffs[1] * vars[1] + coeffs[2] * vars[2] <= rhs`,
    /// from which bounds on the pairs of variables are derived.
    pub fn add_linear3(
        &mut self,
        vars: [DomainId; 3],
        coeffs: [i64; 3],
        lhs: i64,
        rhs: i64,
        assignments: &Assignments,
    ) {
        let is_exact = lhs == rhs;

        for third in 0..3 {
            let [first, second] = match third {
                0 => [1, 2],
                1 => [0, 2],
                _ => [0, 1],
            };
            let expression =
                LinearExpression2::new(vars[first], coeffs[first], vars[second], coeffs[second]);
            let (canonical, gcd) = expression.canonicalized();
            if canonical.num_terms() != 2
                || vars[third] == vars[first]
                || vars[third] == vars[second]
            {
                continue;
            }
            let index = self.indices.add_or_get(canonical);

            // gcd * canonical <= rhs - c_z * z and -gcd * canonical <= -lhs + c_z * z
            if rhs < MAX_INTEGER_VALUE {
                let affine = AffineExpression::new(vars[third], -coeffs[third], rhs);
                let _ = self.linear3.add_affine_upper_bound(
                    index,
                    affine,
                    gcd,
                    is_exact,
                    &self.indices,
                    assignments,
                    &mut self.watcher,
                );
            }
            if lhs > MIN_INTEGER_VALUE {
                let affine = AffineExpression::new(vars[third], coeffs[third], negate_bound(lhs));
                let _ = self.linear3.add_affine_upper_bound(
                    index.negated(),
                    affine,
                    gcd,
                    is_exact,
                    &self.indices,
                    assignments,
                    &mut self.watcher,
                );
            }
        }
    }

    /// Turns the registered half-reified relations into equivalences and applies the literals
    /// which are already fixed at the root. Returns the number of equivalences found.
    pub fn build(
        &mut self,
        assignments: &mut Assignments,
    ) -> Result<usize, ConstraintOperationError> {
        let num_equivalences = self.repository.build(&mut self.reified, &mut self.indices);
        self.statistics.num_equivalences += num_equivalences;

        self.root_trail_position = 0;
        self.propagate_root_level_fixings(assignments)?;

        Ok(num_equivalences)
    }

    /// Promotes the bounds implied by literals which became fixed at the root since the last call.
    pub fn propagate_root_level_fixings(
        &mut self,
        assignments: &mut Assignments,
    ) -> Result<(), ConstraintOperationError> {
        if assignments.get_decision_level() != 0 {
            return Ok(());
        }

        while self.root_trail_position < assignments.num_trail_entries() {
            let predicate = assignments
                .get_trail_entry(self.root_trail_position)
                .predicate;
            self.root_trail_position += 1;

            let Some(literal) = fixed_literal(predicate) else {
                continue;
            };

            let relations = self
                .repository
                .relations_enforced_by(literal)
                .copied()
                .collect::<Vec<_>>();
            for relation in relations {
                self.statistics.num_root_promotions += 1;
                self.add_root_relation(
                    relation.expression,
                    relation.lhs,
                    relation.rhs,
                    assignments,
                )
                    .map_err(|_| ConstraintOperationError::InfeasibleState)?;
            }

            for (index, upper_bound) in self.reified.relations_encoded_by(literal).to_vec() {
                if self.root.add_upper_bound(
                    index,
                    upper_bound,
                    &self.indices,
                    assignments,
                    &mut self.watcher,
                ) {
                    self.statistics.num_root_promotions += 1;
                }
            }

            for predicate in self.reified.predicates_encoded_by(literal).to_vec() {
                if assignments
                    .post_predicate(predicate, None)
                    .map_err(|_| ConstraintOperationError::InfeasibleState)?
                {
                    self.statistics.num_root_promotions += 1;
                }
            }
        }

        Ok(())
    }

    /// Imports the root bounds which other workers published since the last import; returns the
    /// number of bounds which were tighter than the local ones.
    pub fn import_shared_bounds(&mut self, assignments: &Assignments) -> usize {
        pumpkin_assert_simple!(assignments.get_decision_level() == 0);

        let Some(imported) = self.root_sharing().map(|sharing| sharing.import()) else {
            return 0;
        };

        let mut num_imported = 0;
        for (expression, upper_bound) in imported {
            let (canonical, gcd) = expression.canonicalized();
            if canonical.num_terms() != 2 {
                continue;
            }
            let index = self.indices.add_or_get(canonical);
            if self.root.add_upper_bound(
                index,
                floor_ratio(upper_bound, gcd),
                &self.indices,
                assignments,
                &mut self.watcher,
            ) {
                num_imported += 1;
            }
        }

        log::debug!("imported {num_imported} shared relation bounds");
        self.statistics.num_shared_imports += num_imported;
        num_imported
    }

    fn root_sharing(&self) -> Option<&Linear2Sharing> {
        self.root.sharing()
    }

    /// Records that `expression <= upper_bound` holds while all of `enforcement` is true; returns
    /// whether the bound was stored.
    pub fn push_conditional_relation(
        &mut self,
        enforcement: &[Literal],
        expression: LinearExpression2,
        upper_bound: i64,
        assignments: &Assignments,
    ) -> bool {
        let (canonical, gcd) = expression.canonicalized();
        if canonical.num_terms() != 2 {
            return false;
        }

        let index = self.indices.add_or_get(canonical);
        self.enforced.push_conditional_relation(
            enforcement,
            index,
            floor_ratio(upper_bound, gcd),
            &mut self.root,
            &self.indices,
            assignments,
            &mut self.watcher,
        )
    }

    /// Backtracks the conditional bounds to the provided decision level.
    pub fn set_level(&mut self, decision_level: usize) {
        self.enforced.set_level(decision_level);
    }

    /// The tightest known upper bound on `expression`.
    pub fn upper_bound(&self, expression: LinearExpression2, assignments: &Assignments) -> i64 {
        let (canonical, gcd) = expression.canonicalized();
        cap_prod(self.canonical_upper_bound(canonical, assignments), gcd)
    }

    /// The tightest known lower bound on `expression`.
    pub fn lower_bound(&self, expression: LinearExpression2, assignments: &Assignments) -> i64 {
        negate_bound(self.upper_bound(expression.negated(), assignments))
    }

    fn canonical_upper_bound(
        &self,
        canonical: LinearExpression2,
        assignments: &Assignments,
    ) -> i64 {
        let trail_bound = canonical.upper_bound(assignments);
        let Some(index) = self.get_index(canonical) else {
            return trail_bound;
        };

        trail_bound.min(self.cached_upper_bound(index, assignments))
    }

    fn get_index(&self, canonical: LinearExpression2) -> Option<Linear2Index> {
        if canonical.num_terms() != 2 {
            return None;
        }
        self.indices.get_index(canonical)
    }

    /// Whether `lower_bound <= expression <= upper_bound` holds or is violated at the root.
    pub fn get_level_zero_status(
        &self,
        expression: LinearExpression2,
        lower_bound: i64,
        upper_bound: i64,
        assignments: &Assignments,
    ) -> RelationStatus {
        self.root.get_level_zero_status(
            expression,
            lower_bound,
            upper_bound,
            &self.indices,
            assignments,
        )
    }

    /// Adds an explanation for `expression <= upper_bound` to `reason`.
    ///
    /// The first source whose bound alone suffices is used: the root (which needs no explanation),
    /// the conditional bounds, the linear3 derivations, and finally the domains of the variables.
    pub fn add_reason_for_upper_bound_lower_than(
        &self,
        expression: LinearExpression2,
        upper_bound: i64,
        reason: &mut Linear2Reason,
        assignments: &Assignments,
    ) {
        let (canonical, gcd) = expression.canonicalized();
        let upper_bound = floor_ratio(upper_bound, gcd);
        pumpkin_assert_moderate!(
            self.canonical_upper_bound(canonical, assignments) <= upper_bound,
            "{expression} <= {upper_bound} does not hold"
        );

        if let Some(index) = self.get_index(canonical) {
            if self.root.upper_bound(index) <= upper_bound {
                return;
            }
            if self.enforced.upper_bound(index) <= upper_bound {
                self.enforced
                    .add_reason_for_upper_bound_lower_than(index, upper_bound, reason);
                return;
            }
            if self.linear3.upper_bound(index, assignments) <= upper_bound {
                self.linear3
                    .add_reason_for_upper_bound_lower_than(index, upper_bound, reason);
                return;
            }
        }

        add_trail_reason(canonical, upper_bound, reason, assignments);
    }

    /// Enforces `expression <= upper_bound`, which is implied by the conjunction of
    /// `literal_reason` and `integer_reason`.
    ///
    /// The bound is enforced through an equivalent literal or predicate if one is known, and
    /// otherwise by tightening the bounds of the individual variables (after storing it at the
    /// root when at decision level zero).
    pub fn enqueue_lower_or_equal(
        &mut self,
        expression: LinearExpression2,
        upper_bound: i64,
        literal_reason: &[Literal],
        integer_reason: &[Predicate],
        assignments: &mut Assignments,
    ) -> Result<(), RelationConflict> {
        let (canonical, gcd) = expression.canonicalized();
        let upper_bound = floor_ratio(upper_bound, gcd);

        let mut reason = Linear2Reason::default();
        reason.literals.extend_from_slice(literal_reason);
        integer_reason
            .iter()
            .for_each(|predicate| reason.push_integer_literal(*predicate));

        if canonical.num_terms() == 0 {
            return if upper_bound >= 0 {
                Ok(())
            } else {
                Err(self.conflict(reason))
            };
        }

        if self.canonical_upper_bound(canonical, assignments) <= upper_bound {
            return Ok(());
        }

        let lower_bound =
            negate_bound(self.canonical_upper_bound(canonical.negated(), assignments));
        if lower_bound > upper_bound {
            // -expression <= -(upper_bound + 1) contradicts the pushed bound.
            self.add_reason_for_upper_bound_lower_than(
                canonical.negated(),
                negate_bound(cap_add(upper_bound, 1)),
                &mut reason,
                assignments,
            );
            return Err(self.conflict(reason));
        }

        match self.reified.get_encoded_bound(
            canonical,
            upper_bound,
            &self.root,
            &self.linear3,
            &self.indices,
            assignments,
        ) {
            EncodedBound::AlwaysTrue => Ok(()),
            EncodedBound::AlwaysFalse => Err(self.conflict(reason)),
            EncodedBound::Literal(literal) => {
                self.statistics.num_literal_enqueues += 1;
                self.post(literal.get_true_predicate(), reason, assignments)
            }
            EncodedBound::IntegerLiteral(predicate) => {
                self.statistics.num_integer_literal_enqueues += 1;
                self.post(predicate, reason, assignments)
            }
            EncodedBound::Nothing => {
                if assignments.get_decision_level() == 0 && canonical.num_terms() == 2 {
                    let index = self.indices.add_or_get(canonical);
                    let _ = self.root.add_upper_bound(
                        index,
                        upper_bound,
                        &self.indices,
                        assignments,
                        &mut self.watcher,
                    );
                }
                self.statistics.num_split_enqueues += 1;
                self.enqueue_on_variables(canonical, upper_bound, reason, assignments)
            }
        }
    }

    /// Tightens the bound of every variable of the expression using the lower bound of the other
    /// term.
    fn enqueue_on_variables(
        &mut self,
        canonical: LinearExpression2,
        upper_bound: i64,
        reason: Linear2Reason,
        assignments: &mut Assignments,
    ) -> Result<(), RelationConflict> {
        let terms =
            [0, 1].map(|i| AffineExpression::new(canonical.vars[i], canonical.coeffs[i], 0));

        for i in 0..canonical.num_terms() {
            let mut term_reason = reason.clone();
            let mut remaining = upper_bound;
            if let Some(other) = terms.get(1 - i).filter(|_| canonical.num_terms() == 2) {
                let other_lower_bound = other.lower_bound(assignments);
                remaining = cap_sub(upper_bound, other_lower_bound);
                term_reason.push_integer_literal(other.lower_bound_predicate(other_lower_bound));
            }

            let predicate = terms[i].upper_bound_predicate(remaining);
            self.post(predicate, term_reason, assignments)?;
        }

        Ok(())
    }

    fn post(
        &mut self,
        predicate: Predicate,
        mut reason: Linear2Reason,
        assignments: &mut Assignments,
    ) -> Result<(), RelationConflict> {
        if assignments.is_predicate_satisfied(predicate) {
            return Ok(());
        }

        let conjunction = PropositionalConjunction::from(reason.clone());
        match assignments.post_predicate(predicate, Some(conjunction)) {
            Ok(_) => Ok(()),
            Err(_) => {
                // The negation of the predicate holds.
                reason.push_integer_literal(!predicate);
                Err(self.conflict(reason))
            }
        }
    }

    fn conflict(&mut self, reason: Linear2Reason) -> RelationConflict {
        self.statistics.num_conflicts += 1;
        RelationConflict { reason }
    }

    /// All cached bounds on expressions over `var`, as `(expression, upper_bound)`.
    pub fn get_all_bounds_containing_variable(
        &self,
        var: DomainId,
        assignments: &Assignments,
    ) -> Vec<(LinearExpression2, i64)> {
        self.collect_bounds(self.indices.indices_containing(var), assignments)
    }

    /// All cached bounds on expressions over exactly `a` and `b`, as `(expression, upper_bound)`.
    pub fn get_all_bounds_containing_variables(
        &self,
        a: DomainId,
        b: DomainId,
        assignments: &Assignments,
    ) -> Vec<(LinearExpression2, i64)> {
        self.collect_bounds(self.indices.indices_between(a, b), assignments)
    }

    fn collect_bounds(
        &self,
        positive_indices: &[Linear2Index],
        assignments: &Assignments,
    ) -> Vec<(LinearExpression2, i64)> {
        positive_indices
            .iter()
            .flat_map(|index| [*index, index.negated()])
            .filter_map(|index| {
                let upper_bound = self.cached_upper_bound(index, assignments);
                (upper_bound < MAX_INTEGER_VALUE)
                    .then(|| (self.indices.get_expression(index), upper_bound))
            })
            .collect()
    }

    /// The tightest bound stored in one of the tiers, ignoring the domains of the variables.
    fn cached_upper_bound(&self, index: Linear2Index, assignments: &Assignments) -> i64 {
        self.root
            .upper_bound(index)
            .min(self.enforced.upper_bound(index))
            .min(self.linear3.upper_bound(index, assignments))
    }

    /// The conditional precedences `var + offset <= vars[index]` at the current decision level.
    pub fn collect_precedences(&self, vars: &[DomainId]) -> Vec<PrecedenceData> {
        self.enforced.collect_precedences(vars)
    }

    /// The upper bound on the expression identified by `index` from the conditional bounds only.
    pub fn get_upper_bound_from_enforced(&self, index: Linear2Index) -> i64 {
        self.enforced.upper_bound(index)
    }

    /// Computes, for every variable preceded by at least two of `vars` at the root, the offsets of
    /// those precedences.
    pub fn compute_full_precedences(
        &mut self,
        vars: &[DomainId],
        assignments: &Assignments,
    ) -> Vec<FullIntegerPrecedence> {
        self.transitive.build(
            &mut self.root,
            &mut self.indices,
            assignments,
            &mut self.watcher,
            &self.options,
        );
        self.transitive.compute_full_precedences(vars)
    }

    pub fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics
            .log(statistic_logger.attach_to_prefix("operations"));

        let tier_logger = statistic_logger.attach_to_prefix("tiers");
        self.root
            .num_updates()
            .log(tier_logger.attach_to_prefix("num_root_updates"));
        self.enforced
            .num_pushes()
            .log(tier_logger.attach_to_prefix("num_conditional_pushes"));
        self.linear3
            .num_updates()
            .log(tier_logger.attach_to_prefix("num_linear3_updates"));
        self.transitive
            .work_done()
            .log(tier_logger.attach_to_prefix("augmentation_work"));
        self.transitive
            .num_augmented_relations()
            .log(tier_logger.attach_to_prefix("num_augmented_relations"));
        self.indices
            .num_expressions()
            .log(statistic_logger.attach_to_prefix("num_expressions"));
    }
}

/// The literal made true by a predicate on the trail, if the predicate assigns a 0-1 domain.
fn fixed_literal(predicate: Predicate) -> Option<Literal> {
    let literal = Literal::new(predicate.get_domain());
    if predicate == literal.get_true_predicate() {
        Some(literal)
    } else if predicate == literal.get_false_predicate() {
        Some(!literal)
    } else {
        None
    }
}

/// Explains `canonical <= upper_bound` from the current bounds of its variables.
///
/// The slack between the bound and the expression's upper bound is used to relax the bounds in
/// the explanation; bounds which hold at the root are left out.
fn add_trail_reason(
    canonical: LinearExpression2,
    upper_bound: i64,
    reason: &mut Linear2Reason,
    assignments: &Assignments,
) {
    let mut slack = cap_sub(upper_bound, canonical.upper_bound(assignments));
    pumpkin_assert_simple!(slack >= 0);

    for i in 0..canonical.num_terms() {
        let term = AffineExpression::new(canonical.vars[i], canonical.coeffs[i], 0);
        let term_upper_bound = term.upper_bound(assignments);
        let predicate = term.upper_bound_predicate(cap_add(term_upper_bound, slack));

        let relaxed_upper_bound = cap_prod(canonical.coeffs[i], predicate.get_right_hand_side());
        slack = cap_sub(slack, cap_sub(relaxed_upper_bound, term_upper_bound)).max(0);

        if !assignments.is_predicate_satisfied_at_root(predicate) {
            reason.push_integer_literal(predicate);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;
    use std::sync::Mutex;

    use super::*;
    use crate::engine::State;
    use crate::linear2::SharedLinear2Bounds;
    use crate::linear2::VariableMapping;
    use crate::predicate;
    use crate::statistics::configure_statistic_logging;

    fn state_with_two_variables(lower_bound: i64, upper_bound: i64) -> (State, DomainId, DomainId) {
        let mut state = State::default();
        let x = state.new_bounded_integer(lower_bound, upper_bound);
        let y = state.new_bounded_integer(lower_bound, upper_bound);
        (state, x, y)
    }

    #[test]
    fn root_bounds_only_tighten() {
        let (mut state, x, y) = state_with_two_variables(0, 100);
        let x_plus_y = LinearExpression2::new(x, 1, y, 1);

        state
            .linear2_bounds
            .add_relation(&[], x_plus_y, MIN_INTEGER_VALUE, 10, &mut state.assignments)
            .expect("consistent");
        assert_eq!(10, state.linear2_bounds.upper_bound(x_plus_y, &state.assignments));

        assert!(state
            .linear2_bounds
            .push_conditional_relation(&[], x_plus_y, 7, &state.assignments));
        assert_eq!(7, state.linear2_bounds.upper_bound(x_plus_y, &state.assignments));

        assert!(!state
            .linear2_bounds
            .push_conditional_relation(&[], x_plus_y, 9, &state.assignments));
        assert_eq!(7, state.linear2_bounds.upper_bound(x_plus_y, &state.assignments));
    }

    #[test]
    fn conditional_bounds_are_undone_on_backtracking() {
        let (mut state, x, y) = state_with_two_variables(0, 100);
        let l = state.new_literal();
        let x_plus_y = LinearExpression2::new(x, 1, y, 1);
        assert!(state
            .linear2_bounds
            .push_conditional_relation(&[], x_plus_y, 7, &state.assignments));

        state.new_checkpoint();
        let _ = state.post(l.get_true_predicate()).expect("non-empty");
        assert!(state
            .linear2_bounds
            .push_conditional_relation(&[l], x_plus_y, 3, &state.assignments));
        assert_eq!(3, state.linear2_bounds.upper_bound(x_plus_y, &state.assignments));

        state.restore_to(0);

        assert_eq!(7, state.linear2_bounds.upper_bound(x_plus_y, &state.assignments));
    }

    #[test]
    fn complementary_relations_fixed_at_the_root_hold_at_the_root() {
        let mut state = State::default();
        let x = state.new_bounded_integer(0, 10);
        let l = state.new_literal();
        let just_x = LinearExpression2::single(x, 1);

        state
            .linear2_bounds
            .add_relation(&[l], just_x, MIN_INTEGER_VALUE, 5, &mut state.assignments)
            .expect("consistent");
        state
            .linear2_bounds
            .add_relation(&[!l], just_x, 8, MAX_INTEGER_VALUE, &mut state.assignments)
            .expect("consistent");
        assert_eq!(Ok(1), state.build_relations());
        assert_eq!(
            Some(l),
            state
                .linear2_bounds
                .reified()
                .get_literal_for_predicate(predicate!(x <= 5))
        );
        assert_eq!(
            RelationStatus::Unknown,
            state.linear2_bounds.get_level_zero_status(
                just_x,
                MIN_INTEGER_VALUE,
                5,
                &state.assignments
            )
        );

        let _ = state.post(l.get_true_predicate()).expect("non-empty");
        state.propagate_root_level_fixings().expect("consistent");

        assert_eq!(
            RelationStatus::True,
            state.linear2_bounds.get_level_zero_status(
                just_x,
                MIN_INTEGER_VALUE,
                5,
                &state.assignments
            )
        );
    }

    #[test]
    fn saturated_expressions_are_unbounded_instead_of_infeasible() {
        let (mut state, x, y) = state_with_two_variables(-(1 << 62), 1 << 62);
        let expression = LinearExpression2::new(x, 2, y, 3);

        assert_eq!(
            MAX_INTEGER_VALUE,
            state.linear2_bounds.upper_bound(expression, &state.assignments)
        );
        assert_eq!(
            MIN_INTEGER_VALUE,
            state.linear2_bounds.lower_bound(expression, &state.assignments)
        );
        assert_eq!(
            RelationStatus::Unknown,
            state
                .linear2_bounds
                .get_level_zero_status(expression, 0, 1 << 62, &state.assignments)
        );

        state
            .linear2_bounds
            .add_relation(&[], expression, -(1 << 61), 1 << 61, &mut state.assignments)
            .expect("consistent");

        assert_eq!(
            1 << 61,
            state.linear2_bounds.upper_bound(expression, &state.assignments)
        );
    }

    #[test]
    fn bounds_scale_with_the_coefficients() {
        let (mut state, x, y) = state_with_two_variables(0, 100);

        state
            .linear2_bounds
            .add_relation(
                &[],
                LinearExpression2::new(x, 2, y, 4),
                MIN_INTEGER_VALUE,
                21,
                &mut state.assignments,
            )
            .expect("consistent");

        assert_eq!(
            10,
            state
                .linear2_bounds
                .upper_bound(LinearExpression2::new(x, 1, y, 2), &state.assignments)
        );
        assert_eq!(
            20,
            state
                .linear2_bounds
                .upper_bound(LinearExpression2::new(x, 2, y, 4), &state.assignments)
        );
    }

    #[test]
    fn ranges_bound_both_orientations() {
        let (mut state, x, y) = state_with_two_variables(0, 100);
        let x_minus_y = LinearExpression2::new(x, 1, y, -1);

        state
            .linear2_bounds
            .add_relation(&[], x_minus_y, -5, 3, &mut state.assignments)
            .expect("consistent");

        assert_eq!(3, state.linear2_bounds.upper_bound(x_minus_y, &state.assignments));
        assert_eq!(-5, state.linear2_bounds.lower_bound(x_minus_y, &state.assignments));
        assert_eq!(
            5,
            state
                .linear2_bounds
                .upper_bound(LinearExpression2::new(y, 1, x, -1), &state.assignments)
        );
    }

    #[test]
    fn infeasible_relations_are_rejected() {
        let (mut state, x, y) = state_with_two_variables(0, 100);

        assert_eq!(
            Err(ConstraintOperationError::InfeasibleRelation),
            state.linear2_bounds.add_relation(
                &[],
                LinearExpression2::new(x, 1, y, 1),
                300,
                400,
                &mut state.assignments
            )
        );
        assert_eq!(
            Err(ConstraintOperationError::InfeasibleRelation),
            state.linear2_bounds.add_relation(
                &[],
                LinearExpression2::new(x, 0, y, 0),
                1,
                2,
                &mut state.assignments
            )
        );
    }

    #[test]
    fn a_literal_enforcing_an_empty_range_is_false() {
        let (mut state, x, y) = state_with_two_variables(0, 100);
        let l = state.new_literal();

        state
            .linear2_bounds
            .add_relation(
                &[l],
                LinearExpression2::new(x, 1, y, 1),
                5,
                3,
                &mut state.assignments,
            )
            .expect("consistent");

        assert!(state.assignments.is_literal_false(l));
    }

    #[test]
    fn relations_with_several_enforcement_literals_are_not_cached() {
        let (mut state, x, y) = state_with_two_variables(0, 100);
        let l1 = state.new_literal();
        let l2 = state.new_literal();
        let x_plus_y = LinearExpression2::new(x, 1, y, 1);

        state
            .linear2_bounds
            .add_relation(&[l1, l2], x_plus_y, MIN_INTEGER_VALUE, 3, &mut state.assignments)
            .expect("consistent");
        assert_eq!(Ok(0), state.build_relations());

        assert_eq!(200, state.linear2_bounds.upper_bound(x_plus_y, &state.assignments));
    }

    #[test]
    fn linear3_bounds_follow_the_third_variable() {
        let mut state = State::default();
        let x = state.new_bounded_integer(0, 10);
        let y = state.new_bounded_integer(0, 10);
        let z = state.new_bounded_integer(0, 10);
        let x_plus_y = LinearExpression2::new(x, 1, y, 1);
        state
            .linear2_bounds
            .add_linear3([x, y, z], [1, 1, 1], 10, 10, &state.assignments);
        assert_eq!(10, state.linear2_bounds.upper_bound(x_plus_y, &state.assignments));

        state.new_checkpoint();
        let _ = state.post(predicate!(z >= 4)).expect("non-empty");
        assert_eq!(6, state.linear2_bounds.upper_bound(x_plus_y, &state.assignments));

        let mut reason = Linear2Reason::default();
        state.linear2_bounds.add_reason_for_upper_bound_lower_than(
            x_plus_y,
            6,
            &mut reason,
            &state.assignments,
        );
        assert_eq!(vec![predicate!(z >= 4)], reason.integer_literals);
        assert!(reason.literals.is_empty());
    }

    #[test]
    fn exact_linear3_bounds_are_enforced_on_the_third_variable() {
        let mut state = State::default();
        let x = state.new_bounded_integer(0, 10);
        let y = state.new_bounded_integer(0, 10);
        let z = state.new_bounded_integer(0, 10);
        state
            .linear2_bounds
            .add_linear3([x, y, z], [1, 1, 1], 10, 10, &state.assignments);

        state.new_checkpoint();
        state
            .linear2_bounds
            .enqueue_lower_or_equal(
                LinearExpression2::new(x, 1, y, 1),
                5,
                &[],
                &[],
                &mut state.assignments,
            )
            .expect("no conflict");

        assert_eq!(5, state.assignments.get_lower_bound(z));
    }

    #[test]
    fn the_root_needs_no_explanation_and_conditional_bounds_explain_with_literals() {
        let (mut state, x, y) = state_with_two_variables(0, 10);
        let l = state.new_literal();
        let x_minus_y = LinearExpression2::new(x, 1, y, -1);
        state
            .linear2_bounds
            .add_relation(&[], x_minus_y, MIN_INTEGER_VALUE, 0, &mut state.assignments)
            .expect("consistent");

        state.new_checkpoint();
        let _ = state.post(l.get_true_predicate()).expect("non-empty");
        assert!(state
            .linear2_bounds
            .push_conditional_relation(&[l], x_minus_y, -3, &state.assignments));

        let mut reason = Linear2Reason::default();
        state.linear2_bounds.add_reason_for_upper_bound_lower_than(
            x_minus_y,
            0,
            &mut reason,
            &state.assignments,
        );
        assert!(reason.is_empty());

        state.linear2_bounds.add_reason_for_upper_bound_lower_than(
            x_minus_y,
            -3,
            &mut reason,
            &state.assignments,
        );
        assert_eq!(vec![l], reason.literals);
        assert!(reason.is_satisfied(&state.assignments));
    }

    #[test]
    fn domain_explanations_are_relaxed_by_the_slack() {
        let (mut state, x, y) = state_with_two_variables(0, 10);
        state.new_checkpoint();
        let _ = state.post(predicate!(x <= 4)).expect("non-empty");
        let _ = state.post(predicate!(y <= 3)).expect("non-empty");

        let mut reason = Linear2Reason::default();
        state.linear2_bounds.add_reason_for_upper_bound_lower_than(
            LinearExpression2::new(x, 1, y, 1),
            8,
            &mut reason,
            &state.assignments,
        );

        assert_eq!(vec![predicate!(x <= 5), predicate!(y <= 3)], reason.integer_literals);
        assert!(reason.is_satisfied(&state.assignments));
    }

    #[test]
    fn unencoded_bounds_are_enforced_on_the_variables() {
        let (mut state, x, y) = state_with_two_variables(0, 10);
        let l = state.new_literal();
        state.new_checkpoint();
        let _ = state.post(l.get_true_predicate()).expect("non-empty");
        let _ = state.post(predicate!(x >= 3)).expect("non-empty");

        state
            .linear2_bounds
            .enqueue_lower_or_equal(
                LinearExpression2::new(x, 1, y, 1),
                5,
                &[l],
                &[],
                &mut state.assignments,
            )
            .expect("no conflict");

        assert_eq!(5, state.assignments.get_upper_bound(x));
        assert_eq!(2, state.assignments.get_upper_bound(y));

        let reason = state
            .assignments
            .get_reason(predicate!(y <= 2))
            .expect("propagated");
        assert!(reason.contains(&l.get_true_predicate()));
        assert!(reason.contains(&predicate!(x >= 3)));
    }

    #[test]
    fn unencoded_bounds_at_the_root_are_stored() {
        let (mut state, x, y) = state_with_two_variables(0, 10);
        let x_plus_y = LinearExpression2::new(x, 1, y, 1);

        state
            .linear2_bounds
            .enqueue_lower_or_equal(x_plus_y, 5, &[], &[], &mut state.assignments)
            .expect("no conflict");

        assert_eq!(
            RelationStatus::True,
            state.linear2_bounds.get_level_zero_status(
                x_plus_y,
                MIN_INTEGER_VALUE,
                5,
                &state.assignments
            )
        );
    }

    #[test]
    fn conflicts_are_explained_by_facts_which_hold() {
        let (mut state, x, y) = state_with_two_variables(0, 10);
        let l = state.new_literal();
        state.new_checkpoint();
        let _ = state.post(l.get_true_predicate()).expect("non-empty");
        let _ = state.post(predicate!(x >= 6)).expect("non-empty");
        let _ = state.post(predicate!(y >= 6)).expect("non-empty");

        let conflict = state
            .linear2_bounds
            .enqueue_lower_or_equal(
                LinearExpression2::new(x, 1, y, 1),
                10,
                &[l],
                &[],
                &mut state.assignments,
            )
            .expect_err("x + y is at least 12");

        assert_eq!(vec![l], conflict.reason.literals);
        assert_eq!(
            vec![predicate!(x >= 5), predicate!(y >= 6)],
            conflict.reason.integer_literals
        );
        assert!(conflict.reason.is_satisfied(&state.assignments));
    }

    #[test]
    fn equivalent_literals_are_set_by_enqueues() {
        let (mut state, x, y) = state_with_two_variables(0, 10);
        let l = state.new_literal();
        let x_minus_y = LinearExpression2::new(x, 1, y, -1);
        state
            .linear2_bounds
            .add_relation(&[l], x_minus_y, MIN_INTEGER_VALUE, 0, &mut state.assignments)
            .expect("consistent");
        state
            .linear2_bounds
            .add_relation(&[!l], x_minus_y, 1, MAX_INTEGER_VALUE, &mut state.assignments)
            .expect("consistent");
        assert_eq!(Ok(1), state.build_relations());

        state.new_checkpoint();
        state
            .linear2_bounds
            .enqueue_lower_or_equal(x_minus_y, 0, &[], &[], &mut state.assignments)
            .expect("no conflict");
        assert!(state.assignments.is_literal_true(l));

        state.restore_to(0);
        state.new_checkpoint();
        let _ = state.post(l.get_false_predicate()).expect("non-empty");
        let conflict = state
            .linear2_bounds
            .enqueue_lower_or_equal(x_minus_y, 0, &[], &[], &mut state.assignments)
            .expect_err("the equivalent literal is false");
        assert_eq!(vec![l.get_false_predicate()], conflict.reason.integer_literals);
    }

    #[test]
    fn literals_fixed_at_the_root_promote_their_relations() {
        let (mut state, x, y) = state_with_two_variables(0, 10);
        let l = state.new_literal();
        let x_minus_y = LinearExpression2::new(x, 1, y, -1);
        state
            .linear2_bounds
            .add_relation(&[l], x_minus_y, MIN_INTEGER_VALUE, 0, &mut state.assignments)
            .expect("consistent");
        state
            .linear2_bounds
            .add_relation(&[!l], x_minus_y, 1, MAX_INTEGER_VALUE, &mut state.assignments)
            .expect("consistent");
        assert_eq!(Ok(1), state.build_relations());

        let _ = state.post(l.get_false_predicate()).expect("non-empty");
        state.propagate_root_level_fixings().expect("consistent");

        assert_eq!(
            -1,
            state
                .linear2_bounds
                .upper_bound(LinearExpression2::new(y, 1, x, -1), &state.assignments)
        );
    }

    #[test]
    fn cached_bounds_are_listed_per_variable() {
        let mut state = State::default();
        let x = state.new_bounded_integer(0, 100);
        let y = state.new_bounded_integer(0, 100);
        let z = state.new_bounded_integer(0, 100);
        state
            .linear2_bounds
            .add_relation(
                &[],
                LinearExpression2::new(x, 1, y, 1),
                MIN_INTEGER_VALUE,
                10,
                &mut state.assignments,
            )
            .expect("consistent");
        state
            .linear2_bounds
            .add_relation(
                &[],
                LinearExpression2::new(y, 1, z, -1),
                MIN_INTEGER_VALUE,
                2,
                &mut state.assignments,
            )
            .expect("consistent");

        assert_eq!(
            vec![(LinearExpression2::new(x, 1, y, 1), 10)],
            state
                .linear2_bounds
                .get_all_bounds_containing_variable(x, &state.assignments)
        );
        assert_eq!(
            2,
            state
                .linear2_bounds
                .get_all_bounds_containing_variable(y, &state.assignments)
                .len()
        );
        assert!(state
            .linear2_bounds
            .get_all_bounds_containing_variables(x, z, &state.assignments)
            .is_empty());
    }

    #[test]
    fn full_precedences_are_computed_from_root_relations() {
        let mut state = State::default();
        let a = state.new_bounded_integer(0, 100);
        let b = state.new_bounded_integer(0, 100);
        let c = state.new_bounded_integer(0, 100);
        for (var, offset) in [(a, 2), (b, 4)] {
            // var + offset <= c
            state
                .linear2_bounds
                .add_relation(
                    &[],
                    LinearExpression2::new(var, 1, c, -1),
                    MIN_INTEGER_VALUE,
                    -offset,
                    &mut state.assignments,
                )
                .expect("consistent");
        }

        let precedences = state
            .linear2_bounds
            .compute_full_precedences(&[a, b], &state.assignments);

        assert_eq!(1, precedences.len());
        assert_eq!(c, precedences[0].var);
        assert_eq!(vec![0, 1], precedences[0].indices);
        assert_eq!(vec![2, 4], precedences[0].offsets);
    }

    #[test]
    fn watching_propagators_are_scheduled_on_tightening() {
        let (mut state, x, y) = state_with_two_variables(0, 100);
        state
            .linear2_bounds
            .watch_all_linear_expressions2(PropagatorId(3));

        assert!(state.linear2_bounds.push_conditional_relation(
            &[],
            LinearExpression2::new(x, 1, y, 1),
            50,
            &state.assignments
        ));

        assert_eq!(
            vec![PropagatorId(3)],
            state
                .linear2_bounds
                .drain_scheduled_propagators()
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn root_bounds_are_shared_between_workers() {
        let shared = Arc::new(SharedLinear2Bounds::default());
        let mut workers = vec![];
        for worker_id in 0..2 {
            let (mut state, x, y) = state_with_two_variables(0, 100);
            let mut mapping = VariableMapping::default();
            mapping.add(x, 0);
            mapping.add(y, 1);
            state
                .linear2_bounds
                .set_sharing(Linear2Sharing::new(Arc::clone(&shared), worker_id, mapping));
            workers.push((state, x, y));
        }

        let (first, x, y) = &mut workers[0];
        first
            .linear2_bounds
            .add_relation(
                &[],
                LinearExpression2::new(*x, 1, *y, -1),
                -4,
                7,
                &mut first.assignments,
            )
            .expect("consistent");

        let (second, x, y) = &mut workers[1];
        assert_eq!(2, second.linear2_bounds.import_shared_bounds(&second.assignments));
        assert_eq!(2, second.linear2_bounds.statistics.num_shared_imports);
        assert_eq!(0, second.linear2_bounds.import_shared_bounds(&second.assignments));
        let x_minus_y = LinearExpression2::new(*x, 1, *y, -1);
        assert_eq!(7, second.linear2_bounds.upper_bound(x_minus_y, &second.assignments));
        assert_eq!(-4, second.linear2_bounds.lower_bound(x_minus_y, &second.assignments));
    }

    #[test]
    fn expressions_over_one_variable_are_not_indexed() {
        let (mut state, x, _) = state_with_two_variables(0, 10);
        let l = state.new_literal();
        let just_x = LinearExpression2::single(x, 1);

        state.new_checkpoint();
        let _ = state.post(l.get_true_predicate()).expect("non-empty");
        assert!(!state
            .linear2_bounds
            .push_conditional_relation(&[l], just_x, 4, &state.assignments));
        assert_eq!(10, state.linear2_bounds.upper_bound(just_x, &state.assignments));
        assert_eq!(None, state.linear2_bounds.indices().get_index(just_x));
        assert_eq!(0, state.linear2_bounds.indices().num_expressions());
    }

    #[test]
    fn enforced_bounds_are_read_without_the_other_tiers() {
        let (mut state, x, y) = state_with_two_variables(0, 10);
        let l = state.new_literal();
        let x_minus_y = LinearExpression2::new(x, 1, y, -1);
        state
            .linear2_bounds
            .add_relation(&[], x_minus_y, MIN_INTEGER_VALUE, 5, &mut state.assignments)
            .expect("consistent");
        let index = state
            .linear2_bounds
            .indices()
            .get_index(x_minus_y)
            .expect("indexed by the relation");
        assert_eq!(
            MAX_INTEGER_VALUE,
            state.linear2_bounds.get_upper_bound_from_enforced(index)
        );

        state.new_checkpoint();
        let _ = state.post(l.get_true_predicate()).expect("non-empty");
        assert!(state
            .linear2_bounds
            .push_conditional_relation(&[l], x_minus_y, -3, &state.assignments));
        assert_eq!(-3, state.linear2_bounds.get_upper_bound_from_enforced(index));
        assert_eq!(
            MAX_INTEGER_VALUE,
            state
                .linear2_bounds
                .get_upper_bound_from_enforced(index.negated())
        );

        state.restore_to(0);

        assert_eq!(
            MAX_INTEGER_VALUE,
            state.linear2_bounds.get_upper_bound_from_enforced(index)
        );
        assert_eq!(5, state.linear2_bounds.upper_bound(x_minus_y, &state.assignments));
    }

    /// Runs literal, split and conflicting enqueues followed by a promotion at the root.
    fn state_with_counted_operations() -> State {
        let (mut state, x, y) = state_with_two_variables(0, 10);
        let l = state.new_literal();
        let x_minus_y = LinearExpression2::new(x, 1, y, -1);
        let x_plus_y = LinearExpression2::new(x, 1, y, 1);
        state
            .linear2_bounds
            .add_relation(&[l], x_minus_y, MIN_INTEGER_VALUE, 0, &mut state.assignments)
            .expect("consistent");
        state
            .linear2_bounds
            .add_relation(&[!l], x_minus_y, 1, MAX_INTEGER_VALUE, &mut state.assignments)
            .expect("consistent");
        assert_eq!(Ok(1), state.build_relations());

        state.new_checkpoint();
        state
            .linear2_bounds
            .enqueue_lower_or_equal(x_minus_y, 0, &[], &[], &mut state.assignments)
            .expect("no conflict");
        let _ = state.post(predicate!(x >= 6)).expect("non-empty");
        let _ = state.post(predicate!(y >= 6)).expect("non-empty");
        state
            .linear2_bounds
            .enqueue_lower_or_equal(x_plus_y, 15, &[], &[], &mut state.assignments)
            .expect("no conflict");
        let _ = state
            .linear2_bounds
            .enqueue_lower_or_equal(x_plus_y, 10, &[], &[], &mut state.assignments)
            .expect_err("x + y is at least 12");

        state.restore_to(0);
        let _ = state.post(l.get_false_predicate()).expect("non-empty");
        state.propagate_root_level_fixings().expect("consistent");

        state
    }

    #[test]
    fn operations_are_counted() {
        let state = state_with_counted_operations();
        let statistics = state.linear2_bounds.statistics;

        assert_eq!(2, statistics.num_relations_added);
        assert_eq!(0, statistics.num_relations_ignored);
        assert_eq!(1, statistics.num_equivalences);
        assert_eq!(1, statistics.num_literal_enqueues);
        assert_eq!(0, statistics.num_integer_literal_enqueues);
        assert_eq!(1, statistics.num_split_enqueues);
        assert_eq!(1, statistics.num_conflicts);
        assert_eq!(1, statistics.num_root_promotions);
        assert_eq!(0, statistics.num_shared_imports);
    }

    #[derive(Clone, Default)]
    struct CapturedOutput(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedOutput {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("not poisoned").write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    // The only test which configures the statistic logging, since it can be configured once.
    #[test]
    fn statistics_are_written_with_their_prefix() {
        let output = CapturedOutput::default();
        configure_statistic_logging("%%", None, None, Some(Box::new(output.clone())));
        let state = state_with_counted_operations();

        state
            .linear2_bounds
            .log_statistics(StatisticLogger::new("linear2"));

        let written = String::from_utf8(output.0.lock().expect("not poisoned").clone())
            .expect("statistics are utf-8");
        let lines = written.lines().collect::<Vec<_>>();
        for expected in [
            "%% linear2_operations_num_conflicts=1",
            "%% linear2_operations_num_split_enqueues=1",
            "%% linear2_operations_num_root_promotions=1",
            "%% linear2_tiers_num_augmented_relations=0",
            "%% linear2_num_expressions=1",
        ] {
            assert!(lines.contains(&expected), "{expected} missing from {written}");
        }
    }
}
