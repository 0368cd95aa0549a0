use std::cmp::Reverse;

use log::debug;
use log::trace;
use log::warn;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::query;
use super::AnalysisStatistics;
use super::CoreDeadResult;
use super::Query;
use crate::basic_types::AnalysisError;
use crate::basic_types::Configuration;
use crate::basic_types::Literal;
use crate::basic_types::Variable;
use crate::containers::KeyedVec;
use crate::graph::ModalImplicationGraph;
use crate::oracle::DecisionPerturbation;
use crate::oracle::SatisfiabilityOracle;
use crate::oracle::SelectionStrategy;
use crate::oracle::ShuffleDecisionOrder;
use crate::termination::Indefinite;
use crate::termination::TerminationCondition;
use crate::traversal::CollectingVisitor;
use crate::traversal::Conflict;
use crate::traversal::TraversalOutcome;
use crate::traversal::Traverser;

/// Options of a [`CoreDeadAnalysis`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreDeadOptions {
    /// The seed of the random generator used to perturb the oracle.
    pub seed: u64,
    /// Variables to probe first, highest priority first. Candidates which are not listed are
    /// probed last.
    pub priority: Option<Vec<Variable>>,
    /// The variables the caller is interested in; only these are probed and reported. [`None`]
    /// means all variables.
    pub variables_of_interest: Option<Vec<Variable>>,
}

impl Default for CoreDeadOptions {
    fn default() -> Self {
        CoreDeadOptions {
            seed: 42,
            priority: None,
            variables_of_interest: None,
        }
    }
}

/// Determines which variables are forced under a set of assumptions, using the graph to keep
/// the number of oracle queries low.
///
/// A run first propagates the assumptions and the core/dead literals of the graph. The literals
/// the graph cannot decide become candidates; two solutions as different as possible filter
/// them, after which every remaining candidate is probed by asking the oracle for a solution
/// with its negation. A forced candidate is propagated through the graph, which can settle
/// further candidates without a query; every other solution rules out the candidates it
/// falsifies.
///
/// The result is complete, i.e. it contains every forced literal, if the core and dead flags of
/// the graph are complete (see
/// [`MigBuilder::build_with_oracle`](crate::graph::MigBuilder::build_with_oracle)) and no probe
/// timed out.
///
/// # Example
/// ```rust
/// # use mig_core::analysis::CoreDeadAnalysis;
/// # use mig_core::graph::MigBuilder;
/// # use mig_core::oracle::DpllOracle;
/// # use mig_core::Formula;
/// # use mig_core::Literal;
/// let formula = Formula::from_dimacs(3, &[&[-1, 2], &[-2, 3], &[1, 2, 3]]);
/// let mig = MigBuilder::new(&formula).build().unwrap();
/// let mut oracle = DpllOracle::new(&formula);
///
/// let result = CoreDeadAnalysis::new(&mig)
///     .run(&mut oracle, &[Literal::from_dimacs(1)])
///     .unwrap();
///
/// assert!(result.is_forced(Literal::from_dimacs(3)));
/// ```
#[derive(Debug, Clone)]
pub struct CoreDeadAnalysis<'mig, Perturbation = ShuffleDecisionOrder> {
    mig: &'mig ModalImplicationGraph,
    options: CoreDeadOptions,
    perturbation: Perturbation,
}

impl<'mig> CoreDeadAnalysis<'mig> {
    pub fn new(mig: &'mig ModalImplicationGraph) -> CoreDeadAnalysis<'mig> {
        CoreDeadAnalysis {
            mig,
            options: CoreDeadOptions::default(),
            perturbation: ShuffleDecisionOrder,
        }
    }
}

impl<'mig, Perturbation: DecisionPerturbation> CoreDeadAnalysis<'mig, Perturbation> {
    pub fn with_options(mut self, options: CoreDeadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.options.seed = seed;
        self
    }

    pub fn with_priority(mut self, priority: Vec<Variable>) -> Self {
        self.options.priority = Some(priority);
        self
    }

    pub fn with_variables_of_interest(mut self, variables: Vec<Variable>) -> Self {
        self.options.variables_of_interest = Some(variables);
        self
    }

    /// Replaces the way the oracle is perturbed after a satisfiable probe.
    pub fn with_perturbation<Other: DecisionPerturbation>(
        self,
        perturbation: Other,
    ) -> CoreDeadAnalysis<'mig, Other> {
        CoreDeadAnalysis {
            mig: self.mig,
            options: self.options,
            perturbation,
        }
    }

    pub fn options(&self) -> &CoreDeadOptions {
        &self.options
    }

    pub fn mig(&self) -> &'mig ModalImplicationGraph {
        self.mig
    }

    /// Runs the analysis until every candidate has been decided.
    pub fn run<O: SatisfiabilityOracle>(
        &mut self,
        oracle: &mut O,
        assumptions: &[Literal],
    ) -> Result<CoreDeadResult, AnalysisError> {
        self.run_with_termination(oracle, assumptions, &mut Indefinite)
    }

    /// Runs the analysis, polling `termination` before every probe.
    ///
    /// The oracle must have been created for the formula of the graph. Its assumption stack is
    /// restored before returning. Assumptions and options may only refer to variables of the
    /// graph, otherwise [`AnalysisError::UnknownVariable`] is returned.
    pub fn run_with_termination<O: SatisfiabilityOracle>(
        &mut self,
        oracle: &mut O,
        assumptions: &[Literal],
        termination: &mut impl TerminationCondition,
    ) -> Result<CoreDeadResult, AnalysisError> {
        if oracle.num_variables() != self.mig.num_variables() {
            return Err(AnalysisError::VariableMismatch {
                oracle: oracle.num_variables(),
                graph: self.mig.num_variables(),
            });
        }
        if let Some(variable) = self.find_unknown_variable(assumptions) {
            return Err(AnalysisError::UnknownVariable(variable));
        }

        let base = oracle.assumptions().len();
        let outcome = self.refine(oracle, base, assumptions, termination);
        oracle.truncate(base);

        if let Ok(result) = &outcome {
            debug!(
                "{} literals forced, {} undetermined, interrupted: {}",
                result.forced.len(),
                result.undetermined.len(),
                result.interrupted
            );
            result.statistics.log_statistics("analysis");
        }
        outcome
    }

    fn refine<O: SatisfiabilityOracle>(
        &mut self,
        oracle: &mut O,
        base: usize,
        assumptions: &[Literal],
        termination: &mut impl TerminationCondition,
    ) -> Result<CoreDeadResult, AnalysisError> {
        let mig = self.mig;
        let mut statistics = AnalysisStatistics::default();
        let mut random = SmallRng::seed_from_u64(self.options.seed);
        let is_of_interest = self.variables_of_interest();

        let mut configuration = Configuration::new(mig.num_variables());
        let mut traverser = Traverser::new(mig);
        let mut collector = CollectingVisitor::new();

        let seeds: Vec<Literal> = mig
            .core_dead_literals()
            .chain(assumptions.iter().copied())
            .collect();
        let mut is_seed: KeyedVec<Literal, bool> = KeyedVec::filled(mig.num_vertices(), false);
        for &seed in &seeds {
            is_seed[seed] = true;
        }

        match traverser.propagate(&mut configuration, &mut collector, &seeds) {
            TraversalOutcome::Fixpoint => {}
            TraversalOutcome::Conflict(conflict) => {
                debug!("the seeds are contradictory: {conflict:?}");
                let literal = match conflict {
                    Conflict::Assignment(literal) => Some(literal),
                    Conflict::Clause(_) => None,
                };
                return Err(AnalysisError::Contradiction { literal });
            }
            TraversalOutcome::Cancelled => unreachable!("the collecting visitor never cancels"),
        }
        statistics.num_forced_by_propagation += collector
            .computed()
            .iter()
            .filter(|&&literal| !is_seed[literal])
            .count() as u64;

        let mut candidates: Vec<Literal> = collector
            .to_compute()
            .iter()
            .copied()
            .filter(|literal| {
                is_of_interest[literal.variable()] && !configuration.is_assigned(literal.variable())
            })
            .collect();
        self.sort_by_priority(&mut candidates);
        debug!(
            "{} seeds, {} literals known, {} candidates",
            seeds.len(),
            configuration.num_assigned(),
            candidates.len()
        );

        for literal in configuration.assigned_literals() {
            oracle.push(literal);
        }

        oracle.set_selection_strategy(SelectionStrategy::Positive);
        let first_solution = match query(oracle, &mut statistics) {
            Query::Model(solution) => solution,
            Query::Unsatisfiable => return Err(AnalysisError::Contradiction { literal: None }),
            Query::Timeout => {
                warn!("the oracle timed out on the initial query");
                let mut undetermined: Vec<Variable> =
                    candidates.iter().map(|literal| literal.variable()).collect();
                undetermined.sort();
                undetermined.dedup();
                return Ok(self.finish(oracle, base, undetermined, false, statistics));
            }
        };

        if !candidates.is_empty() {
            oracle.set_selection_strategy(SelectionStrategy::InverseOf(first_solution.clone()));
            let second_solution = match query(oracle, &mut statistics) {
                Query::Model(solution) => Some(solution),
                Query::Unsatisfiable | Query::Timeout => None,
            };
            oracle.set_selection_strategy(SelectionStrategy::Positive);

            let num_candidates = candidates.len();
            candidates.retain(|&literal| {
                first_solution.is_true(literal)
                    && second_solution
                        .as_ref()
                        .map_or(true, |solution| solution.is_true(literal))
            });
            statistics.num_eliminated_by_models += (num_candidates - candidates.len()) as u64;
            debug!("{} candidates left to probe", candidates.len());
        }

        let mut undetermined = vec![];
        let mut interrupted = false;
        while let Some(candidate) = candidates.pop() {
            if configuration.is_assigned(candidate.variable()) {
                continue;
            }
            if termination.should_stop() {
                interrupted = true;
                break;
            }

            oracle.push(!candidate);
            statistics.num_probes += 1;
            termination.decision_has_been_made();

            match query(oracle, &mut statistics) {
                Query::Unsatisfiable => {
                    trace!("{candidate} is forced");
                    oracle.replace_last(candidate);
                    statistics.num_forced_by_probe += 1;

                    collector.clear();
                    let outcome =
                        traverser.propagate_strong(&mut configuration, &mut collector, &[candidate]);
                    if outcome != TraversalOutcome::Fixpoint {
                        return Err(AnalysisError::InconsistentGraph(candidate));
                    }
                    for &literal in collector.computed() {
                        if literal != candidate {
                            oracle.push(literal);
                            statistics.num_forced_by_propagation += 1;
                        }
                    }
                }
                Query::Timeout => {
                    trace!("the probe of {candidate} timed out");
                    let _ = oracle.pop();
                    undetermined.push(candidate.variable());
                }
                Query::Model(solution) => {
                    trace!("{candidate} is not forced");
                    let _ = oracle.pop();
                    let num_candidates = candidates.len();
                    candidates.retain(|&literal| solution.is_true(literal));
                    statistics.num_eliminated_by_models +=
                        (num_candidates - candidates.len()) as u64;
                    self.perturbation.perturb(oracle, &mut random);
                }
            }
        }

        Ok(self.finish(oracle, base, undetermined, interrupted, statistics))
    }

    fn find_unknown_variable(&self, assumptions: &[Literal]) -> Option<Variable> {
        let num_variables = self.mig.num_variables();
        assumptions
            .iter()
            .map(|literal| literal.variable())
            .chain(self.options.priority.iter().flatten().copied())
            .chain(self.options.variables_of_interest.iter().flatten().copied())
            .find(|variable| variable.id() > num_variables)
    }

    /// Collects the result from the assumptions pushed since `base`.
    fn finish<O: SatisfiabilityOracle>(
        &self,
        oracle: &O,
        base: usize,
        undetermined: Vec<Variable>,
        interrupted: bool,
        statistics: AnalysisStatistics,
    ) -> CoreDeadResult {
        let is_of_interest = self.variables_of_interest();
        let forced = oracle.assumptions()[base..]
            .iter()
            .copied()
            .filter(|literal| is_of_interest[literal.variable()])
            .collect();

        CoreDeadResult {
            forced,
            undetermined,
            interrupted,
            statistics,
        }
    }

    fn variables_of_interest(&self) -> KeyedVec<Variable, bool> {
        let num_variables = self.mig.num_variables() as usize;
        match &self.options.variables_of_interest {
            None => KeyedVec::filled(num_variables, true),
            Some(variables) => {
                let mut is_of_interest = KeyedVec::filled(num_variables, false);
                for &variable in variables {
                    is_of_interest[variable] = true;
                }
                is_of_interest
            }
        }
    }

    /// Orders `candidates` such that the highest priority is at the end, where it is popped
    /// first.
    fn sort_by_priority(&self, candidates: &mut [Literal]) {
        let Some(priority) = &self.options.priority else {
            return;
        };
        if priority.is_empty() {
            warn!("the priority order is empty");
            return;
        }

        let mut rank: KeyedVec<Variable, usize> =
            KeyedVec::filled(self.mig.num_variables() as usize, usize::MAX);
        for (position, &variable) in priority.iter().enumerate() {
            rank[variable] = rank[variable].min(position);
        }
        candidates.sort_by_key(|literal| Reverse(rank[literal.variable()]));
    }
}
