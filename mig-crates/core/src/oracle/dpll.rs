use std::time::Duration;

use log::debug;
use log::trace;

use super::SatisfiabilityOracle;
use super::SelectionStrategy;
use super::SolveOutcome;
use crate::basic_types::normalise_clause;
use crate::basic_types::shuffle;
use crate::basic_types::Formula;
use crate::basic_types::Literal;
use crate::basic_types::Random;
use crate::basic_types::Solution;
use crate::basic_types::Variable;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::create_statistics_struct;
use crate::mig_asserts::mig_assert_moderate;
use crate::mig_asserts::mig_assert_simple;
use crate::statistics::log_statistic_postfix;
use crate::statistics::should_log_statistics;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;
use crate::termination::Combinator;
use crate::termination::DecisionBudget;
use crate::termination::TerminationCondition;
use crate::termination::TimeBudget;

/// The resources a single query of a [`DpllOracle`] may use. Unset limits are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryBudget {
    pub time: Option<Duration>,
    pub decisions: Option<u64>,
}

impl QueryBudget {
    pub fn unbounded() -> QueryBudget {
        QueryBudget::default()
    }

    pub fn with_time(mut self, time: Duration) -> QueryBudget {
        self.time = Some(time);
        self
    }

    pub fn with_decisions(mut self, decisions: u64) -> QueryBudget {
        self.decisions = Some(decisions);
        self
    }

    /// Starts the budget of one query.
    fn start(&self) -> Combinator<Option<TimeBudget>, Option<DecisionBudget>> {
        Combinator::new(
            self.time.map(TimeBudget::starting_now),
            self.decisions.map(DecisionBudget::new),
        )
    }
}

create_statistics_struct!(
    /// Counters of a [`DpllOracle`], accumulated over all queries.
    OracleStatistics {
        num_queries: u64,
        num_decisions: u64,
        num_propagations: u64,
        num_conflicts: u64,
        num_timeouts: u64,
    }
);

/// A reference [`SatisfiabilityOracle`]: a DPLL search with two watched literals.
///
/// Every query starts from scratch. The unit clauses of the formula are propagated first, then
/// every assumption is posted on its own decision level, after which the search decides the
/// remaining variables in the order of [`DpllOracle::shuffle_order`] with the polarity given by
/// the [`SelectionStrategy`], and backtracks chronologically.
#[derive(Debug, Clone)]
pub struct DpllOracle {
    num_variables: u32,
    /// Clauses with at least two literals; the first two literals are watched.
    clauses: Vec<Box<[Literal]>>,
    /// For every literal, the clauses in which its negation is watched.
    watches: KeyedVec<Literal, Vec<usize>>,
    unit_clauses: Vec<Literal>,
    has_empty_clause: bool,

    values: KeyedVec<Variable, Option<bool>>,
    trail: Vec<Literal>,
    /// The start of every decision level on the trail.
    trail_delimiter: Vec<usize>,
    queue_head: usize,

    assumptions: Vec<Literal>,
    order: Vec<Variable>,
    strategy: SelectionStrategy,
    budget: QueryBudget,
    last_solution: Option<Solution>,
    statistics: OracleStatistics,
}

fn literal_value(values: &KeyedVec<Variable, Option<bool>>, literal: Literal) -> Option<bool> {
    values[literal.variable()].map(|value| value == literal.is_positive())
}

fn enqueue(values: &mut KeyedVec<Variable, Option<bool>>, trail: &mut Vec<Literal>, literal: Literal) {
    mig_assert_moderate!(values[literal.variable()].is_none());
    values[literal.variable()] = Some(literal.is_positive());
    trail.push(literal);
}

impl DpllOracle {
    pub fn new(formula: &Formula) -> DpllOracle {
        let num_variables = formula.num_variables();
        let mut oracle = DpllOracle {
            num_variables,
            clauses: vec![],
            watches: KeyedVec::filled(2 * num_variables as usize, vec![]),
            unit_clauses: vec![],
            has_empty_clause: false,
            values: KeyedVec::filled(num_variables as usize, None),
            trail: vec![],
            trail_delimiter: vec![],
            queue_head: 0,
            assumptions: vec![],
            order: formula.variables().collect(),
            strategy: SelectionStrategy::default(),
            budget: QueryBudget::default(),
            last_solution: None,
            statistics: OracleStatistics::default(),
        };

        for clause in formula.clauses() {
            let Some(literals) = normalise_clause(clause) else {
                continue;
            };
            match literals.len() {
                0 => oracle.has_empty_clause = true,
                1 => oracle.unit_clauses.push(literals[0]),
                _ => {
                    let index = oracle.clauses.len();
                    oracle.watches[!literals[0]].push(index);
                    oracle.watches[!literals[1]].push(index);
                    oracle.clauses.push(literals.into_boxed_slice());
                }
            }
        }

        oracle
    }

    /// Sets the budget of every subsequent query.
    pub fn with_budget(mut self, budget: QueryBudget) -> DpllOracle {
        self.budget = budget;
        self
    }

    pub fn set_budget(&mut self, budget: QueryBudget) {
        self.budget = budget;
    }

    pub fn budget(&self) -> QueryBudget {
        self.budget
    }

    pub fn statistics(&self) -> OracleStatistics {
        self.statistics
    }

    /// Logs the statistics, if statistic logging is configured.
    pub fn log_statistics(&self) {
        if should_log_statistics() {
            self.statistics.log(StatisticLogger::new(["oracle"]));
            log_statistic_postfix();
        }
    }

    fn decision_level(&self) -> usize {
        self.trail_delimiter.len()
    }

    fn new_decision_level(&mut self) {
        self.trail_delimiter.push(self.trail.len());
    }

    fn backtrack(&mut self, level: usize) {
        while self.decision_level() > level {
            let Some(start) = self.trail_delimiter.pop() else {
                break;
            };
            for literal in self.trail.drain(start..) {
                self.values[literal.variable()] = None;
            }
        }
        self.queue_head = self.queue_head.min(self.trail.len());
    }

    fn clear_search(&mut self) {
        self.values.fill(None);
        self.trail.clear();
        self.trail_delimiter.clear();
        self.queue_head = 0;
    }

    /// Propagates the trail from the queue head. Returns the index of a falsified clause.
    fn propagate(&mut self) -> Option<usize> {
        while self.queue_head < self.trail.len() {
            let literal = self.trail[self.queue_head];
            self.queue_head += 1;
            self.statistics.num_propagations += 1;

            let falsified = !literal;
            let mut watchers = std::mem::take(&mut self.watches[literal]);
            let mut conflict = None;
            let mut index = 0;

            while index < watchers.len() {
                let clause_index = watchers[index];
                let clause = &mut self.clauses[clause_index];
                if clause[0] == falsified {
                    clause.swap(0, 1);
                }
                mig_assert_moderate!(clause[1] == falsified);

                if literal_value(&self.values, clause[0]) == Some(true) {
                    index += 1;
                    continue;
                }

                let replacement = (2..clause.len())
                    .find(|&position| literal_value(&self.values, clause[position]) != Some(false));
                if let Some(position) = replacement {
                    clause.swap(1, position);
                    self.watches[!clause[1]].push(clause_index);
                    let _ = watchers.swap_remove(index);
                    continue;
                }

                index += 1;
                match literal_value(&self.values, clause[0]) {
                    Some(false) => {
                        conflict = Some(clause_index);
                        break;
                    }
                    _ => enqueue(&mut self.values, &mut self.trail, clause[0]),
                }
            }

            let added = std::mem::replace(&mut self.watches[literal], watchers);
            self.watches[literal].extend(added);

            if conflict.is_some() {
                self.statistics.num_conflicts += 1;
                return conflict;
            }
        }

        None
    }

    /// Propagates the unit clauses and posts the assumptions. Returns `false` if this leads to a
    /// conflict.
    fn set_up_root(&mut self) -> bool {
        if self.has_empty_clause {
            return false;
        }

        for index in 0..self.unit_clauses.len() {
            let literal = self.unit_clauses[index];
            match literal_value(&self.values, literal) {
                Some(true) => {}
                Some(false) => return false,
                None => enqueue(&mut self.values, &mut self.trail, literal),
            }
        }
        if self.propagate().is_some() {
            return false;
        }

        for index in 0..self.assumptions.len() {
            let assumption = self.assumptions[index];
            match literal_value(&self.values, assumption) {
                Some(true) => {}
                Some(false) => return false,
                None => {
                    self.new_decision_level();
                    enqueue(&mut self.values, &mut self.trail, assumption);
                    if self.propagate().is_some() {
                        return false;
                    }
                }
            }
        }

        true
    }

    fn next_decision(&self) -> Option<Literal> {
        if let SelectionStrategy::Fixed(literals) = &self.strategy {
            if let Some(&literal) = literals
                .iter()
                .find(|literal| self.values[literal.variable()].is_none())
            {
                return Some(literal);
            }
        }

        let variable = self
            .order
            .iter()
            .copied()
            .find(|&variable| self.values[variable].is_none())?;

        let is_positive = match &self.strategy {
            SelectionStrategy::Positive | SelectionStrategy::Fixed(_) => true,
            SelectionStrategy::Negative => false,
            SelectionStrategy::InverseOf(solution) => {
                variable.index() >= solution.num_variables() as usize || !solution.value(variable)
            }
        };
        Some(Literal::new(variable, is_positive))
    }

    fn search(&mut self, termination: &mut impl TerminationCondition) -> SolveOutcome {
        let root_level = self.decision_level();
        // The decisions above the assumptions, and whether their negation has been tried.
        let mut decisions: Vec<(Literal, bool)> = vec![];

        loop {
            if termination.should_stop() {
                self.statistics.num_timeouts += 1;
                return SolveOutcome::Timeout;
            }

            if self.propagate().is_some() {
                loop {
                    let Some((decision, flipped)) = decisions.pop() else {
                        return SolveOutcome::Unsatisfiable;
                    };
                    self.backtrack(root_level + decisions.len());
                    if !flipped {
                        self.new_decision_level();
                        decisions.push((!decision, true));
                        enqueue(&mut self.values, &mut self.trail, !decision);
                        break;
                    }
                }
                continue;
            }

            match self.next_decision() {
                Some(decision) => {
                    self.statistics.num_decisions += 1;
                    termination.decision_has_been_made();
                    self.new_decision_level();
                    decisions.push((decision, false));
                    enqueue(&mut self.values, &mut self.trail, decision);
                }
                None => {
                    let values = self
                        .values
                        .iter()
                        .map(|value| value.unwrap_or(true))
                        .collect();
                    self.last_solution = Some(Solution::from_values(values));
                    return SolveOutcome::Satisfiable;
                }
            }
        }
    }
}

impl SatisfiabilityOracle for DpllOracle {
    fn num_variables(&self) -> u32 {
        self.num_variables
    }

    fn push(&mut self, literal: Literal) {
        mig_assert_simple!(
            literal.variable().id() <= self.num_variables,
            "{literal} is not a literal of the formula"
        );
        self.assumptions.push(literal);
    }

    fn pop(&mut self) -> Option<Literal> {
        self.assumptions.pop()
    }

    fn replace_last(&mut self, literal: Literal) {
        match self.assumptions.last_mut() {
            Some(last) => *last = literal,
            None => panic!("cannot replace the last assumption of an empty stack"),
        }
    }

    fn assumptions(&self) -> &[Literal] {
        &self.assumptions
    }

    fn has_solution(&mut self) -> SolveOutcome {
        self.statistics.num_queries += 1;
        let mut termination = self.budget.start();

        self.clear_search();
        let outcome = if self.set_up_root() {
            self.search(&mut termination)
        } else {
            SolveOutcome::Unsatisfiable
        };
        self.clear_search();

        trace!(
            "query under {} assumptions: {outcome:?}",
            self.assumptions.len()
        );
        outcome
    }

    fn last_solution(&self) -> Option<&Solution> {
        self.last_solution.as_ref()
    }

    fn set_selection_strategy(&mut self, strategy: SelectionStrategy) {
        self.strategy = strategy;
    }

    fn shuffle_order(&mut self, random: &mut dyn Random) {
        debug!("shuffling the decision order of {} variables", self.order.len());
        shuffle(&mut self.order, random);
    }
}
