use log::debug;

use super::query;
use super::AnalysisStatistics;
use super::CoreDeadResult;
use super::Query;
use crate::basic_types::AnalysisError;
use crate::basic_types::Configuration;
use crate::basic_types::Literal;
use crate::oracle::SatisfiabilityOracle;
use crate::oracle::SelectionStrategy;
use crate::termination::TerminationCondition;

/// Determines the core and dead variables under `assumptions` using only the oracle.
///
/// Every literal of a first solution is a candidate; a candidate is forced if the oracle finds
/// no solution with its negation, otherwise the solution found rules out every candidate it
/// falsifies. This needs no graph but probes far more literals than [`CoreDeadAnalysis`], and
/// serves as the baseline it is compared against.
///
/// The assumption stack of the oracle is restored before returning.
///
/// [`CoreDeadAnalysis`]: super::CoreDeadAnalysis
pub fn exhaustive_probing<O: SatisfiabilityOracle + ?Sized>(
    oracle: &mut O,
    assumptions: &[Literal],
    termination: &mut impl TerminationCondition,
) -> Result<CoreDeadResult, AnalysisError> {
    let mut statistics = AnalysisStatistics::default();

    let mut known = Configuration::new(oracle.num_variables());
    for &literal in assumptions {
        if literal.variable().id() > oracle.num_variables() {
            return Err(AnalysisError::UnknownVariable(literal.variable()));
        }
        if known.assign(literal).is_err() {
            return Err(AnalysisError::Contradiction {
                literal: Some(literal),
            });
        }
    }

    let base = oracle.assumptions().len();
    for literal in known.assigned_literals() {
        oracle.push(literal);
    }

    oracle.set_selection_strategy(SelectionStrategy::Positive);
    let mut candidates: Vec<Literal> = match query(oracle, &mut statistics) {
        Query::Model(solution) => solution
            .literals()
            .filter(|literal| !known.is_assigned(literal.variable()))
            .collect(),
        Query::Unsatisfiable => {
            oracle.truncate(base);
            return Err(AnalysisError::Contradiction { literal: None });
        }
        Query::Timeout => {
            let result = CoreDeadResult {
                forced: oracle.assumptions()[base..].to_vec(),
                undetermined: known.unassigned_variables().collect(),
                interrupted: false,
                statistics,
            };
            oracle.truncate(base);
            return Ok(result);
        }
    };
    debug!("exhaustive probing of {} candidates", candidates.len());

    let mut undetermined = vec![];
    let mut interrupted = false;
    while let Some(candidate) = candidates.pop() {
        if termination.should_stop() {
            interrupted = true;
            break;
        }

        oracle.push(!candidate);
        statistics.num_probes += 1;
        termination.decision_has_been_made();

        match query(oracle, &mut statistics) {
            Query::Unsatisfiable => {
                oracle.replace_last(candidate);
                statistics.num_forced_by_probe += 1;
            }
            Query::Timeout => {
                let _ = oracle.pop();
                undetermined.push(candidate.variable());
            }
            Query::Model(solution) => {
                let _ = oracle.pop();
                let num_candidates = candidates.len();
                candidates.retain(|&literal| solution.is_true(literal));
                statistics.num_eliminated_by_models += (num_candidates - candidates.len()) as u64;
            }
        }
    }

    let result = CoreDeadResult {
        forced: oracle.assumptions()[base..].to_vec(),
        undetermined,
        interrupted,
        statistics,
    };
    oracle.truncate(base);
    statistics.log_statistics("exhaustive");

    Ok(result)
}
