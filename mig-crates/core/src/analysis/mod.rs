//! Determining the core and dead variables of a formula under assumptions.
//!
//! [`CoreDeadAnalysis`] combines propagation over a
//! [`ModalImplicationGraph`](crate::graph::ModalImplicationGraph) with oracle queries;
//! [`exhaustive_probing`] only uses the oracle and serves as a baseline.
mod core_dead;
mod exhaustive;
mod result;

pub use core_dead::*;
pub use exhaustive::*;
pub use result::*;

use log::warn;

use crate::basic_types::Solution;
use crate::oracle::SatisfiabilityOracle;
use crate::oracle::SolveOutcome;

/// The answer to a query, with the solution attached if there is one.
enum Query {
    Model(Solution),
    Unsatisfiable,
    Timeout,
}

fn query<O: SatisfiabilityOracle + ?Sized>(
    oracle: &mut O,
    statistics: &mut AnalysisStatistics,
) -> Query {
    statistics.num_oracle_calls += 1;

    match oracle.has_solution() {
        SolveOutcome::Satisfiable => match oracle.last_solution() {
            Some(solution) => Query::Model(solution.clone()),
            None => {
                warn!("the oracle reported a solution without providing it");
                statistics.num_timeouts += 1;
                Query::Timeout
            }
        },
        SolveOutcome::Unsatisfiable => Query::Unsatisfiable,
        SolveOutcome::Timeout => {
            statistics.num_timeouts += 1;
            Query::Timeout
        }
    }
}
