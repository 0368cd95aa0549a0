use thiserror::Error;

use super::Literal;
use super::Variable;
#[cfg(doc)]
use crate::analysis::CoreDeadAnalysis;
#[cfg(doc)]
use crate::graph::MigBuilder;

/// Errors which abort a run of the [`CoreDeadAnalysis`] (or of the exhaustive probing baseline).
///
/// Timeouts of individual probes and cooperative cancellation are not errors; they are reported
/// as part of a successful result.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisError {
    /// The formula is unsatisfiable under the assumed literals.
    ///
    /// If the contradiction was found during propagation, `literal` is the literal which could
    /// not be made true. If the oracle reported it, `literal` is [`None`].
    #[error("the formula is unsatisfiable under the assumed literals")]
    Contradiction { literal: Option<Literal> },
    /// The oracle and the graph were created for formulas with a different number of variables.
    #[error("the oracle has {oracle} variables but the graph has {graph}")]
    VariableMismatch { oracle: u32, graph: u32 },
    /// An assumption, priority entry or variable of interest refers to a variable the formula
    /// does not have.
    #[error("variable {0} does not occur in the formula")]
    UnknownVariable(Variable),
    /// Propagating a literal which the oracle proved to be forced led to a conflict in the
    /// graph, meaning the graph does not describe the formula of the oracle.
    #[error("propagating the forced literal {0} through the graph led to a conflict")]
    InconsistentGraph(Literal),
}

/// Errors related to building a graph with the [`MigBuilder`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    /// The formula contains a clause without literals.
    #[error("the formula contains an empty clause")]
    EmptyClause,
    /// The formula has no solution.
    #[error("the formula is unsatisfiable")]
    Unsatisfiable,
    /// The oracle could not decide satisfiability of the formula within its budget.
    #[error("the oracle timed out before the core and dead literals were determined")]
    Timeout,
    /// The oracle was created for a formula with a different number of variables.
    #[error("the oracle has {oracle} variables but the formula has {formula}")]
    VariableMismatch { oracle: u32, formula: u32 },
}
