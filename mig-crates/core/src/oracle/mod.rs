//! The interface to an incremental satisfiability oracle, and a reference implementation.
//!
//! The core/dead analysis only talks to a [`SatisfiabilityOracle`]; [`DpllOracle`] exists so the
//! crate can be used and tested without an external solver.
mod dpll;
mod perturbation;

pub use dpll::*;
pub use perturbation::*;

use crate::basic_types::Literal;
use crate::basic_types::Random;
use crate::basic_types::Solution;

/// The answer of an oracle to a satisfiability query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveOutcome {
    /// A solution consistent with all assumptions exists; it is available through
    /// [`SatisfiabilityOracle::last_solution`].
    Satisfiable,
    /// No solution is consistent with the assumptions.
    Unsatisfiable,
    /// The query budget ran out before the query was decided.
    Timeout,
}

/// Determines which value the oracle tries first for a variable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SelectionStrategy {
    /// Try `true` first.
    #[default]
    Positive,
    /// Try `false` first.
    Negative,
    /// Try the value opposite to the one in the given solution first, so that a second solution
    /// differs from the first in as many variables as possible.
    InverseOf(Solution),
    /// Decide the given literals first, in order; the remaining variables are decided positively
    /// in the order of the oracle.
    Fixed(Vec<Literal>),
}

/// An incremental satisfiability oracle over a fixed formula with a stack of assumptions.
///
/// Every query is answered under all literals on the assumption stack. Implementations are
/// expected to bound the time spent on a single query and report [`SolveOutcome::Timeout`]
/// rather than block indefinitely.
pub trait SatisfiabilityOracle {
    /// The number of variables of the formula, variables are `1..=num_variables`.
    fn num_variables(&self) -> u32;

    fn push(&mut self, literal: Literal);

    fn pop(&mut self) -> Option<Literal>;

    /// Replaces the top of the assumption stack with `literal`.
    ///
    /// # Panics
    /// If the assumption stack is empty.
    fn replace_last(&mut self, literal: Literal);

    fn assumptions(&self) -> &[Literal];

    /// Pops assumptions until at most `len` remain.
    fn truncate(&mut self, len: usize) {
        while self.assumptions().len() > len {
            let _ = self.pop();
        }
    }

    fn has_solution(&mut self) -> SolveOutcome;

    /// The solution found by the last satisfiable query.
    fn last_solution(&self) -> Option<&Solution>;

    /// Runs a query and returns its solution, if one was found.
    fn find_solution(&mut self) -> Option<Solution> {
        match self.has_solution() {
            SolveOutcome::Satisfiable => self.last_solution().cloned(),
            SolveOutcome::Unsatisfiable | SolveOutcome::Timeout => None,
        }
    }

    fn set_selection_strategy(&mut self, strategy: SelectionStrategy);

    /// Randomly permutes the order in which the oracle decides variables.
    fn shuffle_order(&mut self, random: &mut dyn Random);
}
