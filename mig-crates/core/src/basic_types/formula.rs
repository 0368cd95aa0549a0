use itertools::Itertools;

use super::Literal;
use super::Solution;
use super::Variable;

/// A propositional formula in conjunctive normal form.
///
/// The formula only stores clauses; it performs no simplification. Clauses are kept exactly as
/// they were added so that the graph builder and the oracles can each normalise them their own
/// way.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Formula {
    num_variables: u32,
    clauses: Vec<Vec<Literal>>,
}

impl Formula {
    /// Creates an empty formula over the variables `1..=num_variables`.
    pub fn new(num_variables: u32) -> Formula {
        Formula {
            num_variables,
            clauses: vec![],
        }
    }

    /// Creates a formula from clauses in DIMACS notation.
    ///
    /// # Example
    /// ```rust
    /// # use mig_core::Formula;
    /// let formula = Formula::from_dimacs(3, &[&[1, 2, 3], &[-1, -2]]);
    /// assert_eq!(formula.num_clauses(), 2);
    /// ```
    pub fn from_dimacs(num_variables: u32, clauses: &[&[i32]]) -> Formula {
        let mut formula = Formula::new(num_variables);
        for clause in clauses {
            formula.add_dimacs_clause(clause);
        }
        formula
    }

    /// Adds a clause; the number of variables grows if the clause mentions a new variable.
    pub fn add_clause(&mut self, literals: impl IntoIterator<Item = Literal>) {
        let clause: Vec<Literal> = literals.into_iter().collect();
        if let Some(max_variable) = clause.iter().map(|literal| literal.variable().id()).max() {
            self.num_variables = self.num_variables.max(max_variable);
        }
        self.clauses.push(clause);
    }

    pub fn add_dimacs_clause(&mut self, literals: &[i32]) {
        self.add_clause(literals.iter().map(|&value| Literal::from_dimacs(value)))
    }

    pub fn num_variables(&self) -> u32 {
        self.num_variables
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    pub fn clauses(&self) -> impl Iterator<Item = &[Literal]> + '_ {
        self.clauses.iter().map(Vec::as_slice)
    }

    pub fn variables(&self) -> impl Iterator<Item = Variable> {
        (1..=self.num_variables).map(Variable::new)
    }

    /// Whether every clause has a literal which is true in `solution`.
    pub fn is_satisfied_by(&self, solution: &Solution) -> bool {
        self.clauses.iter().all(|clause| {
            clause
                .iter()
                .any(|&literal| solution.is_true(literal))
        })
    }
}

/// Sorts the literals of `clause` and removes duplicates. Returns [`None`] if the clause contains
/// a literal together with its negation.
pub(crate) fn normalise_clause(clause: &[Literal]) -> Option<Vec<Literal>> {
    let literals = clause.iter().copied().sorted().dedup().collect_vec();
    let is_tautology = literals
        .iter()
        .any(|&literal| literals.binary_search(&!literal).is_ok());

    (!is_tautology).then_some(literals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adding_a_clause_grows_the_variable_range() {
        let mut formula = Formula::new(2);
        formula.add_dimacs_clause(&[1, -4]);

        assert_eq!(formula.num_variables(), 4);
        assert_eq!(formula.variables().count(), 4);
    }

    #[test]
    fn satisfaction_is_checked_per_clause() {
        let formula = Formula::from_dimacs(2, &[&[1, 2], &[-1]]);

        assert!(formula.is_satisfied_by(&Solution::from_values(vec![false, true])));
        assert!(!formula.is_satisfied_by(&Solution::from_values(vec![true, true])));
        assert!(!formula.is_satisfied_by(&Solution::from_values(vec![false, false])));
    }

    #[test]
    fn normalising_sorts_and_detects_tautologies() {
        let literals = |values: &[i32]| {
            values
                .iter()
                .map(|&value| Literal::from_dimacs(value))
                .collect::<Vec<_>>()
        };

        assert_eq!(
            normalise_clause(&literals(&[3, -1, 3, 2])),
            Some(literals(&[-1, 2, 3]))
        );
        assert_eq!(normalise_clause(&literals(&[1, 2, -1])), None);
    }
}
