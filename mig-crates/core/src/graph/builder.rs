use std::collections::VecDeque;

use itertools::Itertools;
use log::debug;

use super::ModalImplicationGraph;
use crate::analysis::exhaustive_probing;
use crate::basic_types::normalise_clause;
use crate::basic_types::BuildError;
use crate::basic_types::Configuration;
use crate::basic_types::Formula;
use crate::basic_types::Literal;
use crate::containers::HashSet;
use crate::containers::KeyedVec;
use crate::mig_asserts::mig_assert_advanced;
use crate::mig_asserts::mig_assert_simple;
use crate::oracle::SatisfiabilityOracle;
use crate::termination::Indefinite;

/// Builds a [`ModalImplicationGraph`] from a [`Formula`].
///
/// Clauses are normalised first: literals are sorted and deduplicated, and tautologies are
/// dropped. The literals which hold in every solution become the core and dead flags of the graph
/// and simplify the remaining clauses. Clauses with two literals left become strong edges, the
/// others become complex clauses; identical complex clauses are added once.
#[derive(Debug, Clone, Copy)]
pub struct MigBuilder<'formula> {
    formula: &'formula Formula,
    transitive_closure: bool,
}

impl<'formula> MigBuilder<'formula> {
    pub fn new(formula: &'formula Formula) -> MigBuilder<'formula> {
        MigBuilder {
            formula,
            transitive_closure: false,
        }
    }

    /// Whether every vertex gets a strong edge to every literal it reaches through strong edges.
    pub fn with_transitive_closure(mut self, transitive_closure: bool) -> Self {
        self.transitive_closure = transitive_closure;
        self
    }

    /// Builds the graph, finding core and dead literals by unit propagation and failed literal
    /// detection over the binary clauses.
    ///
    /// This does not find every core and dead literal of every formula; use
    /// [`MigBuilder::build_with_oracle`] when the flags need to be complete.
    pub fn build(&self) -> Result<ModalImplicationGraph, BuildError> {
        let clauses = self.normalised_clauses()?;

        let mut fixed = Configuration::new(self.formula.num_variables());
        propagate_units(&mut fixed, &clauses)?;
        while let Some(failed) = find_failed_literal(&fixed, &clauses) {
            debug!("{failed} is a failed literal");
            if fixed.assign(!failed).is_err() {
                return Err(BuildError::Unsatisfiable);
            }
            propagate_units(&mut fixed, &clauses)?;
        }

        Ok(self.assemble(clauses, &fixed))
    }

    /// Builds the graph, asking `oracle` for exactly the core and dead literals.
    ///
    /// The oracle must have been created for the formula of this builder and must not hold any
    /// assumptions. If a query times out, the flags would be incomplete and
    /// [`BuildError::Timeout`] is returned.
    pub fn build_with_oracle<O: SatisfiabilityOracle + ?Sized>(
        &self,
        oracle: &mut O,
    ) -> Result<ModalImplicationGraph, BuildError> {
        if oracle.num_variables() != self.formula.num_variables() {
            return Err(BuildError::VariableMismatch {
                oracle: oracle.num_variables(),
                formula: self.formula.num_variables(),
            });
        }
        let clauses = self.normalised_clauses()?;

        // Without assumptions, probing can only fail on an unsatisfiable formula.
        let result = exhaustive_probing(oracle, &[], &mut Indefinite)
            .map_err(|_| BuildError::Unsatisfiable)?;
        if !result.undetermined().is_empty() {
            return Err(BuildError::Timeout);
        }

        let mut fixed = Configuration::new(self.formula.num_variables());
        for &literal in result.forced() {
            let _ = fixed
                .assign(literal)
                .map_err(|_| BuildError::Unsatisfiable)?;
        }

        Ok(self.assemble(clauses, &fixed))
    }

    fn normalised_clauses(&self) -> Result<Vec<Vec<Literal>>, BuildError> {
        let mut clauses = vec![];
        for clause in self.formula.clauses() {
            if clause.is_empty() {
                return Err(BuildError::EmptyClause);
            }
            if let Some(literals) = normalise_clause(clause) {
                clauses.push(literals);
            }
        }
        Ok(clauses)
    }

    fn assemble(&self, clauses: Vec<Vec<Literal>>, fixed: &Configuration) -> ModalImplicationGraph {
        let mut mig = ModalImplicationGraph::new(self.formula.num_variables());
        for literal in fixed.assigned_literals() {
            mig.set_core(literal);
        }

        let mut seen_complex: HashSet<Vec<Literal>> = HashSet::default();
        for clause in clauses {
            if clause.iter().any(|&literal| fixed.is_true(literal)) {
                continue;
            }
            let remaining = clause
                .into_iter()
                .filter(|&literal| !fixed.is_false(literal))
                .collect_vec();
            mig_assert_simple!(
                remaining.len() >= 2,
                "clauses which are unit under the core and dead literals are fully propagated"
            );

            match remaining.as_slice() {
                [] | [_] => {}
                &[first, second] => {
                    let _ = mig.add_strong_edge(!first, second);
                    let _ = mig.add_strong_edge(!second, first);
                }
                _ => {
                    if seen_complex.insert(remaining.clone()) {
                        let _ = mig.add_complex_clause(remaining.into_boxed_slice());
                    }
                }
            }
        }

        if self.transitive_closure {
            close_transitively(&mut mig);
        }
        mig_assert_advanced!(
            mig.vertices().all(|vertex| vertex
                .strong_edges()
                .iter()
                .all(|&target| mig
                    .vertex(!target)
                    .strong_edges()
                    .contains(&!vertex.literal()))),
            "every strong edge has its contrapositive"
        );

        debug!(
            "built a graph over {} variables with {} core or dead variables and {} complex clauses",
            mig.num_variables(),
            fixed.num_assigned(),
            mig.num_clauses()
        );
        mig
    }
}

/// Assigns every literal which is the last unassigned literal of an unsatisfied clause, until
/// nothing changes.
fn propagate_units(fixed: &mut Configuration, clauses: &[Vec<Literal>]) -> Result<(), BuildError> {
    let mut changed = true;
    while changed {
        changed = false;
        for clause in clauses {
            if clause.iter().any(|&literal| fixed.is_true(literal)) {
                continue;
            }
            let mut unassigned = clause
                .iter()
                .filter(|&&literal| !fixed.is_false(literal));
            match (unassigned.next(), unassigned.next()) {
                (None, _) => return Err(BuildError::Unsatisfiable),
                (Some(&literal), None) => {
                    let _ = fixed
                        .assign(literal)
                        .map_err(|_| BuildError::Unsatisfiable)?;
                    changed = true;
                }
                (Some(_), Some(_)) => {}
            }
        }
    }
    Ok(())
}

/// Finds an unassigned literal from which the binary clauses derive a contradiction.
fn find_failed_literal(fixed: &Configuration, clauses: &[Vec<Literal>]) -> Option<Literal> {
    let num_vertices = 2 * fixed.num_variables() as usize;
    let mut implications: KeyedVec<Literal, Vec<Literal>> = KeyedVec::filled(num_vertices, vec![]);
    for clause in clauses {
        if clause.iter().any(|&literal| fixed.is_true(literal)) {
            continue;
        }
        let remaining = clause
            .iter()
            .copied()
            .filter(|&literal| !fixed.is_false(literal))
            .collect_vec();
        if let &[first, second] = remaining.as_slice() {
            implications[!first].push(second);
            implications[!second].push(first);
        }
    }

    let mut reached: KeyedVec<Literal, bool> = KeyedVec::filled(num_vertices, false);
    let mut queue = VecDeque::new();
    fixed
        .unassigned_variables()
        .flat_map(|variable| [variable.positive(), variable.negative()])
        .find(|&start| {
            reached.fill(false);
            queue.clear();
            reached[start] = true;
            queue.push_back(start);

            while let Some(literal) = queue.pop_front() {
                if reached[!literal] {
                    return true;
                }
                for &implied in &implications[literal] {
                    if !reached[implied] {
                        reached[implied] = true;
                        queue.push_back(implied);
                    }
                }
            }
            false
        })
}

/// Replaces the strong edges of every vertex by everything reachable from it.
fn close_transitively(mig: &mut ModalImplicationGraph) {
    let closures = mig
        .vertices()
        .map(|vertex| {
            let source = vertex.literal();
            let mut reached: HashSet<Literal> = HashSet::default();
            let mut stack = vertex.strong_edges().to_vec();
            while let Some(literal) = stack.pop() {
                if literal != source && reached.insert(literal) {
                    stack.extend_from_slice(mig.vertex(literal).strong_edges());
                }
            }
            (source, reached.into_iter().sorted().collect_vec())
        })
        .collect_vec();

    for (source, targets) in closures {
        mig.set_strong_edges(source, targets);
    }
}
