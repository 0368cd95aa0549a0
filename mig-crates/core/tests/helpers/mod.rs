//! Formula generation and brute-force reference results for the integration tests.
#![allow(
    dead_code,
    reason = "every test binary uses a different subset of the helpers"
)]

use mig_core::rand::rngs::SmallRng;
use mig_core::rand::Rng;
use mig_core::Formula;
use mig_core::Literal;
use mig_core::Solution;
use mig_core::Variable;

pub(crate) fn lit(value: i32) -> Literal {
    Literal::from_dimacs(value)
}

pub(crate) fn lits(values: &[i32]) -> Vec<Literal> {
    values.iter().copied().map(lit).collect()
}

pub(crate) fn sorted(literals: &[Literal]) -> Vec<Literal> {
    let mut literals = literals.to_vec();
    literals.sort();
    literals.dedup();
    literals
}

/// A random formula over at most `max_variables` variables; most clauses have two or three
/// literals, a few are unit clauses.
pub(crate) fn random_formula(random: &mut SmallRng, max_variables: u32) -> Formula {
    let num_variables = random.gen_range(3..=max_variables);
    let num_clauses = random.gen_range(num_variables..=2 * num_variables);
    let mut formula = Formula::new(num_variables);

    for _ in 0..num_clauses {
        let size = match random.gen_range(0..10) {
            0 => 1,
            1..=4 => 2,
            5..=8 => 3,
            _ => 4,
        }
        .min(num_variables as usize);
        let mut clause: Vec<Literal> = Vec::with_capacity(size);
        while clause.len() < size {
            let variable = Variable::new(random.gen_range(1..=num_variables));
            if clause.iter().any(|literal| literal.variable() == variable) {
                continue;
            }
            clause.push(Literal::new(variable, random.gen_bool(0.5)));
        }
        formula.add_clause(clause);
    }

    formula
}

/// Up to `max` random literals over the variables of `formula`.
pub(crate) fn random_assumptions(random: &mut SmallRng, formula: &Formula, max: usize) -> Vec<Literal> {
    let num_assumptions = random.gen_range(0..=max);
    (0..num_assumptions)
        .map(|_| {
            let variable = Variable::new(random.gen_range(1..=formula.num_variables()));
            Literal::new(variable, random.gen_bool(0.5))
        })
        .collect()
}

/// Every solution of `formula` in which all `assumptions` hold.
pub(crate) fn enumerate_solutions(formula: &Formula, assumptions: &[Literal]) -> Vec<Solution> {
    let num_variables = formula.num_variables();
    assert!(num_variables <= 16, "brute force is limited to small formulas");

    (0..1u32 << num_variables)
        .map(|bits| {
            Solution::from_values(
                (0..num_variables)
                    .map(|index| bits & (1 << index) != 0)
                    .collect(),
            )
        })
        .filter(|solution| {
            assumptions
                .iter()
                .all(|&literal| solution.is_true(literal))
                && formula.is_satisfied_by(solution)
        })
        .collect()
}

/// The literals which hold in every solution consistent with `assumptions`, sorted, or [`None`]
/// if there is no such solution.
pub(crate) fn brute_force_forced(formula: &Formula, assumptions: &[Literal]) -> Option<Vec<Literal>> {
    let solutions = enumerate_solutions(formula, assumptions);
    let first = solutions.first()?;

    let forced = first
        .literals()
        .filter(|&literal| solutions.iter().all(|solution| solution.is_true(literal)))
        .collect::<Vec<_>>();
    Some(sorted(&forced))
}
