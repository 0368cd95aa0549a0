mod helpers;

use std::time::Duration;

use helpers::brute_force_forced;
use helpers::enumerate_solutions;
use helpers::lit;
use helpers::lits;
use helpers::random_assumptions;
use helpers::random_formula;
use helpers::sorted;
use mig_core::analysis::exhaustive_probing;
use mig_core::analysis::CoreDeadAnalysis;
use mig_core::analysis::CoreDeadResult;
use mig_core::graph::MigBuilder;
use mig_core::graph::ModalImplicationGraph;
use mig_core::oracle::DpllOracle;
use mig_core::oracle::NoPerturbation;
use mig_core::oracle::QueryBudget;
use mig_core::oracle::SatisfiabilityOracle;
use mig_core::rand::rngs::SmallRng;
use mig_core::rand::SeedableRng;
use mig_core::termination::DecisionBudget;
use mig_core::termination::Indefinite;
use mig_core::termination::Interrupt;
use mig_core::AnalysisError;
use mig_core::BuildError;
use mig_core::Formula;
use mig_core::Literal;
use mig_core::Variable;

const NUM_RANDOM_FORMULAS: usize = 150;

/// Builds the graph with complete core and dead flags, or [`None`] for unsatisfiable formulas.
fn complete_mig(formula: &Formula) -> Option<ModalImplicationGraph> {
    match MigBuilder::new(formula).build_with_oracle(&mut DpllOracle::new(formula)) {
        Ok(mig) => Some(mig),
        Err(BuildError::Unsatisfiable) => None,
        Err(error) => panic!("unexpected build error: {error}"),
    }
}

fn analyse(
    mig: &ModalImplicationGraph,
    formula: &Formula,
    assumptions: &[Literal],
) -> Result<CoreDeadResult, AnalysisError> {
    CoreDeadAnalysis::new(mig).run(&mut DpllOracle::new(formula), assumptions)
}

/// The five-variable scenario with a = 1, b = 2, c = 3, d = 4 and e = 5.
fn scenario() -> Formula {
    Formula::from_dimacs(
        5,
        &[
            &[4],
            &[-5],
            &[1, 2],
            &[-1, 3],
            &[4, 2, -5],
            &[-2, 3, 4],
            &[-3, -4, -5],
        ],
    )
}

#[test]
fn scenario_matches_enumeration() {
    let formula = scenario();
    assert_eq!(enumerate_solutions(&formula, &[]).len(), 4);
    let mig = complete_mig(&formula).unwrap();

    let result = analyse(&mig, &formula, &[]).unwrap();

    assert!(result.is_forced(lit(4)));
    assert_eq!(Some(sorted(result.forced())), brute_force_forced(&formula, &[]));
    assert_eq!(sorted(result.forced()), lits(&[-5, 4]));
    assert_eq!(result.core().collect::<Vec<_>>(), [Variable::new(4)]);
    assert_eq!(result.dead().collect::<Vec<_>>(), [Variable::new(5)]);
    assert_eq!(result.statistics().num_probes, 0);
    assert_eq!(sorted(&result.into_forced()), lits(&[-5, 4]));
}

#[test]
fn scenario_with_assumptions_matches_enumeration() {
    let formula = scenario();
    let mig = complete_mig(&formula).unwrap();

    for assumptions in [lits(&[1]), lits(&[-1]), lits(&[2]), lits(&[-3])] {
        let result = analyse(&mig, &formula, &assumptions).unwrap();

        assert_eq!(
            Some(sorted(result.forced())),
            brute_force_forced(&formula, &assumptions),
            "assuming {assumptions:?}"
        );
    }
}

#[test]
fn assumptions_contradicting_a_unit_clause_are_rejected() {
    let formula = scenario();
    let mig = complete_mig(&formula).unwrap();
    let mut oracle = DpllOracle::new(&formula);

    let result = CoreDeadAnalysis::new(&mig).run(&mut oracle, &lits(&[-4]));

    assert_eq!(
        result,
        Err(AnalysisError::Contradiction {
            literal: Some(lit(-4))
        })
    );
    assert!(oracle.assumptions().is_empty());
}

#[test]
fn assumptions_contradicting_the_formula_are_rejected() {
    // 1 excludes 2, after which the two ternary clauses contradict each other.
    let formula = Formula::from_dimacs(3, &[&[-1, 2, 3], &[-2, -1], &[-3, -1, 2]]);
    let mig = MigBuilder::new(&formula).build().unwrap();

    let result = analyse(&mig, &formula, &lits(&[1]));

    assert!(matches!(result, Err(AnalysisError::Contradiction { .. })));
}

#[test]
fn random_formulas_over_three_variables_have_distinct_literals() {
    let mut random = SmallRng::seed_from_u64(1);

    for _ in 0..200 {
        let formula = random_formula(&mut random, 3);

        assert_eq!(formula.num_variables(), 3);
        for clause in formula.clauses() {
            let mut variables = clause
                .iter()
                .map(|literal| literal.variable())
                .collect::<Vec<_>>();
            variables.sort();
            variables.dedup();
            assert_eq!(variables.len(), clause.len());
            assert!((1..=3).contains(&clause.len()));
        }
    }
}

#[test]
fn results_are_complete_on_random_formulas() {
    let mut random = SmallRng::seed_from_u64(7);

    for _ in 0..NUM_RANDOM_FORMULAS {
        let formula = random_formula(&mut random, 12);
        let Some(mig) = complete_mig(&formula) else {
            assert_eq!(brute_force_forced(&formula, &[]), None);
            continue;
        };
        let assumptions = random_assumptions(&mut random, &formula, 2);

        let expected = brute_force_forced(&formula, &assumptions);
        match analyse(&mig, &formula, &assumptions) {
            Ok(result) => {
                assert_eq!(
                    Some(sorted(result.forced())),
                    expected,
                    "{formula:?} under {assumptions:?}"
                );
                assert!(result.undetermined().is_empty());
            }
            Err(AnalysisError::Contradiction { .. }) => assert_eq!(expected, None),
            Err(error) => panic!("unexpected error: {error}"),
        }
    }
}

#[test]
fn results_equal_exhaustive_probing() {
    let mut random = SmallRng::seed_from_u64(11);

    for _ in 0..NUM_RANDOM_FORMULAS {
        let formula = random_formula(&mut random, 10);
        let Some(mig) = complete_mig(&formula) else {
            continue;
        };
        let assumptions = random_assumptions(&mut random, &formula, 2);

        let refined = analyse(&mig, &formula, &assumptions);
        let exhaustive =
            exhaustive_probing(&mut DpllOracle::new(&formula), &assumptions, &mut Indefinite);

        match (refined, exhaustive) {
            (Ok(refined), Ok(exhaustive)) => {
                assert_eq!(sorted(refined.forced()), sorted(exhaustive.forced()));
            }
            (Err(refined), Err(exhaustive)) => {
                assert!(matches!(refined, AnalysisError::Contradiction { .. }));
                assert!(matches!(exhaustive, AnalysisError::Contradiction { .. }));
            }
            (refined, exhaustive) => {
                panic!("the analyses disagree: {refined:?} and {exhaustive:?}")
            }
        }
    }
}

#[test]
fn forced_literals_hold_in_every_solution() {
    let mut random = SmallRng::seed_from_u64(13);

    for _ in 0..NUM_RANDOM_FORMULAS {
        let formula = random_formula(&mut random, 12);
        // Propagation alone may miss core literals, which must not make the result unsound.
        let Ok(mig) = MigBuilder::new(&formula).build() else {
            continue;
        };
        let assumptions = random_assumptions(&mut random, &formula, 2);
        let Ok(result) = analyse(&mig, &formula, &assumptions) else {
            continue;
        };

        let mut oracle = DpllOracle::new(&formula);
        for &assumption in &assumptions {
            oracle.push(assumption);
        }
        let solution = oracle
            .find_solution()
            .expect("the analysis found the assumptions consistent");
        for &literal in result.forced() {
            assert!(solution.is_true(literal), "{literal} does not hold in {solution:?}");
        }

        let expected = brute_force_forced(&formula, &assumptions).unwrap();
        assert!(result.forced().iter().all(|literal| expected.contains(literal)));
    }
}

#[test]
fn feeding_the_result_back_yields_the_same_result() {
    let mut random = SmallRng::seed_from_u64(17);

    for _ in 0..NUM_RANDOM_FORMULAS {
        let formula = random_formula(&mut random, 10);
        let Some(mig) = complete_mig(&formula) else {
            continue;
        };
        let assumptions = random_assumptions(&mut random, &formula, 2);
        let Ok(first) = analyse(&mig, &formula, &assumptions) else {
            continue;
        };

        let second = analyse(&mig, &formula, first.forced()).unwrap();

        assert_eq!(sorted(second.forced()), sorted(first.forced()));
        // Two models do not always rule out every free candidate, so a few probes may remain,
        // but each of them has to come back with a solution.
        let statistics = second.statistics();
        assert_eq!(statistics.num_forced_by_probe, 0);
        assert_eq!(statistics.num_timeouts, 0);
        assert!(second.undetermined().is_empty());
    }
}

#[test]
fn more_assumptions_never_shrink_the_result() {
    let mut random = SmallRng::seed_from_u64(19);

    for _ in 0..NUM_RANDOM_FORMULAS {
        let formula = random_formula(&mut random, 10);
        let Some(mig) = complete_mig(&formula) else {
            continue;
        };
        let assumptions = random_assumptions(&mut random, &formula, 1);
        let mut extended = assumptions.clone();
        extended.extend(random_assumptions(&mut random, &formula, 2));

        let (Ok(smaller), Ok(larger)) = (
            analyse(&mig, &formula, &assumptions),
            analyse(&mig, &formula, &extended),
        ) else {
            continue;
        };

        for literal in smaller.forced() {
            assert!(larger.is_forced(*literal), "{literal} is lost by assuming more");
        }
    }
}

#[test]
fn a_zero_timeout_yields_the_core_and_dead_flags_of_the_graph() {
    let mut random = SmallRng::seed_from_u64(23);

    for _ in 0..NUM_RANDOM_FORMULAS {
        let formula = random_formula(&mut random, 12);
        let Some(mig) = complete_mig(&formula) else {
            continue;
        };
        let mut oracle = DpllOracle::new(&formula)
            .with_budget(QueryBudget::unbounded().with_time(Duration::ZERO));

        let result = CoreDeadAnalysis::new(&mig).run(&mut oracle, &[]).unwrap();

        let flags = mig.core_dead_literals().collect::<Vec<_>>();
        assert_eq!(sorted(result.forced()), sorted(&flags));
        assert_eq!(result.statistics().num_probes, 0);
        for variable in result.undetermined() {
            assert!(!mig.vertex(variable.positive()).is_fixed());
        }
    }
}

#[test]
fn queries_which_time_out_leave_candidates_undetermined() {
    // Assuming 1 leaves 2, 3 and 4 free, but the oracle has to decide them.
    let formula = Formula::from_dimacs(4, &[&[1, 2, 3, 4], &[-1, -2, -3, -4], &[1, -2, 3]]);
    let mig = complete_mig(&formula).unwrap();

    let mut budgeted =
        DpllOracle::new(&formula).with_budget(QueryBudget::unbounded().with_decisions(0));
    let result = CoreDeadAnalysis::new(&mig)
        .run(&mut budgeted, &lits(&[1]))
        .unwrap();
    let mut undetermined = result.undetermined().to_vec();
    undetermined.sort();
    assert_eq!(result.forced(), &[lit(1)]);
    assert_eq!(undetermined, [2, 3, 4].map(Variable::new));

    let unbounded = CoreDeadAnalysis::new(&mig)
        .run(&mut DpllOracle::new(&formula), &lits(&[1]))
        .unwrap();
    assert_eq!(unbounded.forced(), &[lit(1)]);
    assert!(unbounded.undetermined().is_empty());
}

#[test]
fn an_interrupt_stops_the_analysis() {
    let formula = Formula::from_dimacs(4, &[&[-1, 2, 3], &[-2, 4], &[-3, 4]]);
    let mig = complete_mig(&formula).unwrap();
    let mut interrupt = Interrupt::new();
    interrupt.trigger();

    let result = CoreDeadAnalysis::new(&mig)
        .run_with_termination(&mut DpllOracle::new(&formula), &lits(&[1]), &mut interrupt)
        .unwrap();

    assert!(result.is_interrupted());
    assert!(!result.is_forced(lit(4)));

    let result = CoreDeadAnalysis::new(&mig)
        .run_with_termination(
            &mut DpllOracle::new(&formula),
            &lits(&[1]),
            &mut DecisionBudget::new(u64::MAX),
        )
        .unwrap();
    assert!(!result.is_interrupted());
    assert!(result.is_forced(lit(4)));
}

#[test]
fn runs_are_deterministic_for_a_fixed_seed() {
    let mut random = SmallRng::seed_from_u64(29);
    let formula = random_formula(&mut random, 12);
    let Some(mig) = complete_mig(&formula) else {
        return;
    };

    let run = |seed: u64| {
        CoreDeadAnalysis::new(&mig)
            .with_seed(seed)
            .run(&mut DpllOracle::new(&formula), &[])
            .unwrap()
    };

    assert_eq!(run(3), run(3));
    assert_eq!(
        sorted(run(3).forced()),
        sorted(
            CoreDeadAnalysis::new(&mig)
                .with_perturbation(NoPerturbation)
                .run(&mut DpllOracle::new(&formula), &[])
                .unwrap()
                .forced()
        )
    );
}

#[test]
fn a_graph_can_be_shared_between_threads() {
    let formula = scenario();
    let mig = complete_mig(&formula).unwrap();
    let expected = brute_force_forced(&formula, &lits(&[1])).unwrap();

    std::thread::scope(|scope| {
        let handles = (0..4)
            .map(|seed| {
                let mig = &mig;
                let formula = &formula;
                scope.spawn(move || {
                    CoreDeadAnalysis::new(mig)
                        .with_seed(seed)
                        .run(&mut DpllOracle::new(formula), &lits(&[1]))
                        .unwrap()
                })
            })
            .collect::<Vec<_>>();

        for handle in handles {
            let result = handle.join().unwrap();
            assert_eq!(sorted(result.forced()), expected);
        }
    });
}
