use std::fmt::Debug;

use super::SatisfiabilityOracle;
use crate::basic_types::Random;

/// Changes the oracle after a satisfiable probe, so that the next solutions are likely to
/// differ from the previous ones and rule out more candidates.
pub trait DecisionPerturbation: Debug {
    fn perturb(&mut self, oracle: &mut dyn SatisfiabilityOracle, random: &mut dyn Random);
}

/// Shuffles the decision order of the oracle.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShuffleDecisionOrder;

impl DecisionPerturbation for ShuffleDecisionOrder {
    fn perturb(&mut self, oracle: &mut dyn SatisfiabilityOracle, random: &mut dyn Random) {
        oracle.shuffle_order(random);
    }
}

/// Leaves the oracle untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPerturbation;

impl DecisionPerturbation for NoPerturbation {
    fn perturb(&mut self, _: &mut dyn SatisfiabilityOracle, _: &mut dyn Random) {}
}
