mod configuration;
mod errors;
mod formula;
mod literal;
mod random;
mod solution;

pub use configuration::*;
pub use errors::*;
pub use formula::Formula;
pub(crate) use formula::normalise_clause;
pub use literal::*;
pub use random::Random;
pub(crate) use random::shuffle;
#[cfg(test)]
pub(crate) use random::tests::TestRandom;
pub use solution::*;
