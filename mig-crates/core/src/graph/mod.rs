//! The modal implication graph and its construction.
mod builder;
mod clause;
mod export;
mod mig;
mod vertex;

pub use builder::MigBuilder;
pub use clause::*;
pub use export::*;
pub use mig::ModalImplicationGraph;
pub use vertex::*;
