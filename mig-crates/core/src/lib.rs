//! # MIG
//! Propagation over modal implication graphs and the computation of core and dead variables of
//! propositional formulas.
//!
//! A [`ModalImplicationGraph`](graph::ModalImplicationGraph) has a vertex per literal of a
//! formula in conjunctive normal form. Binary clauses are strong edges between the vertices,
//! longer clauses are shared between the vertices of their literals, and the literals which hold
//! in every solution are flagged. The graph is built once per formula by a
//! [`MigBuilder`](graph::MigBuilder) and is read-only afterwards.
//!
//! A [`Traverser`](traversal::Traverser) propagates a partial assignment over the graph and
//! reports every literal it reaches to a [`Visitor`](traversal::Visitor): literals which are
//! forced are visited strongly, literals which might follow from the assignment are visited
//! weakly.
//!
//! The [`CoreDeadAnalysis`](analysis::CoreDeadAnalysis) uses this split to compute which
//! variables are forced under a set of assumptions: only the weakly visited literals have to be
//! checked with a [`SatisfiabilityOracle`](oracle::SatisfiabilityOracle).
//!
//! # Example
//! ```rust
//! # use mig_core::analysis::CoreDeadAnalysis;
//! # use mig_core::graph::MigBuilder;
//! # use mig_core::oracle::DpllOracle;
//! # use mig_core::Formula;
//! # use mig_core::Literal;
//! // 1 requires 2, 2 excludes 3, and one of 3 and 4 is selected.
//! let formula = Formula::from_dimacs(4, &[&[-1, 2], &[-2, -3], &[3, 4]]);
//! let mut oracle = DpllOracle::new(&formula);
//! let mig = MigBuilder::new(&formula).build_with_oracle(&mut oracle).unwrap();
//!
//! let result = CoreDeadAnalysis::new(&mig)
//!     .run(&mut oracle, &[Literal::from_dimacs(1)])
//!     .unwrap();
//!
//! let mut forced = result.forced().to_vec();
//! forced.sort();
//! assert_eq!(forced, [-3, 1, 2, 4].map(Literal::from_dimacs));
//! ```
pub(crate) mod basic_types;
pub mod containers;
pub(crate) mod mig_asserts;

pub mod analysis;
pub mod graph;
pub mod oracle;
pub mod statistics;
pub mod termination;
pub mod traversal;

pub use convert_case;
pub use rand;

pub use crate::basic_types::AnalysisError;
pub use crate::basic_types::BuildError;
pub use crate::basic_types::Configuration;
pub use crate::basic_types::ConflictingAssignment;
pub use crate::basic_types::Formula;
pub use crate::basic_types::Literal;
pub use crate::basic_types::Random;
pub use crate::basic_types::Solution;
pub use crate::basic_types::Variable;
