//! Propagation over a [`ModalImplicationGraph`](crate::graph::ModalImplicationGraph).
//!
//! The [`Traverser`] assigns literals in a [`Configuration`](crate::Configuration) and reports
//! everything it reaches to a [`Visitor`], which decides whether propagation continues. The
//! [`CollectingVisitor`] splits the reached literals into those which are forced and those which
//! still need to be decided by an oracle.
mod collecting_visitor;
mod open_clauses;
mod traverser;
mod visitor;

pub use collecting_visitor::*;
pub use open_clauses::ClauseStatus;
pub use open_clauses::OpenClauses;
pub use traverser::*;
pub use visitor::*;
