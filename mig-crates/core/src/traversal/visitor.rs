use crate::basic_types::Literal;
#[cfg(doc)]
use crate::traversal::Traverser;

/// The decision of a [`Visitor`] about a literal reached by the [`Traverser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisitResult {
    /// Accept the literal and keep propagating from it.
    Continue,
    /// Accept the literal as an assumption. For literals reached through a complex clause this
    /// promotes the literal to a strong assumption; for strongly implied literals it behaves
    /// like [`VisitResult::Continue`], as they are already propagated as assumptions.
    Select,
    /// Accept the literal but do not propagate from it.
    Skip,
    /// Stop the traversal immediately. Assignments made so far are kept.
    Cancel,
}

/// Decides what the [`Traverser`] does with the literals it reaches.
pub trait Visitor {
    /// Called once per run for every literal which is forced by a seed, a strong edge or unit
    /// propagation, right after it has been assigned.
    fn visit_strong(&mut self, literal: Literal) -> VisitResult;

    /// Called once per run for every unassigned literal which is only reachable through complex
    /// clauses, i.e. which might but need not follow from the current assignment.
    fn visit_weak(&mut self, literal: Literal) -> VisitResult;
}
