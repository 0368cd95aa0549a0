use super::VisitResult;
use super::Visitor;
use crate::basic_types::Literal;

/// A [`Visitor`] which accepts everything and separates what the graph decided from what it
/// could not decide.
///
/// Literals visited strongly are forced by the current assignment and are collected as
/// [`computed`](CollectingVisitor::computed); literals only reached through complex clauses are
/// collected as [`to_compute`](CollectingVisitor::to_compute), they need an oracle to be decided.
#[derive(Debug, Default, Clone)]
pub struct CollectingVisitor {
    computed: Vec<Literal>,
    to_compute: Vec<Literal>,
}

impl CollectingVisitor {
    pub fn new() -> CollectingVisitor {
        CollectingVisitor::default()
    }

    /// The forced literals, in the order they were assigned.
    pub fn computed(&self) -> &[Literal] {
        &self.computed
    }

    /// The undecided literals, in the order they were reached.
    pub fn to_compute(&self) -> &[Literal] {
        &self.to_compute
    }

    pub fn clear(&mut self) {
        self.computed.clear();
        self.to_compute.clear();
    }
}

impl Visitor for CollectingVisitor {
    fn visit_strong(&mut self, literal: Literal) -> VisitResult {
        self.computed.push(literal);
        VisitResult::Continue
    }

    fn visit_weak(&mut self, literal: Literal) -> VisitResult {
        self.to_compute.push(literal);
        VisitResult::Continue
    }
}
