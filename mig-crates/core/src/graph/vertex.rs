use enumset::EnumSet;
use enumset::EnumSetType;

use super::ClauseId;
use crate::basic_types::Literal;
use crate::basic_types::Variable;

/// The fixed status of a vertex, determined when the graph is built.
#[derive(EnumSetType, Debug)]
pub enum VertexStatus {
    /// The literal of the vertex is true in every solution.
    Core,
    /// The literal of the vertex is false in every solution.
    Dead,
}

/// The vertex of a single literal in a [`ModalImplicationGraph`](super::ModalImplicationGraph).
#[derive(Debug, Clone)]
pub struct Vertex {
    literal: Literal,
    status: EnumSet<VertexStatus>,
    /// Literals which hold in every solution in which [`Vertex::literal`] holds.
    strong_edges: Vec<Literal>,
    /// The complex clauses containing the negation of [`Vertex::literal`]; making this literal
    /// true removes a literal from each of them.
    clauses: Vec<ClauseId>,
}

impl Vertex {
    pub(crate) fn new(literal: Literal) -> Vertex {
        Vertex {
            literal,
            status: EnumSet::empty(),
            strong_edges: vec![],
            clauses: vec![],
        }
    }

    pub fn literal(&self) -> Literal {
        self.literal
    }

    pub fn variable(&self) -> Variable {
        self.literal.variable()
    }

    pub fn is_core(&self) -> bool {
        self.status.contains(VertexStatus::Core)
    }

    pub fn is_dead(&self) -> bool {
        self.status.contains(VertexStatus::Dead)
    }

    /// Whether the vertex is core or dead.
    pub fn is_fixed(&self) -> bool {
        !self.status.is_empty()
    }

    pub fn status(&self) -> EnumSet<VertexStatus> {
        self.status
    }

    pub fn strong_edges(&self) -> &[Literal] {
        &self.strong_edges
    }

    pub fn clauses(&self) -> &[ClauseId] {
        &self.clauses
    }

    pub(crate) fn set_status(&mut self, status: VertexStatus) {
        let _ = self.status.insert(status);
    }

    pub(crate) fn add_strong_edge(&mut self, target: Literal) -> bool {
        if target == self.literal || self.strong_edges.contains(&target) {
            return false;
        }
        self.strong_edges.push(target);
        true
    }

    pub(crate) fn replace_strong_edges(&mut self, targets: Vec<Literal>) {
        self.strong_edges = targets;
    }

    pub(crate) fn add_clause(&mut self, clause: ClauseId) {
        self.clauses.push(clause);
    }
}
