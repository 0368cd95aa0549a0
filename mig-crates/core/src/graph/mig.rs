use super::ClauseId;
use super::ComplexClause;
use super::Vertex;
use super::VertexStatus;
use crate::basic_types::Literal;
use crate::basic_types::Variable;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::mig_asserts::mig_assert_simple;

/// A modal implication graph over the literals of a formula.
///
/// The graph has one [`Vertex`] per literal. Binary clauses are represented by strong edges
/// (`!a -> b` and `!b -> a` for the clause `a ∨ b`): whenever the source holds, the target holds
/// as well. Clauses with at least three literals are kept in an arena of [`ComplexClause`]s and
/// are referenced by the vertices of the negations of their literals, which is where unit
/// propagation over them starts. Unit clauses, and more generally all literals which hold in
/// every solution, are not represented by edges but by the [`VertexStatus`] of their vertices.
///
/// Once built, a graph is never modified; a single graph can be shared between any number of
/// runs (also across threads), as long as each run owns its own
/// [`Configuration`](crate::Configuration).
#[derive(Debug, Clone)]
pub struct ModalImplicationGraph {
    num_variables: u32,
    vertices: KeyedVec<Literal, Vertex>,
    clauses: KeyedVec<ClauseId, ComplexClause>,
}

impl ModalImplicationGraph {
    /// Creates a graph without edges over the variables `1..=num_variables`.
    pub fn new(num_variables: u32) -> ModalImplicationGraph {
        let mut vertices = KeyedVec::default();
        for index in 0..2 * num_variables as usize {
            let _ = vertices.push(Vertex::new(Literal::create_from_index(index)));
        }

        ModalImplicationGraph {
            num_variables,
            vertices,
            clauses: KeyedVec::default(),
        }
    }

    pub fn num_variables(&self) -> u32 {
        self.num_variables
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    pub fn vertex(&self, literal: Literal) -> &Vertex {
        &self.vertices[literal]
    }

    /// All vertices, ordered `1, -1, 2, -2, ...`.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> + '_ {
        self.vertices.iter()
    }

    pub fn clause(&self, clause: ClauseId) -> &ComplexClause {
        &self.clauses[clause]
    }

    pub fn clauses(&self) -> impl Iterator<Item = (ClauseId, &ComplexClause)> + '_ {
        self.clauses.keys().zip(self.clauses.iter())
    }

    /// The literals which hold in every solution, one per core or dead variable.
    pub fn core_dead_literals(&self) -> impl Iterator<Item = Literal> + '_ {
        self.vertices
            .iter()
            .filter(|vertex| vertex.is_core())
            .map(Vertex::literal)
    }

    /// Marks `literal` as core, and thereby its negation as dead.
    pub fn set_core(&mut self, literal: Literal) {
        mig_assert_simple!(
            !self.vertices[literal].is_dead(),
            "{literal} cannot be both core and dead"
        );
        self.vertices[literal].set_status(VertexStatus::Core);
        self.vertices[!literal].set_status(VertexStatus::Dead);
    }

    /// Adds the strong edge `from -> to`. Returns whether the edge was new.
    pub fn add_strong_edge(&mut self, from: Literal, to: Literal) -> bool {
        self.vertices[from].add_strong_edge(to)
    }

    /// Replaces all strong edges of the vertex of `from`.
    pub fn set_strong_edges(&mut self, from: Literal, targets: Vec<Literal>) {
        self.vertices[from].replace_strong_edges(targets)
    }

    /// Adds a complex clause and attaches it to the vertices of the negations of its literals.
    ///
    /// The literals are expected to be sorted, duplicate free, not tautological and at least three
    /// in number; merging clauses with identical content is left to the caller.
    pub fn add_complex_clause(&mut self, literals: Box<[Literal]>) -> ClauseId {
        mig_assert_simple!(
            literals.len() >= 3,
            "clauses with fewer than three literals are strong edges"
        );
        mig_assert_simple!(literals.windows(2).all(|pair| pair[0] < pair[1]));

        let clause_id = self.clauses.push(ComplexClause::new(literals));
        for index in 0..self.clauses[clause_id].len() {
            let literal = self.clauses[clause_id][index];
            self.vertices[!literal].add_clause(clause_id);
        }
        clause_id
    }

    /// Every variable of the graph.
    pub fn variables(&self) -> impl Iterator<Item = Variable> {
        (1..=self.num_variables).map(Variable::new)
    }
}
