use std::ops::Deref;

use crate::basic_types::Literal;
use crate::containers::StorageKey;

/// A stable handle to a [`ComplexClause`] in the clause arena of a
/// [`ModalImplicationGraph`](super::ModalImplicationGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClauseId(u32);

impl StorageKey for ClauseId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        ClauseId(index as u32)
    }
}

/// A clause of at least three literals which could not be folded into strong edges.
///
/// The literals are sorted and contain no duplicates, so two clauses with the same content
/// compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComplexClause {
    literals: Box<[Literal]>,
}

impl ComplexClause {
    pub(crate) fn new(literals: Box<[Literal]>) -> ComplexClause {
        ComplexClause { literals }
    }

    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }
}

impl Deref for ComplexClause {
    type Target = [Literal];

    fn deref(&self) -> &Self::Target {
        &self.literals
    }
}
