use thiserror::Error;

use super::Literal;
use super::Variable;
use crate::containers::KeyedVec;

/// A partial assignment: every variable is either unassigned or assigned through the literal
/// which is true.
///
/// A configuration is owned by exactly one traversal or analysis run; the graph it is propagated
/// over is shared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Configuration {
    values: KeyedVec<Variable, Option<Literal>>,
    num_assigned: usize,
}

/// Returned when a literal is assigned while the opposite literal already holds.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot assign {literal}, the variable is already assigned {existing}")]
pub struct ConflictingAssignment {
    pub literal: Literal,
    pub existing: Literal,
}

impl Configuration {
    /// Creates a configuration in which all `num_variables` variables are unassigned.
    pub fn new(num_variables: u32) -> Configuration {
        Configuration {
            values: KeyedVec::filled(num_variables as usize, None),
            num_assigned: 0,
        }
    }

    pub fn num_variables(&self) -> u32 {
        self.values.len() as u32
    }

    pub fn num_assigned(&self) -> usize {
        self.num_assigned
    }

    /// The literal of `variable` which is true, if any.
    pub fn value(&self, variable: Variable) -> Option<Literal> {
        self.values[variable]
    }

    pub fn is_assigned(&self, variable: Variable) -> bool {
        self.values[variable].is_some()
    }

    /// `Some(true)` if `literal` holds, `Some(false)` if its negation holds, [`None`] otherwise.
    pub fn truth_value(&self, literal: Literal) -> Option<bool> {
        self.values[literal.variable()].map(|assigned| assigned == literal)
    }

    pub fn is_true(&self, literal: Literal) -> bool {
        self.truth_value(literal) == Some(true)
    }

    pub fn is_false(&self, literal: Literal) -> bool {
        self.truth_value(literal) == Some(false)
    }

    /// Makes `literal` true.
    ///
    /// Returns whether the configuration changed, or an error if the variable is assigned the
    /// opposite value.
    pub fn assign(&mut self, literal: Literal) -> Result<bool, ConflictingAssignment> {
        match self.values[literal.variable()] {
            None => {
                self.values[literal.variable()] = Some(literal);
                self.num_assigned += 1;
                Ok(true)
            }
            Some(existing) if existing == literal => Ok(false),
            Some(existing) => Err(ConflictingAssignment { literal, existing }),
        }
    }

    pub fn unassigned_variables(&self) -> impl Iterator<Item = Variable> + '_ {
        self.values
            .keys()
            .filter(|&variable| self.values[variable].is_none())
    }

    /// The assigned literals in variable order.
    pub fn assigned_literals(&self) -> impl Iterator<Item = Literal> + '_ {
        self.values.iter().flatten().copied()
    }
}
