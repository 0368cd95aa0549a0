use super::Literal;
use super::Variable;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;

/// A complete assignment of the variables of a formula, as returned by an oracle.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Solution {
    values: KeyedVec<Variable, bool>,
}

impl Solution {
    /// Creates a solution where variable `i + 1` takes `values[i]`.
    pub fn from_values(values: Vec<bool>) -> Solution {
        let mut keyed = KeyedVec::filled(values.len(), false);
        for (index, value) in values.into_iter().enumerate() {
            keyed[Variable::create_from_index(index)] = value;
        }
        Solution { values: keyed }
    }

    pub fn num_variables(&self) -> u32 {
        self.values.len() as u32
    }

    pub fn value(&self, variable: Variable) -> bool {
        self.values[variable]
    }

    /// The literal of `variable` which is true in this solution.
    pub fn literal(&self, variable: Variable) -> Literal {
        Literal::new(variable, self.values[variable])
    }

    pub fn is_true(&self, literal: Literal) -> bool {
        self.values[literal.variable()] == literal.is_positive()
    }

    /// The true literal of every variable, in variable order.
    pub fn literals(&self) -> impl Iterator<Item = Literal> + '_ {
        self.values
            .keys()
            .map(|variable| Literal::new(variable, self.values[variable]))
    }
}
