use std::fmt::Display;
use std::fmt::Formatter;
use std::num::NonZeroI32;
use std::num::NonZeroU32;
use std::ops::Not;

use crate::containers::StorageKey;
use crate::mig_asserts::mig_assert_simple;

/// A propositional variable, identified by a number in `1..=n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(NonZeroU32);

impl Variable {
    /// Creates the variable with the given (1-based) identifier.
    ///
    /// # Panics
    /// If `id` is zero, which is reserved for "unassigned".
    pub fn new(id: u32) -> Variable {
        let id = NonZeroU32::new(id).expect("variable identifiers start at 1");
        mig_assert_simple!(id.get() <= i32::MAX as u32, "variable {id} cannot be signed");
        Variable(id)
    }

    pub fn id(self) -> u32 {
        self.0.get()
    }

    pub fn positive(self) -> Literal {
        Literal::new(self, true)
    }

    pub fn negative(self) -> Literal {
        Literal::new(self, false)
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for Variable {
    fn index(&self) -> usize {
        self.0.get() as usize - 1
    }

    fn create_from_index(index: usize) -> Self {
        Variable::new(index as u32 + 1)
    }
}

/// A signed reference to a [`Variable`]: positive literals assert the variable, negative
/// literals assert its negation.
///
/// Literals use the DIMACS convention, `3` is the positive literal of variable 3 and `-3` its
/// negation. Zero never denotes a literal; "no literal" is expressed with [`Option`], which costs
/// no extra space.
///
/// Every literal is also the key of its vertex in the implication graph. The vertices of a
/// variable are adjacent: `x` has index `2 * (x - 1)` and `!x` has index `2 * (x - 1) + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal(NonZeroI32);

impl Literal {
    pub fn new(variable: Variable, is_positive: bool) -> Literal {
        let id = variable.id() as i32;
        let signed = if is_positive { id } else { -id };
        Literal(NonZeroI32::new(signed).expect("variable identifiers are non-zero"))
    }

    /// Creates a literal from its DIMACS representation.
    ///
    /// # Panics
    /// If `value` is zero or [`i32::MIN`].
    pub fn from_dimacs(value: i32) -> Literal {
        Literal::try_from_dimacs(value)
            .unwrap_or_else(|| panic!("{value} is not a valid DIMACS literal"))
    }

    /// Creates a literal from its DIMACS representation, or [`None`] for the `0` sentinel.
    pub fn try_from_dimacs(value: i32) -> Option<Literal> {
        if value == i32::MIN {
            return None;
        }
        NonZeroI32::new(value).map(Literal)
    }

    pub fn to_dimacs(self) -> i32 {
        self.0.get()
    }

    pub fn variable(self) -> Variable {
        Variable::new(self.0.get().unsigned_abs())
    }

    pub fn is_positive(self) -> bool {
        self.0.get() > 0
    }

    pub fn is_negative(self) -> bool {
        !self.is_positive()
    }
}

impl Not for Literal {
    type Output = Literal;

    fn not(self) -> Self::Output {
        Literal(-self.0)
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for Literal {
    fn index(&self) -> usize {
        self.variable().index() * 2 + usize::from(self.is_negative())
    }

    fn create_from_index(index: usize) -> Self {
        Literal::new(Variable::create_from_index(index / 2), index % 2 == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimacs_representation_is_preserved() {
        for value in [1, -1, 7, -42] {
            assert_eq!(Literal::from_dimacs(value).to_dimacs(), value);
        }
        assert_eq!(Literal::try_from_dimacs(0), None);
        assert_eq!(Literal::try_from_dimacs(i32::MIN), None);
    }

    #[test]
    fn negation_flips_the_polarity_only() {
        let literal = Literal::from_dimacs(5);

        assert!(literal.is_positive());
        assert!((!literal).is_negative());
        assert_eq!((!literal).variable(), literal.variable());
        assert_eq!(!!literal, literal);
    }

    #[test]
    fn vertex_indices_are_dense_and_invertible() {
        let indices = [1, -1, 2, -2, 3, -3]
            .map(|value| Literal::from_dimacs(value).index());
        assert_eq!(indices, [0, 1, 2, 3, 4, 5]);

        for index in 0..10 {
            assert_eq!(Literal::create_from_index(index).index(), index);
        }
    }

    #[test]
    #[should_panic]
    fn variable_zero_is_rejected() {
        let _ = Variable::new(0);
    }
}
