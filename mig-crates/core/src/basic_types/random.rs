use std::fmt::Debug;
use std::ops::Range;

use rand::Rng;
use rand::SeedableRng;

/// Abstraction for randomness, in order to swap out different source of randomness.
///
/// The analysis only uses randomness to perturb the decision order of the oracle after a
/// satisfiable probe. Tests use a scripted implementation to make that perturbation predictable.
pub trait Random: Debug {
    /// Generates a random usize in the provided range with equal probability; this can be seen as
    /// sampling from a uniform distribution in the range `[range.start, range.end)`
    ///
    /// # Example
    /// ```rust
    /// # use rand::rngs::SmallRng;
    /// # use rand::SeedableRng;
    /// # use mig_core::Random;
    /// let mut rng = SmallRng::seed_from_u64(42);
    /// let elements = vec!["This", "is", "a", "test"];
    /// let selected_index = rng.generate_usize_in_range(0..elements.len());
    /// assert!(selected_index < elements.len());
    /// ```
    fn generate_usize_in_range(&mut self, range: Range<usize>) -> usize;
}

// Any "regular" random generator can be used where an implementation of Random is expected.
impl<T> Random for T
where
    T: SeedableRng + Rng + Debug,
{
    fn generate_usize_in_range(&mut self, range: Range<usize>) -> usize {
        self.gen_range(range)
    }
}

/// Shuffles `elements` in place (Fisher-Yates) using `random`.
pub(crate) fn shuffle<T>(elements: &mut [T], random: &mut dyn Random) {
    for upper in (1..elements.len()).rev() {
        let other = random.generate_usize_in_range(0..upper + 1);
        elements.swap(upper, other);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::ops::Range;

    use super::*;
    use crate::mig_asserts::mig_assert_simple;

    /// A test "random" generator which takes as input a list of elements of [`usize`] and returns
    /// them in order. If more values are attempted to be generated than are provided
    /// then this will result in panicking.
    #[derive(Debug, Default)]
    pub(crate) struct TestRandom {
        pub(crate) usizes: Vec<usize>,
    }

    impl Random for TestRandom {
        fn generate_usize_in_range(&mut self, range: Range<usize>) -> usize {
            let selected = self.usizes.remove(0);
            mig_assert_simple!(
                range.contains(&selected),
                "The selected element by `TestRandom` ({selected}) is not in the provided range ({range:?}), please ensure that your test cases are correctly defined"
            );
            selected
        }
    }

    #[test]
    fn shuffle_uses_the_generated_indices() {
        let mut elements = vec![1, 2, 3];
        let mut random = TestRandom {
            usizes: vec![0, 0],
        };

        shuffle(&mut elements, &mut random);

        // swap(2, 0) then swap(1, 0)
        assert_eq!(elements, vec![2, 3, 1]);
    }
}
