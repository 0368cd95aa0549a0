#[cfg(all(not(test), not(feature = "debug-checks")))]
pub(crate) const MIG_ASSERT_LEVEL_DEFINITION: u8 = MIG_ASSERT_SIMPLE;

#[cfg(any(test, feature = "debug-checks"))]
pub(crate) const MIG_ASSERT_LEVEL_DEFINITION: u8 = MIG_ASSERT_ADVANCED;

pub(crate) const MIG_ASSERT_SIMPLE: u8 = 1;
pub(crate) const MIG_ASSERT_MODERATE: u8 = 2;
pub(crate) const MIG_ASSERT_ADVANCED: u8 = 3;

macro_rules! mig_assert_simple {
    ($($arg:tt)*) => {
        if $crate::mig_asserts::MIG_ASSERT_LEVEL_DEFINITION >= $crate::mig_asserts::MIG_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

macro_rules! mig_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::mig_asserts::MIG_ASSERT_LEVEL_DEFINITION >= $crate::mig_asserts::MIG_ASSERT_SIMPLE {
            assert_eq!($($arg)*);
        }
    };
}

macro_rules! mig_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::mig_asserts::MIG_ASSERT_LEVEL_DEFINITION >= $crate::mig_asserts::MIG_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}

macro_rules! mig_assert_advanced {
    ($($arg:tt)*) => {
        if $crate::mig_asserts::MIG_ASSERT_LEVEL_DEFINITION >= $crate::mig_asserts::MIG_ASSERT_ADVANCED {
            assert!($($arg)*);
        }
    };
}

pub(crate) use mig_assert_advanced;
pub(crate) use mig_assert_eq_simple;
pub(crate) use mig_assert_moderate;
pub(crate) use mig_assert_simple;
