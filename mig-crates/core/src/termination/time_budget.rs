use std::time::Duration;
use std::time::Instant;

use super::TerminationCondition;

/// A [`TerminationCondition`] which triggers when the time budget has been used up.
#[derive(Clone, Copy, Debug)]
pub struct TimeBudget {
    /// The point in time from which the budget is measured.
    started_at: Instant,
    budget: Duration,
}

impl TimeBudget {
    /// Starts measuring `budget` from now.
    pub fn starting_now(budget: Duration) -> TimeBudget {
        TimeBudget {
            started_at: Instant::now(),
            budget,
        }
    }
}

impl TerminationCondition for TimeBudget {
    fn should_stop(&mut self) -> bool {
        self.started_at.elapsed() >= self.budget
    }
}
