//! A [`TerminationCondition`] is polled by long-running operations, the oracle between its
//! decisions and the core/dead analysis between its probes. It tells them to give up even
//! though no definitive conclusion has been reached; what has been established so far is still
//! reported.

mod combinator;
mod decision_budget;
mod indefinite;
mod interrupt;
mod time_budget;

pub use combinator::Combinator;
pub use decision_budget::DecisionBudget;
pub use indefinite::Indefinite;
pub use interrupt::Interrupt;
pub use time_budget::TimeBudget;

/// Determines when an operation should stop.
pub trait TerminationCondition {
    /// Returns `true` when the operation should stop, `false` otherwise.
    fn should_stop(&mut self) -> bool;

    /// Called by the oracle for every decision it makes; probes of the analysis count as
    /// decisions as well.
    fn decision_has_been_made(&mut self) {}
}

impl<T: TerminationCondition> TerminationCondition for Option<T> {
    fn should_stop(&mut self) -> bool {
        self.as_mut().is_some_and(TerminationCondition::should_stop)
    }

    fn decision_has_been_made(&mut self) {
        if let Some(condition) = self {
            condition.decision_has_been_made()
        }
    }
}

impl<T: TerminationCondition + ?Sized> TerminationCondition for &mut T {
    fn should_stop(&mut self) -> bool {
        (**self).should_stop()
    }

    fn decision_has_been_made(&mut self) {
        (**self).decision_has_been_made()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn absent_conditions_never_trigger() {
        let mut condition: Option<DecisionBudget> = None;
        condition.decision_has_been_made();

        assert!(!condition.should_stop());
    }

    #[test]
    fn decision_budget_counts_decisions() {
        let mut budget = DecisionBudget::new(2);
        assert!(!budget.should_stop());

        budget.decision_has_been_made();
        assert!(!budget.should_stop());
        budget.decision_has_been_made();
        assert!(budget.should_stop());
    }

    #[test]
    fn combinator_triggers_when_either_triggers() {
        let mut combined = Combinator::new(Indefinite, Some(DecisionBudget::new(1)));
        assert!(!combined.should_stop());

        combined.decision_has_been_made();
        assert!(combined.should_stop());
    }

    #[test]
    fn an_empty_time_budget_triggers_immediately() {
        let mut budget = TimeBudget::starting_now(Duration::ZERO);

        assert!(budget.should_stop());
    }

    #[test]
    fn interrupts_are_shared_between_clones() {
        let mut interrupt = Interrupt::default();
        let handle = interrupt.clone();
        assert!(!interrupt.should_stop());

        handle.trigger();

        assert!(interrupt.should_stop());
    }
}
