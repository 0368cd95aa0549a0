use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use super::TerminationCondition;

/// A [`TerminationCondition`] which triggers once any of its clones has been triggered, e.g. from
/// another thread.
#[derive(Clone, Debug, Default)]
pub struct Interrupt {
    triggered: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Interrupt {
        Interrupt::default()
    }

    /// Requests every holder of this interrupt to stop.
    pub fn trigger(&self) {
        self.triggered.store(true, Ordering::Relaxed);
    }
}

impl TerminationCondition for Interrupt {
    fn should_stop(&mut self) -> bool {
        self.triggered.load(Ordering::Relaxed)
    }
}
