use crate::basic_types::Literal;
use crate::basic_types::Variable;
use crate::create_statistics_struct;
use crate::statistics::log_statistic_postfix;
use crate::statistics::should_log_statistics;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

create_statistics_struct!(
    /// Counters of a single core/dead analysis run.
    AnalysisStatistics {
        /// Satisfiability queries, including the initial ones.
        num_oracle_calls: u64,
        /// Queries which tested whether a single candidate is forced.
        num_probes: u64,
        num_forced_by_probe: u64,
        /// Literals forced by propagation through the graph, beyond the seeds.
        num_forced_by_propagation: u64,
        /// Candidates ruled out because a solution falsified them.
        num_eliminated_by_models: u64,
        num_timeouts: u64,
    }
);

impl AnalysisStatistics {
    /// Logs the statistics under `prefix`, if statistic logging is configured.
    pub fn log_statistics(&self, prefix: &str) {
        if should_log_statistics() {
            self.log(StatisticLogger::new([prefix]));
            log_statistic_postfix();
        }
    }
}

/// The outcome of a core/dead analysis.
///
/// `forced` contains the literals which hold in every solution consistent with the assumptions,
/// including the assumptions themselves. A variable which is in neither `forced` nor
/// `undetermined` is free, unless the run was interrupted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreDeadResult {
    pub(crate) forced: Vec<Literal>,
    pub(crate) undetermined: Vec<Variable>,
    pub(crate) interrupted: bool,
    pub(crate) statistics: AnalysisStatistics,
}

impl CoreDeadResult {
    pub fn forced(&self) -> &[Literal] {
        &self.forced
    }

    /// Variables whose probe timed out, so nothing is known about them.
    pub fn undetermined(&self) -> &[Variable] {
        &self.undetermined
    }

    /// Whether the termination condition stopped the run before every candidate was probed.
    pub fn is_interrupted(&self) -> bool {
        self.interrupted
    }

    pub fn statistics(&self) -> AnalysisStatistics {
        self.statistics
    }

    pub fn is_forced(&self, literal: Literal) -> bool {
        self.forced.contains(&literal)
    }

    /// Variables which are true in every solution.
    pub fn core(&self) -> impl Iterator<Item = Variable> + '_ {
        self.forced
            .iter()
            .filter(|literal| literal.is_positive())
            .map(|literal| literal.variable())
    }

    /// Variables which are false in every solution.
    pub fn dead(&self) -> impl Iterator<Item = Variable> + '_ {
        self.forced
            .iter()
            .filter(|literal| literal.is_negative())
            .map(|literal| literal.variable())
    }

    pub fn into_forced(self) -> Vec<Literal> {
        self.forced
    }
}
