use crate::containers::KeyedVec;
use crate::graph::ClauseId;

/// The state of a complex clause during one traversal run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseStatus {
    /// None of the literals of the clause has been falsified in this run.
    Untouched,
    /// At least one literal has been falsified; `undetermined` literals were unassigned at the
    /// last scan.
    Open { undetermined: u32 },
    /// A literal of the clause holds.
    Satisfied,
    /// A single literal was left and has been propagated.
    Unit,
}

/// The open-clause index of a traversal run: a status per clause of the arena, the clauses
/// opened so far (in order) and the clauses touched since the last scan.
#[derive(Debug, Clone)]
pub struct OpenClauses {
    status: KeyedVec<ClauseId, ClauseStatus>,
    queued: KeyedVec<ClauseId, bool>,
    opened: Vec<ClauseId>,
    pending: Vec<ClauseId>,
}

impl OpenClauses {
    pub(crate) fn new(num_clauses: usize) -> OpenClauses {
        OpenClauses {
            status: KeyedVec::filled(num_clauses, ClauseStatus::Untouched),
            queued: KeyedVec::filled(num_clauses, false),
            opened: vec![],
            pending: vec![],
        }
    }

    pub fn status(&self, clause: ClauseId) -> ClauseStatus {
        self.status[clause]
    }

    pub fn is_open(&self, clause: ClauseId) -> bool {
        matches!(self.status[clause], ClauseStatus::Open { .. })
    }

    /// The clauses which are currently open, in the order they were opened.
    pub fn open_clauses(&self) -> impl Iterator<Item = ClauseId> + '_ {
        self.opened
            .iter()
            .copied()
            .filter(|&clause| self.is_open(clause))
    }

    /// The clauses opened in this run, including those which have been closed since.
    pub(crate) fn opened(&self) -> &[ClauseId] {
        &self.opened
    }

    /// Records that a literal of `clause` has been falsified, so that it is scanned in the next
    /// round. Clauses which are already decided are ignored.
    pub(crate) fn touch(&mut self, clause: ClauseId, size: usize) {
        match self.status[clause] {
            ClauseStatus::Untouched => {
                self.status[clause] = ClauseStatus::Open {
                    undetermined: size as u32,
                };
                self.opened.push(clause);
            }
            ClauseStatus::Open { .. } => {}
            ClauseStatus::Satisfied | ClauseStatus::Unit => return,
        }

        if !self.queued[clause] {
            self.queued[clause] = true;
            self.pending.push(clause);
        }
    }

    /// Removes and returns the clauses touched since the previous call.
    pub(crate) fn take_pending(&mut self) -> Vec<ClauseId> {
        for &clause in &self.pending {
            self.queued[clause] = false;
        }
        std::mem::take(&mut self.pending)
    }

    pub(crate) fn set_status(&mut self, clause: ClauseId, status: ClauseStatus) {
        self.status[clause] = status;
    }

    /// Forgets everything about the current run. Only the opened clauses are visited.
    pub(crate) fn reset(&mut self) {
        for &clause in &self.opened {
            self.status[clause] = ClauseStatus::Untouched;
        }
        for &clause in &self.pending {
            self.queued[clause] = false;
        }
        self.opened.clear();
        self.pending.clear();
    }
}
