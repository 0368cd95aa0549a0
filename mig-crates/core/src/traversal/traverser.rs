use super::open_clauses::ClauseStatus;
use super::OpenClauses;
use super::VisitResult;
use super::Visitor;
use crate::basic_types::Configuration;
use crate::basic_types::Literal;
use crate::containers::KeyedVec;
use crate::graph::ClauseId;
use crate::graph::ModalImplicationGraph;
use crate::mig_asserts::mig_assert_eq_simple;

/// Why a traversal found the assignment to be inconsistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conflict {
    /// The literal had to be assigned but its negation already holds.
    Assignment(Literal),
    /// All literals of the complex clause are false.
    Clause(ClauseId),
}

/// The result of a traversal run.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalOutcome {
    /// Propagation reached a fixpoint.
    Fixpoint,
    /// The visitor returned [`VisitResult::Cancel`].
    Cancelled,
    Conflict(Conflict),
}

impl TraversalOutcome {
    pub fn is_conflict(&self) -> bool {
        matches!(self, TraversalOutcome::Conflict(_))
    }
}

/// The outcome of scanning one open clause.
enum Scan {
    Decided,
    Open,
    Unit(Literal),
    Falsified,
}

/// Propagates assignments over a [`ModalImplicationGraph`].
///
/// A traverser borrows the graph and owns the per-run bookkeeping: which vertices have been
/// expanded, which literals have been visited weakly and which complex clauses are open. The
/// assignment itself lives in a [`Configuration`] owned by the caller, which is only ever
/// extended; a conflict leaves the writes made before it in place.
///
/// Consecutive calls to [`Traverser::propagate_strong`] and [`Traverser::propagate`] build on
/// each other until [`Traverser::reset`] is called, so that only the consequences of new
/// literals are visited. The caller is responsible for resetting the traverser whenever the
/// configuration is replaced.
#[derive(Debug)]
pub struct Traverser<'mig> {
    mig: &'mig ModalImplicationGraph,
    /// Vertices whose strong edges and clauses have been processed in this run.
    expanded: KeyedVec<Literal, bool>,
    /// Literals which have been reported through [`Visitor::visit_weak`] in this run.
    weakly_visited: KeyedVec<Literal, bool>,
    open_clauses: OpenClauses,
    /// Index into the opened clauses up to which the weak pass has been performed.
    weak_cursor: usize,
    strong_stack: Vec<Literal>,
    weak_stack: Vec<Literal>,
}

impl<'mig> Traverser<'mig> {
    pub fn new(mig: &'mig ModalImplicationGraph) -> Traverser<'mig> {
        Traverser {
            mig,
            expanded: KeyedVec::filled(mig.num_vertices(), false),
            weakly_visited: KeyedVec::filled(mig.num_vertices(), false),
            open_clauses: OpenClauses::new(mig.num_clauses()),
            weak_cursor: 0,
            strong_stack: vec![],
            weak_stack: vec![],
        }
    }

    pub fn mig(&self) -> &'mig ModalImplicationGraph {
        self.mig
    }

    /// The open-clause index of the current run.
    pub fn open_clauses(&self) -> &OpenClauses {
        &self.open_clauses
    }

    /// Forgets the current run; the next propagation starts from scratch.
    pub fn reset(&mut self) {
        self.expanded.fill(false);
        self.weakly_visited.fill(false);
        self.open_clauses.reset();
        self.weak_cursor = 0;
        self.strong_stack.clear();
        self.weak_stack.clear();
    }

    /// Assigns `literals` and everything reachable from them through strong edges.
    ///
    /// Every literal which becomes true is reported through [`Visitor::visit_strong`]. The seeds
    /// are always expanded, even when they already held; literals reached through edges are only
    /// processed when they were unassigned. Complex clauses touched on the way are opened but not
    /// scanned.
    pub fn propagate_strong<V: Visitor + ?Sized>(
        &mut self,
        configuration: &mut Configuration,
        visitor: &mut V,
        literals: &[Literal],
    ) -> TraversalOutcome {
        mig_assert_eq_simple!(configuration.num_variables(), self.mig.num_variables());

        for &literal in literals {
            let outcome = self.assume(configuration, visitor, literal);
            if outcome != TraversalOutcome::Fixpoint {
                return outcome;
            }
        }

        TraversalOutcome::Fixpoint
    }

    /// Assigns `literals` and propagates until a fixpoint is reached.
    ///
    /// On top of [`Traverser::propagate_strong`], open complex clauses are scanned: a clause
    /// without undetermined literals is a conflict, a clause with a single undetermined literal
    /// forces it. Once nothing is forced any more, the literals of the open clauses are
    /// traversed weakly: from every weakly visited literal the traversal continues along its
    /// strong edges and into the clauses it would open, visiting only unassigned literals. A
    /// literal which is not visited in any call of a run is either assigned or cannot follow from
    /// the assignment.
    pub fn propagate<V: Visitor + ?Sized>(
        &mut self,
        configuration: &mut Configuration,
        visitor: &mut V,
        literals: &[Literal],
    ) -> TraversalOutcome {
        let outcome = self.propagate_strong(configuration, visitor, literals);
        if outcome != TraversalOutcome::Fixpoint {
            return outcome;
        }

        loop {
            let outcome = self.propagate_units(configuration, visitor);
            if outcome != TraversalOutcome::Fixpoint {
                return outcome;
            }

            let selected = match self.traverse_weakly(configuration, visitor) {
                Some(selected) => selected,
                None => return TraversalOutcome::Cancelled,
            };
            if selected.is_empty() {
                return TraversalOutcome::Fixpoint;
            }

            for literal in selected {
                if configuration.truth_value(literal).is_some() {
                    continue;
                }
                self.strong_stack.push(literal);
                let outcome = self.close_strongly(configuration, visitor);
                if outcome != TraversalOutcome::Fixpoint {
                    return outcome;
                }
            }
        }
    }

    fn assume<V: Visitor + ?Sized>(
        &mut self,
        configuration: &mut Configuration,
        visitor: &mut V,
        literal: Literal,
    ) -> TraversalOutcome {
        match configuration.assign(literal) {
            Err(_) => return TraversalOutcome::Conflict(Conflict::Assignment(literal)),
            Ok(false) => {
                if !self.expanded[literal] {
                    self.expand(literal);
                }
            }
            Ok(true) => match visitor.visit_strong(literal) {
                VisitResult::Cancel => return TraversalOutcome::Cancelled,
                VisitResult::Skip => self.expanded[literal] = true,
                VisitResult::Continue | VisitResult::Select => self.expand(literal),
            },
        }

        self.close_strongly(configuration, visitor)
    }

    /// Drains the strong stack, assigning every unassigned literal on it.
    fn close_strongly<V: Visitor + ?Sized>(
        &mut self,
        configuration: &mut Configuration,
        visitor: &mut V,
    ) -> TraversalOutcome {
        while let Some(literal) = self.strong_stack.pop() {
            match configuration.assign(literal) {
                Err(_) => {
                    self.strong_stack.clear();
                    return TraversalOutcome::Conflict(Conflict::Assignment(literal));
                }
                Ok(false) => {}
                Ok(true) => match visitor.visit_strong(literal) {
                    VisitResult::Cancel => {
                        self.strong_stack.clear();
                        return TraversalOutcome::Cancelled;
                    }
                    VisitResult::Skip => self.expanded[literal] = true,
                    VisitResult::Continue | VisitResult::Select => self.expand(literal),
                },
            }
        }

        TraversalOutcome::Fixpoint
    }

    /// Opens the clauses of the vertex of `literal` and schedules its strong successors.
    fn expand(&mut self, literal: Literal) {
        self.expanded[literal] = true;

        let vertex = self.mig.vertex(literal);
        for &clause in vertex.clauses() {
            self.open_clauses.touch(clause, self.mig.clause(clause).len());
        }
        self.strong_stack
            .extend(vertex.strong_edges().iter().rev().copied());
    }

    /// Scans the touched clauses until no clause forces a literal any more.
    fn propagate_units<V: Visitor + ?Sized>(
        &mut self,
        configuration: &mut Configuration,
        visitor: &mut V,
    ) -> TraversalOutcome {
        loop {
            let pending = self.open_clauses.take_pending();
            if pending.is_empty() {
                return TraversalOutcome::Fixpoint;
            }

            for clause in pending {
                match self.scan(clause, configuration) {
                    Scan::Decided | Scan::Open => {}
                    Scan::Falsified => return TraversalOutcome::Conflict(Conflict::Clause(clause)),
                    Scan::Unit(literal) => {
                        self.strong_stack.push(literal);
                        let outcome = self.close_strongly(configuration, visitor);
                        if outcome != TraversalOutcome::Fixpoint {
                            return outcome;
                        }
                    }
                }
            }
        }
    }

    fn scan(&mut self, clause: ClauseId, configuration: &Configuration) -> Scan {
        if !self.open_clauses.is_open(clause) {
            return Scan::Decided;
        }

        let mut undetermined = 0;
        let mut last_undetermined = None;
        for &literal in self.mig.clause(clause).iter() {
            match configuration.truth_value(literal) {
                Some(true) => {
                    self.open_clauses
                        .set_status(clause, ClauseStatus::Satisfied);
                    return Scan::Decided;
                }
                Some(false) => {}
                None => {
                    undetermined += 1;
                    last_undetermined = Some(literal);
                }
            }
        }

        match (undetermined, last_undetermined) {
            (1, Some(literal)) => {
                self.open_clauses.set_status(clause, ClauseStatus::Unit);
                Scan::Unit(literal)
            }
            (_, None) => Scan::Falsified,
            (undetermined, Some(_)) => {
                self.open_clauses
                    .set_status(clause, ClauseStatus::Open { undetermined });
                Scan::Open
            }
        }
    }

    /// Weakly visits everything reachable from the clauses opened since the previous weak pass.
    ///
    /// Returns the literals the visitor selected, or [`None`] if it cancelled.
    fn traverse_weakly<V: Visitor + ?Sized>(
        &mut self,
        configuration: &Configuration,
        visitor: &mut V,
    ) -> Option<Vec<Literal>> {
        let mut selected = vec![];

        while self.weak_cursor < self.open_clauses.opened().len() {
            let clause = self.open_clauses.opened()[self.weak_cursor];
            self.weak_cursor += 1;

            if !self.open_clauses.is_open(clause) {
                continue;
            }
            self.weak_stack
                .extend(self.mig.clause(clause).iter().rev().copied());
            if !self.drain_weak_stack(configuration, visitor, &mut selected) {
                return None;
            }
        }

        Some(selected)
    }

    fn drain_weak_stack<V: Visitor + ?Sized>(
        &mut self,
        configuration: &Configuration,
        visitor: &mut V,
        selected: &mut Vec<Literal>,
    ) -> bool {
        while let Some(literal) = self.weak_stack.pop() {
            if self.weakly_visited[literal] || configuration.truth_value(literal).is_some() {
                continue;
            }
            self.weakly_visited[literal] = true;

            match visitor.visit_weak(literal) {
                VisitResult::Cancel => {
                    self.weak_stack.clear();
                    return false;
                }
                VisitResult::Skip => {}
                VisitResult::Select => selected.push(literal),
                VisitResult::Continue => {
                    let vertex = self.mig.vertex(literal);
                    self.weak_stack
                        .extend(vertex.strong_edges().iter().rev().copied());

                    for &clause in vertex.clauses() {
                        let literals = self.mig.clause(clause).literals();
                        if literals
                            .iter()
                            .any(|&other| configuration.is_true(other))
                        {
                            continue;
                        }
                        self.weak_stack.extend(
                            literals
                                .iter()
                                .rev()
                                .copied()
                                .filter(|&other| other != !literal),
                        );
                    }
                }
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::HashMap;
    use crate::traversal::CollectingVisitor;

    fn lit(value: i32) -> Literal {
        Literal::from_dimacs(value)
    }

    fn lits(values: &[i32]) -> Vec<Literal> {
        values.iter().copied().map(lit).collect()
    }

    fn clause(values: &[i32]) -> Box<[Literal]> {
        let mut literals = lits(values);
        literals.sort();
        literals.into_boxed_slice()
    }

    /// Records every visit and answers according to a script, [`VisitResult::Continue`] by
    /// default.
    #[derive(Default)]
    struct ScriptedVisitor {
        strong_answers: HashMap<Literal, VisitResult>,
        weak_answers: HashMap<Literal, VisitResult>,
        strong: Vec<Literal>,
        weak: Vec<Literal>,
    }

    impl Visitor for ScriptedVisitor {
        fn visit_strong(&mut self, literal: Literal) -> VisitResult {
            self.strong.push(literal);
            self.strong_answers
                .get(&literal)
                .copied()
                .unwrap_or(VisitResult::Continue)
        }

        fn visit_weak(&mut self, literal: Literal) -> VisitResult {
            self.weak.push(literal);
            self.weak_answers
                .get(&literal)
                .copied()
                .unwrap_or(VisitResult::Continue)
        }
    }

    /// The chain `1 -> 2 -> 3` together with the clause `-2 ∨ 4 ∨ 5`.
    fn chain_with_clause() -> ModalImplicationGraph {
        let mut mig = ModalImplicationGraph::new(5);
        let _ = mig.add_strong_edge(lit(1), lit(2));
        let _ = mig.add_strong_edge(lit(2), lit(3));
        let _ = mig.add_complex_clause(clause(&[-2, 4, 5]));
        mig
    }

    #[test]
    fn strong_propagation_follows_edges_transitively() {
        let mig = chain_with_clause();
        let mut traverser = Traverser::new(&mig);
        let mut configuration = Configuration::new(5);
        let mut visitor = ScriptedVisitor::default();

        let outcome = traverser.propagate_strong(&mut configuration, &mut visitor, &lits(&[1]));

        assert_eq!(outcome, TraversalOutcome::Fixpoint);
        assert_eq!(visitor.strong, lits(&[1, 2, 3]));
        assert!(visitor.weak.is_empty());
        assert_eq!(configuration.num_assigned(), 3);
        assert_eq!(traverser.open_clauses().open_clauses().count(), 1);
    }

    #[test]
    fn open_clauses_are_traversed_weakly() {
        let mig = chain_with_clause();
        let mut traverser = Traverser::new(&mig);
        let mut configuration = Configuration::new(5);
        let mut visitor = CollectingVisitor::new();

        let outcome = traverser.propagate(&mut configuration, &mut visitor, &lits(&[1]));

        assert_eq!(outcome, TraversalOutcome::Fixpoint);
        assert_eq!(visitor.computed(), lits(&[1, 2, 3]).as_slice());
        assert_eq!(visitor.to_compute(), lits(&[4, 5]).as_slice());
        assert!(!configuration.is_assigned(lit(4).variable()));
    }

    #[test]
    fn clauses_with_a_single_undetermined_literal_force_it() {
        let mig = chain_with_clause();
        let mut traverser = Traverser::new(&mig);
        let mut configuration = Configuration::new(5);
        let mut visitor = CollectingVisitor::new();

        let outcome = traverser.propagate(&mut configuration, &mut visitor, &lits(&[-4, 1]));

        assert_eq!(outcome, TraversalOutcome::Fixpoint);
        assert_eq!(visitor.computed(), lits(&[-4, 1, 2, 3, 5]).as_slice());
        assert!(visitor.to_compute().is_empty());
        assert!(configuration.is_true(lit(5)));
    }

    #[test]
    fn falsified_clauses_are_conflicts() {
        let mig = chain_with_clause();
        let mut traverser = Traverser::new(&mig);
        let mut configuration = Configuration::new(5);
        let mut visitor = CollectingVisitor::new();

        let outcome = traverser.propagate(&mut configuration, &mut visitor, &lits(&[-4, -5, 2]));

        assert_eq!(
            outcome,
            TraversalOutcome::Conflict(Conflict::Clause(mig.vertex(lit(2)).clauses()[0]))
        );
    }

    #[test]
    fn contradicting_strong_edges_are_conflicts() {
        let mut mig = ModalImplicationGraph::new(2);
        let _ = mig.add_strong_edge(lit(1), lit(2));
        let _ = mig.add_strong_edge(lit(1), lit(-2));
        let mut traverser = Traverser::new(&mig);
        let mut configuration = Configuration::new(2);
        let mut visitor = CollectingVisitor::new();

        let outcome = traverser.propagate_strong(&mut configuration, &mut visitor, &lits(&[1]));

        assert!(outcome.is_conflict());
        assert!(configuration.is_true(lit(1)));
    }

    #[test]
    fn seeds_contradicting_the_configuration_are_conflicts() {
        let mig = chain_with_clause();
        let mut traverser = Traverser::new(&mig);
        let mut configuration = Configuration::new(5);
        let mut visitor = CollectingVisitor::new();
        let _ = configuration.assign(lit(-3));

        let outcome = traverser.propagate_strong(&mut configuration, &mut visitor, &lits(&[3]));

        assert_eq!(
            outcome,
            TraversalOutcome::Conflict(Conflict::Assignment(lit(3)))
        );
    }

    #[test]
    fn assigned_seeds_are_expanded_without_a_visit() {
        let mig = chain_with_clause();
        let mut traverser = Traverser::new(&mig);
        let mut configuration = Configuration::new(5);
        let mut visitor = ScriptedVisitor::default();
        let _ = configuration.assign(lit(1));

        let outcome = traverser.propagate_strong(&mut configuration, &mut visitor, &lits(&[1]));

        assert_eq!(outcome, TraversalOutcome::Fixpoint);
        assert_eq!(visitor.strong, lits(&[2, 3]));
    }

    #[test]
    fn skip_keeps_the_assignment_but_stops_propagation() {
        let mig = chain_with_clause();
        let mut traverser = Traverser::new(&mig);
        let mut configuration = Configuration::new(5);
        let mut visitor = ScriptedVisitor::default();
        let _ = visitor.strong_answers.insert(lit(2), VisitResult::Skip);

        let outcome = traverser.propagate(&mut configuration, &mut visitor, &lits(&[1]));

        assert_eq!(outcome, TraversalOutcome::Fixpoint);
        assert!(configuration.is_true(lit(2)));
        assert!(!configuration.is_assigned(lit(3).variable()));
        assert!(visitor.weak.is_empty());
    }

    #[test]
    fn cancel_stops_immediately_and_keeps_writes() {
        let mig = chain_with_clause();
        let mut traverser = Traverser::new(&mig);
        let mut configuration = Configuration::new(5);
        let mut visitor = ScriptedVisitor::default();
        let _ = visitor.strong_answers.insert(lit(2), VisitResult::Cancel);

        let outcome = traverser.propagate(&mut configuration, &mut visitor, &lits(&[1]));

        assert_eq!(outcome, TraversalOutcome::Cancelled);
        assert_eq!(visitor.strong, lits(&[1, 2]));
        assert!(configuration.is_true(lit(2)));
        assert!(!configuration.is_assigned(lit(3).variable()));
    }

    #[test]
    fn selected_weak_literals_become_assumptions() {
        let mig = chain_with_clause();
        let mut traverser = Traverser::new(&mig);
        let mut configuration = Configuration::new(5);
        let mut visitor = ScriptedVisitor::default();
        let _ = visitor.weak_answers.insert(lit(4), VisitResult::Select);

        let outcome = traverser.propagate(&mut configuration, &mut visitor, &lits(&[1]));

        assert_eq!(outcome, TraversalOutcome::Fixpoint);
        assert!(configuration.is_true(lit(4)));
        assert_eq!(visitor.strong, lits(&[1, 2, 3, 4]));
        assert_eq!(visitor.weak, lits(&[4, 5]));
    }

    #[test]
    fn weak_traversal_continues_through_strong_edges_and_clauses() {
        // -1 ∨ 2 ∨ 3, 3 -> 4, -4 ∨ 5 ∨ 6
        let mut mig = ModalImplicationGraph::new(6);
        let _ = mig.add_complex_clause(clause(&[-1, 2, 3]));
        let _ = mig.add_strong_edge(lit(3), lit(4));
        let _ = mig.add_complex_clause(clause(&[-4, 5, 6]));
        let mut traverser = Traverser::new(&mig);
        let mut configuration = Configuration::new(6);
        let mut visitor = CollectingVisitor::new();

        let outcome = traverser.propagate(&mut configuration, &mut visitor, &lits(&[1]));

        assert_eq!(outcome, TraversalOutcome::Fixpoint);
        let mut to_compute = visitor.to_compute().to_vec();
        to_compute.sort();
        assert_eq!(to_compute, lits(&[2, 3, 4, 5, 6]));
    }

    #[test]
    fn propagating_again_reports_nothing_new() {
        let mig = chain_with_clause();
        let mut traverser = Traverser::new(&mig);
        let mut configuration = Configuration::new(5);
        let mut visitor = CollectingVisitor::new();
        let _ = traverser.propagate(&mut configuration, &mut visitor, &lits(&[1]));
        visitor.clear();

        let outcome = traverser.propagate(&mut configuration, &mut visitor, &[]);

        assert_eq!(outcome, TraversalOutcome::Fixpoint);
        assert!(visitor.computed().is_empty());
        assert!(visitor.to_compute().is_empty());
    }

    #[test]
    fn reset_starts_a_fresh_run() {
        let mig = chain_with_clause();
        let mut traverser = Traverser::new(&mig);
        let mut visitor = CollectingVisitor::new();
        let mut configuration = Configuration::new(5);
        let _ = traverser.propagate(&mut configuration, &mut visitor, &lits(&[1]));

        traverser.reset();
        visitor.clear();
        let mut configuration = Configuration::new(5);
        let _ = traverser.propagate(&mut configuration, &mut visitor, &lits(&[1]));

        assert_eq!(visitor.computed(), lits(&[1, 2, 3]).as_slice());
        assert_eq!(visitor.to_compute(), lits(&[4, 5]).as_slice());
    }
}
