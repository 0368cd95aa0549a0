use std::fmt::Display;
use std::fmt::Formatter;
use std::io::Write;

use itertools::Itertools;

use super::ModalImplicationGraph;
use crate::basic_types::Variable;

/// How a variable relates to another variable in a [`ModalImplicationGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dependency {
    /// Selecting the source forces the target to be selected.
    Always,
    /// Selecting the source forces the target to be deselected.
    Never,
    /// Selecting the source may influence the target through a complex clause.
    Maybe,
}

impl Display for Dependency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Dependency::Always => write!(f, "ALWAYS"),
            Dependency::Never => write!(f, "NEVER"),
            Dependency::Maybe => write!(f, "MAYBE"),
        }
    }
}

/// The dependencies of every variable which is neither core nor dead, in variable order.
///
/// A variable depends on the targets of the strong edges of its positive literal, and maybe on
/// the variables sharing a complex clause with it. Core and dead targets are left out, as is the
/// variable itself; every pair of dependency and target is reported once per source.
pub fn dependencies(
    mig: &ModalImplicationGraph,
) -> impl Iterator<Item = (Variable, Dependency, Variable)> + '_ {
    mig.variables()
        .filter(move |&variable| !mig.vertex(variable.positive()).is_fixed())
        .flat_map(move |source| {
            let vertex = mig.vertex(source.positive());

            let strong = vertex.strong_edges().iter().map(|&target| {
                let dependency = if target.is_positive() {
                    Dependency::Always
                } else {
                    Dependency::Never
                };
                (dependency, target)
            });
            let weak = vertex.clauses().iter().flat_map(move |&clause| {
                mig.clause(clause)
                    .iter()
                    .map(|&target| (Dependency::Maybe, target))
            });

            strong
                .chain(weak)
                .filter(move |&(_, target)| {
                    target.variable() != source && !mig.vertex(target).is_fixed()
                })
                .map(|(dependency, target)| (dependency, target.variable()))
                .unique()
                .map(move |(dependency, target)| (source, dependency, target))
        })
}

/// Writes the dependencies of `mig` as lines `<source> <ALWAYS|NEVER|MAYBE> <target>`, naming
/// every variable with `names`.
pub fn write_dependencies<Name: Display>(
    mig: &ModalImplicationGraph,
    names: impl Fn(Variable) -> Name,
    writer: &mut impl Write,
) -> std::io::Result<()> {
    for (source, dependency, target) in dependencies(mig) {
        writeln!(writer, "{} {dependency} {}", names(source), names(target))?;
    }
    Ok(())
}
