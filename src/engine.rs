use itertools::Itertools;
use tracing::{info, trace, warn};

use crate::cost::CostMatrix;
use crate::error::Infeasible;
use crate::history::HistoryRecord;
use crate::hungarian::{self, Assignment, TieBreak};
use crate::model::condition::HistoryIndex;
use crate::model::entity::{Name, Unit, Year};
use crate::model::group::Roster;
use crate::report::{self, Compromise};

/// Whether collaborators should persist the draw. The computation is the
/// same either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Commit,
    Trial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawOptions {
    pub mode: Mode,
    pub tie_break: TieBreak,
}

#[derive(Debug, Clone)]
pub struct Draw<'a> {
    pub roster: &'a Roster,
    pub mode: Mode,
    pub assignment: Assignment,
    pub compromises: Vec<Compromise>,
}

impl<'a> Draw<'a> {
    pub fn persist(&self) -> bool {
        self.mode == Mode::Commit
    }

    /// Giver unit and receiver unit for every giver, in declaration order.
    pub fn pairs(&self) -> impl Iterator<Item = (&'a Unit, &'a Unit)> + '_ {
        let roster: &'a Roster = self.roster;
        let units = &roster.units;
        self.assignment.pairs().map(move |(giver, receiver)| (&units[giver], &units[receiver]))
    }

    /// Every giver member paired with every member of the receiving unit.
    pub fn flattened(&self) -> Vec<(Name, Name)> {
        self.pairs()
            .flat_map(|(giver, receiver)| {
                giver.members.iter().cartesian_product(receiver.members.iter())
            })
            .map(|(g, r)| (g.clone(), r.clone()))
            .collect()
    }

    pub fn record(&self, year: Year) -> HistoryRecord {
        HistoryRecord { year, pairs: self.flattened() }
    }

    /// Human-readable compromise lines, one per individual repeat.
    pub fn compromise_lines(&self) -> Vec<String> {
        self.compromises.iter()
            .flat_map(|compromise| compromise.repeats.iter())
            .map(|repeat| format!("Compromise: {} already gave to {} in {}", repeat.giver, repeat.receiver, repeat.last_year))
            .collect()
    }
}

/// Builds the cost matrix, solves it and reports unavoidable repeats.
pub fn draw<'a>(roster: &'a Roster, history: &HistoryIndex, options: DrawOptions) -> Result<Draw<'a>, Infeasible> {
    let matrix = CostMatrix::build(roster, history);
    trace!("cost matrix:\n{matrix}");
    let assignment = hungarian::solve(&matrix, options.tie_break)
        .inspect_err(|_| warn!(units = roster.len(), "no assignment satisfies the exclusions"))?;
    let compromises = report::report(roster, &assignment, history);
    info!(
        units = roster.len(),
        cost = assignment.cost,
        compromises = compromises.len(),
        mode = ?options.mode,
        "draw complete"
    );
    Ok(Draw { roster, mode: options.mode, assignment, compromises })
}
