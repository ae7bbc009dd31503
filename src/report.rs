use itertools::Itertools;

use crate::hungarian::Assignment;
use crate::model::condition::HistoryIndex;
use crate::model::entity::{Name, UnitIndex, Year};
use crate::model::group::Roster;

/// An individual giver -> receiver pair that already happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repeat {
    pub giver: Name,
    pub receiver: Name,
    pub last_year: Year,
}

/// A unit-level pairing that repeats history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compromise {
    pub giver: UnitIndex,
    pub receiver: UnitIndex,
    pub last_year: Year,
    pub repeats: Vec<Repeat>,
}

/// Compromises in giver order, one per unit pair with any individual repeat.
pub fn report(roster: &Roster, assignment: &Assignment, history: &HistoryIndex) -> Vec<Compromise> {
    assignment.pairs().filter_map(|(giver, receiver)| {
        let repeats = roster.units[giver].members.iter()
            .cartesian_product(roster.units[receiver].members.iter())
            .filter_map(|(g, r)| {
                history.get_pair(g, r).map(|pair| Repeat {
                    giver: g.clone(),
                    receiver: r.clone(),
                    last_year: pair.most_recent_year,
                })
            })
            .collect_vec();
        let last_year = repeats.iter().map(|repeat| repeat.last_year).max()?;
        Some(Compromise { giver, receiver, last_year, repeats })
    }).collect()
}
