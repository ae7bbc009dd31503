use std::fmt;

use tracing::debug;

use crate::model::condition::{HistoryIndex, Weight};
use crate::model::entity::UnitIndex;
use crate::model::group::Roster;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forbidden {
    SelfAssignment,
    Excluded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Open(Weight),
    Forbidden(Forbidden),
}

impl Cell {
    pub fn cost(self) -> Option<Weight> {
        match self {
            Cell::Open(weight) => Some(weight),
            Cell::Forbidden(_) => None,
        }
    }

    pub fn is_open(self) -> bool {
        matches!(self, Cell::Open(_))
    }
}

/// Square giver x receiver matrix over units, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostMatrix {
    size: usize,
    cells: Vec<Cell>,
}

impl CostMatrix {
    pub fn from_fn<F>(size: usize, mut cell: F) -> CostMatrix
    where
        F: FnMut(UnitIndex, UnitIndex) -> Cell,
    {
        let cells = (0..size)
            .flat_map(|giver| (0..size).map(move |receiver| (giver, receiver)))
            .map(|(giver, receiver)| cell(giver, receiver))
            .collect();
        CostMatrix { size, cells }
    }

    /// Builds the matrix from open costs, `None` marking a forbidden cell.
    /// The diagonal is always forbidden.
    pub fn from_rows(rows: &[Vec<Option<Weight>>]) -> CostMatrix {
        CostMatrix::from_fn(rows.len(), |giver, receiver| {
            match rows[giver][receiver] {
                _ if giver == receiver => Cell::Forbidden(Forbidden::SelfAssignment),
                Some(weight) => Cell::Open(weight),
                None => Cell::Forbidden(Forbidden::Excluded),
            }
        })
    }

    pub fn build(roster: &Roster, history: &HistoryIndex) -> CostMatrix {
        let matrix = CostMatrix::from_fn(roster.len(), |giver, receiver| {
            if giver == receiver {
                Cell::Forbidden(Forbidden::SelfAssignment)
            } else if roster.units[giver].excluded_units.contains(&receiver) {
                Cell::Forbidden(Forbidden::Excluded)
            } else {
                Cell::Open(roster.unit_weight(giver, receiver, history))
            }
        });
        debug!(size = matrix.size, open = matrix.open_count(), total = matrix.open_total(), "cost matrix built");
        matrix
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, giver: UnitIndex, receiver: UnitIndex) -> Cell {
        self.cells[giver * self.size + receiver]
    }

    pub fn open_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_open()).count()
    }

    /// Sum of every open cell; any feasible assignment costs at most this.
    pub fn open_total(&self) -> u128 {
        self.cells.iter().filter_map(|cell| cell.cost()).map(u128::from).sum()
    }

    /// Total cost of `receivers[giver]`, or `None` if it uses a forbidden cell.
    pub fn total(&self, receivers: &[UnitIndex]) -> Option<Weight> {
        receivers.iter().enumerate()
            .map(|(giver, &receiver)| self.get(giver, receiver).cost())
            .sum()
    }
}

impl fmt::Display for CostMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for giver in 0..self.size {
            for receiver in 0..self.size {
                if receiver > 0 {
                    write!(f, " ")?;
                }
                match self.get(giver, receiver) {
                    Cell::Open(weight) => write!(f, "{weight:>4}")?,
                    Cell::Forbidden(_) => write!(f, "{:>4}", "x")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
