use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, trace};

use crate::cost::CostMatrix;
use crate::error::Infeasible;
use crate::model::condition::Weight;
use crate::model::entity::UnitIndex;

/// Order in which receivers are preferred when several assignments share the
/// minimum cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Lowest receiver index first.
    #[default]
    InputOrder,
    /// A seeded shuffle of the receivers.
    Seeded(u64),
}

impl TieBreak {
    /// Rank of every receiver; lower is preferred.
    fn ranks(self, size: usize) -> Vec<usize> {
        let mut order: Vec<UnitIndex> = (0..size).collect();
        if let TieBreak::Seeded(seed) = self {
            order.shuffle(&mut SmallRng::seed_from_u64(seed));
        }
        let mut ranks = vec![0; size];
        for (rank, receiver) in order.into_iter().enumerate() {
            ranks[receiver] = rank;
        }
        ranks
    }
}

/// A perfect matching: giver `i` gives to `receivers[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub receivers: Vec<UnitIndex>,
    pub cost: Weight,
}

impl Assignment {
    pub fn pairs(&self) -> impl Iterator<Item = (UnitIndex, UnitIndex)> + '_ {
        self.receivers.iter().copied().enumerate()
    }
}

/// Dense cost view where forbidden cells carry a sentinel larger than the sum
/// of every open cell.
struct Costs<'a> {
    matrix: &'a CostMatrix,
    forbidden: i128,
}

impl<'a> Costs<'a> {
    fn new(matrix: &'a CostMatrix) -> Self {
        let forbidden = matrix.open_total() as i128 + 1;
        Costs { matrix, forbidden }
    }

    fn get(&self, giver: UnitIndex, receiver: UnitIndex) -> i128 {
        self.matrix.get(giver, receiver).cost().map_or(self.forbidden, i128::from)
    }

    /// Optimal matching of `rows` onto `cols` (equal lengths), returned as a
    /// column per row together with its total.
    fn solve(&self, rows: &[UnitIndex], cols: &[UnitIndex]) -> (i128, Vec<UnitIndex>) {
        let local = hungarian(rows.len(), |i, j| self.get(rows[i], cols[j]));
        let total: i128 = local.iter().enumerate().map(|(i, &j)| self.get(rows[i], cols[j])).sum();
        (total, local.into_iter().map(|j| cols[j]).collect())
    }
}

/// Kuhn-Munkres with row/column potentials, O(n^3). Returns the column
/// assigned to each row.
fn hungarian<F>(n: usize, cost: F) -> Vec<usize>
where
    F: Fn(usize, usize) -> i128,
{
    let inf = i128::MAX / 4;
    // 1-based; index 0 is the virtual column used while augmenting
    let mut u = vec![0i128; n + 1];
    let mut v = vec![0i128; n + 1];
    let mut matched = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for row in 1..=n {
        matched[0] = row;
        let mut j0 = 0;
        let mut min_slack = vec![inf; n + 1];
        let mut used = vec![false; n + 1];
        loop {
            used[j0] = true;
            let i0 = matched[j0];
            let mut delta = inf;
            let mut j1 = 0;
            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let slack = cost(i0 - 1, j - 1) - u[i0] - v[j];
                if slack < min_slack[j] {
                    min_slack[j] = slack;
                    way[j] = j0;
                }
                if min_slack[j] < delta {
                    delta = min_slack[j];
                    j1 = j;
                }
            }
            for j in 0..=n {
                if used[j] {
                    u[matched[j]] += delta;
                    v[j] -= delta;
                } else {
                    min_slack[j] -= delta;
                }
            }
            j0 = j1;
            if matched[j0] == 0 {
                break;
            }
        }
        loop {
            let j1 = way[j0];
            matched[j0] = matched[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut assignment = vec![0; n];
    for col in 1..=n {
        if matched[col] != 0 {
            assignment[matched[col] - 1] = col - 1;
        }
    }
    assignment
}

/// Finds a minimum-cost permutation that avoids every forbidden cell.
///
/// Among equal-cost optima the receiver sequence, read in giver order, is the
/// lexicographically smallest under `tie_break`'s ranking: each giver in turn
/// is fixed to its most preferred receiver that still admits an optimal
/// completion.
pub fn solve(matrix: &CostMatrix, tie_break: TieBreak) -> Result<Assignment, Infeasible> {
    let size = matrix.size();
    let costs = Costs::new(matrix);
    let all: Vec<UnitIndex> = (0..size).collect();
    let (optimum, mut incumbent) = costs.solve(&all, &all);
    if optimum >= costs.forbidden {
        debug!(size, "optimum uses a forbidden cell");
        return Err(Infeasible);
    }

    let ranks = tie_break.ranks(size);
    let mut fixed = 0i128;
    let mut taken = vec![false; size];
    for giver in 0..size {
        let mut candidates: Vec<UnitIndex> = (0..size)
            .filter(|&receiver| !taken[receiver] && matrix.get(giver, receiver).is_open())
            .collect();
        candidates.sort_by_key(|&receiver| ranks[receiver]);

        let rows: Vec<UnitIndex> = (giver + 1..size).collect();
        for receiver in candidates {
            if receiver == incumbent[giver] {
                break;
            }
            let cols: Vec<UnitIndex> = (0..size)
                .filter(|&col| !taken[col] && col != receiver)
                .collect();
            let (rest, completion) = costs.solve(&rows, &cols);
            if fixed + costs.get(giver, receiver) + rest == optimum {
                trace!(giver, receiver, "preferred receiver keeps the optimum");
                incumbent[giver] = receiver;
                incumbent[giver + 1..].copy_from_slice(&completion);
                break;
            }
        }
        fixed += costs.get(giver, incumbent[giver]);
        taken[incumbent[giver]] = true;
    }

    let cost = matrix.total(&incumbent).ok_or(Infeasible)?;
    debug!(size, cost, "assignment solved");
    Ok(Assignment { receivers: incumbent, cost })
}
