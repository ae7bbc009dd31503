use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::condition::{HistoryIndex, PairWeight, Weight};
use crate::model::entity::{Name, Year};

/// One year of individual giver -> receiver pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub year: Year,
    pub pairs: Vec<(Name, Name)>,
}

impl HistoryIndex {
    /// Every occurrence of a pair in year `y` adds `y - min_year + 1`, so the
    /// oldest year weighs 1 and recent repeats weigh more.
    pub fn build(records: &[HistoryRecord]) -> HistoryIndex {
        let min_year = records.iter().map(|record| record.year).min();
        let mut index = HistoryIndex { min_year, ..HistoryIndex::default() };
        let Some(min_year) = min_year else {
            return index;
        };

        for record in records {
            let contribution = (i64::from(record.year) - i64::from(min_year) + 1) as Weight;
            for (giver, receiver) in &record.pairs {
                let entry = index.pairs
                    .entry(giver.clone()).or_default()
                    .entry(receiver.clone())
                    .or_insert(PairWeight { weight: 0, most_recent_year: record.year });
                entry.weight += contribution;
                entry.most_recent_year = entry.most_recent_year.max(record.year);
            }
        }
        debug!(records = records.len(), min_year, givers = index.pairs.len(), "history indexed");
        index
    }
}
