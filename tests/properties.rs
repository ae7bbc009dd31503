use itertools::Itertools;
use proptest::prelude::*;

use gift_shuffle::config::MemberConfig;
use gift_shuffle::cost::CostMatrix;
use gift_shuffle::history::HistoryRecord;
use gift_shuffle::model::condition::HistoryIndex;
use gift_shuffle::model::entity::Year;
use gift_shuffle::model::group::Roster;
use gift_shuffle::{draw, DrawOptions, TieBreak};

type Pairs = Vec<(usize, usize)>;

fn name(index: usize) -> String {
    format!("P{index}")
}

fn scenario() -> impl Strategy<Value = (usize, Vec<Vec<bool>>, Vec<(Year, Pairs)>, Option<u64>)> {
    (2usize..=6).prop_flat_map(|n| {
        (
            Just(n),
            prop::collection::vec(prop::collection::vec(prop::bool::weighted(0.25), n), n),
            prop::collection::vec((2000i32..2030, prop::collection::vec((0..n, 0..n), 0..8)), 0..5),
            prop::option::of(any::<u64>()),
        )
    })
}

fn build(n: usize, excluded: &[Vec<bool>], records: &[(Year, Pairs)]) -> (Roster, HistoryIndex) {
    let members = (0..n).map(|giver| MemberConfig {
        group: vec![name(giver)],
        email: format!("{}@example.com", name(giver)),
        exclude: (0..n).filter(|&r| r != giver && excluded[giver][r]).map(name).collect(),
    }).collect_vec();
    let records = records.iter().map(|(year, pairs)| HistoryRecord {
        year: *year,
        pairs: pairs.iter().map(|&(g, r)| (name(g), name(r))).collect(),
    }).collect_vec();
    (Roster::build(&members).unwrap(), HistoryIndex::build(&records))
}

proptest! {
    #[test]
    fn draw_is_a_feasible_global_optimum((n, excluded, records, seed) in scenario()) {
        let (roster, history) = build(n, &excluded, &records);
        let matrix = CostMatrix::build(&roster, &history);
        let best = (0..n).permutations(n).filter_map(|perm| matrix.total(&perm)).min();
        let tie_break = seed.map_or(TieBreak::InputOrder, TieBreak::Seeded);

        match draw(&roster, &history, DrawOptions { tie_break, ..DrawOptions::default() }) {
            Ok(result) => {
                let receivers = &result.assignment.receivers;
                prop_assert_eq!(receivers.len(), n);
                prop_assert!(receivers.iter().all_unique());
                for (giver, &receiver) in receivers.iter().enumerate() {
                    prop_assert_ne!(giver, receiver);
                    prop_assert!(!roster.units[giver].excluded_units.contains(&receiver));
                }
                prop_assert_eq!(Some(result.assignment.cost), best);
            }
            Err(_) => prop_assert_eq!(best, None),
        }
    }

    #[test]
    fn same_inputs_give_the_same_draw((n, excluded, records, seed) in scenario()) {
        let (roster, history) = build(n, &excluded, &records);
        let tie_break = seed.map_or(TieBreak::InputOrder, TieBreak::Seeded);
        let options = DrawOptions { tie_break, ..DrawOptions::default() };
        let first = draw(&roster, &history, options).map(|d| d.assignment);
        let second = draw(&roster, &history, options).map(|d| d.assignment);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn newer_repeat_strictly_raises_weight((n, excluded, records, _seed) in scenario()) {
        let (_, before) = build(n, &excluded, &records);
        let latest = records.iter().map(|(year, _)| *year).max().unwrap_or(2000);
        let mut extended = records.clone();
        extended.push((latest + 1, vec![(0, 1)]));
        let (_, after) = build(n, &excluded, &extended);
        prop_assert!(after.weight(&name(0), &name(1)) > before.weight(&name(0), &name(1)));
        prop_assert_eq!(after.get_pair(&name(0), &name(1)).map(|p| p.most_recent_year), Some(latest + 1));
    }
}
