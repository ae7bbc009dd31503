pub mod entity {
    use std::collections::BTreeSet;

    use itertools::Itertools;

    pub type Name = String;
    pub type Year = i32;
    pub type UnitIndex = usize;

    /// One giving/receiving node: a single person, a couple or a family.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Unit {
        pub members: Vec<Name>,
        pub email: String,
        pub exclude: BTreeSet<Name>,
        /// Units owning a name from `exclude`, resolved by the roster.
        pub excluded_units: BTreeSet<UnitIndex>,
    }

    impl Unit {
        pub fn names(&self) -> String {
            self.members.iter().join(", ")
        }
    }
}


pub mod group {
    use std::collections::HashMap;
    use super::entity::{Name, Unit, UnitIndex};

    #[derive(Debug, Clone)]
    pub struct Roster {
        pub units: Vec<Unit>,
        pub owners: HashMap<Name, UnitIndex>,
    }

    impl Roster {
        pub fn len(&self) -> usize {
            self.units.len()
        }

        pub fn is_empty(&self) -> bool {
            self.units.is_empty()
        }

        pub fn owner_of(&self, name: &str) -> Option<UnitIndex> {
            self.owners.get(name).copied()
        }
    }
}

pub mod condition {
    use std::collections::HashMap;
    use super::entity::{Name, Year};

    pub type Weight = u64;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PairWeight {
        pub weight: Weight,
        pub most_recent_year: Year,
    }

    /// Directed giver -> receiver weights accumulated over all history records.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct HistoryIndex {
        pub pairs: HashMap<Name, HashMap<Name, PairWeight>>,
        pub min_year: Option<Year>,
    }

    impl HistoryIndex {
        pub fn get_pair(&self, giver: &str, receiver: &str) -> Option<&PairWeight> {
            self.pairs.get(giver)?.get(receiver)
        }

        pub fn weight(&self, giver: &str, receiver: &str) -> Weight {
            self.get_pair(giver, receiver).map_or(0, |pair| pair.weight)
        }

        pub fn is_empty(&self) -> bool {
            self.pairs.is_empty()
        }
    }
}
