use std::collections::{BTreeSet, HashMap};

use itertools::Itertools;
use tracing::debug;

use crate::config::MemberConfig;
use crate::error::ConfigError;
use crate::model::condition::{HistoryIndex, Weight};
use crate::model::entity::{Unit, UnitIndex};
use crate::model::group::Roster;

impl Roster {
    /// Validates the configured groups and resolves exclusions to units.
    /// Units keep their declaration order.
    pub fn build(members: &[MemberConfig]) -> Result<Roster, ConfigError> {
        if members.is_empty() {
            return Err(ConfigError::NoParticipants);
        }

        let mut owners = HashMap::new();
        for (index, member) in members.iter().enumerate() {
            if member.group.is_empty() {
                return Err(ConfigError::EmptyUnit { unit: index });
            }
            if member.email.trim().is_empty() {
                return Err(ConfigError::MissingEmail { unit: member.group.iter().join(", ") });
            }
            for name in &member.group {
                if name.trim().is_empty() {
                    return Err(ConfigError::EmptyName { unit: index });
                }
                if owners.insert(name.clone(), index).is_some() {
                    return Err(ConfigError::DuplicateName(name.clone()));
                }
            }
        }

        let units = members.iter().enumerate().map(|(index, member)| -> Result<Unit, ConfigError> {
            let exclude: BTreeSet<_> = member.exclude.iter().cloned().collect();
            let excluded_units = exclude.iter().map(|name| {
                match owners.get(name) {
                    None => Err(ConfigError::UnknownExclusion {
                        unit: member.group.iter().join(", "),
                        name: name.clone(),
                    }),
                    Some(&owner) if owner == index => Err(ConfigError::SelfExclusion {
                        unit: member.group.iter().join(", "),
                        name: name.clone(),
                    }),
                    Some(&owner) => Ok(owner),
                }
            }).collect::<Result<BTreeSet<_>, _>>()?;
            Ok(Unit {
                members: member.group.clone(),
                email: member.email.clone(),
                exclude,
                excluded_units,
            })
        }).collect::<Result<Vec<_>, ConfigError>>()?;

        debug!(units = units.len(), people = owners.len(), "roster built");
        Ok(Roster { units, owners })
    }

    /// Sum of individual directed weights from every member of `giver` to
    /// every member of `receiver`.
    pub fn unit_weight(&self, giver: UnitIndex, receiver: UnitIndex, history: &HistoryIndex) -> Weight {
        let (giver, receiver) = (&self.units[giver], &self.units[receiver]);
        giver.members.iter()
            .cartesian_product(receiver.members.iter())
            .map(|(g, r)| history.weight(g, r))
            .sum()
    }
}
