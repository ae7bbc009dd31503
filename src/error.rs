use std::{io, path::PathBuf};
use thiserror::Error;

use crate::model::entity::{Name, Year};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("malformed config file {}: {source}", .path.display())]
    Parse { path: PathBuf, source: serde_json::Error },
    #[error("no participants configured")]
    NoParticipants,
    #[error("group #{unit} has no members")]
    EmptyUnit { unit: usize },
    #[error("group #{unit} contains an empty name")]
    EmptyName { unit: usize },
    #[error("{0} appears more than once among the participants")]
    DuplicateName(Name),
    #[error("group of {unit} excludes unknown participant {name}")]
    UnknownExclusion { unit: String, name: Name },
    #[error("group of {unit} excludes its own member {name}")]
    SelfExclusion { unit: String, name: Name },
    #[error("group of {unit} has no email address")]
    MissingEmail { unit: String },
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("cannot access history at {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("malformed history file {}: {source}", .path.display())]
    Parse { path: PathBuf, source: serde_json::Error },
    #[error("history file {} holds year {found}, expected {expected}", .path.display())]
    YearMismatch { path: PathBuf, expected: Year, found: Year },
    #[error("more than one history record for year {0}")]
    DuplicateYear(Year),
}

/// No permutation of receivers avoids every forbidden cell.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("no valid assignment exists under the configured exclusions")]
pub struct Infeasible;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
    #[error("cannot deliver message to {to}: {source}")]
    Delivery { to: String, source: io::Error },
    #[error("outbox {} already holds messages", .path.display())]
    OutboxNotEmpty { path: PathBuf },
    #[error("cannot prepare outbox {}: {source}", .path.display())]
    Outbox { path: PathBuf, source: io::Error },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error(transparent)]
    Infeasible(#[from] Infeasible),
    #[error("assignments for {year} already exist in {}", .path.display())]
    AlreadyDrawn { year: Year, path: PathBuf },
    #[error(transparent)]
    Notify(#[from] NotifyError),
    #[error("cannot write output: {0}")]
    Output(#[from] io::Error),
}
