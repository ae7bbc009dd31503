use std::io::Write;
use std::path::PathBuf;

use crate::config::Config;
use crate::engine::{self, Draw, DrawOptions, Mode};
use crate::error::Error;
use crate::hungarian::TieBreak;
use crate::model::condition::HistoryIndex;
use crate::model::entity::Year;
use crate::model::group::Roster;
use crate::notify::{self, ConsoleNotifier, Notifier, OutboxNotifier};
use crate::store::HistoryStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub config: PathBuf,
    pub history_dir: PathBuf,
    pub outbox: PathBuf,
    pub year: Year,
    pub mode: Mode,
    pub tie_break: TieBreak,
}

/// One full run: load, draw, render, then persist and deliver.
///
/// Everything that can fail without touching disk (config, history, solving,
/// template rendering, outbox checks) happens before the year's record is
/// written.
pub fn run<W: Write>(settings: &Settings, out: &mut W) -> Result<(), Error> {
    let year = settings.year;
    let config = Config::load(&settings.config)?;
    let roster = Roster::build(&config.members)?;

    let store = HistoryStore::open(&settings.history_dir)?;
    if let Some(path) = store.find(year)? {
        return Err(Error::AlreadyDrawn { year, path });
    }
    let history = HistoryIndex::build(&store.load()?);

    let options = DrawOptions { mode: settings.mode, tie_break: settings.tie_break };
    let draw = engine::draw(&roster, &history, options)?;
    let messages = notify::compose(year, &draw, &config.templates)?;

    if !draw.persist() {
        print_compromises(&draw, out)?;
        let mut console = ConsoleNotifier::new(&mut *out);
        for message in &messages {
            console.deliver(message)?;
        }
        return Ok(());
    }

    let mut outbox = OutboxNotifier::for_year(&settings.outbox, year)?;
    store.save(&draw.record(year))?;
    if draw.compromises.is_empty() {
        writeln!(out, "No compromises made, everyone is a new match!")?;
    } else {
        let path = store.write_compromises(year, &draw.compromise_lines())?;
        writeln!(out, "Total compromises: {} (details in {})", draw.compromises.len(), path.display())?;
    }
    for message in &messages {
        outbox.deliver(message)?;
    }
    writeln!(out, "Queued {} messages in {}", outbox.sent(), outbox.dir().display())?;
    Ok(())
}

fn print_compromises<W: Write>(draw: &Draw<'_>, out: &mut W) -> Result<(), Error> {
    if draw.compromises.is_empty() {
        writeln!(out, "No compromises made, everyone is a new match!")?;
        return Ok(());
    }
    writeln!(out, "Total compromises: {}", draw.compromises.len())?;
    for line in draw.compromise_lines() {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
