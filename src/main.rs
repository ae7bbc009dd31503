use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Datelike;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gift_shuffle::app::{self, Settings};
use gift_shuffle::model::entity::Year;
use gift_shuffle::{Error, Mode, TieBreak};

const EXIT_CONFIG: u8 = 2;
const EXIT_HISTORY: u8 = 3;
const EXIT_INFEASIBLE: u8 = 4;
const EXIT_ALREADY_DRAWN: u8 = 5;
const EXIT_NOTIFY: u8 = 6;
const EXIT_OUTPUT: u8 = 7;

#[derive(Parser)]
#[command(name = "gift-shuffle")]
#[command(about = "Draw gift exchange pairs, avoiding exclusions and recent repeats")]
#[command(version)]
struct Cli {
    /// Print assignments instead of saving history and queueing messages
    #[arg(long)]
    dry_run: bool,

    /// Path to the participant config file
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Directory holding one <year>.json file per past draw
    #[arg(long, default_value = "history")]
    history_dir: PathBuf,

    /// Year to draw (defaults to the current year)
    #[arg(long)]
    year: Option<Year>,

    /// Seed for choosing among equally good draws
    #[arg(long)]
    seed: Option<u64>,

    /// Directory receiving one <year>/ folder of message files per draw
    #[arg(long, default_value = "outbox")]
    outbox: PathBuf,
}

impl Cli {
    fn settings(self) -> Settings {
        Settings {
            config: self.config,
            history_dir: self.history_dir,
            outbox: self.outbox,
            year: self.year.unwrap_or_else(|| chrono::Local::now().year()),
            mode: if self.dry_run { Mode::Trial } else { Mode::Commit },
            tie_break: self.seed.map_or(TieBreak::InputOrder, TieBreak::Seeded),
        }
    }
}

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    enable_tracing();
    let settings = Cli::parse().settings();
    match app::run(&settings, &mut io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = match &err {
                Error::Config(_) => EXIT_CONFIG,
                Error::History(_) => EXIT_HISTORY,
                Error::Infeasible(_) => EXIT_INFEASIBLE,
                Error::AlreadyDrawn { .. } => EXIT_ALREADY_DRAWN,
                Error::Notify(_) => EXIT_NOTIFY,
                Error::Output(_) => EXIT_OUTPUT,
            };
            match &err {
                Error::Infeasible(_) => eprintln!("error: {err}. Try adjusting the exclusions."),
                Error::AlreadyDrawn { .. } => eprintln!("error: {err}. Delete it to re-run or pick another year with --year."),
                _ => eprintln!("error: {err}"),
            }
            ExitCode::from(code)
        }
    }
}
