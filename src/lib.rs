//! Gift exchange draw: pairs every participant unit with a receiver while
//! avoiding exclusions and, as far as possible, repeats of earlier years.

pub mod app;
pub mod config;
pub mod cost;
pub mod engine;
pub mod error;
pub mod history;
pub mod hungarian;
pub mod model;
pub mod notify;
pub mod report;
pub mod roster;
pub mod store;

pub use engine::{draw, Draw, DrawOptions, Mode};
pub use error::Error;
pub use hungarian::{Assignment, TieBreak};
