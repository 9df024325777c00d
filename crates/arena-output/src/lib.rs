//! `arena-output` — match recording for the predator/prey arena.
//!
//! | Writer        | Files created                                          |
//! |---------------|--------------------------------------------------------|
//! | [`CsvWriter`] | `population.csv`, `failsafes.csv`, `summary.csv`       |
//!
//! Writers implement [`OutputWriter`] and are driven by [`MatchRecorder`],
//! which implements `arena_sim::MatchObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use arena_output::{CsvWriter, MatchRecorder};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut recorder = MatchRecorder::new(writer);
//! let outcome = run_match(&config, submissions, &mut recorder)?;
//! if let Some(e) = recorder.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod recorder;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use recorder::MatchRecorder;
pub use row::{FailsafeRow, PopulationRow, SummaryRow};
pub use writer::OutputWriter;
