//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `population.csv`
//! - `failsafes.csv`
//! - `summary.csv`
//!
//! Missing values are written as empty fields.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{FailsafeRow, OutputResult, PopulationRow, SummaryRow};

pub struct CsvWriter {
    population: Writer<File>,
    failsafes:  Writer<File>,
    summary:    Writer<File>,
    finished:   bool,
}

impl CsvWriter {
    /// Create the three CSV files in `dir` and write the header rows.
    /// Existing files are truncated.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut population = Writer::from_path(dir.join("population.csv"))?;
        population.write_record(["tick", "team", "live_prey"])?;

        let mut failsafes = Writer::from_path(dir.join("failsafes.csv"))?;
        failsafes.write_record(["tick", "team", "role", "check"])?;

        let mut summary = Writer::from_path(dir.join("summary.csv"))?;
        summary.write_record(["winner", "ticks"])?;

        Ok(Self {
            population,
            failsafes,
            summary,
            finished: false,
        })
    }
}

fn or_empty(field: Option<String>) -> String {
    field.unwrap_or_default()
}

impl OutputWriter for CsvWriter {
    fn write_population(&mut self, rows: &[PopulationRow]) -> OutputResult<()> {
        for row in rows {
            self.population.write_record(&[
                row.tick.to_string(),
                row.team.clone(),
                row.live_prey.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_failsafe(&mut self, row: &FailsafeRow) -> OutputResult<()> {
        self.failsafes.write_record(&[
            or_empty(row.tick.map(|t| t.to_string())),
            or_empty(row.team.clone()),
            or_empty(row.role.clone()),
            row.check.clone(),
        ])?;
        Ok(())
    }

    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()> {
        self.summary.write_record(&[or_empty(row.winner.clone()), row.ticks.to_string()])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.population.flush()?;
        self.failsafes.flush()?;
        self.summary.flush()?;
        Ok(())
    }
}
