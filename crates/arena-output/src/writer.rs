//! The `OutputWriter` trait implemented by backend writers.

use crate::{FailsafeRow, OutputResult, PopulationRow, SummaryRow};

/// A sink for match records.
///
/// Errors are stored by [`MatchRecorder`][crate::MatchRecorder] and
/// retrieved with [`take_error`][crate::MatchRecorder::take_error], since
/// observer hooks cannot return them.
pub trait OutputWriter {
    fn write_population(&mut self, rows: &[PopulationRow]) -> OutputResult<()>;

    fn write_failsafe(&mut self, row: &FailsafeRow) -> OutputResult<()>;

    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.  Safe to call more than
    /// once.
    fn finish(&mut self) -> OutputResult<()>;
}
