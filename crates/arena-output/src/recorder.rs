//! `MatchRecorder<W>` — bridges `MatchObserver` to an `OutputWriter`.

use arena_agent::World;
use arena_core::{TeamId, Tick};
use arena_sim::{FailsafeEvent, MatchObserver, MatchOutcome, TeamPopulation};
use arena_strategy::Team;

use crate::row::{FailsafeRow, PopulationRow, SummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`MatchObserver`] that records population changes, failsafe events and
/// the final outcome to any [`OutputWriter`].
///
/// Errors from the writer are stored internally because observer hooks have
/// no return value.  After the match returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct MatchRecorder<W: OutputWriter> {
    writer:     W,
    /// Team names by `TeamId`, learned in `on_setup`.
    names:      Vec<String>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> MatchRecorder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            names:      Vec::new(),
            last_error: None,
        }
    }

    /// Take the stored write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn team_name(&self, team: TeamId) -> String {
        self.names
            .get(team.index())
            .cloned()
            .unwrap_or_else(|| team.to_string())
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            tracing::error!(error = %e, "match output write failed");
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> MatchObserver for MatchRecorder<W> {
    fn on_setup(&mut self, _world: &World, teams: &[Team]) {
        self.names = teams.iter().map(|t| t.name.clone()).collect();
    }

    fn on_population_change(&mut self, tick: Tick, teams: &[TeamPopulation]) {
        let rows: Vec<PopulationRow> = teams
            .iter()
            .map(|t| PopulationRow {
                tick:      tick.0,
                team:      t.name.clone(),
                live_prey: t.live_prey as u64,
            })
            .collect();
        let result = self.writer.write_population(&rows);
        self.store_err(result);
    }

    fn on_failsafe(&mut self, event: &FailsafeEvent) {
        let row = FailsafeRow {
            tick:  event.tick.map(|t| t.0),
            team:  event.team.map(|t| self.team_name(t)),
            role:  event.role.map(|r| r.to_string()),
            check: event.kind.to_string(),
        };
        let result = self.writer.write_failsafe(&row);
        self.store_err(result);
    }

    fn on_match_end(&mut self, outcome: &MatchOutcome) {
        let row = SummaryRow {
            winner: outcome.winner_name().map(str::to_owned),
            ticks:  outcome.ticks,
        };
        let result = self.writer.write_summary(&row);
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }
}
