use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::error::ResolveError;
use super::overs::{self, BALLS_PER_OVER};
use super::teams::{Team, Venue};

pub const MAX_WICKETS: u32 = 10;

/// Raw chase state as entered by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub batting_team: Team,
    pub bowling_team: Team,
    pub venue: Venue,
    /// Score the batting side has to reach.
    pub target: u32,
    pub current_score: u32,
    /// `overs.balls` notation, e.g. `15.2`.
    pub overs_completed: f64,
    pub wickets_fallen: u32,
}

/// What to do with a current score above the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorePolicy {
    /// Treat it as a data-entry mistake.
    #[default]
    Reject,
    /// Accept it; the chase is simply won.
    Allow,
}

/// Exact derived quantities for a validated [`MatchState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedState {
    pub balls_bowled: u32,
    pub balls_left: u32,
    /// Negative once the target has been passed.
    pub runs_left: i64,
    pub wickets_left: u32,
    pub current_run_rate: f64,
    pub required_run_rate: f64,
}

impl NormalizedState {
    fn derive(state: &MatchState, balls_bowled: u32) -> Self {
        let balls_left = overs::balls_left(balls_bowled);
        let runs_left = state.target as i64 - state.current_score as i64;
        let current_run_rate = if balls_bowled > 0 {
            state.current_score as f64 * BALLS_PER_OVER as f64 / balls_bowled as f64
        } else {
            0.0
        };
        let required_run_rate = if balls_left > 0 {
            runs_left as f64 * BALLS_PER_OVER as f64 / balls_left as f64
        } else {
            0.0
        };
        NormalizedState {
            balls_bowled,
            balls_left,
            runs_left,
            wickets_left: MAX_WICKETS.saturating_sub(state.wickets_fallen),
            current_run_rate,
            required_run_rate,
        }
    }
}

impl MatchState {
    /// Check every input constraint and derive the normalized state.
    ///
    /// Nothing about the outcome is decided here; an all-out side that has
    /// also reached the target passes validation and is flagged by the
    /// resolver instead.
    pub fn validate(&self, policy: ScorePolicy) -> Result<NormalizedState, ResolveError> {
        if self.batting_team == self.bowling_team {
            return Err(ResolveError::InvalidTeamSelection {
                team: self.batting_team,
            });
        }
        let balls_bowled = overs::validate_overs(self.overs_completed)?;
        if self.wickets_fallen > MAX_WICKETS {
            return Err(ResolveError::InvalidWickets {
                wickets: self.wickets_fallen,
            });
        }
        if self.target == 0 {
            return Err(ResolveError::InvalidTarget);
        }
        if policy == ScorePolicy::Reject && self.current_score > self.target {
            return Err(ResolveError::ScoreExceedsTarget {
                score: self.current_score,
                target: self.target,
            });
        }
        Ok(NormalizedState::derive(self, balls_bowled))
    }
}
