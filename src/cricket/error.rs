use thiserror::Error;

use super::teams::Team;

/// Everything that can stop a match state from being resolved.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("Wrong team selection: {team} cannot bat and bowl in the same innings")]
    InvalidTeamSelection { team: Team },

    #[error("Invalid overs value {overs}: {reason}")]
    InvalidOversInput { overs: f64, reason: &'static str },

    #[error("Invalid wickets value {wickets}: at most 10 wickets can fall")]
    InvalidWickets { wickets: u32 },

    #[error("Invalid target: the target score must be at least 1")]
    InvalidTarget,

    #[error("Current score {score} is above the target {target}; enter the score at the moment the target was reached")]
    ScoreExceedsTarget { score: u32, target: u32 },

    #[error("Contradictory match state: all 10 wickets have fallen but the score {score} already reaches the target {target}")]
    ContradictoryMatchState { score: u32, target: u32 },

    #[error("Win-probability model unavailable at {path}: {reason}")]
    EstimatorUnavailable { path: String, reason: String },

    #[error("Win-probability model did not answer within {timeout_ms} ms")]
    EstimatorTimeout { timeout_ms: u64 },

    #[error("Win-probability model returned an invalid distribution (loss={loss}, win={win})")]
    MalformedEstimate { loss: f64, win: f64 },
}

impl ResolveError {
    /// True when the caller supplied bad input and can fix it by re-entering the match state.
    pub fn is_input_error(&self) -> bool {
        match self {
            ResolveError::InvalidTeamSelection { .. }
            | ResolveError::InvalidOversInput { .. }
            | ResolveError::InvalidWickets { .. }
            | ResolveError::InvalidTarget
            | ResolveError::ScoreExceedsTarget { .. }
            | ResolveError::ContradictoryMatchState { .. } => true,
            ResolveError::EstimatorUnavailable { .. }
            | ResolveError::EstimatorTimeout { .. }
            | ResolveError::MalformedEstimate { .. } => false,
        }
    }

    /// Stable machine-readable name, used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            ResolveError::InvalidTeamSelection { .. } => "invalid_team_selection",
            ResolveError::InvalidOversInput { .. } => "invalid_overs_input",
            ResolveError::InvalidWickets { .. } => "invalid_wickets",
            ResolveError::InvalidTarget => "invalid_target",
            ResolveError::ScoreExceedsTarget { .. } => "score_exceeds_target",
            ResolveError::ContradictoryMatchState { .. } => "contradictory_match_state",
            ResolveError::EstimatorUnavailable { .. } => "estimator_unavailable",
            ResolveError::EstimatorTimeout { .. } => "estimator_timeout",
            ResolveError::MalformedEstimate { .. } => "malformed_estimate",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_are_separated_from_backend_faults() {
        assert!(ResolveError::InvalidTarget.is_input_error());
        assert!(ResolveError::ContradictoryMatchState { score: 150, target: 150 }.is_input_error());
        assert!(!ResolveError::EstimatorTimeout { timeout_ms: 500 }.is_input_error());
        assert!(!ResolveError::EstimatorUnavailable {
            path: "m.json".into(),
            reason: "missing".into()
        }
        .is_input_error());
    }

    #[test]
    fn messages_are_distinct() {
        let team = ResolveError::InvalidTeamSelection { team: Team::MumbaiIndians };
        assert!(team.to_string().contains("Mumbai Indians"));

        let contradictory = ResolveError::ContradictoryMatchState { score: 150, target: 150 };
        assert!(contradictory.to_string().starts_with("Contradictory"));

        let overs = ResolveError::InvalidOversInput { overs: 0.0, reason: "overs cannot be zero" };
        assert_eq!(overs.to_string(), "Invalid overs value 0: overs cannot be zero");
        assert_eq!(overs.kind(), "invalid_overs_input");
    }
}
