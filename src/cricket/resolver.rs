//! Match outcome resolver.
//!
//! Terminal conditions are checked in a fixed order, first match wins:
//!
//! 1. all out (contradictory if the target is also reached)
//! 2. target reached
//! 3. last ball bowled, scores level → super over
//! 4. last ball bowled → defending side wins
//!
//! Only when none applies is the chase handed to the estimator.

use serde::Serialize;
use tracing::{debug, warn};

use super::error::ResolveError;
use super::estimator::{FeatureVector, WinEstimator};
use super::state::{MatchState, NormalizedState, ScorePolicy, MAX_WICKETS};
use super::teams::Team;

/// Allowed drift of `loss + win` away from 1.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WinReason {
    AllOut,
    OversExhausted,
}

/// Where the chase stands after the deterministic rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    BattingWon,
    BowlingWon(WinReason),
    TieSuperOver,
    InProgress,
}

/// Result of a successful resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Outcome {
    BattingWon {
        team: Team,
    },
    BowlingWon {
        team: Team,
        reason: WinReason,
    },
    TieSuperOver,
    ProbabilityEstimate {
        batting_win_probability: f64,
        bowling_win_probability: f64,
        features: FeatureVector,
    },
}

type RuleCheck = fn(&MatchState, &NormalizedState) -> Option<Result<MatchPhase, ResolveError>>;

struct TerminalRule {
    name: &'static str,
    check: RuleCheck,
}

const TERMINAL_RULES: [TerminalRule; 4] = [
    TerminalRule {
        name: "all_out",
        check: all_out,
    },
    TerminalRule {
        name: "target_reached",
        check: target_reached,
    },
    TerminalRule {
        name: "tie_on_last_ball",
        check: tie_on_last_ball,
    },
    TerminalRule {
        name: "overs_exhausted",
        check: overs_exhausted,
    },
];

fn all_out(state: &MatchState, _: &NormalizedState) -> Option<Result<MatchPhase, ResolveError>> {
    if state.wickets_fallen < MAX_WICKETS {
        return None;
    }
    if state.current_score >= state.target {
        return Some(Err(ResolveError::ContradictoryMatchState {
            score: state.current_score,
            target: state.target,
        }));
    }
    Some(Ok(MatchPhase::BowlingWon(WinReason::AllOut)))
}

fn target_reached(state: &MatchState, _: &NormalizedState) -> Option<Result<MatchPhase, ResolveError>> {
    (state.current_score >= state.target).then_some(Ok(MatchPhase::BattingWon))
}

fn tie_on_last_ball(state: &MatchState, n: &NormalizedState) -> Option<Result<MatchPhase, ResolveError>> {
    (n.balls_left == 0 && state.current_score + 1 == state.target).then_some(Ok(MatchPhase::TieSuperOver))
}

fn overs_exhausted(_: &MatchState, n: &NormalizedState) -> Option<Result<MatchPhase, ResolveError>> {
    (n.balls_left == 0).then_some(Ok(MatchPhase::BowlingWon(WinReason::OversExhausted)))
}

/// Apply the terminal rules to an already validated state.
pub fn classify(state: &MatchState, normalized: &NormalizedState) -> Result<MatchPhase, ResolveError> {
    for rule in &TERMINAL_RULES {
        if let Some(phase) = (rule.check)(state, normalized) {
            debug!("Terminal rule '{}' fired", rule.name);
            return phase;
        }
    }
    Ok(MatchPhase::InProgress)
}

/// Build the estimator input for an undecided chase.
pub fn feature_vector(state: &MatchState, n: &NormalizedState) -> FeatureVector {
    FeatureVector {
        batting_team: state.batting_team,
        bowling_team: state.bowling_team,
        venue: state.venue,
        runs_left: n.runs_left,
        balls_left: n.balls_left,
        wickets_left: n.wickets_left,
        target: state.target,
        crr: n.current_run_rate,
        rrr: n.required_run_rate,
    }
}

/// Validate `state`, apply the terminal rules and, if the chase is still
/// open, ask `estimator` for the win probability.
pub fn resolve(
    state: &MatchState,
    policy: ScorePolicy,
    estimator: &dyn WinEstimator,
) -> Result<Outcome, ResolveError> {
    let normalized = state.validate(policy)?;

    let outcome = match classify(state, &normalized)? {
        MatchPhase::BattingWon => Outcome::BattingWon {
            team: state.batting_team,
        },
        MatchPhase::BowlingWon(reason) => Outcome::BowlingWon {
            team: state.bowling_team,
            reason,
        },
        MatchPhase::TieSuperOver => Outcome::TieSuperOver,
        MatchPhase::InProgress => {
            let features = feature_vector(state, &normalized);
            let split = estimator.predict_probability(&features);
            if !split.is_distribution(PROBABILITY_TOLERANCE) {
                warn!(
                    "Estimator '{}' returned loss={} win={} for {:?}",
                    estimator.name(),
                    split.loss,
                    split.win,
                    features
                );
                return Err(ResolveError::MalformedEstimate {
                    loss: split.loss,
                    win: split.win,
                });
            }
            Outcome::ProbabilityEstimate {
                batting_win_probability: split.win,
                bowling_win_probability: split.loss,
                features,
            }
        }
    };
    debug!("Resolved {:?} → {:?}", state, outcome);
    Ok(outcome)
}

impl Outcome {
    /// One-line result text for people, not machines.
    pub fn summary(&self, state: &MatchState) -> String {
        match self {
            Outcome::BattingWon { team } => format!("{} has won the match! Target achieved.", team),
            Outcome::BowlingWon {
                team,
                reason: WinReason::AllOut,
            } => format!("{} has won the match! All wickets have fallen.", team),
            Outcome::BowlingWon {
                team,
                reason: WinReason::OversExhausted,
            } => format!("{} has won the match! No balls left.", team),
            Outcome::TieSuperOver => "It is a draw! Enjoy the Super Over!".to_string(),
            Outcome::ProbabilityEstimate {
                batting_win_probability,
                bowling_win_probability,
                ..
            } => format!(
                "{} {}%, {} {}%",
                state.batting_team,
                percent(*batting_win_probability),
                state.bowling_team,
                percent(*bowling_win_probability)
            ),
        }
    }
}

/// Probability as a percentage rounded to two decimals.
pub fn percent(p: f64) -> f64 {
    (p * 10_000.0).round() / 100.0
}
