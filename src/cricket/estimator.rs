//! The estimator boundary and the bundled logistic model.
//!
//! The resolver only sees [`WinEstimator`]: a fixed feature record in, a
//! two-outcome distribution out. The model is loaded once at startup and is
//! never mutated afterwards, so one instance is shared by every request.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use super::calibration::{sigmoid, PlattCalibration};
use super::error::ResolveError;
use super::teams::{Team, Venue};

/// Feature record scored by the estimator for an undecided chase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    pub batting_team: Team,
    pub bowling_team: Team,
    pub venue: Venue,
    pub runs_left: i64,
    pub balls_left: u32,
    pub wickets_left: u32,
    pub target: u32,
    pub crr: f64,
    pub rrr: f64,
}

/// Probability split between the bowling side (`loss`) and the batting side (`win`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WinSplit {
    pub loss: f64,
    pub win: f64,
}

impl WinSplit {
    /// Both halves in [0, 1] and summing to 1 within `tolerance`.
    pub fn is_distribution(&self, tolerance: f64) -> bool {
        (0.0..=1.0).contains(&self.loss)
            && (0.0..=1.0).contains(&self.win)
            && (self.loss + self.win - 1.0).abs() <= tolerance
    }
}

/// Opaque win-probability classifier.
///
/// Implementations must be safe to call concurrently from several requests.
pub trait WinEstimator: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    fn predict_probability(&self, features: &FeatureVector) -> WinSplit;
}

// ── Logistic model artifact ──────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModelArtifact {
    #[serde(default = "default_model_name")]
    name: String,
    intercept: f64,
    #[serde(default)]
    batting_team: HashMap<String, f64>,
    #[serde(default)]
    bowling_team: HashMap<String, f64>,
    #[serde(default)]
    venue: HashMap<String, f64>,
    numeric: NumericWeights,
    #[serde(default)]
    calibration: Option<PlattCalibration>,
}

fn default_model_name() -> String {
    "logistic".to_string()
}

/// Linear weights for the six numeric features.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NumericWeights {
    pub runs_left: f64,
    pub balls_left: f64,
    pub wickets_left: f64,
    pub target: f64,
    pub crr: f64,
    pub rrr: f64,
}

impl NumericWeights {
    fn all_finite(&self) -> bool {
        [
            self.runs_left,
            self.balls_left,
            self.wickets_left,
            self.target,
            self.crr,
            self.rrr,
        ]
        .iter()
        .all(|w| w.is_finite())
    }
}

/// One-hot + linear logistic classifier read from a JSON artifact.
///
/// Category keys are exact display names. Categories missing from the
/// artifact contribute nothing to the logit.
#[derive(Debug, Clone)]
pub struct LogisticEstimator {
    name: String,
    intercept: f64,
    batting: HashMap<Team, f64>,
    bowling: HashMap<Team, f64>,
    venue: HashMap<Venue, f64>,
    numeric: NumericWeights,
    calibration: Option<PlattCalibration>,
}

impl LogisticEstimator {
    /// Load the model from disk. Any failure here means the service cannot run.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ResolveError> {
        let path = path.as_ref();
        let label = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|e| ResolveError::EstimatorUnavailable {
            path: label.clone(),
            reason: e.to_string(),
        })?;
        Self::from_json(&raw, &label)
    }

    /// Parse and check a model artifact. `source` only labels errors.
    pub fn from_json(raw: &str, source: &str) -> Result<Self, ResolveError> {
        let unavailable = |reason: String| ResolveError::EstimatorUnavailable {
            path: source.to_string(),
            reason,
        };

        let artifact: ModelArtifact =
            serde_json::from_str(raw).map_err(|e| unavailable(format!("unreadable model: {e}")))?;

        if !artifact.intercept.is_finite() || !artifact.numeric.all_finite() {
            return Err(unavailable("non-finite weight".to_string()));
        }
        if let Some(cal) = artifact.calibration {
            if !cal.is_finite() {
                return Err(unavailable("non-finite calibration".to_string()));
            }
        }

        let batting = team_weights(&artifact.batting_team, "batting_team").map_err(unavailable)?;
        let bowling = team_weights(&artifact.bowling_team, "bowling_team").map_err(unavailable)?;
        let mut venue = HashMap::new();
        for (key, weight) in &artifact.venue {
            let v = Venue::ALL
                .into_iter()
                .find(|v| v.name() == key.as_str())
                .ok_or_else(|| unavailable(format!("unknown venue '{key}'")))?;
            if !weight.is_finite() {
                return Err(unavailable(format!("non-finite weight for venue '{key}'")));
            }
            venue.insert(v, *weight);
        }

        debug!(
            "Parsed model '{}' ({} batting, {} bowling, {} venue weights)",
            artifact.name,
            batting.len(),
            bowling.len(),
            venue.len()
        );

        Ok(LogisticEstimator {
            name: artifact.name,
            intercept: artifact.intercept,
            batting,
            bowling,
            venue,
            numeric: artifact.numeric,
            calibration: artifact.calibration,
        })
    }

    fn logit(&self, f: &FeatureVector) -> f64 {
        let w = &self.numeric;
        self.intercept
            + self.batting.get(&f.batting_team).copied().unwrap_or(0.0)
            + self.bowling.get(&f.bowling_team).copied().unwrap_or(0.0)
            + self.venue.get(&f.venue).copied().unwrap_or(0.0)
            + w.runs_left * f.runs_left as f64
            + w.balls_left * f.balls_left as f64
            + w.wickets_left * f.wickets_left as f64
            + w.target * f.target as f64
            + w.crr * f.crr
            + w.rrr * f.rrr
    }
}

fn team_weights(raw: &HashMap<String, f64>, field: &str) -> Result<HashMap<Team, f64>, String> {
    let mut out = HashMap::new();
    for (key, weight) in raw {
        // Exact display names only, so two keys can never map to one side.
        let team = Team::ALL
            .into_iter()
            .find(|t| t.name() == key.as_str())
            .ok_or_else(|| format!("unknown team '{key}' in {field}"))?;
        if !weight.is_finite() {
            return Err(format!("non-finite weight for '{key}' in {field}"));
        }
        out.insert(team, *weight);
    }
    Ok(out)
}

impl WinEstimator for LogisticEstimator {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict_probability(&self, features: &FeatureVector) -> WinSplit {
        let raw = sigmoid(self.logit(features));
        let win = match self.calibration {
            Some(cal) => cal.apply(raw),
            None => raw,
        };
        WinSplit {
            loss: 1.0 - win,
            win,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const BUNDLED_MODEL: &str = include_str!("../../models/ipl_win_model.json");

    fn features(runs_left: i64, balls_left: u32, wickets_left: u32) -> FeatureVector {
        let balls_bowled = 120 - balls_left;
        let score = 160 - runs_left;
        FeatureVector {
            batting_team: Team::RajasthanRoyals,
            bowling_team: Team::DelhiCapitals,
            venue: Venue::Jaipur,
            runs_left,
            balls_left,
            wickets_left,
            target: 160,
            crr: if balls_bowled > 0 { score as f64 * 6.0 / balls_bowled as f64 } else { 0.0 },
            rrr: runs_left as f64 * 6.0 / balls_left as f64,
        }
    }

    fn minimal_model(extra: &str) -> String {
        format!(
            r#"{{
                "intercept": 0.0,
                "numeric": {{"runs_left": 0.0, "balls_left": 0.0, "wickets_left": 0.0,
                             "target": 0.0, "crr": 0.0, "rrr": 0.0}}{extra}
            }}"#
        )
    }

    #[test]
    fn bundled_model_loads_and_sums_to_one() {
        let model = LogisticEstimator::from_json(BUNDLED_MODEL, "bundled").unwrap();
        let split = model.predict_probability(&features(60, 60, 8));
        assert!(split.is_distribution(1e-9));
        assert_relative_eq!(split.loss + split.win, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn bundled_model_orders_easy_and_hard_chases() {
        let model = LogisticEstimator::from_json(BUNDLED_MODEL, "bundled").unwrap();
        let easy = model.predict_probability(&features(20, 60, 9));
        let hard = model.predict_probability(&features(100, 30, 2));
        assert!(
            easy.win > hard.win,
            "easy {:.3} should beat hard {:.3}",
            easy.win,
            hard.win
        );
        assert!(easy.win > 0.5);
        assert!(hard.win < 0.5);
    }

    #[test]
    fn zero_model_is_a_coin_flip() {
        let model = LogisticEstimator::from_json(&minimal_model(""), "zero").unwrap();
        let split = model.predict_probability(&features(60, 60, 8));
        assert_relative_eq!(split.win, 0.5, epsilon = 1e-12);
        assert_eq!(model.name(), "logistic");
    }

    #[test]
    fn category_weights_shift_the_logit() {
        let model = LogisticEstimator::from_json(
            &minimal_model(r#", "batting_team": {"Rajasthan Royals": 1.0}, "venue": {"Jaipur": -1.0}"#),
            "cats",
        )
        .unwrap();
        // +1 and -1 cancel
        assert_relative_eq!(model.predict_probability(&features(60, 60, 8)).win, 0.5, epsilon = 1e-12);

        let mut other = features(60, 60, 8);
        other.venue = Venue::Delhi;
        assert_relative_eq!(model.predict_probability(&other).win, sigmoid(1.0), epsilon = 1e-12);
    }

    #[test]
    fn calibration_is_applied_to_raw_output() {
        let model = LogisticEstimator::from_json(
            &minimal_model(r#", "calibration": {"a": 1.0, "b": 1.0}"#),
            "cal",
        )
        .unwrap();
        let split = model.predict_probability(&features(60, 60, 8));
        assert_relative_eq!(split.win, sigmoid(1.0), epsilon = 1e-9);
        assert_relative_eq!(split.loss, 1.0 - sigmoid(1.0), epsilon = 1e-9);
    }

    #[test]
    fn unknown_team_is_a_load_error() {
        let err = LogisticEstimator::from_json(
            &minimal_model(r#", "bowling_team": {"Gujarat Titans": 0.2}"#),
            "bad.json",
        )
        .unwrap_err();
        match err {
            ResolveError::EstimatorUnavailable { path, reason } => {
                assert_eq!(path, "bad.json");
                assert!(reason.contains("Gujarat Titans"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn abbreviated_or_recased_keys_are_load_errors() {
        // "MI" next to "Mumbai Indians" must not silently overwrite one weight
        let err = LogisticEstimator::from_json(
            &minimal_model(r#", "batting_team": {"Mumbai Indians": 0.3, "MI": -0.3}"#),
            "dup.json",
        )
        .unwrap_err();
        match err {
            ResolveError::EstimatorUnavailable { reason, .. } => assert!(reason.contains("'MI'")),
            other => panic!("unexpected error {other:?}"),
        }

        assert!(matches!(
            LogisticEstimator::from_json(&minimal_model(r#", "venue": {"pune": 0.1}"#), "case.json"),
            Err(ResolveError::EstimatorUnavailable { .. })
        ));
    }

    #[test]
    fn malformed_json_is_a_load_error() {
        assert!(matches!(
            LogisticEstimator::from_json("{ not json", "x"),
            Err(ResolveError::EstimatorUnavailable { .. })
        ));
        // numeric weights are mandatory
        assert!(matches!(
            LogisticEstimator::from_json(r#"{"intercept": 0.0}"#, "x"),
            Err(ResolveError::EstimatorUnavailable { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let path = std::env::temp_dir().join("chase-predictor-no-such-model.json");
        let err = LogisticEstimator::load(&path).unwrap_err();
        assert!(matches!(err, ResolveError::EstimatorUnavailable { .. }));
    }

    #[test]
    fn load_reads_from_disk() {
        let path = std::env::temp_dir().join(format!(
            "chase-predictor-model-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, BUNDLED_MODEL).unwrap();
        let model = LogisticEstimator::load(&path);
        let _ = std::fs::remove_file(&path);
        assert!(model.is_ok());
    }
}
