use clap::Parser;

use crate::cricket::ScorePolicy;

/// T20 chase win-probability calculator
#[derive(Parser, Debug, Clone)]
#[command(name = "chase-predictor", version, about)]
pub struct Config {
    /// Dashboard listen address
    #[arg(long, env = "DASHBOARD_ADDR", default_value = "0.0.0.0:8080")]
    pub dashboard_addr: String,

    /// Path to the win-probability model artifact (JSON)
    #[arg(long, env = "MODEL_PATH", default_value = "models/ipl_win_model.json")]
    pub model_path: String,

    /// What to do when the current score is above the target
    #[arg(long, env = "SCORE_POLICY", value_enum, default_value_t = ScorePolicy::Reject)]
    pub score_policy: ScorePolicy,

    /// Upper bound on a single resolution, in milliseconds
    #[arg(long, env = "ESTIMATOR_TIMEOUT_MS", default_value = "500")]
    pub estimator_timeout_ms: u64,

    /// Optional fixture list (PDF) offered for download
    #[arg(long, env = "SCHEDULE_PATH")]
    pub schedule_path: Option<String>,

    /// Search page used for the "watch live score" link
    #[arg(
        long,
        env = "LIVE_SCORE_SEARCH_URL",
        default_value = "https://www.google.com/search"
    )]
    pub live_score_search_url: String,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(1..=60_000).contains(&self.estimator_timeout_ms) {
            anyhow::bail!("estimator_timeout_ms must be between 1 and 60000");
        }
        if self.model_path.trim().is_empty() {
            anyhow::bail!("MODEL_PATH must not be empty");
        }
        if let Some(path) = &self.schedule_path {
            if !std::path::Path::new(path).is_file() {
                anyhow::bail!("SCHEDULE_PATH {} is not a readable file", path);
            }
        }
        url::Url::parse(&self.live_score_search_url).map_err(|e| {
            anyhow::anyhow!(
                "LIVE_SCORE_SEARCH_URL {} is not a valid URL: {}",
                self.live_score_search_url,
                e
            )
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["chase-predictor"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_validate() {
        let config = parse(&[]);
        assert_eq!(config.score_policy, ScorePolicy::Reject);
        assert_eq!(config.estimator_timeout_ms, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn score_policy_flag() {
        let config = parse(&["--score-policy", "allow"]);
        assert_eq!(config.score_policy, ScorePolicy::Allow);
        assert!(Config::try_parse_from(["chase-predictor", "--score-policy", "clamp"]).is_err());
    }

    #[test]
    fn rejects_zero_timeout_and_bad_url() {
        assert!(parse(&["--estimator-timeout-ms", "0"]).validate().is_err());
        assert!(parse(&["--live-score-search-url", "not a url"]).validate().is_err());
    }

    #[test]
    fn rejects_missing_schedule_file() {
        let config = parse(&["--schedule-path", "/definitely/not/here/schedule.pdf"]);
        assert!(config.validate().is_err());
    }
}
