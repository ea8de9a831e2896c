use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeFile;
use tracing::{debug, error, warn};
use url::Url;

use crate::cricket::overs::{self, format_overs};
use crate::cricket::resolver::percent;
use crate::cricket::{resolve, MatchState, Outcome, ResolveError, ScorePolicy, Team, Venue, WinEstimator};

#[derive(Clone)]
pub struct AppState {
    pub estimator: Arc<dyn WinEstimator>,
    pub score_policy: ScorePolicy,
    pub estimator_timeout: Duration,
    pub live_score_search_url: String,
}

/// Build the Axum router for the calculator.
pub fn router(state: AppState, schedule_path: Option<&str>) -> Router {
    let router = Router::new()
        .route("/", get(index_handler))
        .route("/api/teams", get(teams_handler))
        .route("/api/venues", get(venues_handler))
        .route("/api/predict", post(predict_handler))
        .route("/api/live-score-link", get(live_score_link_handler));

    let router = match schedule_path {
        Some(path) => router.route_service("/schedule.pdf", ServeFile::new(path)),
        None => router.route("/schedule.pdf", get(no_schedule_handler)),
    };

    router
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: &'static str,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn status_for(err: &ResolveError) -> StatusCode {
    match err {
        ResolveError::ContradictoryMatchState { .. } => StatusCode::CONFLICT,
        e if e.is_input_error() => StatusCode::UNPROCESSABLE_ENTITY,
        ResolveError::EstimatorUnavailable { .. } | ResolveError::EstimatorTimeout { .. } => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn api_error(err: ResolveError) -> ApiError {
    (
        status_for(&err),
        Json(ErrorBody {
            error: err.to_string(),
            kind: err.kind(),
        }),
    )
}

async fn index_handler() -> impl IntoResponse {
    Html(DASHBOARD_HTML)
}

/// GET /api/teams
async fn teams_handler() -> Json<Vec<&'static str>> {
    Json(Team::ALL.iter().map(|t| t.name()).collect())
}

/// GET /api/venues
async fn venues_handler() -> Json<Vec<&'static str>> {
    Json(Venue::ALL.iter().map(|v| v.name()).collect())
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub outcome: Outcome,
    pub summary: String,
    /// Overs bowled after normalization, in `overs.balls` notation.
    pub overs: String,
    pub batting_win_percent: Option<f64>,
    pub bowling_win_percent: Option<f64>,
    pub resolved_at: DateTime<Utc>,
}

/// Turn a body that is not a valid `MatchState` (unknown team, blank field
/// sent as `null`, malformed JSON) into the same error body as every other failure.
fn invalid_request(rejection: JsonRejection) -> ApiError {
    debug!("Rejected request body: {}", rejection.body_text());
    (
        rejection.status(),
        Json(ErrorBody {
            error: rejection.body_text(),
            kind: "invalid_request",
        }),
    )
}

/// POST /api/predict
async fn predict_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MatchState>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) = payload.map_err(invalid_request)?;
    let estimator = Arc::clone(&state.estimator);
    let policy = state.score_policy;
    let match_state = request.clone();
    let task = tokio::task::spawn_blocking(move || resolve(&match_state, policy, estimator.as_ref()));

    let outcome = match tokio::time::timeout(state.estimator_timeout, task).await {
        Ok(Ok(result)) => result.map_err(|e| {
            debug!("Rejected {:?}: {}", request, e);
            api_error(e)
        })?,
        Ok(Err(join_err)) => {
            error!("Resolution task failed: {}", join_err);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "resolution task failed".to_string(),
                    kind: "internal",
                }),
            ));
        }
        Err(_) => {
            let timeout_ms = state.estimator_timeout.as_millis() as u64;
            warn!("Resolution timed out after {} ms", timeout_ms);
            return Err(api_error(ResolveError::EstimatorTimeout { timeout_ms }));
        }
    };

    let (batting_win_percent, bowling_win_percent) = match &outcome {
        Outcome::ProbabilityEstimate {
            batting_win_probability,
            bowling_win_probability,
            ..
        } => (
            Some(percent(*batting_win_probability)),
            Some(percent(*bowling_win_probability)),
        ),
        _ => (None, None),
    };

    Ok(Json(PredictResponse {
        summary: outcome.summary(&request),
        overs: format_overs(overs::normalize(request.overs_completed)),
        outcome,
        batting_win_percent,
        bowling_win_percent,
        resolved_at: Utc::now(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct LiveScoreQuery {
    pub batting: String,
    pub bowling: String,
}

#[derive(Debug, Serialize)]
pub struct LiveScoreLink {
    pub url: String,
}

/// Search URL for the live scorecard of `batting` vs `bowling`.
pub fn live_score_url(base: &str, batting: Team, bowling: Team) -> Result<Url, url::ParseError> {
    let query = format!("Live score {} vs {}", batting, bowling);
    Url::parse_with_params(base, &[("q", query)])
}

/// GET /api/live-score-link?batting=..&bowling=..
async fn live_score_link_handler(
    State(state): State<Arc<AppState>>,
    Query(q): Query<LiveScoreQuery>,
) -> Result<Json<LiveScoreLink>, ApiError> {
    let unknown = |name: &str| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorBody {
                error: format!("Unknown team '{}'", name),
                kind: "unknown_team",
            }),
        )
    };
    let batting = Team::from_name(&q.batting).ok_or_else(|| unknown(&q.batting))?;
    let bowling = Team::from_name(&q.bowling).ok_or_else(|| unknown(&q.bowling))?;
    if batting == bowling {
        return Err(api_error(ResolveError::InvalidTeamSelection { team: batting }));
    }

    let url = live_score_url(&state.live_score_search_url, batting, bowling).map_err(|e| {
        error!("Live score search URL is invalid: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: "live score search is misconfigured".to_string(),
                kind: "internal",
            }),
        )
    })?;
    Ok(Json(LiveScoreLink { url: url.into() }))
}

/// GET /schedule.pdf when no fixture list is configured
async fn no_schedule_handler() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "No fixture schedule configured")
}

/// Embedded single-file calculator page (HTML + CSS + JS)
const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Chase Predictor</title>
<style>
  :root {
    --bg: #0f1117;
    --card: #1a1d27;
    --border: #2a2d3a;
    --accent: #ff5733;
    --green: #00c896;
    --red: #ff4f6a;
    --text: #e0e0e0;
    --muted: #8888aa;
  }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Segoe UI', system-ui, sans-serif; }
  header { padding: 1.2rem 2rem; border-bottom: 1px solid var(--border); text-align: center; }
  header h1 { font-size: 1.6rem; color: var(--accent); }
  header p { color: var(--muted); margin-top: .3rem; }
  main { max-width: 860px; margin: 0 auto; padding: 1.5rem 2rem; display: grid; gap: 1.5rem; }
  .panel { background: var(--card); border: 1px solid var(--border); border-radius: 10px; padding: 1.2rem; }
  .grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 1rem; }
  label { display: block; color: var(--muted); font-size: .8rem; text-transform: uppercase; letter-spacing: .06em; margin-bottom: .3rem; }
  select, input { width: 100%; padding: .5rem; border-radius: 6px; border: 1px solid var(--border); background: var(--bg); color: var(--text); }
  button { background: var(--accent); border: none; color: #fff; padding: .6rem 1.2rem; border-radius: 6px; cursor: pointer; font-weight: 600; }
  button.secondary { background: none; border: 1px solid var(--border); color: var(--muted); }
  .actions { display: flex; gap: .8rem; flex-wrap: wrap; }
  .result { font-size: 1.1rem; }
  .error { color: var(--red); }
  .metrics { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; margin: 1rem 0; }
  .metric .value { font-size: 1.7rem; font-weight: 700; }
  .bar { height: 12px; background: var(--red); border-radius: 6px; overflow: hidden; }
  .bar div { height: 100%; background: var(--green); }
</style>
</head>
<body>
<header>
  <h1>Chase Predictor</h1>
  <p>Win probability for the chasing side of a 20-over match</p>
</header>
<main>
  <div class="panel grid">
    <div><label for="batting">Batting team</label><select id="batting"></select></div>
    <div><label for="bowling">Bowling team</label><select id="bowling"></select></div>
    <div><label for="venue">Venue</label><select id="venue"></select></div>
    <div><label for="target">Target score</label><input id="target" type="number" min="1" step="1" value="160"></div>
    <div><label for="score">Current score</label><input id="score" type="number" min="0" step="1" value="0"></div>
    <div><label for="overs">Overs completed</label><input id="overs" type="number" min="0" max="20" step="0.1" value="0.0"></div>
    <div><label for="wickets">Wickets fallen</label><input id="wickets" type="number" min="0" max="10" step="1" value="0"></div>
  </div>
  <div class="actions">
    <button onclick="predict()">Predict probability</button>
    <button class="secondary" onclick="liveScore()">Watch live score</button>
    <a href="/schedule.pdf" download="schedule.pdf"><button class="secondary">Download schedule</button></a>
  </div>
  <div class="panel" id="result"><span style="color:var(--muted)">Enter the match state and press Predict.</span></div>
</main>
<script>
const $ = id => document.getElementById(id);

async function fill(id, url, pick) {
  const names = await (await fetch(url)).json();
  $(id).innerHTML = names.map(n => `<option>${n}</option>`).join('');
  if (pick !== undefined && names[pick]) $(id).value = names[pick];
}

function showError(msg) {
  $('result').innerHTML = `<div class="error">${msg}</div>`;
}

async function predict() {
  const body = {
    batting_team: $('batting').value,
    bowling_team: $('bowling').value,
    venue: $('venue').value,
    target: parseInt($('target').value, 10),
    current_score: parseInt($('score').value, 10),
    overs_completed: parseFloat($('overs').value),
    wickets_fallen: parseInt($('wickets').value, 10),
  };
  const resp = await fetch('/api/predict', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify(body),
  });
  if (!resp.ok) {
    let msg = resp.statusText;
    try { msg = (await resp.json()).error; } catch (_) {}
    return showError(msg);
  }
  const r = await resp.json();
  if (r.batting_win_percent === null) {
    $('result').innerHTML = `<div class="result">${r.summary}</div>`;
    return;
  }
  $('result').innerHTML = `
    <div class="metrics">
      <div class="metric"><label>${body.batting_team} win probability</label><div class="value" style="color:var(--green)">${r.batting_win_percent}%</div></div>
      <div class="metric"><label>${body.bowling_team} win probability</label><div class="value" style="color:var(--red)">${r.bowling_win_percent}%</div></div>
    </div>
    <div class="bar"><div style="width:${r.batting_win_percent}%"></div></div>
    <p style="color:var(--muted);margin-top:.6rem">After ${r.overs} overs</p>`;
}

async function liveScore() {
  const q = new URLSearchParams({ batting: $('batting').value, bowling: $('bowling').value });
  const resp = await fetch('/api/live-score-link?' + q);
  if (!resp.ok) {
    let msg = resp.statusText;
    try { msg = (await resp.json()).error; } catch (_) {}
    return showError(msg);
  }
  window.open((await resp.json()).url, '_blank');
}

fill('batting', '/api/teams', 0);
fill('bowling', '/api/teams', 1);
fill('venue', '/api/venues');
</script>
</body>
</html>
"#;
