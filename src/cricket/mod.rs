pub mod calibration;
pub mod error;
pub mod estimator;
pub mod overs;
pub mod resolver;
pub mod state;
pub mod teams;

pub use error::ResolveError;
pub use estimator::{LogisticEstimator, WinEstimator};
pub use resolver::{resolve, Outcome};
pub use state::{MatchState, ScorePolicy};
pub use teams::{Team, Venue};
