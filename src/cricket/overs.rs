//! Overs notation normalizer.
//!
//! Scorers write overs as `overs.balls`: `15.2` means fifteen completed overs
//! and two balls of the sixteenth. The digit after the point is a ball count
//! (0–5), not a decimal tenth, so the value is converted to an exact number of
//! balls before any arithmetic touches it.
//!
//! A digit of 6–9 is not valid notation. It is clamped to 5, i.e. read as
//! the last legal ball of the over the scorer wrote down. The over count the
//! user entered is never rolled forward.

use super::error::ResolveError;

pub const BALLS_PER_OVER: u32 = 6;
pub const MAX_OVERS: u32 = 20;
/// Balls in a full innings.
pub const MAX_BALLS: u32 = MAX_OVERS * BALLS_PER_OVER;

/// Convert `overs.balls` notation into balls bowled, clamped to `[0, MAX_BALLS]`.
///
/// Negative and non-finite input normalizes to zero; callers that need to
/// reject such values should go through [`validate_overs`] first.
pub fn normalize(overs_completed: f64) -> u32 {
    if !overs_completed.is_finite() || overs_completed <= 0.0 {
        return 0;
    }
    let whole = overs_completed.floor();
    let balls = ((overs_completed - whole) * 10.0).round() as u32;
    let balls = balls.min(BALLS_PER_OVER - 1);

    let total = (whole as u64)
        .saturating_mul(BALLS_PER_OVER as u64)
        .saturating_add(balls as u64);
    total.min(MAX_BALLS as u64) as u32
}

/// Validate raw overs input and return balls bowled. Zero, negative and
/// beyond-20 values are rejected.
pub fn validate_overs(overs_completed: f64) -> Result<u32, ResolveError> {
    let invalid = |reason| ResolveError::InvalidOversInput {
        overs: overs_completed,
        reason,
    };
    if !overs_completed.is_finite() {
        return Err(invalid("overs must be a number"));
    }
    if overs_completed < 0.0 {
        return Err(invalid("overs cannot be negative"));
    }
    if overs_completed > MAX_OVERS as f64 {
        return Err(invalid("an innings lasts at most 20 overs"));
    }
    let balls = normalize(overs_completed);
    if balls == 0 {
        return Err(invalid("overs cannot be zero"));
    }
    Ok(balls)
}

/// Balls remaining in the innings, floored at zero.
pub fn balls_left(balls_bowled: u32) -> u32 {
    MAX_BALLS.saturating_sub(balls_bowled)
}

/// Render a ball count back into `overs.balls` notation (`92` → `"15.2"`).
pub fn format_overs(balls_bowled: u32) -> String {
    format!(
        "{}.{}",
        balls_bowled / BALLS_PER_OVER,
        balls_bowled % BALLS_PER_OVER
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_and_partial_overs() {
        assert_eq!(normalize(10.0), 60);
        assert_eq!(normalize(15.2), 92);
        assert_eq!(normalize(18.3), 111);
        assert_eq!(normalize(0.1), 1);
    }

    #[test]
    fn fifth_ball_is_kept() {
        assert_eq!(normalize(7.5), 47);
        assert_eq!(normalize(19.5), 119);
    }

    #[test]
    fn sixth_digit_clamps_to_last_ball_of_over() {
        // 7.6 stays in the eighth over rather than becoming 8.0
        assert_eq!(normalize(7.6), 47);
        assert_eq!(normalize(7.9), 47);
        assert_eq!(normalize(19.6), 119);
    }

    #[test]
    fn clamps_to_innings_limits() {
        assert_eq!(normalize(20.0), 120);
        assert_eq!(normalize(20.3), 120);
        assert_eq!(normalize(250.0), 120);
        assert_eq!(normalize(0.0), 0);
        assert_eq!(normalize(-3.2), 0);
        assert_eq!(normalize(f64::NAN), 0);
    }

    #[test]
    fn balls_left_complements_balls_bowled() {
        // every hundredth of an over from -1.00 to 25.00
        let mut previous = 0;
        for k in -100..=2500 {
            let overs = k as f64 / 100.0;
            let bowled = normalize(overs);
            assert!(bowled <= MAX_BALLS, "overs {} gave {} balls", overs, bowled);
            assert_eq!(balls_left(bowled), MAX_BALLS - bowled, "overs {}", overs);
            assert!(bowled >= previous, "overs {} went backwards", overs);
            previous = bowled;
        }
        assert_eq!(balls_left(130), 0);
    }

    #[test]
    fn canonical_notation_is_a_fixed_point() {
        for balls in 0..=MAX_BALLS {
            let overs: f64 = format_overs(balls).parse().unwrap();
            assert_eq!(normalize(overs), balls, "overs {}", overs);
        }
    }

    #[test]
    fn validate_rejects_zero_and_out_of_range() {
        assert!(matches!(
            validate_overs(0.0),
            Err(ResolveError::InvalidOversInput { reason: "overs cannot be zero", .. })
        ));
        assert!(matches!(
            validate_overs(20.1),
            Err(ResolveError::InvalidOversInput { .. })
        ));
        assert!(matches!(
            validate_overs(-1.0),
            Err(ResolveError::InvalidOversInput { .. })
        ));
        assert!(matches!(
            validate_overs(f64::INFINITY),
            Err(ResolveError::InvalidOversInput { .. })
        ));
        assert_eq!(validate_overs(20.0), Ok(120));
        assert_eq!(validate_overs(0.1), Ok(1));
    }

    #[test]
    fn format_overs_examples() {
        assert_eq!(format_overs(92), "15.2");
        assert_eq!(format_overs(120), "20.0");
        assert_eq!(format_overs(5), "0.5");
    }
}
