//! Score aggregation for completed interviews.
//!
//! All component scores live on a 0–100 scale. Means over an empty solution
//! list are defined as 0, never NaN. Rounding happens once, at the final
//! aggregate.

use crate::session::{ScoreBreakdown, UserSolution};

/// Arithmetic mean over the submitted solution scores.
pub fn coding_score(solutions: &[UserSolution]) -> f64 {
    mean(solutions.iter().map(|s| s.score))
}

/// Mean quality rating across solutions, rescaled from 0–10 to 0–100.
pub fn code_quality_score(solutions: &[UserSolution]) -> f64 {
    mean(solutions.iter().map(|s| s.analysis.code_quality)) * 10.0
}

/// 100 for finishing within the limit; past it, the score drops linearly and
/// bottoms out at 0 once the overrun reaches a full extra time limit.
pub fn time_management_score(actual_secs: i64, limit_secs: i64) -> f64 {
    if actual_secs <= limit_secs {
        return 100.0;
    }
    let overrun = (actual_secs - limit_secs) as f64;
    (100.0 - overrun / limit_secs as f64 * 100.0).max(0.0)
}

/// Weighted final grade: preliminary 20%, coding 50%, quality 20%, time 10%.
/// Rounded half-away-from-zero.
pub fn final_score(breakdown: &ScoreBreakdown) -> i64 {
    let weighted = breakdown.preliminary_score * 0.2
        + breakdown.coding_score * 0.5
        + breakdown.code_quality_score * 0.2
        + breakdown.time_management_score * 0.1;
    weighted.round() as i64
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        sum += value;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
