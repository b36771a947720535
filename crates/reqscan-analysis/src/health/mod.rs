//! Composite 0–100 health score and letter grade.
//!
//! score = implemented%·0.6 + (100 − min(undocumented·5, 60))·0.3 + size·0.1,
//! where size is 5 for large datasets and 10 otherwise. Always clamped to
//! [0, 100].

use reqscan_core::types::HealthSummary;

/// Penalty per undocumented routine.
const UNDOCUMENTED_PENALTY: f64 = 5.0;
/// Cap on the total undocumented penalty.
const UNDOCUMENTED_PENALTY_CAP: f64 = 60.0;

pub fn health_score(implemented_pct: f64, undocumented_count: usize, is_large: bool) -> u8 {
    let implemented = if implemented_pct.is_finite() {
        implemented_pct
    } else {
        0.0
    };
    let penalty = (undocumented_count as f64 * UNDOCUMENTED_PENALTY).min(UNDOCUMENTED_PENALTY_CAP);
    let size_factor = if is_large { 5.0 } else { 10.0 };
    let raw = implemented * 0.6 + (100.0 - penalty) * 0.3 + size_factor * 0.1;
    raw.clamp(0.0, 100.0).round() as u8
}

pub fn grade(score: u8) -> char {
    match score {
        90.. => 'A',
        80..=89 => 'B',
        70..=79 => 'C',
        60..=69 => 'D',
        _ => 'E',
    }
}

pub fn summarize(implemented_pct: f64, undocumented_count: usize, is_large: bool) -> HealthSummary {
    let score = health_score(implemented_pct, undocumented_count, is_large);
    HealthSummary {
        score,
        grade: grade(score),
        implemented_pct,
        undocumented_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_small_dataset() {
        // 60 + 30 + 1
        assert_eq!(health_score(100.0, 0, false), 91);
        assert_eq!(grade(91), 'A');
    }

    #[test]
    fn undocumented_penalty_is_capped() {
        assert_eq!(health_score(0.0, 12, true), health_score(0.0, 500, true));
        // 0 + 40·0.3 + 0.5 = 12.5 → 13
        assert_eq!(health_score(0.0, 12, true), 13);
    }

    #[test]
    fn out_of_range_inputs_are_clamped() {
        assert_eq!(health_score(1000.0, 0, false), 100);
        assert_eq!(health_score(-1000.0, 0, false), 0);
        assert_eq!(health_score(f64::NAN, 0, false), 31);
    }

    #[test]
    fn grade_boundaries() {
        assert_eq!(grade(100), 'A');
        assert_eq!(grade(90), 'A');
        assert_eq!(grade(89), 'B');
        assert_eq!(grade(80), 'B');
        assert_eq!(grade(70), 'C');
        assert_eq!(grade(60), 'D');
        assert_eq!(grade(59), 'E');
        assert_eq!(grade(0), 'E');
    }
}
