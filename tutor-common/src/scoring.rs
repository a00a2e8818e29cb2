//! Interval scoring for rhythm assessment
//!
//! Scoring is pure arithmetic over hit timestamps, kept separate from the
//! capture loop so it can be tested with fixed timestamp sequences.
//!
//! Given a pattern of expected intervals and one accepted hit per beat:
//!
//! - `actual[0]` is measured from assessment start to the first hit,
//!   `actual[i]` between consecutive hits.
//! - Each interval gets a closeness ratio `1 - |actual - expected| / expected`,
//!   floored at 0. A perfect hit scores exactly 1; the formula cannot exceed 1.
//! - The raw score is the mean ratio times 100.
//! - The displayed score multiplies by a generosity factor and truncates.
//!   There is deliberately no upper clamp: a displayed score above 100 is
//!   possible and counts as a pass.

use crate::pattern::Pattern;

/// Generosity multiplier applied to the raw score before display.
pub const GENEROSITY: f64 = 1.2;

/// Per-interval closeness in [0, 1]. `expected` must be positive
/// (guaranteed by the [`Pattern`] constructor).
pub fn closeness_ratio(actual: f64, expected: f64) -> f64 {
    (1.0 - (actual - expected).abs() / expected).max(0.0)
}

/// Displayed score: raw score scaled by `generosity`, truncated to a whole
/// percent. Unclamped above 100 on purpose.
pub fn displayed_score(raw_score: f64, generosity: f64) -> u32 {
    (raw_score * generosity) as u32
}

/// Scored outcome of one assessment.
#[derive(Debug, Clone)]
pub struct Assessment {
    /// Measured intervals, exactly one per expected interval.
    pub actual_intervals: Vec<f64>,
    /// Closeness ratio per interval, each in [0, 1].
    pub ratios: Vec<f64>,
}

impl Assessment {
    /// Score a hit sequence against a pattern.
    ///
    /// `hits` are seconds relative to assessment start, one per expected
    /// beat, in acceptance order. The capture loop only returns once it has
    /// exactly `pattern.len()` hits, so a length mismatch is a programming
    /// error rather than a runtime condition.
    pub fn from_hits(pattern: &Pattern, hits: &[f64]) -> Self {
        debug_assert_eq!(hits.len(), pattern.len());

        let mut actual_intervals = Vec::with_capacity(hits.len());
        for (i, t) in hits.iter().enumerate() {
            if i == 0 {
                actual_intervals.push(*t);
            } else {
                actual_intervals.push(t - hits[i - 1]);
            }
        }

        let ratios = actual_intervals
            .iter()
            .zip(pattern.intervals())
            .map(|(actual, expected)| closeness_ratio(*actual, *expected))
            .collect();

        Self {
            actual_intervals,
            ratios,
        }
    }

    /// Mean closeness times 100, before the generosity scale.
    pub fn raw_score(&self) -> f64 {
        let sum: f64 = self.ratios.iter().sum();
        sum / self.ratios.len() as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(intervals: &[f64]) -> Pattern {
        Pattern::new(intervals.to_vec()).unwrap()
    }

    #[test]
    fn test_closeness_perfect_hit() {
        assert_eq!(closeness_ratio(0.5, 0.5), 1.0);
    }

    #[test]
    fn test_closeness_floors_at_zero() {
        // Hit three expected-lengths late
        assert_eq!(closeness_ratio(2.0, 0.5), 0.0);
    }

    #[test]
    fn test_closeness_never_exceeds_one() {
        for actual in [0.0, 0.1, 0.49, 0.5, 0.51, 5.0] {
            let r = closeness_ratio(actual, 0.5);
            assert!((0.0..=1.0).contains(&r), "ratio {} out of range", r);
        }
    }

    #[test]
    fn test_interval_count_matches_pattern() {
        let p = pattern(&[0.5, 0.5, 0.5]);
        let a = Assessment::from_hits(&p, &[0.4, 1.0, 1.5]);
        assert_eq!(a.actual_intervals.len(), p.len());
        assert_eq!(a.ratios.len(), p.len());
    }

    #[test]
    fn test_first_interval_from_start_rest_between_hits() {
        let p = pattern(&[0.5, 0.5]);
        let a = Assessment::from_hits(&p, &[0.52, 1.01]);
        assert!((a.actual_intervals[0] - 0.52).abs() < 1e-9);
        assert!((a.actual_intervals[1] - 0.49).abs() < 1e-9);
    }

    #[test]
    fn test_near_miss_scores_generously() {
        // Pattern [0.5, 0.5], hits at 0.52 and 1.01: ratios 0.96 and 0.98,
        // raw 97%, displayed floor(97 * 1.2) = 116 -- passes any threshold
        // at or below 100.
        let p = pattern(&[0.5, 0.5]);
        let a = Assessment::from_hits(&p, &[0.52, 1.01]);
        assert!((a.ratios[0] - 0.96).abs() < 1e-9);
        assert!((a.ratios[1] - 0.98).abs() < 1e-9);
        assert!((a.raw_score() - 97.0).abs() < 1e-9);
        assert_eq!(displayed_score(a.raw_score(), GENEROSITY), 116);
    }

    #[test]
    fn test_wildly_late_hit_scores_zero() {
        // Pattern [0.5], hit at 2.0: ratio max(0, 1 - 1.5/0.5) = 0.
        let p = pattern(&[0.5]);
        let a = Assessment::from_hits(&p, &[2.0]);
        assert_eq!(a.ratios[0], 0.0);
        assert_eq!(a.raw_score(), 0.0);
        assert_eq!(displayed_score(a.raw_score(), GENEROSITY), 0);
    }

    #[test]
    fn test_displayed_score_truncates() {
        assert_eq!(displayed_score(97.0, 1.2), 116); // 116.4
        assert_eq!(displayed_score(82.5, 1.2), 99); // 99.0
        assert_eq!(displayed_score(100.0, 1.2), 120); // no upper clamp
    }

    #[test]
    fn test_raw_score_is_mean_of_ratios() {
        let p = pattern(&[1.0, 1.0, 1.0, 1.0]);
        // Ratios: 1.0, 0.5, 1.0, 0.5
        let a = Assessment::from_hits(&p, &[1.0, 2.5, 3.5, 5.0]);
        assert!((a.raw_score() - 75.0).abs() < 1e-9);
    }
}
