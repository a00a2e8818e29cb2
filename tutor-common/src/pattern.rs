//! Beat-interval patterns and the level catalog
//!
//! A [`Pattern`] is an ordered, non-empty sequence of expected inter-beat
//! intervals in seconds. Patterns are immutable once constructed; the
//! constructor rejects empty sequences and non-positive intervals so the
//! scoring math never divides by zero.
//!
//! The [`Catalog`] holds one [`Level`] per base pattern, each scaled by the
//! integer tempo factor (the mechanical strummer cannot keep up with the
//! base tempos).

use crate::{Error, Result};

/// Ordered, non-empty sequence of expected inter-beat intervals (seconds).
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    intervals: Vec<f64>,
}

impl Pattern {
    /// Build a pattern, rejecting empty sequences and non-positive intervals.
    pub fn new(intervals: Vec<f64>) -> Result<Self> {
        if intervals.is_empty() {
            return Err(Error::InvalidInput("pattern has no intervals".into()));
        }
        if let Some(bad) = intervals.iter().find(|v| !v.is_finite() || **v <= 0.0) {
            return Err(Error::InvalidInput(format!(
                "pattern interval must be a positive number, got {}",
                bad
            )));
        }
        Ok(Self { intervals })
    }

    /// Elementwise tempo scaling by a positive integer factor.
    pub fn scaled(&self, factor: u32) -> Result<Self> {
        if factor == 0 {
            return Err(Error::InvalidInput("tempo scale must be >= 1".into()));
        }
        Pattern::new(self.intervals.iter().map(|i| i * factor as f64).collect())
    }

    pub fn intervals(&self) -> &[f64] {
        &self.intervals
    }

    /// Number of expected beats (= number of intervals).
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// A pattern is never empty by construction.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// One playable level: 1-based number, its pattern, and the pass threshold.
#[derive(Debug, Clone)]
pub struct Level {
    pub number: u32,
    pub pattern: Pattern,
    /// Displayed score (percent) required to advance.
    pub pass_score: u32,
}

/// Ordered set of levels built from base patterns and the tempo scale.
#[derive(Debug, Clone)]
pub struct Catalog {
    levels: Vec<Level>,
}

impl Catalog {
    /// Build the catalog: each base pattern scaled by `tempo_scale`, with a
    /// shared pass threshold.
    pub fn from_base(base: &[Vec<f64>], tempo_scale: u32, pass_score: u32) -> Result<Self> {
        if base.is_empty() {
            return Err(Error::InvalidInput("catalog needs at least one pattern".into()));
        }
        let mut levels = Vec::with_capacity(base.len());
        for (idx, intervals) in base.iter().enumerate() {
            let pattern = Pattern::new(intervals.clone())?.scaled(tempo_scale)?;
            levels.push(Level {
                number: idx as u32 + 1,
                pattern,
                pass_score,
            });
        }
        Ok(Self { levels })
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// The five stock rhythms the device ships with (unscaled, seconds).
pub fn default_base_patterns() -> Vec<Vec<f64>> {
    vec![
        vec![0.5, 0.5, 0.5, 0.5],
        vec![0.5, 0.25, 0.25, 0.5, 0.5],
        vec![0.4, 0.4, 0.8, 0.4, 0.4],
        vec![0.3, 0.3, 0.3, 0.3, 0.3, 0.3],
        vec![0.5, 0.25, 0.25, 0.5, 0.25, 0.25, 0.5],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_rejects_empty() {
        assert!(Pattern::new(vec![]).is_err());
    }

    #[test]
    fn test_pattern_rejects_nonpositive_interval() {
        assert!(Pattern::new(vec![0.5, 0.0]).is_err());
        assert!(Pattern::new(vec![-0.25]).is_err());
        assert!(Pattern::new(vec![f64::NAN]).is_err());
    }

    #[test]
    fn test_scaling_is_elementwise() {
        let p = Pattern::new(vec![0.5, 0.25]).unwrap();
        let scaled = p.scaled(4).unwrap();
        assert_eq!(scaled.intervals(), &[2.0, 1.0]);
    }

    #[test]
    fn test_scale_zero_rejected() {
        let p = Pattern::new(vec![0.5]).unwrap();
        assert!(p.scaled(0).is_err());
    }

    #[test]
    fn test_catalog_numbers_levels_from_one() {
        let catalog = Catalog::from_base(&default_base_patterns(), 4, 60).unwrap();
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.levels()[0].number, 1);
        assert_eq!(catalog.levels()[4].number, 5);
        // First stock pattern at tempo scale 4
        assert_eq!(catalog.levels()[0].pattern.intervals(), &[2.0, 2.0, 2.0, 2.0]);
        assert!(catalog.levels().iter().all(|l| l.pass_score == 60));
    }
}
