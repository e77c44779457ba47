//! Confidence scoring for height readings.
//!
//! Two signals feed the score: how clearly the landmarks used this frame
//! were seen, and how settled the temporal filter is. Both relations are
//! monotone: better visibility or lower covariance never lowers the score.

/// Tunable parameters for the confidence scorer.
#[derive(Debug, Clone)]
pub struct ConfidenceConfig {
    /// Scales filter covariance into a confidence penalty.
    pub covariance_weight: f64,
    /// Lower bound of the covariance factor, so visibility always counts.
    pub covariance_floor: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            covariance_weight: 5.0,
            covariance_floor: 0.1,
        }
    }
}

/// Combines landmark visibility and filter covariance into a 0–100 score.
#[derive(Debug, Clone, Default)]
pub struct ConfidenceScorer {
    config: ConfidenceConfig,
}

impl ConfidenceScorer {
    /// Create a scorer with the given configuration.
    pub fn new(config: ConfidenceConfig) -> Self {
        Self { config }
    }

    /// Score one frame from the visibilities of the landmarks actually used
    /// and the filter's current error covariance.
    pub fn score(&self, used_visibilities: &[f64], covariance: f64) -> f64 {
        let mean_visibility = if used_visibilities.is_empty() {
            0.0
        } else {
            used_visibilities.iter().sum::<f64>() / used_visibilities.len() as f64
        };

        let settled = (1.0 - self.config.covariance_weight * covariance)
            .max(self.config.covariance_floor);

        (mean_visibility * settled * 100.0).clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let scorer = ConfidenceScorer::default();
        assert_eq!(scorer.score(&[], 0.0), 0.0);
        assert!(scorer.score(&[1.0, 1.0], 0.0) <= 100.0);
        assert!(scorer.score(&[1.0], 1000.0) >= 0.0);
    }

    #[test]
    fn test_monotone_in_visibility() {
        let scorer = ConfidenceScorer::default();
        let low = scorer.score(&[0.7, 0.7], 0.05);
        let high = scorer.score(&[0.9, 0.9], 0.05);
        assert!(high >= low);
    }

    #[test]
    fn test_monotone_in_covariance() {
        let scorer = ConfidenceScorer::default();
        let settled = scorer.score(&[0.9], 0.01);
        let noisy = scorer.score(&[0.9], 0.15);
        assert!(settled >= noisy);
    }

    #[test]
    fn test_floor_keeps_visibility_relevant() {
        let scorer = ConfidenceScorer::default();
        // Covariance large enough to bottom out the settled factor.
        let a = scorer.score(&[0.8], 10.0);
        let b = scorer.score(&[0.4], 10.0);
        assert!(a > b);
    }
}
