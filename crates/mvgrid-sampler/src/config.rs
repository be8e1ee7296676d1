use serde::{Deserialize, Serialize};

use crate::error::SamplerError;

/// Parameters of the multi-view sampler.
///
/// Every field has a default, so a JSON document only needs to name the
/// values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSamplerConfig {
    /// Number of recorded viewpoints per object.
    pub views_per_object: usize,
    /// First view index other views are drawn from.
    pub candidate_start: usize,
    /// Last view index other views are drawn from, inclusive.
    pub candidate_end: usize,
    /// Upper bound of the number of views aggregated per example.
    pub max_views: usize,
    /// Probability of returning the ground-truth grid instead of predictions.
    pub ground_truth_prob: f64,
    /// Whether the anchor view's own prediction counts as one of the views.
    pub include_anchor: bool,
    /// Optional fixed seed for reproducible sampling.
    pub random_seed: Option<u64>,
}

impl Default for ViewSamplerConfig {
    fn default() -> Self {
        Self {
            views_per_object: 13,
            candidate_start: 0,
            candidate_end: 12,
            max_views: 4,
            ground_truth_prob: 0.0,
            include_anchor: true,
            random_seed: None,
        }
    }
}

impl ViewSamplerConfig {
    /// Number of view indices in the candidate range.
    pub fn num_candidates(&self) -> usize {
        (self.candidate_end + 1).saturating_sub(self.candidate_start)
    }

    /// Largest number of other views a single example may request.
    pub fn max_other_views(&self) -> usize {
        if self.include_anchor {
            self.max_views.saturating_sub(1)
        } else {
            self.max_views
        }
    }

    /// Check that the parameters are consistent.
    ///
    /// The candidate range must fit inside one object and hold enough views
    /// for the largest draw, even when the anchor view falls in the range.
    ///
    /// # Errors
    ///
    /// Returns [`SamplerError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), SamplerError> {
        if self.views_per_object == 0 {
            return Err(SamplerError::InvalidConfig(
                "views_per_object must be greater than zero".to_string(),
            ));
        }
        if self.candidate_start > self.candidate_end {
            return Err(SamplerError::InvalidConfig(format!(
                "candidate_start ({}) is greater than candidate_end ({})",
                self.candidate_start, self.candidate_end
            )));
        }
        if self.candidate_end >= self.views_per_object {
            return Err(SamplerError::InvalidConfig(format!(
                "candidate_end ({}) must be smaller than views_per_object ({})",
                self.candidate_end, self.views_per_object
            )));
        }
        if self.max_views == 0 {
            return Err(SamplerError::InvalidConfig(
                "max_views must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.ground_truth_prob) {
            return Err(SamplerError::InvalidConfig(format!(
                "ground_truth_prob ({}) must lie in [0, 1]",
                self.ground_truth_prob
            )));
        }
        let available = self.num_candidates() - 1;
        if self.max_other_views() > available {
            return Err(SamplerError::InvalidConfig(format!(
                "max_views ({}) needs more other views than the {} candidates available",
                self.max_views, available
            )));
        }
        Ok(())
    }
}
