use crate::detection::detection_set::DetectionSet;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Turns the boxes of one image into a fruit count.
pub trait CountEstimator {
    fn estimate(&self, detections: &DetectionSet) -> usize;
}

/// One fruit per box.
pub struct RawCount;

impl CountEstimator for RawCount {
    fn estimate(&self, detections: &DetectionSet) -> usize {
        detections.len()
    }
}

/// Area-ratio stacking heuristic.
///
/// Returns `round(sum(areas) / mean(areas))`, rounding half away from zero. Boxes larger than
/// the mean are meant to stand for several merged fruit. The ratio is approximate and has not
/// been validated against ground truth, so treat it as tunable.
///
/// A single box counts as one fruit, an all-zero-area set falls back to the raw count, and a
/// non-empty set never estimates below one.
pub struct StackingAdjusted;

impl CountEstimator for StackingAdjusted {
    fn estimate(&self, detections: &DetectionSet) -> usize {
        match detections.len() {
            0 => 0,
            1 => 1,
            count => {
                // saturated corners make single areas near u64::MAX
                let total: f64 = detections.areas().iter().map(|&area| area as f64).sum();
                if total == 0.0 {
                    return count;
                }
                let mean = total / count as f64;
                let ratio = (total / mean).round();
                (ratio as usize).max(1)
            }
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum CountStrategy {
    Raw,
    #[default]
    Stacking,
}

impl CountStrategy {
    pub fn estimator(&self) -> &'static dyn CountEstimator {
        match self {
            CountStrategy::Raw => &RawCount,
            CountStrategy::Stacking => &StackingAdjusted,
        }
    }

    pub fn estimate(&self, detections: &DetectionSet) -> usize {
        self.estimator().estimate(detections)
    }
}

impl Display for CountStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CountStrategy::Raw => write!(f, "raw"),
            CountStrategy::Stacking => write!(f, "stacking"),
        }
    }
}
