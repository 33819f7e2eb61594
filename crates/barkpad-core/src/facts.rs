//! Indicator facts supplied by the host.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::label::{LabelId, LabelStatus};

/// Host query for the standard indicators, consulted only while sampling.
pub trait IndicatorFacts {
    /// Whether the indicator for a standard label is present.
    fn present(&self, label: LabelId) -> bool;

    /// Whether a present indicator is lit. Only meaningful when `present` is true.
    fn is_on(&self, label: LabelId) -> bool;

    /// Status of a label as seen through these facts.
    fn status_of(&self, label: LabelId) -> LabelStatus {
        if let Some(fixed) = label.fixed_status() {
            return fixed;
        }
        if !self.present(label) {
            LabelStatus::Missing
        } else if self.is_on(label) {
            LabelStatus::On
        } else {
            LabelStatus::Off
        }
    }
}

/// Host with no indicators at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIndicators;

impl IndicatorFacts for NoIndicators {
    fn present(&self, _label: LabelId) -> bool {
        false
    }

    fn is_on(&self, _label: LabelId) -> bool {
        false
    }
}

/// Set of lit and unlit standard indicators.
///
/// A label listed as both lit and unlit counts as lit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorSet {
    #[serde(default)]
    pub lit: BTreeSet<LabelId>,
    #[serde(default)]
    pub unlit: BTreeSet<LabelId>,
}

impl IndicatorSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a lit indicator (builder pattern). Extended labels are ignored.
    pub fn with_lit(mut self, label: LabelId) -> Self {
        if label.is_standard() {
            self.lit.insert(label);
        }
        self
    }

    /// Add an unlit indicator (builder pattern). Extended labels are ignored.
    pub fn with_unlit(mut self, label: LabelId) -> Self {
        if label.is_standard() {
            self.unlit.insert(label);
        }
        self
    }

    /// Number of distinct present indicators.
    pub fn len(&self) -> usize {
        self.lit.union(&self.unlit).count()
    }

    pub fn is_empty(&self) -> bool {
        self.lit.is_empty() && self.unlit.is_empty()
    }
}

impl IndicatorFacts for IndicatorSet {
    fn present(&self, label: LabelId) -> bool {
        label.is_standard() && (self.lit.contains(&label) || self.unlit.contains(&label))
    }

    fn is_on(&self, label: LabelId) -> bool {
        self.lit.contains(&label)
    }
}
