//! Random sampling of the label assignment and the cue order.
//!
//! Both draws use a weighted pool, but with different removal rules:
//! labels remove every copy of the drawn value so the four labels are
//! distinct, while cues remove a single copy so a position can flash in up
//! to two stages.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::facts::IndicatorFacts;
use crate::label::{LabelId, LabelStatus};
use crate::layout::{Configuration, CueOrder, Layout, Slot, STAGE_COUNT};
use crate::position::Position;

/// Copies of every standard label.
pub const STANDARD_WEIGHT: usize = 2;

/// Extra copies of a standard label whose indicator is present.
pub const PRESENT_BONUS_WEIGHT: usize = 6;

/// Copies of every extended label.
pub const EXTENDED_WEIGHT: usize = 3;

/// Copies of every position in the cue pool.
pub const CUE_WEIGHT: usize = 2;

/// Multiset of values drawn uniformly by copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedPool<T> {
    entries: Vec<T>,
}

impl<T: Copy + PartialEq> WeightedPool<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add `copies` copies of `value`.
    pub fn add(&mut self, value: T, copies: usize) {
        self.entries.extend(std::iter::repeat_n(value, copies));
    }

    /// Number of copies currently in the pool.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copies of `value` currently in the pool.
    pub fn weight_of(&self, value: T) -> usize {
        self.entries.iter().filter(|entry| **entry == value).count()
    }

    /// Draw a copy, then remove every copy of the drawn value.
    pub fn take_all_copies<R: Rng>(&mut self, rng: &mut R) -> Option<T> {
        if self.entries.is_empty() {
            return None;
        }
        let picked = self.entries[rng.random_range(0..self.entries.len())];
        self.entries.retain(|entry| *entry != picked);
        Some(picked)
    }

    /// Draw a copy and remove only that copy.
    pub fn take_one<R: Rng>(&mut self, rng: &mut R) -> Option<T> {
        if self.entries.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.entries.len());
        Some(self.entries.remove(index))
    }
}

impl<T: Copy + PartialEq> Default for WeightedPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Samples layouts from an owned random generator.
#[derive(Debug, Clone)]
pub struct ConfigurationSampler<R> {
    rng: R,
}

impl ConfigurationSampler<StdRng> {
    /// Sampler with a reproducible seed.
    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Sampler seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> ConfigurationSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Sample a label assignment and cue order.
    pub fn sample(&mut self, facts: &dyn IndicatorFacts) -> Layout {
        let configuration = self.sample_configuration(facts);
        let cue_order = self.sample_cue_order();

        info!(
            labels = %configuration,
            cues = %cue_order,
            "layout_sampled"
        );

        Layout::new(configuration, cue_order)
    }

    /// Draw four distinct labels, weighted toward present indicators.
    pub fn sample_configuration(&mut self, facts: &dyn IndicatorFacts) -> Configuration {
        let mut statuses = [LabelStatus::Missing; LabelId::COUNT];
        let mut pool = label_pool(facts, &mut statuses);

        let mut slots = [Slot {
            label: LabelId::BOB,
            status: LabelStatus::Missing,
        }; 4];
        for slot in &mut slots {
            // The pool holds 15 distinct labels, so four draws never run dry.
            let label = pool.take_all_copies(&mut self.rng).unwrap_or(LabelId::BOB);
            *slot = Slot {
                label,
                status: statuses[label.index()],
            };
            debug!(label = %label, status = %slot.status, "label_drawn");
        }

        Configuration::new(slots)
            .unwrap_or_else(|e| unreachable!("distinct draws produced invalid configuration: {e}"))
    }

    /// Draw five cues from two copies of each position.
    pub fn sample_cue_order(&mut self) -> CueOrder {
        let mut pool = WeightedPool::new();
        for position in Position::ALL {
            pool.add(position, CUE_WEIGHT);
        }

        let mut cues = [Position::TopLeft; STAGE_COUNT];
        for cue in &mut cues {
            *cue = pool.take_one(&mut self.rng).unwrap_or(Position::TopLeft);
        }

        CueOrder::new(cues)
            .unwrap_or_else(|e| unreachable!("cue pool produced invalid order: {e}"))
    }
}

/// Build the weighted label pool, recording each label's status.
fn label_pool(
    facts: &dyn IndicatorFacts,
    statuses: &mut [LabelStatus; LabelId::COUNT],
) -> WeightedPool<LabelId> {
    let mut pool = WeightedPool::new();
    for label in LabelId::all() {
        let status = facts.status_of(label);
        statuses[label.index()] = status;

        let copies = if !label.is_standard() {
            EXTENDED_WEIGHT
        } else if status.is_present() {
            STANDARD_WEIGHT + PRESENT_BONUS_WEIGHT
        } else {
            STANDARD_WEIGHT
        };
        pool.add(label, copies);
    }
    pool
}
