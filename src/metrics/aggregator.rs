use crate::core::{ClassId, ClassStats, MoodFactors, MoodReport};
use std::collections::BTreeMap;

/// Accumulates per-class records for one analysis run and derives the three
/// MOOD factors from sums across all of them. Records are write-once: the
/// first record for a class wins.
#[derive(Debug, Default)]
pub struct MetricAggregator {
    stats: BTreeMap<ClassId, ClassStats>,
}

impl MetricAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, class: ClassId, stats: ClassStats) {
        self.stats.entry(class).or_insert(stats);
    }

    pub fn class_stats(&self) -> &BTreeMap<ClassId, ClassStats> {
        &self.stats
    }

    /// Total overridden methods over total direct children.
    pub fn polymorphism_factor(&self) -> f64 {
        ratio(
            self.sum(|s| s.overridden_methods),
            self.sum(|s| s.child_count),
        )
    }

    /// Overridden methods over inherited-plus-overridden methods. The
    /// numerator deliberately reuses the overridden count; see DESIGN.md.
    pub fn method_inheritance_factor(&self) -> f64 {
        ratio(
            self.sum(|s| s.overridden_methods),
            self.sum(|s| s.inherited_methods + s.overridden_methods),
        )
    }

    /// Private methods over all classified methods.
    pub fn closed_methods_factor(&self) -> f64 {
        ratio(
            self.sum(|s| s.private_methods),
            self.sum(|s| s.visible_methods + s.private_methods),
        )
    }

    pub fn factors(&self) -> MoodFactors {
        MoodFactors {
            polymorphism_factor: self.polymorphism_factor(),
            method_inheritance_factor: self.method_inheritance_factor(),
            closed_methods_factor: self.closed_methods_factor(),
        }
    }

    pub fn into_report(self) -> MoodReport {
        let factors = self.factors();
        MoodReport {
            classes: self.stats,
            factors,
        }
    }

    fn sum(&self, field: impl Fn(&ClassStats) -> usize) -> usize {
        self.stats.values().map(field).sum()
    }
}

/// A zero numerator or denominator yields the neutral value 0 rather than
/// an error or NaN.
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if numerator == 0 || denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
