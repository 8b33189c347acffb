//! The metric-computation core: inheritance depth, per-class method
//! classification, and the MOOD aggregate factors.

pub mod aggregator;
pub mod collector;
pub mod depth;

pub use aggregator::MetricAggregator;
pub use collector::collect_class_stats;
pub use depth::DepthResolver;

use crate::core::MoodReport;
use crate::errors::HierarchyError;
use crate::hierarchy::ClassHierarchy;

/// Run the full analysis over every class the hierarchy enumerates.
pub fn analyze(hierarchy: &dyn ClassHierarchy) -> Result<MoodReport, HierarchyError> {
    let mut resolver = DepthResolver::new();
    let mut aggregator = MetricAggregator::new();

    for class in hierarchy.classes() {
        let stats = collect_class_stats(hierarchy, &mut resolver, &class)?;
        log::debug!(
            "{class}: depth={} children={} inherited={} overridden={} visible={} private={}",
            stats.inheritance_depth,
            stats.child_count,
            stats.inherited_methods,
            stats.overridden_methods,
            stats.visible_methods,
            stats.private_methods,
        );
        aggregator.record(class, stats);
    }

    Ok(aggregator.into_report())
}
