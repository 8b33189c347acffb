// Export modules for library usage
pub mod analyzers;
pub mod cli;
pub mod commands;
pub mod core;
pub mod errors;
pub mod hierarchy;
pub mod io;
pub mod metrics;

// Re-export commonly used types
pub use crate::core::{ClassId, ClassStats, Member, MoodFactors, MoodReport, Visibility};

pub use crate::errors::HierarchyError;

pub use crate::hierarchy::{ClassDecl, ClassHierarchy, ClassModel, ModelBuilder};

pub use crate::metrics::{analyze, collect_class_stats, DepthResolver, MetricAggregator};

pub use crate::analyzers::PythonExtractor;

pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};
