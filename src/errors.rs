use crate::core::ClassId;
use thiserror::Error;

/// Errors surfaced by the class model and the metric core.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HierarchyError {
    /// The base chain of a class loops back on itself. A well-formed
    /// single-inheritance graph never produces this; it indicates a broken
    /// model fed by a provider.
    #[error("inheritance cycle detected through class `{0}`")]
    InheritanceCycle(ClassId),

    /// A class id was queried that the model does not contain.
    #[error("unknown class `{0}` in hierarchy")]
    UnknownClass(ClassId),
}
