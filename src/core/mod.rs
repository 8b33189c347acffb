use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identity of an analyzed class. Classes are keyed by name within one
/// analysis scope; the extractor warns on duplicates.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassId(String);

impl ClassId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClassId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// Explicit access tag for a member. Models that know real access levels
/// set this; `None` on [`Member`] falls back to the Python name-mangling
/// convention, judged relative to the viewing class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Visible,
    Private,
}

/// One member as seen on a class: a name, whether it is callable, and an
/// optional explicit access tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub is_callable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
}

impl Member {
    pub fn method(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_callable: true,
            visibility: None,
        }
    }

    pub fn attribute(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_callable: false,
            visibility: None,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }
}

/// Per-class statistics record. Populated in one pass per class and never
/// mutated afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassStats {
    /// Distance from this class to the root of its base chain (root = 0).
    pub inheritance_depth: u32,
    /// Number of classes declaring this class among their direct bases.
    pub child_count: usize,
    /// Callable members visible on the class but not redeclared by it.
    pub inherited_methods: usize,
    /// Callable members redeclared here that some strict ancestor also
    /// declares under the same name.
    pub overridden_methods: usize,
    /// Callable members not classified private.
    pub visible_methods: usize,
    /// Callable members whose name is mangled to this class.
    pub private_methods: usize,
}

/// The three MOOD-style aggregate factors. Each is 0 when its numerator or
/// denominator sums to zero across all classes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MoodFactors {
    pub polymorphism_factor: f64,
    pub method_inheritance_factor: f64,
    pub closed_methods_factor: f64,
}

/// Full result of one analysis run: per-class records plus the aggregate
/// factors derived from them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoodReport {
    pub classes: BTreeMap<ClassId, ClassStats>,
    pub factors: MoodFactors,
}
