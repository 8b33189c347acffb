//! The class-model boundary between metric computation and whatever derives
//! the classes: the [`ClassHierarchy`] trait plus an in-memory [`ClassModel`]
//! built either by the Python extractor or from a serialized description.

use crate::core::{ClassId, Member};
use crate::errors::HierarchyError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet, VecDeque};

/// Read-only view of a class graph. The metric core only ever talks to this
/// trait; providers decide how the graph is obtained.
pub trait ClassHierarchy {
    /// All classes in the analysis scope, in declaration order.
    fn classes(&self) -> Vec<ClassId>;

    /// The immediate base of a class, `None` for a hierarchy root.
    fn direct_base(&self, class: &ClassId) -> Result<Option<ClassId>, HierarchyError>;

    /// Classes declaring `class` among their direct bases (one hop only).
    fn direct_subclasses(&self, class: &ClassId) -> Result<&[ClassId], HierarchyError>;

    /// Members declared directly on the class, excluding inherited ones.
    fn own_members(&self, class: &ClassId) -> Result<&[Member], HierarchyError>;

    /// Own plus inherited members, one entry per name with the closest
    /// declaration winning, sorted by name.
    fn visible_members(&self, class: &ClassId) -> Result<Vec<Member>, HierarchyError>;

    /// Every strict ancestor of the class. Order is unspecified beyond
    /// visiting each ancestor exactly once; callers test existence only.
    fn ancestors(&self, class: &ClassId) -> Result<&[ClassId], HierarchyError>;
}

/// One class as declared by a provider: its name, direct bases in source
/// order, and its own member set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: ClassId,
    #[serde(default)]
    pub bases: Vec<ClassId>,
    #[serde(default)]
    pub members: Vec<Member>,
}

/// Accumulates class declarations and derives the link structure
/// (direct base, subclasses, ancestors) in one `build` step.
///
/// This struct is also the serde shape of a pre-derived class model, so a
/// JSON file deserializes straight into a builder.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ModelBuilder {
    classes: Vec<ClassDecl>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn declare(&mut self, decl: ClassDecl) {
        self.classes.push(decl);
    }

    /// Test-friendly shorthand: a class with the given bases and callable
    /// members, no explicit visibility tags.
    pub fn class(mut self, name: &str, bases: &[&str], methods: &[&str]) -> Self {
        self.declare(ClassDecl {
            name: ClassId::from(name),
            bases: bases.iter().copied().map(ClassId::from).collect(),
            members: methods.iter().copied().map(Member::method).collect(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Resolve links and produce the queryable model. Duplicate class names
    /// keep the first declaration; later ones are dropped with a warning.
    /// Bases that do not resolve within the declared set act as the
    /// hierarchy root, the way an external base would.
    pub fn build(self) -> ClassModel {
        let mut entries: BTreeMap<ClassId, ClassEntry> = BTreeMap::new();
        let mut order = Vec::new();

        for decl in self.classes {
            if entries.contains_key(&decl.name) {
                log::warn!("duplicate class `{}` ignored", decl.name);
                continue;
            }
            order.push(decl.name.clone());
            entries.insert(
                decl.name,
                ClassEntry {
                    bases: decl.bases,
                    members: decl.members,
                    direct_base: None,
                    subclasses: Vec::new(),
                    ancestors: Vec::new(),
                },
            );
        }

        // Direct-base and subclass links, restricted to resolvable classes.
        for name in &order {
            let bases = entries[name].bases.clone();
            let direct_base = bases.iter().find(|b| entries.contains_key(*b)).cloned();
            if let Some(entry) = entries.get_mut(name) {
                entry.direct_base = direct_base;
            }

            let mut seen = HashSet::new();
            for base in bases {
                if base != *name && seen.insert(base.clone()) {
                    if let Some(entry) = entries.get_mut(&base) {
                        entry.subclasses.push(name.clone());
                    }
                }
            }
        }

        for name in &order {
            let ancestors = collect_ancestors(&entries, name);
            if let Some(entry) = entries.get_mut(name) {
                entry.ancestors = ancestors;
            }
        }

        ClassModel { entries, order }
    }
}

/// Breadth-first walk over all resolvable bases, self excluded, each
/// ancestor visited once. A malformed cyclic graph terminates here thanks to
/// the seen-set; the depth resolver reports the cycle as an error.
fn collect_ancestors(entries: &BTreeMap<ClassId, ClassEntry>, start: &ClassId) -> Vec<ClassId> {
    let mut ancestors = Vec::new();
    let mut seen: HashSet<ClassId> = HashSet::new();
    seen.insert(start.clone());

    let mut queue: VecDeque<ClassId> = entries[start]
        .bases
        .iter()
        .filter(|b| entries.contains_key(*b))
        .cloned()
        .collect();

    while let Some(class) = queue.pop_front() {
        if !seen.insert(class.clone()) {
            continue;
        }
        if let Some(entry) = entries.get(&class) {
            queue.extend(
                entry
                    .bases
                    .iter()
                    .filter(|b| entries.contains_key(*b))
                    .cloned(),
            );
            ancestors.push(class);
        }
    }

    ancestors
}

#[derive(Clone, Debug)]
struct ClassEntry {
    bases: Vec<ClassId>,
    members: Vec<Member>,
    direct_base: Option<ClassId>,
    subclasses: Vec<ClassId>,
    ancestors: Vec<ClassId>,
}

/// In-memory class graph with pre-resolved links.
#[derive(Clone, Debug, Default)]
pub struct ClassModel {
    entries: BTreeMap<ClassId, ClassEntry>,
    order: Vec<ClassId>,
}

impl ClassModel {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, class: &ClassId) -> bool {
        self.entries.contains_key(class)
    }

    fn entry(&self, class: &ClassId) -> Result<&ClassEntry, HierarchyError> {
        self.entries
            .get(class)
            .ok_or_else(|| HierarchyError::UnknownClass(class.clone()))
    }
}

impl ClassHierarchy for ClassModel {
    fn classes(&self) -> Vec<ClassId> {
        self.order.clone()
    }

    fn direct_base(&self, class: &ClassId) -> Result<Option<ClassId>, HierarchyError> {
        Ok(self.entry(class)?.direct_base.clone())
    }

    fn direct_subclasses(&self, class: &ClassId) -> Result<&[ClassId], HierarchyError> {
        Ok(&self.entry(class)?.subclasses)
    }

    fn own_members(&self, class: &ClassId) -> Result<&[Member], HierarchyError> {
        Ok(&self.entry(class)?.members)
    }

    fn visible_members(&self, class: &ClassId) -> Result<Vec<Member>, HierarchyError> {
        let entry = self.entry(class)?;
        let mut by_name: BTreeMap<&str, &Member> = BTreeMap::new();

        for member in &entry.members {
            by_name.entry(member.name.as_str()).or_insert(member);
        }
        // Closest declaration wins: ancestors are visited nearest-first.
        for ancestor in &entry.ancestors {
            for member in &self.entry(ancestor)?.members {
                by_name.entry(member.name.as_str()).or_insert(member);
            }
        }

        Ok(by_name.into_values().cloned().collect())
    }

    fn ancestors(&self, class: &ClassId) -> Result<&[ClassId], HierarchyError> {
        Ok(&self.entry(class)?.ancestors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn diamond() -> ClassModel {
        // D(B, C), B(A), C(A)
        ModelBuilder::new()
            .class("A", &[], &["ping"])
            .class("B", &["A"], &["left"])
            .class("C", &["A"], &["right"])
            .class("D", &["B", "C"], &["ping"])
            .build()
    }

    #[test]
    fn direct_base_takes_first_resolvable() {
        let model = diamond();
        assert_eq!(
            model.direct_base(&ClassId::from("D")).unwrap(),
            Some(ClassId::from("B"))
        );
        assert_eq!(model.direct_base(&ClassId::from("A")).unwrap(), None);
    }

    #[test]
    fn unresolvable_base_acts_as_root() {
        let model = ModelBuilder::new()
            .class("Handler", &["socketserver.BaseRequestHandler"], &[])
            .build();
        assert_eq!(
            model.direct_base(&ClassId::from("Handler")).unwrap(),
            None
        );
        assert!(model.ancestors(&ClassId::from("Handler")).unwrap().is_empty());
    }

    #[test]
    fn subclasses_count_every_direct_base_position() {
        let model = diamond();
        assert_eq!(
            model.direct_subclasses(&ClassId::from("A")).unwrap(),
            &[ClassId::from("B"), ClassId::from("C")]
        );
        assert_eq!(
            model.direct_subclasses(&ClassId::from("C")).unwrap(),
            &[ClassId::from("D")]
        );
    }

    #[test]
    fn ancestors_visit_each_strict_ancestor_once() {
        let model = diamond();
        let mut ancestors = model.ancestors(&ClassId::from("D")).unwrap().to_vec();
        ancestors.sort();
        assert_eq!(
            ancestors,
            vec![ClassId::from("A"), ClassId::from("B"), ClassId::from("C")]
        );
    }

    #[test]
    fn visible_members_dedupe_by_name() {
        let model = diamond();
        let members = model.visible_members(&ClassId::from("D")).unwrap();
        let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["left", "ping", "right"]);
    }

    #[test]
    fn duplicate_declaration_keeps_first() {
        let model = ModelBuilder::new()
            .class("X", &[], &["first"])
            .class("X", &[], &["second"])
            .build();
        assert_eq!(model.len(), 1);
        let members = model.own_members(&ClassId::from("X")).unwrap();
        assert_eq!(members[0].name, "first");
    }

    #[test]
    fn unknown_class_is_a_typed_error() {
        let model = diamond();
        let err = model.own_members(&ClassId::from("Ghost")).unwrap_err();
        assert_eq!(err, HierarchyError::UnknownClass(ClassId::from("Ghost")));
    }

    #[test]
    fn builder_round_trips_through_json() {
        let json = r#"{
            "classes": [
                {"name": "Base", "members": [{"name": "run", "is_callable": true}]},
                {"name": "Child", "bases": ["Base"]}
            ]
        }"#;
        let model = ModelBuilder::from_json_str(json).unwrap().build();
        assert_eq!(model.len(), 2);
        assert_eq!(
            model.direct_base(&ClassId::from("Child")).unwrap(),
            Some(ClassId::from("Base"))
        );
        let visible = model.visible_members(&ClassId::from("Child")).unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "run");
    }
}
