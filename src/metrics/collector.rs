use crate::core::{ClassId, ClassStats, Visibility};
use crate::errors::HierarchyError;
use crate::hierarchy::ClassHierarchy;
use crate::metrics::depth::DepthResolver;
use std::collections::HashSet;

/// Classify every callable member visible on `class` and produce its
/// statistics record.
///
/// Origin: a member not in the class's own declared set is inherited; one
/// that is, and that some strict ancestor also declares, is overridden; a
/// genuinely new method counts in neither origin bucket. Access: an explicit
/// visibility tag wins, otherwise the name-mangling convention decides
/// relative to this class. Every callable member lands in exactly one
/// access bucket.
pub fn collect_class_stats(
    hierarchy: &dyn ClassHierarchy,
    resolver: &mut DepthResolver,
    class: &ClassId,
) -> Result<ClassStats, HierarchyError> {
    let mut stats = ClassStats {
        inheritance_depth: resolver.depth(hierarchy, class)?,
        child_count: hierarchy.direct_subclasses(class)?.len(),
        ..ClassStats::default()
    };

    let own: HashSet<&str> = hierarchy
        .own_members(class)?
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    let ancestors = hierarchy.ancestors(class)?;

    for member in hierarchy.visible_members(class)? {
        if !member.is_callable {
            continue;
        }

        if !own.contains(member.name.as_str()) {
            stats.inherited_methods += 1;
        } else if declared_by_ancestor(hierarchy, ancestors, &member.name)? {
            stats.overridden_methods += 1;
        }

        let private = match member.visibility {
            Some(Visibility::Private) => true,
            Some(Visibility::Visible) => false,
            None => is_mangled_private(&member.name, class.name()),
        };
        if private {
            stats.private_methods += 1;
        } else {
            stats.visible_methods += 1;
        }
    }

    Ok(stats)
}

fn declared_by_ancestor(
    hierarchy: &dyn ClassHierarchy,
    ancestors: &[ClassId],
    name: &str,
) -> Result<bool, HierarchyError> {
    for ancestor in ancestors {
        if hierarchy
            .own_members(ancestor)?
            .iter()
            .any(|m| m.name == name)
        {
            return Ok(true);
        }
    }
    Ok(false)
}

/// The Python mangled-private convention: a `_<ClassName>` prefix marks the
/// method private to that class, unless the name ends with the `__` special
/// marker (`__init__` and friends stay visible).
pub fn is_mangled_private(name: &str, class_name: &str) -> bool {
    name.strip_prefix('_')
        .is_some_and(|rest| rest.starts_with(class_name))
        && !name.ends_with("__")
}
