use crate::core::ClassId;
use crate::errors::HierarchyError;
use crate::hierarchy::ClassHierarchy;
use std::collections::{HashMap, HashSet};

/// Memoized inheritance-depth computation. Depth is the length of the
/// direct-base chain down to the hierarchy root (root = 0).
///
/// The cache only ever grows within one run, so the total work for N
/// classes sharing a chain of length L is O(N + L). The walk is iterative
/// with a seen-set, so a cyclic base chain is reported as
/// [`HierarchyError::InheritanceCycle`] instead of recursing forever.
#[derive(Debug, Default)]
pub struct DepthResolver {
    cache: HashMap<ClassId, u32>,
}

impl DepthResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(
        &mut self,
        hierarchy: &dyn ClassHierarchy,
        class: &ClassId,
    ) -> Result<u32, HierarchyError> {
        if let Some(&depth) = self.cache.get(class) {
            return Ok(depth);
        }

        // Walk up until the root or an already-resolved ancestor, then
        // assign depths back down the recorded chain.
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = class.clone();

        let base_depth = loop {
            if !seen.insert(current.clone()) {
                return Err(HierarchyError::InheritanceCycle(current));
            }
            chain.push(current.clone());
            match hierarchy.direct_base(&current)? {
                None => break 0,
                Some(base) => {
                    if let Some(&cached) = self.cache.get(&base) {
                        break cached + 1;
                    }
                    current = base;
                }
            }
        };

        let mut depth = base_depth;
        for link in chain.iter().rev() {
            self.cache.insert(link.clone(), depth);
            depth += 1;
        }

        Ok(base_depth + chain.len() as u32 - 1)
    }

    #[cfg(test)]
    pub(crate) fn cached_len(&self) -> usize {
        self.cache.len()
    }
}
