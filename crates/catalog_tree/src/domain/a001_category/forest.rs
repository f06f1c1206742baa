//! Arena-backed category forest.
//!
//! Nodes live in one `Vec`; children and parents are slot indices into it, so
//! lookups by id are a hash probe and every traversal is iterative.

use contracts::domain::a001_category::aggregate::{CategoryId, CategoryRecord};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryNode {
    pub record: CategoryRecord,
    /// Child slots, in input order
    pub children: Vec<usize>,
    pub parent: Option<usize>,
    pub depth: usize,
    pub expanded: bool,
}

impl CategoryNode {
    pub fn id(&self) -> CategoryId {
        self.record.id
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// One line of a rendered tree view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeRow {
    pub id: CategoryId,
    pub depth: usize,
    pub has_children: bool,
    pub expanded: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forest {
    nodes: Vec<CategoryNode>,
    roots: Vec<usize>,
    index: HashMap<CategoryId, usize>,
}

impl Forest {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Assemble a forest from already linked nodes.
    /// `children`/`parent`/`depth` of every node must be consistent with `roots`.
    pub(crate) fn from_parts(nodes: Vec<CategoryNode>, roots: Vec<usize>) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(slot, node)| (node.record.id, slot))
            .collect();
        Self {
            nodes,
            roots,
            index,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> impl Iterator<Item = &CategoryNode> + '_ {
        self.roots.iter().map(move |&slot| &self.nodes[slot])
    }

    pub fn root_ids(&self) -> Vec<CategoryId> {
        self.roots().map(CategoryNode::id).collect()
    }

    pub fn contains(&self, id: CategoryId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: CategoryId) -> Option<&CategoryNode> {
        self.index.get(&id).map(|&slot| &self.nodes[slot])
    }

    pub(crate) fn slot(&self, slot: usize) -> &CategoryNode {
        &self.nodes[slot]
    }

    pub(crate) fn root_slots(&self) -> &[usize] {
        &self.roots
    }

    /// Slots in depth-first preorder: every parent precedes its children
    pub(crate) fn preorder_slots(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();
        while let Some(slot) = stack.pop() {
            order.push(slot);
            stack.extend(self.nodes[slot].children.iter().rev().copied());
        }
        order
    }

    /// Children ids of `id`; empty when the id is unknown
    pub fn children(&self, id: CategoryId) -> Vec<CategoryId> {
        self.get(id)
            .map(|node| node.children.iter().map(|&c| self.nodes[c].id()).collect())
            .unwrap_or_default()
    }

    /// Depth-first preorder over the whole forest
    pub fn iter_depth_first(&self) -> DepthFirst<'_> {
        DepthFirst {
            forest: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }

    /// Every id in depth-first preorder
    pub fn flatten_ids(&self) -> Vec<CategoryId> {
        self.iter_depth_first().map(CategoryNode::id).collect()
    }

    /// Rows a tree view shows: only expanded nodes are descended into
    pub fn visible_rows(&self) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();

        while let Some(slot) = stack.pop() {
            let node = &self.nodes[slot];
            rows.push(TreeRow {
                id: node.id(),
                depth: node.depth,
                has_children: node.has_children(),
                expanded: node.expanded,
            });
            if node.expanded {
                stack.extend(node.children.iter().rev().copied());
            }
        }

        rows
    }

    /// Ancestors from the root down to and including `id`
    pub fn path(&self, id: CategoryId) -> Vec<&CategoryNode> {
        let mut path = Vec::new();
        let mut current = self.index.get(&id).copied();
        while let Some(slot) = current {
            let node = &self.nodes[slot];
            path.push(node);
            current = node.parent;
        }
        path.reverse();
        path
    }

    /// "Clothing / Men" style breadcrumb
    pub fn path_label(&self, id: CategoryId, separator: &str) -> Option<String> {
        let path = self.path(id);
        if path.is_empty() {
            return None;
        }
        let names: Vec<&str> = path.iter().map(|n| n.record.name.display()).collect();
        Some(names.join(separator))
    }

    /// Products of the node and all of its descendants; missing counts are 0
    pub fn subtree_product_count(&self, id: CategoryId) -> Option<i64> {
        let start = *self.index.get(&id)?;
        let mut total: i64 = 0;
        let mut stack = vec![start];
        while let Some(slot) = stack.pop() {
            let node = &self.nodes[slot];
            total = total.saturating_add(node.record.product_count.unwrap_or(0));
            stack.extend(node.children.iter().copied());
        }
        Some(total)
    }

    // ------------------------------------------------------------------
    // Expansion
    // ------------------------------------------------------------------

    /// Flip one node's flag. Children and parents are left alone.
    pub fn toggle_expand(&mut self, id: CategoryId) -> bool {
        match self.index.get(&id) {
            Some(&slot) => {
                let node = &mut self.nodes[slot];
                node.expanded = !node.expanded;
                true
            }
            None => false,
        }
    }

    pub fn set_expanded(&mut self, id: CategoryId, expanded: bool) -> bool {
        match self.index.get(&id) {
            Some(&slot) => {
                self.nodes[slot].expanded = expanded;
                true
            }
            None => false,
        }
    }

    pub fn is_expanded(&self, id: CategoryId) -> bool {
        self.get(id).is_some_and(|node| node.expanded)
    }

    pub fn expand_all(&mut self) {
        for node in &mut self.nodes {
            if node.has_children() {
                node.expanded = true;
            }
        }
    }

    pub fn collapse_all(&mut self) {
        for node in &mut self.nodes {
            node.expanded = false;
        }
    }

    /// Expand every ancestor of `id` so that the node shows up in `visible_rows`
    pub fn expand_to(&mut self, id: CategoryId) -> bool {
        let Some(&slot) = self.index.get(&id) else {
            return false;
        };
        let mut current = self.nodes[slot].parent;
        while let Some(parent) = current {
            self.nodes[parent].expanded = true;
            current = self.nodes[parent].parent;
        }
        true
    }

    /// Ids of expanded nodes, for carrying the state over a rebuild
    pub fn expanded_ids(&self) -> HashSet<CategoryId> {
        self.nodes
            .iter()
            .filter(|node| node.expanded)
            .map(CategoryNode::id)
            .collect()
    }

    /// Expand exactly the given ids; ids that are not in the forest are ignored
    pub fn apply_expanded(&mut self, ids: &HashSet<CategoryId>) {
        for node in &mut self.nodes {
            node.expanded = ids.contains(&node.record.id);
        }
    }
}

pub struct DepthFirst<'a> {
    forest: &'a Forest,
    stack: Vec<usize>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = &'a CategoryNode;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.stack.pop()?;
        let forest = self.forest;
        let node = &forest.nodes[slot];
        self.stack.extend(node.children.iter().rev().copied());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::super::builder::build;
    use super::*;
    use contracts::domain::common::LocalizedText;

    fn record(id: i64, parent: Option<i64>, name: &str) -> CategoryRecord {
        CategoryRecord::new(id, parent, LocalizedText::new(name))
    }

    fn sample() -> Forest {
        build(vec![
            record(1, None, "Clothing").with_product_count(2),
            record(2, Some(1), "Men").with_product_count(5),
            record(3, Some(1), "Women"),
            record(5, Some(2), "Shirts").with_product_count(7),
            record(4, None, "Electronics").with_product_count(11),
        ])
    }

    fn ids(raw: &[i64]) -> Vec<CategoryId> {
        raw.iter().copied().map(CategoryId).collect()
    }

    #[test]
    fn test_flatten_is_depth_first_preorder() {
        assert_eq!(sample().flatten_ids(), ids(&[1, 2, 5, 3, 4]));
    }

    #[test]
    fn test_visible_rows_follow_expansion() {
        let mut forest = sample();
        let rows: Vec<_> = forest.visible_rows().iter().map(|r| r.id).collect();
        assert_eq!(rows, ids(&[1, 4]));

        forest.toggle_expand(CategoryId(1));
        let rows = forest.visible_rows();
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), ids(&[1, 2, 3, 4]));
        assert_eq!(rows[1].depth, 1);
        assert!(rows[1].has_children);
        assert!(!rows[1].expanded);
    }

    #[test]
    fn test_toggle_expand_does_not_cascade() {
        let mut forest = sample();
        assert!(forest.toggle_expand(CategoryId(2)));
        assert!(forest.is_expanded(CategoryId(2)));
        assert!(!forest.is_expanded(CategoryId(1)));
        assert!(!forest.is_expanded(CategoryId(5)));

        assert!(forest.toggle_expand(CategoryId(2)));
        assert!(!forest.is_expanded(CategoryId(2)));
    }

    #[test]
    fn test_toggle_expand_unknown_id() {
        let mut forest = sample();
        assert!(!forest.toggle_expand(CategoryId(99)));
        assert!(forest.expanded_ids().is_empty());
    }

    #[test]
    fn test_expand_to_opens_ancestors_only() {
        let mut forest = sample();
        assert!(forest.expand_to(CategoryId(5)));
        assert_eq!(forest.expanded_ids(), ids(&[1, 2]).into_iter().collect::<HashSet<_>>());
        assert!(forest.visible_rows().iter().any(|r| r.id == CategoryId(5)));
    }

    #[test]
    fn test_expand_all_skips_leaves() {
        let mut forest = sample();
        forest.expand_all();
        assert_eq!(forest.expanded_ids(), ids(&[1, 2]).into_iter().collect::<HashSet<_>>());
        forest.collapse_all();
        assert!(forest.expanded_ids().is_empty());
    }

    #[test]
    fn test_expanded_ids_survive_rebuild_when_reapplied() {
        let mut forest = sample();
        forest.toggle_expand(CategoryId(1));
        let saved = forest.expanded_ids();

        let mut rebuilt = sample();
        assert!(rebuilt.expanded_ids().is_empty());
        rebuilt.apply_expanded(&saved);
        assert!(rebuilt.is_expanded(CategoryId(1)));
    }

    #[test]
    fn test_path_and_label() {
        let forest = sample();
        let path: Vec<_> = forest.path(CategoryId(5)).iter().map(|n| n.id()).collect();
        assert_eq!(path, ids(&[1, 2, 5]));
        assert_eq!(
            forest.path_label(CategoryId(5), " / ").as_deref(),
            Some("Clothing / Men / Shirts")
        );
        assert!(forest.path(CategoryId(42)).is_empty());
        assert_eq!(forest.path_label(CategoryId(42), " / "), None);
    }

    #[test]
    fn test_subtree_product_count() {
        let forest = sample();
        assert_eq!(forest.subtree_product_count(CategoryId(1)), Some(14));
        assert_eq!(forest.subtree_product_count(CategoryId(3)), Some(0));
        assert_eq!(forest.subtree_product_count(CategoryId(42)), None);
    }

    #[test]
    fn test_subtree_product_count_saturates() {
        let forest = build(vec![
            record(1, None, "Clothing").with_product_count(i64::MAX),
            record(2, Some(1), "Men").with_product_count(i64::MAX),
            record(3, Some(1), "Women").with_product_count(1),
        ]);
        assert_eq!(forest.subtree_product_count(CategoryId(1)), Some(i64::MAX));
        assert_eq!(forest.subtree_product_count(CategoryId(3)), Some(1));
    }

    #[test]
    fn test_children_lookup() {
        let forest = sample();
        assert_eq!(forest.children(CategoryId(1)), ids(&[2, 3]));
        assert!(forest.children(CategoryId(4)).is_empty());
        assert!(forest.children(CategoryId(42)).is_empty());
    }
}
