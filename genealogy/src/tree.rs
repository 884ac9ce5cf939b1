//! Tree layout derivation
//!
//! Turns the flat member list into nested nodes: each person carries one
//! branch per spouse, and each branch holds the children born to that
//! spouse. Children whose mother is not among the spouses are collected in
//! a trailing unassigned branch.

use serde::{Deserialize, Serialize};

use crate::components::{Family, Gender, Person, PersonId};
use crate::graph::MemberPool;
use crate::walk::within;

/// Generation ceiling used when the caller does not pick one.
pub const DEFAULT_MAX_DEPTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeOptions {
    /// Nodes deeper than this many hops below their root are not emitted.
    pub max_depth: usize,
    /// When off, daughters are hidden. Roots are always shown.
    pub show_female: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            show_female: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: PersonId,
    pub name: String,
    pub gender: Gender,
    pub generation: i32,
    pub depth: usize,
    pub branches: Vec<Branch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Spouse as written on the record; `None` marks the unassigned branch.
    pub spouse: Option<String>,
    /// Set when the spouse resolves to a tracked person.
    pub spouse_id: Option<PersonId>,
    pub children: Vec<TreeNode>,
}

impl Branch {
    pub fn is_unassigned(&self) -> bool {
        self.spouse.is_none()
    }
}

impl TreeNode {
    /// Deepest hop count found in this subtree.
    pub fn max_depth(&self) -> usize {
        self.branches
            .iter()
            .flat_map(|b| b.children.iter())
            .map(TreeNode::max_depth)
            .max()
            .unwrap_or(self.depth)
    }

    pub fn node_count(&self) -> usize {
        1 + self
            .branches
            .iter()
            .flat_map(|b| b.children.iter())
            .map(TreeNode::node_count)
            .sum::<usize>()
    }

    pub fn find(&self, id: PersonId) -> Option<&TreeNode> {
        if self.id == id {
            return Some(self);
        }
        self.branches
            .iter()
            .flat_map(|b| b.children.iter())
            .find_map(|c| c.find(id))
    }
}

/// Members a family's tree starts from: the first generation and anyone
/// whose father is not recorded in the same book.
pub fn roots(family: &Family) -> Vec<&Person> {
    family
        .members
        .iter()
        .filter(|m| m.generation == 1 || m.father_id.and_then(|f| family.member(f)).is_none())
        .collect()
}

/// Nested view under `root_id`, or `None` when the id is unknown.
///
/// Traversal follows child links downward only; the depth bound caps
/// recursion even if the data contains a cycle.
pub fn derive_tree(pool: &MemberPool<'_>, root_id: PersonId, options: TreeOptions) -> Option<TreeNode> {
    pool.find_by_id(root_id)
        .map(|root| build_node(pool, root, 0, options))
}

/// One tree per root of `family`, resolving spouses against `pool`.
pub fn derive_forest(family: &Family, pool: &MemberPool<'_>, options: TreeOptions) -> Vec<TreeNode> {
    roots(family)
        .into_iter()
        .filter_map(|root| derive_tree(pool, root.id, options))
        .collect()
}

fn build_node<'a>(pool: &MemberPool<'a>, person: &'a Person, depth: usize, options: TreeOptions) -> TreeNode {
    let child_depth = depth + 1;
    let visible: Vec<&'a Person> = if within(child_depth, options.max_depth) {
        pool.children(person)
            .into_iter()
            .filter(|c| options.show_female || !c.is_female())
            .collect()
    } else {
        Vec::new()
    };

    let branches = pool
        .group_by_spouse(person, visible)
        .into_iter()
        .map(|group| Branch {
            spouse: group.spouse.map(|s| pool.display_name(s)),
            spouse_id: group.record.map(|p| p.id),
            children: group
                .children
                .into_iter()
                .map(|child| build_node(pool, child, child_depth, options))
                .collect(),
        })
        .collect();

    TreeNode {
        id: person.id,
        name: person.full_name(),
        gender: person.gender,
        generation: person.generation,
        depth,
        branches,
    }
}
