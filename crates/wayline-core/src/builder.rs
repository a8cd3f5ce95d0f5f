//! Permission-pruned menu building.
//!
//! [`build_menu`] turns the static [`MenuTemplate`] into a render-ready
//! [`MenuTree`] for one access snapshot. Pruning is post-order: a node
//! survives when its own permission name matches the snapshot, or when any
//! descendant survives. Leaves flagged as operation-bearing get their
//! operation children synthesized here, in the fixed order
//! status, insert, update, massive, assign.
//!
//! # Failure Modes
//!
//! - Snapshot not yet resolved (`None`): returns the empty tree. Rendering
//!   nothing beats flashing entries the user may not be allowed to see.
//! - Snapshot grants nothing: same result, by pruning.

use crate::access::{AccessSnapshot, FlagSource};
use crate::location::LocationKey;
use crate::menu::{MenuNode, MenuTemplate, MenuTree, Operation};

/// Builder knobs that are not per-table.
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    /// Level-1 ids whose descendants get the assign operation appended.
    assign_lineage: Vec<String>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            assign_lineage: vec!["permissions".to_owned()],
        }
    }
}

impl BuilderConfig {
    /// Default configuration (assign under the `permissions` lineage).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the lineage roots that receive the assign operation.
    #[must_use]
    pub fn with_assign_lineage<I, S>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assign_lineage = roots.into_iter().map(Into::into).collect();
        self
    }

    fn in_assign_lineage(&self, path: &LocationKey) -> bool {
        path.segment(0)
            .is_some_and(|root| self.assign_lineage.iter().any(|r| r == root))
    }
}

/// Build the pruned tree for one access snapshot.
///
/// `access` is `None` while the permission source has not resolved; the
/// result is then the empty tree.
#[must_use]
pub fn build_menu(
    template: &MenuTemplate,
    access: Option<&AccessSnapshot>,
    flags: &dyn FlagSource,
    config: &BuilderConfig,
) -> MenuTree {
    let Some(access) = access else {
        return MenuTree::empty();
    };

    let roots: Vec<MenuNode> = template
        .roots()
        .iter()
        .filter_map(|node| prune(node, &LocationKey::root(), access, flags, config))
        .collect();

    #[cfg(feature = "tracing")]
    tracing::debug!(
        target: "wayline::menu",
        roots = roots.len(),
        granted = access.len(),
        "menu tree rebuilt"
    );

    MenuTree::new(roots)
}

/// Post-order prune of one subtree. Returns the surviving copy, if any.
fn prune(
    node: &MenuNode,
    parent_path: &LocationKey,
    access: &AccessSnapshot,
    flags: &dyn FlagSource,
    config: &BuilderConfig,
) -> Option<MenuNode> {
    let path = parent_path.join(node.id());

    let survivors: Vec<MenuNode> = node
        .children()
        .iter()
        .filter_map(|child| prune(child, &path, access, flags, config))
        .collect();

    let own_match = access.matches(node.required_menu());
    if !own_match && survivors.is_empty() {
        return None;
    }

    let mut kept = node.clone().with_children(survivors);
    if kept.has_operations() && !kept.has_children() {
        for op in operation_children(&path, flags, config) {
            kept.push_child(op);
        }
    }
    Some(kept)
}

/// Synthesize the operation children for an operation-bearing leaf.
///
/// `table_path` is the leaf's full path; its final segment names the table
/// whose flags govern which optional operations appear.
fn operation_children(
    table_path: &LocationKey,
    flags: &dyn FlagSource,
    config: &BuilderConfig,
) -> Vec<MenuNode> {
    let table = table_path.leaf().unwrap_or_default();
    let table_flags = flags.flags(table);

    let mut ops = vec![operation_node(Operation::Status)];
    if table_flags.allow_insert() {
        ops.push(operation_node(Operation::Insert));
    }
    if table_flags.allow_update() {
        ops.push(operation_node(Operation::Update));
    }
    if table_flags.allow_massive() {
        ops.push(operation_node(Operation::Massive));
    }
    if config.in_assign_lineage(table_path) {
        ops.push(operation_node(Operation::Assign));
    }
    ops
}

fn operation_node(op: Operation) -> MenuNode {
    MenuNode::new(op.id()).with_icon(op.id())
}
