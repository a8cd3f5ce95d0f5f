//! Menu tree: the hierarchical entries the navigation panels render.
//!
//! A [`MenuTree`] is a forest of [`MenuNode`]s, one root per level-1 entry.
//! Trees are immutable per permission snapshot; the builder in
//! [`crate::builder`] produces a fresh tree whenever the access snapshot
//! changes, and nothing mutates a tree after that.
//!
//! # Example
//!
//! ```
//! use wayline_core::menu::{MenuNode, MenuTree};
//!
//! let tree = MenuTree::new(vec![
//!     MenuNode::new("configuration")
//!         .child(MenuNode::new("devices").child(MenuNode::new("sensor"))),
//! ]);
//!
//! assert!(tree.node_at(["configuration", "devices"]).is_some());
//! assert!(tree.node_at(["configuration", "missing"]).is_none());
//! ```

use crate::location::LocationKey;

/// The standard operation set synthesized under operation-bearing leaves.
///
/// Order is fixed: status, insert, update, massive, assign. Presence of the
/// optional members is governed by per-table flags and lineage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Read-only listing; never carries unsaved edits.
    Status,
    /// Single-record creation form.
    Insert,
    /// Edit-existing form.
    Update,
    /// Bulk-entry form.
    Massive,
    /// Permission-assignment form (permissions family only).
    Assign,
}

impl Operation {
    /// All operations in their fixed synthesis order.
    pub const ALL: [Self; 5] = [
        Self::Status,
        Self::Insert,
        Self::Update,
        Self::Massive,
        Self::Assign,
    ];

    /// Stable segment identifier used in location keys.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Massive => "massive",
            Self::Assign => "assign",
        }
    }

    /// Parse a key segment back into an operation.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.id() == id)
    }
}

/// Reference to an icon by stable name; resolution is the renderer's job.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IconRef(String);

impl IconRef {
    /// Wrap an icon name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The icon name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// One entry in the hierarchical menu.
#[derive(Debug, Clone)]
pub struct MenuNode {
    id: String,
    label: String,
    icon: Option<IconRef>,
    category: Option<String>,
    /// Permission name checked against the access snapshot. Falls back to
    /// the label when unset.
    required_menu: Option<String>,
    /// Whether this leaf synthesizes the standard operation children.
    has_operations: bool,
    children: Vec<MenuNode>,
}

impl MenuNode {
    /// Create a node whose label defaults to its id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            icon: None,
            category: None,
            required_menu: None,
            has_operations: false,
            children: Vec::new(),
        }
    }

    /// Set the display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set an icon reference.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(IconRef::new(icon));
        self
    }

    /// Set a category tag (color family, grouping hint).
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Override the permission name this node is checked against.
    #[must_use]
    pub fn with_required_menu(mut self, menu: impl Into<String>) -> Self {
        self.required_menu = Some(menu.into());
        self
    }

    /// Mark this leaf as bearing the standard operation children.
    #[must_use]
    pub fn with_operations(mut self) -> Self {
        self.has_operations = true;
        self
    }

    /// Add a child node.
    #[must_use]
    pub fn child(mut self, node: MenuNode) -> Self {
        self.children.push(node);
        self
    }

    /// Set children from a vec.
    #[must_use]
    pub fn with_children(mut self, nodes: Vec<MenuNode>) -> Self {
        self.children = nodes;
        self
    }

    /// Stable identifier (the location-key segment).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Icon reference, if set.
    #[must_use]
    pub fn icon(&self) -> Option<&IconRef> {
        self.icon.as_ref()
    }

    /// Category tag, if set.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// The permission name checked against the access snapshot.
    #[must_use]
    pub fn required_menu(&self) -> &str {
        self.required_menu.as_deref().unwrap_or(&self.label)
    }

    /// Whether this leaf synthesizes operation children.
    #[must_use]
    pub fn has_operations(&self) -> bool {
        self.has_operations
    }

    /// Child nodes.
    #[must_use]
    pub fn children(&self) -> &[MenuNode] {
        &self.children
    }

    /// Whether any children exist.
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Find a direct child by id.
    #[must_use]
    pub fn find_child(&self, id: &str) -> Option<&MenuNode> {
        self.children.iter().find(|c| c.id == id)
    }

    pub(crate) fn push_child(&mut self, node: MenuNode) {
        self.children.push(node);
    }
}

/// The static template tree the builder prunes per permission snapshot.
///
/// Structurally identical to a [`MenuTree`]; the distinct type keeps
/// "authoring shape" and "pruned, trusted shape" from mixing.
#[derive(Debug, Clone, Default)]
pub struct MenuTemplate {
    roots: Vec<MenuNode>,
}

impl MenuTemplate {
    /// Create a template from its level-1 entries.
    #[must_use]
    pub fn new(roots: Vec<MenuNode>) -> Self {
        Self { roots }
    }

    /// Add a level-1 entry.
    #[must_use]
    pub fn root(mut self, node: MenuNode) -> Self {
        self.roots.push(node);
        self
    }

    /// Level-1 entries.
    #[must_use]
    pub fn roots(&self) -> &[MenuNode] {
        &self.roots
    }
}

/// A pruned, render-ready menu forest.
#[derive(Debug, Clone, Default)]
pub struct MenuTree {
    roots: Vec<MenuNode>,
}

impl MenuTree {
    /// Build a tree from pruned roots.
    #[must_use]
    pub fn new(roots: Vec<MenuNode>) -> Self {
        Self { roots }
    }

    /// The empty tree (rendered as nothing).
    #[must_use]
    pub const fn empty() -> Self {
        Self { roots: Vec::new() }
    }

    /// Whether the tree has no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Level-1 entries.
    #[must_use]
    pub fn roots(&self) -> &[MenuNode] {
        &self.roots
    }

    /// Walk segments from the root, returning the node at the full path.
    #[must_use]
    pub fn node_at<'a, I>(&self, segments: I) -> Option<&MenuNode>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut segments = segments.into_iter();
        let first = segments.next()?;
        let mut node = self.roots.iter().find(|n| n.id() == first)?;
        for seg in segments {
            node = node.find_child(seg)?;
        }
        Some(node)
    }

    /// The node a key points at, if every segment resolves.
    #[must_use]
    pub fn node_for(&self, key: &LocationKey) -> Option<&MenuNode> {
        if key.is_root() {
            return None;
        }
        self.node_at(key.segments().iter().map(String::as_str))
    }

    /// Longest prefix of `key` whose every segment resolves to a node.
    ///
    /// This is the soft-fail walk: the first unresolvable segment stops the
    /// walk and the matched prefix becomes the effective path. The home key
    /// resolves to itself.
    #[must_use]
    pub fn resolve(&self, key: &LocationKey) -> LocationKey {
        let mut matched = 0;
        let mut children: &[MenuNode] = &self.roots;
        for seg in key.segments() {
            match children.iter().find(|n| n.id() == seg.as_str()) {
                Some(node) => {
                    matched += 1;
                    children = node.children();
                }
                None => break,
            }
        }
        key.prefix(matched)
    }
}
