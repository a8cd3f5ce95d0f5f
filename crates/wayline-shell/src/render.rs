#![forbid(unsafe_code)]

//! Pure render reduction: `(tree, location, panels) → RenderDescriptor`.
//!
//! The descriptor is the only thing a renderer needs: which screen to
//! mount, and for each panel level its slide phase plus the menu entries
//! it shows. Screen selection pattern-matches the parsed segment tuple —
//! every branch is independently testable, and no string-prefix dispatch
//! survives anywhere.

use wayline_core::location::LocationKey;
use wayline_core::menu::{MenuNode, MenuTree, Operation};
use wayline_guard::form::OperationTab;
use wayline_panels::open_path::OpenPath;
use wayline_panels::panel::{PanelLevel, PanelSet, SlidePhase};

/// Which screen the content area mounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Home: nothing selected.
    Welcome,
    /// A section or plain leaf; the host decides the detail view.
    Section {
        /// Effective path of the selection.
        path: LocationKey,
    },
    /// A table operation screen.
    Operations {
        /// The table the operations act on.
        table: String,
        /// The active operation tab.
        tab: OperationTab,
        /// Effective path of the selection.
        path: LocationKey,
    },
}

/// One menu entry as a panel renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneItem {
    /// Stable id (the key segment).
    pub id: String,
    /// Display label.
    pub label: String,
    /// Icon name, if the node carries one.
    pub icon: Option<String>,
    /// Whether this entry lies on the active path.
    pub active: bool,
    /// Whether this entry's children are open one level deeper.
    pub open: bool,
}

/// One panel level's render state.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelPane {
    /// The level this pane occupies.
    pub level: PanelLevel,
    /// Slide phase driving the renderer's transition primitive.
    pub phase: SlidePhase,
    /// Open fraction in [0.0, 1.0].
    pub progress: f64,
    /// Entries shown at this level.
    pub items: Vec<PaneItem>,
}

/// The full render state for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderDescriptor {
    /// The content screen.
    pub screen: Screen,
    /// Panes with entries, shallowest first. Levels past the open depth
    /// carry no pane at all.
    pub panes: Vec<PanelPane>,
}

/// Reduce navigation state to a render descriptor.
#[must_use]
pub fn render_descriptor(
    tree: &MenuTree,
    active: &LocationKey,
    open: &OpenPath,
    panels: &PanelSet,
) -> RenderDescriptor {
    RenderDescriptor {
        screen: screen_for(tree, active),
        panes: panes_for(tree, active, open, panels),
    }
}

/// Select the content screen from the parsed segment tuple.
fn screen_for(tree: &MenuTree, active: &LocationKey) -> Screen {
    let effective = tree.resolve(active);
    let Some(leaf) = effective.leaf() else {
        return Screen::Welcome;
    };
    match (Operation::from_id(leaf), effective.depth()) {
        // An operation id below a table segment mounts the CRUD screen.
        (Some(op), depth) if depth >= 2 => Screen::Operations {
            table: effective
                .segment(depth - 2)
                .unwrap_or_default()
                .to_owned(),
            tab: OperationTab::from(op),
            path: effective,
        },
        _ => Screen::Section { path: effective },
    }
}

fn panes_for(
    tree: &MenuTree,
    active: &LocationKey,
    open: &OpenPath,
    panels: &PanelSet,
) -> Vec<PanelPane> {
    let mut panes = Vec::new();

    // Main pane always lists the roots.
    panes.push(pane(
        PanelLevel::Main,
        tree.roots(),
        &LocationKey::root(),
        active,
        open,
        panels,
    ));

    // One auxiliary pane per open prefix with children.
    for prefix in open.entries() {
        let Some(level) = PanelLevel::for_depth(prefix.depth()) else {
            continue;
        };
        let Some(node) = tree.node_for(prefix) else {
            continue;
        };
        panes.push(pane(level, node.children(), prefix, active, open, panels));
    }

    panes
}

fn pane(
    level: PanelLevel,
    nodes: &[MenuNode],
    prefix: &LocationKey,
    active: &LocationKey,
    open: &OpenPath,
    panels: &PanelSet,
) -> PanelPane {
    let slide = panels.get(level).slide;
    PanelPane {
        level,
        phase: slide.phase(),
        progress: slide.progress(),
        items: nodes
            .iter()
            .map(|node| {
                let path = prefix.join(node.id());
                PaneItem {
                    id: node.id().to_owned(),
                    label: node.label().to_owned(),
                    icon: node.icon().map(|i| i.name().to_owned()),
                    active: active.starts_with(&path),
                    open: open.contains(&path),
                }
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayline_core::menu::MenuNode;

    fn tree() -> MenuTree {
        MenuTree::new(vec![
            MenuNode::new("configuration").child(
                MenuNode::new("devices").child(
                    MenuNode::new("sensor")
                        .child(MenuNode::new("status"))
                        .child(MenuNode::new("insert")),
                ),
            ),
            MenuNode::new("reports").child(MenuNode::new("dashboard")),
        ])
    }

    fn key(raw: &str) -> LocationKey {
        LocationKey::parse(raw).unwrap()
    }

    #[test]
    fn root_location_mounts_welcome() {
        let desc = render_descriptor(
            &tree(),
            &LocationKey::root(),
            &OpenPath::new(),
            &PanelSet::new(),
        );
        assert_eq!(desc.screen, Screen::Welcome);
    }

    #[test]
    fn operation_leaf_mounts_operations_screen() {
        let desc = render_descriptor(
            &tree(),
            &key("configuration-devices-sensor-insert"),
            &OpenPath::new(),
            &PanelSet::new(),
        );
        assert_eq!(
            desc.screen,
            Screen::Operations {
                table: "sensor".to_owned(),
                tab: OperationTab::Insert,
                path: key("configuration-devices-sensor-insert"),
            }
        );
    }

    #[test]
    fn internal_node_mounts_section() {
        let desc = render_descriptor(
            &tree(),
            &key("configuration-devices"),
            &OpenPath::new(),
            &PanelSet::new(),
        );
        assert_eq!(
            desc.screen,
            Screen::Section {
                path: key("configuration-devices")
            }
        );
    }

    #[test]
    fn unresolvable_tail_reduces_to_valid_prefix_screen() {
        let desc = render_descriptor(
            &tree(),
            &key("configuration-bogus"),
            &OpenPath::new(),
            &PanelSet::new(),
        );
        assert_eq!(
            desc.screen,
            Screen::Section {
                path: key("configuration")
            }
        );
    }

    #[test]
    fn panes_follow_the_open_chain() {
        let tree = tree();
        let mut open = OpenPath::new();
        open.replace(vec![key("configuration"), key("configuration-devices")]);

        let desc = render_descriptor(
            &tree,
            &key("configuration-devices-sensor"),
            &open,
            &PanelSet::new(),
        );
        let levels: Vec<PanelLevel> = desc.panes.iter().map(|p| p.level).collect();
        assert_eq!(levels, vec![PanelLevel::Main, PanelLevel::Aux1, PanelLevel::Aux2]);

        // The aux2 pane lists the devices' children.
        let ids: Vec<&str> = desc.panes[2].items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["sensor"]);
        assert!(desc.panes[2].items[0].active);
    }

    #[test]
    fn active_flags_follow_the_path() {
        let tree = tree();
        let mut open = OpenPath::new();
        open.replace(vec![key("configuration")]);

        let desc = render_descriptor(&tree, &key("configuration-devices"), &open, &PanelSet::new());
        let main = &desc.panes[0];
        let configuration = main.items.iter().find(|i| i.id == "configuration").unwrap();
        let reports = main.items.iter().find(|i| i.id == "reports").unwrap();
        assert!(configuration.active && configuration.open);
        assert!(!reports.active && !reports.open);
    }
}
