//! Compaction passes run over a freshly attached tree.
//!
//! [`compact`] removes directory levels that only lead to another directory,
//! and [`strip_common_prefixes`] shortens the remaining directory labels so
//! that no label repeats what an ancestor already shows.

use crate::path_key::{is_separator, PathKey};

use super::{DisplayTree, NodeId, NodeKind};

/// Whether `id` stays visible after compaction.
///
/// Leaves always stay. A directory stays if it branches, or if its only
/// child is a document. A directory whose only child is another directory
/// is elided, and so is one left without children.
fn keeps_level(tree: &DisplayTree, id: NodeId) -> bool {
    let node = &tree[id];

    match node.kind() {
        NodeKind::Root | NodeKind::Leaf(_) => true,
        NodeKind::Directory { .. } => match node.children() {
            [] => false,
            [only] => tree[*only].is_leaf(),
            _ => true,
        },
    }
}

/// Post-order pass that splices the children of every elided directory into
/// its parent, at the position the directory occupied.
///
/// Elided directories end up disconnected and parentless but remain in the
/// registry, so a later build can connect them again.
pub fn compact(tree: &mut DisplayTree, id: NodeId) {
    let children = tree.take_children(id);
    let mut kept = Vec::with_capacity(children.len());

    for child in children {
        compact(tree, child);

        if keeps_level(tree, child) {
            kept.push(child);
            continue;
        }

        let grandchildren = tree.take_children(child);
        if let Some(node) = tree.get_mut(child) {
            node.connected = false;
            node.parent = None;
        }

        log::trace!(
            "Eliding {:?} ({}), lifting {} children",
            child,
            tree.label(child),
            grandchildren.len()
        );

        kept.extend(grandchildren);
    }

    tree.set_children(id, kept);
}

/// Pre-order pass that removes `inherited_prefix` from the label of every
/// directory below `id`.
///
/// Each directory passes its own label from before stripping down to its
/// children. Separators left at the front of a stripped label are dropped
/// too, so ancestors don't need a trailing separator for this to work.
pub fn strip_common_prefixes(tree: &mut DisplayTree, key: &PathKey, id: NodeId, inherited_prefix: &str) {
    let children = tree.children(id).to_vec();

    for child in children {
        let original = match tree.get(child).map(|node| node.kind()) {
            Some(NodeKind::Directory { label, .. }) => label.clone(),
            _ => continue,
        };

        if !inherited_prefix.is_empty() {
            let stripped = key
                .strip_prefix(&original, inherited_prefix)
                .map(|rest| rest.trim_start_matches(is_separator))
                .filter(|rest| !rest.is_empty())
                .map(str::to_owned);

            if let Some(stripped) = stripped {
                if let Some(NodeKind::Directory { label, .. }) =
                    tree.get_mut(child).map(|node| &mut node.kind)
                {
                    *label = stripped;
                }
            }
        }

        strip_common_prefixes(tree, key, child, &original);
    }
}
