//! Text rendering of a display tree, one row per visible node.

use std::io;

use termcolor::{Color, ColorSpec, WriteColor};

use crate::{
    document::DocumentId,
    tree::{DisplayTree, NodeId},
};

/// Every row below the root in display order, indented two spaces per
/// level.
pub fn outline(tree: &DisplayTree) -> String {
    let mut out = String::new();

    for (depth, id) in rows(tree, &|_| true) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(tree.label(id));
        out.push('\n');
    }

    out
}

/// Like [`outline`], but only descends into directories for which
/// `is_expanded` holds, colours directories and marks dirty documents with
/// `*` and the current document with `[current]`.
pub fn write_outline<W: WriteColor>(
    tree: &DisplayTree,
    current: Option<DocumentId>,
    is_expanded: &dyn Fn(NodeId) -> bool,
    out: &mut W,
) -> io::Result<()> {
    let no_color = ColorSpec::new();
    let mut directory_color = ColorSpec::new();
    directory_color.set_fg(Some(Color::Blue)).set_bold(true);
    let mut dirty_color = ColorSpec::new();
    dirty_color.set_fg(Some(Color::Yellow));
    let mut current_color = ColorSpec::new();
    current_color.set_fg(Some(Color::Green)).set_bold(true);

    for (depth, id) in rows(tree, is_expanded) {
        write!(out, "{:width$}", "", width = depth * 2)?;

        let Some(document) = tree.document(id) else {
            out.set_color(&directory_color)?;
            writeln!(out, "{}", tree.label(id))?;
            out.set_color(&no_color)?;
            continue;
        };

        let is_current = current == Some(document.id());
        if is_current {
            out.set_color(&current_color)?;
        }
        write!(out, "{}", tree.label(id))?;
        out.set_color(&no_color)?;

        if document.is_dirty() {
            out.set_color(&dirty_color)?;
            write!(out, " *")?;
            out.set_color(&no_color)?;
        }
        if is_current {
            write!(out, " [current]")?;
        }
        writeln!(out)?;
    }

    Ok(())
}

fn rows(tree: &DisplayTree, is_expanded: &dyn Fn(NodeId) -> bool) -> Vec<(usize, NodeId)> {
    let mut rows = Vec::new();
    for &child in tree.children(tree.root_id()) {
        collect_rows(tree, is_expanded, child, 0, &mut rows);
    }
    rows
}

fn collect_rows(
    tree: &DisplayTree,
    is_expanded: &dyn Fn(NodeId) -> bool,
    id: NodeId,
    depth: usize,
    rows: &mut Vec<(usize, NodeId)>,
) {
    rows.push((depth, id));

    if !is_expanded(id) {
        return;
    }
    for &child in tree.children(id) {
        collect_rows(tree, is_expanded, child, depth + 1, rows);
    }
}
