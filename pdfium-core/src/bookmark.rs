//! Bookmark (outline) tree construction
//!
//! The engine exposes bookmarks as a flat sibling/first-child pointer
//! relation. This module walks that relation into an owned tree in document
//! order. The relation comes from an untrusted document, so the walk carries
//! two safety bounds: a total node budget and a depth cap. Exceeding either
//! logs a warning and returns the tree built so far: a truncated outline,
//! never a hang or a crash.

use log::warn;
use pdfium_engine::{BookmarkHandle, DocumentHandle, PdfiumEngine};
use serde::Serialize;

/// Upper bound on total bookmark nodes collected from one document.
const MAX_BOOKMARK_NODES: usize = 8192;

/// Upper bound on bookmark nesting depth.
const MAX_BOOKMARK_DEPTH: usize = 64;

/// A bookmark (outline item) in a document.
///
/// Forms a tree; sibling order matches document declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PdfBookmark {
    /// Display title.
    pub title: String,
    /// Target page index (0-based); `None` when the bookmark has no
    /// resolvable destination.
    pub page_index: Option<usize>,
    /// Resolved URI, for bookmarks that point outside the document.
    pub uri: Option<String>,
    /// Child bookmarks, in declaration order.
    pub children: Vec<PdfBookmark>,
}

impl PdfBookmark {
    /// Whether this bookmark has children.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// A flattened outline entry with its depth in the tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatBookmark {
    /// Display title.
    pub title: String,
    /// Target page index (0-based), if any.
    pub page_index: Option<usize>,
    /// Depth in the tree (0 = top level).
    pub depth: usize,
}

/// Build the table of contents for a document.
///
/// Returns the top-level bookmarks in declaration order; empty when the
/// document has no outline. Runs under one gateway acquisition.
pub(crate) fn build_table_of_contents(
    engine: &mut dyn PdfiumEngine,
    doc: DocumentHandle,
) -> Vec<PdfBookmark> {
    let mut roots = Vec::new();
    let Some(first) = engine.first_child_bookmark(doc, None) else {
        return roots;
    };

    let mut budget = MAX_BOOKMARK_NODES;
    collect_siblings(engine, doc, first, 0, &mut budget, &mut roots);
    roots
}

/// Walk a sibling chain, recursing one level per child link.
///
/// The sibling chain is iterated, not recursed, so a long (or cyclic) chain
/// costs budget rather than stack. Child recursion is bounded by
/// `MAX_BOOKMARK_DEPTH`.
fn collect_siblings(
    engine: &mut dyn PdfiumEngine,
    doc: DocumentHandle,
    first: BookmarkHandle,
    depth: usize,
    budget: &mut usize,
    out: &mut Vec<PdfBookmark>,
) {
    let mut current = Some(first);
    while let Some(handle) = current {
        if *budget == 0 {
            warn!(
                "bookmark traversal exceeded {} nodes; returning truncated outline",
                MAX_BOOKMARK_NODES
            );
            return;
        }
        *budget -= 1;

        let target = engine.bookmark_target_page(doc, handle);
        let mut node = PdfBookmark {
            title: engine.bookmark_title(handle),
            page_index: usize::try_from(target).ok(),
            uri: None,
            children: Vec::new(),
        };

        if let Some(child) = engine.first_child_bookmark(doc, Some(handle)) {
            if depth + 1 >= MAX_BOOKMARK_DEPTH {
                warn!(
                    "bookmark tree deeper than {} levels; pruning subtree under {:?}",
                    MAX_BOOKMARK_DEPTH, node.title
                );
            } else {
                collect_siblings(engine, doc, child, depth + 1, budget, &mut node.children);
            }
        }

        out.push(node);
        current = engine.next_sibling_bookmark(doc, handle);
    }
}

/// Flatten an outline into pre-order with depth annotations.
///
/// Useful for hosts that present the outline as an indented list.
pub fn flatten_outline(roots: &[PdfBookmark]) -> Vec<FlatBookmark> {
    let mut out = Vec::new();
    flatten_into(roots, 0, &mut out);
    out
}

fn flatten_into(nodes: &[PdfBookmark], depth: usize, out: &mut Vec<FlatBookmark>) {
    for node in nodes {
        out.push(FlatBookmark {
            title: node.title.clone(),
            page_index: node.page_index,
            depth,
        });
        flatten_into(&node.children, depth + 1, out);
    }
}
