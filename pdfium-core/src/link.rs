//! Link resolution
//!
//! Resolves a point-hit link annotation into an owned record. A link goes
//! to exactly one of two places: a destination inside the current document,
//! or an action. The engine exposes both lookups independently and does not
//! enforce the exclusion; this module does, by trying the destination first
//! and consulting the action only when no destination exists.

use crate::action::{ActionType, PdfAction};
use crate::destination::PdfDestination;
use log::warn;
use pdfium_engine::{DocumentHandle, LinkHandle, PageHandle, PdfiumEngine};
use serde::Serialize;

/// A link annotation resolved at a point on a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PdfLink {
    target: Option<LinkTarget>,
}

/// Where a link goes. A link never carries both a destination and an action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LinkTarget {
    /// A page in the current document.
    Destination(PdfDestination),
    /// An action (URI, launch, remote goto, ...).
    Action(PdfAction),
}

impl PdfLink {
    /// The resolved target, if the link has one.
    ///
    /// A malformed link can carry neither a destination nor an action; such
    /// links still hit, they just lead nowhere.
    pub fn target(&self) -> Option<&LinkTarget> {
        self.target.as_ref()
    }

    /// The in-document destination, if that is what this link resolves to.
    pub fn destination(&self) -> Option<&PdfDestination> {
        match self.target.as_ref()? {
            LinkTarget::Destination(dest) => Some(dest),
            LinkTarget::Action(_) => None,
        }
    }

    /// The action, if that is what this link resolves to.
    pub fn action(&self) -> Option<&PdfAction> {
        match self.target.as_ref()? {
            LinkTarget::Action(action) => Some(action),
            LinkTarget::Destination(_) => None,
        }
    }
}

/// Resolve the link at `(x, y)` in page coordinates, if any.
///
/// Runs entirely under one gateway acquisition; the caller passes the
/// exclusive engine reference down from its guard.
pub(crate) fn resolve_link_at_point(
    engine: &mut dyn PdfiumEngine,
    doc: DocumentHandle,
    page: PageHandle,
    x: f64,
    y: f64,
) -> Option<PdfLink> {
    let link = engine.link_at_point(page, x, y)?;

    let target = resolve_destination(engine, doc, link)
        .map(LinkTarget::Destination)
        .or_else(|| resolve_action(engine, doc, link).map(LinkTarget::Action));

    Some(PdfLink { target })
}

fn resolve_destination(
    engine: &mut dyn PdfiumEngine,
    doc: DocumentHandle,
    link: LinkHandle,
) -> Option<PdfDestination> {
    let dest = engine.link_destination(doc, link)?;
    let index = engine.destination_page_index(doc, dest);
    Some(PdfDestination::from_raw_index(index))
}

fn resolve_action(
    engine: &mut dyn PdfiumEngine,
    doc: DocumentHandle,
    link: LinkHandle,
) -> Option<PdfAction> {
    let action = engine.link_action(link)?;
    let kind = ActionType::from_raw(engine.action_kind(action));

    let uri = if kind == ActionType::Uri {
        decode_uri(engine.action_uri_bytes(doc, action))
    } else {
        None
    };

    Some(PdfAction::new(kind, uri))
}

/// Decode a URI byte payload as ASCII.
///
/// Trailing NULs are stripped first. A payload that is empty or not ASCII
/// yields `None`; the action itself still stands.
fn decode_uri(mut bytes: Vec<u8>) -> Option<String> {
    while bytes.last() == Some(&0) {
        bytes.pop();
    }
    if bytes.is_empty() {
        return None;
    }
    if !bytes.is_ascii() {
        warn!("URI action payload is not valid ASCII; dropping URI");
        return None;
    }
    String::from_utf8(bytes).ok()
}
