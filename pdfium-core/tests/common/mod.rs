//! Shared test support: an instrumented fake engine.
//!
//! `FakeEngine` implements the full engine boundary against in-memory
//! fixtures. It is instrumented two ways:
//!
//! - an occupancy probe that panics if two engine calls ever overlap in
//!   time (the serialization property the gateway must guarantee);
//! - a journal of close events, so tests can assert teardown ordering.

#![allow(dead_code)]

use pdfium_engine::{
    ActionHandle, BookmarkHandle, DestinationHandle, DocumentHandle, EngineError, LinkHandle,
    PageHandle, PageSurface, PdfiumEngine, PixelBuffer,
};
use std::collections::HashMap;
use std::os::fd::RawFd;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Byte the fake engine paints when asked to render.
pub const RENDER_BYTE: u8 = 0xCC;

// ============================================================================
// Instrumentation
// ============================================================================

/// Asserts that engine calls never overlap or re-enter.
pub struct OccupancyProbe {
    busy: AtomicBool,
    entries: AtomicUsize,
    stall: Option<Duration>,
}

impl OccupancyProbe {
    fn new(stall: Option<Duration>) -> Self {
        Self {
            busy: AtomicBool::new(false),
            entries: AtomicUsize::new(0),
            stall,
        }
    }

    // The guard owns an `Arc` rather than borrowing the probe, so the engine
    // stays free to mutate itself while a call is marked busy.
    fn enter(self: Arc<Self>) -> EntryGuard {
        let was_busy = self.busy.swap(true, Ordering::SeqCst);
        assert!(!was_busy, "two engine calls overlapped in time");
        self.entries.fetch_add(1, Ordering::SeqCst);
        // Widen the window in which an overlapping caller would be caught.
        if let Some(stall) = self.stall {
            std::thread::sleep(stall);
        }
        EntryGuard { probe: self }
    }

    /// Total number of engine calls observed.
    pub fn entries(&self) -> usize {
        self.entries.load(Ordering::SeqCst)
    }
}

struct EntryGuard {
    probe: Arc<OccupancyProbe>,
}

impl Drop for EntryGuard {
    fn drop(&mut self) {
        self.probe.busy.store(false, Ordering::SeqCst);
    }
}

/// A teardown event observed by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A page handle was closed. `index` is the page index the handle was
    /// loaded for, when the engine still knows it.
    PageClosed { index: Option<usize> },
    /// A document handle was closed.
    DocumentClosed,
}

/// Records teardown events in call order.
#[derive(Default)]
pub struct EngineJournal {
    events: Mutex<Vec<EngineEvent>>,
}

impl EngineJournal {
    fn record(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }

    /// All events, in the order the engine saw them.
    pub fn events(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Indices of closed pages, in close order.
    pub fn closed_page_indices(&self) -> Vec<Option<usize>> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                EngineEvent::PageClosed { index } => Some(index),
                EngineEvent::DocumentClosed => None,
            })
            .collect()
    }

    /// Number of closed documents.
    pub fn closed_document_count(&self) -> usize {
        self.events()
            .into_iter()
            .filter(|e| *e == EngineEvent::DocumentClosed)
            .count()
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// Describes one document the fake engine will serve.
#[derive(Clone, Default)]
pub struct DocumentFixture {
    /// Required password, if the document is "encrypted".
    pub password: Option<String>,
    /// Page sizes in points, one entry per page.
    pub page_sizes: Vec<(i32, i32)>,
    /// Metadata tag/value pairs.
    pub metadata: Vec<(String, String)>,
    /// Top-level outline nodes.
    pub outline: Vec<OutlineNode>,
    /// Wire the last top-level sibling back to the first (malformed
    /// document simulation).
    pub outline_sibling_cycle: bool,
    /// Links placed at exact points on pages.
    pub links: Vec<LinkFixture>,
    /// Extra page handles `load_page_range` returns past the requested end.
    pub range_overshoot: usize,
}

impl DocumentFixture {
    /// A document with `count` US-Letter pages.
    pub fn with_pages(count: usize) -> Self {
        Self {
            page_sizes: vec![(612, 792); count],
            ..Default::default()
        }
    }
}

/// One outline node in a fixture.
#[derive(Clone)]
pub struct OutlineNode {
    pub title: String,
    pub page: i64,
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    pub fn new(title: &str, page: i64) -> Self {
        Self {
            title: title.to_string(),
            page,
            children: Vec::new(),
        }
    }

    pub fn with_children(title: &str, page: i64, children: Vec<OutlineNode>) -> Self {
        Self {
            title: title.to_string(),
            page,
            children,
        }
    }
}

/// A link annotation at an exact point.
#[derive(Clone)]
pub struct LinkFixture {
    pub page: usize,
    pub x: f64,
    pub y: f64,
    pub target: LinkTargetFixture,
}

/// What the engine reports for a link's destination/action lookups.
#[derive(Clone)]
pub enum LinkTargetFixture {
    /// Only a destination, to this page index.
    Destination(i32),
    /// Only an action.
    Action { kind: u32, uri: Option<Vec<u8>> },
    /// Both lookups succeed (the engine does not enforce exclusion).
    Both { dest_page: i32, kind: u32 },
    /// Neither lookup succeeds.
    Nothing,
}

// ============================================================================
// The fake engine
// ============================================================================

struct OpenDoc {
    fixture: DocumentFixture,
    first_root: Option<u64>,
}

struct OutlineEntry {
    title: String,
    page: i64,
    first_child: Option<u64>,
    next_sibling: Option<u64>,
}

/// Handles tests keep to observe the engine after it moves into the gateway.
#[derive(Clone)]
pub struct EngineObserver {
    pub probe: Arc<OccupancyProbe>,
    pub journal: Arc<EngineJournal>,
}

/// In-memory engine implementation driven by [`DocumentFixture`]s.
///
/// Fixtures are consumed in open order; once they run out, the last one is
/// reused for further opens.
pub struct FakeEngine {
    probe: Arc<OccupancyProbe>,
    journal: Arc<EngineJournal>,
    fixtures: Vec<DocumentFixture>,
    opened: usize,
    next_handle: u64,
    docs: HashMap<u64, OpenDoc>,
    pages: HashMap<u64, (u64, usize)>,
    outline_entries: HashMap<u64, OutlineEntry>,
    link_dests: HashMap<u64, u64>,
    link_actions: HashMap<u64, u64>,
    dests: HashMap<u64, i32>,
    actions: HashMap<u64, (u32, Option<Vec<u8>>)>,
}

impl FakeEngine {
    pub fn new(fixtures: Vec<DocumentFixture>) -> (Self, EngineObserver) {
        Self::with_stall(fixtures, None)
    }

    /// Like `new`, but every engine call dwells for `stall` while marked
    /// busy, making overlap detection in concurrency tests reliable.
    pub fn with_stall(
        fixtures: Vec<DocumentFixture>,
        stall: Option<Duration>,
    ) -> (Self, EngineObserver) {
        let probe = Arc::new(OccupancyProbe::new(stall));
        let journal = Arc::new(EngineJournal::default());
        let observer = EngineObserver {
            probe: Arc::clone(&probe),
            journal: Arc::clone(&journal),
        };
        let engine = Self {
            probe,
            journal,
            fixtures,
            opened: 0,
            next_handle: 0,
            docs: HashMap::new(),
            pages: HashMap::new(),
            outline_entries: HashMap::new(),
            link_dests: HashMap::new(),
            link_actions: HashMap::new(),
            dests: HashMap::new(),
            actions: HashMap::new(),
        };
        (engine, observer)
    }

    fn alloc(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    fn next_fixture(&mut self) -> DocumentFixture {
        let fixture = self
            .fixtures
            .get(self.opened)
            .or_else(|| self.fixtures.last())
            .cloned()
            .unwrap_or_default();
        self.opened += 1;
        fixture
    }

    fn open_with(&mut self, password: Option<&str>) -> Result<DocumentHandle, EngineError> {
        let fixture = self.next_fixture();
        if fixture.password.as_deref() != password {
            return Err(EngineError::Password);
        }

        let first_root = self.install_chain(&fixture.outline);
        if fixture.outline_sibling_cycle {
            if let Some(first) = first_root {
                let mut last = first;
                while let Some(next) = self.outline_entries[&last].next_sibling {
                    last = next;
                }
                self.outline_entries.get_mut(&last).unwrap().next_sibling = Some(first);
            }
        }

        let handle = self.alloc();
        self.docs.insert(
            handle,
            OpenDoc {
                fixture,
                first_root,
            },
        );
        Ok(DocumentHandle::from_raw(handle))
    }

    fn install_chain(&mut self, nodes: &[OutlineNode]) -> Option<u64> {
        let mut first = None;
        let mut prev: Option<u64> = None;
        for node in nodes {
            let first_child = self.install_chain(&node.children);
            let handle = self.alloc();
            self.outline_entries.insert(
                handle,
                OutlineEntry {
                    title: node.title.clone(),
                    page: node.page,
                    first_child,
                    next_sibling: None,
                },
            );
            if let Some(prev) = prev {
                self.outline_entries.get_mut(&prev).unwrap().next_sibling = Some(handle);
            }
            first.get_or_insert(handle);
            prev = Some(handle);
        }
        first
    }

    fn page_size(&self, page: PageHandle) -> Option<(i32, i32)> {
        let (doc, index) = self.pages.get(&page.raw())?;
        self.docs.get(doc)?.fixture.page_sizes.get(*index).copied()
    }

    fn paint(surface: &mut dyn PageSurface, start_y: i32, height: i32) {
        let (width, _) = surface.size();
        let stride = width as usize * pdfium_engine::BYTES_PER_PIXEL;
        if stride == 0 || height <= 0 {
            return;
        }
        let rows = vec![RENDER_BYTE; stride * height as usize];
        surface.write_scanlines(start_y.max(0) as u32, &rows);
    }
}

impl PdfiumEngine for FakeEngine {
    fn open_document(
        &mut self,
        fd: RawFd,
        password: Option<&str>,
    ) -> Result<DocumentHandle, EngineError> {
        let _entry = self.probe.clone().enter();
        if fd < 0 {
            return Err(EngineError::BadFile);
        }
        self.open_with(password)
    }

    fn open_buffer_document(
        &mut self,
        bytes: &[u8],
        password: Option<&str>,
    ) -> Result<DocumentHandle, EngineError> {
        let _entry = self.probe.clone().enter();
        if bytes.is_empty() {
            return Err(EngineError::BadFormat);
        }
        self.open_with(password)
    }

    fn close_document(&mut self, doc: DocumentHandle) {
        let _entry = self.probe.clone().enter();
        self.docs.remove(&doc.raw());
        self.journal.record(EngineEvent::DocumentClosed);
    }

    fn page_count(&mut self, doc: DocumentHandle) -> usize {
        let _entry = self.probe.clone().enter();
        self.docs
            .get(&doc.raw())
            .map(|d| d.fixture.page_sizes.len())
            .unwrap_or(0)
    }

    fn load_page(
        &mut self,
        doc: DocumentHandle,
        index: usize,
    ) -> Result<PageHandle, EngineError> {
        let _entry = self.probe.clone().enter();
        let count = self
            .docs
            .get(&doc.raw())
            .map(|d| d.fixture.page_sizes.len())
            .ok_or(EngineError::Unknown)?;
        if index >= count {
            return Err(EngineError::PageNotFound);
        }
        let handle = self.alloc();
        self.pages.insert(handle, (doc.raw(), index));
        Ok(PageHandle::from_raw(handle))
    }

    fn load_page_range(
        &mut self,
        doc: DocumentHandle,
        from: usize,
        to: usize,
    ) -> Result<Vec<PageHandle>, EngineError> {
        let _entry = self.probe.clone().enter();
        let open_doc = self.docs.get(&doc.raw()).ok_or(EngineError::Unknown)?;
        let count = open_doc.fixture.page_sizes.len();
        let overshoot = open_doc.fixture.range_overshoot;
        if from > to || to >= count {
            return Err(EngineError::PageNotFound);
        }

        let mut handles = Vec::new();
        for index in from..=to + overshoot {
            let handle = self.alloc();
            self.pages.insert(handle, (doc.raw(), index));
            handles.push(PageHandle::from_raw(handle));
        }
        Ok(handles)
    }

    fn close_page(&mut self, page: PageHandle) {
        let _entry = self.probe.clone().enter();
        let index = self.pages.remove(&page.raw()).map(|(_, index)| index);
        self.journal.record(EngineEvent::PageClosed { index });
    }

    fn page_width_pixels(&mut self, page: PageHandle, dpi: u32) -> i32 {
        let _entry = self.probe.clone().enter();
        self.page_size(page)
            .map(|(w, _)| w * dpi as i32 / 72)
            .unwrap_or(0)
    }

    fn page_height_pixels(&mut self, page: PageHandle, dpi: u32) -> i32 {
        let _entry = self.probe.clone().enter();
        self.page_size(page)
            .map(|(_, h)| h * dpi as i32 / 72)
            .unwrap_or(0)
    }

    fn page_width_points(&mut self, page: PageHandle) -> i32 {
        let _entry = self.probe.clone().enter();
        self.page_size(page).map(|(w, _)| w).unwrap_or(0)
    }

    fn page_height_points(&mut self, page: PageHandle) -> i32 {
        let _entry = self.probe.clone().enter();
        self.page_size(page).map(|(_, h)| h).unwrap_or(0)
    }

    fn render_page(
        &mut self,
        page: PageHandle,
        surface: &mut dyn PageSurface,
        _dpi: u32,
        _start_x: i32,
        start_y: i32,
        _width: i32,
        height: i32,
        _render_annotations: bool,
    ) -> Result<(), EngineError> {
        let _entry = self.probe.clone().enter();
        if self.page_size(page).is_none() {
            return Err(EngineError::PageNotFound);
        }
        Self::paint(surface, start_y, height);
        Ok(())
    }

    fn render_page_bitmap(
        &mut self,
        page: PageHandle,
        buffer: &mut PixelBuffer,
        _dpi: u32,
        _start_x: i32,
        start_y: i32,
        _width: i32,
        height: i32,
        _render_annotations: bool,
    ) -> Result<(), EngineError> {
        let _entry = self.probe.clone().enter();
        if self.page_size(page).is_none() {
            return Err(EngineError::PageNotFound);
        }
        Self::paint(buffer, start_y, height);
        Ok(())
    }

    fn meta_text(&mut self, doc: DocumentHandle, tag: &str) -> Option<String> {
        let _entry = self.probe.clone().enter();
        self.docs
            .get(&doc.raw())?
            .fixture
            .metadata
            .iter()
            .find(|(t, _)| t == tag)
            .map(|(_, v)| v.clone())
    }

    fn first_child_bookmark(
        &mut self,
        doc: DocumentHandle,
        parent: Option<BookmarkHandle>,
    ) -> Option<BookmarkHandle> {
        let _entry = self.probe.clone().enter();
        let first = match parent {
            None => self.docs.get(&doc.raw())?.first_root,
            Some(parent) => self.outline_entries.get(&parent.raw())?.first_child,
        };
        first.map(BookmarkHandle::from_raw)
    }

    fn next_sibling_bookmark(
        &mut self,
        _doc: DocumentHandle,
        bookmark: BookmarkHandle,
    ) -> Option<BookmarkHandle> {
        let _entry = self.probe.clone().enter();
        self.outline_entries
            .get(&bookmark.raw())?
            .next_sibling
            .map(BookmarkHandle::from_raw)
    }

    fn bookmark_title(&mut self, bookmark: BookmarkHandle) -> String {
        let _entry = self.probe.clone().enter();
        self.outline_entries
            .get(&bookmark.raw())
            .map(|e| e.title.clone())
            .unwrap_or_default()
    }

    fn bookmark_target_page(&mut self, _doc: DocumentHandle, bookmark: BookmarkHandle) -> i64 {
        let _entry = self.probe.clone().enter();
        self.outline_entries
            .get(&bookmark.raw())
            .map(|e| e.page)
            .unwrap_or(-1)
    }

    fn link_at_point(&mut self, page: PageHandle, x: f64, y: f64) -> Option<LinkHandle> {
        let _entry = self.probe.clone().enter();
        let (doc, index) = *self.pages.get(&page.raw())?;
        let target = self
            .docs
            .get(&doc)?
            .fixture
            .links
            .iter()
            .find(|l| l.page == index && l.x == x && l.y == y)
            .map(|l| l.target.clone())?;

        let link = self.alloc();
        match target {
            LinkTargetFixture::Destination(dest_page) => {
                let dest = self.alloc();
                self.dests.insert(dest, dest_page);
                self.link_dests.insert(link, dest);
            }
            LinkTargetFixture::Action { kind, uri } => {
                let action = self.alloc();
                self.actions.insert(action, (kind, uri));
                self.link_actions.insert(link, action);
            }
            LinkTargetFixture::Both { dest_page, kind } => {
                let dest = self.alloc();
                self.dests.insert(dest, dest_page);
                self.link_dests.insert(link, dest);
                let action = self.alloc();
                self.actions.insert(action, (kind, None));
                self.link_actions.insert(link, action);
            }
            LinkTargetFixture::Nothing => {}
        }
        Some(LinkHandle::from_raw(link))
    }

    fn link_destination(
        &mut self,
        _doc: DocumentHandle,
        link: LinkHandle,
    ) -> Option<DestinationHandle> {
        let _entry = self.probe.clone().enter();
        self.link_dests
            .get(&link.raw())
            .copied()
            .map(DestinationHandle::from_raw)
    }

    fn destination_page_index(&mut self, _doc: DocumentHandle, dest: DestinationHandle) -> i32 {
        let _entry = self.probe.clone().enter();
        self.dests.get(&dest.raw()).copied().unwrap_or(-1)
    }

    fn link_action(&mut self, link: LinkHandle) -> Option<ActionHandle> {
        let _entry = self.probe.clone().enter();
        self.link_actions
            .get(&link.raw())
            .copied()
            .map(ActionHandle::from_raw)
    }

    fn action_kind(&mut self, action: ActionHandle) -> u32 {
        let _entry = self.probe.clone().enter();
        self.actions
            .get(&action.raw())
            .map(|(kind, _)| *kind)
            .unwrap_or(0)
    }

    fn action_uri_bytes(&mut self, _doc: DocumentHandle, action: ActionHandle) -> Vec<u8> {
        let _entry = self.probe.clone().enter();
        self.actions
            .get(&action.raw())
            .and_then(|(_, uri)| uri.clone())
            .unwrap_or_default()
    }

    fn device_to_page(
        &mut self,
        page: PageHandle,
        start_x: i32,
        start_y: i32,
        _width: i32,
        _height: i32,
        _rotation: i32,
        device_x: i32,
        device_y: i32,
    ) -> (f64, f64) {
        let _entry = self.probe.clone().enter();
        if self.page_size(page).is_none() {
            return (0.0, 0.0);
        }
        (f64::from(device_x - start_x), f64::from(device_y - start_y))
    }
}
