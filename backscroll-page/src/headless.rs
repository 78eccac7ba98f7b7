use crate::error::{PageError, Result};
use crate::host::{Page, Rect, Viewport};
use crate::style::StyleMap;
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use tracing::debug;

/// Handle to an element of one particular render of a [`HeadlessPage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle {
    generation: usize,
    id: NodeId,
}

#[derive(Debug, Clone, Copy)]
struct Band {
    top: f64,
    height: f64,
}

impl Band {
    fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.top + self.height
    }
}

/// Renders kept readable after they are replaced, the current one included
const RETAINED_RENDERS: usize = 4;

struct Inner {
    location: String,
    viewport: Viewport,
    scroll_y: f64,
    // Old renders stay readable like detached DOM nodes until they age out
    renders: VecDeque<Html>,
    first_generation: usize,
    layout: HashMap<NodeId, Band>,
    document_height: f64,
    styles: HashMap<ElementHandle, StyleMap>,
}

/// In-memory page built from HTML snapshots.
///
/// Layout is plain vertical block stacking: an element is as tall as its inline
/// `height` in pixels, or as tall as its element children stacked on top of each
/// other. That is enough to reproduce the geometry a virtualized timeline exposes
/// (cells of known height, one after the other).
///
/// Only the last few renders are kept; handles into older ones read as empty.
pub struct HeadlessPage {
    inner: RefCell<Inner>,
}

impl HeadlessPage {
    pub fn new(url: &str, html: &str, viewport: Viewport) -> Self {
        let page = Self {
            inner: RefCell::new(Inner {
                location: String::new(),
                viewport,
                scroll_y: 0.0,
                renders: VecDeque::new(),
                first_generation: 0,
                layout: HashMap::new(),
                document_height: 0.0,
                styles: HashMap::new(),
            }),
        };
        page.render(url, html);
        page
    }

    /// Replaces the document, as a client-side route change does.
    ///
    /// Handles from earlier renders become detached and the scroll offset resets
    /// to the top of the new document.
    pub fn render(&self, url: &str, html: &str) {
        let document = Html::parse_document(html);
        let mut layout = HashMap::new();
        let document_height = layout_element(document.root_element(), 0.0, &mut layout);

        let mut inner = self.inner.borrow_mut();
        inner.location = url.to_string();
        inner.renders.push_back(document);
        if inner.renders.len() > RETAINED_RENDERS {
            inner.renders.pop_front();
            inner.first_generation += 1;
            let first = inner.first_generation;
            inner.styles.retain(|handle, _| handle.generation >= first);
        }
        inner.layout = layout;
        inner.document_height = document_height;
        inner.scroll_y = 0.0;

        debug!(
            "Rendered {} (generation {}, {} elements, height {}px)",
            url,
            inner.current(),
            inner.layout.len(),
            document_height
        );
    }

    pub fn document_height(&self) -> f64 {
        self.inner.borrow().document_height
    }

    fn handle(generation: usize, element: ElementRef<'_>) -> ElementHandle {
        ElementHandle {
            generation,
            id: element.id(),
        }
    }
}

impl Inner {
    fn current(&self) -> usize {
        self.first_generation + self.renders.len() - 1
    }

    fn document(&self, generation: usize) -> Option<&Html> {
        self.renders.get(generation.checked_sub(self.first_generation)?)
    }

    fn element(&self, handle: &ElementHandle) -> Option<ElementRef<'_>> {
        self.document(handle.generation)?
            .tree
            .get(handle.id)
            .and_then(ElementRef::wrap)
    }

    fn is_attached(&self, handle: &ElementHandle) -> bool {
        handle.generation == self.current()
    }

    fn hit_test(&self, element: ElementRef<'_>, doc_y: f64) -> Option<NodeId> {
        let band = self.layout.get(&element.id())?;
        if !band.contains(doc_y) {
            return None;
        }
        for child in element.children().filter_map(ElementRef::wrap) {
            if let Some(hit) = self.hit_test(child, doc_y) {
                return Some(hit);
            }
        }
        Some(element.id())
    }
}

fn layout_element(element: ElementRef<'_>, top: f64, layout: &mut HashMap<NodeId, Band>) -> f64 {
    let explicit = element
        .value()
        .attr("style")
        .and_then(|style| StyleMap::parse(style).pixels("height"));

    let mut cursor = top;
    for child in element.children().filter_map(ElementRef::wrap) {
        cursor += layout_element(child, cursor, layout);
    }

    let height = explicit.unwrap_or(cursor - top);
    layout.insert(element.id(), Band { top, height });
    height
}

fn clamp_scroll(y: f64, document_height: f64, viewport_height: f64) -> f64 {
    let max = (document_height - viewport_height).max(0.0);
    if y.is_nan() { 0.0 } else { y.clamp(0.0, max) }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| PageError::InvalidSelector {
        selector: selector.to_string(),
        reason: format!("{:?}", e),
    })
}

impl Page for HeadlessPage {
    type Node = ElementHandle;

    fn location(&self) -> String {
        self.inner.borrow().location.clone()
    }

    fn viewport(&self) -> Viewport {
        self.inner.borrow().viewport
    }

    fn scroll_y(&self) -> f64 {
        self.inner.borrow().scroll_y
    }

    fn scroll_to(&self, _x: f64, y: f64) {
        let mut inner = self.inner.borrow_mut();
        inner.scroll_y = clamp_scroll(y, inner.document_height, inner.viewport.height);
        debug!("Scrolled to y={}", inner.scroll_y);
    }

    fn query_selector(&self, selector: &str) -> Result<Option<ElementHandle>> {
        let selector = parse_selector(selector)?;
        let inner = self.inner.borrow();
        let generation = inner.current();
        Ok(inner.document(generation).and_then(|document| {
            document
                .select(&selector)
                .next()
                .map(|element| Self::handle(generation, element))
        }))
    }

    fn query_selector_within(
        &self,
        scope: &ElementHandle,
        selector: &str,
    ) -> Result<Option<ElementHandle>> {
        let selector = parse_selector(selector)?;
        let inner = self.inner.borrow();
        Ok(inner.element(scope).and_then(|element| {
            element
                .select(&selector)
                .next()
                .map(|found| Self::handle(scope.generation, found))
        }))
    }

    fn parent(&self, node: &ElementHandle) -> Option<ElementHandle> {
        let inner = self.inner.borrow();
        let element = inner.element(node)?;
        element
            .parent()
            .and_then(ElementRef::wrap)
            .map(|parent| Self::handle(node.generation, parent))
    }

    fn next_element_sibling(&self, node: &ElementHandle) -> Option<ElementHandle> {
        let inner = self.inner.borrow();
        let element = inner.element(node)?;
        element
            .next_siblings()
            .find_map(ElementRef::wrap)
            .map(|sibling| Self::handle(node.generation, sibling))
    }

    fn first_element_child(&self, node: &ElementHandle) -> Option<ElementHandle> {
        let inner = self.inner.borrow();
        let element = inner.element(node)?;
        element
            .children()
            .find_map(ElementRef::wrap)
            .map(|child| Self::handle(node.generation, child))
    }

    fn attribute(&self, node: &ElementHandle, name: &str) -> Option<String> {
        let inner = self.inner.borrow();
        if name.eq_ignore_ascii_case("style") {
            if let Some(style) = inner.styles.get(node) {
                return Some(style.to_string());
            }
        }
        inner
            .element(node)?
            .value()
            .attr(name)
            .map(|value| value.to_string())
    }

    fn inner_text(&self, node: &ElementHandle) -> String {
        let inner = self.inner.borrow();
        match inner.element(node) {
            Some(element) => element
                .text()
                .flat_map(|chunk| chunk.split_whitespace())
                .collect::<Vec<_>>()
                .join(" "),
            None => String::new(),
        }
    }

    fn bounding_rect(&self, node: &ElementHandle) -> Option<Rect> {
        let inner = self.inner.borrow();
        if !inner.is_attached(node) {
            return None;
        }
        let band = inner.layout.get(&node.id)?;
        Some(Rect {
            left: 0.0,
            top: band.top - inner.scroll_y,
            width: inner.viewport.width,
            height: band.height,
        })
    }

    fn element_from_point(&self, x: f64, y: f64) -> Option<ElementHandle> {
        let inner = self.inner.borrow();
        let viewport = inner.viewport;
        if x < 0.0 || x >= viewport.width || y < 0.0 || y >= viewport.height {
            return None;
        }
        let generation = inner.current();
        let root = inner.document(generation)?.root_element();
        inner
            .hit_test(root, y + inner.scroll_y)
            .map(|id| ElementHandle { generation, id })
    }

    fn body(&self) -> Option<ElementHandle> {
        self.query_selector("body").ok().flatten()
    }

    fn style_property(&self, node: &ElementHandle, property: &str) -> String {
        let inner = self.inner.borrow();
        if let Some(style) = inner.styles.get(node) {
            return style.get(property).unwrap_or_default().to_string();
        }
        inner
            .element(node)
            .and_then(|element| element.value().attr("style"))
            .and_then(|style| StyleMap::parse(style).get(property).map(str::to_string))
            .unwrap_or_default()
    }

    fn set_style_property(&self, node: &ElementHandle, property: &str, value: &str) {
        let mut inner = self.inner.borrow_mut();
        if inner.element(node).is_none() {
            return;
        }
        let initial = inner
            .element(node)
            .and_then(|element| element.value().attr("style"))
            .map(StyleMap::parse)
            .unwrap_or_default();
        inner
            .styles
            .entry(*node)
            .or_insert(initial)
            .set(property, value);
    }
}
