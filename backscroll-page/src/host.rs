use crate::error::Result;
use std::fmt::Debug;

/// Size of the visible window in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 800.0,
        }
    }
}

/// Element box relative to the top-left corner of the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// What the navigation logic needs from a live document.
///
/// Node handles are only meaningful for the page that produced them. After a
/// re-render a previously returned handle still compares equal to itself but
/// never to a handle into the new document, and it has no layout.
pub trait Page {
    type Node: Clone + PartialEq + Debug;

    /// URL of the document currently shown
    fn location(&self) -> String;

    fn viewport(&self) -> Viewport;

    fn scroll_y(&self) -> f64;

    /// Absolute scroll; hosts clamp to the scrollable range
    fn scroll_to(&self, x: f64, y: f64);

    /// First element in the document matching `selector`
    fn query_selector(&self, selector: &str) -> Result<Option<Self::Node>>;

    /// First descendant of `scope` matching `selector` (never `scope` itself)
    fn query_selector_within(&self, scope: &Self::Node, selector: &str)
        -> Result<Option<Self::Node>>;

    /// Parent element, `None` at the document root
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    fn next_element_sibling(&self, node: &Self::Node) -> Option<Self::Node>;

    fn first_element_child(&self, node: &Self::Node) -> Option<Self::Node>;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Rendered text of the node and its descendants, trimmed
    fn inner_text(&self, node: &Self::Node) -> String;

    /// `None` when the node is not attached to the current document
    fn bounding_rect(&self, node: &Self::Node) -> Option<Rect>;

    /// Deepest element under the viewport point
    fn element_from_point(&self, x: f64, y: f64) -> Option<Self::Node>;

    fn body(&self) -> Option<Self::Node>;

    /// Inline style value, empty when unset
    fn style_property(&self, node: &Self::Node, property: &str) -> String;

    /// Sets an inline style property; an empty value removes it
    fn set_style_property(&self, node: &Self::Node, property: &str, value: &str);
}
