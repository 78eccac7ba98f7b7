// Finding posts in the rendered timeline

use crate::error::{NavError, Result};
use backscroll_page::Page;
use std::fmt::Debug;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use tracing::{debug, warn};

/// Structural markers of the host page. Owned by the host, not by us, and liable
/// to change whenever the host ships a new frontend.
pub mod markers {
    pub const REPLY_COMPOSER: &str = "div.DraftEditor-root";
    pub const CELL_TEST_ID: &str = "cellInnerDiv";
    pub const TEST_ID_ATTR: &str = "data-testid";
    pub const POST: &str = "article";
    pub const USER_NAME: &str = r#"div[data-testid="User-Name"]"#;
    pub const LINK: &str = "a";
    pub const TIMESTAMP: &str = "time";
    pub const TIMESTAMP_ATTR: &str = "datetime";
    pub const POST_TEXT: &str = r#"div[data-testid="tweetText"]"#;
}

/// Comparable identity of a post, stable across re-renders.
///
/// Two fingerprints are equal iff author username and timestamp are equal;
/// display name and text are carried for logging only.
#[derive(Debug, Clone)]
pub struct PostFingerprint {
    pub author_username: String,
    pub published_at: String,
    pub author_name: Option<String>,
    pub text: String,
}

impl PostFingerprint {
    pub fn new(author_username: impl Into<String>, published_at: impl Into<String>) -> Self {
        Self {
            author_username: author_username.into(),
            published_at: published_at.into(),
            author_name: None,
            text: String::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_author_name(mut self, name: impl Into<String>) -> Self {
        self.author_name = Some(name.into());
        self
    }
}

impl PartialEq for PostFingerprint {
    fn eq(&self, other: &Self) -> bool {
        self.author_username == other.author_username && self.published_at == other.published_at
    }
}

impl Eq for PostFingerprint {}

impl Hash for PostFingerprint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.author_username.hash(state);
        self.published_at.hash(state);
    }
}

/// Read-only queries over the rendered timeline
pub trait PostLocator {
    type Post: Clone + PartialEq + Debug;

    /// The post the reply composer belongs to
    fn find_reply_target_post(&self) -> Result<Self::Post>;

    /// First post whose top edge is on screen, or the post after the one under
    /// the probe point when that one is scrolled partly out of view
    fn find_first_visible_post(&self) -> Option<Self::Post>;

    /// Next rendered post in document order
    fn next_post(&self, post: &Self::Post) -> Option<Self::Post>;

    fn fingerprint(&self, post: &Self::Post) -> Result<PostFingerprint>;

    /// Whether the top edge of the post lies strictly inside the viewport
    fn is_visible(&self, post: &Self::Post) -> bool;

    /// Scans visible posts in document order for one matching `target`
    fn find_in_visible_area(&self, target: &PostFingerprint) -> Option<Self::Post> {
        let mut candidate = self.find_first_visible_post();

        while let Some(post) = candidate {
            if !self.is_visible(&post) {
                break;
            }
            match self.fingerprint(&post) {
                Ok(fingerprint) if fingerprint == *target => return Some(post),
                Ok(_) => {}
                Err(e) => debug!("Skipping post while matching: {}", e),
            }
            candidate = self.next_post(&post);
        }

        None
    }
}

/// Probe point below the fixed "back" header the host pins to the top of the view
pub const DEFAULT_PROBE_OFFSET_Y: f64 = 60.0;

/// [`PostLocator`] reading the host's DOM through a [`Page`]
pub struct DomPostLocator<P: Page> {
    page: Rc<P>,
    probe_offset_y: f64,
}

impl<P: Page> DomPostLocator<P> {
    pub fn new(page: Rc<P>) -> Self {
        Self {
            page,
            probe_offset_y: DEFAULT_PROBE_OFFSET_Y,
        }
    }

    pub fn with_probe_offset_y(mut self, offset: f64) -> Self {
        self.probe_offset_y = offset;
        self
    }

    fn is_cell(&self, node: &P::Node) -> bool {
        self.page.attribute(node, markers::TEST_ID_ATTR).as_deref() == Some(markers::CELL_TEST_ID)
    }

    /// The node itself or its closest list-cell ancestor
    fn nearest_cell(&self, node: &P::Node) -> Option<P::Node> {
        let mut current = Some(node.clone());
        while let Some(node) = current {
            if self.is_cell(&node) {
                return Some(node);
            }
            current = self.page.parent(&node);
        }
        None
    }

    fn select_within(&self, scope: &P::Node, selector: &str) -> Option<P::Node> {
        match self.page.query_selector_within(scope, selector) {
            Ok(found) => found,
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }

    fn post_after_cell(&self, cell: &P::Node) -> Option<P::Node> {
        let mut cell = cell.clone();
        loop {
            cell = self.page.next_element_sibling(&cell)?;
            if let Some(post) = self.select_within(&cell, markers::POST) {
                return Some(post);
            }
        }
    }

    fn link_text(&self, scope: &P::Node) -> Result<Option<String>> {
        Ok(self
            .page
            .query_selector_within(scope, markers::LINK)?
            .map(|link| self.page.inner_text(&link))
            .filter(|text| !text.is_empty()))
    }
}

impl<P: Page> PostLocator for DomPostLocator<P> {
    type Post = P::Node;

    fn find_reply_target_post(&self) -> Result<P::Node> {
        let composer = self
            .page
            .query_selector(markers::REPLY_COMPOSER)?
            .ok_or_else(|| NavError::NotFound("reply composer".to_string()))?;
        let cell = self
            .nearest_cell(&composer)
            .ok_or_else(|| NavError::NotFound("list cell around reply composer".to_string()))?;
        self.page
            .query_selector_within(&cell, markers::POST)?
            .ok_or_else(|| NavError::NotFound("post in reply composer cell".to_string()))
    }

    fn find_first_visible_post(&self) -> Option<P::Node> {
        let viewport = self.page.viewport();
        let hit = self
            .page
            .element_from_point(viewport.width / 2.0, self.probe_offset_y)?;
        let cell = self.nearest_cell(&hit)?;

        match self.select_within(&cell, markers::POST) {
            Some(post) if self.is_visible(&post) => Some(post),
            Some(post) => self.next_post(&post),
            None => self.post_after_cell(&cell),
        }
    }

    fn next_post(&self, post: &P::Node) -> Option<P::Node> {
        let cell = self.nearest_cell(post)?;
        self.post_after_cell(&cell)
    }

    fn fingerprint(&self, post: &P::Node) -> Result<PostFingerprint> {
        let malformed = |what: &str| NavError::MalformedPost(what.to_string());

        let user_block = self
            .page
            .query_selector_within(post, markers::USER_NAME)?
            .ok_or_else(|| malformed("author block"))?;
        let name_part = self
            .page
            .first_element_child(&user_block)
            .ok_or_else(|| malformed("author display name"))?;
        let username_part = self
            .page
            .next_element_sibling(&name_part)
            .ok_or_else(|| malformed("author username"))?;

        let author_username = self
            .link_text(&username_part)?
            .ok_or_else(|| malformed("author username"))?;
        let author_name = self.link_text(&name_part)?;

        let time = self
            .page
            .query_selector_within(post, markers::TIMESTAMP)?
            .ok_or_else(|| malformed("timestamp"))?;
        let published_at = self
            .page
            .attribute(&time, markers::TIMESTAMP_ATTR)
            .ok_or_else(|| malformed("timestamp datetime"))?;

        let text = self
            .page
            .query_selector_within(post, markers::POST_TEXT)?
            .map(|node| self.page.inner_text(&node))
            .unwrap_or_default();

        Ok(PostFingerprint {
            author_username,
            published_at,
            author_name,
            text,
        })
    }

    fn is_visible(&self, post: &P::Node) -> bool {
        let viewport_height = self.page.viewport().height;
        self.page
            .bounding_rect(post)
            .is_some_and(|rect| rect.top > 0.0 && rect.top < viewport_height)
    }
}
