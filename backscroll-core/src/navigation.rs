use crate::config::Settings;
use crate::error::NavError;
use crate::highlight::highlight;
use crate::locator::{DomPostLocator, PostLocator};
use crate::poll::wait_for;
use crate::store::PageIdentityStore;
use backscroll_page::Page;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info, warn};
use url::Url;

/// A navigation reported by the host, fired before the document changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigateEvent {
    pub destination_url: String,
}

impl NavigateEvent {
    pub fn new(destination_url: impl Into<String>) -> Self {
        Self {
            destination_url: destination_url.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationState {
    Idle,
    AwaitingComposerChange,
    ScrollRestored,
    AwaitingVisiblePosts,
    Highlighting,
}

/// Which wait gave up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStage {
    ComposerChange,
    VisiblePosts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Leaving a page that is not a post-detail page
    NotDetailPage,
    /// Destination has no recorded scroll position
    NotVisited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightResult {
    Applied,
    /// Previously viewed post is not among the visible posts
    NotFound,
    /// There was no reply target before navigating, or it could not be read
    NoTarget,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NavigationOutcome {
    Ignored(IgnoreReason),
    /// A wait ran out of attempts; effects applied before it are kept
    Aborted { stage: WaitStage, error: NavError },
    Restored { offset: f64, highlight: HighlightResult },
}

impl fmt::Display for NavigationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationOutcome::Ignored(IgnoreReason::NotDetailPage) => {
                write!(f, "ignored (not leaving a post page)")
            }
            NavigationOutcome::Ignored(IgnoreReason::NotVisited) => {
                write!(f, "ignored (destination not visited)")
            }
            NavigationOutcome::Aborted { stage, error } => {
                write!(f, "aborted while waiting for {:?}: {}", stage, error)
            }
            NavigationOutcome::Restored { offset, highlight } => {
                let highlight = match highlight {
                    HighlightResult::Applied => "post highlighted",
                    HighlightResult::NotFound => "post not found",
                    HighlightResult::NoTarget => "no post to highlight",
                };
                write!(f, "restored scroll to {} ({})", offset, highlight)
            }
        }
    }
}

/// Whether `url` is a post-detail page, i.e. its path contains `segment`
/// followed by a post id
pub fn is_post_detail_url(url: &str, segment: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(segments) = parsed.path_segments() else {
        return false;
    };
    let segments: Vec<&str> = segments.collect();
    segments
        .windows(2)
        .any(|pair| pair[0] == segment && !pair[1].is_empty())
}

/// Drives one navigation at a time: remembers where the user was, restores the
/// scroll offset when they come back to a thread, and flashes the post they
/// opened from it.
///
/// Handling takes `&self` and nothing is borrowed across a suspension, so a new
/// navigation can start while an earlier one is still waiting. The earlier flow
/// is not cancelled; it finishes against whatever the page looks like by then.
pub struct NavigationCoordinator<P: Page, L = DomPostLocator<P>> {
    page: Rc<P>,
    locator: L,
    store: RefCell<PageIdentityStore>,
    state: Cell<NavigationState>,
    settings: Settings,
}

impl<P: Page> NavigationCoordinator<P, DomPostLocator<P>> {
    pub fn new(page: Rc<P>, settings: Settings) -> Self {
        let locator = DomPostLocator::new(page.clone()).with_probe_offset_y(settings.probe_offset_y);
        Self::with_locator(page, locator, settings)
    }
}

impl<P, L> NavigationCoordinator<P, L>
where
    P: Page,
    L: PostLocator<Post = P::Node>,
{
    pub fn with_locator(page: Rc<P>, locator: L, settings: Settings) -> Self {
        Self {
            page,
            locator,
            store: RefCell::new(PageIdentityStore::new()),
            state: Cell::new(NavigationState::Idle),
            settings,
        }
    }

    pub fn state(&self) -> NavigationState {
        self.state.get()
    }

    pub fn locator(&self) -> &L {
        &self.locator
    }

    pub fn recorded_offset(&self, page_id: &str) -> Option<f64> {
        self.store.borrow().lookup(page_id)
    }

    pub fn recorded_pages(&self) -> usize {
        self.store.borrow().len()
    }

    fn transition(&self, next: NavigationState) {
        debug!("{:?} -> {:?}", self.state.get(), next);
        self.state.set(next);
    }

    fn abort(&self, stage: WaitStage, error: NavError) -> NavigationOutcome {
        warn!("Navigation aborted: {}", error);
        self.transition(NavigationState::Idle);
        NavigationOutcome::Aborted { stage, error }
    }

    /// Handles one navigate event. Never fails: every problem ends up in the
    /// returned outcome and leaves the coordinator idle.
    pub async fn handle_navigation(&self, event: &NavigateEvent) -> NavigationOutcome {
        let source = self.page.location();
        if !is_post_detail_url(&source, &self.settings.detail_path_segment) {
            return NavigationOutcome::Ignored(IgnoreReason::NotDetailPage);
        }
        self.store
            .borrow_mut()
            .record(source.clone(), self.page.scroll_y());

        let destination = &event.destination_url;
        let offset = match self.store.borrow().get(destination) {
            Ok(offset) => offset,
            Err(e) => {
                debug!("{}", e);
                return NavigationOutcome::Ignored(IgnoreReason::NotVisited);
            }
        };

        // From here on this is a return from one post page to another
        info!("Returning to {} from {}", destination, source);

        let original_target = match self.locator.find_reply_target_post() {
            Ok(post) => Some(post),
            Err(e) => {
                debug!("No reply target before navigating: {}", e);
                None
            }
        };

        self.transition(NavigationState::AwaitingComposerChange);
        // A missing composer means the destination has not mounted yet
        let replaced = wait_for("checkReplyTargetHasChanged", self.settings.reply_wait, || {
            match self.locator.find_reply_target_post() {
                Ok(post) => original_target.as_ref() != Some(&post),
                Err(_) => false,
            }
        })
        .await;
        if let Err(e) = replaced {
            return self.abort(WaitStage::ComposerChange, e);
        }
        debug!("Waited until reply-target post changed");

        self.page.scroll_to(0.0, offset);
        self.transition(NavigationState::ScrollRestored);

        self.transition(NavigationState::AwaitingVisiblePosts);
        let rendered = wait_for("checkThereAreVisiblePosts", self.settings.posts_wait, || {
            self.locator.find_first_visible_post().is_some()
        })
        .await;
        if let Err(e) = rendered {
            return self.abort(WaitStage::VisiblePosts, e);
        }
        debug!("Waited until there are visible posts");

        let target = original_target.and_then(|post| match self.locator.fingerprint(&post) {
            Ok(fingerprint) => Some(fingerprint),
            Err(e) => {
                debug!("Cannot read previous reply target: {}", e);
                None
            }
        });

        let highlight_result = match target {
            None => HighlightResult::NoTarget,
            Some(target) => match self.locator.find_in_visible_area(&target) {
                Some(post) => {
                    info!(
                        "Found post to highlight: {} at {}",
                        target.author_username, target.published_at
                    );
                    self.transition(NavigationState::Highlighting);
                    highlight(self.page.as_ref(), &post, &self.settings.highlight).await;
                    HighlightResult::Applied
                }
                None => {
                    info!(
                        "Failed to find post to highlight: {} at {}",
                        target.author_username, target.published_at
                    );
                    HighlightResult::NotFound
                }
            },
        };

        self.transition(NavigationState::Idle);
        NavigationOutcome::Restored {
            offset,
            highlight: highlight_result,
        }
    }
}
