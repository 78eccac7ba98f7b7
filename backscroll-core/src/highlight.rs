use backscroll_page::Page;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightOptions {
    /// How long the accent stays before the original color comes back
    pub hold_ms: u64,
    pub transition: String,
    /// Inline body background that marks the light theme
    pub light_page_background: String,
    pub light_accent: String,
    pub dark_accent: String,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            hold_ms: 2000,
            transition: "background-color 250ms linear".to_string(),
            light_page_background: "rgb(255, 255, 255)".to_string(),
            light_accent: "bisque".to_string(),
            dark_accent: "darkslategray".to_string(),
        }
    }
}

/// Accent that stands out against the page's current theme
pub fn accent_color<'a, P: Page>(page: &P, options: &'a HighlightOptions) -> &'a str {
    let background = page
        .body()
        .map(|body| page.style_property(&body, "background-color"))
        .unwrap_or_default();

    if background == options.light_page_background {
        &options.light_accent
    } else {
        &options.dark_accent
    }
}

/// Flashes the background of `node`, then puts its inline color back.
///
/// Concurrent highlights of the same node are not coordinated: the later one
/// restores whatever color it saw when it started.
pub async fn highlight<P: Page>(page: &P, node: &P::Node, options: &HighlightOptions) {
    page.set_style_property(node, "transition", &options.transition);

    let original = page.style_property(node, "background-color");
    let accent = accent_color(page, options);
    page.set_style_property(node, "background-color", accent);
    debug!("Highlighting {:?} with {}", node, accent);

    tokio::time::sleep(Duration::from_millis(options.hold_ms)).await;

    page.set_style_property(node, "background-color", &original);
    debug!("Restored background of {:?}", node);
}
