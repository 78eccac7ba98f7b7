// Recorded browsing session, replayed against a headless page

use backscroll_page::Viewport;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub viewport: ViewportSize,
    pub start: PageSnapshot,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewportSize {
    fn default() -> Self {
        let viewport = Viewport::default();
        Self {
            width: viewport.width,
            height: viewport.height,
        }
    }
}

impl From<ViewportSize> for Viewport {
    fn from(size: ViewportSize) -> Self {
        Viewport {
            width: size.width,
            height: size.height,
        }
    }
}

/// A document the host shows at `url`; markup inline or in a file next to the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// User scrolls to an absolute offset
    Scroll { y: f64 },
    /// User navigates; the host re-renders `render_after_ms` later, or never
    /// when no markup is given
    Navigate {
        destination: String,
        #[serde(default)]
        render_after_ms: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        html: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        html_file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        let json = r#"{
            "start": {"url": "https://site/a/status/1", "html": "<html></html>"},
            "steps": [
                {"scroll": {"y": 400}},
                {"navigate": {"destination": "https://site/b/status/2", "render_after_ms": 120, "html_file": "two.html"}},
                {"navigate": {"destination": "https://site/a/status/1"}}
            ]
        }"#;
        let session: Session = serde_json::from_str(json).unwrap();

        assert_eq!(session.viewport, ViewportSize::default());
        assert_eq!(session.steps.len(), 3);
        assert_eq!(session.steps[0], Step::Scroll { y: 400.0 });
        assert!(matches!(
            &session.steps[1],
            Step::Navigate { render_after_ms: 120, html_file: Some(file), .. } if file == &PathBuf::from("two.html")
        ));
        assert!(matches!(
            &session.steps[2],
            Step::Navigate { render_after_ms: 0, html: None, html_file: None, .. }
        ));
    }
}
