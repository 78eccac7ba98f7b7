pub mod config;
pub mod error;
pub mod highlight;
pub mod locator;
pub mod navigation;
pub mod poll;
pub mod store;

pub use config::{ConfigError, Settings};
pub use error::NavError;
pub use highlight::HighlightOptions;
pub use locator::{DomPostLocator, PostFingerprint, PostLocator};
pub use navigation::{
    HighlightResult, IgnoreReason, NavigateEvent, NavigationCoordinator, NavigationOutcome,
    NavigationState, WaitStage,
};
pub use poll::{WaitOptions, wait_for};
pub use store::PageIdentityStore;
