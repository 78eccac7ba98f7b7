pub mod error;
pub mod headless;
pub mod host;
pub mod style;

pub use error::PageError;
pub use headless::{ElementHandle, HeadlessPage};
pub use host::{Page, Rect, Viewport};
pub use style::StyleMap;
