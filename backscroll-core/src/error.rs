use backscroll_page::PageError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NavError {
    #[error("No scroll position recorded for {0}")]
    PageIdentityNotFound(String),

    #[error("waitFor: {name}: max tries exceeded after {attempts} attempts")]
    MaxRetriesExceeded { name: String, attempts: u32 },

    #[error("Malformed post: missing {0}")]
    MalformedPost(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Page error: {0}")]
    Page(#[from] PageError),
}

pub type Result<T> = std::result::Result<T, NavError>;
