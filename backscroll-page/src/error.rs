use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PageError {
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },
}

pub type Result<T> = std::result::Result<T, PageError>;
