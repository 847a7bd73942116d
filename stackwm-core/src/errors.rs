use thiserror::Error;

pub type Result<T> = std::result::Result<T, StackError>;

#[derive(Debug, Error)]
pub enum StackError {
    #[error("Pattern error: {0}")]
    Pattern(#[from] crate::pattern::PatternParseError),
    #[error("Unknown screen: {0}")]
    UnknownScreen(usize),
}
