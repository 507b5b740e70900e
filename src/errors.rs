// ABOUTME: Error types for the lecture-deck application
// ABOUTME: Provides structured error handling for loading, building and serving decks

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to fetch remote resource: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("Invalid resource path: {0}")]
    InvalidResourcePath(String),

    #[error("Markdown conversion error: {0}")]
    MarkdownError(String),

    #[error("HTML generation error: {0}")]
    HtmlError(String),

    #[error("Input validation error: {0}")]
    ValidationError(String),

    #[error("Path not found: {0}")]
    PathNotFoundError(PathBuf),

    #[error("No content sections found matching pattern: {0}")]
    NoSectionsFoundError(String),

    #[error("Section registered twice: {0}")]
    DuplicateSection(String),

    #[error("Invalid glob pattern: {0}")]
    PatternError(#[from] glob::PatternError),

    #[error("Watch error: {0}")]
    WatchError(String),

    #[error("Unknown error: {0}")]
    UnknownError(String),
}

// Implement conversion from anyhow::Error to our DeckError
impl From<anyhow::Error> for DeckError {
    fn from(err: anyhow::Error) -> Self {
        DeckError::UnknownError(err.to_string())
    }
}

impl From<notify::Error> for DeckError {
    fn from(err: notify::Error) -> Self {
        DeckError::WatchError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;
