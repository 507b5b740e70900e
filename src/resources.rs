// ABOUTME: Resource handling for the lecture-deck application
// ABOUTME: Handles local and remote stylesheets and scripts linked into the generated deck

use crate::errors::{DeckError, Result};
use log::info;
use reqwest::blocking::Client;
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// The kind of tag a resource is emitted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Stylesheet,
    Script,
}

/// Represents a resource file that can be either local or remote.
#[derive(Debug, Clone)]
pub struct ResourceFile {
    pub path: String,
    pub is_remote: bool,
}

impl ResourceFile {
    /// Create a new ResourceFile from a path string.
    /// The path can be either a local file path or an http(s) URL.
    pub fn new(path: &str) -> Self {
        let is_remote = Url::parse(path)
            .map(|url| matches!(url.scheme(), "http" | "https"))
            .unwrap_or(false);
        Self {
            path: path.to_string(),
            is_remote,
        }
    }

    /// Get the content of the resource file.
    /// If the file is remote, it will be fetched from the URL.
    /// If the file is local, it will be read from the filesystem.
    pub fn content(&self) -> Result<String> {
        if self.is_remote {
            self.fetch_remote_content()
        } else {
            self.read_local_content()
        }
    }

    /// Fetch content from a remote URL with retry capability
    fn fetch_remote_content(&self) -> Result<String> {
        info!("Fetching remote resource: {}", self.path);

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(DeckError::FetchError)?;

        // Try up to 3 times with increasing backoff
        let mut retry_delay = 1000;
        let mut last_error = None;

        for attempt in 1..=3 {
            match client.get(&self.path).send() {
                Ok(response) if response.status().is_success() => {
                    return response.text().map_err(DeckError::FetchError);
                }
                Ok(response) => {
                    last_error = Some(DeckError::ValidationError(format!(
                        "HTTP error: {}",
                        response.status()
                    )));
                }
                Err(e) => last_error = Some(DeckError::FetchError(e)),
            }

            if attempt < 3 {
                info!(
                    "Fetch attempt {} failed, retrying in {} ms",
                    attempt, retry_delay
                );
                std::thread::sleep(Duration::from_millis(retry_delay));
                retry_delay *= 2;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            DeckError::ValidationError("Unknown error fetching resource".to_string())
        }))
    }

    /// Read content from a local file
    fn read_local_content(&self) -> Result<String> {
        info!("Reading local resource: {}", self.path);
        let path = Path::new(&self.path);
        if !path.exists() {
            return Err(DeckError::PathNotFoundError(path.to_path_buf()));
        }

        fs::read_to_string(path).map_err(DeckError::FileReadError)
    }

    /// Generate an HTML tag for the resource.
    ///
    /// Local resources are embedded when `embed` is set. Remote resources are
    /// linked unless `inline_remote` asks for a self-contained page.
    pub fn tag(&self, kind: ResourceKind, embed: bool, inline_remote: bool) -> Result<String> {
        let inline = if self.is_remote { inline_remote } else { embed };

        if inline {
            let content = self.content()?;
            Ok(match kind {
                ResourceKind::Stylesheet => format!("<style>{}</style>", content),
                ResourceKind::Script => format!("<script>{}</script>", content),
            })
        } else {
            Ok(match kind {
                ResourceKind::Stylesheet => {
                    format!(r#"<link rel="stylesheet" href="{}">"#, self.path)
                }
                ResourceKind::Script => format!(r#"<script src="{}"></script>"#, self.path),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_remote_detection() {
        assert!(ResourceFile::new("https://example.com/style.css").is_remote);
        assert!(ResourceFile::new("http://example.com/app.js").is_remote);
        assert!(!ResourceFile::new("assets/style.css").is_remote);
        assert!(!ResourceFile::new("/tmp/style.css").is_remote);
        assert!(!ResourceFile::new("file:///tmp/style.css").is_remote);
    }

    #[test]
    fn test_remote_resources_are_linked() {
        let css = ResourceFile::new("https://example.com/style.css");
        assert_eq!(
            css.tag(ResourceKind::Stylesheet, true, false).unwrap(),
            r#"<link rel="stylesheet" href="https://example.com/style.css">"#
        );

        let js = ResourceFile::new("https://example.com/script.js");
        assert_eq!(
            js.tag(ResourceKind::Script, true, false).unwrap(),
            r#"<script src="https://example.com/script.js"></script>"#
        );
    }

    #[test]
    fn test_local_resources_embed_or_link() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(b"body { margin: 0; }")
            .expect("Failed to write to temp file");
        let css = ResourceFile::new(file.path().to_str().unwrap());

        assert_eq!(
            css.tag(ResourceKind::Stylesheet, true, false).unwrap(),
            "<style>body { margin: 0; }</style>"
        );
        assert!(css
            .tag(ResourceKind::Stylesheet, false, false)
            .unwrap()
            .starts_with("<link rel=\"stylesheet\""));
    }

    #[test]
    fn test_missing_local_resource() {
        let js = ResourceFile::new("/definitely/not/here.js");
        assert!(matches!(
            js.tag(ResourceKind::Script, true, false),
            Err(DeckError::PathNotFoundError(_))
        ));
    }
}
