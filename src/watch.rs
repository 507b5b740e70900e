// ABOUTME: Watch module for monitoring content changes and rebuilding the deck
// ABOUTME: Provides file watching, auto-regeneration and a static file server for the output

use log::{debug, error, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use notify::{RecursiveMode, Watcher};
use notify_debouncer_full::new_debouncer;
use tiny_http::{Header, Response, Server, StatusCode};

use crate::config::{DEFAULT_HOST, DEFAULT_PORT};
use crate::deck::DeckConfig;
use crate::errors::{DeckError, Result};
use crate::html::{self, HtmlOptions};
use crate::utils;

/// Configuration for watch mode
pub struct WatchConfig {
    /// Directory holding the Markdown sections
    pub content_dir: PathBuf,

    /// Output HTML file path
    pub html_output: PathBuf,

    pub deck: DeckConfig,

    pub html: HtmlOptions,

    /// Debounce time in milliseconds
    pub debounce_ms: u64,

    /// Whether to serve the output directory over HTTP
    pub serve: bool,

    pub host: String,

    pub port: u16,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::new(),
            html_output: PathBuf::new(),
            deck: DeckConfig::default(),
            html: HtmlOptions::default(),
            debounce_ms: 500,
            serve: false,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "html" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" => "application/javascript",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// Map a request path to a file, falling back to the deck page for unknown routes.
fn resolve_request_path(root: &Path, index_file: &str, url_path: &str) -> PathBuf {
    let clean_path = url_path
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_start_matches('/');

    if clean_path.is_empty() || clean_path.split('/').any(|part| part == "..") {
        return root.join(index_file);
    }

    let candidate = root.join(clean_path);
    if candidate.is_file() {
        candidate
    } else {
        root.join(index_file)
    }
}

/// Start a simple HTTP server for the output directory
fn start_server(html_path: PathBuf, host: &str, port: u16) -> Result<()> {
    let server = Server::http(format!("{}:{}", host, port))
        .map_err(|e| DeckError::WatchError(format!("Failed to start HTTP server: {}", e)))?;

    let root = html_path.parent().unwrap_or(Path::new(".")).to_path_buf();
    let index_file = html_path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    info!("HTTP server listening on http://{}:{}", host, port);
    println!("Serving deck on http://{}:{}", host, port);

    thread::spawn(move || {
        for request in server.incoming_requests() {
            let file_path = resolve_request_path(&root, &index_file, request.url());
            debug!("Request for {:?} -> {:?}", request.url(), file_path);

            let result = match fs::read(&file_path) {
                Ok(content) => {
                    let response = Response::from_data(content);
                    match Header::from_bytes("Content-Type", content_type(&file_path)) {
                        Ok(header) => request.respond(response.with_header(header)),
                        Err(()) => request.respond(response),
                    }
                }
                Err(e) => {
                    error!("Failed to read file {:?}: {}", file_path, e);
                    let response = Response::from_string(format!("Failed to read file: {}", e))
                        .with_status_code(StatusCode(500));
                    request.respond(response)
                }
            };

            if let Err(e) = result {
                error!("Failed to send response: {}", e);
            }
        }
    });

    Ok(())
}

/// Build once, then rebuild the deck whenever its content or local resources change
pub fn watch_content(config: WatchConfig) -> Result<()> {
    utils::validate_directory_exists(&config.content_dir)?;
    utils::ensure_parent_directory_exists(&config.html_output)?;

    regenerate_outputs(&config)?;

    if config.serve {
        start_server(config.html_output.clone(), &config.host, config.port)?;
    }

    let (tx, rx) = mpsc::channel();

    let mut debouncer = new_debouncer(Duration::from_millis(config.debounce_ms), None, tx)
        .map_err(|e| DeckError::WatchError(format!("Failed to create file watcher: {}", e)))?;

    let watch_path = utils::get_absolute_path(&config.content_dir)?;
    debouncer
        .watcher()
        .watch(&watch_path, RecursiveMode::Recursive)?;

    for resource in config.html.css_files.iter().chain(&config.html.js_files) {
        if resource.is_remote {
            continue;
        }
        if let Err(e) = debouncer
            .watcher()
            .watch(Path::new(&resource.path), RecursiveMode::NonRecursive)
        {
            error!("Failed to watch resource {}: {}", resource.path, e);
        }
    }

    info!("Watching for changes in {:?}", watch_path);
    println!(
        "Watching for changes in {:?} (Press Ctrl+C to stop)",
        watch_path
    );

    let mut last_processed = Instant::now();

    for result in rx {
        match result {
            Ok(events) => {
                let relevant_changes = events.iter().any(|event| {
                    event.paths.iter().any(|path| {
                        let is_relevant = is_relevant_path(path, &config);
                        if is_relevant {
                            debug!("Detected relevant change in {:?}", path);
                        }
                        is_relevant
                    })
                });

                let now = Instant::now();
                if relevant_changes
                    && now.duration_since(last_processed)
                        > Duration::from_millis(config.debounce_ms)
                {
                    match regenerate_outputs(&config) {
                        Ok(()) => {
                            info!("Regenerated deck successfully");
                            last_processed = now;
                        }
                        Err(e) => error!("Failed to regenerate deck: {}", e),
                    }
                }
            }
            Err(errors) => error!("Watch error: {:?}", errors),
        }
    }

    Ok(())
}

/// Checks if a path should trigger a rebuild (Markdown content or a local resource)
fn is_relevant_path(path: &Path, config: &WatchConfig) -> bool {
    // The generated page lives next to the content in some layouts
    if path == config.html_output
        || utils::get_absolute_path(&config.html_output).is_ok_and(|out| out == path)
    {
        return false;
    }

    let path_str = path.to_string_lossy();
    let path_abs = utils::get_absolute_path(path).ok();
    let is_resource = config
        .html
        .css_files
        .iter()
        .chain(&config.html.js_files)
        .filter(|resource| !resource.is_remote)
        .any(|resource| {
            resource.path == path_str
                || path_abs.as_deref().is_some_and(|abs| {
                    utils::get_absolute_path(Path::new(&resource.path)).is_ok_and(|r| r == abs)
                })
        });
    if is_resource {
        return true;
    }

    path.extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("md"))
}

/// Rebuild the deck page from the current content
fn regenerate_outputs(config: &WatchConfig) -> Result<()> {
    info!("Regenerating deck...");
    let deck = html::generate_deck_file(
        &config.content_dir,
        &config.html_output,
        &config.deck,
        &config.html,
    )?;
    info!(
        "Deck regenerated: {} sections -> {:?}",
        deck.registry.len(),
        config.html_output
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::ResourceFile;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_request_path_with_spa_fallback() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        fs::write(dir.path().join("app.css"), "body {}").unwrap();

        let root = dir.path();
        assert_eq!(resolve_request_path(root, "index.html", "/"), root.join("index.html"));
        assert_eq!(resolve_request_path(root, "index.html", "/app.css?v=2"), root.join("app.css"));
        assert_eq!(
            resolve_request_path(root, "index.html", "/lectures/boot"),
            root.join("index.html")
        );
        assert_eq!(
            resolve_request_path(root, "index.html", "/../secret"),
            root.join("index.html")
        );
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type(Path::new("deck.html")), "text/html; charset=utf-8");
        assert_eq!(content_type(Path::new("a.CSS")), "text/css");
        assert_eq!(content_type(Path::new("blob")), "application/octet-stream");
    }

    #[test]
    fn test_is_relevant_path() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let css = dir.path().join("theme.css");
        fs::write(&css, "body {}").unwrap();

        let config = WatchConfig {
            content_dir: dir.path().to_path_buf(),
            html_output: dir.path().join("index.html"),
            html: HtmlOptions {
                css_files: vec![ResourceFile::new(css.to_str().unwrap())],
                ..HtmlOptions::default()
            },
            ..WatchConfig::default()
        };

        assert!(is_relevant_path(&dir.path().join("01-intro.md"), &config));
        assert!(is_relevant_path(&css, &config));
        assert!(!is_relevant_path(&dir.path().join("index.html"), &config));
        assert!(!is_relevant_path(&dir.path().join("notes.txt"), &config));
    }

    #[test]
    fn test_regenerate_outputs_writes_page() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let content = dir.path().join("content");
        fs::create_dir(&content).unwrap();
        fs::write(content.join("01-intro.md"), "# Welcome\n\nHello.\n").unwrap();

        let config = WatchConfig {
            content_dir: content,
            html_output: dir.path().join("dist/index.html"),
            ..WatchConfig::default()
        };
        regenerate_outputs(&config).unwrap();

        let page = fs::read_to_string(dir.path().join("dist/index.html")).unwrap();
        assert!(page.contains("<h1>Welcome</h1>"));
    }
}
