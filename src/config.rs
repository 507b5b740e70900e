// ABOUTME: Configuration module for the lecture-deck application
// ABOUTME: Provides configuration settings and environment variable handling

use crate::deck::DeckConfig;
use crate::html::HtmlOptions;
use crate::paginate::{DEFAULT_BREAK_THRESHOLD, PaginationConfig};
use crate::resources::ResourceFile;
use std::env;

pub const DEFAULT_TITLE: &str = "Lecture";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5173;

const HIGHLIGHT_CSS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.9.0/styles/github-dark.min.css";
const HIGHLIGHT_JS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.9.0/highlight.min.js";
const ICONS_JS: &str = "https://unpkg.com/lucide@0.300.0/dist/umd/lucide.min.js";

/// Global configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub deck_title: String,
    pub break_threshold: u32,
    pub start_section: Option<String>,
    pub embed_resources: bool,
    pub default_css: Vec<String>,
    pub default_js: Vec<String>,
    pub host: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            deck_title: DEFAULT_TITLE.to_string(),
            break_threshold: DEFAULT_BREAK_THRESHOLD,
            start_section: None,
            embed_resources: true,
            default_css: vec![HIGHLIGHT_CSS.to_string()],
            default_js: vec![HIGHLIGHT_JS.to_string(), ICONS_JS.to_string()],
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let deck_title = env::var("DECK_TITLE").unwrap_or(defaults.deck_title);
        let break_threshold = env::var("BREAK_THRESHOLD")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(defaults.break_threshold);
        let start_section = env::var("START_SECTION").ok().filter(|s| !s.is_empty());
        let embed_resources = env::var("EMBED_RESOURCES")
            .ok()
            .map(|s| s.to_lowercase() != "false")
            .unwrap_or(defaults.embed_resources);
        let default_css = env::var("DEFAULT_CSS")
            .map(|s| split_list(&s))
            .unwrap_or(defaults.default_css);
        let default_js = env::var("DEFAULT_JS")
            .map(|s| split_list(&s))
            .unwrap_or(defaults.default_js);
        let host = env::var("DECK_HOST").unwrap_or(defaults.host);
        let port = env::var("DECK_PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(defaults.port);

        Self {
            deck_title,
            break_threshold,
            start_section,
            embed_resources,
            default_css,
            default_js,
            host,
            port,
        }
    }

    /// Get a pagination configuration, overriding the threshold if given
    pub fn get_pagination_config(&self, threshold: Option<u32>) -> PaginationConfig {
        PaginationConfig {
            threshold: threshold.unwrap_or(self.break_threshold),
            ..PaginationConfig::default()
        }
    }

    /// Get a deck configuration with defaults from this config
    pub fn get_deck_config(
        &self,
        title: Option<String>,
        start_section: Option<String>,
        threshold: Option<u32>,
    ) -> DeckConfig {
        DeckConfig {
            title: title.unwrap_or_else(|| self.deck_title.clone()),
            start_section: start_section.or_else(|| self.start_section.clone()),
            pagination: self.get_pagination_config(threshold),
        }
    }

    /// Get HTML options, falling back to the default resources when none are given
    pub fn get_html_options(
        &self,
        css: Option<Vec<String>>,
        js: Option<Vec<String>>,
        embed_resources: Option<bool>,
        inline_remote: bool,
    ) -> HtmlOptions {
        let to_resources = |paths: Vec<String>| -> Vec<ResourceFile> {
            paths.iter().map(|path| ResourceFile::new(path)).collect()
        };

        HtmlOptions {
            css_files: to_resources(css.unwrap_or_else(|| self.default_css.clone())),
            js_files: to_resources(js.unwrap_or_else(|| self.default_js.clone())),
            embed_resources: embed_resources.unwrap_or(self.embed_resources),
            inline_remote,
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.break_threshold, 60);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5173);
        assert!(config.embed_resources);
        assert_eq!(config.default_js.len(), 2);
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config = Config::new();
        let deck = config.get_deck_config(Some("FPGA".to_string()), None, Some(30));
        assert_eq!(deck.title, "FPGA");
        assert_eq!(deck.start_section, None);
        assert_eq!(deck.pagination.threshold, 30);

        let html = config.get_html_options(Some(vec!["style.css".to_string()]), None, Some(false), false);
        assert_eq!(html.css_files.len(), 1);
        assert!(!html.css_files[0].is_remote);
        assert_eq!(html.js_files.len(), 2);
        assert!(!html.embed_resources);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("a.css, b.css,,"), vec!["a.css", "b.css"]);
        assert!(split_list("").is_empty());
    }
}
