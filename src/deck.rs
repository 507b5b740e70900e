// ABOUTME: Deck assembly for the lecture-deck application
// ABOUTME: Runs the startup pipeline from loaded sections to paginated slides and initial state

use crate::content::{ContentRegistry, Section};
use crate::errors::Result;
use crate::markdown;
use crate::navigation::NavigationState;
use crate::paginate::PaginationConfig;
use log::{info, warn};
use std::path::Path;

/// Configuration for building a deck
#[derive(Debug, Clone)]
pub struct DeckConfig {
    pub title: String,
    pub start_section: Option<String>,
    pub pagination: PaginationConfig,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            title: crate::config::DEFAULT_TITLE.to_string(),
            start_section: None,
            pagination: PaginationConfig::default(),
        }
    }
}

/// A fully paginated presentation.
#[derive(Debug, Clone)]
pub struct Deck {
    pub title: String,
    pub registry: ContentRegistry,
    initial_section: Option<String>,
}

impl Deck {
    /// Load a deck from a directory of Markdown sections.
    pub fn load(content_dir: &Path, config: &DeckConfig) -> Result<Self> {
        let sections = markdown::load_sections(content_dir)?;
        Self::from_sections(sections, config)
    }

    /// Register sections, clean heading numbering and paginate everything.
    pub fn from_sections(sections: Vec<Section>, config: &DeckConfig) -> Result<Self> {
        let mut registry = ContentRegistry::new();
        for section in sections {
            registry.register(section)?;
        }

        registry.clean_outline_prefixes();
        registry.paginate_all(&config.pagination);

        if let Some(start) = config.start_section.as_deref() {
            if registry.get(start).is_none() {
                warn!(
                    "Start section {:?} not found, using the first section with slides",
                    start
                );
            }
        }

        let initial_section = registry
            .initial_section(config.start_section.as_deref())
            .map(str::to_string);

        let slide_total: usize = registry.sections().iter().map(Section::slide_count).sum();
        info!(
            "Built deck with {} sections and {} slides",
            registry.len(),
            slide_total
        );

        Ok(Self {
            title: config.title.clone(),
            registry,
            initial_section,
        })
    }

    pub fn initial_section(&self) -> Option<&str> {
        self.initial_section.as_deref()
    }

    /// Navigation state positioned on the initial section.
    pub fn navigation(&self) -> NavigationState {
        let mut state = NavigationState::new(&self.registry);
        if let Some(id) = &self.initial_section {
            state.activate_section(id);
        }
        state
    }
}
