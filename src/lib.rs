// ABOUTME: Library module for the lecture-deck program.
// ABOUTME: Contains content loading, slide pagination, navigation and the deck hosts.

// Reexport modules
pub mod config;
pub mod content;
pub mod deck;
pub mod errors;
pub mod html;
pub mod markdown;
pub mod navigation;
pub mod paginate;
pub mod presenter;
pub mod resources;
pub mod terminal;
pub mod utils;
pub mod watch;

// Reexport common types and functions
pub use config::Config;
pub use content::{ContentNode, ContentRegistry, NodeKind, Section, WeightClass};
pub use deck::{Deck, DeckConfig};
pub use errors::{DeckError, Result};
pub use html::{HtmlOptions, generate_deck_file, generate_html, write_html_to_file};
pub use navigation::{Direction, NavigationState};
pub use paginate::{PaginationConfig, Slide, WeightTable, paginate};
pub use presenter::{InputEvent, Presenter, RenderOp, RenderSurface, render};
pub use resources::ResourceFile;
pub use terminal::{TerminalSurface, run_session};
pub use watch::{WatchConfig, watch_content};
