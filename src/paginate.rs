// ABOUTME: Slide pagination for the lecture-deck application
// ABOUTME: Greedily packs a section's content nodes into weighted slides and derives titles

use crate::content::{ContentNode, NodeKind, WeightClass};
use log::debug;

/// Running weight at which a section heading starts a new slide.
pub const DEFAULT_BREAK_THRESHOLD: u32 = 60;
pub const HEAVY_WEIGHT: u32 = 40;
pub const TITLE_WEIGHT: u32 = 20;
pub const SECTION_HEADING_WEIGHT: u32 = 15;
pub const GROUPING_WEIGHT: u32 = 10;
pub const LIGHT_WEIGHT: u32 = 5;

pub const INTRODUCTION_TITLE: &str = "Introduction";
pub const CODE_EXAMPLE_TITLE: &str = "Code Example";

/// Heuristic cost per weight class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightTable {
    pub heavy: u32,
    pub title: u32,
    pub section_heading: u32,
    pub grouping: u32,
    pub light: u32,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            heavy: HEAVY_WEIGHT,
            title: TITLE_WEIGHT,
            section_heading: SECTION_HEADING_WEIGHT,
            grouping: GROUPING_WEIGHT,
            light: LIGHT_WEIGHT,
        }
    }
}

impl WeightTable {
    pub fn weight_of(&self, node: &ContentNode) -> u32 {
        match node.class {
            WeightClass::Heavy => self.heavy,
            WeightClass::Title => self.title,
            WeightClass::SectionHeading => self.section_heading,
            WeightClass::Grouping => self.grouping,
            WeightClass::Light => self.light,
        }
    }
}

/// Configuration for slide pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub threshold: u32,
    pub weights: WeightTable,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_BREAK_THRESHOLD,
            weights: WeightTable::default(),
        }
    }
}

/// A contiguous run of a section's nodes, shown one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub index: usize,
    pub title: String,
    pub nodes: Vec<ContentNode>,
}

impl Slide {
    fn new(index: usize, nodes: Vec<ContentNode>) -> Self {
        let title = derive_title(&nodes, index);
        Self { index, title, nodes }
    }
}

/// Split a section's nodes into slides.
///
/// Single pass, no reordering: concatenating the returned slides reproduces
/// `nodes` exactly, and no slide is ever empty.
pub fn paginate(nodes: Vec<ContentNode>, config: &PaginationConfig) -> Vec<Slide> {
    let mut slides = Vec::new();
    let mut current: Vec<ContentNode> = Vec::new();
    let mut weight: u32 = 0;

    for node in nodes {
        if !current.is_empty() && starts_new_slide(&node, weight, config) {
            debug!(
                "Slide break before {:?} {:?} at weight {}",
                node.kind, node.text, weight
            );
            let index = slides.len();
            slides.push(Slide::new(index, std::mem::take(&mut current)));
            weight = 0;
        }

        weight = weight.saturating_add(config.weights.weight_of(&node));
        current.push(node);
    }

    if !current.is_empty() {
        let index = slides.len();
        slides.push(Slide::new(index, current));
    }

    slides
}

fn starts_new_slide(node: &ContentNode, weight: u32, config: &PaginationConfig) -> bool {
    match node.kind {
        NodeKind::Heading1 => true,
        NodeKind::Heading2 if weight >= config.threshold => true,
        _ => node.forced_break,
    }
}

/// Derive a slide's title from its content and position.
pub fn derive_title(nodes: &[ContentNode], index: usize) -> String {
    let heading = |kind: NodeKind| nodes.iter().find(|node| node.kind == kind);

    if let Some(node) = heading(NodeKind::Heading1).or_else(|| heading(NodeKind::Heading2)) {
        return node.text.clone();
    }
    if index == 0 {
        return INTRODUCTION_TITLE.to_string();
    }
    if nodes.iter().any(|node| node.kind == NodeKind::Preformatted) {
        return CODE_EXAMPLE_TITLE.to_string();
    }
    format!("Slide {}", index + 1)
}
