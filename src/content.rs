// ABOUTME: Content registry for the lecture-deck application
// ABOUTME: Defines typed content nodes, named sections and the ordered section registry

use crate::errors::{DeckError, Result};
use crate::paginate::{self, PaginationConfig, Slide};
use log::{debug, warn};
use regex::Regex;
use std::sync::LazyLock;

/// Leading outline numbering such as "2." or "2.3 " in front of heading text.
static OUTLINE_PREFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d[\d.]*\s+").unwrap());

/// The structural tag of a content node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Heading1,
    Heading2,
    Heading3,
    Paragraph,
    List,
    Table,
    Preformatted,
    Container,
    Other,
}

impl NodeKind {
    pub fn is_heading(self) -> bool {
        matches!(self, NodeKind::Heading1 | NodeKind::Heading2 | NodeKind::Heading3)
    }
}

/// Classification used by the paginator to look up a node's weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeightClass {
    /// Code blocks, tables and hero/animation containers
    Heavy,
    /// Top-level (document title) headings
    Title,
    /// Section headings that may start a new slide
    SectionHeading,
    /// Lists and generic containers
    Grouping,
    /// Plain text and everything else
    Light,
}

impl WeightClass {
    /// The default classification for a node kind.
    pub fn for_kind(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Preformatted | NodeKind::Table => WeightClass::Heavy,
            NodeKind::Heading1 => WeightClass::Title,
            NodeKind::Heading2 => WeightClass::SectionHeading,
            NodeKind::List | NodeKind::Container => WeightClass::Grouping,
            NodeKind::Heading3 | NodeKind::Paragraph | NodeKind::Other => WeightClass::Light,
        }
    }
}

/// A single block of authored content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentNode {
    pub kind: NodeKind,
    pub class: WeightClass,
    /// Plain text content, used for titles and terminal output
    pub text: String,
    /// Rendered HTML fragment for this node
    pub html: String,
    /// Authored marker requiring this node to start a new slide
    pub forced_break: bool,
}

impl ContentNode {
    pub fn new(kind: NodeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            class: WeightClass::for_kind(kind),
            text: text.into(),
            html: String::new(),
            forced_break: false,
        }
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = html.into();
        self
    }

    pub fn with_forced_break(mut self) -> Self {
        self.forced_break = true;
        self
    }

    /// Mark a container as a hero/animation block, which weighs like a code block.
    pub fn hero(mut self) -> Self {
        self.class = WeightClass::Heavy;
        self
    }

    /// Strip a leading numeric outline prefix ("2.4 ") from heading text.
    ///
    /// The same prefix is removed from the rendered HTML so the displayed
    /// heading matches the derived slide title. Returns true if anything changed.
    pub fn clean_outline_prefix(&mut self) -> bool {
        if !self.kind.is_heading() {
            return false;
        }

        let prefix_len = match OUTLINE_PREFIX_REGEX.find(&self.text) {
            Some(m) => m.end(),
            None => return false,
        };
        let prefix = self.text[..prefix_len].to_string();

        if let Some(html) = strip_text_prefix(&self.html, &prefix) {
            self.html = html;
        }

        self.text = self.text[prefix_len..].to_string();
        true
    }
}

/// Remove `prefix` from the text content that follows an element's opening tag.
///
/// Inline markup is skipped over, so `<h2><strong>2.4</strong> Setup</h2>` loses
/// its numbering too. Returns None if the text does not start with `prefix`.
fn strip_text_prefix(html: &str, prefix: &str) -> Option<String> {
    let open_end = html.find('>')? + 1;
    let (head, tail) = html.split_at(open_end);

    let mut result = String::from(head);
    let mut wanted = prefix.chars().peekable();
    let mut chars = tail.char_indices();

    while wanted.peek().is_some() {
        let (_, c) = chars.next()?;
        if c == '<' {
            result.push(c);
            for (_, tag_char) in chars.by_ref() {
                result.push(tag_char);
                if tag_char == '>' {
                    break;
                }
            }
        } else if Some(&c) == wanted.peek() {
            wanted.next();
        } else {
            return None;
        }
    }

    let rest = chars.next().map_or("", |(i, _)| &tail[i..]);
    result.push_str(rest);
    Some(result)
}

/// A named top-level content block, shown as one sidebar entry.
#[derive(Debug, Clone)]
pub struct Section {
    pub id: String,
    pub label: String,
    nodes: Vec<ContentNode>,
    slides: Vec<Slide>,
    titles: Vec<String>,
}

impl Section {
    pub fn new(id: impl Into<String>, label: impl Into<String>, nodes: Vec<ContentNode>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            nodes,
            slides: Vec::new(),
            titles: Vec::new(),
        }
    }

    /// Partition the section's nodes into slides and derive their titles.
    ///
    /// Running this again with a different configuration re-packs the same nodes.
    pub fn paginate(&mut self, config: &PaginationConfig) {
        let mut nodes: Vec<ContentNode> = std::mem::take(&mut self.slides)
            .into_iter()
            .flat_map(|slide| slide.nodes)
            .collect();
        nodes.append(&mut self.nodes);

        self.slides = paginate::paginate(nodes, config);
        self.titles = self.slides.iter().map(|slide| slide.title.clone()).collect();

        if self.slides.is_empty() {
            warn!("Section {:?} has no content and produced no slides", self.id);
        } else {
            debug!(
                "Section {:?} paginated into {} slides",
                self.id,
                self.slides.len()
            );
        }
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.slides.is_empty()
    }

    /// All nodes in document order, whether or not they have been paginated yet.
    pub fn nodes(&self) -> impl Iterator<Item = &ContentNode> {
        self.slides
            .iter()
            .flat_map(|slide| slide.nodes.iter())
            .chain(self.nodes.iter())
    }

    fn nodes_mut(&mut self) -> impl Iterator<Item = &mut ContentNode> {
        self.slides
            .iter_mut()
            .flat_map(|slide| slide.nodes.iter_mut())
            .chain(self.nodes.iter_mut())
    }
}

/// Ordered collection of sections; registration order is sidebar order.
#[derive(Debug, Clone, Default)]
pub struct ContentRegistry {
    sections: Vec<Section>,
}

impl ContentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, section: Section) -> Result<()> {
        if self.get(&section.id).is_some() {
            return Err(DeckError::DuplicateSection(section.id));
        }
        self.sections.push(section);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == id)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Strip outline numbering from every heading in every section.
    ///
    /// Must run before pagination so titles read the cleaned text.
    pub fn clean_outline_prefixes(&mut self) -> usize {
        let mut cleaned = 0;
        for section in &mut self.sections {
            for node in section.nodes_mut() {
                if node.clean_outline_prefix() {
                    cleaned += 1;
                }
            }
        }
        debug!("Cleaned outline prefixes from {} headings", cleaned);
        cleaned
    }

    pub fn paginate_all(&mut self, config: &PaginationConfig) {
        for section in &mut self.sections {
            section.paginate(config);
        }
    }

    /// The configured start section if it is registered, otherwise the first
    /// section with slides. Falls back to the first section when all are empty.
    pub fn initial_section(&self, preferred: Option<&str>) -> Option<&str> {
        preferred
            .and_then(|id| self.get(id))
            .or_else(|| {
                self.sections
                    .iter()
                    .find(|section| section.slide_count() > 0)
            })
            .or_else(|| self.sections.first())
            .map(|section| section.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_cleaning_strips_outline_prefix() {
        let mut node = ContentNode::new(NodeKind::Heading2, "2.4 Server Setup")
            .with_html("<h2>2.4 Server Setup</h2>\n");
        assert!(node.clean_outline_prefix());
        assert_eq!(node.text, "Server Setup");
        assert_eq!(node.html, "<h2>Server Setup</h2>\n");
    }

    #[test]
    fn test_title_cleaning_skips_inline_markup() {
        let mut node = ContentNode::new(NodeKind::Heading1, "2.4 Setup")
            .with_html("<h1><strong>2.4</strong> Setup</h1>\n");
        assert!(node.clean_outline_prefix());
        assert_eq!(node.text, "Setup");
        assert_eq!(node.html, "<h1><strong></strong>Setup</h1>\n");
    }

    #[test]
    fn test_title_cleaning_leaves_mismatched_html() {
        let mut node =
            ContentNode::new(NodeKind::Heading2, "1 Boot").with_html("<h2>Boot 1</h2>\n");
        assert!(node.clean_outline_prefix());
        assert_eq!(node.text, "Boot");
        assert_eq!(node.html, "<h2>Boot 1</h2>\n");
    }

    #[test]
    fn test_title_cleaning_variants() {
        let mut trailing_dot = ContentNode::new(NodeKind::Heading1, "3. Kernel Modules");
        trailing_dot.clean_outline_prefix();
        assert_eq!(trailing_dot.text, "Kernel Modules");

        let mut unnumbered = ContentNode::new(NodeKind::Heading2, "Device Tree");
        assert!(!unnumbered.clean_outline_prefix());
        assert_eq!(unnumbered.text, "Device Tree");

        let mut paragraph = ContentNode::new(NodeKind::Paragraph, "4 pins are used");
        assert!(!paragraph.clean_outline_prefix());
        assert_eq!(paragraph.text, "4 pins are used");
    }

    #[test]
    fn test_register_rejects_duplicate_ids() {
        let mut registry = ContentRegistry::new();
        registry
            .register(Section::new("intro", "Intro", Vec::new()))
            .unwrap();
        let result = registry.register(Section::new("intro", "Again", Vec::new()));
        assert!(matches!(result, Err(DeckError::DuplicateSection(id)) if id == "intro"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_initial_section_falls_back_to_first() {
        let mut registry = ContentRegistry::new();
        registry.register(Section::new("a", "A", Vec::new())).unwrap();
        registry.register(Section::new("b", "B", Vec::new())).unwrap();

        assert_eq!(registry.initial_section(Some("b")), Some("b"));
        assert_eq!(registry.initial_section(Some("missing")), Some("a"));
        assert_eq!(registry.initial_section(None), Some("a"));
        assert_eq!(ContentRegistry::new().initial_section(None), None);
    }

    #[test]
    fn test_initial_section_skips_empty_sections() {
        let mut registry = ContentRegistry::new();
        registry.register(Section::new("todo", "Todo", Vec::new())).unwrap();
        registry
            .register(Section::new(
                "intro",
                "Intro",
                vec![ContentNode::new(NodeKind::Heading1, "Welcome")],
            ))
            .unwrap();
        registry.paginate_all(&PaginationConfig::default());

        assert_eq!(registry.initial_section(None), Some("intro"));
        assert_eq!(registry.initial_section(Some("missing")), Some("intro"));
        assert_eq!(registry.initial_section(Some("todo")), Some("todo"));
    }

    #[test]
    fn test_paginate_is_repeatable() {
        let nodes = vec![
            ContentNode::new(NodeKind::Heading1, "One"),
            ContentNode::new(NodeKind::Paragraph, "text"),
            ContentNode::new(NodeKind::Heading1, "Two"),
        ];
        let mut section = Section::new("s", "S", nodes.clone());
        section.paginate(&PaginationConfig::default());
        section.paginate(&PaginationConfig::default());

        assert_eq!(section.slide_count(), 2);
        assert_eq!(section.titles(), ["One".to_string(), "Two".to_string()]);
        assert_eq!(section.nodes().cloned().collect::<Vec<_>>(), nodes);
    }
}
