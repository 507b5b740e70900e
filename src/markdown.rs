// ABOUTME: Markdown content loader for the lecture-deck application
// ABOUTME: Parses Markdown fragments with comrak into typed content nodes, one section per file

use crate::content::{ContentNode, NodeKind, Section};
use crate::errors::{DeckError, Result};
use comrak::nodes::{AstNode, NodeValue};
use comrak::{Arena, ComrakOptions, format_html, parse_document};
use log::{debug, info, warn};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Class attribute naming a hero or animation block.
static HERO_CLASS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"class\s*=\s*["'][^"']*\b(hero|animation)\b"#).unwrap()
});

/// Ordering prefix on section file names, e.g. "01-" or "2_".
static ORDER_PREFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+[-_]").unwrap());

const BREAK_MARKERS: &[&str] = &["<!-- break -->", "<!-- slide -->"];

fn comrak_options() -> ComrakOptions {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.render.unsafe_ = true; // Allow raw HTML
    options
}

/// Load every `*.md` file in a directory as a section, ordered by file name.
pub fn load_sections(content_dir: &Path) -> Result<Vec<Section>> {
    info!("Loading content sections from {:?}", content_dir);

    if !content_dir.is_dir() {
        return Err(DeckError::PathNotFoundError(content_dir.to_path_buf()));
    }

    let pattern = format!(
        "{}/*.md",
        glob::Pattern::escape(&content_dir.to_string_lossy())
    );
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in glob::glob(&pattern)? {
        match entry {
            Ok(path) => paths.push(path),
            Err(e) => warn!("Skipping unreadable entry {:?}: {}", e.path(), e.error()),
        }
    }
    paths.sort();

    if paths.is_empty() {
        return Err(DeckError::NoSectionsFoundError(pattern));
    }

    paths.iter().map(|path| load_section(path)).collect()
}

/// Load a single Markdown file as a section.
pub fn load_section(path: &Path) -> Result<Section> {
    let markdown = fs::read_to_string(path).map_err(DeckError::FileReadError)?;

    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .ok_or_else(|| DeckError::InvalidResourcePath(path.to_string_lossy().to_string()))?;
    let id = section_id_from_stem(&stem);
    if id.is_empty() {
        return Err(DeckError::ValidationError(format!(
            "Cannot derive a section id from {:?}",
            path
        )));
    }

    let (label, body) = parse_frontmatter(&markdown);
    let label = label.unwrap_or_else(|| id.clone());

    let section = parse_section(&id, &label, &body)?;
    debug!("Loaded section {:?} from {:?}", id, path);
    Ok(section)
}

/// Derive a section id from a file stem by dropping its ordering prefix.
pub fn section_id_from_stem(stem: &str) -> String {
    ORDER_PREFIX_REGEX.replace(stem, "").trim().to_string()
}

/// Parse an optional `% Label` first line.
fn parse_frontmatter(content: &str) -> (Option<String>, String) {
    let mut lines = content.lines();
    match lines.next() {
        Some(first) if first.starts_with("% ") => {
            let label = first.trim_start_matches("% ").trim().to_string();
            let rest: Vec<&str> = lines.skip_while(|line| line.trim().is_empty()).collect();
            (Some(label), rest.join("\n"))
        }
        _ => (None, content.to_string()),
    }
}

/// Parse a Markdown fragment into a section's content nodes.
pub fn parse_section(id: &str, label: &str, markdown: &str) -> Result<Section> {
    let arena = Arena::new();
    let options = comrak_options();
    let root = parse_document(&arena, markdown, &options);

    let mut nodes = Vec::new();
    let mut pending_break = false;

    for child in root.children() {
        let value = child.data.borrow().value.clone();

        let kind = match value {
            NodeValue::ThematicBreak => {
                pending_break = true;
                continue;
            }
            NodeValue::HtmlBlock(ref html) if is_break_marker(&html.literal) => {
                pending_break = true;
                continue;
            }
            NodeValue::Heading(ref heading) => match heading.level {
                1 => NodeKind::Heading1,
                2 => NodeKind::Heading2,
                _ => NodeKind::Heading3,
            },
            NodeValue::Paragraph => NodeKind::Paragraph,
            NodeValue::List(..) => NodeKind::List,
            NodeValue::Table(..) => NodeKind::Table,
            NodeValue::CodeBlock(..) => NodeKind::Preformatted,
            NodeValue::BlockQuote | NodeValue::HtmlBlock(..) => NodeKind::Container,
            _ => NodeKind::Other,
        };

        let html = render_html(child, &options)?;
        let mut node = ContentNode::new(kind, collect_text(child)).with_html(html);

        if let NodeValue::HtmlBlock(ref block) = value {
            if HERO_CLASS_REGEX.is_match(&block.literal) {
                node = node.hero();
            }
        }
        if pending_break {
            node = node.with_forced_break();
            pending_break = false;
        }

        nodes.push(node);
    }

    Ok(Section::new(id, label, nodes))
}

fn is_break_marker(literal: &str) -> bool {
    let trimmed = literal.trim();
    BREAK_MARKERS.iter().any(|marker| trimmed == *marker)
}

fn render_html<'a>(node: &'a AstNode<'a>, options: &ComrakOptions) -> Result<String> {
    let mut buffer = Vec::new();
    format_html(node, options, &mut buffer)
        .map_err(|e| DeckError::MarkdownError(format!("Failed to render node: {}", e)))?;
    String::from_utf8(buffer)
        .map_err(|e| DeckError::MarkdownError(format!("Rendered HTML is not UTF-8: {}", e)))
}

/// Flatten a node's text content, keeping code literals.
///
/// List items, nested paragraphs and table rows go on their own lines.
fn collect_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    for descendant in node.descendants() {
        match &descendant.data.borrow().value {
            NodeValue::Item(..) | NodeValue::Paragraph | NodeValue::TableRow(..) => {
                if !text.is_empty() && !text.ends_with('\n') {
                    text.push('\n');
                }
            }
            NodeValue::TableCell => {
                if !text.is_empty() && !text.ends_with('\n') {
                    text.push_str(" | ");
                }
            }
            NodeValue::Text(t) => text.push_str(t),
            NodeValue::Code(code) => text.push_str(&code.literal),
            NodeValue::CodeBlock(block) => text.push_str(&block.literal),
            NodeValue::HtmlBlock(block) => text.push_str(&block.literal),
            NodeValue::SoftBreak | NodeValue::LineBreak => text.push(' '),
            _ => {}
        }
    }
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::WeightClass;
    use std::fs;
    use tempfile::TempDir;

    fn kinds(section: &Section) -> Vec<NodeKind> {
        section.nodes().map(|node| node.kind).collect()
    }

    #[test]
    fn test_parse_block_kinds() {
        let markdown = r#"# 1. Zynq Overview

Programmable logic meets **ARM** cores.

## 1.1 Toolchain

- Vivado
- PetaLinux

```bash
petalinux-build
```

| Board | SoC |
|-------|-----|
| ZCU102 | ZU9EG |

> Remember to source settings64.sh

### Details
"#;
        let section = parse_section("zynq", "Zynq", markdown).unwrap();
        assert_eq!(
            kinds(&section),
            vec![
                NodeKind::Heading1,
                NodeKind::Paragraph,
                NodeKind::Heading2,
                NodeKind::List,
                NodeKind::Preformatted,
                NodeKind::Table,
                NodeKind::Container,
                NodeKind::Heading3,
            ]
        );

        let nodes: Vec<_> = section.nodes().collect();
        assert_eq!(nodes[0].text, "1. Zynq Overview");
        assert_eq!(nodes[1].text, "Programmable logic meets ARM cores.");
        assert!(nodes[1].html.contains("<strong>ARM</strong>"));
        assert_eq!(nodes[3].text, "Vivado\nPetaLinux");
        assert_eq!(nodes[5].text, "Board | SoC\nZCU102 | ZU9EG");
        assert!(nodes[4].html.contains("language-bash"));
        assert_eq!(nodes[4].text, "petalinux-build");
    }

    #[test]
    fn test_break_markers_flag_next_node() {
        let markdown = "Intro text\n\n---\n\nAfter rule\n\n<!-- break -->\n\nAfter comment\n";
        let section = parse_section("s", "S", markdown).unwrap();
        let flags: Vec<bool> = section.nodes().map(|node| node.forced_break).collect();
        assert_eq!(flags, vec![false, true, true]);
    }

    #[test]
    fn test_hero_container_is_heavy() {
        let markdown = "<div class=\"hero fade-in\">\n<h1>Welcome</h1>\n</div>\n\n<div class=\"card\">\nplain\n</div>\n";
        let section = parse_section("s", "S", markdown).unwrap();
        let classes: Vec<WeightClass> = section.nodes().map(|node| node.class).collect();
        assert_eq!(classes, vec![WeightClass::Heavy, WeightClass::Grouping]);
    }

    #[test]
    fn test_section_id_from_stem() {
        assert_eq!(section_id_from_stem("01-intro"), "intro");
        assert_eq!(section_id_from_stem("2_device-tree"), "device-tree");
        assert_eq!(section_id_from_stem("kernel"), "kernel");
    }

    #[test]
    fn test_load_sections_in_file_order() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(dir.path().join("02-kernel.md"), "# Kernel\n").unwrap();
        fs::write(dir.path().join("01-intro.md"), "% Getting Started\n\n# Hello\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let sections = load_sections(dir.path()).unwrap();
        let ids: Vec<&str> = sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["intro", "kernel"]);
        assert_eq!(sections[0].label, "Getting Started");
        assert_eq!(sections[1].label, "kernel");
    }

    #[test]
    fn test_load_sections_with_glob_characters_in_path() {
        let root = TempDir::new().expect("Failed to create temp dir");
        let draft = root.path().join("lecture [draft]");
        let lookalike = root.path().join("lecture d");
        fs::create_dir(&draft).unwrap();
        fs::create_dir(&lookalike).unwrap();
        fs::write(draft.join("01-intro.md"), "# Hello\n").unwrap();
        fs::write(lookalike.join("01-other.md"), "# Other\n").unwrap();

        let sections = load_sections(&draft).unwrap();
        let ids: Vec<&str> = sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["intro"]);
    }

    #[test]
    fn test_load_sections_errors() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        assert!(matches!(
            load_sections(dir.path()),
            Err(DeckError::NoSectionsFoundError(_))
        ));
        assert!(matches!(
            load_sections(&dir.path().join("missing")),
            Err(DeckError::PathNotFoundError(_))
        ));
    }
}
