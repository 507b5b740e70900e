// ABOUTME: HTML generation module for the lecture-deck application
// ABOUTME: Writes a paginated deck as one static page with per-slide navigation chrome

use crate::content::Section;
use crate::deck::{Deck, DeckConfig};
use crate::errors::{DeckError, Result};
use crate::paginate::Slide;
use crate::presenter::{self, RenderSurface};
use crate::resources::{ResourceFile, ResourceKind};
use html_escape::{encode_double_quoted_attribute, encode_text};
use log::{info, warn};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const BASE_CSS: &str = r#"
body { margin: 0; display: flex; min-height: 100vh; font-family: "JetBrains Mono", monospace; background: #1e1e2e; color: #cdd6f4; }
aside.sidebar { width: 16rem; flex-shrink: 0; border-right: 1px solid #313244; padding: 1rem; }
aside.sidebar ul { list-style: none; padding: 0; margin: 0; }
.nav-item { display: block; padding: 0.4rem 0.6rem; color: inherit; text-decoration: none; border-radius: 4px; }
.nav-item.active { background: #313244; color: #a6e3a1; }
main { flex: 1; padding: 2rem; overflow-y: auto; }
.slide { display: none; flex-direction: column; min-height: calc(100vh - 6rem); animation: fadeIn 0.4s ease-out; }
.slide:target, .slide.active { display: flex; }
main:has(.slide:target) .slide.active:not(:target) { display: none; }
.slide-body { flex: 1; }
.slide-controls { display: flex; gap: 1rem; align-items: center; }
.control { color: #89b4fa; text-decoration: none; }
.control.disabled { color: #45475a; pointer-events: none; }
.submenu li.active a { color: #a6e3a1; font-weight: bold; }
.status-bar { position: fixed; bottom: 0; left: 0; right: 0; display: flex; justify-content: space-between; padding: 0.2rem 1rem; background: #11111b; font-size: 0.8rem; }
@keyframes fadeIn { from { opacity: 0; } to { opacity: 1; } }
@media (max-width: 768px) { body { flex-direction: column; } aside.sidebar { width: auto; } }
"#;

const BOOT_SCRIPT: &str = r#"<script>
(function () {
  var SCROLL_STEP = 50;
  function currentFrame() {
    return document.querySelector(".slide:target") || document.querySelector(".slide.active");
  }
  function syncNav() {
    var frame = currentFrame();
    if (!frame) return;
    var section = frame.getAttribute("data-section");
    document.querySelectorAll(".nav-item[data-target]").forEach(function (item) {
      item.classList.toggle("active", item.getAttribute("data-target") === section);
    });
  }
  window.addEventListener("hashchange", syncNav);
  document.addEventListener("keydown", function (e) {
    var tag = e.target.tagName;
    if (tag === "INPUT" || tag === "TEXTAREA") return;
    var main = document.querySelector("main");
    if (e.key === "j") { main.scrollBy(0, SCROLL_STEP); return; }
    if (e.key === "k") { main.scrollBy(0, -SCROLL_STEP); return; }
    if (e.key === "G") { main.scrollTo(0, main.scrollHeight); return; }
    var rel = (e.key === "h" || e.key === "ArrowLeft") ? "prev"
      : (e.key === "l" || e.key === "ArrowRight") ? "next" : null;
    if (!rel) return;
    var current = currentFrame();
    var link = current && current.querySelector('a[rel="' + rel + '"]');
    if (link) location.hash = link.getAttribute("href");
  });
  syncNav();
  if (window.hljs) window.hljs.highlightAll();
  if (window.lucide) window.lucide.createIcons();
})();
</script>"#;

/// Options for writing the deck page
#[derive(Debug, Clone, Default)]
pub struct HtmlOptions {
    pub css_files: Vec<ResourceFile>,
    pub js_files: Vec<ResourceFile>,
    pub embed_resources: bool,
    pub inline_remote: bool,
}

/// Per-frame chrome captured from one navigation position.
#[derive(Debug, Default)]
struct FrameSurface {
    nav_item: Option<String>,
    shown: Option<(String, usize)>,
    body: String,
    counter: String,
    prev_enabled: bool,
    next_enabled: bool,
    submenu: Vec<String>,
    highlighted: Option<usize>,
}

impl RenderSurface for FrameSurface {
    fn highlight_nav_item(&mut self, section_id: &str) {
        self.nav_item = Some(section_id.to_string());
    }

    fn show_only(&mut self, slide: Option<(&str, &Slide)>) {
        self.shown = slide.map(|(section, slide)| (section.to_string(), slide.index));
        self.body = slide
            .map(|(_, slide)| {
                slide
                    .nodes
                    .iter()
                    .map(|node| node.html.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default();
    }

    fn set_counter_text(&mut self, text: &str) {
        self.counter = text.to_string();
    }

    fn set_control_enabled(&mut self, prev: bool, next: bool) {
        self.prev_enabled = prev;
        self.next_enabled = next;
    }

    fn highlight_submenu_entry(&mut self, index: usize) {
        self.highlighted = Some(index);
    }

    fn rebuild_submenu(&mut self, titles: &[String]) {
        self.submenu = titles.to_vec();
        self.highlighted = None;
    }
}

/// Fragment id of a slide frame.
pub fn frame_id(section_id: &str, index: usize) -> String {
    format!("slide-{}-{}", section_id, index)
}

/// Element id of a section's frame container.
pub fn section_element_id(section_id: &str) -> String {
    format!("section-{}", section_id)
}

/// Generate the full deck page
pub fn generate_html(deck: &Deck, options: &HtmlOptions) -> Result<String> {
    info!("Generating HTML for deck {:?}", deck.title);

    let mut html_doc = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html_doc.push_str("<meta charset=\"UTF-8\">\n");
    html_doc.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html_doc.push_str("<meta name=\"generator\" content=\"lecture-deck\">\n");
    html_doc.push_str(&format!(
        "<meta name=\"generated\" content=\"{}\">\n",
        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ")
    ));
    html_doc.push_str(&format!("<title>{}</title>\n", encode_text(&deck.title)));
    html_doc.push_str(&format!("<style>{}</style>\n", BASE_CSS));
    push_resources(&mut html_doc, &options.css_files, ResourceKind::Stylesheet, options);
    html_doc.push_str("</head>\n<body>\n");

    write_sidebar(&mut html_doc, deck);

    html_doc.push_str("<main>\n");
    for section in deck.registry.sections() {
        write_section(&mut html_doc, deck, section)?;
    }
    html_doc.push_str("</main>\n");

    let slide_total: usize = deck.registry.sections().iter().map(Section::slide_count).sum();
    html_doc.push_str(&format!(
        "<div class=\"status-bar\"><span>{}</span><span>{} slides</span></div>\n",
        encode_text(&deck.title),
        slide_total
    ));

    push_resources(&mut html_doc, &options.js_files, ResourceKind::Script, options);
    html_doc.push_str(BOOT_SCRIPT);
    html_doc.push('\n');

    html_doc.push_str("</body>\n</html>");

    Ok(html_doc)
}

fn push_resources(
    html_doc: &mut String,
    resources: &[ResourceFile],
    kind: ResourceKind,
    options: &HtmlOptions,
) {
    for resource in resources {
        match resource.tag(kind, options.embed_resources, options.inline_remote) {
            Ok(tag) => {
                html_doc.push_str(&tag);
                html_doc.push('\n');
            }
            Err(e) => {
                // Continue with other resources rather than failing completely
                warn!("Failed to include resource {}: {}", resource.path, e);
            }
        }
    }
}

fn write_sidebar(html_doc: &mut String, deck: &Deck) {
    html_doc.push_str("<aside class=\"sidebar\">\n<nav>\n<ul>\n");
    for section in deck.registry.sections() {
        let active = if deck.initial_section() == Some(section.id.as_str()) {
            " active"
        } else {
            ""
        };
        let _ = writeln!(
            html_doc,
            "<li><a class=\"nav-item{}\" data-target=\"{}\" href=\"#{}\">{}</a></li>",
            active,
            encode_double_quoted_attribute(&section.id),
            encode_double_quoted_attribute(&frame_id(&section.id, 0)),
            encode_text(&section.label)
        );
    }
    html_doc.push_str("</ul>\n</nav>\n</aside>\n");
}

fn write_section(html_doc: &mut String, deck: &Deck, section: &Section) -> Result<()> {
    let _ = writeln!(
        html_doc,
        "<section class=\"content-section\" id=\"{}\" data-slides=\"{}\">",
        encode_double_quoted_attribute(&section_element_id(&section.id)),
        section.slide_count()
    );

    let mut state = deck.navigation();
    state.activate_section(&section.id);

    // An empty section still gets one placeholder frame so its nav link resolves
    let positions = section.slide_count().max(1);
    for index in 0..positions {
        state.go_to_slide(&section.id, index as isize);
        let ops = presenter::render(&state, &deck.registry);

        let mut frame = FrameSurface::default();
        presenter::project(&ops, &deck.registry, &mut frame);

        if let Some((shown_section, shown_index)) = &frame.shown {
            if shown_section != &section.id || *shown_index != index {
                return Err(DeckError::HtmlError(format!(
                    "Expected slide {} of {:?} but rendered {} of {:?}",
                    index, section.id, shown_index, shown_section
                )));
            }
        }

        let is_initial = index == 0 && deck.initial_section() == Some(section.id.as_str());
        write_frame(html_doc, &section.id, index, is_initial, &frame);
    }

    html_doc.push_str("</section>\n");
    Ok(())
}

fn write_frame(
    html_doc: &mut String,
    section_id: &str,
    index: usize,
    is_initial: bool,
    frame: &FrameSurface,
) {
    let mut classes = String::from("slide");
    if is_initial {
        classes.push_str(" active");
    }
    if frame.shown.is_none() {
        classes.push_str(" empty");
    }
    let title = frame
        .highlighted
        .and_then(|i| frame.submenu.get(i))
        .map(String::as_str)
        .unwrap_or_default();

    let nav_item = frame.nav_item.as_deref().unwrap_or(section_id);

    let _ = writeln!(
        html_doc,
        "<article class=\"{}\" id=\"{}\" data-section=\"{}\" data-index=\"{}\" data-title=\"{}\">",
        classes,
        encode_double_quoted_attribute(&frame_id(section_id, index)),
        encode_double_quoted_attribute(nav_item),
        index,
        encode_double_quoted_attribute(title)
    );

    html_doc.push_str("<div class=\"slide-body\">\n");
    html_doc.push_str(&frame.body);
    html_doc.push_str("</div>\n");

    html_doc.push_str("<footer class=\"slide-controls\">\n");
    write_control(html_doc, section_id, index.checked_sub(1), frame.prev_enabled, "prev");
    let _ = writeln!(
        html_doc,
        "<span class=\"counter\">{}</span>",
        encode_text(&frame.counter)
    );
    write_control(html_doc, section_id, Some(index + 1), frame.next_enabled, "next");
    html_doc.push_str("</footer>\n");

    if !frame.submenu.is_empty() {
        html_doc.push_str("<ol class=\"submenu\">\n");
        for (i, entry) in frame.submenu.iter().enumerate() {
            let active = if frame.highlighted == Some(i) {
                " class=\"active\""
            } else {
                ""
            };
            let _ = writeln!(
                html_doc,
                "<li{}><a href=\"#{}\">{}</a></li>",
                active,
                encode_double_quoted_attribute(&frame_id(section_id, i)),
                encode_text(entry)
            );
        }
        html_doc.push_str("</ol>\n");
    }

    html_doc.push_str("</article>\n");
}

fn write_control(
    html_doc: &mut String,
    section_id: &str,
    target: Option<usize>,
    enabled: bool,
    rel: &str,
) {
    let label = if rel == "prev" { "&larr;" } else { "&rarr;" };
    match target {
        Some(target) if enabled => {
            let _ = writeln!(
                html_doc,
                "<a class=\"control {}\" rel=\"{}\" href=\"#{}\">{}</a>",
                rel,
                rel,
                encode_double_quoted_attribute(&frame_id(section_id, target)),
                label
            );
        }
        _ => {
            let _ = writeln!(
                html_doc,
                "<span class=\"control {} disabled\" aria-disabled=\"true\">{}</span>",
                rel, label
            );
        }
    }
}

/// Utility function to write HTML content to a file
pub fn write_html_to_file(html_content: &str, output_path: &Path) -> Result<()> {
    info!("Writing HTML to file: {:?}", output_path);

    crate::utils::ensure_parent_directory_exists(output_path)?;
    fs::write(output_path, html_content).map_err(DeckError::FileReadError)?;

    Ok(())
}

/// Load a content directory, build the deck and write its page.
pub fn generate_deck_file(
    content_dir: &Path,
    output_path: &Path,
    deck_config: &DeckConfig,
    options: &HtmlOptions,
) -> Result<Deck> {
    let deck = Deck::load(content_dir, deck_config)?;
    let html_content = generate_html(&deck, options)?;
    write_html_to_file(&html_content, output_path)?;
    Ok(deck)
}
