// ABOUTME: Terminal presenter for the lecture-deck application
// ABOUTME: Draws the current slide as text and turns typed commands into navigation events

use crate::content::NodeKind;
use crate::errors::Result;
use crate::paginate::Slide;
use crate::presenter::{InputEvent, Presenter, RenderSurface};
use log::debug;
use std::io::{BufRead, Write};

const HELP: &str = "\
commands:
  h, ArrowLeft          previous slide (key binding)
  l, ArrowRight         next slide (key binding)
  p, prev, left         previous slide (button)
  n, next, right, <enter>  next slide (button)
  <number>              jump to slide from the submenu
  s <id>, section <id>  switch section
  ?, help               show this help
  q, quit               exit";

/// A line of input from the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Event(InputEvent),
    Help,
    Quit,
}

/// Parse one line of terminal input.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "h" | "l" | "ArrowLeft" | "ArrowRight" => Command::Event(InputEvent::key(word)),
        "p" | "prev" | "left" => Command::Event(InputEvent::PrevClicked),
        "" | "n" | "next" | "right" => Command::Event(InputEvent::NextClicked),
        "s" | "section" if !rest.is_empty() => {
            Command::Event(InputEvent::SectionSelected(rest.to_string()))
        }
        "?" | "help" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        number => match number.parse::<usize>() {
            Ok(n) if n >= 1 => Command::Event(InputEvent::SubmenuEntrySelected(n - 1)),
            _ => return None,
        },
    };
    Some(command)
}

/// Keeps the last projected state so a whole screen can be drawn at once.
#[derive(Debug, Default)]
pub struct TerminalSurface {
    section: Option<String>,
    lines: Vec<String>,
    counter: String,
    prev_enabled: bool,
    next_enabled: bool,
    submenu: Vec<String>,
    highlighted: Option<usize>,
}

impl RenderSurface for TerminalSurface {
    fn show_only(&mut self, slide: Option<(&str, &Slide)>) {
        self.lines = slide.map(|(_, slide)| slide_lines(slide)).unwrap_or_default();
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

    fn highlight_nav_item(&mut self, section_id: &str) {
        self.section = Some(section_id.to_string());
    }
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the current screen.
    pub fn draw<W: Write>(&self, out: &mut W) -> Result<()> {
        let section = self.section.as_deref().unwrap_or("-");
        writeln!(out, "== {} {}", section, "=".repeat(60usize.saturating_sub(section.len())))?;

        if self.lines.is_empty() {
            writeln!(out, "(this section has no slides)")?;
        }
        for line in &self.lines {
            writeln!(out, "{}", line)?;
        }

        writeln!(out, "{}", "-".repeat(64))?;
        writeln!(
            out,
            "{}   {}   {}",
            if self.prev_enabled { "[h] prev" } else { "        " },
            self.counter,
            if self.next_enabled { "next [l]" } else { "" }
        )?;
        for (i, title) in self.submenu.iter().enumerate() {
            let marker = if self.highlighted == Some(i) { '>' } else { ' ' };
            writeln!(out, " {} {}. {}", marker, i + 1, title)?;
        }
        out.flush()?;
        Ok(())
    }
}

fn slide_lines(slide: &Slide) -> Vec<String> {
    let mut lines = Vec::new();
    for node in &slide.nodes {
        match node.kind {
            NodeKind::Heading1 => {
                lines.push(node.text.to_uppercase());
                lines.push("=".repeat(node.text.chars().count()));
            }
            NodeKind::Heading2 => lines.push(format!("## {}", node.text)),
            NodeKind::Heading3 => lines.push(format!("### {}", node.text)),
            NodeKind::Preformatted => {
                lines.extend(node.text.lines().map(|line| format!("    {}", line)))
            }
            NodeKind::List => lines.extend(node.text.lines().map(|line| format!("  - {}", line))),
            _ => lines.extend(node.text.lines().map(str::to_string)),
        }
        lines.push(String::new());
    }
    lines
}

/// Run an interactive session until input ends or the user quits.
pub fn run_session<R: BufRead, W: Write>(
    presenter: &mut Presenter<TerminalSurface>,
    input: R,
    out: &mut W,
) -> Result<()> {
    presenter.start();
    presenter.surface().draw(out)?;

    for line in input.lines() {
        let line = line?;
        match parse_command(&line) {
            Some(Command::Quit) => break,
            Some(Command::Help) => writeln!(out, "{}", HELP)?,
            Some(Command::Event(event)) => {
                debug!("Terminal event {:?}", event);
                if presenter.handle(event) {
                    presenter.surface().draw(out)?;
                }
            }
            None => writeln!(out, "unknown command: {:?} (type ? for help)", line.trim())?,
        }
    }

    Ok(())
}
