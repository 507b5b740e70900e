// ABOUTME: Presentation sync for the lecture-deck application
// ABOUTME: Projects navigation state onto a render surface and maps input events to transitions

use crate::content::ContentRegistry;
use crate::navigation::{Direction, NavigationState};
use crate::paginate::Slide;
use log::debug;

/// Identifies one slide of one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideRef {
    pub section: String,
    pub index: usize,
}

/// A single instruction for a rendering surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOp {
    HighlightNavItem(String),
    RebuildSubmenu(Vec<String>),
    /// Show exactly this slide; `None` hides every slide
    ShowOnly(Option<SlideRef>),
    SetCounterText(String),
    SetControlEnabled { prev: bool, next: bool },
    HighlightSubmenuEntry(usize),
}

/// Operations a host must provide to display the deck.
pub trait RenderSurface {
    fn show_only(&mut self, slide: Option<(&str, &Slide)>);
    fn set_counter_text(&mut self, text: &str);
    fn set_control_enabled(&mut self, prev: bool, next: bool);
    fn highlight_submenu_entry(&mut self, index: usize);
    fn rebuild_submenu(&mut self, titles: &[String]);

    fn highlight_nav_item(&mut self, _section_id: &str) {}
}

/// Compute the instructions that display the current navigation state.
pub fn render(state: &NavigationState, registry: &ContentRegistry) -> Vec<RenderOp> {
    let Some(active) = state.active_section() else {
        return Vec::new();
    };
    let (index, total) = state.current_position(active);

    let shown = registry
        .get(active)
        .and_then(|section| section.slide(index))
        .map(|_| SlideRef {
            section: active.to_string(),
            index,
        });

    let mut ops = vec![
        RenderOp::HighlightNavItem(active.to_string()),
        RenderOp::RebuildSubmenu(state.titles(active).to_vec()),
        RenderOp::ShowOnly(shown),
    ];

    if total == 0 {
        ops.push(RenderOp::SetCounterText("0/0".to_string()));
        ops.push(RenderOp::SetControlEnabled {
            prev: false,
            next: false,
        });
    } else {
        ops.push(RenderOp::SetCounterText(format!("{}/{}", index + 1, total)));
        ops.push(RenderOp::SetControlEnabled {
            prev: !state.is_first(active),
            next: !state.is_last(active),
        });
        ops.push(RenderOp::HighlightSubmenuEntry(index));
    }

    ops
}

/// Apply render instructions to a surface, resolving slides against the registry.
pub fn project<S: RenderSurface + ?Sized>(
    ops: &[RenderOp],
    registry: &ContentRegistry,
    surface: &mut S,
) {
    for op in ops {
        match op {
            RenderOp::HighlightNavItem(id) => surface.highlight_nav_item(id),
            RenderOp::RebuildSubmenu(titles) => surface.rebuild_submenu(titles),
            RenderOp::ShowOnly(target) => {
                let slide = target.as_ref().and_then(|target| {
                    registry
                        .get(&target.section)
                        .and_then(|section| section.slide(target.index))
                        .map(|slide| (target.section.as_str(), slide))
                });
                surface.show_only(slide);
            }
            RenderOp::SetCounterText(text) => surface.set_counter_text(text),
            RenderOp::SetControlEnabled { prev, next } => {
                surface.set_control_enabled(*prev, *next)
            }
            RenderOp::HighlightSubmenuEntry(index) => surface.highlight_submenu_entry(*index),
        }
    }
}

/// Discrete inputs from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    SectionSelected(String),
    PrevClicked,
    NextClicked,
    SubmenuEntrySelected(usize),
    Key { key: String, from_text_field: bool },
}

impl InputEvent {
    pub fn key(key: impl Into<String>) -> Self {
        InputEvent::Key {
            key: key.into(),
            from_text_field: false,
        }
    }
}

/// Map a key name to a navigation direction.
pub fn key_direction(key: &str) -> Option<Direction> {
    match key {
        "h" | "ArrowLeft" => Some(Direction::Prev),
        "l" | "ArrowRight" => Some(Direction::Next),
        _ => None,
    }
}

/// Owns the navigation state and keeps a surface in sync with it.
pub struct Presenter<S: RenderSurface> {
    registry: ContentRegistry,
    state: NavigationState,
    surface: S,
}

impl<S: RenderSurface> Presenter<S> {
    pub fn new(registry: ContentRegistry, state: NavigationState, surface: S) -> Self {
        Self {
            registry,
            state,
            surface,
        }
    }

    /// Render the initial state.
    pub fn start(&mut self) {
        self.refresh();
    }

    /// Handle one input event. Returns true if the surface was re-rendered.
    pub fn handle(&mut self, event: InputEvent) -> bool {
        let before = self.position();

        match event {
            InputEvent::SectionSelected(id) => {
                self.state.activate_section(&id);
                if self.state.active_section() == Some(id.as_str()) {
                    // Re-selecting a section replays its entry, so always redraw
                    self.refresh();
                    return true;
                }
            }
            InputEvent::PrevClicked => self.state.navigate(Direction::Prev),
            InputEvent::NextClicked => self.state.navigate(Direction::Next),
            InputEvent::SubmenuEntrySelected(index) => {
                if let Some(active) = self.state.active_section().map(str::to_string) {
                    self.state.go_to_slide(&active, index as isize);
                }
            }
            InputEvent::Key {
                key,
                from_text_field,
            } => {
                if from_text_field {
                    return false;
                }
                match key_direction(&key) {
                    Some(direction) => self.state.navigate(direction),
                    None => {
                        debug!("Ignoring key {:?}", key);
                        return false;
                    }
                }
            }
        }

        if self.position() == before {
            return false;
        }
        self.refresh();
        true
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn registry(&self) -> &ContentRegistry {
        &self.registry
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    fn position(&self) -> Option<(String, usize)> {
        self.state
            .snapshot()
            .map(|(section, index)| (section.to_string(), index))
    }

    fn refresh(&mut self) {
        let ops = render(&self.state, &self.registry);
        project(&ops, &self.registry, &mut self.surface);
    }
}
