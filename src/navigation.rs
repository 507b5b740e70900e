// ABOUTME: Navigation state machine for the lecture-deck application
// ABOUTME: Tracks the active section and the current slide of every section

use crate::content::ContentRegistry;
use log::debug;
use std::collections::HashMap;

/// Step direction for slide navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

impl Direction {
    pub fn offset(self) -> isize {
        match self {
            Direction::Prev => -1,
            Direction::Next => 1,
        }
    }
}

#[derive(Debug, Clone)]
struct SectionCursor {
    current: usize,
    titles: Vec<String>,
}

impl SectionCursor {
    fn total(&self) -> usize {
        self.titles.len()
    }
}

/// Current position in the deck.
///
/// Every transition clamps, so the active section's index is always valid
/// for its slide count. No operation fails: invalid requests are ignored.
#[derive(Debug, Clone, Default)]
pub struct NavigationState {
    active: Option<String>,
    cursors: HashMap<String, SectionCursor>,
}

impl NavigationState {
    /// Build navigation state for a paginated registry. Nothing is active yet.
    pub fn new(registry: &ContentRegistry) -> Self {
        let cursors = registry
            .sections()
            .iter()
            .map(|section| {
                (
                    section.id.clone(),
                    SectionCursor {
                        current: 0,
                        titles: section.titles().to_vec(),
                    },
                )
            })
            .collect();

        Self {
            active: None,
            cursors,
        }
    }

    pub fn active_section(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Make `id` the active section and land on its first slide.
    pub fn activate_section(&mut self, id: &str) {
        let Some(cursor) = self.cursors.get_mut(id) else {
            debug!("Ignoring activation of unknown section {:?}", id);
            return;
        };
        cursor.current = 0;
        self.active = Some(id.to_string());
        debug!("Activated section {:?}", id);
    }

    /// Move a section to `index`, clamped to its slide range.
    pub fn go_to_slide(&mut self, section_id: &str, index: isize) {
        let Some(cursor) = self.cursors.get_mut(section_id) else {
            return;
        };
        let total = cursor.total();
        if total == 0 {
            return;
        }

        let last = (total - 1) as isize;
        cursor.current = index.clamp(0, last) as usize;
        debug!(
            "Section {:?} at slide {}/{}",
            section_id,
            cursor.current + 1,
            total
        );
    }

    /// Step the active section one slide in `direction`.
    pub fn navigate(&mut self, direction: Direction) {
        let Some(active) = self.active.clone() else {
            return;
        };
        let (index, _) = self.current_position(&active);
        self.go_to_slide(&active, index as isize + direction.offset());
    }

    /// `(index, total)` for a section; `(0, 0)` for unknown or empty sections.
    pub fn current_position(&self, section_id: &str) -> (usize, usize) {
        self.cursors
            .get(section_id)
            .map(|cursor| (cursor.current, cursor.total()))
            .unwrap_or((0, 0))
    }

    pub fn is_first(&self, section_id: &str) -> bool {
        self.current_position(section_id).0 == 0
    }

    pub fn is_last(&self, section_id: &str) -> bool {
        let (index, total) = self.current_position(section_id);
        index + 1 >= total
    }

    pub fn title_at(&self, section_id: &str, index: usize) -> Option<&str> {
        self.cursors
            .get(section_id)
            .and_then(|cursor| cursor.titles.get(index))
            .map(String::as_str)
    }

    pub fn titles(&self, section_id: &str) -> &[String] {
        self.cursors
            .get(section_id)
            .map(|cursor| cursor.titles.as_slice())
            .unwrap_or(&[])
    }

    /// The active section and its current slide index.
    pub fn snapshot(&self) -> Option<(&str, usize)> {
        let active = self.active.as_deref()?;
        Some((active, self.current_position(active).0))
    }
}
