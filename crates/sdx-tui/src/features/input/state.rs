//! Input slice state.

use sdx_core::session::{SessionState, SymptomMatch};

use super::LineBuffer;

/// Maximum number of catalog suggestions shown under the input.
pub const SUGGESTION_LIMIT: usize = 6;

#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Editor for the pending symptom.
    pub buffer: LineBuffer,
    /// Highlighted row in the suggestion list.
    pub highlighted: Option<usize>,
    /// Focused chip in the selected-symptom row.
    pub focused_chip: Option<usize>,
}

impl InputState {
    /// Current suggestions for the pending symptom.
    pub fn suggestions(session: &SessionState) -> Vec<SymptomMatch> {
        session.suggestions(SUGGESTION_LIMIT)
    }

    /// Name of the highlighted suggestion, if the highlight is still valid.
    pub fn highlighted_suggestion<'a>(&self, session: &'a SessionState) -> Option<&'a str> {
        let index = self.highlighted?;
        let suggestions = Self::suggestions(session);
        let entry = suggestions.get(index)?;
        session.catalog().get(entry.index)
    }

    /// Moves the suggestion highlight by `delta`, clamped to the list.
    pub fn move_highlight(&mut self, delta: isize, available: usize) {
        if available == 0 {
            self.highlighted = None;
            return;
        }
        let last = available - 1;
        self.highlighted = Some(match self.highlighted {
            None if delta < 0 => last,
            None => 0,
            Some(current) => current.saturating_add_signed(delta).min(last),
        });
    }

    /// Moves chip focus left, starting from the last chip.
    pub fn focus_prev_chip(&mut self, chip_count: usize) {
        if chip_count == 0 {
            self.focused_chip = None;
            return;
        }
        self.focused_chip = Some(match self.focused_chip {
            None => chip_count - 1,
            Some(current) => current.min(chip_count - 1).saturating_sub(1),
        });
    }

    /// Moves chip focus right; moving past the last chip clears focus.
    pub fn focus_next_chip(&mut self, chip_count: usize) {
        self.focused_chip = match self.focused_chip {
            Some(current) if current + 1 < chip_count => Some(current + 1),
            _ => None,
        };
    }

    /// Keeps chip focus valid after the selection shrank.
    pub fn clamp_chip_focus(&mut self, chip_count: usize) {
        if chip_count == 0 {
            self.focused_chip = None;
        } else if let Some(current) = self.focused_chip {
            self.focused_chip = Some(current.min(chip_count - 1));
        }
    }

    /// Clears highlight and chip focus.
    pub fn reset_focus(&mut self) {
        self.highlighted = None;
        self.focused_chip = None;
    }
}
