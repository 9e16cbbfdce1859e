//! Input feature slice: pending symptom editor, suggestions, and chips.

mod line_buffer;
mod render;
mod state;
mod update;

pub use line_buffer::{CursorMove, LineBuffer};
pub use render::{
    INPUT_HEIGHT, chips_height, render_chips, render_input, render_suggestions,
    suggestions_height,
};
pub use state::{InputState, SUGGESTION_LIMIT};
pub use update::{handle_main_key, handle_paste};
