//! Transcript feature slice: chat history view and scrolling.

mod render;
mod state;

pub use render::{content_width, render_transcript, transcript_lines};
pub use state::TranscriptState;
