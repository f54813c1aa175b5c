//! Context Engine Core Components
//!
//! Turns retrieved chunks and conversation history into the system prompt:
//! - Context stitching (chunk joining, no-context marker)
//! - Prompt assembly (locale instructions, context, history)

mod prompt;
mod stitcher;

pub use prompt::{build_system_prompt, render_history, sanitize_question};
pub use stitcher::{stitch, CONTEXT_SEPARATOR, NO_CONTEXT_MARKER};
